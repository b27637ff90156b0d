//! Resource abstraction layer
//!
//! This module provides a data-driven approach to managing IBM Cloud
//! resources. Resource definitions are loaded from JSON files at compile
//! time; generic operations (list, resolve, create, delete) run against any
//! of them.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`fetcher`] - Fetches resources with pagination support
//! - [`resolver`] - Resolves names, ids and other identifiers to records
//! - [`dispatch`] - Maps resource keys and action names to typed handles
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`:
//! - `vpc.json` - VPC infrastructure (networks, instances, storage)
//! - `resource_controller.json` - Resource groups, instances, keys, bindings
//! - `dns.json` - DNS services zones and records
//! - `power.json` - Power Systems virtual servers
//! - `softlayer.json` - Classic bare metal and DNS domains
//! - `enterprise.json` - Enterprise accounts
//!
//! # Example
//!
//! ```ignore
//! use ibmcloud_sdk::resource::Collection;
//!
//! async fn find_vpc(client: &ibmcloud_sdk::IbmClient) -> ibmcloud_sdk::Result<serde_json::Value> {
//!     Collection::new(client, "vpcs")?.get("my-vpc").await
//! }
//! ```

pub mod dispatch;
mod fetcher;
mod registry;
mod resolver;

pub use fetcher::{
    extract_items, extract_json_value, fetch_resources, fetch_resources_paginated, find_by_field,
    next_page_params, PaginatedResult,
};
pub use registry::*;
pub use resolver::{get_by_name, resolve, resolve_id};

use crate::error::{Error, Result};
use crate::ibm::client::{IbmClient, Query, QueryResponse};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Where a resource lives: parent ids for nested paths, plus headers every
/// request in that scope carries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub parents: Vec<String>,
    pub headers: Vec<(String, String)>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn under(parents: &[&str]) -> Self {
        Self {
            parents: parents.iter().map(|p| p.to_string()).collect(),
            headers: Vec::new(),
        }
    }

    /// Same headers, one more parent
    pub fn child(&self, parent: &str) -> Self {
        let mut scope = self.clone();
        scope.parents.push(parent.to_string());
        scope
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// One resource collection bound to a client and a scope
#[derive(Clone)]
pub struct Collection<'a> {
    client: &'a IbmClient,
    def: &'static ResourceDef,
    scope: Scope,
}

impl<'a> Collection<'a> {
    pub fn new(client: &'a IbmClient, key: &str) -> Result<Self> {
        Self::scoped(client, key, Scope::root())
    }

    pub fn scoped(client: &'a IbmClient, key: &str, scope: Scope) -> Result<Self> {
        Ok(Self {
            client,
            def: resource_def(key)?,
            scope,
        })
    }

    pub fn client(&self) -> &'a IbmClient {
        self.client
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// List every item, following pagination
    pub async fn list(&self) -> Result<Vec<Value>> {
        fetch_resources(self.client, self.def, &self.scope).await
    }

    /// Resolve an identifier through the lookup chain
    pub async fn get(&self, identifier: &str) -> Result<Value> {
        resolve(self.client, self.def, &self.scope, identifier).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Value> {
        fetcher::fetch_by_id(self.client, self.def, &self.scope, id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Value> {
        get_by_name(self.client, self.def, &self.scope, name).await
    }

    /// Resolve an identifier to the canonical id
    pub async fn resolve_id(&self, identifier: &str) -> Result<String> {
        resolve_id(self.client, self.def, &self.scope, identifier).await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        fetcher::create_resource(self.client, self.def, &self.scope, body).await
    }

    pub async fn update(&self, identifier: &str, patch: Value) -> Result<Value> {
        let id = self.resolve_id(identifier).await?;
        fetcher::update_resource(self.client, self.def, &self.scope, &id, patch).await
    }

    /// Check the item exists, then delete it
    pub async fn delete(&self, identifier: &str) -> Result<()> {
        let id = self.resolve_id(identifier).await?;
        fetcher::delete_by_id(self.client, self.def, &self.scope, &id).await
    }

    /// Path of one item in this collection
    pub fn item_path(&self, id: &str) -> Result<String> {
        self.def.item_path(&self.scope.parents, id)
    }

    /// POST to a sub-path of an item (an action endpoint), with the scope's headers
    pub async fn post_to_item(&self, id: &str, suffix: &str, body: Value) -> Result<Value> {
        let path = format!("{}/{}", self.item_path(id)?, suffix);
        let query = Query::post(self.def.connection, path)
            .headers(&self.scope.headers)
            .json(body);
        Ok(self.client.query(query).await?.error_for_status()?.into_data())
    }

    /// A nested collection under one of this collection's items
    pub async fn nested(&self, identifier: &str, key: &str) -> Result<Collection<'a>> {
        let id = self.resolve_id(identifier).await?;
        self.child(&id, key)
    }

    /// A nested collection under an item whose id is already known
    pub fn child(&self, id: &str, key: &str) -> Result<Collection<'a>> {
        Collection::scoped(self.client, key, self.scope.child(id))
    }
}

/// Treat 204 as success and anything else as an API error carrying the body
pub fn expect_no_content(response: QueryResponse) -> Result<()> {
    if response.status == StatusCode::NO_CONTENT {
        Ok(())
    } else {
        Err(Error::from_response(response.status, response.data))
    }
}

/// Require a non-empty argument
pub fn require<'r>(value: Option<&'r str>, name: &'static str) -> Result<&'r str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::MissingArgument(name)),
    }
}

/// `{"id": "<id>"}` reference object
pub fn id_ref(id: &str) -> Value {
    json!({ "id": id })
}

/// `{"name": "<name>"}` reference object
pub fn name_ref(name: &str) -> Value {
    json!({ "name": name })
}

/// Insert `key: value` when the value is present
pub fn insert_opt<T: Into<Value>>(body: &mut Value, key: &str, value: Option<T>) {
    if let (Some(map), Some(value)) = (body.as_object_mut(), value) {
        map.insert(key.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require(Some("vpc-1"), "vpc").unwrap(), "vpc-1");
        assert!(matches!(require(None, "vpc"), Err(Error::MissingArgument("vpc"))));
        assert!(matches!(require(Some("  "), "vpc"), Err(Error::MissingArgument("vpc"))));
    }

    #[test]
    fn test_scope_child_keeps_headers() {
        let scope = Scope::under(&["a"]).with_header("CRN", "crn:v1");
        let child = scope.child("b");
        assert_eq!(child.parents, vec!["a", "b"]);
        assert_eq!(child.headers, scope.headers);
    }

    #[test]
    fn test_insert_opt() {
        let mut body = json!({"name": "x"});
        insert_opt(&mut body, "zone", Some(name_ref("us-south-1")));
        insert_opt::<String>(&mut body, "skipped", None);
        assert_eq!(body["zone"]["name"], "us-south-1");
        assert!(body.get("skipped").is_none());
    }
}
