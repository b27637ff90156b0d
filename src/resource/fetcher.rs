//! Resource Fetcher
//!
//! Generic list/get/create/delete operations driven by resource definitions.

use super::registry::{identifier_string, ResourceDef};
use super::Scope;
use crate::ibm::client::{IbmClient, Query};
use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

/// Query parameters never carried over from pagination links
const MANAGED_PARAMS: &[&str] = &["version", "generation"];

/// Result of paginated fetch
pub struct PaginatedResult {
    pub items: Vec<Value>,
    /// Query parameters for the next page, if any
    pub next: Option<Vec<(String, String)>>,
}

/// Fetch all resources (auto-paginate)
pub async fn fetch_resources(client: &IbmClient, def: &ResourceDef, scope: &Scope) -> Result<Vec<Value>> {
    let mut all_items = Vec::new();
    let mut page: Vec<(String, String)> = Vec::new();
    let mut seen = HashSet::from([page.clone()]);

    loop {
        let result = fetch_resources_paginated(client, def, scope, &page).await?;
        all_items.extend(result.items);

        match result.next {
            Some(next) if seen.insert(next.clone()) => page = next,
            Some(next) => {
                tracing::warn!("{} pagination loops back to {:?}, stopping", def.display_name, next);
                break;
            },
            None => break,
        }
    }

    Ok(all_items)
}

/// Fetch one page of resources
pub async fn fetch_resources_paginated(
    client: &IbmClient,
    def: &ResourceDef,
    scope: &Scope,
    page: &[(String, String)],
) -> Result<PaginatedResult> {
    let path = def.collection_path(&scope.parents)?;

    let mut params = def.list_params();
    // Page links repeat the list parameters; theirs win
    params.retain(|(k, _)| !page.iter().any(|(pk, _)| pk == k));
    params.extend_from_slice(page);

    let query = Query::get(def.connection, path)
        .params(&params)
        .headers(&scope.headers);

    let response = client.query(query).await?.error_for_status()?.into_data();

    let items = extract_items(&response, &def.response_path);
    let next = next_page_params(&response);

    Ok(PaginatedResult { items, next })
}

/// GET a single item by id. 404 becomes `Error::NotFound`.
pub async fn fetch_by_id(client: &IbmClient, def: &ResourceDef, scope: &Scope, id: &str) -> Result<Value> {
    let path = def.item_path(&scope.parents, id)?;
    let response = client
        .query(Query::get(def.connection, path).headers(&scope.headers))
        .await?;

    if response.status == StatusCode::NOT_FOUND {
        return Err(Error::not_found(&def.display_name, id));
    }

    Ok(response.error_for_status()?.into_data())
}

/// POST a payload to the create path
pub async fn create_resource(client: &IbmClient, def: &ResourceDef, scope: &Scope, body: Value) -> Result<Value> {
    let path = def.create_path(&scope.parents)?;
    tracing::info!("Creating {} at {}", def.display_name, path);

    let response = client
        .query(Query::post(def.connection, path).headers(&scope.headers).json(body))
        .await?;

    Ok(response.error_for_status()?.into_data())
}

/// PATCH an item by id
pub async fn update_resource(
    client: &IbmClient,
    def: &ResourceDef,
    scope: &Scope,
    id: &str,
    patch: Value,
) -> Result<Value> {
    let path = def.item_path(&scope.parents, id)?;
    let response = client
        .query(Query::patch(def.connection, path).headers(&scope.headers).json(patch))
        .await?;

    if response.status == StatusCode::NOT_FOUND {
        return Err(Error::not_found(&def.display_name, id));
    }

    Ok(response.error_for_status()?.into_data())
}

/// DELETE an item by id.
///
/// Only the definition's delete statuses count as success; any other status
/// is returned as `Error::Api` carrying the response body.
pub async fn delete_by_id(client: &IbmClient, def: &ResourceDef, scope: &Scope, id: &str) -> Result<()> {
    let path = def.delete_path(&scope.parents, id)?;
    tracing::info!("Deleting {} {}", def.display_name, id);

    let response = client
        .query(Query::delete(def.connection, path).headers(&scope.headers))
        .await?;

    if def.delete_status.contains(&response.status.as_u16()) {
        Ok(())
    } else {
        Err(Error::from_response(response.status, response.data))
    }
}

/// Extract items from response using the response_path
pub fn extract_items(response: &Value, path: &str) -> Vec<Value> {
    if path.is_empty() {
        return response.as_array().cloned().unwrap_or_default();
    }

    let mut current = response;
    for part in path.split('.') {
        current = match current.get(part) {
            Some(v) => v,
            None => return vec![],
        };
    }

    current.as_array().cloned().unwrap_or_default()
}

/// Query parameters of the next page link.
///
/// IaaS and DNS answer `{"next": {"href": "..."}}`, the resource controller
/// answers `{"next_url": "/v2/...?..."}`.
pub fn next_page_params(response: &Value) -> Option<Vec<(String, String)>> {
    let link = response
        .get("next")
        .and_then(|n| n.get("href"))
        .or_else(|| response.get("next_url"))
        .and_then(|v| v.as_str())?;

    let url = Url::parse(link)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(link)))
        .ok()?;

    let params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !MANAGED_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

/// Find the first item whose field renders equal to the identifier
pub fn find_by_field<'a>(items: &'a [Value], field: &str, identifier: &str) -> Option<&'a Value> {
    items.iter().find(|item| {
        item.get(field)
            .and_then(identifier_string)
            .map(|v| v == identifier)
            .unwrap_or(false)
    })
}

/// Extract a value from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let mut current = item;

    for part in path.split('.') {
        // Handle array index
        let next = if let Ok(idx) = part.parse::<usize>() {
            current.get(idx)
        } else {
            current.get(part)
        };
        current = match next {
            Some(v) => v,
            None => return "-".to_string(),
        };
    }

    match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}
