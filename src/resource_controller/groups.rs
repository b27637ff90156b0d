//! Resource groups

use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{id_ref, require, Collection};
use serde_json::{json, Value};

/// Request to create a resource group
#[derive(Debug, Clone, Default)]
pub struct CreateResourceGroup {
    pub name: Option<String>,
    /// Defaults to the account of the current token
    pub account_id: Option<String>,
}

/// Resource group operations
pub struct ResourceGroups<'a> {
    groups: Collection<'a>,
}

impl<'a> ResourceGroups<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            groups: Collection::new(client, "resource-groups")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.groups.list().await
    }

    /// Get a resource group by name or id
    pub async fn get(&self, group: &str) -> Result<Value> {
        self.groups.get(group).await
    }

    pub async fn resolve_id(&self, group: &str) -> Result<String> {
        self.groups.resolve_id(group).await
    }

    /// The account's default resource group
    pub async fn default_group(&self) -> Result<Value> {
        self.list()
            .await?
            .into_iter()
            .find(|g| g.get("default").and_then(|d| d.as_bool()).unwrap_or(false))
            .ok_or_else(|| Error::not_found("Resource group", "default"))
    }

    pub async fn create(&self, request: &CreateResourceGroup) -> Result<Value> {
        let name = require(request.name.as_deref(), "name")?;

        let account_id = match &request.account_id {
            Some(account) => account.clone(),
            None => self
                .groups
                .client()
                .get_token()
                .await?
                .account_id
                .ok_or(Error::MissingArgument("account_id"))?,
        };

        self.groups
            .create(json!({ "name": name, "account_id": account_id }))
            .await
    }

    pub async fn rename(&self, group: &str, name: &str) -> Result<Value> {
        let id = self.resolve_id(group).await?;
        let client = self.groups.client();
        let path = self.groups.item_path(&id)?;
        client
            .patch(self.groups.def().connection, &path, json!({ "name": name }))
            .await
    }

    pub async fn delete(&self, group: &str) -> Result<()> {
        self.groups.delete(group).await
    }
}

/// Resolve an optional resource group to a `{"id": ...}` reference
pub async fn resource_group_ref(client: &IbmClient, group: Option<&str>) -> Result<Option<Value>> {
    match group {
        Some(group) => {
            let id = ResourceGroups::new(client)?.resolve_id(group).await?;
            Ok(Some(id_ref(&id)))
        },
        None => Ok(None),
    }
}
