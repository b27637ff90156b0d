//! Resource instances

use super::groups::ResourceGroups;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Request to provision a resource instance
#[derive(Debug, Clone, Default)]
pub struct CreateResourceInstance {
    pub name: Option<String>,
    /// Deployment target, e.g. `us-south` or `global`
    pub target: Option<String>,
    /// Resource group name or id
    pub resource_group: Option<String>,
    pub resource_plan_id: Option<String>,
    pub parameters: Option<Value>,
    pub tags: Vec<String>,
}

/// Resource instance operations
pub struct ResourceInstances<'a> {
    instances: Collection<'a>,
}

impl<'a> ResourceInstances<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            instances: Collection::new(client, "resource-instances")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.instances.list().await
    }

    /// Get a resource instance by name, id, GUID or CRN
    pub async fn get(&self, instance: &str) -> Result<Value> {
        self.instances.get(instance).await
    }

    /// String field of a resource instance record
    pub fn string_field(record: &Value, field: &str) -> Result<String> {
        record
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Unexpected(format!("resource instance has no '{}'", field)))
    }

    /// GUID of a resource instance
    pub async fn guid(&self, instance: &str) -> Result<String> {
        let item = self.get(instance).await?;
        Self::string_field(&item, "guid")
    }

    /// CRN of a resource instance
    pub async fn crn(&self, instance: &str) -> Result<String> {
        let item = self.get(instance).await?;
        Self::string_field(&item, "crn")
    }

    pub async fn create(&self, request: &CreateResourceInstance) -> Result<Value> {
        let name = require(request.name.as_deref(), "name")?;
        let target = require(request.target.as_deref(), "target")?;
        let group = require(request.resource_group.as_deref(), "resource_group")?;
        let plan = require(request.resource_plan_id.as_deref(), "resource_plan_id")?;

        let group_id = ResourceGroups::new(self.instances.client())?
            .resolve_id(group)
            .await?;

        let mut body = json!({
            "name": name,
            "target": target,
            "resource_group": group_id,
            "resource_plan_id": plan,
        });
        insert_opt(&mut body, "parameters", request.parameters.clone());
        if !request.tags.is_empty() {
            insert_opt(&mut body, "tags", Some(request.tags.clone()));
        }

        self.instances.create(body).await
    }

    pub async fn delete(&self, instance: &str) -> Result<()> {
        self.instances.delete(instance).await
    }
}
