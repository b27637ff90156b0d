//! Resource bindings

use super::keys::role_crn;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Request to bind a resource alias to an application
#[derive(Debug, Clone, Default)]
pub struct CreateResourceBinding {
    pub name: Option<String>,
    /// Resource alias GUID or CRN
    pub source: Option<String>,
    /// CRN of the application being bound
    pub target: Option<String>,
    pub role: Option<String>,
    pub parameters: Option<Value>,
}

/// Resource binding operations
pub struct ResourceBindings<'a> {
    bindings: Collection<'a>,
}

impl<'a> ResourceBindings<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            bindings: Collection::new(client, "resource-bindings")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.bindings.list().await
    }

    /// Get a resource binding by name, id or GUID
    pub async fn get(&self, binding: &str) -> Result<Value> {
        self.bindings.get(binding).await
    }

    pub async fn create(&self, request: &CreateResourceBinding) -> Result<Value> {
        let source = require(request.source.as_deref(), "source")?;
        let target = require(request.target.as_deref(), "target")?;

        let mut body = json!({ "source": source, "target": target });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "role", request.role.as_deref().map(role_crn));
        insert_opt(&mut body, "parameters", request.parameters.clone());

        self.bindings.create(body).await
    }

    pub async fn delete(&self, binding: &str) -> Result<()> {
        self.bindings.delete(binding).await
    }
}
