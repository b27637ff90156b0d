//! SSH keys

use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to import a public key
#[derive(Debug, Clone, Default)]
pub struct CreateKey {
    pub name: Option<String>,
    pub public_key: Option<String>,
    /// Defaults to `rsa`
    pub key_type: Option<String>,
    pub resource_group: Option<String>,
}

/// Key operations
pub struct Keys<'a> {
    keys: Collection<'a>,
}

impl<'a> Keys<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            keys: Collection::new(client, "keys")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.keys.list().await
    }

    /// Get a key by name, id or fingerprint
    pub async fn get(&self, key: &str) -> Result<Value> {
        self.keys.get(key).await
    }

    pub async fn resolve_id(&self, key: &str) -> Result<String> {
        self.keys.resolve_id(key).await
    }

    pub async fn create(&self, request: &CreateKey) -> Result<Value> {
        let public_key = require(request.public_key.as_deref(), "public_key")?;

        let mut body = json!({
            "public_key": public_key.trim(),
            "type": request.key_type.as_deref().unwrap_or("rsa"),
        });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(self.keys.client(), request.resource_group.as_deref()).await?,
        );

        self.keys.create(body).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.keys.delete(key).await
    }
}
