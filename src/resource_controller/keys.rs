//! Resource keys (service credentials)

use super::instances::ResourceInstances;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Platform roles; everything else is a service role
const PLATFORM_ROLES: &[&str] = &["Administrator", "Editor", "Operator", "Viewer"];

/// Expand a short role name to its IAM role CRN
pub fn role_crn(role: &str) -> String {
    if role.starts_with("crn:") {
        role.to_string()
    } else if PLATFORM_ROLES.contains(&role) {
        format!("crn:v1:bluemix:public:iam::::role:{}", role)
    } else {
        format!("crn:v1:bluemix:public:iam::::serviceRole:{}", role)
    }
}

/// Request to create a resource key
#[derive(Debug, Clone, Default)]
pub struct CreateResourceKey {
    pub name: Option<String>,
    /// Resource instance name, id, GUID or CRN
    pub source: Option<String>,
    /// Role name (`Writer`) or role CRN
    pub role: Option<String>,
    pub parameters: Option<Value>,
}

/// Resource key operations
pub struct ResourceKeys<'a> {
    keys: Collection<'a>,
}

impl<'a> ResourceKeys<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            keys: Collection::new(client, "resource-keys")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.keys.list().await
    }

    /// Get a resource key by name, id or GUID
    pub async fn get(&self, key: &str) -> Result<Value> {
        self.keys.get(key).await
    }

    pub async fn create(&self, request: &CreateResourceKey) -> Result<Value> {
        let name = require(request.name.as_deref(), "name")?;
        let source = require(request.source.as_deref(), "source")?;

        let guid = ResourceInstances::new(self.keys.client())?.guid(source).await?;

        let mut body = json!({ "name": name, "source": guid });
        insert_opt(&mut body, "role", request.role.as_deref().map(role_crn));
        insert_opt(&mut body, "parameters", request.parameters.clone());

        self.keys.create(body).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.keys.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_crn() {
        assert_eq!(role_crn("Writer"), "crn:v1:bluemix:public:iam::::serviceRole:Writer");
        assert_eq!(role_crn("Viewer"), "crn:v1:bluemix:public:iam::::role:Viewer");
        assert_eq!(role_crn("crn:v1:custom"), "crn:v1:custom");
    }
}
