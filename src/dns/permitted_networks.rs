//! Networks permitted to resolve a DNS zone

use crate::error::{Error, Result};
use crate::resource::Collection;
use crate::vpc::Vpcs;
use serde_json::{json, Value};

/// Permitted network operations for one zone
pub struct PermittedNetworks<'a> {
    networks: Collection<'a>,
}

impl<'a> From<Collection<'a>> for PermittedNetworks<'a> {
    fn from(networks: Collection<'a>) -> Self {
        Self { networks }
    }
}

impl<'a> PermittedNetworks<'a> {
    pub async fn list(&self) -> Result<Vec<Value>> {
        self.networks.list().await
    }

    pub async fn get(&self, network_id: &str) -> Result<Value> {
        self.networks.get(network_id).await
    }

    /// Permit a VPC (name or id) to resolve the zone
    pub async fn add(&self, vpc: &str) -> Result<Value> {
        let record = Vpcs::new(self.networks.client())?.get(vpc).await?;
        let crn = record
            .get("crn")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Unexpected(format!("VPC '{}' has no CRN", vpc)))?;

        let body = json!({ "type": "vpc", "permitted_network": { "vpc_crn": crn } });
        self.networks.create(body).await
    }

    pub async fn remove(&self, network_id: &str) -> Result<()> {
        self.networks.delete(network_id).await
    }
}
