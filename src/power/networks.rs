//! Power networks

use super::PowerCloud;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Request to create a Power network
#[derive(Debug, Clone, Default)]
pub struct CreatePowerNetwork {
    pub name: Option<String>,
    /// `vlan` (private) or `pub-vlan`; defaults to `vlan`
    pub network_type: Option<String>,
    /// Required for `vlan`
    pub cidr: Option<String>,
    pub gateway: Option<String>,
    pub dns_servers: Vec<String>,
}

/// Network operations within one Power cloud instance
pub struct PowerNetworks<'a> {
    networks: Collection<'a>,
}

impl<'a> PowerNetworks<'a> {
    pub async fn new(client: &'a IbmClient, cloud_instance: &str) -> Result<Self> {
        let cloud = PowerCloud::resolve(client, cloud_instance).await?;
        Self::in_cloud(client, cloud)
    }

    pub fn in_cloud(client: &'a IbmClient, cloud: PowerCloud) -> Result<Self> {
        Ok(Self {
            networks: Collection::scoped(client, "power-networks", cloud.scope())?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.networks.list().await
    }

    /// Get a network by name or id
    pub async fn get(&self, network: &str) -> Result<Value> {
        self.networks.get(network).await
    }

    pub async fn resolve_id(&self, network: &str) -> Result<String> {
        self.networks.resolve_id(network).await
    }

    pub async fn create(&self, request: &CreatePowerNetwork) -> Result<Value> {
        let network_type = request.network_type.as_deref().unwrap_or("vlan");
        if network_type == "vlan" {
            require(request.cidr.as_deref(), "cidr")?;
        }

        let mut body = json!({ "type": network_type });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "cidr", request.cidr.clone());
        insert_opt(&mut body, "gateway", request.gateway.clone());
        if !request.dns_servers.is_empty() {
            insert_opt(&mut body, "dnsServers", Some(request.dns_servers.clone()));
        }

        self.networks.create(body).await
    }

    pub async fn delete(&self, network: &str) -> Result<()> {
        self.networks.delete(network).await
    }
}
