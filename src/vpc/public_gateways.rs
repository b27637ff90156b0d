//! Public gateways

use super::floating_ips::FloatingIps;
use super::vpcs::Vpcs;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{id_ref, insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to create a public gateway
#[derive(Debug, Clone, Default)]
pub struct CreatePublicGateway {
    pub name: Option<String>,
    /// VPC name or id
    pub vpc: Option<String>,
    pub zone: Option<String>,
    /// Existing floating IP (name, id or address); a new one is reserved
    /// when omitted
    pub floating_ip: Option<String>,
    pub resource_group: Option<String>,
}

/// Public gateway operations
pub struct PublicGateways<'a> {
    gateways: Collection<'a>,
}

impl<'a> PublicGateways<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            gateways: Collection::new(client, "public-gateways")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.gateways.list().await
    }

    /// Get a public gateway by name or id
    pub async fn get(&self, gateway: &str) -> Result<Value> {
        self.gateways.get(gateway).await
    }

    pub async fn resolve_id(&self, gateway: &str) -> Result<String> {
        self.gateways.resolve_id(gateway).await
    }

    pub async fn create(&self, request: &CreatePublicGateway) -> Result<Value> {
        let vpc = require(request.vpc.as_deref(), "vpc")?;
        let zone = require(request.zone.as_deref(), "zone")?;

        let client = self.gateways.client();
        let vpc_id = Vpcs::new(client)?.resolve_id(vpc).await?;

        let mut body = json!({ "vpc": id_ref(&vpc_id), "zone": name_ref(zone) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );

        if let Some(fip) = &request.floating_ip {
            let id = FloatingIps::new(client)?.resolve_id(fip).await?;
            insert_opt(&mut body, "floating_ip", Some(id_ref(&id)));
        }

        self.gateways.create(body).await
    }

    pub async fn delete(&self, gateway: &str) -> Result<()> {
        self.gateways.delete(gateway).await
    }
}
