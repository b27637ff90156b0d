//! VPCs, address prefixes and routes

use crate::config::Connection;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to create a VPC
#[derive(Debug, Clone, Default)]
pub struct CreateVpc {
    pub name: Option<String>,
    /// Resource group name or id
    pub resource_group: Option<String>,
    pub classic_access: Option<bool>,
    /// `auto` or `manual`
    pub address_prefix_management: Option<String>,
}

/// Request to add an address prefix to a VPC
#[derive(Debug, Clone, Default)]
pub struct CreateAddressPrefix {
    pub name: Option<String>,
    pub cidr: Option<String>,
    pub zone: Option<String>,
    pub is_default: Option<bool>,
}

/// Request to add a static route to a VPC
#[derive(Debug, Clone, Default)]
pub struct CreateRoute {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub zone: Option<String>,
    /// Next hop IP address
    pub next_hop: Option<String>,
}

/// VPC operations
pub struct Vpcs<'a> {
    vpcs: Collection<'a>,
}

impl<'a> Vpcs<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            vpcs: Collection::new(client, "vpcs")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.vpcs.list().await
    }

    /// Get a VPC by name or id
    pub async fn get(&self, vpc: &str) -> Result<Value> {
        self.vpcs.get(vpc).await
    }

    pub async fn resolve_id(&self, vpc: &str) -> Result<String> {
        self.vpcs.resolve_id(vpc).await
    }

    pub async fn create(&self, request: &CreateVpc) -> Result<Value> {
        let client = self.vpcs.client();
        let mut body = json!({});
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "classic_access", request.classic_access);
        insert_opt(
            &mut body,
            "address_prefix_management",
            request.address_prefix_management.clone(),
        );
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );

        self.vpcs.create(body).await
    }

    pub async fn delete(&self, vpc: &str) -> Result<()> {
        self.vpcs.delete(vpc).await
    }

    pub async fn default_network_acl(&self, vpc: &str) -> Result<Value> {
        self.vpc_sub_resource(vpc, "default_network_acl").await
    }

    pub async fn default_security_group(&self, vpc: &str) -> Result<Value> {
        self.vpc_sub_resource(vpc, "default_security_group").await
    }

    async fn vpc_sub_resource(&self, vpc: &str, resource: &str) -> Result<Value> {
        let id = self.resolve_id(vpc).await?;
        let path = format!("{}/{}", self.vpcs.item_path(&id)?, resource);
        self.vpcs.client().get(Connection::Iaas, &path).await
    }

    // =========================================================================
    // Address prefixes
    // =========================================================================

    pub async fn address_prefixes(&self, vpc: &str) -> Result<Collection<'a>> {
        self.vpcs.nested(vpc, "vpc-address-prefixes").await
    }

    pub async fn create_address_prefix(&self, vpc: &str, request: &CreateAddressPrefix) -> Result<Value> {
        let cidr = require(request.cidr.as_deref(), "cidr")?;
        let zone = require(request.zone.as_deref(), "zone")?;

        let mut body = json!({ "cidr": cidr, "zone": name_ref(zone) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "is_default", request.is_default);

        self.address_prefixes(vpc).await?.create(body).await
    }

    // =========================================================================
    // Routes
    // =========================================================================

    pub async fn routes(&self, vpc: &str) -> Result<Collection<'a>> {
        self.vpcs.nested(vpc, "vpc-routes").await
    }

    pub async fn create_route(&self, vpc: &str, request: &CreateRoute) -> Result<Value> {
        let destination = require(request.destination.as_deref(), "destination")?;
        let zone = require(request.zone.as_deref(), "zone")?;
        let next_hop = require(request.next_hop.as_deref(), "next_hop")?;

        let mut body = json!({
            "destination": destination,
            "zone": name_ref(zone),
            "next_hop": { "address": next_hop },
        });
        insert_opt(&mut body, "name", request.name.clone());

        self.routes(vpc).await?.create(body).await
    }
}
