//! Subnets

use super::network_acls::NetworkAcls;
use super::public_gateways::PublicGateways;
use super::vpcs::Vpcs;
use crate::config::Connection;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{expect_no_content, id_ref, insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to create a subnet.
///
/// Give either `ipv4_cidr_block`, or `total_ipv4_address_count` together with
/// `zone`.
#[derive(Debug, Clone, Default)]
pub struct CreateSubnet {
    pub name: Option<String>,
    /// VPC name or id
    pub vpc: Option<String>,
    pub zone: Option<String>,
    pub ipv4_cidr_block: Option<String>,
    pub total_ipv4_address_count: Option<u32>,
    pub ip_version: Option<String>,
    pub resource_group: Option<String>,
    /// Network ACL name or id
    pub network_acl: Option<String>,
    /// Public gateway name or id
    pub public_gateway: Option<String>,
}

/// Subnet operations
pub struct Subnets<'a> {
    subnets: Collection<'a>,
}

impl<'a> Subnets<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            subnets: Collection::new(client, "subnets")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.subnets.list().await
    }

    /// Get a subnet by name or id
    pub async fn get(&self, subnet: &str) -> Result<Value> {
        self.subnets.get(subnet).await
    }

    pub async fn resolve_id(&self, subnet: &str) -> Result<String> {
        self.subnets.resolve_id(subnet).await
    }

    pub async fn create(&self, request: &CreateSubnet) -> Result<Value> {
        let vpc = require(request.vpc.as_deref(), "vpc")?;

        if request.ipv4_cidr_block.is_none() && request.total_ipv4_address_count.is_none() {
            return Err(Error::MissingArgument("ipv4_cidr_block"));
        }
        if request.ipv4_cidr_block.is_none() {
            require(request.zone.as_deref(), "zone")?;
        }

        let client = self.subnets.client();
        let vpc_id = Vpcs::new(client)?.resolve_id(vpc).await?;

        let mut body = json!({ "vpc": id_ref(&vpc_id) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "ipv4_cidr_block", request.ipv4_cidr_block.clone());
        insert_opt(&mut body, "total_ipv4_address_count", request.total_ipv4_address_count);
        insert_opt(&mut body, "ip_version", request.ip_version.clone());
        insert_opt(&mut body, "zone", request.zone.as_deref().map(name_ref));
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );

        if let Some(acl) = &request.network_acl {
            let id = NetworkAcls::new(client)?.resolve_id(acl).await?;
            insert_opt(&mut body, "network_acl", Some(id_ref(&id)));
        }
        if let Some(gateway) = &request.public_gateway {
            let id = PublicGateways::new(client)?.resolve_id(gateway).await?;
            insert_opt(&mut body, "public_gateway", Some(id_ref(&id)));
        }

        self.subnets.create(body).await
    }

    pub async fn delete(&self, subnet: &str) -> Result<()> {
        self.subnets.delete(subnet).await
    }

    /// Public gateway attached to a subnet
    pub async fn public_gateway(&self, subnet: &str) -> Result<Value> {
        let path = self.sub_path(subnet, "public_gateway").await?;
        self.subnets.client().get(Connection::Iaas, &path).await
    }

    pub async fn attach_public_gateway(&self, subnet: &str, gateway: &str) -> Result<Value> {
        let client = self.subnets.client();
        let gateway_id = PublicGateways::new(client)?.resolve_id(gateway).await?;
        let path = self.sub_path(subnet, "public_gateway").await?;
        client.put(Connection::Iaas, &path, id_ref(&gateway_id)).await
    }

    pub async fn detach_public_gateway(&self, subnet: &str) -> Result<()> {
        let path = self.sub_path(subnet, "public_gateway").await?;
        expect_no_content(self.subnets.client().delete(Connection::Iaas, &path).await?)
    }

    /// Replace the network ACL of a subnet
    pub async fn attach_network_acl(&self, subnet: &str, acl: &str) -> Result<Value> {
        let client = self.subnets.client();
        let acl_id = NetworkAcls::new(client)?.resolve_id(acl).await?;
        let path = self.sub_path(subnet, "network_acl").await?;
        client.put(Connection::Iaas, &path, id_ref(&acl_id)).await
    }

    pub async fn reserved_ips(&self, subnet: &str) -> Result<Collection<'a>> {
        self.subnets.nested(subnet, "subnet-reserved-ips").await
    }

    async fn sub_path(&self, subnet: &str, resource: &str) -> Result<String> {
        let id = self.resolve_id(subnet).await?;
        Ok(format!("{}/{}", self.subnets.item_path(&id)?, resource))
    }
}
