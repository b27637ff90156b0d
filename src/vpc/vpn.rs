//! VPN gateways, connections and policies

use super::subnets::Subnets;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{id_ref, insert_opt, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to create a VPN gateway
#[derive(Debug, Clone, Default)]
pub struct CreateVpnGateway {
    pub name: Option<String>,
    /// Subnet name or id
    pub subnet: Option<String>,
    /// `route` or `policy`
    pub mode: Option<String>,
    pub resource_group: Option<String>,
}

/// Request to create a VPN connection
#[derive(Debug, Clone, Default)]
pub struct CreateVpnConnection {
    pub name: Option<String>,
    pub peer_address: Option<String>,
    pub psk: Option<String>,
    pub local_cidrs: Vec<String>,
    pub peer_cidrs: Vec<String>,
    /// IKE policy name or id
    pub ike_policy: Option<String>,
    /// IPsec policy name or id
    pub ipsec_policy: Option<String>,
    pub admin_state_up: Option<bool>,
}

/// Request to create an IKE policy
#[derive(Debug, Clone, Default)]
pub struct CreateIkePolicy {
    pub name: Option<String>,
    pub authentication_algorithm: Option<String>,
    pub encryption_algorithm: Option<String>,
    pub dh_group: Option<u32>,
    pub ike_version: Option<u32>,
    pub key_lifetime: Option<u32>,
    pub resource_group: Option<String>,
}

/// Request to create an IPsec policy
#[derive(Debug, Clone, Default)]
pub struct CreateIpsecPolicy {
    pub name: Option<String>,
    pub authentication_algorithm: Option<String>,
    pub encryption_algorithm: Option<String>,
    /// Perfect forward secrecy group, e.g. `group_14` or `disabled`
    pub pfs: Option<String>,
    pub key_lifetime: Option<u32>,
    pub resource_group: Option<String>,
}

/// VPN gateway operations
pub struct VpnGateways<'a> {
    gateways: Collection<'a>,
    ike_policies: Collection<'a>,
    ipsec_policies: Collection<'a>,
}

impl<'a> VpnGateways<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            gateways: Collection::new(client, "vpn-gateways")?,
            ike_policies: Collection::new(client, "ike-policies")?,
            ipsec_policies: Collection::new(client, "ipsec-policies")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.gateways.list().await
    }

    /// Get a VPN gateway by name or id
    pub async fn get(&self, gateway: &str) -> Result<Value> {
        self.gateways.get(gateway).await
    }

    pub async fn create(&self, request: &CreateVpnGateway) -> Result<Value> {
        let subnet = require(request.subnet.as_deref(), "subnet")?;

        let client = self.gateways.client();
        let subnet_id = Subnets::new(client)?.resolve_id(subnet).await?;

        let mut body = json!({ "subnet": id_ref(&subnet_id) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "mode", request.mode.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );

        self.gateways.create(body).await
    }

    pub async fn delete(&self, gateway: &str) -> Result<()> {
        self.gateways.delete(gateway).await
    }

    // =========================================================================
    // Connections
    // =========================================================================

    pub async fn connections(&self, gateway: &str) -> Result<Collection<'a>> {
        self.gateways.nested(gateway, "vpn-gateway-connections").await
    }

    pub async fn create_connection(&self, gateway: &str, request: &CreateVpnConnection) -> Result<Value> {
        let peer_address = require(request.peer_address.as_deref(), "peer_address")?;
        let psk = require(request.psk.as_deref(), "psk")?;

        let mut body = json!({ "peer_address": peer_address, "psk": psk });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "admin_state_up", request.admin_state_up);
        if !request.local_cidrs.is_empty() {
            insert_opt(&mut body, "local_cidrs", Some(request.local_cidrs.clone()));
        }
        if !request.peer_cidrs.is_empty() {
            insert_opt(&mut body, "peer_cidrs", Some(request.peer_cidrs.clone()));
        }
        if let Some(policy) = &request.ike_policy {
            let id = self.ike_policies.resolve_id(policy).await?;
            insert_opt(&mut body, "ike_policy", Some(id_ref(&id)));
        }
        if let Some(policy) = &request.ipsec_policy {
            let id = self.ipsec_policies.resolve_id(policy).await?;
            insert_opt(&mut body, "ipsec_policy", Some(id_ref(&id)));
        }

        self.connections(gateway).await?.create(body).await
    }

    // =========================================================================
    // Policies
    // =========================================================================

    pub fn ike_policies(&self) -> &Collection<'a> {
        &self.ike_policies
    }

    pub fn ipsec_policies(&self) -> &Collection<'a> {
        &self.ipsec_policies
    }

    pub async fn create_ike_policy(&self, request: &CreateIkePolicy) -> Result<Value> {
        let authentication = require(request.authentication_algorithm.as_deref(), "authentication_algorithm")?;
        let encryption = require(request.encryption_algorithm.as_deref(), "encryption_algorithm")?;
        let dh_group = request.dh_group.ok_or(Error::MissingArgument("dh_group"))?;

        let mut body = json!({
            "authentication_algorithm": authentication,
            "encryption_algorithm": encryption,
            "dh_group": dh_group,
        });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "ike_version", request.ike_version);
        insert_opt(&mut body, "key_lifetime", request.key_lifetime);
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(self.gateways.client(), request.resource_group.as_deref()).await?,
        );

        self.ike_policies.create(body).await
    }

    pub async fn create_ipsec_policy(&self, request: &CreateIpsecPolicy) -> Result<Value> {
        let authentication = require(request.authentication_algorithm.as_deref(), "authentication_algorithm")?;
        let encryption = require(request.encryption_algorithm.as_deref(), "encryption_algorithm")?;
        let pfs = require(request.pfs.as_deref(), "pfs")?;

        let mut body = json!({
            "authentication_algorithm": authentication,
            "encryption_algorithm": encryption,
            "pfs": pfs,
        });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "key_lifetime", request.key_lifetime);
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(self.gateways.client(), request.resource_group.as_deref()).await?,
        );

        self.ipsec_policies.create(body).await
    }
}
