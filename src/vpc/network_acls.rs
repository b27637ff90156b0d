//! Network ACLs

use super::vpcs::Vpcs;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{id_ref, insert_opt, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// One ACL rule
#[derive(Debug, Clone, Default)]
pub struct CreateAclRule {
    pub name: Option<String>,
    /// `allow` or `deny`
    pub action: Option<String>,
    /// `inbound` or `outbound`
    pub direction: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    /// `all`, `tcp`, `udp` or `icmp`
    pub protocol: Option<String>,
    pub port_min: Option<u16>,
    pub port_max: Option<u16>,
    pub source_port_min: Option<u16>,
    pub source_port_max: Option<u16>,
    pub icmp_type: Option<u8>,
    pub icmp_code: Option<u8>,
    /// Rule id to insert this rule before
    pub before: Option<String>,
}

impl CreateAclRule {
    /// Validate and reshape into the API's rule prototype
    pub fn to_body(&self) -> Result<Value> {
        let action = require(self.action.as_deref(), "action")?;
        let direction = require(self.direction.as_deref(), "direction")?;
        let source = require(self.source.as_deref(), "source")?;
        let destination = require(self.destination.as_deref(), "destination")?;
        let protocol = self.protocol.as_deref().unwrap_or("all");

        let mut body = json!({
            "action": action,
            "direction": direction,
            "source": source,
            "destination": destination,
            "protocol": protocol,
        });
        insert_opt(&mut body, "name", self.name.clone());
        insert_opt(&mut body, "before", self.before.as_deref().map(id_ref));

        match protocol {
            "tcp" | "udp" => {
                insert_opt(&mut body, "destination_port_min", self.port_min);
                insert_opt(&mut body, "destination_port_max", self.port_max);
                insert_opt(&mut body, "source_port_min", self.source_port_min);
                insert_opt(&mut body, "source_port_max", self.source_port_max);
            },
            "icmp" => {
                insert_opt(&mut body, "type", self.icmp_type);
                insert_opt(&mut body, "code", self.icmp_code);
            },
            _ => {},
        }

        Ok(body)
    }
}

/// Request to create a network ACL
#[derive(Debug, Clone, Default)]
pub struct CreateNetworkAcl {
    pub name: Option<String>,
    /// VPC name or id
    pub vpc: Option<String>,
    pub resource_group: Option<String>,
    /// Copy the rules of this ACL (name or id) instead of `rules`
    pub source_network_acl: Option<String>,
    pub rules: Vec<CreateAclRule>,
}

/// Network ACL operations
pub struct NetworkAcls<'a> {
    acls: Collection<'a>,
}

impl<'a> NetworkAcls<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            acls: Collection::new(client, "network-acls")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.acls.list().await
    }

    /// Get a network ACL by name or id
    pub async fn get(&self, acl: &str) -> Result<Value> {
        self.acls.get(acl).await
    }

    pub async fn resolve_id(&self, acl: &str) -> Result<String> {
        self.acls.resolve_id(acl).await
    }

    pub async fn create(&self, request: &CreateNetworkAcl) -> Result<Value> {
        let vpc = require(request.vpc.as_deref(), "vpc")?;
        let rules = request
            .rules
            .iter()
            .map(CreateAclRule::to_body)
            .collect::<Result<Vec<_>>>()?;

        let client = self.acls.client();
        let vpc_id = Vpcs::new(client)?.resolve_id(vpc).await?;

        let mut body = json!({ "vpc": id_ref(&vpc_id) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );

        match &request.source_network_acl {
            Some(source) => {
                let id = self.resolve_id(source).await?;
                insert_opt(&mut body, "source_network_acl", Some(id_ref(&id)));
            },
            None if !rules.is_empty() => insert_opt(&mut body, "rules", Some(rules)),
            None => {},
        }

        self.acls.create(body).await
    }

    pub async fn delete(&self, acl: &str) -> Result<()> {
        self.acls.delete(acl).await
    }

    pub async fn rules(&self, acl: &str) -> Result<Collection<'a>> {
        self.acls.nested(acl, "network-acl-rules").await
    }

    pub async fn create_rule(&self, acl: &str, rule: &CreateAclRule) -> Result<Value> {
        let body = rule.to_body()?;
        self.rules(acl).await?.create(body).await
    }
}
