//! Security groups

use super::vpcs::Vpcs;
use crate::config::Connection;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{expect_no_content, id_ref, insert_opt, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};
use std::net::IpAddr;

/// One security group rule
#[derive(Debug, Clone, Default)]
pub struct CreateSecurityGroupRule {
    /// `inbound` or `outbound`
    pub direction: Option<String>,
    /// Defaults to `ipv4`
    pub ip_version: Option<String>,
    /// `all`, `tcp`, `udp` or `icmp`; defaults to `all`
    pub protocol: Option<String>,
    /// CIDR block, IP address, or security group name/id
    pub remote: Option<String>,
    pub port_min: Option<u16>,
    pub port_max: Option<u16>,
    pub icmp_type: Option<u8>,
    pub icmp_code: Option<u8>,
}

/// How a rule's `remote` string should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remote<'r> {
    CidrBlock(&'r str),
    Address(&'r str),
    SecurityGroup(&'r str),
}

impl<'r> Remote<'r> {
    pub fn parse(remote: &'r str) -> Self {
        if remote.contains('/') {
            Remote::CidrBlock(remote)
        } else if remote.parse::<IpAddr>().is_ok() {
            Remote::Address(remote)
        } else {
            Remote::SecurityGroup(remote)
        }
    }
}

/// Request to create a security group
#[derive(Debug, Clone, Default)]
pub struct CreateSecurityGroup {
    pub name: Option<String>,
    /// VPC name or id
    pub vpc: Option<String>,
    pub resource_group: Option<String>,
    pub rules: Vec<CreateSecurityGroupRule>,
}

/// Security group operations
pub struct SecurityGroups<'a> {
    groups: Collection<'a>,
}

impl<'a> SecurityGroups<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            groups: Collection::new(client, "security-groups")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.groups.list().await
    }

    /// Get a security group by name or id
    pub async fn get(&self, group: &str) -> Result<Value> {
        self.groups.get(group).await
    }

    pub async fn resolve_id(&self, group: &str) -> Result<String> {
        self.groups.resolve_id(group).await
    }

    pub async fn create(&self, request: &CreateSecurityGroup) -> Result<Value> {
        let vpc = require(request.vpc.as_deref(), "vpc")?;

        let mut rules = Vec::with_capacity(request.rules.len());
        for rule in &request.rules {
            rules.push(self.rule_body(rule).await?);
        }

        let client = self.groups.client();
        let vpc_id = Vpcs::new(client)?.resolve_id(vpc).await?;

        let mut body = json!({ "vpc": id_ref(&vpc_id) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );
        if !rules.is_empty() {
            insert_opt(&mut body, "rules", Some(rules));
        }

        self.groups.create(body).await
    }

    pub async fn delete(&self, group: &str) -> Result<()> {
        self.groups.delete(group).await
    }

    // =========================================================================
    // Rules
    // =========================================================================

    pub async fn rules(&self, group: &str) -> Result<Collection<'a>> {
        self.groups.nested(group, "security-group-rules").await
    }

    pub async fn create_rule(&self, group: &str, rule: &CreateSecurityGroupRule) -> Result<Value> {
        let body = self.rule_body(rule).await?;
        self.rules(group).await?.create(body).await
    }

    async fn rule_body(&self, rule: &CreateSecurityGroupRule) -> Result<Value> {
        let direction = require(rule.direction.as_deref(), "direction")?;
        if !matches!(direction, "inbound" | "outbound") {
            return Err(Error::InvalidArgument(format!(
                "direction must be 'inbound' or 'outbound', got '{}'",
                direction
            )));
        }
        let protocol = rule.protocol.as_deref().unwrap_or("all");

        let mut body = json!({
            "direction": direction,
            "ip_version": rule.ip_version.as_deref().unwrap_or("ipv4"),
            "protocol": protocol,
        });

        match protocol {
            "tcp" | "udp" => {
                insert_opt(&mut body, "port_min", rule.port_min);
                insert_opt(&mut body, "port_max", rule.port_max);
            },
            "icmp" => {
                insert_opt(&mut body, "type", rule.icmp_type);
                insert_opt(&mut body, "code", rule.icmp_code);
            },
            _ => {},
        }

        if let Some(remote) = rule.remote.as_deref() {
            let remote = match Remote::parse(remote) {
                Remote::CidrBlock(cidr) => json!({ "cidr_block": cidr }),
                Remote::Address(address) => json!({ "address": address }),
                Remote::SecurityGroup(group) => id_ref(&self.resolve_id(group).await?),
            };
            insert_opt(&mut body, "remote", Some(remote));
        }

        Ok(body)
    }

    // =========================================================================
    // Network interfaces
    // =========================================================================

    pub async fn network_interfaces(&self, group: &str) -> Result<Collection<'a>> {
        self.groups.nested(group, "security-group-interfaces").await
    }

    /// Add a network interface (by id) to a security group
    pub async fn attach_network_interface(&self, group: &str, interface_id: &str) -> Result<Value> {
        let path = self.interface_path(group, interface_id).await?;
        self.groups.client().put(Connection::Iaas, &path, json!({})).await
    }

    pub async fn detach_network_interface(&self, group: &str, interface_id: &str) -> Result<()> {
        let path = self.interface_path(group, interface_id).await?;
        expect_no_content(self.groups.client().delete(Connection::Iaas, &path).await?)
    }

    async fn interface_path(&self, group: &str, interface_id: &str) -> Result<String> {
        let interfaces = self.network_interfaces(group).await?;
        interfaces.item_path(interface_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_parse() {
        assert_eq!(Remote::parse("10.0.0.0/8"), Remote::CidrBlock("10.0.0.0/8"));
        assert_eq!(Remote::parse("192.168.1.4"), Remote::Address("192.168.1.4"));
        assert_eq!(Remote::parse("fd00::1"), Remote::Address("fd00::1"));
        assert_eq!(Remote::parse("web-sg"), Remote::SecurityGroup("web-sg"));
    }
}
