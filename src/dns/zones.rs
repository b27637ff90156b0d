//! DNS zones

use super::permitted_networks::PermittedNetworks;
use super::records::ResourceRecords;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection, Scope};
use crate::resource_controller::ResourceInstances;
use serde_json::{json, Value};

/// Request to create a DNS zone
#[derive(Debug, Clone, Default)]
pub struct CreateDnsZone {
    /// Zone name, e.g. `example.internal`
    pub name: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
}

/// DNS zone operations within one DNS services instance
pub struct DnsZones<'a> {
    zones: Collection<'a>,
}

impl<'a> DnsZones<'a> {
    /// Scope to a DNS services instance given by name, id, GUID or CRN
    pub async fn new(client: &'a IbmClient, instance: &str) -> Result<Self> {
        let guid = ResourceInstances::new(client)?.guid(instance).await?;
        Self::for_guid(client, &guid)
    }

    /// Scope to a DNS services instance whose GUID is already known
    pub fn for_guid(client: &'a IbmClient, guid: &str) -> Result<Self> {
        Ok(Self {
            zones: Collection::scoped(client, "dns-zones", Scope::under(&[guid]))?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.zones.list().await
    }

    /// Get a zone by name or id
    pub async fn get(&self, zone: &str) -> Result<Value> {
        self.zones.get(zone).await
    }

    pub async fn resolve_id(&self, zone: &str) -> Result<String> {
        self.zones.resolve_id(zone).await
    }

    pub async fn create(&self, request: &CreateDnsZone) -> Result<Value> {
        let name = require(request.name.as_deref(), "name")?;

        let mut body = json!({ "name": name });
        insert_opt(&mut body, "description", request.description.clone());
        insert_opt(&mut body, "label", request.label.clone());

        self.zones.create(body).await
    }

    pub async fn delete(&self, zone: &str) -> Result<()> {
        self.zones.delete(zone).await
    }

    pub async fn permitted_networks(&self, zone: &str) -> Result<PermittedNetworks<'a>> {
        Ok(PermittedNetworks::from(self.zones.nested(zone, "dns-permitted-networks").await?))
    }

    pub async fn records(&self, zone: &str) -> Result<ResourceRecords<'a>> {
        Ok(ResourceRecords::from(self.zones.nested(zone, "dns-resource-records").await?))
    }
}
