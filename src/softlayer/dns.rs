//! Classic DNS domains and their records

use super::parameters;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Request to create a domain
#[derive(Debug, Clone, Default)]
pub struct CreateDnsDomain {
    pub name: Option<String>,
    /// Address for the domain's initial `@` A record
    pub address: Option<String>,
}

/// Request to create a domain record
#[derive(Debug, Clone, Default)]
pub struct CreateDomainRecord {
    pub host: Option<String>,
    pub data: Option<String>,
    /// Record type, defaults to `a`
    pub record_type: Option<String>,
    pub ttl: Option<u32>,
}

/// Classic DNS domain operations
pub struct DnsDomains<'a> {
    domains: Collection<'a>,
}

impl<'a> DnsDomains<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            domains: Collection::new(client, "dns-domains")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.domains.list().await
    }

    /// Get a domain by name or id
    pub async fn get(&self, domain: &str) -> Result<Value> {
        self.domains.get(domain).await
    }

    pub async fn create(&self, request: &CreateDnsDomain) -> Result<Value> {
        let name = require(request.name.as_deref(), "name")?;

        let mut domain = json!({ "name": name });
        if let Some(address) = &request.address {
            let record = json!({ "host": "@", "data": address, "type": "a" });
            insert_opt(&mut domain, "resourceRecords", Some(vec![record]));
        }

        self.domains.create(parameters(domain)).await
    }

    pub async fn delete(&self, domain: &str) -> Result<()> {
        self.domains.delete(domain).await
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub async fn records(&self, domain: &str) -> Result<Collection<'a>> {
        self.domains.nested(domain, "dns-domain-records").await
    }

    pub async fn create_record(&self, domain: &str, request: &CreateDomainRecord) -> Result<Value> {
        let host = require(request.host.as_deref(), "host")?;
        let data = require(request.data.as_deref(), "data")?;

        let domain_id = self.domains.resolve_id(domain).await?;
        let domain_id = domain_id.parse::<u64>().map(Value::from).unwrap_or(Value::String(domain_id));

        let mut record = json!({
            "domainId": domain_id,
            "host": host,
            "data": data,
            "type": request.record_type.as_deref().unwrap_or("a"),
        });
        insert_opt(&mut record, "ttl", request.ttl);

        let records = Collection::new(self.domains.client(), "dns-domain-records")?;
        records.create(parameters(record)).await
    }

    /// Delete a record by host or id
    pub async fn delete_record(&self, domain: &str, record: &str) -> Result<()> {
        self.records(domain).await?.delete(record).await
    }
}
