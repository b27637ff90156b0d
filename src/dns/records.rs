//! DNS resource records

use crate::error::{Error, Result};
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Record payload, by record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A { ip: String },
    Aaaa { ip: String },
    Cname { cname: String },
    Ptr { ptrdname: String },
    Txt { text: String },
    Mx { exchange: String, preference: u16 },
    Srv { target: String, port: u16, priority: u16, weight: u16 },
}

impl RecordData {
    pub fn record_type(&self) -> &'static str {
        match self {
            RecordData::A { .. } => "A",
            RecordData::Aaaa { .. } => "AAAA",
            RecordData::Cname { .. } => "CNAME",
            RecordData::Ptr { .. } => "PTR",
            RecordData::Txt { .. } => "TXT",
            RecordData::Mx { .. } => "MX",
            RecordData::Srv { .. } => "SRV",
        }
    }

    /// Parse `<type>` and a single value as typed on a command line.
    /// MX and SRV need structured fields and are rejected here.
    pub fn parse(record_type: &str, value: &str) -> Result<Self> {
        let value = value.to_string();
        match record_type.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordData::A { ip: value }),
            "AAAA" => Ok(RecordData::Aaaa { ip: value }),
            "CNAME" => Ok(RecordData::Cname { cname: value }),
            "PTR" => Ok(RecordData::Ptr { ptrdname: value }),
            "TXT" => Ok(RecordData::Txt { text: value }),
            other => Err(Error::InvalidArgument(format!(
                "record type '{}' cannot be built from a single value",
                other
            ))),
        }
    }

    fn rdata(&self) -> Value {
        match self {
            RecordData::A { ip } | RecordData::Aaaa { ip } => json!({ "ip": ip }),
            RecordData::Cname { cname } => json!({ "cname": cname }),
            RecordData::Ptr { ptrdname } => json!({ "ptrdname": ptrdname }),
            RecordData::Txt { text } => json!({ "text": text }),
            RecordData::Mx { exchange, preference } => {
                json!({ "exchange": exchange, "preference": preference })
            },
            RecordData::Srv { target, port, priority, weight } => {
                json!({ "target": target, "port": port, "priority": priority, "weight": weight })
            },
        }
    }
}

/// Request to create a resource record
#[derive(Debug, Clone, Default)]
pub struct CreateResourceRecord {
    pub name: Option<String>,
    pub data: Option<RecordData>,
    pub ttl: Option<u32>,
    /// SRV only
    pub service: Option<String>,
    /// SRV only
    pub protocol: Option<String>,
}

impl CreateResourceRecord {
    fn to_body(&self) -> Result<Value> {
        let name = require(self.name.as_deref(), "name")?;
        let data = self.data.as_ref().ok_or(Error::MissingArgument("rdata"))?;

        let mut body = json!({
            "name": name,
            "type": data.record_type(),
            "rdata": data.rdata(),
        });
        insert_opt(&mut body, "ttl", self.ttl);
        if let RecordData::Srv { .. } = data {
            let service = require(self.service.as_deref(), "service")?;
            let protocol = require(self.protocol.as_deref(), "protocol")?;
            insert_opt(&mut body, "service", Some(service));
            insert_opt(&mut body, "protocol", Some(protocol));
        }
        Ok(body)
    }
}

/// Resource record operations for one zone
pub struct ResourceRecords<'a> {
    records: Collection<'a>,
}

impl<'a> From<Collection<'a>> for ResourceRecords<'a> {
    fn from(records: Collection<'a>) -> Self {
        Self { records }
    }
}

impl<'a> ResourceRecords<'a> {
    pub async fn list(&self) -> Result<Vec<Value>> {
        self.records.list().await
    }

    /// Get a record by name or id
    pub async fn get(&self, record: &str) -> Result<Value> {
        self.records.get(record).await
    }

    pub async fn create(&self, request: &CreateResourceRecord) -> Result<Value> {
        let body = request.to_body()?;
        self.records.create(body).await
    }

    pub async fn delete(&self, record: &str) -> Result<()> {
        self.records.delete(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_record_body() {
        let request = CreateResourceRecord {
            name: Some("db".to_string()),
            data: Some(RecordData::parse("a", "10.240.0.4").unwrap()),
            ttl: Some(900),
            ..Default::default()
        };
        let body = request.to_body().unwrap();
        assert_eq!(body["type"], "A");
        assert_eq!(body["rdata"]["ip"], "10.240.0.4");
        assert_eq!(body["ttl"], 900);
    }

    #[test]
    fn test_srv_requires_service() {
        let request = CreateResourceRecord {
            name: Some("sip".to_string()),
            data: Some(RecordData::Srv {
                target: "sip.example.internal".to_string(),
                port: 5060,
                priority: 10,
                weight: 5,
            }),
            protocol: Some("udp".to_string()),
            ..Default::default()
        };
        assert!(matches!(request.to_body(), Err(Error::MissingArgument("service"))));
    }

    #[test]
    fn test_mx_needs_structured_data() {
        assert!(matches!(RecordData::parse("MX", "mail"), Err(Error::InvalidArgument(_))));
    }
}
