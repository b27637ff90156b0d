//! DNS services
//!
//! Private DNS zones live inside a DNS services resource instance. Every
//! handle here is scoped to one such instance, resolved by name, id, GUID or
//! CRN through the resource controller.

mod permitted_networks;
mod records;
mod zones;

pub use permitted_networks::PermittedNetworks;
pub use records::{CreateResourceRecord, RecordData, ResourceRecords};
pub use zones::{CreateDnsZone, DnsZones};
