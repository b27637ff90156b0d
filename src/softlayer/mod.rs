//! Classic infrastructure
//!
//! The classic (SoftLayer) REST API authenticates with the account username
//! and classic API key over basic auth rather than an IAM token. Its create
//! calls take their payload wrapped as `{"parameters": [...]}`.

mod bare_metal;
mod dns;

pub use bare_metal::{BareMetal, PowerState};
pub use dns::{CreateDnsDomain, CreateDomainRecord, DnsDomains};

use serde_json::{json, Value};

/// Wrap a template object the way classic `createObject` calls expect
pub(crate) fn parameters(object: Value) -> Value {
    json!({ "parameters": [object] })
}
