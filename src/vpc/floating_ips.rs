//! Floating IPs

use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{id_ref, insert_opt, name_ref, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to reserve a floating IP.
///
/// Give `zone` for an unbound IP, or `target` (a network interface id) to
/// bind it right away.
#[derive(Debug, Clone, Default)]
pub struct ReserveFloatingIp {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub target: Option<String>,
    pub resource_group: Option<String>,
}

/// Floating IP operations
pub struct FloatingIps<'a> {
    ips: Collection<'a>,
}

impl<'a> FloatingIps<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            ips: Collection::new(client, "floating-ips")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.ips.list().await
    }

    /// Get a floating IP by name, id or address
    pub async fn get(&self, fip: &str) -> Result<Value> {
        self.ips.get(fip).await
    }

    pub async fn resolve_id(&self, fip: &str) -> Result<String> {
        self.ips.resolve_id(fip).await
    }

    pub async fn reserve(&self, request: &ReserveFloatingIp) -> Result<Value> {
        let mut body = match (&request.target, &request.zone) {
            (Some(target), _) => json!({ "target": id_ref(target) }),
            (None, Some(zone)) => json!({ "zone": name_ref(zone) }),
            (None, None) => return Err(Error::MissingArgument("zone")),
        };
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(self.ips.client(), request.resource_group.as_deref()).await?,
        );

        self.ips.create(body).await
    }

    pub async fn release(&self, fip: &str) -> Result<()> {
        self.ips.delete(fip).await
    }
}
