//! Power virtual server instances

use super::networks::PowerNetworks;
use super::PowerCloud;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Power action for a PVM instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PvmAction {
    Start,
    Stop,
    SoftReboot,
    HardReboot,
}

impl PvmAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PvmAction::Start => "start",
            PvmAction::Stop => "stop",
            PvmAction::SoftReboot => "soft-reboot",
            PvmAction::HardReboot => "hard-reboot",
        }
    }

    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "start" => Some(PvmAction::Start),
            "stop" => Some(PvmAction::Stop),
            "soft-reboot" | "soft_reboot" => Some(PvmAction::SoftReboot),
            "hard-reboot" | "hard_reboot" => Some(PvmAction::HardReboot),
            _ => None,
        }
    }
}

/// Request to create a PVM instance
#[derive(Debug, Clone, Default)]
pub struct CreatePvmInstance {
    pub server_name: Option<String>,
    /// Image name or id within the cloud instance
    pub image: Option<String>,
    pub processors: Option<f64>,
    /// Memory in GB
    pub memory: Option<f64>,
    /// `dedicated`, `shared` or `capped`
    pub proc_type: Option<String>,
    /// Machine type, e.g. `s922`
    pub sys_type: Option<String>,
    /// Network names or ids
    pub networks: Vec<String>,
    pub key_pair_name: Option<String>,
}

/// PVM instance operations within one Power cloud instance
pub struct PvmInstances<'a> {
    instances: Collection<'a>,
    cloud: PowerCloud,
}

impl<'a> PvmInstances<'a> {
    pub async fn new(client: &'a IbmClient, cloud_instance: &str) -> Result<Self> {
        let cloud = PowerCloud::resolve(client, cloud_instance).await?;
        Self::in_cloud(client, cloud)
    }

    pub fn in_cloud(client: &'a IbmClient, cloud: PowerCloud) -> Result<Self> {
        Ok(Self {
            instances: Collection::scoped(client, "power-instances", cloud.scope())?,
            cloud,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.instances.list().await
    }

    /// Get an instance by server name or id
    pub async fn get(&self, instance: &str) -> Result<Value> {
        self.instances.get(instance).await
    }

    pub async fn create(&self, request: &CreatePvmInstance) -> Result<Value> {
        let server_name = require(request.server_name.as_deref(), "server_name")?;
        let image = require(request.image.as_deref(), "image")?;
        let processors = request.processors.ok_or(Error::MissingArgument("processors"))?;
        let memory = request.memory.ok_or(Error::MissingArgument("memory"))?;
        let proc_type = require(request.proc_type.as_deref(), "proc_type")?;
        if request.networks.is_empty() {
            return Err(Error::MissingArgument("networks"));
        }

        let client = self.instances.client();
        let images = Collection::scoped(client, "power-images", self.cloud.scope())?;
        let image_id = images.resolve_id(image).await?;

        let networks = PowerNetworks::in_cloud(client, self.cloud.clone())?;
        let mut network_refs = Vec::with_capacity(request.networks.len());
        for network in &request.networks {
            network_refs.push(json!({ "networkID": networks.resolve_id(network).await? }));
        }

        let mut body = json!({
            "serverName": server_name,
            "imageID": image_id,
            "processors": processors,
            "memory": memory,
            "procType": proc_type,
            "networks": network_refs,
        });
        insert_opt(&mut body, "sysType", request.sys_type.clone());
        insert_opt(&mut body, "keyPairName", request.key_pair_name.clone());

        self.instances.create(body).await
    }

    pub async fn delete(&self, instance: &str) -> Result<()> {
        self.instances.delete(instance).await
    }

    pub async fn action(&self, instance: &str, action: PvmAction) -> Result<Value> {
        let id = self.instances.resolve_id(instance).await?;
        tracing::info!("PVM instance {}: {}", instance, action.as_str());
        self.instances
            .post_to_item(&id, "action", json!({ "action": action.as_str() }))
            .await
    }

    pub async fn start(&self, instance: &str) -> Result<Value> {
        self.action(instance, PvmAction::Start).await
    }

    pub async fn stop(&self, instance: &str) -> Result<Value> {
        self.action(instance, PvmAction::Stop).await
    }

    pub async fn soft_reboot(&self, instance: &str) -> Result<Value> {
        self.action(instance, PvmAction::SoftReboot).await
    }

    pub async fn hard_reboot(&self, instance: &str) -> Result<Value> {
        self.action(instance, PvmAction::HardReboot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(PvmAction::SoftReboot.as_str(), "soft-reboot");
        assert_eq!(PvmAction::parse("hard_reboot"), Some(PvmAction::HardReboot));
        assert_eq!(PvmAction::parse("reboot"), None);
    }
}
