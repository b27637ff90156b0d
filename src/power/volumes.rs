//! Power storage volumes

use super::PowerCloud;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, require, Collection};
use serde_json::{json, Value};

/// Request to create a Power volume
#[derive(Debug, Clone, Default)]
pub struct CreatePowerVolume {
    pub name: Option<String>,
    /// Size in GB
    pub size: Option<f64>,
    /// `tier1` or `tier3`
    pub disk_type: Option<String>,
    pub shareable: Option<bool>,
}

/// Volume operations within one Power cloud instance
pub struct PowerVolumes<'a> {
    volumes: Collection<'a>,
}

impl<'a> PowerVolumes<'a> {
    pub async fn new(client: &'a IbmClient, cloud_instance: &str) -> Result<Self> {
        let cloud = PowerCloud::resolve(client, cloud_instance).await?;
        Self::in_cloud(client, cloud)
    }

    pub fn in_cloud(client: &'a IbmClient, cloud: PowerCloud) -> Result<Self> {
        Ok(Self {
            volumes: Collection::scoped(client, "power-volumes", cloud.scope())?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.volumes.list().await
    }

    /// Get a volume by name or id
    pub async fn get(&self, volume: &str) -> Result<Value> {
        self.volumes.get(volume).await
    }

    pub async fn create(&self, request: &CreatePowerVolume) -> Result<Value> {
        let name = require(request.name.as_deref(), "name")?;
        let size = request.size.ok_or(Error::MissingArgument("size"))?;

        let mut body = json!({ "name": name, "size": size });
        insert_opt(&mut body, "diskType", request.disk_type.clone());
        insert_opt(&mut body, "shareable", request.shareable);

        self.volumes.create(body).await
    }

    pub async fn delete(&self, volume: &str) -> Result<()> {
        self.volumes.delete(volume).await
    }
}
