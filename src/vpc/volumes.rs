//! Block storage volumes

use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to create a volume
#[derive(Debug, Clone, Default)]
pub struct CreateVolume {
    pub name: Option<String>,
    /// Volume profile name, e.g. `general-purpose`
    pub profile: Option<String>,
    pub zone: Option<String>,
    /// Size in GB
    pub capacity: Option<u32>,
    /// Only for the `custom` profile
    pub iops: Option<u32>,
    /// Key Protect root key CRN
    pub encryption_key: Option<String>,
    pub resource_group: Option<String>,
}

/// Volume operations
pub struct Volumes<'a> {
    volumes: Collection<'a>,
    profiles: Collection<'a>,
}

impl<'a> Volumes<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            volumes: Collection::new(client, "volumes")?,
            profiles: Collection::new(client, "volume-profiles")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.volumes.list().await
    }

    /// Get a volume by name or id
    pub async fn get(&self, volume: &str) -> Result<Value> {
        self.volumes.get(volume).await
    }

    pub async fn resolve_id(&self, volume: &str) -> Result<String> {
        self.volumes.resolve_id(volume).await
    }

    pub async fn create(&self, request: &CreateVolume) -> Result<Value> {
        let profile = require(request.profile.as_deref(), "profile")?;
        let zone = require(request.zone.as_deref(), "zone")?;

        let mut body = json!({ "profile": name_ref(profile), "zone": name_ref(zone) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "capacity", request.capacity);
        insert_opt(&mut body, "iops", request.iops);
        insert_opt(
            &mut body,
            "encryption_key",
            request.encryption_key.as_deref().map(|crn| json!({ "crn": crn })),
        );
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(self.volumes.client(), request.resource_group.as_deref()).await?,
        );

        self.volumes.create(body).await
    }

    pub async fn delete(&self, volume: &str) -> Result<()> {
        self.volumes.delete(volume).await
    }

    pub async fn profiles(&self) -> Result<Vec<Value>> {
        self.profiles.list().await
    }

    pub async fn profile(&self, name: &str) -> Result<Value> {
        self.profiles.get(name).await
    }
}
