//! Virtual server instances

use super::images::Images;
use super::keys::Keys;
use super::security_groups::SecurityGroups;
use super::subnets::Subnets;
use super::volumes::Volumes;
use super::vpcs::Vpcs;
use crate::config::Connection;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{expect_no_content, id_ref, insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};
use std::fmt;

/// Power action for a running instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    Start,
    Stop,
    Reboot,
}

impl InstanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceAction::Start => "start",
            InstanceAction::Stop => "stop",
            InstanceAction::Reboot => "reboot",
        }
    }

    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "start" => Some(InstanceAction::Start),
            "stop" => Some(InstanceAction::Stop),
            "reboot" => Some(InstanceAction::Reboot),
            _ => None,
        }
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create an instance
#[derive(Debug, Clone, Default)]
pub struct CreateInstance {
    pub name: Option<String>,
    /// VPC name or id
    pub vpc: Option<String>,
    pub zone: Option<String>,
    /// Instance profile name, e.g. `bx2-2x8`
    pub profile: Option<String>,
    /// Image name or id
    pub image: Option<String>,
    /// Subnet name or id for the primary interface
    pub primary_subnet: Option<String>,
    /// Security group names or ids for the primary interface
    pub security_groups: Vec<String>,
    /// SSH key names, ids or fingerprints
    pub keys: Vec<String>,
    /// Cloud-init user data
    pub user_data: Option<String>,
    pub resource_group: Option<String>,
    /// Existing volume names or ids to attach as data volumes
    pub volumes: Vec<String>,
}

/// Request to attach a volume to an instance
#[derive(Debug, Clone, Default)]
pub struct AttachVolume {
    pub name: Option<String>,
    /// Volume name or id
    pub volume: Option<String>,
    pub delete_volume_on_instance_delete: Option<bool>,
}

/// Instance operations
pub struct Instances<'a> {
    instances: Collection<'a>,
    profiles: Collection<'a>,
}

impl<'a> Instances<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            instances: Collection::new(client, "instances")?,
            profiles: Collection::new(client, "instance-profiles")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.instances.list().await
    }

    /// Get an instance by name or id
    pub async fn get(&self, instance: &str) -> Result<Value> {
        self.instances.get(instance).await
    }

    pub async fn resolve_id(&self, instance: &str) -> Result<String> {
        self.instances.resolve_id(instance).await
    }

    pub async fn create(&self, request: &CreateInstance) -> Result<Value> {
        let vpc = require(request.vpc.as_deref(), "vpc")?;
        let zone = require(request.zone.as_deref(), "zone")?;
        let profile = require(request.profile.as_deref(), "profile")?;
        let image = require(request.image.as_deref(), "image")?;
        let subnet = require(request.primary_subnet.as_deref(), "primary_subnet")?;

        let client = self.instances.client();

        let vpc_id = Vpcs::new(client)?.resolve_id(vpc).await?;
        let image_id = Images::new(client)?.resolve_id(image).await?;
        let subnet_id = Subnets::new(client)?.resolve_id(subnet).await?;

        let mut interface = json!({ "subnet": id_ref(&subnet_id) });
        if !request.security_groups.is_empty() {
            let groups = SecurityGroups::new(client)?;
            let mut refs = Vec::with_capacity(request.security_groups.len());
            for group in &request.security_groups {
                refs.push(id_ref(&groups.resolve_id(group).await?));
            }
            insert_opt(&mut interface, "security_groups", Some(refs));
        }

        let keys = Keys::new(client)?;
        let mut key_refs = Vec::with_capacity(request.keys.len());
        for key in &request.keys {
            key_refs.push(id_ref(&keys.resolve_id(key).await?));
        }

        let mut body = json!({
            "vpc": id_ref(&vpc_id),
            "zone": name_ref(zone),
            "profile": name_ref(profile),
            "image": id_ref(&image_id),
            "primary_network_interface": interface,
            "keys": key_refs,
        });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(&mut body, "user_data", request.user_data.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );
        if !request.volumes.is_empty() {
            let volumes = Volumes::new(client)?;
            let mut attachments = Vec::with_capacity(request.volumes.len());
            for volume in &request.volumes {
                attachments.push(json!({ "volume": id_ref(&volumes.resolve_id(volume).await?) }));
            }
            insert_opt(&mut body, "volume_attachments", Some(attachments));
        }

        self.instances.create(body).await
    }

    pub async fn delete(&self, instance: &str) -> Result<()> {
        self.instances.delete(instance).await
    }

    /// Keys and generated password used at first boot
    pub async fn initialization(&self, instance: &str) -> Result<Value> {
        let path = self.sub_path(instance, "initialization").await?;
        self.instances.client().get(Connection::Iaas, &path).await
    }

    pub async fn action(&self, instance: &str, action: InstanceAction) -> Result<Value> {
        let path = self.sub_path(instance, "actions").await?;
        tracing::info!("Instance {}: {}", instance, action);
        self.instances
            .client()
            .post(Connection::Iaas, &path, json!({ "type": action.as_str() }))
            .await
    }

    pub async fn start(&self, instance: &str) -> Result<Value> {
        self.action(instance, InstanceAction::Start).await
    }

    pub async fn stop(&self, instance: &str) -> Result<Value> {
        self.action(instance, InstanceAction::Stop).await
    }

    pub async fn reboot(&self, instance: &str) -> Result<Value> {
        self.action(instance, InstanceAction::Reboot).await
    }

    /// Instance record together with its interfaces and volume attachments
    pub async fn details(&self, instance: &str) -> Result<Value> {
        let mut item = self.get(instance).await?;
        let id = self.instances.def().item_id(&item)?;

        let interfaces = self.instances.child(&id, "instance-network-interfaces")?;
        let attachments = self.instances.child(&id, "instance-volume-attachments")?;
        let (interfaces, attachments) = futures::try_join!(interfaces.list(), attachments.list())?;

        insert_opt(&mut item, "network_interfaces", Some(interfaces));
        insert_opt(&mut item, "volume_attachments", Some(attachments));
        Ok(item)
    }

    // =========================================================================
    // Network interfaces and volume attachments
    // =========================================================================

    pub async fn network_interfaces(&self, instance: &str) -> Result<Collection<'a>> {
        self.instances.nested(instance, "instance-network-interfaces").await
    }

    pub async fn volume_attachments(&self, instance: &str) -> Result<Collection<'a>> {
        self.instances.nested(instance, "instance-volume-attachments").await
    }

    pub async fn attach_volume(&self, instance: &str, request: &AttachVolume) -> Result<Value> {
        let volume = require(request.volume.as_deref(), "volume")?;
        let volume_id = Volumes::new(self.instances.client())?.resolve_id(volume).await?;

        let mut body = json!({ "volume": id_ref(&volume_id) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "delete_volume_on_instance_delete",
            request.delete_volume_on_instance_delete,
        );

        self.volume_attachments(instance).await?.create(body).await
    }

    /// Detach by attachment name or id
    pub async fn detach_volume(&self, instance: &str, attachment: &str) -> Result<()> {
        let attachments = self.volume_attachments(instance).await?;
        let id = attachments.resolve_id(attachment).await?;
        let path = attachments.item_path(&id)?;
        expect_no_content(self.instances.client().delete(Connection::Iaas, &path).await?)
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    pub async fn profiles(&self) -> Result<Vec<Value>> {
        self.profiles.list().await
    }

    pub async fn profile(&self, name: &str) -> Result<Value> {
        self.profiles.get(name).await
    }

    async fn sub_path(&self, instance: &str, suffix: &str) -> Result<String> {
        let id = self.resolve_id(instance).await?;
        Ok(format!("{}/{}", self.instances.item_path(&id)?, suffix))
    }
}
