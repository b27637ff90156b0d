//! Images and operating systems

use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Request to import an image from object storage
#[derive(Debug, Clone, Default)]
pub struct CreateImage {
    pub name: Option<String>,
    /// `cos://<region>/<bucket>/<object>` location of the image file
    pub file: Option<String>,
    /// Operating system name, e.g. `ubuntu-20-04-amd64`
    pub operating_system: Option<String>,
    pub resource_group: Option<String>,
}

/// Image operations
pub struct Images<'a> {
    images: Collection<'a>,
    operating_systems: Collection<'a>,
}

impl<'a> Images<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            images: Collection::new(client, "images")?,
            operating_systems: Collection::new(client, "operating-systems")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.images.list().await
    }

    /// Get an image by name or id
    pub async fn get(&self, image: &str) -> Result<Value> {
        self.images.get(image).await
    }

    pub async fn resolve_id(&self, image: &str) -> Result<String> {
        self.images.resolve_id(image).await
    }

    pub async fn create(&self, request: &CreateImage) -> Result<Value> {
        let file = require(request.file.as_deref(), "file")?;
        let os = require(request.operating_system.as_deref(), "operating_system")?;

        let mut body = json!({ "file": { "href": file }, "operating_system": name_ref(os) });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(self.images.client(), request.resource_group.as_deref()).await?,
        );

        self.images.create(body).await
    }

    pub async fn delete(&self, image: &str) -> Result<()> {
        self.images.delete(image).await
    }

    pub async fn operating_systems(&self) -> Result<Vec<Value>> {
        self.operating_systems.list().await
    }

    pub async fn operating_system(&self, name: &str) -> Result<Value> {
        self.operating_systems.get(name).await
    }
}
