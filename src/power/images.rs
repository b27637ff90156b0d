//! Power boot images

use super::PowerCloud;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::Collection;
use serde_json::{json, Value};

/// Image operations within one Power cloud instance
pub struct PowerImages<'a> {
    images: Collection<'a>,
}

impl<'a> PowerImages<'a> {
    pub async fn new(client: &'a IbmClient, cloud_instance: &str) -> Result<Self> {
        let cloud = PowerCloud::resolve(client, cloud_instance).await?;
        Self::in_cloud(client, cloud)
    }

    pub fn in_cloud(client: &'a IbmClient, cloud: PowerCloud) -> Result<Self> {
        Ok(Self {
            images: Collection::scoped(client, "power-images", cloud.scope())?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.images.list().await
    }

    /// Get an image by name or id
    pub async fn get(&self, image: &str) -> Result<Value> {
        self.images.get(image).await
    }

    /// Copy a stock image from the catalog into the cloud instance
    pub async fn import_stock(&self, image_id: &str) -> Result<Value> {
        self.images
            .create(json!({ "source": "root-project", "imageID": image_id }))
            .await
    }

    pub async fn delete(&self, image: &str) -> Result<()> {
        self.images.delete(image).await
    }
}
