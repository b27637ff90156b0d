//! Regions and zones

use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::{Collection, Scope};
use serde_json::Value;

/// Region and zone lookups
pub struct Geography<'a> {
    client: &'a IbmClient,
    regions: Collection<'a>,
}

impl<'a> Geography<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            client,
            regions: Collection::new(client, "regions")?,
        })
    }

    pub async fn regions(&self) -> Result<Vec<Value>> {
        self.regions.list().await
    }

    pub async fn region(&self, region: &str) -> Result<Value> {
        self.regions.get(region).await
    }

    pub async fn zones(&self, region: &str) -> Result<Vec<Value>> {
        self.zone_collection(region)?.list().await
    }

    pub async fn zone(&self, region: &str, zone: &str) -> Result<Value> {
        self.zone_collection(region)?.get(zone).await
    }

    fn zone_collection(&self, region: &str) -> Result<Collection<'a>> {
        Collection::scoped(self.client, "zones", Scope::under(&[region]))
    }
}
