//! Power Systems virtual servers
//!
//! A Power cloud instance is a resource controller instance. Its GUID goes in
//! every path and its CRN in the `CRN` header of every request, so each
//! handle here is built from a [`PowerCloud`] scope.

mod images;
mod networks;
mod pvm_instances;
mod volumes;

pub use images::PowerImages;
pub use networks::{CreatePowerNetwork, PowerNetworks};
pub use pvm_instances::{CreatePvmInstance, PvmAction, PvmInstances};
pub use volumes::{CreatePowerVolume, PowerVolumes};

use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::Scope;
use crate::resource_controller::ResourceInstances;

/// Header carrying the cloud instance CRN
const CRN_HEADER: &str = "CRN";

/// A resolved Power cloud instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCloud {
    pub guid: String,
    pub crn: String,
}

impl PowerCloud {
    /// Resolve a Power cloud instance by name, id, GUID or CRN
    pub async fn resolve(client: &IbmClient, instance: &str) -> Result<Self> {
        let record = ResourceInstances::new(client)?.get(instance).await?;
        Ok(Self {
            guid: ResourceInstances::string_field(&record, "guid")?,
            crn: ResourceInstances::string_field(&record, "crn")?,
        })
    }

    pub fn scope(&self) -> Scope {
        Scope::under(&[self.guid.as_str()]).with_header(CRN_HEADER, &self.crn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_carries_crn_header() {
        let cloud = PowerCloud {
            guid: "abc".to_string(),
            crn: "crn:v1:bluemix:public:power-iaas:dal12:a/1:abc::".to_string(),
        };
        let scope = cloud.scope();
        assert_eq!(scope.parents, vec!["abc"]);
        assert_eq!(scope.headers, vec![("CRN".to_string(), cloud.crn.clone())]);
    }
}
