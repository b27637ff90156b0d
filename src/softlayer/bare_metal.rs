//! Bare metal servers

use crate::config::Connection;
use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::Collection;
use serde_json::Value;

/// Power operation on a bare metal server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
    Reboot,
}

impl PowerState {
    /// Method name on `SoftLayer_Hardware_Server`
    fn method(&self) -> &'static str {
        match self {
            PowerState::On => "powerOn",
            PowerState::Off => "powerOff",
            PowerState::Reboot => "rebootDefault",
        }
    }
}

/// Bare metal server operations
pub struct BareMetal<'a> {
    servers: Collection<'a>,
}

impl<'a> BareMetal<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            servers: Collection::new(client, "bare-metal")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.servers.list().await
    }

    /// Get a server by hostname, id or fully qualified domain name
    pub async fn get(&self, server: &str) -> Result<Value> {
        self.servers.get(server).await
    }

    pub async fn power(&self, server: &str, state: PowerState) -> Result<Value> {
        let id = self.servers.resolve_id(server).await?;
        let path = format!("SoftLayer_Hardware_Server/{}/{}", id, state.method());
        tracing::info!("Bare metal {}: {}", server, state.method());
        self.servers.client().get_uncached(Connection::Sl, &path).await
    }

    pub async fn power_on(&self, server: &str) -> Result<Value> {
        self.power(server, PowerState::On).await
    }

    pub async fn power_off(&self, server: &str) -> Result<Value> {
        self.power(server, PowerState::Off).await
    }

    pub async fn reboot(&self, server: &str) -> Result<Value> {
        self.power(server, PowerState::Reboot).await
    }
}
