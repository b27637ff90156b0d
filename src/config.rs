//! Configuration Management
//!
//! Loads SDK settings from an optional `clouds.yaml` credentials file and the
//! `IC_*` environment variables. Environment variables win over the file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default request timeout when `IC_TIMEOUT` is not set
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default cache TTL when `IC_CACHE_TTL` is not set
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Logical API connection. Each maps to one hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    Iaas,
    Auth,
    Rg,
    Dns,
    Em,
    Sl,
    Power,
    Cos,
}

impl Connection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connection::Iaas => "iaas",
            Connection::Auth => "auth",
            Connection::Rg => "rg",
            Connection::Dns => "dns",
            Connection::Em => "em",
            Connection::Sl => "sl",
            Connection::Power => "power",
            Connection::Cos => "cos",
        }
    }

    /// Default base URL for this connection in the given region
    pub fn default_base_url(&self, region: &str) -> String {
        match self {
            Connection::Iaas => format!("https://{}.iaas.cloud.ibm.com/v1", region),
            Connection::Auth => "https://iam.cloud.ibm.com".to_string(),
            Connection::Rg => "https://resource-controller.cloud.ibm.com/v2".to_string(),
            Connection::Dns => "https://api.dns-svcs.cloud.ibm.com/v1".to_string(),
            Connection::Em => "https://enterprise.cloud.ibm.com/v1".to_string(),
            Connection::Sl => "https://api.softlayer.com/rest/v3.1".to_string(),
            Connection::Power => format!("https://{}.power-iaas.cloud.ibm.com/pcloud/v1", region),
            Connection::Cos => format!("https://s3.{}.cloud-object-storage.appdomain.cloud", region),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One profile from `clouds.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudProfile {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub memcached: Vec<String>,
    #[serde(default)]
    pub cache_ttl: Option<u64>,
    #[serde(default)]
    pub sl_username: Option<String>,
    #[serde(default)]
    pub sl_api_key: Option<String>,
}

/// Root structure of `clouds.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, CloudProfile>,
}

/// SDK configuration
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub region: String,
    pub version: String,
    pub generation: String,
    pub timeout: Duration,
    /// Memcached nodes (`host:port`). Empty disables the shared cache.
    pub memcached: Vec<String>,
    pub cache_ttl: Duration,
    pub sl_username: Option<String>,
    pub sl_api_key: Option<String>,
    endpoints: HashMap<Connection, String>,
}

// The API keys never go to logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("version", &self.version)
            .field("generation", &self.generation)
            .field("timeout", &self.timeout)
            .field("memcached", &self.memcached)
            .field("cache_ttl", &self.cache_ttl)
            .field("sl_username", &self.sl_username)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Build a configuration from explicit values
    pub fn new(api_key: &str, region: &str, version: &str, generation: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            region: region.to_string(),
            version: version.to_string(),
            generation: generation.to_string(),
            timeout: DEFAULT_TIMEOUT,
            memcached: Vec::new(),
            cache_ttl: DEFAULT_CACHE_TTL,
            sl_username: None,
            sl_api_key: None,
            endpoints: HashMap::new(),
        }
    }

    /// Load configuration from `clouds.yaml` (if any) and the environment
    pub fn load() -> Result<Self> {
        let profile_name = std::env::var("IC_CLOUD").unwrap_or_else(|_| "default".to_string());
        let profile = match Self::config_path() {
            Some(path) => Self::read_profile(&path, &profile_name)?,
            None => None,
        };

        Self::from_sources(profile, |name| std::env::var(name).ok())
    }

    /// Get the credentials file path
    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("IC_CONFIG_FILE") {
            return Some(PathBuf::from(path));
        }

        let candidates = [
            dirs::config_dir().map(|p| p.join("ibmcloud").join("clouds.yaml")),
            dirs::home_dir().map(|p| p.join(".ibmcloud").join("clouds.yaml")),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Read one profile out of a `clouds.yaml` file.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn read_profile(path: &Path, profile: &str) -> Result<Option<CloudProfile>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let file: CloudsFile = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        if !file.clouds.contains_key(profile) {
            tracing::warn!("Profile '{}' not found in {}", profile, path.display());
        }

        Ok(file.clouds.get(profile).cloned())
    }

    /// Merge a file profile with an environment lookup
    pub fn from_sources<F>(profile: Option<CloudProfile>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = profile.unwrap_or_default();
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let required = |name: &'static str, fallback: Option<String>| -> Result<String> {
            env(name)
                .or(fallback)
                .ok_or_else(|| Error::Config(format!("{} is not set", name)))
        };

        let version = required("IC_VERSION", profile.version.clone())?;
        let api_key = required("IC_API_KEY", profile.key.clone())?;
        let region = required("IC_REGION", profile.region.clone())?;
        let generation = required("IC_GENERATION", profile.generation.clone())?;

        let mut config = Self::new(&api_key, &region, &version, &generation);

        if let Some(timeout) = parse_secs(env("IC_TIMEOUT"), "IC_TIMEOUT")?.or(profile.timeout) {
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(ttl) = parse_secs(env("IC_CACHE_TTL"), "IC_CACHE_TTL")?.or(profile.cache_ttl) {
            config.cache_ttl = Duration::from_secs(ttl);
        }

        config.memcached = match env("IC_MEMCACHED") {
            Some(nodes) => nodes
                .split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            None => profile.memcached,
        };

        config.sl_username = env("SL_USERNAME").or(profile.sl_username);
        config.sl_api_key = env("SL_API_KEY").or(profile.sl_api_key);

        Ok(config)
    }

    /// Override the base URL for a connection
    pub fn with_endpoint(mut self, connection: Connection, base_url: &str) -> Self {
        self.endpoints
            .insert(connection, base_url.trim_end_matches('/').to_string());
        self
    }

    /// Enable memcached nodes for the read-through cache
    pub fn with_memcached(mut self, nodes: Vec<String>) -> Self {
        self.memcached = nodes;
        self
    }

    /// Set classic infrastructure credentials
    pub fn with_softlayer(mut self, username: &str, api_key: &str) -> Self {
        self.sl_username = Some(username.to_string());
        self.sl_api_key = Some(api_key.to_string());
        self
    }

    /// Effective base URL for a connection (override > region default)
    pub fn base_url(&self, connection: Connection) -> String {
        self.endpoints
            .get(&connection)
            .cloned()
            .unwrap_or_else(|| connection.default_base_url(&self.region))
    }
}

fn parse_secs(value: Option<String>, name: &str) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("{} must be a number of seconds, got '{}'", name, v)))
        })
        .transpose()
}
