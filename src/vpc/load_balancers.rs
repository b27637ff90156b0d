//! Load balancers

use super::subnets::Subnets;
use crate::config::Connection;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::resource::{id_ref, insert_opt, name_ref, require, Collection};
use crate::resource_controller::resource_group_ref;
use serde_json::{json, Value};

/// Pool health check settings
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    pub delay: u32,
    pub max_retries: u32,
    pub timeout: u32,
    /// `http`, `https` or `tcp`
    pub monitor_type: String,
    pub url_path: Option<String>,
    pub port: Option<u16>,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self {
            delay: 5,
            max_retries: 2,
            timeout: 2,
            monitor_type: "tcp".to_string(),
            url_path: None,
            port: None,
        }
    }
}

impl HealthMonitor {
    fn to_body(&self) -> Value {
        let mut body = json!({
            "delay": self.delay,
            "max_retries": self.max_retries,
            "timeout": self.timeout,
            "type": self.monitor_type,
        });
        insert_opt(&mut body, "url_path", self.url_path.clone());
        insert_opt(&mut body, "port", self.port);
        body
    }
}

/// Request to create a listener
#[derive(Debug, Clone, Default)]
pub struct CreateListener {
    pub port: Option<u16>,
    /// `http`, `https` or `tcp`
    pub protocol: Option<String>,
    /// Default pool name (on create) or name/id (on an existing balancer)
    pub default_pool: Option<String>,
    /// Certificate manager CRN, for `https`
    pub certificate_instance: Option<String>,
    pub connection_limit: Option<u32>,
}

/// Request to create a pool
#[derive(Debug, Clone, Default)]
pub struct CreatePool {
    pub name: Option<String>,
    /// `round_robin`, `weighted_round_robin` or `least_connections`
    pub algorithm: Option<String>,
    pub protocol: Option<String>,
    pub health_monitor: HealthMonitor,
    /// `source_ip` session persistence when set
    pub session_persistence: Option<String>,
    pub members: Vec<CreateMember>,
}

/// Request to add a pool member
#[derive(Debug, Clone, Default)]
pub struct CreateMember {
    pub port: Option<u16>,
    /// Target IP address
    pub target: Option<String>,
    pub weight: Option<u8>,
}

/// Request to create a load balancer
#[derive(Debug, Clone, Default)]
pub struct CreateLoadBalancer {
    pub name: Option<String>,
    /// Subnet names or ids
    pub subnets: Vec<String>,
    pub is_public: bool,
    pub resource_group: Option<String>,
    pub listeners: Vec<CreateListener>,
    pub pools: Vec<CreatePool>,
}

impl CreateMember {
    fn to_body(&self) -> Result<Value> {
        let port = self.port.ok_or(Error::MissingArgument("port"))?;
        let target = require(self.target.as_deref(), "target")?;
        let mut body = json!({ "port": port, "target": { "address": target } });
        insert_opt(&mut body, "weight", self.weight);
        Ok(body)
    }
}

impl CreatePool {
    fn to_body(&self) -> Result<Value> {
        let algorithm = require(self.algorithm.as_deref(), "algorithm")?;
        let protocol = require(self.protocol.as_deref(), "protocol")?;

        let mut body = json!({
            "algorithm": algorithm,
            "protocol": protocol,
            "health_monitor": self.health_monitor.to_body(),
        });
        insert_opt(&mut body, "name", self.name.clone());
        insert_opt(
            &mut body,
            "session_persistence",
            self.session_persistence.as_deref().map(|t| json!({ "type": t })),
        );
        if !self.members.is_empty() {
            let members = self
                .members
                .iter()
                .map(CreateMember::to_body)
                .collect::<Result<Vec<_>>>()?;
            insert_opt(&mut body, "members", Some(members));
        }
        Ok(body)
    }
}

impl CreateListener {
    /// `default_pool` is passed as given, already resolved by the caller
    fn to_body(&self, default_pool: Option<Value>) -> Result<Value> {
        let port = self.port.ok_or(Error::MissingArgument("port"))?;
        let protocol = require(self.protocol.as_deref(), "protocol")?;

        let mut body = json!({ "port": port, "protocol": protocol });
        insert_opt(&mut body, "default_pool", default_pool);
        insert_opt(
            &mut body,
            "certificate_instance",
            self.certificate_instance.as_deref().map(|crn| json!({ "crn": crn })),
        );
        insert_opt(&mut body, "connection_limit", self.connection_limit);
        Ok(body)
    }
}

/// Load balancer operations
pub struct LoadBalancers<'a> {
    balancers: Collection<'a>,
}

impl<'a> LoadBalancers<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            balancers: Collection::new(client, "load-balancers")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.balancers.list().await
    }

    /// Get a load balancer by name or id
    pub async fn get(&self, lb: &str) -> Result<Value> {
        self.balancers.get(lb).await
    }

    pub async fn create(&self, request: &CreateLoadBalancer) -> Result<Value> {
        if request.subnets.is_empty() {
            return Err(Error::MissingArgument("subnets"));
        }

        let pools = request
            .pools
            .iter()
            .map(CreatePool::to_body)
            .collect::<Result<Vec<_>>>()?;
        // Pools don't exist yet, so listeners refer to them by name
        let listeners = request
            .listeners
            .iter()
            .map(|l| l.to_body(l.default_pool.as_deref().map(name_ref)))
            .collect::<Result<Vec<_>>>()?;

        let client = self.balancers.client();
        let subnets = Subnets::new(client)?;
        let mut subnet_refs = Vec::with_capacity(request.subnets.len());
        for subnet in &request.subnets {
            subnet_refs.push(id_ref(&subnets.resolve_id(subnet).await?));
        }

        let mut body = json!({ "is_public": request.is_public, "subnets": subnet_refs });
        insert_opt(&mut body, "name", request.name.clone());
        insert_opt(
            &mut body,
            "resource_group",
            resource_group_ref(client, request.resource_group.as_deref()).await?,
        );
        if !pools.is_empty() {
            insert_opt(&mut body, "pools", Some(pools));
        }
        if !listeners.is_empty() {
            insert_opt(&mut body, "listeners", Some(listeners));
        }

        self.balancers.create(body).await
    }

    pub async fn delete(&self, lb: &str) -> Result<()> {
        self.balancers.delete(lb).await
    }

    pub async fn statistics(&self, lb: &str) -> Result<Value> {
        let id = self.balancers.resolve_id(lb).await?;
        let path = format!("{}/statistics", self.balancers.item_path(&id)?);
        self.balancers.client().get(Connection::Iaas, &path).await
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub async fn listeners(&self, lb: &str) -> Result<Collection<'a>> {
        self.balancers.nested(lb, "load-balancer-listeners").await
    }

    pub async fn create_listener(&self, lb: &str, request: &CreateListener) -> Result<Value> {
        let listeners = self.listeners(lb).await?;
        let default_pool = match &request.default_pool {
            Some(pool) => {
                let pools = self.pools(lb).await?;
                Some(id_ref(&pools.resolve_id(pool).await?))
            },
            None => None,
        };
        listeners.create(request.to_body(default_pool)?).await
    }

    // =========================================================================
    // Pools and members
    // =========================================================================

    pub async fn pools(&self, lb: &str) -> Result<Collection<'a>> {
        self.balancers.nested(lb, "load-balancer-pools").await
    }

    pub async fn create_pool(&self, lb: &str, request: &CreatePool) -> Result<Value> {
        let body = request.to_body()?;
        self.pools(lb).await?.create(body).await
    }

    pub async fn members(&self, lb: &str, pool: &str) -> Result<Collection<'a>> {
        self.pools(lb).await?.nested(pool, "load-balancer-pool-members").await
    }

    pub async fn create_member(&self, lb: &str, pool: &str, request: &CreateMember) -> Result<Value> {
        let body = request.to_body()?;
        self.members(lb, pool).await?.create(body).await
    }
}
