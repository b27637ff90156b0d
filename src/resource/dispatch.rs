//! Dispatch
//!
//! Maps resource keys and action names to collections and typed handles, so
//! a front end can work with any registered resource by key.

use super::{identifier_string, resource_def, Collection};
use crate::config::Connection;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use crate::power::{PowerCloud, PvmAction, PvmInstances};
use crate::softlayer::{BareMetal, PowerState};
use crate::vpc::{InstanceAction, Instances, LoadBalancers};
use serde_json::Value;

/// Build the collection for a resource key.
///
/// `parents` names the enclosing items from the outermost in, e.g.
/// `["my-lb", "my-pool"]` for `load-balancer-pool-members`. Each parent is
/// resolved by name or id through its own collection.
pub async fn collection<'a>(client: &'a IbmClient, key: &str, parents: &[&str]) -> Result<Collection<'a>> {
    let def = resource_def(key)?;

    let Some(parent_key) = def.parent.as_deref() else {
        if !parents.is_empty() {
            return Err(Error::InvalidArgument(format!("{} is not nested under another resource", key)));
        }
        return Collection::new(client, key);
    };

    let (parent, outer) = parents
        .split_last()
        .ok_or_else(|| Error::InvalidArgument(format!("{} needs its {} identifier", key, parent_key)))?;

    // Power collections also carry the cloud instance CRN header
    if def.connection == Connection::Power {
        let cloud = PowerCloud::resolve(client, parent).await?;
        return Collection::scoped(client, key, cloud.scope());
    }

    let parents_of_parent = Box::pin(collection(client, parent_key, outer)).await?;
    let record = parents_of_parent.get(parent).await?;
    let parent_id = match def.parent_field.as_deref() {
        Some(field) => record.get(field).and_then(identifier_string).ok_or_else(|| {
            Error::Unexpected(format!("{} '{}' has no '{}'", parent_key, parent, field))
        })?,
        None => parents_of_parent.def().item_id(&record)?,
    };

    parents_of_parent.child(&parent_id, key)
}

/// Action names each resource key accepts
pub fn actions_for(key: &str) -> &'static [&'static str] {
    match key {
        "instances" => &["start", "stop", "reboot", "initialization", "details"],
        "power-instances" => &["start", "stop", "soft-reboot", "hard-reboot"],
        "bare-metal" => &["power-on", "power-off", "reboot"],
        "load-balancers" => &["statistics"],
        _ => &[],
    }
}

/// Run a named action on one item
pub async fn execute_action(
    client: &IbmClient,
    key: &str,
    parents: &[&str],
    identifier: &str,
    action: &str,
) -> Result<Value> {
    tracing::info!("execute_action: key={}, action={}, item={}", key, action, identifier);

    let unknown = || Error::InvalidArgument(format!("unknown action '{}' for {}", action, key));

    match key {
        "instances" => {
            let instances = Instances::new(client)?;
            match action {
                "initialization" => instances.initialization(identifier).await,
                "details" => instances.details(identifier).await,
                _ => {
                    let action = InstanceAction::parse(action).ok_or_else(unknown)?;
                    instances.action(identifier, action).await
                },
            }
        },
        "power-instances" => {
            let action = PvmAction::parse(action).ok_or_else(unknown)?;
            let cloud = parents
                .first()
                .ok_or_else(|| Error::InvalidArgument("power-instances needs its cloud instance".to_string()))?;
            PvmInstances::new(client, cloud).await?.action(identifier, action).await
        },
        "bare-metal" => {
            let state = match action {
                "power-on" => PowerState::On,
                "power-off" => PowerState::Off,
                "reboot" => PowerState::Reboot,
                _ => return Err(unknown()),
            };
            BareMetal::new(client)?.power(identifier, state).await
        },
        "load-balancers" if action == "statistics" => LoadBalancers::new(client)?.statistics(identifier).await,
        _ => Err(unknown()),
    }
}
