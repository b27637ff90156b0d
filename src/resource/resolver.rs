//! Identifier resolution
//!
//! Turns whatever the caller typed (a name, an id, an address...) into the
//! canonical resource record by walking the definition's lookup chain.

use super::fetcher::{fetch_by_id, fetch_resources, find_by_field};
use super::registry::{Lookup, ResourceDef};
use super::Scope;
use crate::error::{Error, Result};
use crate::ibm::client::IbmClient;
use serde_json::Value;

/// Resolve an identifier to a record.
///
/// Lookups run in order. A not-found result falls through to the next lookup;
/// any other error is returned immediately. The collection is listed at most
/// once however many field lookups the chain has.
pub async fn resolve(client: &IbmClient, def: &ResourceDef, scope: &Scope, identifier: &str) -> Result<Value> {
    let mut listing: Option<Vec<Value>> = None;

    for lookup in def.lookups() {
        let result = match lookup {
            Lookup::Id => fetch_by_id(client, def, scope, identifier).await,
            Lookup::Field(field) => {
                if listing.is_none() {
                    listing = Some(fetch_resources(client, def, scope).await?);
                }
                let items = listing.as_deref().unwrap_or_default();
                find_by_field(items, field, identifier)
                    .cloned()
                    .ok_or_else(|| Error::not_found(&def.display_name, identifier))
            },
        };

        match result {
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} '{}' not found by {:?}", def.display_name, identifier, lookup);
            },
            other => return other,
        }
    }

    Err(Error::not_found(&def.display_name, identifier))
}

/// Resolve an identifier and return only the canonical id
pub async fn resolve_id(client: &IbmClient, def: &ResourceDef, scope: &Scope, identifier: &str) -> Result<String> {
    let item = resolve(client, def, scope, identifier).await?;
    def.item_id(&item)
}

/// Look up by the name field only
pub async fn get_by_name(client: &IbmClient, def: &ResourceDef, scope: &Scope, name: &str) -> Result<Value> {
    let items = fetch_resources(client, def, scope).await?;
    find_by_field(&items, &def.name_field, name)
        .cloned()
        .ok_or_else(|| Error::not_found(&def.display_name, name))
}
