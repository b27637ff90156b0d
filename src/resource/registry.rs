//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads all resource definitions from embedded JSON files
//! and provides lookup functions for the rest of the crate.

use crate::config::Connection;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/vpc.json"),
    include_str!("../resources/resource_controller.json"),
    include_str!("../resources/dns.json"),
    include_str!("../resources/power.json"),
    include_str!("../resources/softlayer.json"),
    include_str!("../resources/enterprise.json"),
];

fn default_id_field() -> String {
    "id".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

fn default_lookup() -> Vec<String> {
    vec!["name".to_string(), "id".to_string()]
}

fn default_delete_status() -> Vec<u16> {
    vec![204]
}

/// One step of the identifier resolution chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// GET the item path with the identifier as id
    Id,
    /// Scan the collection for an item whose field equals the identifier
    Field(&'a str),
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    pub connection: Connection,
    /// Collection path; `{0}`, `{1}` are parent ids
    pub path: String,
    /// Item path; `{id}` is the item id. Defaults to `<path>/{id}`.
    #[serde(default)]
    pub item_path: Option<String>,
    #[serde(default)]
    pub create_path: Option<String>,
    #[serde(default)]
    pub delete_path: Option<String>,
    /// Dot path to the item array; empty when the body is the array
    #[serde(default)]
    pub response_path: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_name_field")]
    pub name_field: String,
    /// Ordered lookups: `name`, `id`, or any other field name
    #[serde(default = "default_lookup")]
    pub lookup: Vec<String>,
    /// Statuses that mean a DELETE succeeded
    #[serde(default = "default_delete_status")]
    pub delete_status: Vec<u16>,
    /// Extra query parameters for list calls
    #[serde(default)]
    pub list_params: BTreeMap<String, String>,
    /// Resource key of the collection this one is nested under
    #[serde(default)]
    pub parent: Option<String>,
    /// Field of the parent record that fills the path, when not its id
    #[serde(default)]
    pub parent_field: Option<String>,
}

impl ResourceDef {
    /// The resolution chain for this resource
    pub fn lookups(&self) -> Vec<Lookup<'_>> {
        self.lookup
            .iter()
            .map(|l| match l.as_str() {
                "id" => Lookup::Id,
                "name" => Lookup::Field(&self.name_field),
                field => Lookup::Field(field),
            })
            .collect()
    }

    pub fn collection_path(&self, parents: &[String]) -> Result<String> {
        expand_path(&self.path, parents, None)
    }

    pub fn item_path(&self, parents: &[String], id: &str) -> Result<String> {
        match &self.item_path {
            Some(template) => expand_path(template, parents, Some(id)),
            None => expand_path(&format!("{}/{{id}}", self.path), parents, Some(id)),
        }
    }

    pub fn create_path(&self, parents: &[String]) -> Result<String> {
        match &self.create_path {
            Some(template) => expand_path(template, parents, None),
            None => self.collection_path(parents),
        }
    }

    pub fn delete_path(&self, parents: &[String], id: &str) -> Result<String> {
        match &self.delete_path {
            Some(template) => expand_path(template, parents, Some(id)),
            None => self.item_path(parents, id),
        }
    }

    pub fn list_params(&self) -> Vec<(String, String)> {
        self.list_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Canonical id of an item of this resource
    pub fn item_id(&self, item: &Value) -> Result<String> {
        item.get(&self.id_field)
            .and_then(identifier_string)
            .ok_or_else(|| {
                Error::Unexpected(format!("{} has no '{}' field", self.display_name, self.id_field))
            })
    }
}

/// Render a JSON scalar the way users type identifiers
pub fn identifier_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fill `{0}`, `{1}`... with parent ids and `{id}` with the item id
pub fn expand_path(template: &str, parents: &[String], id: Option<&str>) -> Result<String> {
    let mut path = template.to_string();
    for (i, parent) in parents.iter().enumerate() {
        path = path.replace(&format!("{{{}}}", i), &urlencoding::encode(parent));
    }
    if let Some(id) = id {
        path = path.replace("{id}", &urlencoding::encode(id));
    }

    if path.contains('{') {
        return Err(Error::Config(format!(
            "Path '{}' needs more parent identifiers than the {} given",
            template,
            parents.len()
        )));
    }

    Ok(path)
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get a resource definition by key, or an error naming the unknown key
pub fn resource_def(key: &str) -> Result<&'static ResourceDef> {
    get_resource(key).ok_or_else(|| Error::Config(format!("Unknown resource: {}", key)))
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert!(
            !registry.resources.is_empty(),
            "Registry should have resources"
        );
    }

    #[test]
    fn test_vpcs_resource_exists() {
        let resource = get_resource("vpcs").expect("VPC resource should exist");
        assert_eq!(resource.display_name, "VPC");
        assert_eq!(resource.connection, Connection::Iaas);
        assert_eq!(resource.lookups(), vec![Lookup::Field("name"), Lookup::Id]);
        assert_eq!(resource.delete_status, vec![204]);
    }

    #[test]
    fn test_floating_ips_fall_back_to_address() {
        let resource = get_resource("floating-ips").unwrap();
        assert_eq!(
            resource.lookups(),
            vec![Lookup::Field("name"), Lookup::Id, Lookup::Field("address")]
        );
    }

    #[test]
    fn test_power_uses_its_own_fields() {
        let resource = get_resource("power-instances").unwrap();
        assert_eq!(resource.lookups()[0], Lookup::Field("serverName"));
        let item = json!({"pvmInstanceID": "abc", "serverName": "lpar"});
        assert_eq!(resource.item_id(&item).unwrap(), "abc");
    }

    #[test]
    fn test_every_resource_has_a_usable_chain() {
        for key in get_all_resource_keys() {
            let def = get_resource(key).unwrap();
            assert!(!def.lookup.is_empty(), "{} has no lookups", key);
            assert!(!def.delete_status.is_empty(), "{} has no delete status", key);
        }
    }

    #[test]
    fn test_item_path_templates() {
        let def = get_resource("load-balancer-pool-members").unwrap();
        let parents = vec!["lb-1".to_string(), "pool-2".to_string()];
        assert_eq!(
            def.item_path(&parents, "m-3").unwrap(),
            "load_balancers/lb-1/pools/pool-2/members/m-3"
        );
        assert!(def.collection_path(&parents[..1]).is_err());

        let def = get_resource("dns-domains").unwrap();
        assert_eq!(def.item_path(&[], "42").unwrap(), "SoftLayer_Dns_Domain/42/getObject");
        assert_eq!(def.delete_path(&[], "42").unwrap(), "SoftLayer_Dns_Domain/42");
        assert_eq!(def.create_path(&[]).unwrap(), "SoftLayer_Dns_Domain/createObject");
    }

    #[test]
    fn test_parents_exist_and_match_placeholders() {
        for key in get_all_resource_keys() {
            let def = get_resource(key).unwrap();
            let mut depth = 0;
            let mut current = def;
            while let Some(parent) = &current.parent {
                current = get_resource(parent)
                    .unwrap_or_else(|| panic!("{} has unknown parent {}", key, parent));
                depth += 1;
            }
            let parents: Vec<String> = (0..depth).map(|i| format!("p{}", i)).collect();
            assert!(def.collection_path(&parents).is_ok(), "{} needs {} parents", key, depth);
        }
    }

    #[test]
    fn test_expand_path_encodes_identifiers() {
        let path = expand_path("resource_instances/{id}", &[], Some("crn:v1:bluemix a")).unwrap();
        assert_eq!(path, "resource_instances/crn%3Av1%3Abluemix%20a");
    }

    #[test]
    fn test_numeric_ids() {
        let def = get_resource("bare-metal").unwrap();
        assert_eq!(def.item_id(&json!({"id": 1234})).unwrap(), "1234");
        assert!(def.item_id(&json!({"hostname": "x"})).is_err());
    }
}
