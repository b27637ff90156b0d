//! Property-based tests using proptest
//!
//! These tests check the pure helpers behind resolution and pagination:
//! field matching, path expansion and next-page parsing.

use ibmcloud_sdk::ibm::cache::cache_key;
use ibmcloud_sdk::resource::{expand_path, extract_json_value, find_by_field, next_page_params};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate arbitrary VPC-like records
fn arb_record() -> impl Strategy<Value = Value> {
    (
        "r006-[a-f0-9]{8}",    // id
        "[a-z][a-z0-9-]{0,62}", // name
        prop_oneof!["available", "pending", "deleting", "failed"],
        "(us-south|eu-de|jp-tok)-[1-3]",
    )
        .prop_map(|(id, name, status, zone)| {
            json!({
                "id": id,
                "name": name,
                "status": status,
                "zone": {"name": zone}
            })
        })
}

/// Generate a list of records
fn arb_record_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_record(), 0..100)
}

proptest! {
    /// Whatever find_by_field returns really has the field equal to the identifier
    #[test]
    fn found_item_matches(items in arb_record_list(), needle in "[a-z][a-z0-9-]{0,10}") {
        if let Some(found) = find_by_field(&items, "name", &needle) {
            prop_assert_eq!(found["name"].as_str(), Some(needle.as_str()));
        }
    }

    /// Every item in the list can be found by its own id, and the first match wins
    #[test]
    fn every_id_is_findable(items in arb_record_list()) {
        for item in &items {
            let id = item["id"].as_str().unwrap();
            let found = find_by_field(&items, "id", id).unwrap();
            let first = items.iter().find(|i| i["id"] == item["id"]).unwrap();
            prop_assert_eq!(found, first);
        }
    }

    /// A field nobody has never matches
    #[test]
    fn missing_field_never_matches(items in arb_record_list(), needle in ".*") {
        prop_assert!(find_by_field(&items, "fingerprint", &needle).is_none());
    }

    /// Expanded paths contain no placeholders and no raw separators from ids
    #[test]
    fn expand_path_fills_all_placeholders(
        parent in "[ -~]{1,40}",
        id in "[ -~]{1,40}",
    ) {
        let path = expand_path("load_balancers/{0}/pools/{id}", &[parent], Some(&id)).unwrap();
        prop_assert!(!path.contains('{'), "path still contains a placeholder: {}", path);
        prop_assert_eq!(path.matches('/').count(), 3);
        prop_assert!(path.starts_with("load_balancers/"));
    }

    /// Too few parents is an error rather than a half-filled path
    #[test]
    fn expand_path_rejects_missing_parents(id in "[a-z0-9-]{1,20}") {
        prop_assert!(expand_path("vpcs/{0}/routes/{id}", &[], Some(&id)).is_err(), "expected error for missing parents");
    }

    /// The start token survives a round trip through a next link, and
    /// version/generation never leak into page parameters
    #[test]
    fn next_page_keeps_start_token(start in "[A-Za-z0-9_-]{1,40}", limit in 1u32..200) {
        let body = json!({
            "next": {"href": format!(
                "https://us-south.iaas.cloud.ibm.com/v1/vpcs?limit={}&start={}&version=2021-01-12&generation=2",
                limit, start
            )}
        });
        let params = next_page_params(&body).unwrap();
        prop_assert!(params.contains(&("start".to_string(), start.clone())));
        prop_assert!(params.contains(&("limit".to_string(), limit.to_string())));
        prop_assert!(params.iter().all(|(k, _)| k != "version" && k != "generation"));
    }

    /// Cache keys are always usable as memcached keys
    #[test]
    fn cache_keys_are_memcached_safe(account in "[ -~]{0,40}", path in "[ -~\u{80}-\u{10ff}]{0,400}") {
        let key = cache_key(&account, &path);
        prop_assert!(key.len() <= 250);
        prop_assert!(key.chars().all(|c| c.is_ascii_graphic()));
    }

    /// extract_json_value never panics on arbitrary paths
    #[test]
    fn extract_json_value_is_total(item in arb_record(), path in "[a-z0-9.]{0,20}") {
        let _ = extract_json_value(&item, &path);
    }
}

#[test]
fn test_zone_column_extraction() {
    let item = json!({"zone": {"name": "us-south-1"}});
    assert_eq!(extract_json_value(&item, "zone.name"), "us-south-1");
}

#[test]
fn test_cache_key_is_stable() {
    assert_eq!(cache_key("acct", "/v1/vpcs"), cache_key("acct", "/v1/vpcs"));
    assert_ne!(cache_key("acct", "/v1/vpcs"), cache_key("other", "/v1/vpcs"));
}
