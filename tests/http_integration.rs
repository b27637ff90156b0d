//! Integration tests for the IBM Cloud client using wiremock
//!
//! Every connection is pointed at one mock server, with the IAM token
//! endpoint mocked alongside the API under test.

use ibmcloud_sdk::dns::DnsZones;
use ibmcloud_sdk::ibm::cache::MemoryCache;
use ibmcloud_sdk::power::PvmInstances;
use ibmcloud_sdk::resource::Collection;
use ibmcloud_sdk::resource_controller::ResourceInstances;
use ibmcloud_sdk::softlayer::{BareMetal, DnsDomains};
use ibmcloud_sdk::vpc::{CreateSubnet, FloatingIps, Subnets, Vpcs};
use ibmcloud_sdk::{Config, Connection, Error, IbmClient, Query};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{basic_auth, bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let uri = server.uri();
    Config::new("test-api-key", "us-south", "2021-01-12", "2")
        .with_endpoint(Connection::Auth, &uri)
        .with_endpoint(Connection::Iaas, &format!("{}/v1", uri))
        .with_endpoint(Connection::Rg, &format!("{}/v2", uri))
        .with_endpoint(Connection::Dns, &format!("{}/dns/v1", uri))
        .with_endpoint(Connection::Power, &format!("{}/pcloud/v1", uri))
        .with_endpoint(Connection::Sl, &format!("{}/rest/v3.1", uri))
}

async fn mock_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn setup() -> (MockServer, IbmClient) {
    let server = MockServer::start().await;
    mock_token(&server, 1).await;
    let client = IbmClient::without_cache(config_for(&server)).expect("client should build");
    (server, client)
}

/// Test module for identifier resolution
mod resolver_tests {
    use super::*;

    /// A name miss falls back to a GET by id
    #[tokio::test]
    async fn test_name_miss_falls_back_to_id() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "r006-other", "name": "other"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs/r006-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r006-abc", "name": "prod"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let vpc = Vpcs::new(&client).unwrap().get("r006-abc").await.unwrap();
        assert_eq!(vpc["name"], "prod");
    }

    /// A server error during the name lookup is returned without trying the id
    #[tokio::test]
    async fn test_server_error_short_circuits() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "errors": [{"code": "internal_error", "message": "boom"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs/prod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "prod"})))
            .expect(0)
            .mount(&server)
            .await;

        match Vpcs::new(&client).unwrap().get("prod").await {
            Err(Error::Api { status, code, .. }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(code, "internal_error");
            },
            other => panic!("expected API error, got {other:?}"),
        }
    }

    /// Floating IPs resolve by address after name and id miss, listing once
    #[tokio::test]
    async fn test_floating_ip_by_address() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/floating_ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floating_ips": [{"id": "r006-fip", "name": "web-ip", "address": "169.48.1.2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/floating_ips/169.48.1.2"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"code": "not_found", "message": "Floating IP not found"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fip = FloatingIps::new(&client).unwrap().get("169.48.1.2").await.unwrap();
        assert_eq!(fip["id"], "r006-fip");
    }

    /// Resource instances resolve by GUID after name and id miss
    #[tokio::test]
    async fn test_resource_instance_by_guid() {
        let (server, client) = setup().await;
        let crn = "crn:v1:bluemix:public:dns-svcs:global:a/acct:guid-9::";

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": [
                    {"id": "crn:v1:bluemix:public:cloud-object-storage:global:a/acct:guid-1::", "guid": "guid-1", "name": "cos"},
                    {"id": crn, "guid": "guid-9", "crn": crn, "name": "dns-svc"}
                ],
                "next_url": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances/guid-9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Instance not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let instances = ResourceInstances::new(&client).unwrap();
        let instance = instances.get("guid-9").await.unwrap();
        assert_eq!(instance["name"], "dns-svc");
        assert_eq!(instance["crn"], crn);
    }

    /// Every lookup missing gives a not-found error naming the kind
    #[tokio::test]
    async fn test_not_found_after_full_chain() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"vpcs": []})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = Vpcs::new(&client).unwrap().get("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "VPC not found: ghost");
    }
}

/// Test module for create and delete semantics
mod write_tests {
    use super::*;

    async fn mock_vpc_listing(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "r006-1", "name": "my-vpc"}]
            })))
            .mount(server)
            .await;
    }

    /// 204 is success for a VPC delete
    #[tokio::test]
    async fn test_delete_no_content_is_success() {
        let (server, client) = setup().await;
        mock_vpc_listing(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/v1/vpcs/r006-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Vpcs::new(&client).unwrap().delete("my-vpc").await.unwrap();
    }

    /// Any other status comes back as an API error carrying the body
    #[tokio::test]
    async fn test_delete_conflict_carries_body() {
        let (server, client) = setup().await;
        mock_vpc_listing(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/v1/vpcs/r006-1"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "errors": [{"code": "vpc_in_use", "message": "The VPC still has subnets"}]
            })))
            .mount(&server)
            .await;

        let err = Vpcs::new(&client).unwrap().delete("my-vpc").await.unwrap_err();
        match &err {
            Error::Api { status, code, .. } => {
                assert_eq!(status.as_u16(), 409);
                assert_eq!(code, "vpc_in_use");
            },
            other => panic!("expected API error, got {other:?}"),
        }
        assert_eq!(err.body().unwrap()["errors"][0]["message"], "The VPC still has subnets");
    }

    /// A create missing a mandatory field never touches the network
    #[tokio::test]
    async fn test_missing_argument_makes_no_request() {
        let server = MockServer::start().await;
        let client = IbmClient::without_cache(config_for(&server)).unwrap();

        let request = CreateSubnet {
            name: Some("web".to_string()),
            ..Default::default()
        };
        let err = Subnets::new(&client).unwrap().create(&request).await.unwrap_err();

        assert!(matches!(err, Error::MissingArgument("vpc")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    /// The query helper sends and returns JSON unchanged
    #[tokio::test]
    async fn test_json_round_trip() {
        let (server, client) = setup().await;

        let payload = json!({
            "name": "my-vpc",
            "classic_access": false,
            "resource_group": {"id": "rg-1"},
            "tags": ["a", "b"]
        });

        Mock::given(method("POST"))
            .and(path("/v1/vpcs"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(201).set_body_json(&payload))
            .expect(1)
            .mount(&server)
            .await;

        let echoed = client.post(Connection::Iaas, "vpcs", payload.clone()).await.unwrap();
        assert_eq!(echoed, payload);
    }
}

/// Test module for client behavior: cache, token refresh, pagination
mod client_tests {
    use super::*;

    /// An identical GET is served from the cache
    #[tokio::test]
    async fn test_cache_hit_skips_second_request() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        let client = IbmClient::without_cache(config_for(&server))
            .unwrap()
            .with_cache(Arc::new(MemoryCache::new()));

        Mock::given(method("GET"))
            .and(path("/v1/regions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "regions": [{"name": "us-south"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let first = client.query(Query::get(Connection::Iaas, "regions")).await.unwrap();
        let second = client.query(Query::get(Connection::Iaas, "regions")).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.data, second.data);
    }

    /// Writes are never cached
    #[tokio::test]
    async fn test_posts_bypass_cache() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        let client = IbmClient::without_cache(config_for(&server))
            .unwrap()
            .with_cache(Arc::new(MemoryCache::new()));

        Mock::given(method("POST"))
            .and(path("/v1/keys"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "k"})))
            .expect(2)
            .mount(&server)
            .await;

        for _ in 0..2 {
            client.post(Connection::Iaas, "keys", json!({})).await.unwrap();
        }
    }

    /// GETs marked uncached always reach the API
    #[tokio::test]
    async fn test_uncached_get_skips_cache() {
        let server = MockServer::start().await;
        mock_token(&server, 1).await;
        let client = IbmClient::without_cache(config_for(&server))
            .unwrap()
            .with_cache(Arc::new(MemoryCache::new()));

        Mock::given(method("GET"))
            .and(path("/v1/load_balancers/r006-lb/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active_connections": 3})))
            .expect(2)
            .mount(&server)
            .await;

        for _ in 0..2 {
            let response = client
                .query(Query::get(Connection::Iaas, "load_balancers/r006-lb/statistics").uncached())
                .await
                .unwrap();
            assert!(!response.cached);
        }
    }

    /// A 401 refreshes the token once and retries
    #[tokio::test]
    async fn test_unauthorized_refreshes_and_retries() {
        let server = MockServer::start().await;
        mock_token(&server, 2).await;
        let client = IbmClient::without_cache(config_for(&server)).unwrap();

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"vpcs": [{"id": "a"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let vpcs = Vpcs::new(&client).unwrap().list().await.unwrap();
        assert_eq!(vpcs.len(), 1);
    }

    /// A second 401 is returned rather than retried again
    #[tokio::test]
    async fn test_persistent_unauthorized_is_an_error() {
        let server = MockServer::start().await;
        mock_token(&server, 2).await;
        let client = IbmClient::without_cache(config_for(&server)).unwrap();

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        let err = Vpcs::new(&client).unwrap().list().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    /// A rejected API key surfaces the IAM error message
    #[tokio::test]
    async fn test_bad_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": "BXNIM0415E",
                "errorMessage": "Provided API key could not be found"
            })))
            .mount(&server)
            .await;
        let client = IbmClient::without_cache(config_for(&server)).unwrap();

        match client.get(Connection::Iaas, "vpcs").await {
            Err(Error::Auth(message)) => assert!(message.contains("could not be found")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    /// IaaS lists follow `next.href` until it runs out
    #[tokio::test]
    async fn test_iaas_pagination() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .and(query_param("start", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "c"}]
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "a"}, {"id": "b"}],
                "next": {"href": format!("{}/v1/vpcs?start=page-2&limit=100&version=2021-01-12&generation=2", server.uri())}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids: Vec<_> = Vpcs::new(&client)
            .unwrap()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    /// A next link pointing back at an earlier page ends the listing
    #[tokio::test]
    async fn test_pagination_loop_stops() {
        let (server, client) = setup().await;
        let href = |start: &str| {
            format!("{}/v1/vpcs?start={}&limit=100&version=2021-01-12&generation=2", server.uri(), start)
        };

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .and(query_param("start", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "b"}],
                "next": {"href": href("page-3")}
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .and(query_param("start", "page-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "c"}],
                "next": {"href": href("page-2")}
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/vpcs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vpcs": [{"id": "a"}],
                "next": {"href": href("page-2")}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids: Vec<_> = Vpcs::new(&client)
            .unwrap()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    /// Resource controller lists follow relative `next_url` links
    #[tokio::test]
    async fn test_resource_controller_pagination() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v2/resource_groups"))
            .and(query_param("next_docid", "xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": [{"id": "g2", "name": "dev"}],
                "next_url": null
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/resource_groups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": [{"id": "g1", "name": "default"}],
                "next_url": "/v2/resource_groups?next_docid=xyz"
            })))
            .mount(&server)
            .await;

        let groups = Collection::new(&client, "resource-groups").unwrap().list().await.unwrap();
        assert_eq!(groups.len(), 2);
    }
}

/// Test module for the non-IaaS connections
mod connection_tests {
    use super::*;

    /// Power requests carry the cloud instance CRN header
    #[tokio::test]
    async fn test_power_requests_carry_crn() {
        let (server, client) = setup().await;
        let crn = "crn:v1:bluemix:public:power-iaas:dal12:a/acct:guid-1::";

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": [{"id": crn, "guid": "guid-1", "crn": crn, "name": "power-ws"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/pcloud/v1/cloud-instances/guid-1/pvm-instances"))
            .and(header("CRN", crn))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pvmInstances": [{"pvmInstanceID": "p1", "serverName": "lpar1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let instances = PvmInstances::new(&client, "power-ws").await.unwrap();
        let lpar = instances.get("lpar1").await.unwrap();
        assert_eq!(lpar["pvmInstanceID"], "p1");
    }

    /// Power instance deletes accept 202 Accepted
    #[tokio::test]
    async fn test_power_delete_accepted() {
        let (server, client) = setup().await;
        let crn = "crn:v1:bluemix:public:power-iaas:dal12:a/acct:guid-1::";

        Mock::given(method("GET"))
            .and(path("/v2/resource_instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": [{"id": crn, "guid": "guid-1", "crn": crn, "name": "power-ws"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/pcloud/v1/cloud-instances/guid-1/pvm-instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pvmInstances": [{"pvmInstanceID": "p1", "serverName": "lpar1"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/pcloud/v1/cloud-instances/guid-1/pvm-instances/p1"))
            .and(header("CRN", crn))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let instances = PvmInstances::new(&client, "power-ws").await.unwrap();
        instances.delete("lpar1").await.unwrap();
    }

    /// Removing a permitted network is asynchronous and answers 202
    #[tokio::test]
    async fn test_permitted_network_removal_accepted() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/dns/v1/instances/dns-guid/dnszones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dnszones": [{"id": "zone-1", "name": "example.internal"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/dns/v1/instances/dns-guid/dnszones/zone-1/permitted_networks/pn-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pn-1", "type": "vpc", "state": "ACTIVE"
            })))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/dns/v1/instances/dns-guid/dnszones/zone-1/permitted_networks/pn-1"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "id": "pn-1", "type": "vpc", "state": "REMOVAL_IN_PROGRESS"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let networks = DnsZones::for_guid(&client, "dns-guid")
            .unwrap()
            .permitted_networks("example.internal")
            .await
            .unwrap();
        networks.remove("pn-1").await.unwrap();
    }

    /// Classic deletes answer 200 with `true`
    #[tokio::test]
    async fn test_softlayer_delete_ok() {
        let server = MockServer::start().await;
        let config = config_for(&server).with_softlayer("sl-user", "sl-key");
        let client = IbmClient::without_cache(config).unwrap();

        Mock::given(method("GET"))
            .and(path("/rest/v3.1/SoftLayer_Account/getDomains"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 42, "name": "example.com"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v3.1/SoftLayer_Dns_Domain/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        DnsDomains::new(&client).unwrap().delete("example.com").await.unwrap();
    }

    /// Bare metal power actions are never answered from the cache
    #[tokio::test]
    async fn test_bare_metal_power_bypasses_cache() {
        let server = MockServer::start().await;
        let config = config_for(&server).with_softlayer("sl-user", "sl-key");
        let client = IbmClient::without_cache(config)
            .unwrap()
            .with_cache(Arc::new(MemoryCache::new()));

        Mock::given(method("GET"))
            .and(path("/rest/v3.1/SoftLayer_Account/getHardware"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "hostname": "db01"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v3.1/SoftLayer_Hardware_Server/1/powerOff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v3.1/SoftLayer_Hardware_Server/1/powerOn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let servers = BareMetal::new(&client).unwrap();
        servers.power_off("db01").await.unwrap();
        servers.power_on("db01").await.unwrap();
        servers.power_off("db01").await.unwrap();
    }

    /// Classic infrastructure uses basic auth and never asks IAM for a token
    #[tokio::test]
    async fn test_softlayer_basic_auth() {
        let server = MockServer::start().await;
        mock_token(&server, 0).await;
        let config = config_for(&server).with_softlayer("sl-user", "sl-key");
        let client = IbmClient::without_cache(config).unwrap();

        Mock::given(method("GET"))
            .and(path("/rest/v3.1/SoftLayer_Account/getHardware"))
            .and(basic_auth("sl-user", "sl-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1001, "hostname": "db01", "fullyQualifiedDomainName": "db01.example.com"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v3.1/SoftLayer_Hardware_Server/1001/powerOff"))
            .and(basic_auth("sl-user", "sl-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let servers = BareMetal::new(&client).unwrap();
        let server_record = servers.get("db01.example.com").await.unwrap();
        assert_eq!(server_record["id"], 1001);
        assert_eq!(servers.power_off("db01").await.unwrap(), json!(true));
    }

    /// Classic calls without credentials fail before any request
    #[tokio::test]
    async fn test_softlayer_requires_credentials() {
        let server = MockServer::start().await;
        let client = IbmClient::without_cache(config_for(&server)).unwrap();

        let err = BareMetal::new(&client).unwrap().list().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
