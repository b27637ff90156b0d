//! Cloud Object Storage
//!
//! S3-compatible bucket and object operations. Requests authenticate with
//! the IAM bearer token; bucket listing and creation also carry the COS
//! resource instance id in the `ibm-service-instance-id` header.

mod xml;

pub use xml::{Bucket, Object};

use crate::config::Connection;
use crate::error::{Error, Result};
use crate::ibm::client::{IbmClient, Query, QueryResponse};
use crate::resource_controller::ResourceInstances;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use xml::{ListAllMyBuckets, ListBucket, S3Error};

const INSTANCE_HEADER: &str = "ibm-service-instance-id";

/// Object storage operations for one COS instance
pub struct ObjectStorage<'a> {
    client: &'a IbmClient,
    instance_id: String,
}

impl<'a> ObjectStorage<'a> {
    /// Scope to a COS instance given by name, id, GUID or CRN
    pub async fn new(client: &'a IbmClient, instance: &str) -> Result<Self> {
        let record = ResourceInstances::new(client)?.get(instance).await?;
        let instance_id = record
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Unexpected("resource instance has no 'id'".to_string()))?;
        Ok(Self::for_instance_id(client, instance_id))
    }

    /// Scope to a COS instance whose id (CRN) is already known
    pub fn for_instance_id(client: &'a IbmClient, instance_id: &str) -> Self {
        Self {
            client,
            instance_id: instance_id.to_string(),
        }
    }

    pub async fn buckets(&self) -> Result<Vec<Bucket>> {
        let response = self.send(self.query(Method::GET, "")).await?;
        let parsed: ListAllMyBuckets = quick_xml::de::from_str(&response.text())?;
        Ok(parsed.into_buckets())
    }

    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let response = self
            .client
            .query(self.query(Method::HEAD, &bucket_path(bucket)?))
            .await?;
        match response.status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(s3_error(response)),
        }
    }

    /// Create a bucket, optionally with a location constraint such as
    /// `us-south-standard`
    pub async fn create_bucket(&self, bucket: &str, location: Option<&str>) -> Result<()> {
        let mut query = self.query(Method::PUT, &bucket_path(bucket)?);
        if let Some(location) = location {
            let body = format!(
                "<CreateBucketConfiguration><LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
                quick_xml::escape::escape(location)
            );
            query = query.bytes("application/xml", body.into_bytes());
        }
        tracing::info!("Creating bucket {}", bucket);
        self.send(query).await?;
        Ok(())
    }

    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        tracing::info!("Deleting bucket {}", bucket);
        self.send(self.query(Method::DELETE, &bucket_path(bucket)?)).await?;
        Ok(())
    }

    /// List every object in a bucket, optionally under a prefix
    pub async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<Object>> {
        let path = bucket_path(bucket)?;
        let mut objects = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let mut query = self.query(Method::GET, &path).param("list-type", "2");
            if let Some(prefix) = prefix {
                query = query.param("prefix", prefix);
            }
            if let Some(token) = &token {
                query = query.param("continuation-token", token);
            }

            let response = self.send(query).await?;
            let page: ListBucket = quick_xml::de::from_str(&response.text())?;
            objects.extend(page.contents);

            match page.next_continuation_token {
                Some(next) if page.is_truncated && token.as_ref() != Some(&next) => token = Some(next),
                _ => break,
            }
        }

        Ok(objects)
    }

    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self.send(self.query(Method::GET, &object_path(bucket, key)?)).await?;
        Ok(response.bytes)
    }

    pub async fn put_object(&self, bucket: &str, key: &str, content_type: &str, data: Vec<u8>) -> Result<()> {
        let query = self
            .query(Method::PUT, &object_path(bucket, key)?)
            .bytes(content_type, data);
        self.send(query).await?;
        Ok(())
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.send(self.query(Method::DELETE, &object_path(bucket, key)?)).await?;
        Ok(())
    }

    fn query(&self, method: Method, path: &str) -> Query {
        Query::new(Connection::Cos, method, path).header(INSTANCE_HEADER, &self.instance_id)
    }

    async fn send(&self, query: Query) -> Result<QueryResponse> {
        let response = self.client.query(query).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(s3_error(response))
        }
    }
}

fn bucket_path(bucket: &str) -> Result<String> {
    if bucket.is_empty() || bucket.contains('/') {
        return Err(Error::InvalidArgument(format!("invalid bucket name '{}'", bucket)));
    }
    Ok(bucket.to_string())
}

/// Keys keep their `/` separators; each segment is percent-encoded
fn object_path(bucket: &str, key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(Error::MissingArgument("key"));
    }
    let key: Vec<_> = key.split('/').map(|s| urlencoding::encode(s).into_owned()).collect();
    Ok(format!("{}/{}", bucket_path(bucket)?, key.join("/")))
}

/// Build `Error::Api` from an S3 XML error document
fn s3_error(response: QueryResponse) -> Error {
    let text = response.text();
    match quick_xml::de::from_str::<S3Error>(&text) {
        Ok(S3Error { code, message }) => Error::Api {
            status: response.status,
            code: code.unwrap_or_else(|| response.status.as_str().to_string()),
            message: message.unwrap_or_else(|| {
                response.status.canonical_reason().unwrap_or("unknown").to_string()
            }),
            body: Some(Value::String(text)),
        },
        Err(_) => Error::from_response(response.status, response.data),
    }
}
