//! S3 XML documents

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Bucket {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CreationDate", default)]
    pub creation_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BucketList {
    #[serde(rename = "Bucket", default)]
    bucket: Vec<Bucket>,
}

/// `ListAllMyBucketsResult`
#[derive(Debug, Deserialize)]
pub(crate) struct ListAllMyBuckets {
    #[serde(rename = "Buckets", default)]
    buckets: BucketList,
}

impl ListAllMyBuckets {
    pub(crate) fn into_buckets(self) -> Vec<Bucket> {
        self.buckets.bucket
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Object {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Size", default)]
    pub size: u64,
    #[serde(rename = "LastModified", default)]
    pub last_modified: Option<String>,
    #[serde(rename = "ETag", default)]
    pub etag: Option<String>,
    #[serde(rename = "StorageClass", default)]
    pub storage_class: Option<String>,
}

/// `ListBucketResult` (list-type 2)
#[derive(Debug, Deserialize)]
pub(crate) struct ListBucket {
    #[serde(rename = "Contents", default)]
    pub contents: Vec<Object>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextContinuationToken", default)]
    pub next_continuation_token: Option<String>,
}

/// S3 `Error` document
#[derive(Debug, Deserialize)]
pub(crate) struct S3Error {
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}
