//! Async client SDK for IBM Cloud infrastructure APIs.
//!
//! One [`IbmClient`] holds configuration, the IAM token and the optional
//! read-through cache. Resource handles borrow it and take names or ids
//! wherever they take an identifier:
//!
//! ```ignore
//! use ibmcloud_sdk::{vpc::Vpcs, Config, IbmClient};
//!
//! #[tokio::main]
//! async fn main() -> ibmcloud_sdk::Result<()> {
//!     let client = IbmClient::new(Config::load()?).await?;
//!     let vpc = Vpcs::new(&client)?.get("my-vpc").await?;
//!     println!("{}", vpc["id"]);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dns;
pub mod enterprise;
pub mod error;
pub mod ibm;
pub mod object_storage;
pub mod power;
pub mod resource;
pub mod resource_controller;
pub mod softlayer;
pub mod vpc;

pub use config::{Config, Connection};
pub use error::{Error, Result};
pub use ibm::client::{IbmClient, Query, QueryResponse};
