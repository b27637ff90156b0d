//! IBM Cloud API interaction module
//!
//! This module provides the core functionality for talking to IBM Cloud
//! APIs: IAM authentication, the HTTP transport, the read-through cache and
//! the client that ties them together.
//!
//! # Module Structure
//!
//! - [`auth`] - API key to bearer token exchange with token caching
//! - [`cache`] - Read-through cache backends (in-process, memcached)
//! - [`client`] - Main client and the generic [`client::Query`] helper
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use ibmcloud_sdk::{Config, Connection, IbmClient};
//!
//! async fn example() -> ibmcloud_sdk::Result<()> {
//!     let client = IbmClient::new(Config::load()?).await?;
//!     let vpcs = client.get(Connection::Iaas, "vpcs").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod client;
pub mod http;
