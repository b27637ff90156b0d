//! Enterprise management
//!
//! Read-only views of the accounts and account groups of an enterprise.

use crate::error::Result;
use crate::ibm::client::IbmClient;
use crate::resource::Collection;
use serde_json::Value;

/// Enterprise accounts
pub struct Accounts<'a> {
    accounts: Collection<'a>,
}

impl<'a> Accounts<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            accounts: Collection::new(client, "accounts")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.accounts.list().await
    }

    /// Get an account by name or id
    pub async fn get(&self, account: &str) -> Result<Value> {
        self.accounts.get(account).await
    }
}

/// Enterprise account groups
pub struct AccountGroups<'a> {
    groups: Collection<'a>,
}

impl<'a> AccountGroups<'a> {
    pub fn new(client: &'a IbmClient) -> Result<Self> {
        Ok(Self {
            groups: Collection::new(client, "account-groups")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        self.groups.list().await
    }

    /// Get an account group by name or id
    pub async fn get(&self, group: &str) -> Result<Value> {
        self.groups.get(group).await
    }
}
