//! Key/value persistence port
//!
//! The equivalent of browser local storage: small JSON documents keyed by
//! name that survive a restart.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for small persistent documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError>;

    /// Delete a value; missing keys are not an error
    async fn remove(&self, key: &str) -> Result<(), ApplicationError>;
}
