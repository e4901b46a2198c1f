//! Cluster secret interface

use async_trait::async_trait;
use ssm_secret_core::{Result, SecretRecord};
use std::sync::Arc;

/// The secret calls the gateway relies on
///
/// Implementations report a missing secret as `SyncError::NotFound`, an
/// existing one on create as `SyncError::AlreadyExists`, and every other
/// failure as `SyncError::Remote`.
#[async_trait]
pub trait SecretApi: Send + Sync {
    /// Read a secret
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord>;

    /// Create a new secret
    async fn create(&self, record: &SecretRecord) -> Result<()>;

    /// Replace an existing secret with `record`
    ///
    /// When the record carries a resource version the replace only succeeds
    /// if the secret is still at that version.
    async fn replace(&self, record: &SecretRecord) -> Result<()>;
}

#[async_trait]
impl<A: SecretApi + ?Sized> SecretApi for Arc<A> {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord> {
        (**self).get(namespace, name).await
    }

    async fn create(&self, record: &SecretRecord) -> Result<()> {
        (**self).create(record).await
    }

    async fn replace(&self, record: &SecretRecord) -> Result<()> {
        (**self).replace(record).await
    }
}
