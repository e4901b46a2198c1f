//! In-memory cluster secrets

use crate::api::SecretApi;
use async_trait::async_trait;
use ssm_secret_core::{Result, SecretRecord, SyncError};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type SecretKey = (String, String);

/// Secrets held in memory, keyed by (namespace, name)
///
/// Every stored secret gets a resource version, bumped on each replace, so
/// stale replaces fail the way they do against a real API server.
#[derive(Debug, Default)]
pub struct MemorySecretApi {
    secrets: Mutex<BTreeMap<SecretKey, SecretRecord>>,
    fail_writes: bool,
}

impl MemorySecretApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing secret at resource version 1
    pub fn with_secret(self, mut record: SecretRecord) -> Self {
        record.metadata.resource_version = Some("1".to_string());
        self.lock()
            .insert((record.namespace.clone(), record.name.clone()), record);
        self
    }

    /// Make every create and replace fail with a remote fault
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Current state of a secret
    pub fn record(&self, namespace: &str, name: &str) -> Option<SecretRecord> {
        self.lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SecretKey, SecretRecord>> {
        self.secrets.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self, operation: &str) -> Result<()> {
        if self.fail_writes {
            return Err(SyncError::remote(
                operation,
                "the server is currently unable to handle the request",
            ));
        }
        Ok(())
    }
}

fn next_version(current: Option<&str>) -> String {
    let current = current.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
    (current + 1).to_string()
}

#[async_trait]
impl SecretApi for MemorySecretApi {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord> {
        self.record(namespace, name)
            .ok_or_else(|| SyncError::not_found(namespace, name))
    }

    async fn create(&self, record: &SecretRecord) -> Result<()> {
        self.check_writable("create secret")?;
        let mut secrets = self.lock();
        let key = (record.namespace.clone(), record.name.clone());
        if secrets.contains_key(&key) {
            return Err(SyncError::already_exists(&record.namespace, &record.name));
        }
        let mut stored = record.clone();
        stored.metadata.resource_version = Some(next_version(None));
        secrets.insert(key, stored);
        Ok(())
    }

    async fn replace(&self, record: &SecretRecord) -> Result<()> {
        self.check_writable("replace secret")?;
        let mut secrets = self.lock();
        let current = secrets
            .get_mut(&(record.namespace.clone(), record.name.clone()))
            .ok_or_else(|| SyncError::not_found(&record.namespace, &record.name))?;

        if let Some(expected) = record.resource_version() {
            if current.resource_version() != Some(expected) {
                return Err(SyncError::remote(
                    "replace secret",
                    format!(
                        "Operation cannot be fulfilled on secrets \"{}\": \
                         the object has been modified",
                        record.name
                    ),
                ));
            }
        }

        let version = next_version(current.resource_version());
        *current = record.clone();
        current.metadata.resource_version = Some(version);
        Ok(())
    }
}
