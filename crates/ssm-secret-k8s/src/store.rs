//! Namespaced secret reads and writes

use crate::api::SecretApi;
use ssm_secret_core::{Result, SecretBundle, SecretKind, SecretRecord, SyncError};
use tracing::{debug, info};

/// Secret gateway bound to one namespace
pub struct SecretStore<A> {
    api: A,
    namespace: String,
}

impl<A: SecretApi> SecretStore<A> {
    pub fn new(api: A, namespace: impl Into<String>) -> Self {
        Self {
            api,
            namespace: namespace.into(),
        }
    }

    /// Switch namespace; call before any operation
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The underlying cluster API
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Read the data of secret `name`
    pub async fn fetch(&self, name: &str) -> Result<SecretBundle> {
        let record = self.api.get(&self.namespace, name).await?;
        debug!(
            "Read secret {}/{} ({} keys)",
            self.namespace,
            name,
            record.data.len()
        );
        Ok(record.data)
    }

    /// Create secret `name` with the given kind
    pub async fn create(&self, name: &str, bundle: &SecretBundle, kind: SecretKind) -> Result<()> {
        if bundle.is_empty() {
            return Err(SyncError::empty_source(format!(
                "bundle for secret {}",
                name
            )));
        }

        let record = SecretRecord::new(&self.namespace, name, kind, bundle.clone());
        self.api.create(&record).await?;
        info!(
            "Created {} secret {}/{} ({} keys)",
            kind,
            self.namespace,
            name,
            bundle.len()
        );
        Ok(())
    }

    /// Replace the data of existing secret `name`
    ///
    /// Reads the secret first and replaces it at the version read, keeping its
    /// type, labels and annotations.
    pub async fn update(&self, name: &str, bundle: &SecretBundle) -> Result<()> {
        if bundle.is_empty() {
            return Err(SyncError::empty_source(format!(
                "bundle for secret {}",
                name
            )));
        }

        let mut record = self.api.get(&self.namespace, name).await?;
        debug!(
            "Replacing secret {}/{} at resource version {}",
            self.namespace,
            name,
            record.resource_version().unwrap_or("<none>")
        );
        record.data = bundle.clone();
        self.api.replace(&record).await?;
        info!(
            "Updated secret {}/{} ({} keys)",
            self.namespace,
            name,
            bundle.len()
        );
        Ok(())
    }
}
