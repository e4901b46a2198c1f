//! Import, export and list flows

use crate::outcome::{ExportOutcome, ImportAction, ImportOutcome, KeyWarning, ListSource, Listing};
use ssm_secret_core::codec;
use ssm_secret_core::{Result, SecretBundle, SyncError, SyncOptions};
use ssm_secret_k8s::{SecretApi, SecretStore};
use ssm_secret_params::{ParameterApi, ParameterStore};
use tracing::{debug, info};

/// Drives transfers between the parameter store and cluster secrets
///
/// Built once per command with its options; every call runs its remote
/// requests one after another.
pub struct SyncEngine<P, S> {
    params: ParameterStore<P>,
    secrets: SecretStore<S>,
    options: SyncOptions,
}

impl<P: ParameterApi, S: SecretApi> SyncEngine<P, S> {
    pub fn new(params: ParameterStore<P>, secrets: SecretStore<S>, options: SyncOptions) -> Self {
        Self {
            params,
            secrets,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn params(&self) -> &ParameterStore<P> {
        &self.params
    }

    pub fn secrets(&self) -> &SecretStore<S> {
        &self.secrets
    }

    /// Copy the parameters under the configured path into secret `name`
    ///
    /// 1. Fetch all parameters at the path (empty is an error)
    /// 2. Decode values when the codec is enabled
    /// 3. Create the secret; if it exists, update it only with overwrite
    pub async fn import(&self, name: &str) -> Result<ImportOutcome> {
        self.options.validate()?;
        let path = self.options.path.as_str();

        let bundle = self.params.fetch_by_path(path).await?;
        if bundle.is_empty() {
            return Err(SyncError::empty_source(format!(
                "parameter store path {}",
                path
            )));
        }

        let (bundle, warnings) = if self.options.codec {
            let (decoded, warnings) = codec::decode_bundle(bundle);
            let warnings = warnings
                .into_iter()
                .map(|(key, warning)| KeyWarning::from_codec(key, &warning))
                .collect();
            (decoded, warnings)
        } else {
            (bundle, Vec::new())
        };

        info!(
            "Importing {} keys from {} into secret {}/{}",
            bundle.len(),
            path,
            self.secrets.namespace(),
            name
        );

        let action = match self.secrets.create(name, &bundle, self.options.kind).await {
            Ok(()) => ImportAction::Created,
            Err(e) if e.is_already_exists() && self.options.overwrite => {
                debug!("Secret {} exists, overwriting", name);
                self.secrets.update(name, &bundle).await?;
                ImportAction::Updated
            }
            Err(e) => return Err(e),
        };

        Ok(ImportOutcome {
            name: name.to_string(),
            namespace: self.secrets.namespace().to_string(),
            path: path.to_string(),
            action,
            keys: bundle.keys().map(str::to_string).collect(),
            warnings,
        })
    }

    /// Copy the data of secret `name` under the configured path
    ///
    /// 1. Fetch the secret (empty is an error)
    /// 2. Encode values when the codec is enabled
    /// 3. Write every key under the path
    pub async fn export(&self, name: &str) -> Result<ExportOutcome> {
        self.options.validate()?;
        let path = self.options.path.as_str();

        let bundle = self.secrets.fetch(name).await?;
        if bundle.is_empty() {
            return Err(SyncError::empty_source(format!(
                "secret {}/{}",
                self.secrets.namespace(),
                name
            )));
        }

        let bundle = if self.options.codec {
            codec::encode_bundle(bundle)?
        } else {
            bundle
        };

        info!(
            "Exporting {} keys from secret {}/{} to {}",
            bundle.len(),
            self.secrets.namespace(),
            name,
            path
        );

        let report = self
            .params
            .store_by_path(
                path,
                &bundle,
                self.options.overwrite,
                self.options.allow_large_value,
            )
            .await?;

        Ok(ExportOutcome {
            name: name.to_string(),
            namespace: self.secrets.namespace().to_string(),
            path: path.to_string(),
            report,
        })
    }

    /// Read parameter store paths, then named secrets, in order
    ///
    /// Stops at the first source that fails or holds no keys. Store values
    /// are decoded when the codec is enabled.
    pub async fn list(&self, paths: &[String], names: &[String]) -> Result<Vec<Listing>> {
        let mut listings = Vec::with_capacity(paths.len() + names.len());

        for path in paths {
            let bundle = self.params.fetch_by_path(path).await?;
            if bundle.is_empty() {
                return Err(SyncError::empty_source(format!(
                    "parameter store path {}",
                    path
                )));
            }
            listings.push(Listing {
                source: ListSource::Path { path: path.clone() },
                data: self.maybe_decode(bundle),
            });
        }

        for name in names {
            let bundle = self.secrets.fetch(name).await?;
            if bundle.is_empty() {
                return Err(SyncError::empty_source(format!(
                    "secret {}/{}",
                    self.secrets.namespace(),
                    name
                )));
            }
            listings.push(Listing {
                source: ListSource::Secret {
                    namespace: self.secrets.namespace().to_string(),
                    name: name.clone(),
                },
                data: bundle,
            });
        }

        Ok(listings)
    }

    fn maybe_decode(&self, bundle: SecretBundle) -> SecretBundle {
        if self.options.codec {
            codec::decode_bundle(bundle).0
        } else {
            bundle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssm_secret_core::{SecretKind, SecretRecord};
    use ssm_secret_k8s::MemorySecretApi;
    use ssm_secret_params::MemoryParameterApi;

    fn engine(
        params: MemoryParameterApi,
        secrets: MemorySecretApi,
        options: SyncOptions,
    ) -> SyncEngine<MemoryParameterApi, MemorySecretApi> {
        SyncEngine::new(
            ParameterStore::new(params),
            SecretStore::new(secrets, "test"),
            options,
        )
    }

    #[tokio::test]
    async fn test_import_rejects_relative_path() {
        let engine = engine(
            MemoryParameterApi::new(),
            MemorySecretApi::new(),
            SyncOptions::new("foo"),
        );
        let err = engine.import("foo").await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig { .. }));
    }

    #[tokio::test]
    async fn test_import_empty_path_is_error() {
        let engine = engine(
            MemoryParameterApi::new(),
            MemorySecretApi::new(),
            SyncOptions::new("/foo"),
        );
        let err = engine.import("foo").await.unwrap_err();
        assert!(matches!(err, SyncError::EmptySource { .. }));
        assert_eq!(engine.secrets().api().record("test", "foo"), None);
    }

    #[tokio::test]
    async fn test_import_remote_failure_propagates() {
        let params = MemoryParameterApi::new().with_parameter("/foo/a", "1");
        let engine = engine(
            params,
            MemorySecretApi::new().with_failing_writes(),
            SyncOptions::new("/foo").with_overwrite(true),
        );
        let err = engine.import("foo").await.unwrap_err();
        assert!(matches!(err, SyncError::Remote { .. }));
    }

    #[tokio::test]
    async fn test_import_tls_kind() {
        let params = MemoryParameterApi::new()
            .with_parameter("/web/tls.crt", "cert")
            .with_parameter("/web/tls.key", "key");
        let engine = engine(
            params,
            MemorySecretApi::new(),
            SyncOptions::new("/web").with_kind(SecretKind::Tls),
        );

        engine.import("web").await.unwrap();
        let record = engine.secrets().api().record("test", "web").unwrap();
        assert_eq!(record.kind(), Some(SecretKind::Tls));
    }

    #[tokio::test]
    async fn test_export_empty_secret_is_error() {
        let secrets = MemorySecretApi::new().with_secret(SecretRecord::new(
            "test",
            "foo",
            SecretKind::Opaque,
            SecretBundle::new(),
        ));
        let engine = engine(MemoryParameterApi::new(), secrets, SyncOptions::new("/foo"));

        let err = engine.export("foo").await.unwrap_err();
        assert!(matches!(err, SyncError::EmptySource { .. }));
        assert!(engine.params().api().put_requests().is_empty());
    }

    #[tokio::test]
    async fn test_export_missing_secret_is_not_found() {
        let engine = engine(
            MemoryParameterApi::new(),
            MemorySecretApi::new(),
            SyncOptions::new("/foo"),
        );
        assert!(engine.export("foo").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_stops_at_first_failure() {
        let params = MemoryParameterApi::new().with_parameter("/foo/a", "1");
        let engine = engine(params, MemorySecretApi::new(), SyncOptions::default());

        let paths = vec!["/empty".to_string(), "/foo".to_string()];
        let err = engine.list(&paths, &[]).await.unwrap_err();
        assert!(matches!(err, SyncError::EmptySource { .. }));
        // the second path was never requested
        assert_eq!(engine.params().api().get_requests().len(), 1);
    }
}
