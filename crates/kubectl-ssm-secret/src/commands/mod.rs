//! CLI command implementations

pub mod export;
pub mod import;
pub mod list;
pub mod version;

use anyhow::{Context, Result};
use ssm_secret_core::{ClusterConfig, StoreConfig, SyncOptions};
use ssm_secret_k8s::{KubectlRunner, KubectlSecretApi, SecretStore};
use ssm_secret_params::{ParameterStore, SsmParameterApi};
use ssm_secret_sync::SyncEngine;
use tracing::debug;

/// Namespace used when no secret is touched and none was given
const DEFAULT_NAMESPACE: &str = "default";

pub type Engine = SyncEngine<SsmParameterApi, KubectlSecretApi>;

/// Build the engine against AWS and the current kube context
///
/// The namespace is fixed here, once, before any secret is touched. kubectl
/// is only consulted for it when `uses_secrets` is set.
pub async fn connect(
    store: &StoreConfig,
    cluster: &ClusterConfig,
    options: SyncOptions,
    uses_secrets: bool,
) -> Result<Engine> {
    let params = SsmParameterApi::new(store).await;
    let secrets = KubectlSecretApi::new(cluster);
    let namespace = resolve_namespace(&secrets, cluster, uses_secrets).await?;
    debug!(
        "Using region {} and namespace {}",
        params.region(),
        namespace
    );

    Ok(SyncEngine::new(
        ParameterStore::new(params),
        SecretStore::new(secrets, namespace),
        options,
    ))
}

async fn resolve_namespace<R: KubectlRunner>(
    api: &KubectlSecretApi<R>,
    cluster: &ClusterConfig,
    uses_secrets: bool,
) -> Result<String> {
    if let Some(namespace) = &cluster.namespace {
        return Ok(namespace.clone());
    }
    if !uses_secrets {
        return Ok(DEFAULT_NAMESPACE.to_string());
    }
    api.current_namespace()
        .await
        .context("Failed to resolve the current namespace")
}
