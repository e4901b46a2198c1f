//! Shared helpers for sync flow tests

use ssm_secret_core::{SecretBundle, SecretKind, SecretRecord, SyncOptions};
use ssm_secret_k8s::{MemorySecretApi, SecretStore};
use ssm_secret_params::{MemoryParameterApi, ParameterStore};
use ssm_secret_sync::SyncEngine;
use std::sync::Arc;

pub const NAMESPACE: &str = "test";

pub type TestEngine = SyncEngine<Arc<MemoryParameterApi>, Arc<MemorySecretApi>>;

/// Engine over shared in-memory gateways, so tests can inspect them afterwards
pub fn engine(
    params: &Arc<MemoryParameterApi>,
    secrets: &Arc<MemorySecretApi>,
    options: SyncOptions,
) -> TestEngine {
    SyncEngine::new(
        ParameterStore::new(Arc::clone(params)),
        SecretStore::new(Arc::clone(secrets), NAMESPACE),
        options,
    )
}

pub fn bundle(pairs: &[(&str, &str)]) -> SecretBundle {
    pairs.iter().copied().collect()
}

/// Opaque secret in the test namespace
pub fn opaque_secret(name: &str, pairs: &[(&str, &str)]) -> SecretRecord {
    SecretRecord::new(NAMESPACE, name, SecretKind::Opaque, bundle(pairs))
}
