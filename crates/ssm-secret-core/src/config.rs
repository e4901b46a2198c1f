//! Configuration for the parameter store client, the cluster client and a
//! single sync invocation
//!
//! Everything here is built once per command from flags and environment and
//! then passed explicitly to the gateways and the sync engine.

use crate::error::{Result, SyncError};
use crate::types::SecretKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Region used when neither `AWS_REGION` nor `AWS_DEFAULT_REGION` is set
pub const DEFAULT_REGION: &str = "ap-southeast-2";

/// Parameter store client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// AWS region
    pub region: String,
    /// Custom SSM endpoint, e.g. LocalStack (optional)
    pub endpoint: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }
}

impl StoreConfig {
    /// Resolve region and endpoint from the environment
    ///
    /// Region precedence: `AWS_REGION`, then `AWS_DEFAULT_REGION`, then
    /// [`DEFAULT_REGION`].
    pub fn from_env() -> Self {
        let region = non_empty_var("AWS_REGION")
            .or_else(|| non_empty_var("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint = non_empty_var("AWS_ENDPOINT_URL_SSM");

        Self { region, endpoint }
    }

    /// Override the region when one was given explicitly
    pub fn with_region(mut self, region: Option<String>) -> Self {
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            self.region = region;
        }
        self
    }

    /// Override the endpoint when one was given explicitly
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        self
    }
}

/// Cluster client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Namespace override; the kubeconfig's current namespace otherwise
    pub namespace: Option<String>,
    /// kubeconfig context override
    pub context: Option<String>,
    /// Path to a kubeconfig file
    pub kubeconfig: Option<PathBuf>,
    /// kubectl executable
    pub kubectl: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            context: None,
            kubeconfig: None,
            kubectl: "kubectl".to_string(),
        }
    }
}

/// Options for one import, export or list invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Parameter store path, e.g. `/app/env`
    pub path: String,
    /// Replace existing secrets or parameters
    pub overwrite: bool,
    /// Encode values on export, decode them on import and list
    pub codec: bool,
    /// Kind of secret to create on import
    pub kind: SecretKind,
    /// Permit values above the standard 4 KiB tier
    pub allow_large_value: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            path: String::new(),
            overwrite: false,
            codec: false,
            kind: SecretKind::Opaque,
            allow_large_value: false,
        }
    }
}

impl SyncOptions {
    /// Options for a transfer rooted at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_codec(mut self, codec: bool) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_kind(mut self, kind: SecretKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_allow_large_value(mut self, allow: bool) -> Self {
        self.allow_large_value = allow;
        self
    }

    /// Check the path is an absolute parameter store path
    pub fn validate(&self) -> Result<()> {
        validate_path(&self.path)
    }
}

/// Parameter store paths must be absolute and non-empty
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SyncError::invalid_config("no ssm parameter store path provided"));
    }
    if !path.starts_with('/') {
        return Err(SyncError::invalid_config(format!(
            "ssm parameter store path must start with '/': {}",
            path
        )));
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
