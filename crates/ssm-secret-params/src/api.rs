//! Remote parameter store interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ssm_secret_core::Result;
use std::fmt;
use std::sync::Arc;

/// Stored parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParameterKind {
    String,
    StringList,
    /// Encrypted at rest with KMS (default for everything this tool writes)
    #[default]
    SecureString,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::String => write!(f, "String"),
            ParameterKind::StringList => write!(f, "StringList"),
            ParameterKind::SecureString => write!(f, "SecureString"),
        }
    }
}

/// Parameter class, which bounds the value size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParameterTier {
    /// Values up to 4 KiB
    #[default]
    Standard,
    /// Values up to 8 KiB
    Advanced,
}

impl fmt::Display for ParameterTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterTier::Standard => write!(f, "Standard"),
            ParameterTier::Advanced => write!(f, "Advanced"),
        }
    }
}

/// One `GetParametersByPath` page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetByPathRequest {
    pub path: String,
    pub recursive: bool,
    pub with_decryption: bool,
    pub next_token: Option<String>,
}

impl GetByPathRequest {
    /// First page of a non-recursive, decrypting query
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
            with_decryption: true,
            next_token: None,
        }
    }

    /// The same query continued from `token`
    pub fn with_next_token(mut self, token: Option<String>) -> Self {
        self.next_token = token;
        self
    }
}

/// A parameter as returned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteParameter {
    /// Full name, e.g. `/app/env/passwd`
    pub name: String,
    pub value: String,
    pub kind: ParameterKind,
}

/// One page of results plus the continuation token, if more remain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterPage {
    pub parameters: Vec<RemoteParameter>,
    pub next_token: Option<String>,
}

/// One `PutParameter` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    /// Full name, e.g. `/app/env/passwd`
    pub name: String,
    pub value: String,
    pub kind: ParameterKind,
    pub tier: ParameterTier,
    pub overwrite: bool,
}

/// The two parameter store calls the gateway relies on
///
/// Implementations report an existing parameter on a non-overwriting put as
/// `SyncError::ParameterExists` and every other failure as `SyncError::Remote`.
#[async_trait]
pub trait ParameterApi: Send + Sync {
    /// Fetch one page of parameters directly under `request.path`
    async fn get_parameters_by_path(&self, request: &GetByPathRequest) -> Result<ParameterPage>;

    /// Write a parameter, returning its new version
    async fn put_parameter(&self, request: &PutRequest) -> Result<i64>;
}

#[async_trait]
impl<A: ParameterApi + ?Sized> ParameterApi for Arc<A> {
    async fn get_parameters_by_path(&self, request: &GetByPathRequest) -> Result<ParameterPage> {
        (**self).get_parameters_by_path(request).await
    }

    async fn put_parameter(&self, request: &PutRequest) -> Result<i64> {
        (**self).put_parameter(request).await
    }
}
