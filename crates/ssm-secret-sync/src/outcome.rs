//! Results reported by the sync engine

use serde::Serialize;
use ssm_secret_core::{CodecWarning, SecretBundle};
use ssm_secret_params::StoreReport;
use std::fmt;

/// What an import did to the destination secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    Created,
    Updated,
}

impl fmt::Display for ImportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportAction::Created => write!(f, "created"),
            ImportAction::Updated => write!(f, "updated"),
        }
    }
}

/// A key whose value fell back to a literal during decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyWarning {
    pub key: String,
    pub message: String,
}

impl KeyWarning {
    pub(crate) fn from_codec(key: String, warning: &CodecWarning) -> Self {
        Self {
            key,
            message: warning.to_string(),
        }
    }
}

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub name: String,
    pub namespace: String,
    pub path: String,
    pub action: ImportAction,
    pub keys: Vec<String>,
    pub warnings: Vec<KeyWarning>,
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub name: String,
    pub namespace: String,
    pub path: String,
    pub report: StoreReport,
}

/// Where a listing came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ListSource {
    Path { path: String },
    Secret { namespace: String, name: String },
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSource::Path { path } => write!(f, "{}", path),
            ListSource::Secret { namespace, name } => write!(f, "secret {}/{}", namespace, name),
        }
    }
}

/// One listed source and its data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    #[serde(flatten)]
    pub source: ListSource,
    pub data: SecretBundle,
}
