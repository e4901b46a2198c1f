//! # ssm-secret-core
//!
//! Shared building blocks for moving key/value configuration between
//! AWS SSM Parameter Store and Kubernetes secrets:
//! - The in-memory transfer unit ([`SecretBundle`]) and secret record types
//! - The error taxonomy shared by every gateway
//! - The gzip + base64 value codec
//! - Configuration for the parameter store client and the cluster client

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use codec::{CodecWarning, Decoded};
pub use config::{ClusterConfig, StoreConfig, SyncOptions, DEFAULT_REGION};
pub use error::{Result, SyncError};
pub use types::{SecretBundle, SecretKind, SecretMetadata, SecretRecord};
