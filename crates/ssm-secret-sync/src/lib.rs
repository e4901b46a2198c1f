//! Sync engine for kubectl-ssm-secret
//!
//! [`SyncEngine`] moves a bundle of key/values in one direction per call:
//! - **import**: parameter store path → Kubernetes secret (create, or update with overwrite)
//! - **export**: Kubernetes secret → parameter store path
//! - **list**: read-only view of store paths and secrets

pub mod engine;
pub mod outcome;

pub use engine::SyncEngine;
pub use outcome::{
    ExportOutcome, ImportAction, ImportOutcome, KeyWarning, ListSource, Listing,
};
