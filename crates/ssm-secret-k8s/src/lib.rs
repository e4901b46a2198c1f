//! Kubernetes secret gateway
//!
//! [`SecretStore`] reads, creates and updates one secret at a time in a fixed
//! namespace. The cluster side is the narrow [`SecretApi`] trait:
//! - [`KubectlSecretApi`] drives `kubectl` with JSON manifests
//! - [`MemorySecretApi`] keeps secrets in memory for tests

pub mod api;
pub mod kubectl;
pub mod memory;
pub mod store;

pub use api::SecretApi;
pub use kubectl::{KubectlOutput, KubectlRunner, KubectlSecretApi, ProcessRunner};
pub use memory::MemorySecretApi;
pub use store::SecretStore;
