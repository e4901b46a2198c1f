//! AWS SSM Parameter Store gateway
//!
//! [`ParameterStore`] reads every parameter directly under a path (following
//! continuation tokens) and writes a bundle back under a path, enforcing the
//! 4 KiB / 8 KiB value size tiers.
//!
//! The remote side is the narrow [`ParameterApi`] trait with exactly the two
//! calls the gateway needs:
//! - [`SsmParameterApi`] talks to AWS through `aws-sdk-ssm`
//! - [`MemoryParameterApi`] keeps parameters in memory for tests and dry runs

pub mod api;
pub mod memory;
pub mod ssm;
pub mod store;

pub use api::{
    GetByPathRequest, ParameterApi, ParameterKind, ParameterPage, ParameterTier, PutRequest,
    RemoteParameter,
};
pub use memory::MemoryParameterApi;
pub use ssm::SsmParameterApi;
pub use store::{
    join_path, leaf_name, ParameterStore, StoreReport, WrittenParameter, ADVANCED_TIER_LIMIT,
    STANDARD_TIER_LIMIT,
};
