//! Path-scoped reads and writes against the parameter store

use crate::api::{GetByPathRequest, ParameterApi, ParameterKind, ParameterTier, PutRequest};
use serde::Serialize;
use ssm_secret_core::{Result, SecretBundle, SyncError};
use tracing::{debug, info};

/// Largest value accepted by a standard parameter
pub const STANDARD_TIER_LIMIT: usize = 4 * 1024;

/// Largest value accepted by an advanced parameter
pub const ADVANCED_TIER_LIMIT: usize = 8 * 1024;

/// A parameter written by [`ParameterStore::store_by_path`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenParameter {
    pub key: String,
    pub name: String,
    pub version: i64,
    pub tier: String,
}

/// Per-key outcome of a store operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreReport {
    pub written: Vec<WrittenParameter>,
    /// Keys skipped because their value was empty
    pub skipped: Vec<String>,
}

/// Parameter store gateway
pub struct ParameterStore<A> {
    api: A,
}

impl<A: ParameterApi> ParameterStore<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying remote API
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch every parameter directly under `path`, keyed by leaf name
    ///
    /// Follows continuation tokens until the store stops returning one. A
    /// failure on any page fails the whole fetch.
    pub async fn fetch_by_path(&self, path: &str) -> Result<SecretBundle> {
        let mut bundle = SecretBundle::new();
        let mut request = GetByPathRequest::new(path);
        let mut pages = 0usize;

        loop {
            let page = self.api.get_parameters_by_path(&request).await?;
            pages += 1;
            debug!(
                "Fetched page {} under {} ({} parameters)",
                pages,
                path,
                page.parameters.len()
            );

            for param in page.parameters {
                bundle.insert(leaf_name(&param.name), param.value);
            }

            match page.next_token {
                Some(token) if request.next_token.as_deref() == Some(token.as_str()) => {
                    return Err(SyncError::remote(
                        "GetParametersByPath",
                        format!("continuation token did not advance under {}", path),
                    ));
                }
                Some(token) => request = request.with_next_token(Some(token)),
                None => break,
            }
        }

        debug!("Found {} parameters under {}", bundle.len(), path);
        Ok(bundle)
    }

    /// Write every non-empty value in `bundle` to `path/<key>`
    ///
    /// All sizes are checked before the first write. Values above
    /// [`STANDARD_TIER_LIMIT`] need `allow_large_value` and are written as
    /// advanced parameters; values above [`ADVANCED_TIER_LIMIT`] are always
    /// rejected. The first failed write aborts the call.
    pub async fn store_by_path(
        &self,
        path: &str,
        bundle: &SecretBundle,
        overwrite: bool,
        allow_large_value: bool,
    ) -> Result<StoreReport> {
        if bundle.is_empty() {
            return Err(SyncError::empty_source(format!("bundle for {}", path)));
        }

        let mut report = StoreReport::default();
        let mut planned = Vec::with_capacity(bundle.len());
        for (key, value) in bundle.iter() {
            if value.is_empty() {
                info!("Skipping key {}: empty value", key);
                report.skipped.push(key.to_string());
                continue;
            }
            let tier = tier_for(key, value.len(), allow_large_value)?;
            planned.push((key, value, tier));
        }

        for (key, value, tier) in planned {
            let request = PutRequest {
                name: join_path(path, key),
                value: value.to_string(),
                kind: ParameterKind::SecureString,
                tier,
                overwrite,
            };
            let version = self.api.put_parameter(&request).await?;
            info!(
                "Wrote parameter {} (version: {}, tier: {})",
                request.name, version, tier
            );
            report.written.push(WrittenParameter {
                key: key.to_string(),
                name: request.name,
                version,
                tier: tier.to_string(),
            });
        }

        Ok(report)
    }
}

/// Pick the tier for a value of `size` bytes, or reject it
fn tier_for(key: &str, size: usize, allow_large_value: bool) -> Result<ParameterTier> {
    if size > ADVANCED_TIER_LIMIT {
        return Err(SyncError::size_limit_exceeded(key, size, ADVANCED_TIER_LIMIT));
    }
    if size > STANDARD_TIER_LIMIT {
        if !allow_large_value {
            return Err(SyncError::size_limit_exceeded(key, size, STANDARD_TIER_LIMIT));
        }
        return Ok(ParameterTier::Advanced);
    }
    Ok(ParameterTier::Standard)
}

/// Full parameter name for `key` under `path`
pub fn join_path(path: &str, key: &str) -> String {
    format!("{}/{}", path.trim_end_matches('/'), key)
}

/// Last segment of a full parameter name
pub fn leaf_name(name: &str) -> &str {
    name.rsplit_once('/').map(|(_, leaf)| leaf).unwrap_or(name)
}
