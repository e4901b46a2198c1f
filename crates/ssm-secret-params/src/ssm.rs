//! AWS SSM backend for the parameter store gateway

use crate::api::{
    GetByPathRequest, ParameterApi, ParameterKind, ParameterPage, ParameterTier, PutRequest,
    RemoteParameter,
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::{Parameter, ParameterType};
use aws_sdk_ssm::Client;
use ssm_secret_core::{Result, StoreConfig, SyncError};
use tracing::debug;

/// Parameter store API backed by `aws-sdk-ssm`
pub struct SsmParameterApi {
    client: Client,
    region: String,
}

impl SsmParameterApi {
    /// Create a client for the configured region and optional endpoint
    ///
    /// Credentials come from the SDK's default provider chain.
    pub async fn new(config: &StoreConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut ssm_config_builder = aws_sdk_ssm::config::Builder::from(&sdk_config);

        if let Some(endpoint_url) = &config.endpoint {
            debug!("Using custom SSM endpoint: {}", endpoint_url);
            ssm_config_builder = ssm_config_builder.endpoint_url(endpoint_url);
        }

        Self {
            client: Client::from_conf(ssm_config_builder.build()),
            region: config.region.clone(),
        }
    }

    /// Wrap an existing client
    pub fn from_client(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl std::fmt::Debug for SsmParameterApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterApi")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ParameterApi for SsmParameterApi {
    async fn get_parameters_by_path(&self, request: &GetByPathRequest) -> Result<ParameterPage> {
        debug!(
            "GetParametersByPath {} (token: {})",
            request.path,
            request.next_token.is_some()
        );

        let resp = self
            .client
            .get_parameters_by_path()
            .path(&request.path)
            .recursive(request.recursive)
            .with_decryption(request.with_decryption)
            .set_next_token(request.next_token.clone())
            .send()
            .await
            .map_err(|e| SyncError::remote("GetParametersByPath", DisplayErrorContext(&e)))?;

        let parameters = resp
            .parameters
            .unwrap_or_default()
            .into_iter()
            .filter_map(to_remote_parameter)
            .collect();

        Ok(ParameterPage {
            parameters,
            next_token: resp.next_token.filter(|t| !t.is_empty()),
        })
    }

    async fn put_parameter(&self, request: &PutRequest) -> Result<i64> {
        debug!(
            "PutParameter {} ({} bytes, tier: {}, overwrite: {})",
            request.name,
            request.value.len(),
            request.tier,
            request.overwrite
        );

        let resp = self
            .client
            .put_parameter()
            .name(&request.name)
            .value(&request.value)
            .r#type(to_sdk_type(request.kind))
            .tier(to_sdk_tier(request.tier))
            .overwrite(request.overwrite)
            .send()
            .await;

        match resp {
            Ok(output) => Ok(output.version),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_parameter_already_exists() {
                    Err(SyncError::ParameterExists {
                        name: request.name.clone(),
                    })
                } else {
                    Err(SyncError::remote(
                        "PutParameter",
                        DisplayErrorContext(&service_error),
                    ))
                }
            }
        }
    }
}

/// Entries without a name cannot be keyed and are dropped; a missing value
/// becomes an empty string
fn to_remote_parameter(param: Parameter) -> Option<RemoteParameter> {
    let kind = param.r#type.as_ref().map(from_sdk_type).unwrap_or_default();
    Some(RemoteParameter {
        name: param.name?,
        value: param.value.unwrap_or_default(),
        kind,
    })
}

fn from_sdk_type(kind: &ParameterType) -> ParameterKind {
    match kind {
        ParameterType::String => ParameterKind::String,
        ParameterType::StringList => ParameterKind::StringList,
        _ => ParameterKind::SecureString,
    }
}

fn to_sdk_type(kind: ParameterKind) -> ParameterType {
    match kind {
        ParameterKind::String => ParameterType::String,
        ParameterKind::StringList => ParameterType::StringList,
        ParameterKind::SecureString => ParameterType::SecureString,
    }
}

fn to_sdk_tier(tier: ParameterTier) -> aws_sdk_ssm::types::ParameterTier {
    match tier {
        ParameterTier::Standard => aws_sdk_ssm::types::ParameterTier::Standard,
        ParameterTier::Advanced => aws_sdk_ssm::types::ParameterTier::Advanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_remote_parameter() {
        let param = Parameter::builder()
            .name("/foo/passwd")
            .value("SecretSquirrel")
            .r#type(ParameterType::SecureString)
            .build();

        let remote = to_remote_parameter(param).unwrap();
        assert_eq!(remote.name, "/foo/passwd");
        assert_eq!(remote.value, "SecretSquirrel");
        assert_eq!(remote.kind, ParameterKind::SecureString);
    }

    #[test]
    fn test_to_remote_parameter_without_name() {
        let param = Parameter::builder().value("orphan").build();
        assert!(to_remote_parameter(param).is_none());
    }

    #[test]
    fn test_to_remote_parameter_without_value() {
        let param = Parameter::builder()
            .name("/foo/empty")
            .r#type(ParameterType::String)
            .build();

        let remote = to_remote_parameter(param).unwrap();
        assert_eq!(remote.value, "");
        assert_eq!(remote.kind, ParameterKind::String);
    }

    #[test]
    fn test_sdk_type_mapping() {
        for kind in [
            ParameterKind::String,
            ParameterKind::StringList,
            ParameterKind::SecureString,
        ] {
            assert_eq!(from_sdk_type(&to_sdk_type(kind)), kind);
        }
        assert_eq!(
            to_sdk_tier(ParameterTier::Advanced),
            aws_sdk_ssm::types::ParameterTier::Advanced
        );
    }
}
