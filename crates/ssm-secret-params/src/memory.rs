//! In-memory parameter store
//!
//! Mirrors the paging and overwrite behavior of the real service closely
//! enough to drive the gateway and the sync engine in tests.

use crate::api::{
    GetByPathRequest, ParameterApi, ParameterKind, ParameterPage, ParameterTier, PutRequest,
    RemoteParameter,
};
use async_trait::async_trait;
use ssm_secret_core::{Result, SyncError};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Default number of parameters per page (the service maximum)
const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
struct StoredParameter {
    value: String,
    kind: ParameterKind,
    tier: ParameterTier,
    version: i64,
}

#[derive(Debug, Default)]
struct State {
    parameters: BTreeMap<String, StoredParameter>,
    get_requests: Vec<GetByPathRequest>,
    put_requests: Vec<PutRequest>,
}

/// Parameter store held in memory
#[derive(Debug)]
pub struct MemoryParameterApi {
    state: Mutex<State>,
    page_size: usize,
    fail_get_on_page: Option<usize>,
    fail_put_for: Option<String>,
}

impl Default for MemoryParameterApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryParameterApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_size: DEFAULT_PAGE_SIZE,
            fail_get_on_page: None,
            fail_put_for: None,
        }
    }

    /// Seed a secure string parameter at version 1
    pub fn with_parameter(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.lock().parameters.insert(
            name.into(),
            StoredParameter {
                value: value.into(),
                kind: ParameterKind::SecureString,
                tier: ParameterTier::Standard,
                version: 1,
            },
        );
        self
    }

    /// Parameters returned per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fail the n-th (1-based) page request
    pub fn fail_get_on_page(mut self, page: usize) -> Self {
        self.fail_get_on_page = Some(page);
        self
    }

    /// Fail any put to this full parameter name
    pub fn fail_put_for(mut self, name: impl Into<String>) -> Self {
        self.fail_put_for = Some(name.into());
        self
    }

    /// Current value of a parameter
    pub fn value(&self, name: &str) -> Option<String> {
        self.lock().parameters.get(name).map(|p| p.value.clone())
    }

    /// Current version of a parameter
    pub fn version(&self, name: &str) -> Option<i64> {
        self.lock().parameters.get(name).map(|p| p.version)
    }

    /// Tier a parameter was last written with
    pub fn tier(&self, name: &str) -> Option<ParameterTier> {
        self.lock().parameters.get(name).map(|p| p.tier)
    }

    /// All parameter names, sorted
    pub fn names(&self) -> Vec<String> {
        self.lock().parameters.keys().cloned().collect()
    }

    /// Every page request received so far
    pub fn get_requests(&self) -> Vec<GetByPathRequest> {
        self.lock().get_requests.clone()
    }

    /// Every put request received so far, including rejected ones
    pub fn put_requests(&self) -> Vec<PutRequest> {
        self.lock().put_requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn matches_path(path: &str, name: &str, recursive: bool) -> bool {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    name.strip_prefix(&prefix)
        .map(|rest| !rest.is_empty() && (recursive || !rest.contains('/')))
        .unwrap_or(false)
}

#[async_trait]
impl ParameterApi for MemoryParameterApi {
    async fn get_parameters_by_path(&self, request: &GetByPathRequest) -> Result<ParameterPage> {
        let mut state = self.lock();
        state.get_requests.push(request.clone());

        if self.fail_get_on_page == Some(state.get_requests.len()) {
            return Err(SyncError::remote(
                "GetParametersByPath",
                "InternalServerError: injected failure",
            ));
        }

        let offset = match &request.next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                SyncError::remote(
                    "GetParametersByPath",
                    format!("InvalidNextToken: {}", token),
                )
            })?,
            None => 0,
        };

        let matching: Vec<RemoteParameter> = state
            .parameters
            .iter()
            .filter(|(name, _)| matches_path(&request.path, name, request.recursive))
            .map(|(name, param)| RemoteParameter {
                name: name.clone(),
                value: param.value.clone(),
                kind: param.kind,
            })
            .collect();

        let end = (offset + self.page_size).min(matching.len());
        let parameters = matching.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ParameterPage {
            parameters,
            next_token,
        })
    }

    async fn put_parameter(&self, request: &PutRequest) -> Result<i64> {
        let mut state = self.lock();
        state.put_requests.push(request.clone());

        if self.fail_put_for.as_deref() == Some(request.name.as_str()) {
            return Err(SyncError::remote(
                "PutParameter",
                "ThrottlingException: injected failure",
            ));
        }

        let version = match state.parameters.get(&request.name) {
            Some(_) if !request.overwrite => {
                return Err(SyncError::ParameterExists {
                    name: request.name.clone(),
                })
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };

        state.parameters.insert(
            request.name.clone(),
            StoredParameter {
                value: request.value.clone(),
                kind: request.kind,
                tier: request.tier,
                version,
            },
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_path() {
        assert!(matches_path("/foo", "/foo/a", false));
        assert!(matches_path("/foo/", "/foo/a", false));
        assert!(!matches_path("/foo", "/foo/a/b", false));
        assert!(matches_path("/foo", "/foo/a/b", true));
        assert!(!matches_path("/foo", "/foobar/a", true));
        assert!(!matches_path("/foo", "/foo/", false));
    }

    #[tokio::test]
    async fn test_paging() {
        let api = MemoryParameterApi::new()
            .with_page_size(2)
            .with_parameter("/foo/a", "1")
            .with_parameter("/foo/b", "2")
            .with_parameter("/foo/c", "3");

        let first = api
            .get_parameters_by_path(&GetByPathRequest::new("/foo"))
            .await
            .unwrap();
        assert_eq!(first.parameters.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = api
            .get_parameters_by_path(
                &GetByPathRequest::new("/foo").with_next_token(first.next_token),
            )
            .await
            .unwrap();
        assert_eq!(second.parameters.len(), 1);
        assert_eq!(second.parameters[0].name, "/foo/c");
        assert_eq!(second.next_token, None);
    }

    #[tokio::test]
    async fn test_put_versions() {
        let api = MemoryParameterApi::new();
        let mut request = PutRequest {
            name: "/foo/a".to_string(),
            value: "1".to_string(),
            kind: ParameterKind::SecureString,
            tier: ParameterTier::Standard,
            overwrite: false,
        };

        assert_eq!(api.put_parameter(&request).await.unwrap(), 1);
        assert!(matches!(
            api.put_parameter(&request).await,
            Err(SyncError::ParameterExists { .. })
        ));

        request.overwrite = true;
        request.value = "2".to_string();
        assert_eq!(api.put_parameter(&request).await.unwrap(), 2);
        assert_eq!(api.value("/foo/a").as_deref(), Some("2"));
        assert_eq!(api.version("/foo/a"), Some(2));
        assert_eq!(api.put_requests().len(), 3);
    }
}
