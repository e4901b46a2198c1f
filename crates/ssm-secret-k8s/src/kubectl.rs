//! kubectl-backed secret API
//!
//! Secrets are read with `kubectl get secret -o json` and written by piping a
//! JSON manifest into `kubectl create -f -` or `kubectl replace -f -`. Secret
//! data never appears on the kubectl command line.

use crate::api::SecretApi;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use ssm_secret_core::{
    ClusterConfig, Result, SecretBundle, SecretMetadata, SecretRecord, SyncError,
};
use std::collections::BTreeMap;
use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one kubectl invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubectlOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs kubectl with the given arguments and optional stdin
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KubectlRunner: Send + Sync {
    async fn run(&self, args: Vec<String>, stdin: Option<Vec<u8>>) -> Result<KubectlOutput>;
}

/// Spawns the kubectl executable
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl KubectlRunner for ProcessRunner {
    async fn run(&self, args: Vec<String>, stdin: Option<Vec<u8>>) -> Result<KubectlOutput> {
        debug!("Running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SyncError::remote("kubectl", format!("failed to run {}: {}", self.program, e))
            })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            use tokio::io::AsyncWriteExt;
            let written = async {
                pipe.write_all(&input).await?;
                pipe.flush().await
            }
            .await;
            drop(pipe);

            // kubectl may exit before reading its input; its stderr says why
            match written {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("{} closed stdin before reading it", self.program);
                }
                other => other?,
            }
        }

        let output = child.wait_with_output().await?;

        Ok(KubectlOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Secret wire format as read from and written to kubectl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretManifest {
    api_version: String,
    kind: String,
    metadata: ObjectMeta,
    #[serde(rename = "type", default)]
    secret_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ObjectMeta {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(flatten)]
    extra: SecretMetadata,
}

impl SecretManifest {
    fn from_record(record: &SecretRecord) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Secret".to_string(),
            metadata: ObjectMeta {
                name: record.name.clone(),
                namespace: Some(record.namespace.clone()),
                extra: record.metadata.clone(),
            },
            secret_type: record.secret_type.clone(),
            data: Some(encode_data(&record.data)),
        }
    }

    fn into_record(self, namespace: &str) -> Result<SecretRecord> {
        let mut data = SecretBundle::new();
        for (key, encoded) in self.data.unwrap_or_default() {
            let bytes = STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                SyncError::remote("decode secret data", format!("key {}: {}", key, e))
            })?;
            data.insert(key, String::from_utf8_lossy(&bytes).into_owned());
        }

        Ok(SecretRecord {
            namespace: self
                .metadata
                .namespace
                .unwrap_or_else(|| namespace.to_string()),
            name: self.metadata.name,
            secret_type: self.secret_type,
            metadata: self.metadata.extra,
            data,
        })
    }
}

fn encode_data(data: &SecretBundle) -> BTreeMap<String, String> {
    data.iter()
        .map(|(k, v)| (k.to_string(), STANDARD.encode(v.as_bytes())))
        .collect()
}

/// Map a failed kubectl call onto the shared error taxonomy
///
/// Only the API server's reason markers count; client-side errors such as an
/// unknown context also say "not found" and must stay remote faults.
fn classify_failure(operation: &str, namespace: &str, name: &str, stderr: &str) -> SyncError {
    if stderr.contains("(NotFound)") {
        SyncError::not_found(namespace, name)
    } else if stderr.contains("(AlreadyExists)") {
        SyncError::already_exists(namespace, name)
    } else {
        SyncError::remote(operation, stderr.trim())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionOutput {
    client_version: Option<ClientVersion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientVersion {
    git_version: String,
}

/// `gitVersion` from `kubectl version --client -o json`
fn parse_client_version(stdout: &str) -> Option<String> {
    serde_json::from_str::<VersionOutput>(stdout)
        .ok()?
        .client_version
        .map(|v| v.git_version)
}

/// Secret API that shells out to kubectl
pub struct KubectlSecretApi<R = ProcessRunner> {
    runner: R,
    global_args: Vec<String>,
}

impl KubectlSecretApi<ProcessRunner> {
    /// Create an API using the kubectl binary named in `config`
    pub fn new(config: &ClusterConfig) -> Self {
        Self::with_runner(ProcessRunner::new(&config.kubectl), config)
    }
}

impl<R: KubectlRunner> KubectlSecretApi<R> {
    /// Create an API with a custom runner
    pub fn with_runner(runner: R, config: &ClusterConfig) -> Self {
        let mut global_args = Vec::new();
        if let Some(kubeconfig) = &config.kubeconfig {
            global_args.push("--kubeconfig".to_string());
            global_args.push(kubeconfig.display().to_string());
        }
        if let Some(context) = &config.context {
            global_args.push("--context".to_string());
            global_args.push(context.clone());
        }
        Self {
            runner,
            global_args,
        }
    }

    fn args(&self, extra: &[&str]) -> Vec<String> {
        let mut args = self.global_args.clone();
        args.extend(strings(extra));
        args
    }

    /// Namespace of the current kubeconfig context, or `default`
    pub async fn current_namespace(&self) -> Result<String> {
        let output = self
            .runner
            .run(
                self.args(&["config", "view", "--minify", "-o", "jsonpath={..namespace}"]),
                None,
            )
            .await?;

        let namespace = output.stdout.trim();
        if output.success && !namespace.is_empty() {
            Ok(namespace.to_string())
        } else {
            Ok("default".to_string())
        }
    }

    /// Version of the kubectl client, if it can be run at all
    pub async fn client_version(&self) -> Option<String> {
        let output = self
            .runner
            .run(strings(&["version", "--client", "-o", "json"]), None)
            .await
            .ok()?;
        if !output.success {
            return None;
        }
        parse_client_version(&output.stdout)
    }
}

#[async_trait]
impl<R: KubectlRunner> SecretApi for KubectlSecretApi<R> {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord> {
        let output = self
            .runner
            .run(
                self.args(&["get", "secret", name, "-n", namespace, "-o", "json"]),
                None,
            )
            .await?;

        if !output.success {
            return Err(classify_failure(
                "get secret",
                namespace,
                name,
                &output.stderr,
            ));
        }

        let manifest: SecretManifest = serde_json::from_str(&output.stdout)?;
        manifest.into_record(namespace)
    }

    async fn create(&self, record: &SecretRecord) -> Result<()> {
        let manifest = serde_json::to_vec(&SecretManifest::from_record(record))?;
        let output = self
            .runner
            .run(
                self.args(&["create", "-n", &record.namespace, "-f", "-"]),
                Some(manifest),
            )
            .await?;

        if !output.success {
            return Err(classify_failure(
                "create secret",
                &record.namespace,
                &record.name,
                &output.stderr,
            ));
        }
        Ok(())
    }

    async fn replace(&self, record: &SecretRecord) -> Result<()> {
        let manifest = serde_json::to_vec(&SecretManifest::from_record(record))?;
        let output = self
            .runner
            .run(
                self.args(&["replace", "-n", &record.namespace, "-f", "-"]),
                Some(manifest),
            )
            .await?;

        if !output.success {
            return Err(classify_failure(
                "replace secret",
                &record.namespace,
                &record.name,
                &output.stderr,
            ));
        }
        Ok(())
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
