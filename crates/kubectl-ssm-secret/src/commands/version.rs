//! Version command

use crate::cli::VersionArgs;
use crate::version::VersionInfo;
use anyhow::Result;
use ssm_secret_core::ClusterConfig;
use ssm_secret_k8s::KubectlSecretApi;

pub async fn run(args: VersionArgs, cluster: &ClusterConfig) -> Result<()> {
    let kubectl = KubectlSecretApi::new(cluster).client_version().await;
    let info = VersionInfo::current(kubectl);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info);
    }

    Ok(())
}
