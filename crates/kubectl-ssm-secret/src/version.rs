//! Version information for the plugin and the kubectl it drives

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Plugin version
    pub version: String,

    /// Git commit SHA (short)
    pub commit: Option<String>,

    /// kubectl client version, `None` when kubectl could not be run
    pub kubectl: Option<String>,
}

impl VersionInfo {
    /// Version info for this build and the detected kubectl client
    pub fn current(kubectl: Option<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("GIT_SHA").map(String::from),
            kubectl,
        }
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "kubectl-ssm-secret {}", self.version)?;
        if let Some(commit) = &self.commit {
            write!(f, " ({})", commit)?;
        }
        match &self.kubectl {
            Some(kubectl) => write!(f, "\nkubectl {}", kubectl),
            None => write!(f, "\nkubectl not found; import, export and secret listing need it"),
        }
    }
}
