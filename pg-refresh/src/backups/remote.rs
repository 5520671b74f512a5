//! Calls into the backup service CLI.

use crate::config::RemoteConfig;
use crate::exec::{CommandRunner, Invocation};
use crate::utils::{RefreshError, Result};
use std::sync::Arc;
use tracing::debug;

/// Lists backups and resolves download URLs for one remote application
#[derive(Clone)]
pub struct RemoteBackups {
    runner: Arc<dyn CommandRunner>,
    cli: String,
    app: String,
}

impl RemoteBackups {
    pub fn new(runner: Arc<dyn CommandRunner>, remote: &RemoteConfig) -> Self {
        Self {
            runner,
            cli: remote.cli.clone(),
            app: remote.app.clone(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Raw listing text as printed by the CLI
    pub async fn list_raw(&self) -> Result<String> {
        let invocation =
            Invocation::new(&self.cli).args(["pg:backups", "--app", self.app.as_str()]);
        let stdout = self.runner.run(&invocation).await?.into_stdout(&invocation)?;
        debug!("Listing for {} returned {} bytes", self.app, stdout.len());
        Ok(stdout)
    }

    /// Temporary download URL for backup `id`
    pub async fn resolve_url(&self, id: &str) -> Result<String> {
        let invocation =
            Invocation::new(&self.cli).args(["pg:backups:url", id, "--app", self.app.as_str()]);
        let stdout = self.runner.run(&invocation).await?.into_stdout(&invocation)?;

        let url = stdout.trim_end_matches(['\r', '\n']).to_string();
        if url.is_empty() {
            return Err(RefreshError::ExternalCommand {
                command: invocation.to_string(),
                status: "exit status 0".to_string(),
                stderr: "no URL printed".to_string(),
            });
        }
        Ok(url)
    }
}
