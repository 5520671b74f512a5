//! Import pipeline - sequences listing, selection, download and restore.
//!
//! Stages run strictly one after another:
//! list -> parse -> select -> resolve URL -> download -> restore -> delete dump.
//! The first failure ends the run and is returned unchanged. The dump file is
//! only deleted after a successful restore; a failed run leaves it on disk.

pub mod observer;

use crate::backups::{
    parse_backups, select_backup, BackupRecord, RemoteBackups, SelectionCriteria,
};
use crate::config::Config;
use crate::exec::CommandRunner;
use crate::restore::{DatabaseStatus, LocalDatabase};
use crate::transfer::Downloader;
use crate::utils::{RefreshError, Result};
use observer::{PipelineEvent, PipelineObserver, Stage};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// What a successful import did
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub backup: BackupRecord,
    pub database: String,
    pub bytes_downloaded: u64,
    pub elapsed: Duration,
}

/// Entry point for listing and importing backups
pub struct Refresher {
    remote: RemoteBackups,
    local: LocalDatabase,
    downloader: Downloader,
    observer: Arc<dyn PipelineObserver>,
}

impl Refresher {
    pub fn new(
        config: &Config,
        runner: Arc<dyn CommandRunner>,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            remote: RemoteBackups::new(runner.clone(), &config.remote),
            local: LocalDatabase::new(runner, config),
            downloader: Downloader::new(reqwest::Client::new(), &config.download.dump_path),
            observer,
        }
    }

    /// Backups currently available for the configured application, in
    /// listing order
    pub async fn list_backups(&self) -> Result<Vec<BackupRecord>> {
        let raw = self.stage(Stage::ListBackups, self.remote.list_raw()).await?;
        self.stage(Stage::ParseBackups, async { parse_backups(&raw) })
            .await
    }

    /// Download the selected backup and restore it into `target_db`
    pub async fn import_backup(
        &self,
        criteria: &SelectionCriteria,
        target_db: &str,
    ) -> Result<ImportSummary> {
        let started = Instant::now();
        let backups = self.list_backups().await?;

        let selection = self
            .stage(Stage::SelectBackup, async { select_backup(&backups, criteria) })
            .await?;
        if let Some(notice) = selection.notice {
            self.emit(PipelineEvent::Notice(notice));
        }
        let backup = selection.record;
        self.emit(PipelineEvent::SelectedBackup(backup.clone()));
        info!(
            "Importing backup {} from {} into {}",
            backup.id,
            self.remote.app(),
            target_db
        );

        let url = self
            .stage(Stage::ResolveUrl, self.remote.resolve_url(&backup.id))
            .await?;

        let observer = self.observer.clone();
        let download = self.downloader.download(&url, move |bytes, total| {
            observer.on_event(&PipelineEvent::DownloadProgress { bytes, total })
        });
        let outcome = self.stage(Stage::Download, download).await?;

        self.stage(Stage::Restore, self.local.restore(target_db, &outcome.path))
            .await?;

        self.stage(Stage::Cleanup, async {
            tokio::fs::remove_file(&outcome.path)
                .await
                .map_err(RefreshError::from)
        })
        .await?;

        Ok(ImportSummary {
            backup,
            database: target_db.to_string(),
            bytes_downloaded: outcome.bytes,
            elapsed: started.elapsed(),
        })
    }

    pub async fn create_local_db(&self, database: &str) -> Result<DatabaseStatus> {
        self.local.create_database(database).await
    }

    pub async fn drop_local_db(&self, database: &str) -> Result<DatabaseStatus> {
        self.local.drop_database(database).await
    }

    async fn stage<T, F>(&self, stage: Stage, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.emit(PipelineEvent::StageStarted(stage));
        match work.await {
            Ok(value) => {
                self.emit(PipelineEvent::StageFinished(stage));
                Ok(value)
            }
            Err(e) => {
                self.emit(PipelineEvent::StageFailed {
                    stage,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn emit(&self, event: PipelineEvent) {
        self.observer.on_event(&event);
    }
}
