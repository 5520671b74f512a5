//! Pipeline progress events and the observers that present them.

use crate::backups::BackupRecord;
use crate::transfer::progress::{format_bytes, percent};
use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Steps of a pipeline run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ListBackups,
    ParseBackups,
    SelectBackup,
    ResolveUrl,
    Download,
    Restore,
    Cleanup,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::ListBackups => "Listing database backups",
            Stage::ParseBackups => "Parsing database backups",
            Stage::SelectBackup => "Selecting backup",
            Stage::ResolveUrl => "Resolving download URL",
            Stage::Download => "Downloading backup",
            Stage::Restore => "Restoring dump",
            Stage::Cleanup => "Deleting dump file",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StageStarted(Stage),
    StageFinished(Stage),
    StageFailed { stage: Stage, error: String },
    /// Something the operator should see, e.g. an ignored selection criterion
    Notice(String),
    SelectedBackup(BackupRecord),
    DownloadProgress { bytes: u64, total: Option<u64> },
}

/// Receives pipeline events; implementations must not block
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Reports events through `tracing` only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageStarted(stage) => info!("{}", stage),
            PipelineEvent::StageFinished(stage) => debug!("{}: done", stage),
            PipelineEvent::StageFailed { stage, error } => error!("{} failed: {}", stage, error),
            PipelineEvent::Notice(msg) => warn!("{}", msg),
            PipelineEvent::SelectedBackup(backup) => info!("Using backup: {}", backup),
            PipelineEvent::DownloadProgress { bytes, total } => {
                debug!("Downloaded {} of {:?} bytes", bytes, total)
            }
        }
    }
}

/// Terminal output for interactive runs: one line per stage.
///
/// Writes to stderr by default so stdout only carries command results.
pub struct ConsoleObserver {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::with_writer(std::io::stderr())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleObserver").finish_non_exhaustive()
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_event(&self, event: &PipelineEvent) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Console output is best effort; a closed terminal must not fail the run.
        let _ = match event {
            PipelineEvent::StageStarted(stage) => {
                write!(out, "{}: ", stage).and_then(|_| out.flush())
            }
            PipelineEvent::StageFinished(_) => writeln!(out, "Done!"),
            PipelineEvent::StageFailed { .. } => writeln!(out, "Failed"),
            PipelineEvent::Notice(msg) => writeln!(out, "Note: {}", msg),
            PipelineEvent::SelectedBackup(backup) => writeln!(out, "Using backup: {}", backup),
            PipelineEvent::DownloadProgress { bytes, total } => {
                match percent(*bytes, *total) {
                    Some(p) => debug!("Downloaded {} ({:.1}%)", format_bytes(*bytes), p),
                    None => debug!("Downloaded {}", format_bytes(*bytes)),
                }
                Ok(())
            }
        };
    }
}
