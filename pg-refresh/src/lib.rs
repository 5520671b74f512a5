//! pg-refresh library
//!
//! Refreshes a local development database from remote Postgres backups:
//! list the backups, pick one, download it and restore it with pg_restore.

pub mod backups;
pub mod config;
pub mod exec;
pub mod pipeline;
pub mod restore;
pub mod transfer;
pub mod utils;

// Re-export commonly used types
pub use backups::{BackupRecord, SelectionCriteria};
pub use config::Config;
pub use pipeline::observer::{
    ConsoleObserver, PipelineEvent, PipelineObserver, Stage, TracingObserver,
};
pub use pipeline::{ImportSummary, Refresher};
pub use utils::errors::RefreshError;
pub type Result<T> = std::result::Result<T, RefreshError>;
