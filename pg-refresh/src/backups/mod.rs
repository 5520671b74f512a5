//! Remote backup records: listing, parsing and selection.

pub mod parser;
pub mod remote;
pub mod selector;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use parser::parse_backups;
pub use remote::RemoteBackups;
pub use selector::{select_backup, Selection, SelectionCriteria};

/// Timestamp layout used by the backup listing
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date layout accepted as a selection criterion
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One remote snapshot as shown by the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: String,
    pub timestamp: NaiveDateTime,
}

impl BackupRecord {
    pub fn new(id: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            timestamp,
        }
    }

    /// Day the backup was taken, as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for BackupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.timestamp.format(TIMESTAMP_FORMAT))
    }
}
