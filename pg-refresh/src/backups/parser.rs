//! Parser for the tabular backup listing.
//!
//! The listing prints one backup per line as
//! `id date time <7 more columns>`. Headers, separators and the
//! "No backups ..." message are recognised only by not having exactly
//! [`RECORD_FIELDS`] columns (or by starting with `No`) and are skipped.

use super::{BackupRecord, TIMESTAMP_FORMAT};
use crate::utils::{RefreshError, Result};
use chrono::NaiveDateTime;
use tracing::trace;

/// Column count of a backup row
pub const RECORD_FIELDS: usize = 10;

// FIXME: any other 10-column line in the CLI output is taken for a backup row.
// Revisit once the listing can be requested in a structured format.
fn is_record_line(fields: &[&str]) -> bool {
    fields.len() == RECORD_FIELDS && fields[0] != "No"
}

/// Turn raw listing text into records, preserving listing order
pub fn parse_backups(raw: &str) -> Result<Vec<BackupRecord>> {
    let mut backups = Vec::new();

    for line in raw.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !is_record_line(&fields) {
            trace!("Skipping listing line: {:?}", line);
            continue;
        }

        let stamp = format!("{} {}", fields[1], fields[2]);
        let timestamp = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).map_err(
            |source| RefreshError::Parse {
                line: line.to_string(),
                source,
            },
        )?;

        backups.push(BackupRecord::new(fields[0], timestamp));
    }

    Ok(backups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LISTING: &str = "\
=== Backups
ID    Created at                 Status                               Size    Database
────  ─────────────────────────  ───────────────────────────────────  ──────  ────────
b102  2023-05-02 03:00:12 +0000  Completed 2023-05-02 03:04:40 +0000  1.2GB   DATABASE
b101  2023-05-01 03:00:09 +0000  Completed 2023-05-01 03:04:01 +0000  1.1GB   DATABASE

=== Restores
No restores found. Use heroku pg:backups:restore to restore a backup
";

    #[test]
    fn test_single_ten_field_line() {
        let backups = parse_backups("a1b2c3d4 2023-05-01 10:30:00 f4 f5 f6 f7 f8 f9 f10").unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(backups, vec![BackupRecord::new("a1b2c3d4", expected)]);
    }

    #[test]
    fn test_no_backups_message() {
        let backups = parse_backups("No backups found for this app").unwrap();
        assert!(backups.is_empty());
    }

    #[test]
    fn test_no_guard_applies_to_ten_field_lines() {
        let backups = parse_backups("No 2023-05-01 10:30:00 f4 f5 f6 f7 f8 f9 f10").unwrap();
        assert!(backups.is_empty());
    }

    #[test]
    fn test_realistic_listing_keeps_order() {
        let backups = parse_backups(LISTING).unwrap();
        let ids: Vec<&str> = backups.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b102", "b101"]);
        assert_eq!(backups[1].date_string(), "2023-05-01");
    }

    #[test]
    fn test_field_count_must_be_exact() {
        let raw = "\
short 2023-05-01 10:30:00 f4 f5 f6 f7 f8 f9
long 2023-05-01 10:30:00 f4 f5 f6 f7 f8 f9 f10 f11
ok 2023-05-01 10:30:00 f4 f5 f6 f7 f8 f9 f10
";
        let backups = parse_backups(raw).unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].id, "ok");
    }

    #[test]
    fn test_tabs_and_repeated_spaces_split_alike() {
        let backups = parse_backups("x1\t2023-05-01   10:30:00 a b c d e f g").unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].id, "x1");
    }

    #[test]
    fn test_bad_timestamp_on_qualifying_line() {
        let err = parse_backups("a1 2023-13-01 10:30:00 f4 f5 f6 f7 f8 f9 f10").unwrap_err();
        match err {
            RefreshError::Parse { line, .. } => assert!(line.starts_with("a1 ")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_backups("").unwrap().is_empty());
    }
}
