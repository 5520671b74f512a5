//! Choosing which backup to import.

use super::BackupRecord;
use crate::utils::{RefreshError, Result};

/// Operator overrides for the default "first listed" choice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// Exact backup id
    pub id: Option<String>,

    /// Day the backup was taken, `YYYY-MM-DD`
    pub date: Option<String>,
}

impl SelectionCriteria {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            date: None,
        }
    }

    pub fn by_date(date: impl Into<String>) -> Self {
        Self {
            id: None,
            date: Some(date.into()),
        }
    }
}

/// The chosen backup, plus a notice when a criterion had to be ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub record: BackupRecord,
    pub notice: Option<String>,
}

/// Pick a backup: by id first, then by date, else the first listed one.
///
/// An id takes precedence over a date; the date is not consulted when an id
/// is given, even if the id matches nothing.
pub fn select_backup(backups: &[BackupRecord], criteria: &SelectionCriteria) -> Result<Selection> {
    let first = backups.first().ok_or(RefreshError::EmptyResult)?;

    let (found, notice) = if let Some(id) = &criteria.id {
        (
            backups.iter().find(|b| &b.id == id),
            format!("No backup with id {}, using the first listed backup", id),
        )
    } else if let Some(date) = &criteria.date {
        (
            backups.iter().find(|b| &b.date_string() == date),
            format!("No backup taken on {}, using the first listed backup", date),
        )
    } else {
        return Ok(Selection {
            record: first.clone(),
            notice: None,
        });
    };

    Ok(match found {
        Some(record) => Selection {
            record: record.clone(),
            notice: None,
        },
        None => Selection {
            record: first.clone(),
            notice: Some(notice),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, y: i32, m: u32, d: u32) -> BackupRecord {
        let ts = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        BackupRecord::new(id, ts)
    }

    fn listing() -> Vec<BackupRecord> {
        vec![
            record("b103", 2023, 5, 3),
            record("b102", 2023, 5, 2),
            record("b101", 2023, 5, 1),
        ]
    }

    #[test]
    fn test_default_is_first_listed() {
        let selection = select_backup(&listing(), &SelectionCriteria::default()).unwrap();
        assert_eq!(selection.record.id, "b103");
        assert!(selection.notice.is_none());
    }

    #[test]
    fn test_id_match_ignores_order() {
        let mut backups = listing();
        for _ in 0..backups.len() {
            let selection = select_backup(&backups, &SelectionCriteria::by_id("b102")).unwrap();
            assert_eq!(selection.record.id, "b102");
            assert!(selection.notice.is_none());
            backups.rotate_left(1);
        }
    }

    #[test]
    fn test_date_match() {
        let backups = vec![record("b102", 2023, 5, 2), record("b101", 2023, 5, 1)];
        let selection = select_backup(&backups, &SelectionCriteria::by_date("2023-05-01")).unwrap();
        assert_eq!(selection.record.id, "b101");
    }

    #[test]
    fn test_formatted_date_selects_same_day() {
        let backups = listing();
        for b in &backups {
            let selection =
                select_backup(&backups, &SelectionCriteria::by_date(b.date_string())).unwrap();
            assert_eq!(selection.record.date_string(), b.date_string());
        }
    }

    #[test]
    fn test_unmatched_id_falls_back_with_notice() {
        let selection = select_backup(&listing(), &SelectionCriteria::by_id("zzz")).unwrap();
        assert_eq!(selection.record.id, "b103");
        let notice = selection.notice.unwrap();
        assert!(notice.contains("zzz"));
        assert!(notice.ends_with("using the first listed backup"));
    }

    #[test]
    fn test_unmatched_date_falls_back_with_notice() {
        let selection = select_backup(&listing(), &SelectionCriteria::by_date("2020-01-01")).unwrap();
        assert_eq!(selection.record.id, "b103");
        assert!(selection.notice.unwrap().contains("2020-01-01"));
    }

    #[test]
    fn test_id_wins_over_date() {
        let criteria = SelectionCriteria {
            id: Some("b101".to_string()),
            date: Some("2023-05-02".to_string()),
        };
        let selection = select_backup(&listing(), &criteria).unwrap();
        assert_eq!(selection.record.id, "b101");
    }

    #[test]
    fn test_empty_listing_is_error() {
        for criteria in [
            SelectionCriteria::default(),
            SelectionCriteria::by_id("b101"),
            SelectionCriteria::by_date("2023-05-01"),
        ] {
            assert!(matches!(
                select_backup(&[], &criteria),
                Err(RefreshError::EmptyResult)
            ));
        }
    }
}
