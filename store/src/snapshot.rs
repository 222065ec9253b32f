//! Snapshot identifiers.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const ID_FORMAT: &str = "%Y%m%d_%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// Name of an archived record: `YYYYMMDD_HHMMSS`, optionally followed by a
/// two-digit `_NN` suffix when several snapshots fall in the same second.
///
/// Lexicographic order is chronological order: a suffixed identifier sorts
/// after its bare form and before the next second.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Identifier for a snapshot taken at `time`.
    pub fn at(time: NaiveDateTime) -> Self {
        Self(time.format(ID_FORMAT).to_string())
    }

    /// The same second with a collision suffix.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{n:02}", self.0))
    }

    /// Wrap an existing file stem.
    pub fn from_stem(stem: impl Into<String>) -> Self {
        Self(stem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYYMMDD` part.
    pub fn date_part(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Whether this snapshot was taken on or before `date`.
    pub fn is_on_or_before(&self, date: NaiveDate) -> bool {
        self.date_part() <= date.format(DATE_FORMAT).to_string().as_str()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing entry for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub id: SnapshotId,

    /// Day the archived record was last saved.
    pub date: NaiveDate,

    /// Commit recorded in the archived record; empty if unknown.
    pub commit: String,

    /// Number of files in the archived record.
    pub files: usize,
}

/// Parse a `YYYY-MM-DD` or `YYYYMMDD` date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, DATE_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn time(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_identifier_format_and_order() {
        let id = SnapshotId::at(time("2024-03-01 14:05:09"));
        assert_eq!(id.as_str(), "20240301_140509");
        assert_eq!(id.date_part(), "20240301");

        let suffixed = id.with_suffix(1);
        let next = SnapshotId::at(time("2024-03-01 14:05:10"));
        assert_eq!(suffixed.as_str(), "20240301_140509_01");
        assert!(id < suffixed && suffixed < next);
        assert_eq!(suffixed.date_part(), "20240301");
    }

    #[test]
    fn test_date_comparison() {
        let id = SnapshotId::from_stem("20240301_140509");
        let date = |s| parse_date(s).unwrap();

        assert!(id.is_on_or_before(date("2024-03-01")));
        assert!(id.is_on_or_before(date("20240302")));
        assert!(!id.is_on_or_before(date("2024-02-29")));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }
}
