//! Per-deck study counters.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate counters for a deck. Missing fields in stored documents read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    pub studied_count: u32,
    pub known_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_studied_at: Option<DateTime<Utc>>,
}

impl Progress {
    /// Counts one studied card, and one known card when `was_known`.
    pub fn record(&mut self, was_known: bool, at: DateTime<Utc>) {
        self.studied_count = self.studied_count.saturating_add(1);
        if was_known {
            self.known_count = self.known_count.saturating_add(1);
        }
        self.last_studied_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_known_and_unknown() {
        let mut progress = Progress::default();
        let now = Utc::now();

        progress.record(true, now);
        progress.record(false, now);
        progress.record(true, now);

        assert_eq!(progress.studied_count, 3);
        assert_eq!(progress.known_count, 2);
        assert_eq!(progress.last_studied_at, Some(now));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let progress: Progress = serde_json::from_str(r#"{"studiedCount": 4}"#).unwrap();

        assert_eq!(progress.studied_count, 4);
        assert_eq!(progress.known_count, 0);
        assert!(progress.last_studied_at.is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let progress = Progress {
            studied_count: 2,
            known_count: 1,
            last_studied_at: None,
        };
        let json = serde_json::to_string(&progress).unwrap();

        assert_eq!(json, r#"{"studiedCount":2,"knownCount":1}"#);
    }
}
