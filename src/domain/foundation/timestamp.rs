//! UTC timestamps as they appear on the wire.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC instant, serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Calendar quarter label used as the reporting period, e.g. `Q4 2024`.
    pub fn quarter_label(&self) -> String {
        let quarter = self.0.month0() / 3 + 1;
        format!("Q{} {}", quarter, self.0.year())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap().into()
    }

    #[test]
    fn quarters_follow_the_calendar() {
        assert_eq!(at(2025, 1, 1).quarter_label(), "Q1 2025");
        assert_eq!(at(2025, 3, 31).quarter_label(), "Q1 2025");
        assert_eq!(at(2025, 4, 1).quarter_label(), "Q2 2025");
        assert_eq!(at(2024, 11, 3).quarter_label(), "Q4 2024");
    }

    #[test]
    fn serializes_as_rfc3339() {
        let json = serde_json::to_string(&at(2025, 1, 10)).unwrap();
        assert_eq!(json, r#""2025-01-10T09:30:00Z""#);
    }

    #[test]
    fn orders_chronologically() {
        assert!(at(2025, 1, 10) < at(2025, 1, 11));
    }
}
