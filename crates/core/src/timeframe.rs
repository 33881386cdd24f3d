//! Trailing time windows used by every dashboard query.
//!
//! A timeframe is one of the closed set {7, 14, 28} days. Windows are
//! inclusive on both ends and anchored to the most recent date present in
//! the table being read, not to the wall clock.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::CoreError;

/// Trailing window size in days.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
pub enum Timeframe {
    #[serde(rename = "7")]
    Week,
    #[serde(rename = "14")]
    TwoWeeks,
    #[default]
    #[serde(rename = "28")]
    FourWeeks,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Week, Timeframe::TwoWeeks, Timeframe::FourWeeks];

    /// Number of calendar days covered by the window.
    pub fn days(self) -> i64 {
        match self {
            Timeframe::Week => 7,
            Timeframe::TwoWeeks => 14,
            Timeframe::FourWeeks => 28,
        }
    }

    /// Number of ISO weeks covered by the window.
    pub fn weeks(self) -> i64 {
        self.days() / 7
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Week => "7",
            Timeframe::TwoWeeks => "14",
            Timeframe::FourWeeks => "28",
        }
    }

    /// Parse an optional query/body parameter, falling back to the default (28).
    pub fn from_param(value: Option<&str>) -> Result<Self, CoreError> {
        match value {
            None => Ok(Self::default()),
            Some(v) => v.parse(),
        }
    }

    /// The inclusive window ending at `latest`.
    pub fn window_ending(self, latest: NaiveDate) -> DateWindow {
        DateWindow {
            start: latest - Duration::days(self.days() - 1),
            end: latest,
        }
    }

    /// The inclusive window of week starts ending at `latest_week`.
    pub fn week_window_ending(self, latest_week: NaiveDate) -> DateWindow {
        DateWindow {
            start: latest_week - Duration::weeks(self.weeks() - 1),
            end: latest_week,
        }
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7" => Ok(Timeframe::Week),
            "14" => Ok(Timeframe::TwoWeeks),
            "28" => Ok(Timeframe::FourWeeks),
            other => Err(CoreError::InvalidTimeframe(other.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_valid_timeframes() {
        assert_eq!("7".parse::<Timeframe>().unwrap(), Timeframe::Week);
        assert_eq!("14".parse::<Timeframe>().unwrap(), Timeframe::TwoWeeks);
        assert_eq!("28".parse::<Timeframe>().unwrap(), Timeframe::FourWeeks);
    }

    #[test]
    fn test_parse_rejects_values_outside_set() {
        for bad in ["30", "0", "", "seven", "-7", "7d", " 7", "14 ", " 28 "] {
            assert_eq!(
                bad.parse::<Timeframe>(),
                Err(CoreError::InvalidTimeframe(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_param_defaults_to_28() {
        assert_eq!(Timeframe::from_param(None).unwrap(), Timeframe::FourWeeks);
        assert_eq!(Timeframe::from_param(Some("14")).unwrap(), Timeframe::TwoWeeks);
        assert!(Timeframe::from_param(Some("30")).is_err());
    }

    #[test]
    fn test_window_is_inclusive_trailing() {
        let window = Timeframe::Week.window_ending(d(2024, 3, 10));
        assert_eq!(window.start, d(2024, 3, 4));
        assert_eq!(window.end, d(2024, 3, 10));
        assert!(window.contains(d(2024, 3, 4)));
        assert!(window.contains(d(2024, 3, 10)));
        assert!(!window.contains(d(2024, 3, 3)));
        assert!(!window.contains(d(2024, 3, 11)));
    }

    #[test]
    fn test_window_spans_month_boundary() {
        let window = Timeframe::FourWeeks.window_ending(d(2024, 3, 5));
        assert_eq!(window.start, d(2024, 2, 7));
    }

    #[test]
    fn test_week_window() {
        let window = Timeframe::TwoWeeks.week_window_ending(d(2024, 3, 11));
        assert_eq!(window.start, d(2024, 3, 4));
        assert_eq!(Timeframe::FourWeeks.weeks(), 4);
    }

    #[test]
    fn test_serializes_as_string() {
        assert_eq!(serde_json::to_string(&Timeframe::TwoWeeks).unwrap(), "\"14\"");
        let tf: Timeframe = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(tf, Timeframe::Week);
    }
}
