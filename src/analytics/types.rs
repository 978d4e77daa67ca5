//! Core data types for channel analytics
//!
//! Defines linked channels, monthly view records and calendar months.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A calendar month (year + month number 1-12)
///
/// Ordering is chronological, so sorting descending puts the most recent
/// month first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, returning None if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing the given date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of this month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of this month
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error returned when a month string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid month '{0}': expected YYYY-MM, YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct ParseMonthError(pub String);

impl FromStr for Month {
    type Err = ParseMonthError;

    /// Accepts `YYYY-MM`, `YYYY-MM-DD` and RFC 3339 timestamps.
    /// Anything after the day component is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_string());
        let trimmed = s.trim();

        let mut parts = trimmed.splitn(3, '-');
        let year: i32 = parts
            .next()
            .filter(|y| y.len() == 4)
            .and_then(|y| y.parse().ok())
            .ok_or_else(err)?;
        let month: u32 = parts
            .next()
            .filter(|m| m.len() == 2)
            .and_then(|m| m.parse().ok())
            .ok_or_else(err)?;

        if let Some(rest) = parts.next() {
            let day: u32 = rest
                .get(..2)
                .and_then(|d| d.parse().ok())
                .ok_or_else(err)?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err)?;
        }

        Month::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for Month {
    type Error = ParseMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// One row of historical view data: (channel, month, views)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyViewRecord {
    /// URL of the channel this record belongs to
    #[serde(rename = "channel_id", alias = "channel_url")]
    pub channel_url: String,
    /// Calendar month the views were counted in
    pub month: Month,
    /// View count for the month
    pub views: u64,
}

impl MonthlyViewRecord {
    pub fn new(channel_url: impl Into<String>, month: Month, views: u64) -> Self {
        Self {
            channel_url: channel_url.into(),
            month,
            views,
        }
    }
}

/// Per-channel summary shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedChannel {
    /// Channel URL, acts as primary key
    pub url: String,
    /// URL with the scheme and platform host stripped
    pub display_name: String,
    /// Sum of all recorded monthly views
    pub views: u64,
    /// Views in the most recent recorded month
    pub monthly_views: u64,
    /// No data source exists for subscriber counts, always None
    pub subscribers: Option<u64>,
    /// Percent change of monthly views against the prior recorded month
    pub growth: f64,
}

impl LinkedChannel {
    /// A channel with no recorded history
    pub fn empty(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            display_name: display_name(&url),
            url,
            views: 0,
            monthly_views: 0,
            subscribers: None,
            growth: 0.0,
        }
    }
}

fn channel_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^https?://(www\.)?(youtube\.com/|youtu\.be/)")
            .expect("channel prefix pattern is valid")
    })
}

/// Strip the scheme and platform host from a channel URL
///
/// `https://www.youtube.com/@creator` becomes `@creator`. URLs on other
/// hosts are returned unchanged.
pub fn display_name(url: &str) -> String {
    channel_prefix().replace(url, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_parsing() {
        assert_eq!("2025-03".parse::<Month>().unwrap(), Month::new(2025, 3).unwrap());
        assert_eq!("2025-03-01".parse::<Month>().unwrap(), Month::new(2025, 3).unwrap());
        assert_eq!(
            "2025-03-01T00:00:00+00:00".parse::<Month>().unwrap(),
            Month::new(2025, 3).unwrap()
        );

        assert!("2025-13".parse::<Month>().is_err());
        assert!("2025-02-30".parse::<Month>().is_err());
        assert!("March".parse::<Month>().is_err());
        assert!("25-03".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_ordering() {
        let jan = Month::new(2025, 1).unwrap();
        let dec = Month::new(2024, 12).unwrap();

        assert!(jan > dec);
        assert_eq!(jan.prev(), dec);
        assert_eq!(dec.next(), jan);
    }

    #[test]
    fn test_month_last_day() {
        let feb_leap = Month::new(2024, 2).unwrap();
        assert_eq!(feb_leap.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = Month::new(2025, 12).unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{"id": 4, "user_id": "u1", "channel_id": "https://youtube.com/@a", "month": "2025-02-01", "views": 120}"#;
        let record: MonthlyViewRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.channel_url, "https://youtube.com/@a");
        assert_eq!(record.month, Month::new(2025, 2).unwrap());
        assert_eq!(record.views, 120);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("https://www.youtube.com/@creator"), "@creator");
        assert_eq!(display_name("http://youtu.be/abc"), "abc");
        assert_eq!(display_name("https://vimeo.com/someone"), "https://vimeo.com/someone");
    }
}
