//! Relative-age labels ("3 hours ago").
//!
//! Elapsed time is bucketed into the largest unit whose length it strictly
//! exceeds, and the count is floored. Under a minute (and any timestamp in
//! the future) is "moments ago". The current time is always passed in, so
//! every function here is pure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::parse_timestamp;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const SECONDS_PER_MONTH: i64 = 2_592_000;
pub const SECONDS_PER_YEAR: i64 = 31_536_000;

/// Display language for labels and notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "fa")]
    Persian,
    #[serde(rename = "en")]
    English,
}

impl Locale {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Persian => "fa",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fa" | "persian" => Ok(Self::Persian),
            "en" | "english" => Ok(Self::English),
            other => Err(format!("unknown locale '{other}' (expected fa or en)")),
        }
    }
}

/// Units in ascending order of magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl AgeUnit {
    /// Largest first, the order classification tries them in.
    const DESCENDING: [(Self, i64); 5] = [
        (Self::Year, SECONDS_PER_YEAR),
        (Self::Month, SECONDS_PER_MONTH),
        (Self::Day, SECONDS_PER_DAY),
        (Self::Hour, SECONDS_PER_HOUR),
        (Self::Minute, SECONDS_PER_MINUTE),
    ];

    const fn persian(self) -> &'static str {
        match self {
            Self::Minute => "دقیقه",
            Self::Hour => "ساعت",
            Self::Day => "روز",
            Self::Month => "ماه",
            Self::Year => "سال",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Classified age of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeAge {
    Moments,
    Ago { count: i64, unit: AgeUnit },
}

impl RelativeAge {
    /// Classify an elapsed duration in whole seconds.
    #[must_use]
    pub fn from_elapsed_secs(elapsed: i64) -> Self {
        AgeUnit::DESCENDING
            .into_iter()
            .find(|&(_, len)| elapsed > len)
            .map_or(Self::Moments, |(unit, len)| Self::Ago {
                count: elapsed / len,
                unit,
            })
    }

    /// Coarse magnitude class: 0 for moments, then 1 (minute) up to 5 (year).
    #[must_use]
    pub const fn magnitude(self) -> u8 {
        match self {
            Self::Moments => 0,
            Self::Ago { unit, .. } => unit as u8 + 1,
        }
    }

    #[must_use]
    pub fn label(self, locale: Locale) -> String {
        match (self, locale) {
            (Self::Moments, Locale::Persian) => "لحظاتی پیش".to_string(),
            (Self::Moments, Locale::English) => "moments ago".to_string(),
            (Self::Ago { count, unit }, Locale::Persian) => {
                format!("{count} {} پیش", unit.persian())
            }
            (Self::Ago { count, unit }, Locale::English) => {
                let plural = if count == 1 { "" } else { "s" };
                format!("{count} {}{plural} ago", unit.english())
            }
        }
    }
}

/// Seconds elapsed between `then` and `now` (negative if `then` is later).
#[must_use]
pub fn elapsed_secs(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_seconds()
}

/// Classify a raw timestamp; `None` if it is absent or unparseable.
#[must_use]
pub fn relative_age(timestamp: Option<&str>, now: DateTime<Utc>) -> Option<RelativeAge> {
    let then = timestamp.and_then(parse_timestamp)?;
    Some(RelativeAge::from_elapsed_secs(elapsed_secs(then, now)))
}

/// Human label for a raw timestamp; empty when there is nothing to show.
#[must_use]
pub fn format_relative(timestamp: Option<&str>, now: DateTime<Utc>, locale: Locale) -> String {
    relative_age(timestamp, now).map_or_else(String::new, |age| age.label(locale))
}
