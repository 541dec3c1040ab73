//! Subject, completion-status, and time-window filtering.
//!
//! Criteria are transient: they start at "all" on every load and are never
//! persisted. Filtering is a pure selection over the full task list; it
//! never touches the completion map or reorders tasks.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::{fmt, str::FromStr};

use crate::completion::{CompletionMap, is_completed_in};
use crate::error::ErrorCode;
use crate::fingerprint::fingerprint;
use crate::model::Task;
use crate::timeago::{SECONDS_PER_DAY, SECONDS_PER_HOUR, elapsed_secs};

const ALL: &str = "all";

/// Error returned when a selector value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct FilterParseError {
    pub expected: &'static str,
    pub got: String,
}

impl FilterParseError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidFilterValue
    }
}

/// Subject selector: every task, or one title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubjectFilter {
    #[default]
    All,
    Title(String),
}

impl SubjectFilter {
    #[must_use]
    pub fn title(title: impl AsRef<str>) -> Self {
        Self::Title(title.as_ref().trim().to_string())
    }

    fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Title(title) => title,
        }
    }
}

impl FromStr for SubjectFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == ALL {
            Ok(Self::All)
        } else {
            Ok(Self::title(trimmed))
        }
    }
}

/// Maximum task age to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "1h")]
    LastHour,
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "3d")]
    LastThreeDays,
    #[serde(rename = "1w")]
    LastWeek,
}

impl TimeWindow {
    pub const VALUES: [Self; 5] = [
        Self::All,
        Self::LastHour,
        Self::LastDay,
        Self::LastThreeDays,
        Self::LastWeek,
    ];

    /// Age threshold in seconds; `None` for [`TimeWindow::All`].
    #[must_use]
    pub const fn threshold_secs(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::LastHour => Some(SECONDS_PER_HOUR),
            Self::LastDay => Some(SECONDS_PER_DAY),
            Self::LastThreeDays => Some(3 * SECONDS_PER_DAY),
            Self::LastWeek => Some(7 * SECONDS_PER_DAY),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::LastHour => "1h",
            Self::LastDay => "24h",
            Self::LastThreeDays => "3d",
            Self::LastWeek => "1w",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::VALUES
            .into_iter()
            .find(|w| w.as_str() == wanted)
            .ok_or_else(|| FilterParseError {
                expected: "time window (all, 1h, 24h, 3d, 1w)",
                got: s.to_string(),
            })
    }
}

/// Completion-status selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ALL => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            _ => Err(FilterParseError {
                expected: "status (all, completed, pending)",
                got: s.to_string(),
            }),
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_via_as_str!(SubjectFilter, TimeWindow, StatusFilter);

impl Serialize for SubjectFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The three selectors together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub subject: SubjectFilter,
    pub window: TimeWindow,
    pub status: StatusFilter,
}

impl FilterCriteria {
    #[must_use]
    pub fn is_all(&self) -> bool {
        *self == Self::default()
    }
}

/// Subject predicate: exact match against the trimmed title.
#[must_use]
pub fn subject_matches(task: &Task, subject: &SubjectFilter) -> bool {
    match subject {
        SubjectFilter::All => true,
        SubjectFilter::Title(title) => task.title.trim() == title.trim(),
    }
}

/// Status predicate, looked up by fingerprint in a loaded completion map.
#[must_use]
pub fn status_matches(task: &Task, status: StatusFilter, completed: &CompletionMap) -> bool {
    let done = || is_completed_in(completed, &fingerprint(task));
    match status {
        StatusFilter::All => true,
        StatusFilter::Completed => done(),
        StatusFilter::Pending => !done(),
    }
}

/// Time-window predicate. Tasks without a usable timestamp never pass a
/// bounded window.
#[must_use]
pub fn window_matches(task: &Task, window: TimeWindow, now: DateTime<Utc>) -> bool {
    let Some(threshold) = window.threshold_secs() else {
        return true;
    };
    task.created_at_utc()
        .is_some_and(|created| elapsed_secs(created, now) <= threshold)
}

/// Whether a task passes every selector (subject, then status, then window).
#[must_use]
pub fn matches(
    task: &Task,
    criteria: &FilterCriteria,
    completed: &CompletionMap,
    now: DateTime<Utc>,
) -> bool {
    subject_matches(task, &criteria.subject)
        && status_matches(task, criteria.status, completed)
        && window_matches(task, criteria.window, now)
}

/// The tasks passing `criteria`, in input order.
#[must_use]
pub fn apply_filters<'a>(
    tasks: &'a [Task],
    criteria: &FilterCriteria,
    completed: &CompletionMap,
    now: DateTime<Utc>,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| matches(task, criteria, completed, now))
        .collect()
}

/// Distinct trimmed non-empty titles, sorted, for the subject selector.
#[must_use]
pub fn subject_options(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title.trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
