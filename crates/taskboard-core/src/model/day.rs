use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The eight fixed day buckets, in display order.
///
/// The week starts on Saturday. [`Day::Misc`] is the catch-all for tasks
/// whose `day` is absent or unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Misc,
}

impl Day {
    /// Every bucket in display order.
    pub const ALL: [Self; 8] = [
        Self::Saturday,
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Misc,
    ];

    /// The label used by the task source (and shown as the bucket heading).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Saturday => "شنبه",
            Self::Sunday => "یکشنبه",
            Self::Monday => "دوشنبه",
            Self::Tuesday => "سه\u{200c}شنبه",
            Self::Wednesday => "چهارشنبه",
            Self::Thursday => "پنج\u{200c}شنبه",
            Self::Friday => "جمعه",
            Self::Misc => "متفرقه",
        }
    }

    /// English name, accepted on input and used for the English locale.
    #[must_use]
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Misc => "Misc",
        }
    }

    /// Position in display order (0..8).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolve a task's raw `day` attribute to its bucket.
    ///
    /// Absent or unrecognized values land in [`Day::Misc`].
    #[must_use]
    pub fn bucket_for(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or(Self::Misc)
    }
}

/// Error returned when a string is not a known day label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayError {
    pub got: String,
}

impl fmt::Display for ParseDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid day: '{}'", self.got)
    }
}

impl std::error::Error for ParseDayError {}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Source labels are matched exactly; a plain space in place of the
        // ZWNJ is a common typing variant, so accept that too.
        let normalized = trimmed.replace(' ', "\u{200c}");
        if let Some(day) = Self::ALL.into_iter().find(|d| d.label() == normalized) {
            return Ok(day);
        }
        Self::ALL
            .into_iter()
            .find(|d| d.english_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDayError { got: s.to_string() })
    }
}
