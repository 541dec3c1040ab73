//! Derived task identity.
//!
//! Tasks arrive without a stable key, so per-task state (completion, novelty)
//! is joined on a fingerprint built from the title, the day, and the first
//! ten characters of the description. Two tasks that differ only past that
//! prefix share a fingerprint; that collision is accepted.

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

use crate::model::Task;

/// Number of description characters that contribute to identity.
pub const DESCRIPTION_PREFIX_CHARS: usize = 10;

/// Stable identity string for a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-computed fingerprint (e.g. read back from the store
    /// or typed by the user).
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Fingerprint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Compute the fingerprint of a task.
#[must_use]
pub fn fingerprint(task: &Task) -> Fingerprint {
    let prefix: String = task
        .description
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(DESCRIPTION_PREFIX_CHARS)
        .collect();
    let joined = format!(
        "{}-{}-{}",
        task.title,
        task.day.as_deref().unwrap_or_default(),
        prefix
    );
    Fingerprint(joined.chars().filter(|&c| is_identity_char(c)).collect())
}

/// ASCII letters and digits plus the Arabic block (which covers Persian).
const fn is_identity_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '\u{0600}'..='\u{06FF}')
}
