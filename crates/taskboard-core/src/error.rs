use std::fmt;

/// Machine-readable error codes surfaced by the CLI in every output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    FetchFailure,
    MalformedDocument,
    StoreUnavailable,
    StoreCorrupt,
    NotificationUnavailable,
    InvalidFilterValue,
    InvalidPhase,
    TaskNotFound,
}

impl ErrorCode {
    /// `E` plus four digits; the first digit names the area.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FetchFailure => "E2001",
            Self::MalformedDocument => "E2002",
            Self::StoreUnavailable => "E3001",
            Self::StoreCorrupt => "E3002",
            Self::NotificationUnavailable => "E4001",
            Self::InvalidFilterValue => "E5001",
            Self::InvalidPhase => "E5002",
            Self::TaskNotFound => "E5003",
        }
    }

    /// One-line summary.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::FetchFailure => "Task list could not be fetched",
            Self::MalformedDocument => "Task document is malformed",
            Self::StoreUnavailable => "Store unavailable",
            Self::StoreCorrupt => "Stored value has an unexpected shape",
            Self::NotificationUnavailable => "Notifications unavailable",
            Self::InvalidFilterValue => "Invalid filter value",
            Self::InvalidPhase => "Operation not allowed in the current board state",
            Self::TaskNotFound => "Task not found",
        }
    }

    /// What the user can do about it, if anything.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::FetchFailure => Some("Check the source location and reload."),
            Self::MalformedDocument => {
                Some("The source must be a JSON object with a `tasks` array, or a bare array.")
            }
            Self::StoreUnavailable => Some("Check that the store path is writable."),
            Self::StoreCorrupt => Some("Delete or repair the store file; it is rebuilt on the next run."),
            Self::NotificationUnavailable => {
                Some("Install a notifier (e.g. notify-send) or set notify.enabled = false.")
            }
            Self::InvalidFilterValue => Some(
                "Windows: all, 1h, 24h, 3d, 1w. Statuses: all, completed, pending.",
            ),
            Self::InvalidPhase => Some("Reload the board first."),
            Self::TaskNotFound => Some("Run `tb show --format text` to list fingerprints."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
