//! Task source seam.
//!
//! A [`TaskSource`] returns the current task list or a [`FetchError`].
//! Fetches are not retried and carry no timeout of their own.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ErrorCode;
use crate::model::{DocumentError, Task, parse_document};

/// Errors raised while fetching the task list. All of them abort the cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The transport answered with a non-success status.
    #[error("{location} answered with status {status}")]
    Status { location: String, status: u16 },

    /// The transport itself failed (DNS, connection, TLS, ...).
    #[error("could not reach {location}: {reason}")]
    Transport { location: String, reason: String },

    /// Local file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload arrived but is not a task document.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl FetchError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Status { .. } | Self::Transport { .. } | Self::Io { .. } => {
                ErrorCode::FetchFailure
            }
            Self::Document(err) => err.code(),
        }
    }
}

/// Produces the current task list.
pub trait TaskSource {
    /// Fetch and decode the task list.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or a malformed document.
    fn fetch(&self) -> Result<Vec<Task>, FetchError>;

    /// Where the tasks come from, for logs and error messages.
    fn location(&self) -> String;
}

impl<T: TaskSource + ?Sized> TaskSource for Box<T> {
    fn fetch(&self) -> Result<Vec<Task>, FetchError> {
        (**self).fetch()
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Reads the task document from a local file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for FileSource {
    fn fetch(&self) -> Result<Vec<Task>, FetchError> {
        let raw = std::fs::read(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        let tasks = parse_document(&raw)?;
        debug!(path = %self.path.display(), count = tasks.len(), "read task document");
        Ok(tasks)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves queued responses, one per fetch; the last one repeats.
#[derive(Debug)]
pub struct ScriptedSource {
    responses: RefCell<Vec<Result<String, u16>>>,
}

impl ScriptedSource {
    /// A source that always returns `document`.
    #[must_use]
    pub fn document(document: impl Into<String>) -> Self {
        Self {
            responses: RefCell::new(vec![Ok(document.into())]),
        }
    }

    /// A source that always fails with the given status.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            responses: RefCell::new(vec![Err(status)]),
        }
    }

    /// Queue a document to be served after the current ones.
    #[must_use]
    pub fn then_document(self, document: impl Into<String>) -> Self {
        self.responses.borrow_mut().push(Ok(document.into()));
        self
    }

    /// Queue a failure to be served after the current ones.
    #[must_use]
    pub fn then_failing(self, status: u16) -> Self {
        self.responses.borrow_mut().push(Err(status));
        self
    }
}

impl TaskSource for ScriptedSource {
    fn fetch(&self) -> Result<Vec<Task>, FetchError> {
        let mut responses = self.responses.borrow_mut();
        let next = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses.first().cloned().unwrap_or(Err(404))
        };
        match next {
            Ok(document) => Ok(parse_document(document.as_bytes())?),
            Err(status) => Err(FetchError::Status {
                location: self.location(),
                status,
            }),
        }
    }

    fn location(&self) -> String {
        "scripted".to_string()
    }
}
