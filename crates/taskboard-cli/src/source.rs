//! Task sources selectable from the command line.

use std::io::Read;
use taskboard_core::model::{Task, parse_document};
use taskboard_core::source::{FetchError, FileSource, TaskSource};
use tracing::debug;

/// Fetches the task document over HTTP(S) on every call.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TaskSource for HttpSource {
    fn fetch(&self) -> Result<Vec<Task>, FetchError> {
        let response = ureq::get(&self.url)
            .set("Accept", "application/json")
            .set("User-Agent", "taskboard-cli")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => FetchError::Status {
                    location: self.url.clone(),
                    status,
                },
                ureq::Error::Transport(transport) => FetchError::Transport {
                    location: self.url.clone(),
                    reason: transport.to_string(),
                },
            })?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| FetchError::Transport {
                location: self.url.clone(),
                reason: err.to_string(),
            })?;
        debug!(url = %self.url, bytes = body.len(), "fetched task document");

        Ok(parse_document(&body)?)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for `location`: `http(s)://` URLs go over the network,
/// anything else is a local path.
pub fn open_source(location: &str) -> Box<dyn TaskSource> {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}
