//! Resolved settings shared by every command.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use taskboard_core::config::{TaskboardConfig, load_config};
use taskboard_core::controller::BoardController;
use taskboard_core::notify::Notifier;
use taskboard_core::source::TaskSource;
use taskboard_core::store::JsonFileStore;
use taskboard_core::timeago::Locale;
use tracing::debug;

use crate::notify::build_notifier;
use crate::output::{CliError, OutputMode, fail, resolve_output_mode};
use crate::source::open_source;

pub type Board = BoardController<Box<dyn TaskSource>, JsonFileStore, Box<dyn Notifier>>;

#[derive(Debug, Clone)]
pub struct App {
    pub config: TaskboardConfig,
    pub output: OutputMode,
    pub quiet: bool,
    source: Option<String>,
}

impl App {
    /// Load the config and apply command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file cannot be read or parsed.
    pub fn resolve(
        config_path: Option<&Path>,
        source_flag: Option<String>,
        format_flag: Option<OutputMode>,
        json_flag: bool,
        quiet: bool,
    ) -> Result<Self> {
        let config = load_config(config_path).context("Failed to load taskboard config")?;
        let output = resolve_output_mode(format_flag, json_flag, config.display.output.as_deref());
        let source = source_flag.or_else(|| config.source.location.clone());
        debug!(?output, source = ?source, "resolved settings");
        Ok(Self {
            config,
            output,
            quiet,
            source,
        })
    }

    pub const fn locale(&self) -> Locale {
        self.config.display.locale
    }

    /// The task source location, from `--source` or `[source] location`.
    ///
    /// # Errors
    ///
    /// Renders and returns an error when neither is set.
    pub fn source_location(&self) -> Result<&str> {
        self.source.as_deref().ok_or_else(|| {
            fail(
                self.output,
                CliError {
                    message: "no task source configured".to_string(),
                    suggestion: Some(
                        "Pass --source <PATH|URL> or set [source] location in config.toml."
                            .to_string(),
                    ),
                    error_code: None,
                },
            )
        })
    }

    /// The store file, from `[store] path` or the platform data dir.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is available.
    pub fn store_path(&self) -> Result<PathBuf> {
        self.config
            .store
            .resolved_path()
            .context("no data directory available; set [store] path in config.toml")
    }

    /// Build a board controller wired to the configured source, store, and
    /// notifier.
    ///
    /// # Errors
    ///
    /// See [`App::source_location`] and [`App::store_path`].
    pub fn board(&self) -> Result<Board> {
        let source = open_source(self.source_location()?);
        let store = JsonFileStore::new(self.store_path()?);
        let notifier = build_notifier(&self.config.notify, self.quiet);
        Ok(BoardController::new(source, store, notifier, self.locale()))
    }
}
