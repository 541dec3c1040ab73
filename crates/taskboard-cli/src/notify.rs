//! Desktop and terminal notifiers.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use taskboard_core::config::NotifyConfig;
use taskboard_core::notify::{DisabledNotifier, NotifyError, Notifier};
use tracing::debug;

/// Runs `<program> <title> <body>` (the `notify-send` calling convention).
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let status = Command::new(&self.program)
            .arg(title)
            .arg(body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    NotifyError::Unavailable {
                        reason: format!("{}: {err}", self.program),
                    }
                }
                _ => NotifyError::Failed {
                    reason: format!("{}: {err}", self.program),
                },
            })?;

        if status.success() {
            debug!(program = %self.program, "desktop notification sent");
            Ok(())
        } else {
            Err(NotifyError::Failed {
                reason: format!("{} exited with {status}", self.program),
            })
        }
    }
}

/// Prints the notification on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        writeln!(io::stderr().lock(), "🔔 {title}: {body}").map_err(|err| NotifyError::Failed {
            reason: err.to_string(),
        })
    }
}

/// Tries `primary`; when it is unavailable, uses `fallback` instead.
#[derive(Debug, Clone)]
pub struct FallbackNotifier<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackNotifier<P, F> {
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Notifier, F: Notifier> Notifier for FallbackNotifier<P, F> {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        match self.primary.notify(title, body) {
            Err(NotifyError::Unavailable { reason }) => {
                debug!(%reason, "primary notifier unavailable; falling back");
                self.fallback.notify(title, body)
            }
            other => other,
        }
    }
}

/// Build the notifier described by `[notify]`. Quiet mode drops the
/// terminal fallback.
pub fn build_notifier(config: &NotifyConfig, quiet: bool) -> Box<dyn Notifier> {
    if !config.enabled {
        return Box::new(DisabledNotifier);
    }
    let desktop = CommandNotifier::new(config.command.clone());
    if quiet {
        Box::new(desktop)
    } else {
        Box::new(FallbackNotifier::new(desktop, TerminalNotifier))
    }
}
