use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::timeago::Locale;

/// Directory name under the platform config/data dirs.
pub const APP_DIR: &str = "taskboard";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskboardConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// File path or `http(s)://` URL of the task document.
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured path, else `$XDG_DATA_DIR/taskboard/store.json`.
    #[must_use]
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_store_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_notify_command")]
    pub command: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            command: default_notify_command(),
        }
    }
}

/// `$XDG_CONFIG_DIR/taskboard/config.toml`, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `$XDG_DATA_DIR/taskboard/store.json`, if the platform has a data dir.
#[must_use]
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join("store.json"))
}

/// Load the user config.
///
/// With an explicit path the file must exist. Without one, the default
/// location is used and a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`TaskboardConfig`].
pub fn load_config(explicit: Option<&Path>) -> Result<TaskboardConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(TaskboardConfig::default()),
        },
    };
    load_config_file(&path)
}

fn load_config_file(path: &Path) -> Result<TaskboardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<TaskboardConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Canonical output mode name for a config/env value, or `None` if unknown.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

fn default_notify_command() -> String {
    "notify-send".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: TaskboardConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg, TaskboardConfig::default());
        assert!(cfg.notify.enabled);
        assert_eq!(cfg.notify.command, "notify-send");
        assert_eq!(cfg.display.locale, Locale::Persian);
        assert!(cfg.source.location.is_none());
    }

    #[test]
    fn full_file_parses_every_section() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[source]
location = "https://example.org/data.json"

[store]
path = "/var/lib/taskboard/store.json"

[display]
locale = "en"
output = "json"

[notify]
enabled = false
command = "dunstify"
"#,
        )
        .expect("write config");

        let cfg = load_config(Some(&path)).expect("load");
        assert_eq!(
            cfg.source.location.as_deref(),
            Some("https://example.org/data.json")
        );
        assert_eq!(
            cfg.store.resolved_path(),
            Some(PathBuf::from("/var/lib/taskboard/store.json"))
        );
        assert_eq!(cfg.display.locale, Locale::English);
        assert_eq!(cfg.display.output.as_deref(), Some("json"));
        assert!(!cfg.notify.enabled);
        assert_eq!(cfg.notify.command, "dunstify");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: TaskboardConfig = toml::from_str("[notify]\nenabled = false\n").expect("parse");
        assert!(!cfg.notify.enabled);
        assert_eq!(cfg.notify.command, "notify-send");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\nlocale = ").expect("write config");

        let err = load_config(Some(&path)).expect_err("malformed");
        assert!(err.to_string().contains("Failed to parse"));
        assert!(err.chain().any(|cause| cause.is::<toml::de::Error>()));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let result = toml::from_str::<TaskboardConfig>("[display]\nlocale = \"de\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let err = load_config(Some(&dir.path().join("absent.toml"))).expect_err("missing");
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn output_aliases_are_normalized() {
        assert_eq!(normalize_output_mode(" JSON "), Some("json"));
        assert_eq!(normalize_output_mode("human"), Some("pretty"));
        assert_eq!(normalize_output_mode("table"), Some("text"));
        assert_eq!(normalize_output_mode("yaml"), None);
    }
}
