use elemental_codec::CodecOptions;
use elemental_editor::SessionConfig;
use elemental_proto::Channel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "elemental.config.json";

/// Elemental configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Channel used when a command is not given one
    #[serde(default = "default_channel")]
    pub default_channel: Channel,

    /// Write attributes even when they hold their default value
    #[serde(default)]
    pub emit_default_attributes: bool,

    /// Undo depth for `edit` sessions (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Quiet period before an edit session persists
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Treat conversion warnings as errors
    #[serde(default)]
    pub fail_on_diagnostics: bool,
}

fn default_channel() -> Channel {
    Channel::Email
}

fn default_undo_levels() -> usize {
    100
}

fn default_debounce_ms() -> u64 {
    500
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path_in(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Invalid {}: {}", config_path.display(), e)
            })?;
            debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            debug!("No config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn path_in(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            emit_default_attributes: self.emit_default_attributes,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            undo_levels: self.undo_levels,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_channel: default_channel(),
            emit_default_attributes: false,
            undo_levels: default_undo_levels(),
            debounce_ms: default_debounce_ms(),
            fail_on_diagnostics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "defaultChannel": "push",
            "emitDefaultAttributes": true,
            "undoLevels": 20,
            "debounceMs": 250,
            "failOnDiagnostics": true
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_channel, Channel::Push);
        assert!(config.emit_default_attributes);
        assert_eq!(config.undo_levels, 20);
        assert_eq!(config.session_config().debounce, Duration::from_millis(250));
        assert!(config.fail_on_diagnostics);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_channel, Channel::Email);
        assert!(!config.codec_options().emit_default_attributes);
        assert_eq!(config.session_config(), SessionConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "defaultChannel": "sms" }"#).unwrap();
        assert_eq!(config.default_channel, Channel::Sms);
        assert_eq!(config.undo_levels, 100);
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(
            Config::path_in(dir.path()),
            r#"{ "defaultChannel": "inbox", "failOnDiagnostics": true }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_channel, Channel::Inbox);
        assert!(config.fail_on_diagnostics);
    }

    #[test]
    fn test_invalid_config_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::path_in(dir.path()), r#"{ "defaultChannel": "fax" }"#).unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains(DEFAULT_CONFIG_NAME));
    }
}
