use std::path::{Path, PathBuf};

use serde::Deserialize;
use spritework_core::abstract_editor::DEFAULT_MAX_UNDO;
use thiserror::Error;

/// Editor settings loaded from a TOML file.
///
/// Every field has a default, so an empty file (or no file) is valid:
///
/// ```toml
/// [history]
/// max_undo = 100
///
/// [log]
/// level = "info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorSettings {
    pub history: HistorySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySettings {
    /// Undo entries kept before the oldest is dropped.
    pub max_undo: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Default `env_logger` filter; `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid setting in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

impl EditorSettings {
    /// Parses settings from TOML text. `path` is only used in errors.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if settings.history.max_undo == 0 {
            return Err(SettingsError::Invalid {
                path: path.to_path_buf(),
                message: "history.max_undo must be at least 1".into(),
            });
        }
        Ok(settings)
    }
}

/// Loads settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<EditorSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    EditorSettings::from_toml(&content, path)
}

/// Loads settings, falling back to defaults if there is no file or it is
/// unusable.
///
/// Runs before the logger exists, so a load failure is handed back for the
/// caller to report once logging is up.
pub fn load_or_default(path: Option<&Path>) -> (EditorSettings, Option<SettingsError>) {
    match path.map(load_settings) {
        None => (EditorSettings::default(), None),
        Some(Ok(settings)) => (settings, None),
        Some(Err(e)) => (EditorSettings::default(), Some(e)),
    }
}
