//! TOML-based configuration for the `cursor-demo` program.
//!
//! Reads and writes `AppConfig` from an explicit path, or from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\CursorLibrary\config.toml`
//! - Linux:    `~/.config/cursorlibrary/config.toml`
//! - macOS:    `~/Library/Application Support/CursorLibrary/config.toml`
//!
//! # Example
//!
//! ```toml
//! [demo]
//! step_delay_ms = 2000
//! key = "Enter"
//! target_x = 640
//! target_y = 360
//! observe_secs = 30
//!
//! [journal]
//! export_dir = "C:\\Temp"
//! file_name = "session"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field carries a `#[serde(default = "...")]`, so an empty file, a
//! file with only some sections, or no file at all all produce a usable
//! configuration.

use std::path::{Path, PathBuf};

use cursor_core::journal::DEFAULT_EXPORT_STEM;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level demo configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The scripted walkthrough and the observation window that follows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoConfig {
    /// Pause between walkthrough steps, in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Key to tap first; any name accepted by `cursor_core::keymap::lookup`.
    #[serde(default = "default_key")]
    pub key: String,
    /// Screen X coordinate the pointer is moved to.
    #[serde(default)]
    pub target_x: i32,
    /// Screen Y coordinate the pointer is moved to.
    #[serde(default)]
    pub target_y: i32,
    /// How long global hooks stay installed after the walkthrough.
    #[serde(default = "default_observe_secs")]
    pub observe_secs: u64,
}

/// Where the session journal is exported when the demo ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalConfig {
    /// Existing directory to export into.  No export when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// File stem; the export is written as `<file_name>.txt`.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_step_delay_ms() -> u64 {
    5000
}
fn default_key() -> String {
    "A".to_string()
}
fn default_observe_secs() -> u64 {
    10
}
fn default_file_name() -> String {
    DEFAULT_EXPORT_STEM.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            key: default_key(),
            target_x: 0,
            target_y: 0,
            observe_secs: default_observe_secs(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            file_name: default_file_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the platform config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, or from the platform config file when
/// `path` is `None`.  A file that does not exist yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = resolve(path)?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` as pretty TOML to `path`, or to the platform config
/// file when `path` is `None`.  Creates the parent directory if needed.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = resolve(path)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn resolve(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => config_file_path(),
    }
}

/// Resolves the platform config base directory plus the `CursorLibrary`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("CursorLibrary"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("cursorlibrary"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("CursorLibrary")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cursor_cfg_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_matches_historical_walkthrough() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.demo.step_delay_ms, 5000);
        assert_eq!(cfg.demo.key, "A");
        assert_eq!((cfg.demo.target_x, cfg.demo.target_y), (0, 0));
        assert_eq!(cfg.demo.observe_secs, 10);
    }

    #[test]
    fn test_journal_config_default_has_no_export_dir() {
        let cfg = JournalConfig::default();
        assert!(cfg.export_dir.is_none());
        assert_eq!(cfg.file_name, "defaultLogs");
    }

    #[test]
    fn test_logging_config_default_level_is_info() {
        assert_eq!(LoggingConfig::default().level, "info");
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_demo_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[demo]
key = "Enter"
target_x = 640
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.demo.key, "Enter");
        assert_eq!(cfg.demo.target_x, 640);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.demo.step_delay_ms, 5000);
        assert_eq!(cfg.journal.file_name, "defaultLogs");
    }

    #[test]
    fn test_absent_export_dir_is_omitted_from_toml() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(!toml_str.contains("export_dir"));
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        // Act
        let result = load_config(Some(&path));

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── load_config / save_config ─────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        // Arrange
        let dir = temp_dir();

        // Act
        let cfg = load_config(Some(&dir.join("missing.toml"))).expect("load");

        // Assert
        assert_eq!(cfg, AppConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.demo.observe_secs = 42;
        cfg.journal.export_dir = Some(dir.clone());
        cfg.logging.level = "debug".to_string();

        // Act
        let written = save_config(&cfg, Some(&path)).expect("save");
        let loaded = load_config(Some(&written)).expect("load");

        // Assert
        assert_eq!(written, path);
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_reports_io_error_for_directory_path() {
        // Reading a directory as a file is an I/O error other than NotFound.
        let dir = temp_dir();
        let result = load_config(Some(&dir));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── config_dir path formation ─────────────────────────────────────────────

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir in a stripped CI environment is also acceptable.
    }
}
