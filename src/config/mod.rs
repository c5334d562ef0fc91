//! Configuration file handling and settings resolution.
//!
//! Values are layered: command-line flags, then `DIRWATCH_*` environment
//! variables, then the TOML file, then built-in defaults.

/// Unknown-field warnings and value checks.
pub mod validator;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// On-disk configuration, one table per concern.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// What to watch and how often
    #[serde(default)]
    pub watch: WatchConfig,

    /// Diagnostics output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[watch]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchConfig {
    /// Directory to poll; the working directory when unset
    #[serde(default, alias = "dir", skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Suffix a file name must end with to be tracked
    #[serde(default = "default_extension", alias = "ext")]
    pub extension: String,
    /// Marker string reported when it appears in a line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<String>,
    /// Seconds between polls
    #[serde(default = "default_interval_secs", alias = "int")]
    pub interval_secs: u64,
    /// Track symlinks whose target is a regular file
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
}

/// `[logging]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Colorize console output
    #[serde(default = "default_color")]
    pub color: bool,
}

/// Values given on the command line or through environment variables.
///
/// Anything set here wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--dir` / `DIRWATCH_DIR`
    pub directory: Option<PathBuf>,
    /// `--ext` / `DIRWATCH_EXT`
    pub extension: Option<String>,
    /// Positional marker / `DIRWATCH_MAGIC`
    pub magic: Option<String>,
    /// `--interval` / `DIRWATCH_INTERVAL`
    pub interval_secs: Option<u64>,
}

/// Fully resolved and validated settings for the watch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    /// Absolute directory to poll
    pub directory: PathBuf,
    /// File name suffix filter
    pub extension: String,
    /// Non-empty marker string
    pub magic: String,
    /// Wait between cycles
    pub interval: Duration,
    /// Whether symlinked files are tracked
    pub follow_symlinks: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: default_extension(),
            magic: None,
            interval_secs: default_interval_secs(),
            follow_symlinks: default_follow_symlinks(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or values of the wrong type
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load a config file the user named explicitly
    ///
    /// Unlike [`load`](Self::load), a missing file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, or for any reason
    /// [`load`](Self::load) fails.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::load(path)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if TOML serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Locate the config file to use
    ///
    /// An explicit path (from `--config` or `DIRWATCH_CONFIG_PATH`) wins;
    /// otherwise `~/.config/dirwatch/config.toml`.
    #[must_use]
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| dirs::home_dir().map(|home| home.join(crate::DEFAULT_CONFIG_PATH)))
    }

    /// Layer command-line and environment values on top of the file values
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(directory) = overrides.directory {
            self.watch.directory = Some(directory);
        }
        if let Some(extension) = overrides.extension {
            self.watch.extension = extension;
        }
        if let Some(magic) = overrides.magic {
            self.watch.magic = Some(magic);
        }
        if let Some(interval) = overrides.interval_secs {
            self.watch.interval_secs = interval;
        }
    }

    /// Validate and resolve the watch settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No marker string was configured, or it is empty
    /// - The extension filter is empty
    /// - The poll interval is zero
    /// - The working directory cannot be determined for a relative path
    pub fn settings(&self) -> Result<WatchSettings> {
        validator::ConfigValidator::validate(self)?;

        let magic = self
            .watch
            .magic
            .clone()
            .context("No magic string given: pass it as an argument or set watch.magic")?;

        let directory = match &self.watch.directory {
            Some(dir) => dir.clone(),
            None => PathBuf::from("."),
        };
        let directory = std::path::absolute(&directory).with_context(|| {
            format!("Failed to resolve watch directory: {}", directory.display())
        })?;

        Ok(WatchSettings {
            directory,
            extension: self.watch.extension.clone(),
            magic,
            interval: Duration::from_secs(self.watch.interval_secs),
            follow_symlinks: self.watch.follow_symlinks,
        })
    }
}

// Default functions for serde
fn default_extension() -> String {
    "txt".to_string()
}

const fn default_interval_secs() -> u64 {
    5
}

const fn default_follow_symlinks() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_color() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");

        let config = Config::load(&path)?;

        assert_eq!(config, Config::default());
        assert_eq!(config.watch.extension, "txt");
        assert_eq!(config.watch.interval_secs, 5);
        assert!(!path.exists());

        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nope.toml");

        let err = Config::load_explicit(&path).unwrap_err();

        assert!(err.to_string().contains("Config file not found"));
        assert!(err.to_string().contains("nope.toml"));
        assert!(!path.exists());

        std::fs::write(&path, "[watch]\nmagic = \"X\"\n")?;
        assert_eq!(Config::load_explicit(&path)?.watch.magic.as_deref(), Some("X"));

        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let config = Config::from_toml(
            r#"
            [watch]
            magic = "ERROR"
            int = 2
            "#,
        )?;

        assert_eq!(config.watch.magic.as_deref(), Some("ERROR"));
        assert_eq!(config.watch.interval_secs, 2);
        assert_eq!(config.watch.extension, "txt");
        assert_eq!(config.logging.level, "info");

        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_types() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[watch]\ninterval_secs = \"soon\"\n")?;

        assert!(Config::load(&path).is_err());

        Ok(())
    }

    #[test]
    fn test_overrides_win() -> Result<()> {
        let mut config = Config::from_toml("[watch]\nmagic = \"file\"\nextension = \"log\"\n")?;
        config.apply_overrides(Overrides {
            magic: Some("cli".to_string()),
            interval_secs: Some(9),
            ..Overrides::default()
        });

        assert_eq!(config.watch.magic.as_deref(), Some("cli"));
        assert_eq!(config.watch.extension, "log");
        assert_eq!(config.watch.interval_secs, 9);

        Ok(())
    }

    #[test]
    fn test_settings_resolve_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut config = Config::default();
        config.watch.magic = Some("ERROR".to_string());
        config.watch.directory = Some(temp_dir.path().to_path_buf());

        let settings = config.settings()?;

        assert_eq!(settings.directory, temp_dir.path());
        assert_eq!(settings.interval, Duration::from_secs(5));
        assert_eq!(settings.magic, "ERROR");

        let mut relative = config.clone();
        relative.watch.directory = None;
        assert!(relative.settings()?.directory.is_absolute());

        Ok(())
    }

    #[test]
    fn test_settings_require_magic() {
        let config = Config::default();
        let err = config.settings().unwrap_err();
        assert!(err.to_string().contains("magic string"));
    }

    #[test]
    fn test_toml_round_trip_is_readable() -> Result<()> {
        let mut config = Config::default();
        config.watch.magic = Some("ERROR".to_string());

        let rendered = config.to_toml()?;
        assert!(rendered.contains("[watch]"));
        assert!(rendered.contains("magic = \"ERROR\""));
        assert_eq!(Config::from_toml(&rendered)?, config);

        Ok(())
    }
}
