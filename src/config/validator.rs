use super::Config;
use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Checks configuration files for fields dirwatch does not understand and
/// configuration values it cannot run with
pub struct ConfigValidator {
    /// Set of valid configuration fields that are recognized by dirwatch
    known_fields: HashSet<String>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "watch",
            "watch.directory",
            "watch.dir",
            "watch.extension",
            "watch.ext",
            "watch.magic",
            "watch.interval_secs",
            "watch.int",
            "watch.follow_symlinks",
            "logging",
            "logging.level",
            "logging.color",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self { known_fields }
    }

    /// Collect warnings for unknown fields in TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML
    pub fn warnings_for(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;

        let mut unknown_fields = Vec::new();
        self.check_table(&parsed, "", &mut unknown_fields);

        Ok(unknown_fields
            .iter()
            .map(|field| {
                format!(
                    "Unknown configuration field: {} {}",
                    field.yellow(),
                    "(ignored)".dimmed()
                )
            })
            .collect())
    }

    /// Validate a configuration file on disk and print warnings about issues
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)?;
        let warnings = self.warnings_for(&content)?;

        if !warnings.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for warning in warnings {
                eprintln!("  {warning}");
            }
            eprintln!();
        }

        Ok(())
    }

    /// Check that configured values can actually be run with
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The marker string is set but empty
    /// - The extension filter is empty
    /// - The poll interval is zero
    pub fn validate(config: &Config) -> Result<()> {
        if config.watch.magic.as_deref() == Some("") {
            anyhow::bail!("Magic string must not be empty");
        }

        if config.watch.extension.is_empty() {
            anyhow::bail!("Extension filter must not be empty");
        }

        if config.watch.interval_secs == 0 {
            anyhow::bail!("Poll interval must be at least 1 second");
        }

        Ok(())
    }

    /// Recursively checks a TOML table for unknown fields
    ///
    /// # Arguments
    ///
    /// * `table` - The TOML value to validate (expected to be a table)
    /// * `prefix` - The current path prefix (e.g., "watch")
    /// * `unknown` - Vector to collect unknown field paths
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        if let toml::Value::Table(map) = table {
            for (key, value) in map {
                let full_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                if !self.known_fields.contains(&full_key) {
                    unknown.push(full_key);
                } else if let toml::Value::Table(_) = value {
                    self.check_table(value, &full_key, unknown);
                }
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
