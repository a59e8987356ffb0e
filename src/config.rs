use crate::error::{Result, UpdaterError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PACKAGE: &str = "pantheon-systems/terminus";
pub const DEFAULT_TOOL_NAME: &str = "terminus";
pub const DEFAULT_COMPOSER: &str = "composer";

/// Which package to manage and how to reach Composer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Composer package name, e.g. `vendor/name`
    pub package: String,
    /// Executable name under `vendor/bin`
    pub tool_name: String,
    /// Composer binary, looked up on `PATH` when not a path
    pub composer: PathBuf,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            composer: PathBuf::from(DEFAULT_COMPOSER),
        }
    }
}

impl UpdaterConfig {
    /// Reads the TOML file when given, otherwise the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| {
            UpdaterError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: UpdaterConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides on top of file values
    pub fn with_overrides(mut self, package: Option<String>, composer: Option<PathBuf>) -> Self {
        if let Some(package) = package {
            self.package = package;
        }
        if let Some(composer) = composer {
            self.composer = composer;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let package = self.package.trim();
        if package.is_empty() || package.contains(char::is_whitespace) || package.contains(':') {
            return Err(UpdaterError::Config(format!(
                "Invalid package name '{}'",
                self.package
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_file() {
        let config = UpdaterConfig::load(None).unwrap();
        assert_eq!(config, UpdaterConfig::default());
        assert_eq!(config.package, "pantheon-systems/terminus");
    }

    #[test]
    fn file_values_fill_missing_keys_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("updater.toml");
        fs::write(&path, "package = \"acme/tool\"\ntool_name = \"tool\"\n").unwrap();

        let config = UpdaterConfig::load(Some(&path)).unwrap();
        assert_eq!(config.package, "acme/tool");
        assert_eq!(config.tool_name, "tool");
        assert_eq!(config.composer, PathBuf::from("composer"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("updater.toml");
        fs::write(&path, "pakage = \"typo\"\n").unwrap();

        let err = UpdaterConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, UpdaterError::Toml(_)));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = UpdaterConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = UpdaterConfig::default()
            .with_overrides(Some("acme/tool".into()), Some(PathBuf::from("/usr/bin/composer")));
        assert_eq!(config.package, "acme/tool");
        assert_eq!(config.composer, PathBuf::from("/usr/bin/composer"));
        assert_eq!(config.tool_name, "terminus");
    }

    #[test]
    fn package_with_constraint_is_invalid() {
        let config = UpdaterConfig::default().with_overrides(Some("acme/tool:^1".into()), None);
        assert!(config.validate().is_err());
    }
}
