use crate::error::{Result, UpdaterError};
use std::path::{Component, Path, PathBuf};

/// Normalizes user-supplied locations before they are handed to Composer.
pub struct PathSanitizer;

impl PathSanitizer {
    /// Expands a leading `~`, anchors relative paths at the current directory and
    /// removes `.`, `..` and redundant separators without touching the filesystem.
    pub fn sanitize_location(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = Self::expand_home(path.as_ref())?;

        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    UpdaterError::InstallDir(format!("Cannot resolve current directory: {e}"))
                })?
                .join(path)
        };

        Ok(Self::normalize(&absolute))
    }

    /// Sanitizes an install directory and requires it to exist as a directory.
    pub fn validate_install_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
        let sanitized = Self::sanitize_location(path)?;

        if !sanitized.is_dir() {
            return Err(UpdaterError::InstallDir(format!(
                "'{}' is not a directory",
                sanitized.display()
            )));
        }

        Ok(sanitized)
    }

    fn expand_home(path: &Path) -> Result<PathBuf> {
        let mut components = path.components();
        match components.next() {
            Some(Component::Normal(first)) if first == "~" => {
                let home = dirs::home_dir().ok_or_else(|| {
                    UpdaterError::InstallDir("Cannot expand '~': no home directory".to_string())
                })?;
                Ok(home.join(components.as_path()))
            }
            _ => Ok(path.to_path_buf()),
        }
    }

    fn normalize(path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();

        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    // `/..` stays at the root
                    if !matches!(
                        normalized.components().next_back(),
                        None | Some(Component::RootDir) | Some(Component::Prefix(_))
                    ) {
                        normalized.pop();
                    }
                }
                other => normalized.push(other.as_os_str()),
            }
        }

        normalized
    }
}
