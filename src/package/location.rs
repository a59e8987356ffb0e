use crate::error::{Result, UpdaterError};
use crate::utils::PathSanitizer;
use std::path::{Path, PathBuf};

const EXE_SUBDIR: &str = "vendor/bin";

/// Where a Composer-managed tool lives inside its install directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    install_dir: PathBuf,
    exe_dir: PathBuf,
    exe_name: PathBuf,
}

impl PackageLocation {
    pub fn new<P: AsRef<Path>>(install_dir: P, tool_name: &str) -> Result<Self> {
        if tool_name.is_empty()
            || tool_name == "."
            || tool_name == ".."
            || tool_name.contains(['/', '\\'])
        {
            return Err(UpdaterError::Config(format!(
                "Invalid tool name '{tool_name}'"
            )));
        }

        let install_dir = PathSanitizer::sanitize_location(install_dir)?;
        let exe_dir = PathSanitizer::sanitize_location(install_dir.join(EXE_SUBDIR))?;
        let exe_name = PathSanitizer::sanitize_location(exe_dir.join(tool_name))?;

        Ok(Self {
            install_dir,
            exe_dir,
            exe_name,
        })
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn exe_dir(&self) -> &Path {
        &self.exe_dir
    }

    /// Full path of the tool's executable
    pub fn exe_name(&self) -> &Path {
        &self.exe_name
    }
}
