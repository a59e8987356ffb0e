use crate::agents::composer_execution::{Invocation, PackageManager};
use crate::agents::outdated_parser::OutdatedParser;
use crate::error::Result;
use crate::package::{PackageLocation, UpdateClassification, VersionComparator};
use serde::Serialize;
use std::io::Write;

/// Installed and latest versions as Composer reports them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    pub installed: String,
    pub latest: String,
}

/// Which package-manager call an update run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Already current, nothing was run
    None,
    /// `update <package>` within the current constraint
    MinorUpdate { major_declined: bool },
    /// `require <package>:<constraint>`
    LatestInstall { constraint: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub classification: UpdateClassification,
    pub action: UpdateAction,
    pub exit_code: i32,
}

/// Checks a Composer-installed package and drives its update
pub struct UpdateOrchestrator<P: PackageManager> {
    client: P,
    location: PackageLocation,
    package: String,
    versions: Option<VersionRecord>,
}

impl<P: PackageManager> UpdateOrchestrator<P> {
    pub fn new(client: P, location: PackageLocation, package: impl Into<String>) -> Self {
        Self {
            client,
            location,
            package: package.into(),
            versions: None,
        }
    }

    pub fn location(&self) -> &PackageLocation {
        &self.location
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Queries Composer once per orchestrator; later calls reuse the first answer.
    pub fn fetch_versions(&mut self) -> Result<&VersionRecord> {
        let record = match self.versions.take() {
            Some(record) => {
                tracing::debug!("Reusing cached version information for {}", self.package);
                record
            }
            None => self.query_versions()?,
        };

        Ok(&*self.versions.insert(record))
    }

    pub fn check_status(&mut self) -> Result<UpdateClassification> {
        let record = self.fetch_versions()?;
        let classification = VersionComparator::classify(&record.installed, &record.latest);
        tracing::debug!(
            "{} -> {}: {}",
            record.installed,
            record.latest,
            classification
        );
        Ok(classification)
    }

    /// Non-breaking update inside the package's existing constraint
    pub fn apply_minor_update(&self, sink: &mut dyn Write) -> Result<i32> {
        let invocation = Invocation::update(&self.package, self.location.install_dir());
        self.client.run(&invocation, sink)
    }

    /// Requires the latest release with a caret constraint, crossing major versions
    pub fn apply_latest_install(&mut self, sink: &mut dyn Write) -> Result<i32> {
        let constraint = self.latest_constraint()?;
        let invocation = Invocation::require(
            &self.package,
            Some(&constraint),
            self.location.install_dir(),
        );
        self.client.run(&invocation, sink)
    }

    /// Runs the whole check-then-update sequence.
    ///
    /// `confirm_major` is only consulted when the latest release is on a newer major
    /// version; declining falls back to a non-breaking update. The exit status of
    /// whichever command ran is returned as-is.
    pub fn run<F>(&mut self, mut confirm_major: F, sink: &mut dyn Write) -> Result<UpdateOutcome>
    where
        F: FnMut(&VersionRecord) -> Result<bool>,
    {
        writeln!(sink, "Checking package version...")?;
        let classification = self.check_status()?;

        let action = match classification {
            UpdateClassification::UpToDate => {
                writeln!(
                    sink,
                    "{} does not require updating in this location",
                    self.package
                )?;
                return Ok(UpdateOutcome {
                    classification,
                    action: UpdateAction::None,
                    exit_code: 0,
                });
            }
            UpdateClassification::MinorOrPatchUpdate => {
                writeln!(sink, "Updating {}...", self.package)?;
                UpdateAction::MinorUpdate {
                    major_declined: false,
                }
            }
            UpdateClassification::MajorUpdate => {
                let record = self.fetch_versions()?.clone();
                if confirm_major(&record)? {
                    writeln!(sink, "Updating {} to latest version...", self.package)?;
                    UpdateAction::LatestInstall {
                        constraint: self.latest_constraint()?,
                    }
                } else {
                    writeln!(sink, "Performing non-breaking updates...")?;
                    UpdateAction::MinorUpdate {
                        major_declined: true,
                    }
                }
            }
        };

        let exit_code = match &action {
            UpdateAction::LatestInstall { .. } => self.apply_latest_install(sink)?,
            _ => self.apply_minor_update(sink)?,
        };

        if exit_code != 0 {
            tracing::warn!("Package manager exited with status {}", exit_code);
        }

        Ok(UpdateOutcome {
            classification,
            action,
            exit_code,
        })
    }

    fn latest_constraint(&mut self) -> Result<String> {
        Ok(format!("^{}", self.fetch_versions()?.latest))
    }

    fn query_versions(&self) -> Result<VersionRecord> {
        let invocation = Invocation::outdated(&self.package, self.location.install_dir());
        let mut buffer = Vec::new();
        let status = self.client.run(&invocation, &mut buffer)?;
        if status != 0 {
            tracing::debug!("outdated query exited with status {}", status);
        }

        let output = String::from_utf8_lossy(&buffer);
        let report = OutdatedParser::parse(&output);
        if report.is_empty() {
            tracing::debug!("No fields found in outdated output for {}", self.package);
        }

        Ok(VersionRecord {
            installed: OutdatedParser::installed_version(&report, &self.package)?,
            latest: OutdatedParser::latest_version(&report, &self.package)?,
        })
    }
}
