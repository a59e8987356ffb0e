use crate::agents::{
    ComposerClient, MajorUpgradePrompt, UpdateAction, UpdateOrchestrator, UpdateOutcome,
    VersionRecord,
};
use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::package::{PackageLocation, UpdateClassification};
use crate::utils::PathSanitizer;
use colored::Colorize;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Execute the update workflow and return the package manager's exit status
pub fn execute_update<P: AsRef<Path>>(
    install_dir: P,
    config: &UpdaterConfig,
    assume_yes: bool,
) -> Result<i32> {
    println!("{}", update_header(&config.package).cyan().bold());

    let mut orchestrator = build_orchestrator(install_dir.as_ref(), config)?;
    let mut prompt = MajorUpgradePrompt::new(assume_yes);

    let outcome = orchestrator.run(|record| prompt.confirm(record), &mut io::stdout())?;
    print_update_outcome(&outcome);

    Ok(outcome.exit_code)
}

/// Execute the check workflow (dry-run)
pub fn execute_check<P: AsRef<Path>>(
    install_dir: P,
    config: &UpdaterConfig,
    json: bool,
) -> Result<i32> {
    let mut orchestrator = build_orchestrator(install_dir.as_ref(), config)?;

    if !json {
        println!(
            "{}",
            format!("Checking {} version...", config.package).cyan().bold()
        );
    }

    let classification = orchestrator.check_status()?;
    let record = orchestrator.fetch_versions()?.clone();

    if json {
        let report = CheckReport {
            package: orchestrator.package(),
            install_dir: orchestrator.location().install_dir().display().to_string(),
            bin_dir: orchestrator.location().exe_dir().display().to_string(),
            executable: orchestrator.location().exe_name().display().to_string(),
            versions: &record,
            classification,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_check_result(orchestrator.location(), &record, classification);
    }

    Ok(0)
}

/// Printed before the version is known, so it must not promise an update
fn update_header(package: &str) -> String {
    format!("Starting {package} update process...")
}

#[derive(Serialize)]
struct CheckReport<'a> {
    package: &'a str,
    install_dir: String,
    bin_dir: String,
    executable: String,
    #[serde(flatten)]
    versions: &'a VersionRecord,
    classification: UpdateClassification,
}

fn build_orchestrator(
    install_dir: &Path,
    config: &UpdaterConfig,
) -> Result<UpdateOrchestrator<ComposerClient>> {
    config.validate()?;
    let install_dir = PathSanitizer::validate_install_dir(install_dir)?;
    let location = PackageLocation::new(&install_dir, &config.tool_name)?;
    tracing::debug!("Install directory: {}", location.install_dir().display());

    let client = ComposerClient::new(&config.composer);
    Ok(UpdateOrchestrator::new(
        client,
        location,
        config.package.clone(),
    ))
}

fn print_update_outcome(outcome: &UpdateOutcome) {
    if outcome.action == UpdateAction::None {
        println!("\n{}", "✨ Already up to date!".green().bold());
        return;
    }

    if outcome.exit_code != 0 {
        println!(
            "\n{}",
            format!("✗ Composer exited with status {}", outcome.exit_code)
                .red()
                .bold()
        );
        return;
    }

    match &outcome.action {
        UpdateAction::LatestInstall { constraint } => println!(
            "\n{}",
            format!("✨ Installed latest release ({constraint})").green().bold()
        ),
        UpdateAction::MinorUpdate {
            major_declined: true,
        } => println!(
            "\n{}",
            "✓ Non-breaking updates applied; a newer major version is still available".yellow()
        ),
        _ => println!("\n{}", "✨ Update completed successfully!".green().bold()),
    }
}

fn print_check_result(
    location: &PackageLocation,
    record: &VersionRecord,
    classification: UpdateClassification,
) {
    println!(
        "   {} {}",
        "Executable:".dimmed(),
        location.exe_name().display()
    );
    println!("   {} {}", "Installed:".dimmed(), record.installed.red());
    println!("   {} {}", "Latest:   ".dimmed(), record.latest.green());

    let summary = match classification {
        UpdateClassification::UpToDate => "✨ Up to date".green().bold(),
        UpdateClassification::MinorOrPatchUpdate => {
            "Minor or patch update available".yellow().bold()
        }
        UpdateClassification::MajorUpdate => {
            "Major update available (may break scripts)".red().bold()
        }
    };
    println!("\n{}", summary);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_header_does_not_announce_an_update() {
        let header = update_header("pantheon-systems/terminus");
        assert_eq!(header, "Starting pantheon-systems/terminus update process...");
        assert!(!header.starts_with("Updating"));
    }
}
