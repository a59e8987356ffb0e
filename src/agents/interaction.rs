use crate::agents::update_orchestrator::VersionRecord;
use crate::error::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Asks the user before an upgrade that crosses a major version
///
/// With `assume_yes` set, the upgrade is accepted without prompting. Empty input or
/// end of input declines, since a major upgrade may break existing scripts.
pub struct MajorUpgradePrompt {
    assume_yes: bool,
}

impl MajorUpgradePrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    /// Prompt on the terminal
    pub fn confirm(&mut self, record: &VersionRecord) -> Result<bool> {
        let stdin = io::stdin();
        self.confirm_with(record, &mut stdin.lock(), &mut io::stdout())
    }

    pub fn confirm_with<R: BufRead, W: Write>(
        &mut self,
        record: &VersionRecord,
        input: &mut R,
        output: &mut W,
    ) -> Result<bool> {
        writeln!(
            output,
            "\n{} {} {} {}",
            "[Major]".cyan().bold(),
            record.installed.red(),
            "->".dimmed(),
            record.latest.green().bold()
        )?;

        if self.assume_yes {
            writeln!(output, "{}", "Auto-accepting major upgrade (--yes).".dimmed())?;
            return Ok(true);
        }

        writeln!(
            output,
            "{}",
            "You are behind by at least one major version! Upgrading may break your scripts."
                .yellow()
                .bold()
        )?;

        loop {
            write!(output, "{}", "Continue? (y/N) ".bold())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(false);
            }

            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => {
                    writeln!(output, "{}", "Please answer with y(es) or n(o).".red())?;
                }
            }
        }
    }
}
