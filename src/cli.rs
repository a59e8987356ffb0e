use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "terminus-updater",
    about = "Checks a Composer-installed Terminus and updates it",
    version
)]
pub struct Cli {
    /// The directory in which to find Terminus (defaults to current directory)
    #[arg(long = "install-dir", visible_alias = "dir", default_value = ".", global = true)]
    pub install_dir: PathBuf,

    /// TOML file overriding the package, tool name or Composer binary
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Composer package to manage
    #[arg(long, global = true)]
    pub package: Option<String>,

    /// Composer executable to run
    #[arg(long, value_name = "BINARY", global = true)]
    pub composer: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Updates Terminus via Composer
    Update {
        /// Accept an upgrade across major versions without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Report installed and latest versions without changing anything
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}
