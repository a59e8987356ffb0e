mod agents;
mod cli;
mod config;
mod error;
mod package;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use config::UpdaterConfig;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = UpdaterConfig::load(cli.config.as_deref())
        .map(|config| config.with_overrides(cli.package, cli.composer))
        .and_then(|config| match cli.command {
            Commands::Update { yes } => workflow::execute_update(&cli.install_dir, &config, yes),
            Commands::Check { json } => workflow::execute_check(&cli.install_dir, &config, json),
        });

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
