//! ccbuilder - an incremental build watcher for C-like projects.

mod actor;
mod cache;
mod cli;
mod config;
mod logger;
mod toolchain;
mod utils;
mod watch;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::BuildConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Fatal errors from every layer end up here
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Arc::new(BuildConfig::load(&cli.config)?);

    match cli.command() {
        Commands::Watch => cli::watch::watch(config),
        Commands::Build => cli::build::build(config),
        Commands::Clean { prefix } => cli::clean::clean(&config, prefix.as_deref()),
    }
}
