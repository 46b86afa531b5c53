//! sitepipe - Sass and JavaScript asset pipeline with a content-hash manifest.

mod asset;
mod cli;
mod config;
mod core;
mod hash;
mod logger;
mod manifest;
mod pipeline;
mod utils;
mod watch;

use anyhow::Result;
use asset::AssetKind;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PipelineConfig, init_config};

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(PipelineConfig::load(cli)?);
    debug!("config"; "root {}, layout {}", config.get_root().display(), config.build.layout.label());

    match cli.command() {
        Commands::BuildCss { .. } => cli::build::build_once(&config, &[AssetKind::Css]),
        Commands::BuildJs { .. } => cli::build::build_once(&config, &[AssetKind::Js]),
        Commands::Deploy { .. } => cli::build::build_once(&config, &AssetKind::ALL),
        Commands::Clean => cli::clean::clean(&config),
        Commands::Watch { .. } => watch::run(config),
    }
}
