//! Command-line interface definitions.

use crate::config::SourceLayout;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Asset pipeline: Sass and JavaScript to content-hashed files plus a manifest
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitepipe.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "sitepipe.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands (default: watch)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the stylesheet once
    #[command(name = "build-css")]
    BuildCss {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build the script bundle once
    #[command(name = "build-js")]
    BuildJs {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Remove output directories and the manifest
    #[command(visible_alias = "c")]
    Clean,

    /// Build everything, then rebuild on changes (default)
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build everything once and exit (for CI)
    #[command(visible_alias = "d")]
    Deploy {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

/// Shared build arguments, overriding `[build]` in the config file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Minify CSS and the JS bundle
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Embed content hashes in output file names
    #[arg(short = 'H', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub hashing: Option<bool>,

    /// Source directory layout
    #[arg(short = 'L', long, value_enum)]
    pub layout: Option<SourceLayout>,
}

impl Cli {
    /// The command to run; no subcommand means watch.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Watch {
            build_args: BuildArgs::default(),
        })
    }

    /// Build overrides of the invoked command, if it takes any.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match self.command.as_ref()? {
            Commands::BuildCss { build_args }
            | Commands::BuildJs { build_args }
            | Commands::Watch { build_args }
            | Commands::Deploy { build_args } => Some(build_args),
            Commands::Clean => None,
        }
    }
}
