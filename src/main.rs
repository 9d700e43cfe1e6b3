//! `asset-order` CLI - resolve front-end asset load order from an ordering manifest

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use asset_order::cli::{
  ManifestInput, OutputFormat, check_report, ensure_resolved, render_resolution,
  report_failures, retain_categories,
};
use asset_order::{Category, resolve_manifest};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "asset-order")]
#[command(about = "Resolve load order for library, script and stylesheet assets", long_about = None)]
#[command(version)]
struct Cli {
  /// Enable debug logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve and print the load order
  Resolve {
    #[command(flatten)]
    input: InputArgs,

    /// Only resolve these categories
    #[arg(long = "category", value_enum)]
    categories: Vec<Category>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
  },

  /// Validate the manifest without printing the order
  Check {
    #[command(flatten)]
    input: InputArgs,
  },
}

#[derive(clap::Args)]
struct InputArgs {
  /// Path to the ordering manifest JSON
  manifest: PathBuf,

  /// Asset root containing the category directories (defaults to the manifest directory)
  #[arg(long)]
  root: Option<PathBuf>,

  /// Do not append assets found on disk that the manifest does not list
  #[arg(long)]
  no_discover: bool,
}

impl From<InputArgs> for ManifestInput {
  fn from(args: InputArgs) -> Self {
    Self {
      manifest: args.manifest,
      root: args.root,
      discover: !args.no_discover,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
    .init();

  match cli.command {
    Commands::Resolve {
      input,
      categories,
      format,
      output,
    } => {
      let mut manifest = ManifestInput::from(input).prepare()?;
      retain_categories(&mut manifest, &categories);

      let resolution = resolve_manifest(&manifest);
      let rendered = render_resolution(&resolution, format)?;
      match output {
        Some(path) => {
          fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
          info!("wrote load order to {}", path.display());
        }
        None => print!("{rendered}"),
      }

      report_failures(&resolution)
    }
    Commands::Check { input } => {
      let manifest = ManifestInput::from(input).prepare()?;
      let resolution = resolve_manifest(&manifest);
      print!("{}", check_report(&resolution));
      ensure_resolved(&resolution)
    }
  }
}
