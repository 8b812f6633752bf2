mod config;
mod pack;
mod plan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use slsprisma_lib::consts::MANIFEST_FILENAME;
use slsprisma_lib::{Config, ServiceManifest};

pub use config::cmd_config;
pub use pack::cmd_pack;
pub use plan::cmd_plan;

/// Where to find the service being packaged.
#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
  /// Service root directory (defaults to the current directory)
  #[arg(short = 'C', long, default_value = ".")]
  pub service_dir: PathBuf,

  /// Path to the service manifest (default: <service-dir>/serverless.yml)
  #[arg(short, long)]
  pub config: Option<PathBuf>,
}

/// Load the manifest and resolve the packaging configuration.
pub fn load_service(args: &ServiceArgs) -> Result<(Config, ServiceManifest)> {
  let service_dir = dunce::canonicalize(&args.service_dir)
    .with_context(|| format!("Service directory not found: {}", args.service_dir.display()))?;

  let manifest_path = args
    .config
    .clone()
    .unwrap_or_else(|| service_dir.join(MANIFEST_FILENAME));

  let manifest = ServiceManifest::load(&manifest_path)
    .with_context(|| format!("Failed to load service manifest: {}", manifest_path.display()))?;
  let config = Config::from_settings(&manifest.custom, &service_dir).context("Invalid packaging settings")?;

  Ok((config, manifest))
}
