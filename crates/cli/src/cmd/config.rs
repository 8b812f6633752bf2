//! Implementation of the `slsprisma config` command.
//!
//! Prints the packaging configuration after defaults are applied.

use anyhow::Result;

use super::{ServiceArgs, load_service};
use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_config(args: &ServiceArgs, format: OutputFormat) -> Result<()> {
  let (config, _) = load_service(args)?;

  if format.is_json() {
    return print_json(&config);
  }

  let ignore = if config.ignore_functions.is_empty() {
    "-".to_string()
  } else {
    config.ignore_functions.join(", ")
  };

  println!("Configuration:");
  print_stat("Package manager", config.package_manager.as_str());
  print_stat("Schema source", &config.schema_source().display().to_string());
  print_stat("Output root", &config.output_path.display().to_string());
  print_stat("Install deps", &config.install_deps.to_string());
  print_stat("Use symlink", &config.use_symlink.to_string());
  print_stat("Ignore functions", &ignore);
  print_stat("Data proxy", &config.data_proxy.to_string());
  println!("Engine patterns:");
  for pattern in config.engine_patterns.patterns() {
    println!("  {}", pattern);
  }

  Ok(())
}
