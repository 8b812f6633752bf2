//! Implementation of the `slsprisma pack` command.
//!
//! This is the hook the host build tool calls once webpack has packed the
//! external modules into the per-function build directories.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use slsprisma_lib::consts::HOOK_EVENT;
use slsprisma_lib::{SystemRunner, run};

use super::{ServiceArgs, load_service};
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_removed, print_stat, print_success};

pub fn cmd_pack(args: &ServiceArgs, format: OutputFormat) -> Result<()> {
  let (config, manifest) = load_service(args)?;
  info!(hook = HOOK_EVENT, service = manifest.service.as_deref().unwrap_or("-"), "running packaging hook");

  let started = Instant::now();
  let report = run(&config, &manifest, &mut SystemRunner).context("Packaging failed")?;

  if format.is_json() {
    return print_json(&report);
  }

  if report.units.is_empty() {
    print_info("No functions to package.");
    return Ok(());
  }

  for unit in &report.units {
    print_success(&format!("Packaged {}", unit.unit));
    print_stat("Build dir", &unit.build_dir.display().to_string());
    if !unit.deleted.is_empty() {
      print_stat("Removed engines", &unit.deleted.len().to_string());
      for path in &unit.deleted {
        print_removed(&path.display().to_string());
      }
    }
  }

  println!();
  print_stat("Units", &report.units.len().to_string());
  print_stat("Engines removed", &report.deleted_count().to_string());
  print_stat("Took", &format_duration(started.elapsed()));

  Ok(())
}
