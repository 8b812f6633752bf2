//! Implementation of the `slsprisma plan` command.
//!
//! Shows which build directories would be processed and every step that
//! would run, without executing anything.

use anyhow::Result;

use slsprisma_lib::plan;
use slsprisma_lib::select::Selection;

use super::{ServiceArgs, load_service};
use crate::output::{OutputFormat, print_info, print_json, symbols};

pub fn cmd_plan(args: &ServiceArgs, format: OutputFormat) -> Result<()> {
  let (config, manifest) = load_service(args)?;
  let plan = plan(&config, &manifest)?;

  if format.is_json() {
    return print_json(&plan);
  }

  match &plan.selection {
    Selection::Service => println!("Mode: service bundle"),
    Selection::Functions(_) => println!("Mode: per-function ({} selected)", plan.units.len()),
  }

  if plan.units.is_empty() {
    print_info("No functions to package.");
    return Ok(());
  }

  for unit in &plan.units {
    println!();
    println!("{} ({})", unit.unit, unit.build_dir.display());
    for step in &unit.steps {
      println!("  {} {}", symbols::ARROW, step);
    }
  }

  Ok(())
}
