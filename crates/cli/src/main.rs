mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slsprisma_lib::consts::APP_NAME;

use cmd::ServiceArgs;
use output::{OutputFormat, print_error};

/// Generate Prisma clients inside serverless webpack bundles
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Install, generate and prune in every selected build directory
  Pack {
    #[command(flatten)]
    service: ServiceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show the steps `pack` would run without executing them
  Plan {
    #[command(flatten)]
    service: ServiceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show the resolved packaging configuration
  Config {
    #[command(flatten)]
    service: ServiceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Pack { service, format } => cmd::cmd_pack(&service, format),
    Commands::Plan { service, format } => cmd::cmd_plan(&service, format),
    Commands::Config { service, format } => cmd::cmd_config(&service, format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
