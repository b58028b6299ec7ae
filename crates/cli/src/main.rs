mod cmd;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::cmd_build;

/// occ-build - Rebuild the OpenCascade.js kernel when its configuration changes
#[derive(Parser)]
#[command(name = "occ-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Register exported symbols in the build configuration before checking
  #[arg(long, num_args = 0.., value_name = "SYMBOL")]
  add: Vec<String>,
}

fn main() -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cli = Cli::parse();

  cmd_build(&cli.add)
}
