mod app;
mod config;
mod event;
mod jokes;
mod logging;
mod pagination;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dadjokes")]
#[command(about = "A terminal UI for browsing dad jokes from icanhazdadjoke.com")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./dadjokes.yaml or $XDG_CONFIG_HOME/dadjokes/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Page to open first
  #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
  page: u32,

  /// Only show jokes matching this search term
  #[arg(short, long)]
  term: Option<String>,

  /// Write logs to this file instead of the data directory
  #[arg(long)]
  log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init(args.log_file.as_deref())?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override search term if specified on command line
  if let Some(term) = args.term {
    config.api.term = Some(term);
  }

  info!(page = args.page, api = %config.api.base_url, "starting");

  // Initialize and run the app
  let mut app = app::App::new(config, args.page)?;
  app.run().await?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_args_default_page() {
    let args = Args::try_parse_from(["dadjokes"]).unwrap();
    assert_eq!(args.page, 1);
    assert!(args.term.is_none());
  }

  #[test]
  fn test_args_reject_page_zero() {
    assert!(Args::try_parse_from(["dadjokes", "--page", "0"]).is_err());
  }

  #[test]
  fn test_args_term_and_page() {
    let args = Args::try_parse_from(["dadjokes", "-p", "4", "-t", "cat"]).unwrap();
    assert_eq!(args.page, 4);
    assert_eq!(args.term.as_deref(), Some("cat"));
  }
}
