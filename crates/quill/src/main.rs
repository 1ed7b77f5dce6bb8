use clap::Parser;
use std::process::ExitCode;

use quill::cli::{run, Cli};
use quill::logging;

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      logging::error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
