use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::config::{RecordArgs, UploadArgs};
use crate::upload::Mode;

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Upload a local file as a record to an AT Protocol repository")]
#[command(version)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Show request-level diagnostics
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Print machine-readable JSON on stdout
  #[arg(long, global = true)]
  pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Update the record at --rkey, or create a new one when no key is given
  Upload(UploadArgs),
  /// Create a new record under a server-generated key
  Create(UploadArgs),
  /// Update the record stored under --rkey
  Update(UploadArgs),
  /// Print the record that would be uploaded, without contacting the server
  Preview {
    #[command(flatten)]
    record: RecordArgs,

    /// JSON file holding the currently stored record, to preview an update
    #[arg(long)]
    previous: Option<PathBuf>,
  },
}

pub async fn run(cli: Cli) -> Result<()> {
  let json = cli.json;

  match cli.command {
    Commands::Upload(args) => commands::upload::handle(args, Mode::Auto, json).await,
    Commands::Create(args) => commands::upload::handle(args, Mode::Create, json).await,
    Commands::Update(args) => commands::upload::handle(args, Mode::Update, json).await,
    Commands::Preview { record, previous } => {
      commands::preview::handle(record, previous.as_deref(), json).await
    }
  }
}
