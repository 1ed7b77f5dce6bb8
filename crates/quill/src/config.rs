//! Configuration
//!
//! Every setting is a CLI flag with an `ATP_*` environment fallback, so the
//! same binary works from a shell or a CI job that only sets variables.
//! Presence is checked here, before any file is read or request is sent.

use clap::builder::BoolishValueParser;
use clap::Args;
use std::path::PathBuf;

use crate::auth::Credentials;
use crate::client::{ClientConfig, DEFAULT_SERVICE, DEFAULT_TIMEOUT_SECS};
use crate::error::{QuillError, Result};

/// Where to connect and who to log in as
#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
  /// PDS base URL
  #[arg(long, env = "ATP_SERVICE", default_value = DEFAULT_SERVICE)]
  pub service: String,

  /// Handle or DID to log in with
  #[arg(long, env = "ATP_IDENTIFIER")]
  pub identifier: Option<String>,

  /// App password
  #[arg(long, env = "ATP_PASSWORD", hide_env_values = true)]
  pub password: Option<String>,

  /// Repository to write to (defaults to the logged-in account's DID)
  #[arg(long, env = "ATP_REPO")]
  pub repo: Option<String>,

  /// Per-request timeout in seconds
  #[arg(long, env = "ATP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
  pub timeout_secs: u64,
}

/// What to upload
#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
  /// Collection (schema identifier), e.g. com.whtwnd.blog.entry
  #[arg(long, env = "ATP_COLLECTION")]
  pub collection: Option<String>,

  /// File whose content becomes the record
  #[arg(long, env = "ATP_FILE_PATH")]
  pub file: Option<PathBuf>,

  /// Re-derive title and visibility instead of keeping the stored ones
  #[arg(long, env = "ATP_FORCE_OVERRIDE", value_parser = BoolishValueParser::new())]
  pub force_override: bool,
}

/// Arguments shared by `upload`, `create` and `update`
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
  #[command(flatten)]
  pub service: ServiceArgs,

  #[command(flatten)]
  pub record: RecordArgs,

  /// Record key to update; a new key is generated when omitted
  #[arg(long, env = "ATP_RKEY")]
  pub rkey: Option<String>,
}

/// Validated settings for one upload
#[derive(Debug, Clone)]
pub struct UploadConfig {
  pub client: ClientConfig,
  pub credentials: Credentials,
  pub repo: Option<String>,
  pub collection: String,
  pub file: PathBuf,
  pub rkey: Option<String>,
  pub force_override: bool,
}

impl UploadConfig {
  pub fn from_args(args: UploadArgs) -> Result<Self> {
    let UploadArgs { service, record, rkey } = args;

    let service_url = required(Some(service.service), "service", "ATP_SERVICE")?;
    let identifier = required(service.identifier, "identifier", "ATP_IDENTIFIER")?;
    let password = required(service.password, "password", "ATP_PASSWORD")?;
    let collection = record.collection()?;
    let file = record.file()?;

    if service.timeout_secs == 0 {
      return Err(QuillError::invalid_config("timeout_secs", "must be at least 1 second"));
    }

    Ok(Self {
      client: ClientConfig { service: service_url, timeout_secs: service.timeout_secs },
      credentials: Credentials::new(identifier, password),
      repo: non_empty(service.repo),
      collection,
      file,
      rkey: non_empty(rkey),
      force_override: record.force_override,
    })
  }
}

impl RecordArgs {
  pub fn collection(&self) -> Result<String> {
    required(self.collection.clone(), "collection", "ATP_COLLECTION")
  }

  pub fn file(&self) -> Result<PathBuf> {
    self
      .file
      .clone()
      .filter(|path| !path.as_os_str().is_empty())
      .ok_or_else(|| QuillError::missing_config("file", "ATP_FILE_PATH"))
  }
}

fn required(value: Option<String>, name: &'static str, env: &'static str) -> Result<String> {
  non_empty(value).ok_or_else(|| QuillError::missing_config(name, env))
}

/// Blank values count as missing; anything else is kept exactly as given
fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}
