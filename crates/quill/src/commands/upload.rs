use anyhow::{Context, Result};

use crate::client::XrpcClient;
use crate::config::{UploadArgs, UploadConfig};
use crate::error::QuillError;
use crate::logging;
use crate::output;
use crate::upload::{upload, Mode, Operation, UploadRequest};

pub async fn handle(args: UploadArgs, mode: Mode, json: bool) -> Result<()> {
  let config = UploadConfig::from_args(args)?;
  if mode == Mode::Update && config.rkey.is_none() {
    return Err(QuillError::MissingRecordKey.into());
  }

  let mut client = XrpcClient::new(config.client.clone())?;
  logging::info(&format!(
    "Logging in to {} as {}",
    config.client.service, config.credentials.identifier
  ));
  let session = client.login(&config.credentials).await?;

  let repo = config.repo.clone().unwrap_or_else(|| session.did.clone());
  let request = UploadRequest {
    repo,
    collection: config.collection,
    rkey: config.rkey,
    file: config.file,
    force_override: config.force_override,
    mode,
  };

  logging::info(&format!("Uploading {} to {}", request.file.display(), request.collection));
  let outcome = upload(&client, &request)
    .await
    .with_context(|| format!("failed to upload {}", request.file.display()))?;

  match outcome.operation {
    Operation::Create => logging::success(&format!("Created {}", outcome.uri)),
    Operation::Update => logging::success(&format!("Updated {}", outcome.uri)),
  }

  output::print_outcome(&outcome, json)
}
