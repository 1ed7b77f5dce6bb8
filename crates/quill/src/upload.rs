//! Upload workflow: read the file, fetch the stored record when updating,
//! build the new record and write it.

use scribe::Record;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::client::RecordStore;
use crate::error::{QuillError, Result};
use crate::logging;

/// How the caller wants the record written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Update when a key is given, create otherwise
  Auto,
  Create,
  Update,
}

/// What actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
  Create,
  Update,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
  pub repo: String,
  pub collection: String,
  pub rkey: Option<String>,
  pub file: PathBuf,
  pub force_override: bool,
  pub mode: Mode,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
  pub operation: Operation,
  pub uri: String,
  pub cid: String,
  pub rkey: String,
  pub record: Record,
}

/// Decide between create and update. Fails only for an update without a key.
pub fn resolve_operation(mode: Mode, rkey: Option<&str>) -> Result<(Operation, Option<&str>)> {
  match (mode, rkey) {
    (Mode::Auto, Some(rkey)) | (Mode::Update, Some(rkey)) => Ok((Operation::Update, Some(rkey))),
    (Mode::Auto, None) => Ok((Operation::Create, None)),
    (Mode::Create, Some(rkey)) => {
      logging::warn(&format!("Ignoring record key '{rkey}': create always generates a new key"));
      Ok((Operation::Create, None))
    }
    (Mode::Create, None) => Ok((Operation::Create, None)),
    (Mode::Update, None) => Err(QuillError::MissingRecordKey),
  }
}

pub async fn read_content(path: &Path) -> Result<String> {
  tokio::fs::read_to_string(path).await.map_err(|e| QuillError::file_read(path, e))
}

pub async fn upload(store: &dyn RecordStore, request: &UploadRequest) -> Result<UploadOutcome> {
  let (operation, rkey) = resolve_operation(request.mode, request.rkey.as_deref())?;
  let content = read_content(&request.file).await?;
  tracing::debug!(file = %request.file.display(), bytes = content.len(), "read content");

  match (operation, rkey) {
    (Operation::Update, Some(rkey)) => {
      let previous = fetch_previous(store, request, rkey).await;
      let record =
        scribe::build(&request.collection, &content, previous.as_ref(), request.force_override);

      let written = store.put_record(&request.repo, &request.collection, rkey, &record).await?;
      Ok(UploadOutcome {
        operation,
        uri: written.uri,
        cid: written.cid,
        rkey: rkey.to_string(),
        record,
      })
    }
    _ => {
      let record = scribe::build(&request.collection, &content, None, request.force_override);

      let created = store.create_record(&request.repo, &request.collection, &record).await?;
      Ok(UploadOutcome {
        operation: Operation::Create,
        uri: created.uri,
        cid: created.cid,
        rkey: created.rkey,
        record,
      })
    }
  }
}

// A failed fetch downgrades to "no previous record" rather than aborting the update
async fn fetch_previous(
  store: &dyn RecordStore,
  request: &UploadRequest,
  rkey: &str,
) -> Option<Record> {
  match store.get_record(&request.repo, &request.collection, rkey).await {
    Ok(Some(record)) => {
      tracing::debug!(rkey, "found existing record");
      Some(record)
    }
    Ok(None) => {
      logging::info(&format!("No existing record at {rkey}, it will be created"));
      None
    }
    Err(e) => {
      logging::warn(&format!("Could not fetch existing record {rkey}: {e}"));
      None
    }
  }
}
