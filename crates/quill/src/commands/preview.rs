use anyhow::{Context, Result};
use scribe::Record;
use std::path::Path;

use crate::config::RecordArgs;
use crate::output;
use crate::upload::read_content;

/// Build the record locally and print it. Nothing is sent anywhere.
pub async fn handle(record: RecordArgs, previous: Option<&Path>, json: bool) -> Result<()> {
  let collection = record.collection()?;
  let file = record.file()?;

  let content = read_content(&file).await?;
  let previous = match previous {
    Some(path) => Some(load_previous(path).await?),
    None => None,
  };

  let built = scribe::build(&collection, &content, previous.as_ref(), record.force_override);
  output::print_record(&built, json)
}

async fn load_previous(path: &Path) -> Result<Record> {
  let raw = read_content(path).await?;
  let value: serde_json::Value = serde_json::from_str(&raw)
    .with_context(|| format!("previous record {} is not valid JSON", path.display()))?;
  Record::from_value(value)
    .with_context(|| format!("previous record {} must be a JSON object", path.display()))
}
