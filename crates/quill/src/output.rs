use anyhow::Result;
use scribe::Record;

use crate::upload::{Operation, UploadOutcome};

/// `key: value` lines for an upload, in a stable order for scripts to grep
pub fn outcome_lines(outcome: &UploadOutcome) -> Vec<String> {
  let operation = match outcome.operation {
    Operation::Create => "create",
    Operation::Update => "update",
  };

  vec![
    format!("operation: {operation}"),
    format!("uri: {}", outcome.uri),
    format!("cid: {}", outcome.cid),
    format!("rkey: {}", outcome.rkey),
  ]
}

pub fn print_outcome(outcome: &UploadOutcome, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string(outcome)?);
  } else {
    for line in outcome_lines(outcome) {
      println!("{line}");
    }
  }
  Ok(())
}

pub fn print_record(record: &Record, json: bool) -> Result<()> {
  // Compact for machines, indented for people
  let rendered =
    if json { serde_json::to_string(record)? } else { serde_json::to_string_pretty(record)? };
  println!("{rendered}");
  Ok(())
}
