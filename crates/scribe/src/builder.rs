//! Record building and field reconciliation
//!
//! Given the target collection, the new raw content and (for updates) the
//! record currently stored under the same key, decide what goes over the wire.

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::record::{
  is_truthy, Record, Visibility, CONTENT_FIELD, CREATED_AT_FIELD, TITLE_FIELD, TYPE_FIELD,
  VISIBILITY_FIELD,
};

/// The WhiteWind blog entry collection
pub const BLOG_ENTRY_TYPE: &str = "com.whtwnd.blog.entry";

// `#`, any non-newline whitespace (U+3000 and NBSP included), then visible text on the same line
static H1_HEADING: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^#[^\S\r\n]+(\S.*)$").expect("heading pattern is valid"));

/// Build the outgoing record, stamping `createdAt` with the current time.
pub fn build(
  schema_id: &str,
  raw_content: &str,
  previous: Option<&Record>,
  force_override: bool,
) -> Record {
  build_at(schema_id, raw_content, previous, force_override, Utc::now())
}

/// Same as [`build`] with an explicit timestamp.
pub fn build_at(
  schema_id: &str,
  raw_content: &str,
  previous: Option<&Record>,
  force_override: bool,
  now: DateTime<Utc>,
) -> Record {
  if let Some(record) = typed_json_object(raw_content) {
    tracing::debug!(
      record_type = record.record_type().unwrap_or_default(),
      "content is a typed JSON object, passing through"
    );
    return record;
  }

  let mut record = Record::new();
  record.insert(TYPE_FIELD, schema_id);
  record.insert(CONTENT_FIELD, raw_content);
  record.insert(CREATED_AT_FIELD, timestamp(now));

  if schema_id == BLOG_ENTRY_TYPE {
    // Only consult the previous record when we're allowed to keep its fields
    let kept = if force_override { None } else { previous };
    reconcile_blog_fields(&mut record, raw_content, kept);
  }

  record
}

/// Text of the first level-1 markdown heading, trimmed.
///
/// Each line is checked on its own; `## Sub` and `#tag` don't count.
pub fn extract_title(content: &str) -> Option<String> {
  H1_HEADING
    .captures(content)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim().to_string())
    .filter(|title| !title.is_empty())
}

fn typed_json_object(raw_content: &str) -> Option<Record> {
  let value: Value = serde_json::from_str(raw_content).ok()?;
  let record = Record::from_value(value).ok()?;
  record.record_type()?;
  Some(record)
}

fn reconcile_blog_fields(record: &mut Record, raw_content: &str, previous: Option<&Record>) {
  match truthy_field(previous, VISIBILITY_FIELD) {
    Some(visibility) => {
      if let Some(Err(err)) = visibility.as_str().map(str::parse::<Visibility>) {
        tracing::debug!(%err, "keeping stored visibility as is");
      }
      record.insert(VISIBILITY_FIELD, visibility.clone());
    }
    None => record.insert(VISIBILITY_FIELD, Visibility::default().as_str()),
  }

  if let Some(title) = truthy_field(previous, TITLE_FIELD) {
    record.insert(TITLE_FIELD, title.clone());
  } else if let Some(title) = extract_title(raw_content) {
    record.insert(TITLE_FIELD, title);
  }
}

fn truthy_field<'a>(record: Option<&'a Record>, key: &str) -> Option<&'a Value> {
  record?.get(key).filter(|value| is_truthy(value))
}

fn timestamp(now: DateTime<Utc>) -> String {
  now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
