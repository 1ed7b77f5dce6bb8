use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TYPE_FIELD: &str = "$type";
pub const CONTENT_FIELD: &str = "content";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const TITLE_FIELD: &str = "title";
pub const VISIBILITY_FIELD: &str = "visibility";

#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
  #[error("Record must be a JSON object, got {kind}")]
  NotAnObject { kind: String },

  #[error("Unknown visibility '{value}' (expected public, url or author)")]
  UnknownVisibility { value: String },
}

/// A single repository record: an ordered map of JSON fields.
///
/// Field order is preserved so a pass-through record goes out exactly as it
/// was written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
  pub fn new() -> Self {
    Self(Map::new())
  }

  pub fn from_map(map: Map<String, Value>) -> Self {
    Self(map)
  }

  /// Wrap a JSON value, rejecting anything that isn't an object
  pub fn from_value(value: Value) -> Result<Self, RecordError> {
    match value {
      Value::Object(map) => Ok(Self(map)),
      other => Err(RecordError::NotAnObject { kind: value_kind(&other).to_string() }),
    }
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.0.insert(key.into(), value.into());
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &String> {
    self.0.keys()
  }

  /// The `$type` field, when it is a string
  pub fn record_type(&self) -> Option<&str> {
    self.get_str(TYPE_FIELD)
  }

  pub fn content(&self) -> Option<&str> {
    self.get_str(CONTENT_FIELD)
  }

  pub fn created_at(&self) -> Option<&str> {
    self.get_str(CREATED_AT_FIELD)
  }

  pub fn title(&self) -> Option<&str> {
    self.get_str(TITLE_FIELD)
  }

  pub fn visibility(&self) -> Option<&str> {
    self.get_str(VISIBILITY_FIELD)
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn into_map(self) -> Map<String, Value> {
    self.0
  }

  pub fn into_value(self) -> Value {
    Value::Object(self.0)
  }

  fn get_str(&self, key: &str) -> Option<&str> {
    self.0.get(key).and_then(Value::as_str)
  }
}

impl From<Map<String, Value>> for Record {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

impl From<Record> for Value {
  fn from(record: Record) -> Self {
    record.into_value()
  }
}

impl TryFrom<Value> for Record {
  type Error = RecordError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    Self::from_value(value)
  }
}

/// Who can see a WhiteWind blog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
  #[default]
  Public,
  Url,
  Author,
}

impl Visibility {
  pub fn as_str(&self) -> &'static str {
    match self {
      Visibility::Public => "public",
      Visibility::Url => "url",
      Visibility::Author => "author",
    }
  }
}

impl fmt::Display for Visibility {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Visibility {
  type Err = RecordError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "public" => Ok(Visibility::Public),
      "url" => Ok(Visibility::Url),
      "author" => Ok(Visibility::Author),
      other => Err(RecordError::UnknownVisibility { value: other.to_string() }),
    }
  }
}

/// JavaScript-style truthiness for JSON values.
///
/// `null`, `false`, `0` and `""` are falsy. Everything else, including empty
/// arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
