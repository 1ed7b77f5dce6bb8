use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuillError {
  #[error("Missing required setting '{name}' (pass --{name} or set {env})")]
  MissingConfig { name: &'static str, env: &'static str },

  #[error("Invalid value for '{name}': {message}")]
  InvalidConfig { name: &'static str, message: String },

  #[error("A record key is required to update a record (pass --rkey or set ATP_RKEY)")]
  MissingRecordKey,

  #[error("Failed to read '{}': {source}", .path.display())]
  FileRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Authentication failed for '{identifier}': {message}")]
  Auth { identifier: String, message: String },

  #[error("{method} failed with HTTP {status}: {}", describe_xrpc(.error, .message))]
  Xrpc { method: String, status: u16, error: Option<String>, message: Option<String> },

  #[error("{method} request failed: {source}")]
  Http {
    method: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} timed out after {secs}s")]
  Timeout { method: String, secs: u64 },

  #[error("Invalid AT-URI '{uri}': {message}")]
  InvalidUri { uri: String, message: String },

  #[error("Unexpected response from {method}: {message}")]
  InvalidResponse { method: String, message: String },
}

impl QuillError {
  pub fn missing_config(name: &'static str, env: &'static str) -> Self {
    Self::MissingConfig { name, env }
  }

  pub fn invalid_config(name: &'static str, message: impl Into<String>) -> Self {
    Self::InvalidConfig { name, message: message.into() }
  }

  pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::FileRead { path: path.into(), source }
  }

  pub fn auth(identifier: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Auth { identifier: identifier.into(), message: message.into() }
  }

  pub fn http(method: impl Into<String>, source: reqwest::Error) -> Self {
    Self::Http { method: method.into(), source }
  }

  pub fn timeout(method: impl Into<String>, secs: u64) -> Self {
    Self::Timeout { method: method.into(), secs }
  }

  pub fn invalid_uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidUri { uri: uri.into(), message: message.into() }
  }

  pub fn invalid_response(method: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidResponse { method: method.into(), message: message.into() }
  }

  /// The XRPC error name, when the server sent one
  pub fn xrpc_error_name(&self) -> Option<&str> {
    match self {
      Self::Xrpc { error, .. } => error.as_deref(),
      _ => None,
    }
  }
}

fn describe_xrpc(error: &Option<String>, message: &Option<String>) -> String {
  match (error, message) {
    (Some(error), Some(message)) => format!("{error}: {message}"),
    (Some(error), None) => error.clone(),
    (None, Some(message)) => message.clone(),
    (None, None) => "no error details".to_string(),
  }
}

pub type Result<T> = std::result::Result<T, QuillError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_config_names_setting_and_env() {
    let err = QuillError::missing_config("collection", "ATP_COLLECTION");
    assert_eq!(
      err.to_string(),
      "Missing required setting 'collection' (pass --collection or set ATP_COLLECTION)"
    );
  }

  #[test]
  fn test_xrpc_display_variants() {
    let full = QuillError::Xrpc {
      method: "com.atproto.repo.putRecord".to_string(),
      status: 400,
      error: Some("InvalidRecord".to_string()),
      message: Some("missing content".to_string()),
    };
    assert_eq!(
      full.to_string(),
      "com.atproto.repo.putRecord failed with HTTP 400: InvalidRecord: missing content"
    );
    assert_eq!(full.xrpc_error_name(), Some("InvalidRecord"));

    let bare = QuillError::Xrpc {
      method: "com.atproto.repo.getRecord".to_string(),
      status: 502,
      error: None,
      message: None,
    };
    assert_eq!(
      bare.to_string(),
      "com.atproto.repo.getRecord failed with HTTP 502: no error details"
    );
    assert_eq!(bare.xrpc_error_name(), None);
  }
}
