use serde::{Deserialize, Serialize};
use std::fmt;

/// Login details for `com.atproto.server.createSession`
#[derive(Clone, Serialize)]
pub struct Credentials {
  pub identifier: String,
  pub password: String,
}

impl Credentials {
  pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
    Self { identifier: identifier.into(), password: password.into() }
  }
}

// Keep app passwords out of logs and panic messages
impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("identifier", &self.identifier)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// An authenticated session. Lives only for one run.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub did: String,
  pub handle: String,
  pub access_jwt: String,
  #[serde(default)]
  pub refresh_jwt: Option<String>,
}

impl Session {
  pub fn bearer(&self) -> String {
    format!("Bearer {}", self.access_jwt)
  }
}

impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("did", &self.did)
      .field("handle", &self.handle)
      .field("access_jwt", &"<redacted>")
      .finish()
  }
}
