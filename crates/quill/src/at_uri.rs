use std::fmt;
use std::str::FromStr;

use crate::error::QuillError;

const SCHEME: &str = "at://";

/// `at://<authority>/<collection>/<rkey>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtUri {
  pub authority: String,
  pub collection: String,
  pub rkey: String,
}

impl AtUri {
  pub fn new(
    authority: impl Into<String>,
    collection: impl Into<String>,
    rkey: impl Into<String>,
  ) -> Self {
    Self { authority: authority.into(), collection: collection.into(), rkey: rkey.into() }
  }
}

impl FromStr for AtUri {
  type Err = QuillError;

  fn from_str(uri: &str) -> Result<Self, Self::Err> {
    let rest = uri
      .strip_prefix(SCHEME)
      .ok_or_else(|| QuillError::invalid_uri(uri, "expected the at:// scheme"))?;

    // Query and fragment aren't part of a record address
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let parts: Vec<&str> = rest.split('/').collect();
    match parts.as_slice() {
      [authority, collection, rkey]
        if !authority.is_empty() && !collection.is_empty() && !rkey.is_empty() =>
      {
        Ok(Self::new(*authority, *collection, *rkey))
      }
      _ => Err(QuillError::invalid_uri(uri, "expected at://<authority>/<collection>/<rkey>")),
    }
  }
}

impl fmt::Display for AtUri {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{SCHEME}{}/{}/{}", self.authority, self.collection, self.rkey)
  }
}
