//! XRPC client for the handful of AT Protocol endpoints quill needs
//!
//! Session login plus record fetch / create / put against a PDS. Anything the
//! workflow needs from the server goes through [`RecordStore`], so the upload
//! logic can be exercised against an in-memory store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use scribe::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::at_uri::AtUri;
use crate::auth::{Credentials, Session};
use crate::error::{QuillError, Result};

pub const CREATE_SESSION: &str = "com.atproto.server.createSession";
pub const GET_RECORD: &str = "com.atproto.repo.getRecord";
pub const CREATE_RECORD: &str = "com.atproto.repo.createRecord";
pub const PUT_RECORD: &str = "com.atproto.repo.putRecord";

pub const DEFAULT_SERVICE: &str = "https://bsky.social";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Result of `createRecord`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedRecord {
  pub uri: String,
  pub cid: String,
  /// The key the server generated, taken from the last segment of `uri`
  pub rkey: String,
}

/// Result of `putRecord`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenRecord {
  pub uri: String,
  pub cid: String,
}

/// The repository operations the upload workflow depends on
#[async_trait]
pub trait RecordStore: Send + Sync {
  /// Fetch a record by key. `Ok(None)` when the server says it doesn't exist.
  async fn get_record(&self, repo: &str, collection: &str, rkey: &str) -> Result<Option<Record>>;

  /// Create a record under a server-generated key
  async fn create_record(
    &self,
    repo: &str,
    collection: &str,
    record: &Record,
  ) -> Result<CreatedRecord>;

  /// Create or replace the record stored under `rkey`
  async fn put_record(
    &self,
    repo: &str,
    collection: &str,
    rkey: &str,
    record: &Record,
  ) -> Result<WrittenRecord>;
}

/// Configuration for the XRPC client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// PDS base URL (e.g. "https://bsky.social")
  pub service: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { service: DEFAULT_SERVICE.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
  }
}

#[derive(Debug, Deserialize)]
struct XrpcErrorBody {
  error: Option<String>,
  message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetRecordOutput {
  value: Value,
}

#[derive(Serialize)]
struct CreateRecordInput<'a> {
  repo: &'a str,
  collection: &'a str,
  record: &'a Record,
}

#[derive(Serialize)]
struct PutRecordInput<'a> {
  repo: &'a str,
  collection: &'a str,
  rkey: &'a str,
  record: &'a Record,
}

pub struct XrpcClient {
  client: Client,
  base_url: Url,
  timeout_secs: u64,
  session: Option<Session>,
}

impl XrpcClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let base_url = Url::parse(&config.service)
      .map_err(|e| QuillError::invalid_config("service", format!("{}: {e}", config.service)))?;
    if !matches!(base_url.scheme(), "http" | "https") {
      return Err(QuillError::invalid_config(
        "service",
        format!("{} must be an http(s) URL", config.service),
      ));
    }

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| QuillError::http("client setup", e))?;

    Ok(Self { client, base_url, timeout_secs: config.timeout_secs, session: None })
  }

  pub fn session(&self) -> Option<&Session> {
    self.session.as_ref()
  }

  /// Log in with an identifier and app password. Later calls send the access token.
  pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session> {
    tracing::debug!(identifier = %credentials.identifier, "creating session");

    let request = self.client.post(self.endpoint(CREATE_SESSION)).json(credentials);
    let response = match self.send(CREATE_SESSION, request).await {
      Ok(response) => response,
      Err(QuillError::Xrpc { status, error, message, .. }) => {
        let reason = message.or(error).unwrap_or_else(|| format!("HTTP {status}"));
        return Err(QuillError::auth(&credentials.identifier, reason));
      }
      Err(e) => return Err(e),
    };

    let session: Session = parse_json(CREATE_SESSION, response).await?;
    tracing::debug!(did = %session.did, handle = %session.handle, "session created");
    Ok(&*self.session.insert(session))
  }

  fn endpoint(&self, nsid: &str) -> String {
    format!("{}/xrpc/{}", self.base_url.as_str().trim_end_matches('/'), nsid)
  }

  async fn send(&self, method: &str, request: RequestBuilder) -> Result<Response> {
    let request = match &self.session {
      Some(session) => request.header(reqwest::header::AUTHORIZATION, session.bearer()),
      None => request,
    };

    let response = timeout(Duration::from_secs(self.timeout_secs), request.send())
      .await
      .map_err(|_| QuillError::timeout(method, self.timeout_secs))?
      .map_err(|e| {
        if e.is_timeout() {
          QuillError::timeout(method, self.timeout_secs)
        } else {
          QuillError::http(method, e)
        }
      })?;

    let status = response.status();
    tracing::debug!(method, status = status.as_u16(), "xrpc response");

    if status.is_success() {
      return Ok(response);
    }

    // Error bodies are optional and not always JSON
    let body = response.text().await.unwrap_or_default();
    let details = serde_json::from_str::<XrpcErrorBody>(&body)
      .unwrap_or(XrpcErrorBody { error: None, message: None });

    Err(QuillError::Xrpc {
      method: method.to_string(),
      status: status.as_u16(),
      error: details.error,
      message: details.message,
    })
  }
}

#[async_trait]
impl RecordStore for XrpcClient {
  async fn get_record(&self, repo: &str, collection: &str, rkey: &str) -> Result<Option<Record>> {
    let request = self.client.get(self.endpoint(GET_RECORD)).query(&[
      ("repo", repo),
      ("collection", collection),
      ("rkey", rkey),
    ]);

    let response = match self.send(GET_RECORD, request).await {
      Ok(response) => response,
      Err(e) if is_not_found(&e) => {
        tracing::debug!(repo, collection, rkey, "record not found");
        return Ok(None);
      }
      Err(e) => return Err(e),
    };

    let output: GetRecordOutput = parse_json(GET_RECORD, response).await?;
    let record = Record::from_value(output.value)
      .map_err(|e| QuillError::invalid_response(GET_RECORD, e.to_string()))?;
    Ok(Some(record))
  }

  async fn create_record(
    &self,
    repo: &str,
    collection: &str,
    record: &Record,
  ) -> Result<CreatedRecord> {
    let input = CreateRecordInput { repo, collection, record };
    let request = self.client.post(self.endpoint(CREATE_RECORD)).json(&input);
    let response = self.send(CREATE_RECORD, request).await?;

    let written: WrittenRecord = parse_json(CREATE_RECORD, response).await?;
    let uri: AtUri = written.uri.parse()?;
    Ok(CreatedRecord { uri: written.uri, cid: written.cid, rkey: uri.rkey })
  }

  async fn put_record(
    &self,
    repo: &str,
    collection: &str,
    rkey: &str,
    record: &Record,
  ) -> Result<WrittenRecord> {
    let input = PutRecordInput { repo, collection, rkey, record };
    let request = self.client.post(self.endpoint(PUT_RECORD)).json(&input);
    let response = self.send(PUT_RECORD, request).await?;

    parse_json(PUT_RECORD, response).await
  }
}

fn is_not_found(error: &QuillError) -> bool {
  match error {
    QuillError::Xrpc { status, error, .. } => {
      *status == StatusCode::NOT_FOUND.as_u16() || error.as_deref() == Some("RecordNotFound")
    }
    _ => false,
  }
}

async fn parse_json<T: serde::de::DeserializeOwned>(method: &str, response: Response) -> Result<T> {
  let body = response.text().await.map_err(|e| QuillError::http(method, e))?;
  serde_json::from_str(&body).map_err(|e| QuillError::invalid_response(method, e.to_string()))
}
