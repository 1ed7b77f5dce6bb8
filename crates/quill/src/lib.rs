//! Quill - upload a local file as an AT Protocol record
//!
//! Logs in to a PDS, builds the record with [`scribe`] and writes it with
//! `createRecord` (no key) or `putRecord` (key given).

pub mod at_uri;
pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod upload;

pub use client::{CreatedRecord, RecordStore, WrittenRecord, XrpcClient};
pub use error::QuillError;
pub use upload::{upload, Mode, Operation, UploadOutcome, UploadRequest};
