//! Scribe - turns raw file content into AT Protocol records
//!
//! ## Rules
//!
//! - Content that is already a JSON object with a string `$type` is used as-is
//! - `com.whtwnd.blog.entry` records keep their `title` and `visibility` across
//!   updates unless an override is requested
//! - Everything else becomes `{ $type, content, createdAt }`
//!
//! The builder never fails. Anything that doesn't parse as a typed JSON object
//! simply falls through to the next rule.

pub mod builder;
pub mod record;

pub use builder::{build, build_at, extract_title, BLOG_ENTRY_TYPE};
pub use record::{is_truthy, Record, RecordError, Visibility};
