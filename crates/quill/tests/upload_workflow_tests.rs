
use mock_store::{Call, MockRecordStore};
use quill::{upload, Mode, Operation, QuillError, UploadRequest};
use scribe::{Record, BLOG_ENTRY_TYPE};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const REPO: &str = "did:plc:alice";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, content).unwrap();
  path
}

fn request(collection: &str, file: PathBuf, rkey: Option<&str>, mode: Mode) -> UploadRequest {
  UploadRequest {
    repo: REPO.to_string(),
    collection: collection.to_string(),
    rkey: rkey.map(str::to_string),
    file,
    force_override: false,
    mode,
  }
}

fn stored_blog_entry() -> Record {
  Record::from_value(json!({
    "$type": BLOG_ENTRY_TYPE,
    "content": "# Old\n\nBody",
    "title": "Old Custom",
    "visibility": "author",
    "createdAt": "2023-06-01T00:00:00.000Z"
  }))
  .unwrap()
}

#[tokio::test]
async fn test_create_without_key_uses_generated_key() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "note.txt", "Hello world");
  let store = MockRecordStore::new();

  let outcome =
    upload(&store, &request("com.example.note", file, None, Mode::Auto)).await.unwrap();

  assert_eq!(outcome.operation, Operation::Create);
  assert_eq!(outcome.rkey, "3kgenerated");
  assert_eq!(outcome.uri, "at://did:plc:alice/com.example.note/3kgenerated");
  assert_eq!(outcome.cid, "bafycreated");

  let calls = store.calls();
  assert_eq!(calls.len(), 1);
  match &calls[0] {
    Call::Create { repo, collection, record } => {
      assert_eq!(repo, REPO);
      assert_eq!(collection, "com.example.note");
      assert_eq!(record.content(), Some("Hello world"));
      assert_eq!(record.record_type(), Some("com.example.note"));
    }
    other => panic!("Expected Create call, got: {other:?}"),
  }
}

#[tokio::test]
async fn test_update_preserves_stored_blog_fields() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "post.md", "# New\n\nBody");
  let store = MockRecordStore::new().with_record(BLOG_ENTRY_TYPE, "3kpost", stored_blog_entry());

  let outcome =
    upload(&store, &request(BLOG_ENTRY_TYPE, file, Some("3kpost"), Mode::Auto)).await.unwrap();

  assert_eq!(outcome.operation, Operation::Update);
  assert_eq!(outcome.rkey, "3kpost");
  assert_eq!(outcome.record.title(), Some("Old Custom"));
  assert_eq!(outcome.record.visibility(), Some("author"));
  assert_eq!(outcome.record.content(), Some("# New\n\nBody"));

  let calls = store.calls();
  assert!(matches!(&calls[0], Call::Get { rkey, .. } if rkey == "3kpost"));
  match &calls[1] {
    Call::Put { rkey, record, .. } => {
      assert_eq!(rkey, "3kpost");
      assert_eq!(record, &outcome.record);
    }
    other => panic!("Expected Put call, got: {other:?}"),
  }
}

#[tokio::test]
async fn test_update_with_force_override_rederives_fields() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "post.md", "# New\n\nBody");
  let store = MockRecordStore::new().with_record(BLOG_ENTRY_TYPE, "3kpost", stored_blog_entry());

  let mut req = request(BLOG_ENTRY_TYPE, file, Some("3kpost"), Mode::Update);
  req.force_override = true;
  let outcome = upload(&store, &req).await.unwrap();

  assert_eq!(outcome.record.title(), Some("New"));
  assert_eq!(outcome.record.visibility(), Some("public"));
}

#[tokio::test]
async fn test_update_of_missing_record_builds_fresh() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "post.md", "# Fresh\n\nBody");
  let store = MockRecordStore::new();

  let outcome =
    upload(&store, &request(BLOG_ENTRY_TYPE, file, Some("newkey"), Mode::Update)).await.unwrap();

  assert_eq!(outcome.operation, Operation::Update);
  assert_eq!(outcome.record.title(), Some("Fresh"));
  assert_eq!(outcome.record.visibility(), Some("public"));
  assert_eq!(outcome.uri, "at://did:plc:alice/com.whtwnd.blog.entry/newkey");
}

#[tokio::test]
async fn test_failed_fetch_is_treated_as_no_previous_record() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "post.md", "# From File\n");
  let mut store =
    MockRecordStore::new().with_record(BLOG_ENTRY_TYPE, "3kpost", stored_blog_entry());
  store.fail_get = true;

  let outcome =
    upload(&store, &request(BLOG_ENTRY_TYPE, file, Some("3kpost"), Mode::Auto)).await.unwrap();

  assert_eq!(outcome.record.title(), Some("From File"));
  assert_eq!(outcome.record.visibility(), Some("public"));
  assert!(matches!(store.calls().last(), Some(Call::Put { .. })));
}

#[tokio::test]
async fn test_update_without_key_fails_before_touching_store() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "note.txt", "text");
  let store = MockRecordStore::new();

  let req = request("com.example.note", file, None, Mode::Update);
  let err = upload(&store, &req).await.unwrap_err();

  assert!(matches!(err, QuillError::MissingRecordKey));
  assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_create_mode_ignores_key() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "note.txt", "text");
  let store = MockRecordStore::new();

  let req = request("com.example.note", file, Some("ignored"), Mode::Create);
  let outcome = upload(&store, &req).await.unwrap();

  assert_eq!(outcome.operation, Operation::Create);
  assert_eq!(outcome.rkey, "3kgenerated");
  assert!(store.calls().iter().all(|call| matches!(call, Call::Create { .. })));
}

#[tokio::test]
async fn test_missing_file_is_reported_with_path() {
  let dir = TempDir::new().unwrap();
  let missing = dir.path().join("nope.md");
  let store = MockRecordStore::new();

  let err = upload(&store, &request("com.example.note", missing.clone(), None, Mode::Auto))
    .await
    .unwrap_err();

  match err {
    QuillError::FileRead { path, .. } => assert_eq!(path, missing),
    other => panic!("Expected FileRead error, got: {other:?}"),
  }
  assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_typed_json_file_is_uploaded_verbatim() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "custom.json", r#"{"$type":"com.custom.x","a":1}"#);
  let store = MockRecordStore::new();

  let outcome =
    upload(&store, &request("com.example.post", file, None, Mode::Auto)).await.unwrap();

  assert_eq!(outcome.record.into_value(), json!({ "$type": "com.custom.x", "a": 1 }));
}

#[tokio::test]
async fn test_write_failure_propagates() {
  let dir = TempDir::new().unwrap();
  let file = write_file(&dir, "note.txt", "text");
  let mut store = MockRecordStore::new();
  store.fail_writes = true;

  let req = request("com.example.note", file, None, Mode::Auto);
  let err = upload(&store, &req).await.unwrap_err();

  assert_eq!(err.xrpc_error_name(), Some("InternalServerError"));
}
