use async_trait::async_trait;
use pagewright::{Page, PageId, Section};
use pagewright_repository::{
    BlobContentSource, BlobStorage, FileStorage, MemoryContentSource, MemoryStorage,
    PageRepository, RepositoryError, StorageError, TransportError,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn home() -> Page {
    Page::builder("home")
        .title("Home")
        .section(Section::from_value("s1", "hero", json!({"title": "Welcome"})).unwrap())
        .section(Section::from_value("s2", "richText", json!({"body": "Hello."})).unwrap())
        .section(Section::from_value("s3", "unknown-widget", json!({"x": [1, 2]})).unwrap())
        .build()
        .unwrap()
}

fn same_content(a: &Page, b: &Page) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.title, b.title);
    assert_eq!(a.sections, b.sections);
}

#[tokio::test]
async fn test_save_then_get_round_trip() {
    let repository = PageRepository::from_source(MemoryContentSource::new());

    let saved = repository.save(&home()).await.unwrap();
    assert_eq!(saved.revision, 1);
    same_content(&saved, &home());

    let loaded = repository.get_by_id(&PageId::from("home")).await.unwrap();
    assert_eq!(loaded, saved);

    let resaved = repository.save(&loaded).await.unwrap();
    assert_eq!(resaved.revision, 2);
    assert_eq!(resaved.created_at, saved.created_at);
    same_content(&resaved, &loaded);
}

#[tokio::test]
async fn test_missing_page_is_not_found() {
    let repository = PageRepository::from_source(MemoryContentSource::new());
    let err = repository.get_by_id(&PageId::from("missing")).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_retriable());
    assert!(!repository.exists(&PageId::from("missing")).await.unwrap());
}

#[tokio::test]
async fn test_unreachable_source_is_retriable_transport_error() {
    let source = Arc::new(MemoryContentSource::new());
    let repository = PageRepository::new(source.clone());
    repository.save(&home()).await.unwrap();

    source.set_offline(true);
    let err = repository.get_by_id(&PageId::from("home")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport(TransportError::Unreachable { .. })));
    assert!(err.is_retriable());

    source.set_offline(false);
    assert!(repository.exists(&PageId::from("home")).await.unwrap());
}

#[tokio::test]
async fn test_malformed_record_fails_whole_load() {
    let source = Arc::new(MemoryContentSource::new());
    source.insert_raw(
        "broken",
        json!({
            "_id": "broken",
            "title": "Broken",
            "sections": [
                {"_key": "a", "_type": "hero", "title": "Fine"},
                {"_key": "b", "props": {"title": "no type"}}
            ]
        }),
    );
    let repository = PageRepository::new(source);

    let err = repository.get_by_id(&PageId::from("broken")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport(TransportError::Malformed { .. })));
}

#[tokio::test]
async fn test_cms_shaped_record_is_normalized() {
    let source = Arc::new(MemoryContentSource::new());
    source.insert_raw(
        "about",
        json!({
            "_id": "about",
            "name": "About us",
            "content": [
                {"_key": "intro", "_type": "hero", "title": "About"},
                {"_type": "richText", "data": {"body": "Since 1890."}},
                {"_key": "intro", "_type": "timeline", "props": null}
            ]
        }),
    );
    let repository = PageRepository::new(source);

    let page = repository.get_by_id(&PageId::from("about")).await.unwrap();
    assert_eq!(page.title, "About us");
    assert_eq!(page.len(), 3);
    assert_eq!(page.sections[0].props["title"], "About");
    assert!(!page.sections[0].props.contains_key("_type"));
    assert_eq!(page.sections[1].props["body"], "Since 1890.");
    assert!(page.sections[2].props.is_empty());
    assert!(page.validate().is_ok());

    // Keys assigned on load are stable across loads
    let again = repository.get_by_id(&PageId::from("about")).await.unwrap();
    assert_eq!(page.keys(), again.keys());
}

#[tokio::test]
async fn test_failed_persist_leaves_prior_state() {
    let source = Arc::new(MemoryContentSource::new());
    let repository = PageRepository::new(source.clone());
    let saved = repository.save(&home()).await.unwrap();

    let mut edited = saved.clone();
    edited.remove_section(&"s2".into()).unwrap();

    source.fail_next_persists(1);
    assert!(repository.save(&edited).await.is_err());
    let loaded = repository.get_by_id(&PageId::from("home")).await.unwrap();
    assert_eq!(loaded, saved);

    let resaved = repository.save(&edited).await.unwrap();
    assert_eq!(resaved.len(), 2);
}

#[tokio::test]
async fn test_save_rejects_duplicate_keys() {
    let repository = PageRepository::from_source(MemoryContentSource::new());
    let mut page = home();
    page.sections[1].key = "s1".into();

    let err = repository.save(&page).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
    assert!(!repository.exists(&PageId::from("home")).await.unwrap());
}

#[tokio::test]
async fn test_file_backed_pages_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let storage = FileStorage::new(dir.path()).await.unwrap();
        let repository = PageRepository::from_source(BlobContentSource::new(storage));
        repository.save(&home()).await.unwrap();
    }

    let storage = FileStorage::new(dir.path()).await.unwrap();
    let repository = PageRepository::from_source(BlobContentSource::new(storage));
    let loaded = repository.get_by_id(&PageId::from("home")).await.unwrap();
    same_content(&loaded, &home());
    assert_eq!(loaded.revision, 1);
}

#[tokio::test]
async fn test_file_backed_ids_with_suffixes_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path()).await.unwrap();
    let repository = PageRepository::from_source(BlobContentSource::new(storage));

    let mut suffixed = home();
    suffixed.id = PageId::from("x.tmp");
    suffixed.title = "Suffixed".into();
    let mut plain = home();
    plain.id = PageId::from("x");
    plain.title = "Plain".into();

    repository.save(&suffixed).await.unwrap();
    repository.save(&plain).await.unwrap();

    let loaded = repository.get_by_id(&PageId::from("x.tmp")).await.unwrap();
    assert_eq!(loaded.title, "Suffixed");
    let loaded = repository.get_by_id(&PageId::from("x")).await.unwrap();
    assert_eq!(loaded.title, "Plain");
}

#[tokio::test]
async fn test_file_backed_nested_ids_are_distinct_pages() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path()).await.unwrap();
    let repository = PageRepository::from_source(BlobContentSource::new(storage));
    repository.save(&home()).await.unwrap();

    let err = repository.get_by_id(&PageId::from("home/about")).await.unwrap_err();
    assert!(err.is_not_found());

    let mut about = home();
    about.id = PageId::from("home/about");
    about.title = "About".into();
    repository.save(&about).await.unwrap();

    let loaded = repository.get_by_id(&PageId::from("home/about")).await.unwrap();
    assert_eq!(loaded.title, "About");
    let loaded = repository.get_by_id(&PageId::from("home")).await.unwrap();
    assert_eq!(loaded.title, "Home");
}

/// Blob store whose writes to one key prefix can be switched off
struct FlakyStorage {
    inner: MemoryStorage,
    fail_refs: AtomicBool,
}

#[async_trait]
impl BlobStorage for FlakyStorage {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StorageError> {
        if key.starts_with("refs/") && self.fail_refs.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".into()));
        }
        self.inner.put(key, data).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.inner.get(key).await
    }
}

#[tokio::test]
async fn test_interrupted_blob_write_keeps_prior_snapshot() {
    let storage = FlakyStorage {
        inner: MemoryStorage::new(),
        fail_refs: AtomicBool::new(false),
    };
    let source = Arc::new(BlobContentSource::new(storage));
    let repository = PageRepository::new(source.clone());
    let saved = repository.save(&home()).await.unwrap();

    let mut edited = saved.clone();
    edited.title = "Renamed".into();
    source.storage().fail_refs.store(true, Ordering::SeqCst);

    let err = repository.save(&edited).await.unwrap_err();
    assert!(err.is_retriable());

    let loaded = repository.get_by_id(&PageId::from("home")).await.unwrap();
    assert_eq!(loaded.title, "Home");
    assert_eq!(loaded.revision, saved.revision);
}
