//! Session command tests against in-memory collaborators

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::attachments::{AttachmentPipeline, BinaryFile, CompressionOptions, ObjectStorage, PassthroughCompressor};
use crate::domain::{AuthIdentity, DomainError, DomainResult, Priority, Role, TaskSpecific, Unit, UnitId};
use crate::draft::FleetDraft;
use crate::repository::{MemoryDocumentStore, ProfileStore, RecordStore};
use crate::AppState;
use super::{ensure_profile, FleetSession};

#[derive(Default)]
struct MemoryObjects {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail: Mutex<bool>,
    loading: Mutex<Option<Arc<AtomicBool>>>,
    loading_seen: Mutex<Vec<bool>>,
}

#[async_trait]
impl ObjectStorage for MemoryObjects {
    async fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> DomainResult<String> {
        if *self.fail.lock().unwrap() {
            return Err(DomainError::Upload {
                key: key.to_string(),
                reason: "bucket offline".to_string(),
            });
        }
        if let Some(flag) = self.loading.lock().unwrap().as_ref() {
            self.loading_seen.lock().unwrap().push(flag.load(Ordering::SeqCst));
        }
        self.objects.lock().unwrap().insert(key.to_string(), bytes.to_vec());
        Ok(format!("https://cdn/{}", key))
    }
}

struct Harness {
    store: Arc<MemoryDocumentStore>,
    objects: Arc<MemoryObjects>,
    session: FleetSession,
}

async fn harness(units: Vec<Unit>) -> (Harness, Vec<UnitId>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let objects = Arc::new(MemoryObjects::default());
    let ids = store.batch_create(&units).await.unwrap();

    let pipeline = AttachmentPipeline::new(
        Arc::new(PassthroughCompressor),
        objects.clone(),
        CompressionOptions::default(),
    );
    let app = Arc::new(AppState::new(store.clone(), store.clone(), pipeline));
    let mut session = FleetSession::new(app);
    session.load().await.unwrap();

    (Harness { store, objects, session }, ids)
}

fn photo(name: &str) -> BinaryFile {
    BinaryFile::new(name, vec![0xFF, 0xD8, 0xFF])
}

fn fleet() -> Vec<Unit> {
    vec![
        Unit::new("T-100", "Acme", Priority::Medium),
        Unit::new("T-200", "Acme", Priority::High),
        Unit::new("T-300", "Birch", Priority::Low),
    ]
}

#[tokio::test]
async fn test_load_and_group() {
    let (h, _) = harness(fleet()).await;

    let groups = h.session.customer_groups();
    assert_eq!(groups.len(), 2);
    let acme = groups.get("Acme").unwrap();
    let order: Vec<&str> = acme.by_priority().iter().map(|u| u.unit_number.as_str()).collect();
    assert_eq!(order, vec!["T-200", "T-100"]);
    assert_eq!(acme.progress_percent(), 0.0);
}

#[tokio::test]
async fn test_load_failure_keeps_previous_list() {
    let (mut h, _) = harness(fleet()).await;
    h.store.set_fail_reads(true);

    let err = h.session.load().await.unwrap_err();
    assert_eq!(err.category(), "fetch");
    assert_eq!(h.session.units().len(), 3);
}

#[tokio::test]
async fn test_mark_done_updates_remote_then_local() {
    let (mut h, ids) = harness(fleet()).await;
    let untouched = Arc::clone(&h.session.units()[1]);

    h.session.mark_done(&ids[0], true).await.unwrap();

    assert!(h.session.units()[0].done);
    assert!(Arc::ptr_eq(&untouched, &h.session.units()[1]));
    let remote = h.store.fetch_all().await.unwrap();
    assert!(remote[0].done);
    assert_eq!(h.session.customer_groups().progress_percent("Acme"), 50.0);
}

#[tokio::test]
async fn test_mark_done_failure_leaves_local_state() {
    let (mut h, ids) = harness(fleet()).await;
    h.store.set_fail_writes(true);

    let err = h.session.mark_done(&ids[0], true).await.unwrap_err();
    assert_eq!(err.category(), "write");
    assert!(!h.session.units()[0].done);
}

#[tokio::test]
async fn test_submit_annotation_uploads_merges_and_completes() {
    let (mut h, ids) = harness(fleet()).await;

    h.session
        .submit_annotation(&ids[0], &[photo("lf1.jpg"), photo("lf2.jpg")], "LF", "4", true)
        .await
        .unwrap();

    let unit = &h.session.units()[0];
    assert!(unit.done);
    assert_eq!(unit.comments.len(), 1);
    assert_eq!(
        unit.comments[0].image_urls,
        vec!["https://cdn/T-100/lf1.jpg", "https://cdn/T-100/lf2.jpg"]
    );
    assert!(!h.session.is_loading());

    let remote = h.store.fetch_all().await.unwrap();
    assert_eq!(remote[0].comments, unit.comments);
    assert!(h.objects.objects.lock().unwrap().contains_key("T-100/lf1.jpg"));
}

#[tokio::test]
async fn test_loading_flag_visible_during_upload() {
    let (mut h, ids) = harness(fleet()).await;
    *h.objects.loading.lock().unwrap() = Some(h.session.loading_flag());

    h.session
        .submit_annotation(&ids[0], &[photo("a.jpg"), photo("b.jpg")], "LF", "4", false)
        .await
        .unwrap();

    assert_eq!(*h.objects.loading_seen.lock().unwrap(), vec![true, true]);
    assert!(!h.session.is_loading());
}

#[tokio::test]
async fn test_repeat_annotation_appends_to_same_entry() {
    let (mut h, ids) = harness(fleet()).await;

    h.session
        .submit_annotation(&ids[0], &[photo("a.jpg")], "LF", "4", false)
        .await
        .unwrap();
    h.session
        .submit_annotation(&ids[0], &[photo("a.jpg"), photo("b.jpg")], " LF", "4 ", false)
        .await
        .unwrap();
    h.session
        .submit_annotation(&ids[0], &[photo("c.jpg")], "RF", "6", false)
        .await
        .unwrap();

    let comments = &h.session.units()[0].comments;
    assert_eq!(comments.len(), 2);
    assert_eq!(
        comments[0].image_urls,
        vec!["https://cdn/T-100/a.jpg", "https://cdn/T-100/b.jpg"]
    );
    assert_eq!(comments[1].comment1, "RF");
    assert!(!h.session.units()[0].done);
}

#[tokio::test]
async fn test_upload_failure_writes_nothing() {
    let (mut h, ids) = harness(fleet()).await;
    *h.objects.fail.lock().unwrap() = true;

    let err = h
        .session
        .submit_annotation(&ids[0], &[photo("a.jpg")], "LF", "4", true)
        .await
        .unwrap_err();

    assert_eq!(err.category(), "upload");
    assert!(!h.session.is_loading());
    assert!(h.session.units()[0].comments.is_empty());
    assert!(h.store.fetch_all().await.unwrap()[0].comments.is_empty());
}

#[tokio::test]
async fn test_write_failure_after_upload_leaves_objects() {
    let (mut h, ids) = harness(fleet()).await;
    h.store.set_fail_writes(true);

    let err = h
        .session
        .submit_annotation(&ids[0], &[photo("a.jpg")], "LF", "4", true)
        .await
        .unwrap_err();

    assert_eq!(err.category(), "write");
    assert!(h.session.units()[0].comments.is_empty());
    assert!(h.objects.objects.lock().unwrap().contains_key("T-100/a.jpg"));
}

#[tokio::test]
async fn test_unknown_unit_is_not_found() {
    let (mut h, _) = harness(fleet()).await;
    let err = h
        .session
        .submit_annotation(&UnitId::from("ghost"), &[photo("a.jpg")], "LF", "4", true)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "not_found");
}

#[tokio::test]
async fn test_no_files_is_invalid_input() {
    let (mut h, ids) = harness(fleet()).await;
    let err = h
        .session
        .submit_annotation(&ids[0], &[], "LF", "4", true)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "invalid_input");
}

#[tokio::test]
async fn test_submit_draft_adds_units() {
    let (mut h, _) = harness(Vec::new()).await;
    let mut draft = FleetDraft::new();
    draft.create_customer("Cedar");
    draft.add_unit("C-1", Priority::Low);
    draft.add_task_specific(0, &TaskSpecific::new("LF", "sidewall cut", "6", "11R22.5"));

    assert_eq!(h.session.submit_draft(&mut draft).await.unwrap(), 1);

    assert!(draft.is_empty());
    assert_eq!(h.session.units().len(), 1);
    assert!(h.session.units()[0].id.is_some());
    assert_eq!(h.store.fetch_all().await.unwrap()[0].task_specifics.len(), 1);
}

#[tokio::test]
async fn test_ensure_profile_writes_once() {
    let store = MemoryDocumentStore::new();
    let identity = AuthIdentity {
        uid: "mgr-1".to_string(),
        display_name: Some("Robin".to_string()),
        email: Some("robin@example.com".to_string()),
    };

    assert!(ensure_profile(&store, Role::Customer, &identity).await.unwrap());
    let first = store.find_profile("FleetManagerusers", "mgr-1").await.unwrap().unwrap();

    assert!(!ensure_profile(&store, Role::FleetManager, &identity).await.unwrap());
    let second = store.find_profile("FleetManagerusers", "mgr-1").await.unwrap().unwrap();
    assert_eq!(first.created_at, second.created_at);
    assert!(store.find_profile("Techusers", "mgr-1").await.unwrap().is_none());
}
