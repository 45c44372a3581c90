use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use geoeditor_api::ApiError;
use geoeditor_model::{Category, Dataset, ProjectKind};
use geoeditor_store::{FileSlot, LocalSlot, RemoteSink, StoreError, StoreHandle};

struct FailingRemote {
    attempts: AtomicUsize,
}

impl RemoteSink for FailingRemote {
    fn push_projects(&self, _snapshot: serde_json::Value) -> Result<(), ApiError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::Transport("connection refused".into()))
    }
}

struct RecordingRemote {
    pushes: Mutex<Vec<serde_json::Value>>,
}

impl RemoteSink for RecordingRemote {
    fn push_projects(&self, snapshot: serde_json::Value) -> Result<(), ApiError> {
        self.pushes.lock().unwrap().push(snapshot);
        Ok(())
    }
}

#[test]
fn store_round_trips_through_the_local_slot() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::in_dir(dir.path());

    let mut handle = StoreHandle::load(Box::new(slot.clone()), None);
    let dataset_id = handle.insert_dataset(Dataset::new("census", vec![])).unwrap();
    let mut category = Category::new("demographics");
    category.attach_dataset(dataset_id.clone());
    handle.insert_category(category).unwrap();

    // A fresh handle over the same slot sees both projects.
    let reloaded = StoreHandle::load(Box::new(slot), None);
    assert!(reloaded.store().dataset(&dataset_id).is_some());
    assert_eq!(reloaded.store().list(ProjectKind::Category).len(), 1);
}

#[test]
fn unparseable_slot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::in_dir(dir.path());
    slot.write("{definitely not json").unwrap();

    let handle = StoreHandle::load(Box::new(slot), None);
    assert!(handle.store().is_empty());
}

#[test]
fn remote_failure_does_not_fail_the_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::in_dir(dir.path());
    let remote = Box::new(FailingRemote {
        attempts: AtomicUsize::new(0),
    });

    let mut handle = StoreHandle::load(Box::new(slot.clone()), Some(remote));
    let id = handle.insert_dataset(Dataset::new("census", vec![])).unwrap();
    assert!(handle.store().dataset(&id).is_some());

    // The local slot still got the flush.
    let reloaded = StoreHandle::load(Box::new(slot), None);
    assert!(reloaded.store().dataset(&id).is_some());
}

#[test]
fn every_mutation_pushes_the_full_store() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::in_dir(dir.path());
    let remote = RecordingRemote {
        pushes: Mutex::new(Vec::new()),
    };
    let remote: &'static RecordingRemote = Box::leak(Box::new(remote));

    let mut handle = StoreHandle::load(Box::new(slot), Some(Box::new(remote)));
    let id = handle.insert_dataset(Dataset::new("census", vec![])).unwrap();
    handle
        .update_dataset(&id, |dataset| {
            dataset.description = "decennial counts".to_string();
            Ok(())
        })
        .unwrap();

    let pushes = remote.pushes.lock().unwrap();
    assert_eq!(pushes.len(), 2);
    assert!(pushes[1]["datasets"][id.as_str()]["description"]
        .as_str()
        .unwrap()
        .contains("decennial"));
}

#[test]
fn delete_keeps_referential_integrity_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::in_dir(dir.path());

    let mut handle = StoreHandle::load(Box::new(slot.clone()), None);
    let dataset_id = handle.insert_dataset(Dataset::new("roads", vec![])).unwrap();
    let mut category = Category::new("transport");
    category.attach_dataset(dataset_id.clone());
    handle.insert_category(category).unwrap();

    let mut reloaded = StoreHandle::load(Box::new(slot), None);
    assert!(matches!(
        reloaded.delete(&dataset_id),
        Err(StoreError::Referenced { .. })
    ));
}

impl RemoteSink for &RecordingRemote {
    fn push_projects(&self, snapshot: serde_json::Value) -> Result<(), ApiError> {
        (**self).push_projects(snapshot)
    }
}
