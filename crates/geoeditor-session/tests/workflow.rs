use geoeditor_model::{Dataset, Feature, ProjectKind, Value};
use geoeditor_session::{AuthoringSession, ProjectAction, SessionError};
use geoeditor_store::{FileSlot, StoreHandle};

fn features() -> Vec<Feature> {
    let mut properties = std::collections::BTreeMap::new();
    properties.insert("age".to_string(), Value::Number(31.0));
    properties.insert("region".to_string(), Value::Text("N".into()));
    vec![Feature::new(properties)]
}

fn empty_store(dir: &tempfile::TempDir) -> StoreHandle {
    StoreHandle::load(Box::new(FileSlot::in_dir(dir.path())), None)
}

#[test]
fn dataset_workflow_gates_on_loaded_features() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = empty_store(&dir);
    let mut session = AuthoringSession::new(ProjectKind::Dataset, ProjectAction::Create);

    // Step 0 (pick kind/action) always passes.
    assert_eq!(session.advance().unwrap(), 1);
    // Step 1 requires a non-empty feature set.
    assert!(matches!(
        session.advance(),
        Err(SessionError::StepIncomplete { step: 1, .. })
    ));

    let id = session
        .load_dataset(&mut store, "census", features())
        .unwrap();
    // Push-on-load: the dataset is already in the store.
    assert!(store.store().dataset(&id).is_some());

    assert_eq!(session.advance().unwrap(), 2);
    assert_eq!(session.advance().unwrap(), 3);
    assert_eq!(session.advance().unwrap(), 4);
    assert!(matches!(session.advance(), Err(SessionError::AtLastStep)));
}

#[test]
fn backward_navigation_is_always_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = empty_store(&dir);
    let mut session = AuthoringSession::new(ProjectKind::Dataset, ProjectAction::Create);
    session.advance().unwrap();
    session
        .load_dataset(&mut store, "census", features())
        .unwrap();
    session.advance().unwrap();
    session.advance().unwrap();

    assert_eq!(session.go_to(1).unwrap(), 1);
    // Nothing was lost: the predicate still holds, so forward works again.
    assert_eq!(session.advance().unwrap(), 2);
    assert!(session.go_to(4).is_err());
}

#[test]
fn category_workflow_saves_on_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = empty_store(&dir);
    let dataset_id = store.insert_dataset(Dataset::new("census", features())).unwrap();

    let mut session = AuthoringSession::new(ProjectKind::Category, ProjectAction::Create);
    session.begin_draft("demographics").unwrap();
    session.advance().unwrap();

    // Empty member list blocks step 1.
    assert!(matches!(
        session.advance(),
        Err(SessionError::StepIncomplete { step: 1, .. })
    ));
    session.attach_member(&store, &dataset_id).unwrap();
    assert_eq!(session.advance().unwrap(), 2);

    // Weighting step never demands a perfect sum.
    session.set_member_weight(&dataset_id, 40.0).unwrap();
    assert_eq!(session.advance().unwrap(), 3);

    // Push-on-save: nothing was stored until now.
    assert_eq!(store.store().list(ProjectKind::Category).len(), 0);
    let id = session.save_draft(&mut store).unwrap();
    assert!(store.store().category(&id).is_some());
}

#[test]
fn unknown_members_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = empty_store(&dir);
    let mut session = AuthoringSession::new(ProjectKind::Category, ProjectAction::Create);
    session.begin_draft("ghost-town").unwrap();
    let ghost = geoeditor_model::ProjectId::generate("ghost");
    assert!(session.attach_member(&store, &ghost).is_err());
}

#[test]
fn project_switch_cancels_in_flight_requests() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = empty_store(&dir);
    let mut session = AuthoringSession::new(ProjectKind::Dataset, ProjectAction::Edit);
    session.advance().unwrap();
    session
        .load_dataset(&mut store, "census", features())
        .unwrap();

    let scope = session.request_scope("fetch");
    let ticket = session.requests_mut().issue(&scope);

    let other = store.insert_dataset(Dataset::new("roads", features())).unwrap();
    session.switch_project(other);
    assert!(!session.requests_mut().accept(&scope, ticket));
}

#[test]
fn step_change_cancels_outstanding_requests() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = empty_store(&dir);
    let mut session = AuthoringSession::new(ProjectKind::Dataset, ProjectAction::Create);
    session.advance().unwrap();
    session
        .load_dataset(&mut store, "census", features())
        .unwrap();

    let scope = session.request_scope("fetch");
    let ticket = session.requests_mut().issue(&scope);

    // Moving on from the step invalidates its in-flight responses, the
    // same way backward navigation does.
    session.advance().unwrap();
    assert!(!session.requests_mut().accept(&scope, ticket));
}

#[test]
fn stale_responses_are_discarded() {
    let mut session = AuthoringSession::new(ProjectKind::Dataset, ProjectAction::Create);
    let scope = session.request_scope("counties");
    let first = session.requests_mut().issue(&scope);
    let second = session.requests_mut().issue(&scope);
    // The user changed the dropdown twice; only the newest response lands.
    assert!(!session.requests_mut().accept(&scope, first));
    assert!(session.requests_mut().accept(&scope, second));
}
