use super::*;

fn employee(id: i64, name: &str) -> Employee {
    let mut record = Employee::new(EmployeeId(id));
    record.name = name.to_string();
    record
}

fn dataset(n: usize) -> Vec<Employee> {
    (1..=n)
        .map(|i| employee(i as i64, &format!("employee-{i}")))
        .collect()
}

#[test]
fn complete_fetch_reveals_first_chunk() {
    let mut state = DirectoryState::default();
    state.begin_fetch();
    assert_eq!(state.load_phase, LoadPhase::Loading);

    state.complete_fetch(dataset(150));
    assert_eq!(state.load_phase, LoadPhase::Idle);
    assert_eq!(state.all_data.len(), 150);
    assert_eq!(state.visible.len(), CHUNK_SIZE);
    assert_eq!(state.visible[0].id, EmployeeId(1));
}

#[test]
fn complete_fetch_with_small_dataset_reveals_everything() {
    let mut state = DirectoryState::default();
    state.complete_fetch(dataset(5));
    assert_eq!(state.visible.len(), 5);
}

#[test]
fn fail_fetch_sets_error_and_preserves_data() {
    let mut state = DirectoryState::default();
    state.begin_fetch();
    state.fail_fetch("connection refused");

    assert_eq!(state.load_phase, LoadPhase::Error);
    assert_eq!(state.last_error.as_deref(), Some("connection refused"));
    assert!(state.all_data.is_empty());
    assert!(state.visible.is_empty());
}

#[test]
fn begin_fetch_clears_previous_error() {
    let mut state = DirectoryState::default();
    state.fail_fetch("boom");
    state.begin_fetch();
    assert!(state.last_error.is_none());
}

#[test]
fn append_visible_preserves_order_and_ignores_empty_input() {
    let mut state = DirectoryState::default();
    state.complete_fetch(dataset(3));
    let before = state.visible.clone();

    assert_eq!(state.append_visible(&[]), 0);
    assert_eq!(state.visible, before);

    let extra = [employee(4, "late-arrival")];
    assert_eq!(state.append_visible(&extra), 1);
    assert_eq!(state.visible.last().map(|e| e.id), Some(EmployeeId(4)));
}

#[test]
fn apply_local_update_replaces_in_both_collections() {
    let mut state = DirectoryState::default();
    state.complete_fetch(dataset(3));

    let updated = employee(2, "renamed");
    state.apply_local_update(&updated);

    assert_eq!(state.all_data[1].name, "renamed");
    assert_eq!(state.visible[1].name, "renamed");
}

#[test]
fn apply_local_update_is_idempotent() {
    let mut state = DirectoryState::default();
    state.complete_fetch(dataset(3));

    let updated = employee(2, "renamed");
    state.apply_local_update(&updated);
    let once = state.clone();
    state.apply_local_update(&updated);

    assert_eq!(state.all_data, once.all_data);
    assert_eq!(state.visible, once.visible);
}

#[test]
fn apply_local_update_with_unknown_id_is_a_noop() {
    let mut state = DirectoryState::default();
    state.complete_fetch(dataset(3));
    let before = state.clone();

    state.apply_local_update(&employee(99, "ghost"));

    assert_eq!(state.all_data, before.all_data);
    assert_eq!(state.visible, before.visible);
}

#[test]
fn clear_error_leaves_other_state_alone() {
    let mut state = DirectoryState::default();
    state.complete_fetch(dataset(3));
    state.last_error = Some("save failed".to_string());

    state.clear_error();

    assert!(state.last_error.is_none());
    assert_eq!(state.all_data.len(), 3);
    assert_eq!(state.load_phase, LoadPhase::Idle);
}

#[test]
fn select_seeds_draft_and_resets_save_lifecycle() {
    let mut session = EditSession::default();
    session.save_status = SaveStatus::Failed;
    session.banner_visible = true;

    session.select(&employee(5, "Alice"));

    assert_eq!(session.selected, Some(EmployeeId(5)));
    assert_eq!(session.draft.as_ref().map(|d| d.name.as_str()), Some("Alice"));
    assert_eq!(session.save_status, SaveStatus::Idle);
    assert!(!session.banner_visible);
}

#[test]
fn edit_field_updates_only_the_named_field() {
    let mut session = EditSession::default();
    let mut record = employee(5, "Alice");
    record.job_title = "Engineer".to_string();
    session.select(&record);

    assert!(session.edit_field(EmployeeField::Department, "Platform".to_string()));

    let draft = session.draft.as_ref().expect("draft");
    assert_eq!(draft.department, "Platform");
    assert_eq!(draft.name, "Alice");
    assert_eq!(draft.job_title, "Engineer");
    assert_eq!(session.selected, Some(EmployeeId(5)));
}

#[test]
fn edit_field_without_selection_is_rejected() {
    let mut session = EditSession::default();
    assert!(!session.edit_field(EmployeeField::Name, "Zed".to_string()));
    assert!(session.draft.is_none());
}

#[test]
fn editing_after_failed_save_returns_to_editable_state() {
    let mut session = EditSession::default();
    session.select(&employee(5, "Alice"));
    session.begin_save().expect("draft");
    session.finish_save_failure();
    assert_eq!(session.save_status, SaveStatus::Failed);

    assert!(session.edit_field(EmployeeField::Name, "Alice B".to_string()));
    assert_eq!(session.draft.as_ref().map(|d| d.name.as_str()), Some("Alice B"));
}

#[test]
fn begin_save_without_selection_is_a_noop() {
    let mut session = EditSession::default();
    assert!(session.begin_save().is_none());
    assert_eq!(session.save_status, SaveStatus::Idle);
}

#[test]
fn save_lifecycle_transitions() {
    let mut session = EditSession::default();
    session.select(&employee(5, "Alice"));

    let draft = session.begin_save().expect("draft");
    assert_eq!(draft.id, EmployeeId(5));
    assert_eq!(session.save_status, SaveStatus::Saving);

    session.finish_save_success();
    assert_eq!(session.save_status, SaveStatus::Succeeded);
    assert!(session.banner_visible);

    session.dismiss_banner();
    assert_eq!(session.save_status, SaveStatus::Succeeded);
    assert!(!session.banner_visible);
}

#[test]
fn cancel_discards_draft_and_selection() {
    let mut session = EditSession::default();
    session.select(&employee(5, "Alice"));
    session.finish_save_success();

    session.cancel();

    assert!(session.selected.is_none());
    assert!(session.draft.is_none());
    assert_eq!(session.save_status, SaveStatus::Idle);
    assert!(!session.banner_visible);
}

#[test]
fn save_generations_are_monotonic_per_record() {
    let mut state = DirectoryState::default();
    let first = state.bump_save_generation(EmployeeId(5));
    let second = state.bump_save_generation(EmployeeId(5));
    let other = state.bump_save_generation(EmployeeId(9));

    assert!(second > first);
    assert_eq!(other, 1);
    assert!(state.is_latest_save_generation(EmployeeId(5), second));
    assert!(!state.is_latest_save_generation(EmployeeId(5), first));
}
