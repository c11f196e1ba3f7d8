
use classdesk_drafts::{ScheduleEditor, SlotKey};
use test_support::{entry, persisted, FakeScheduleStore, CLASS_ID, YEAR};

#[test]
fn update_ops_carry_id_and_create_ops_have_no_id_member() {
    let store = FakeScheduleStore::with_rows(vec![persisted("s-1", 1, "p1", "t-1", "sub-math")]);
    let mut editor = ScheduleEditor::open(&store, CLASS_ID, YEAR).expect("open");

    editor.stage(SlotKey::new(1, "p1"), entry(1, "p1", "t-2", "sub-math"));
    editor.stage(SlotKey::new(2, "p3"), entry(2, "p3", "t-2", "sub-phys"));

    let outcome = editor.publish(&store).expect("publish");
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.deleted, 0);

    let ops = store.last_operations.borrow();
    assert_eq!(ops.len(), 2);

    let update = serde_json::to_value(
        ops.iter()
            .find(|op| op.period_id == "p1")
            .expect("update op"),
    )
    .expect("serialize");
    assert_eq!(update.get("id").and_then(|v| v.as_str()), Some("s-1"));

    let create = serde_json::to_value(
        ops.iter()
            .find(|op| op.period_id == "p3")
            .expect("create op"),
    )
    .expect("serialize");
    let create_obj = create.as_object().expect("object");
    // No id member at all: not null, not "".
    assert!(!create_obj.contains_key("id"));
}

#[test]
fn payloads_never_carry_display_fields() {
    let store = FakeScheduleStore::with_rows(vec![persisted("s-1", 1, "p1", "t-1", "sub-math")]);
    let mut editor = ScheduleEditor::open(&store, CLASS_ID, YEAR).expect("open");

    // The baseline row carries denormalized names; an update staged from it
    // must not forward them.
    let mut edited = entry(1, "p1", "t-3", "sub-math");
    edited.teacher_name = Some("Display Only".to_string());
    edited.room_number = Some("R-204".to_string());
    editor.stage(SlotKey::new(1, "p1"), edited);

    editor.publish(&store).expect("publish");

    let ops = store.last_operations.borrow();
    let op = serde_json::to_value(&ops[0]).expect("serialize");
    let obj = op.as_object().expect("object");
    assert!(!obj.contains_key("teacherName"));
    assert!(!obj.contains_key("subjectName"));
    assert_eq!(obj.get("roomNumber").and_then(|v| v.as_str()), Some("R-204"));
}

#[test]
fn incomplete_slots_are_skipped_not_submitted() {
    let store = FakeScheduleStore::with_rows(vec![]);
    let mut editor = ScheduleEditor::open(&store, CLASS_ID, YEAR).expect("open");

    editor.stage(SlotKey::new(1, "p1"), entry(1, "p1", "t-1", "sub-math"));
    // Subject never picked for this slot; the UI should have blocked it,
    // the publish path re-checks anyway.
    editor.stage(SlotKey::new(2, "p2"), entry(2, "p2", "t-1", ""));

    let outcome = editor.publish(&store).expect("publish");

    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.skipped_incomplete, 1);
    assert_eq!(store.last_operations.borrow().len(), 1);
}

#[test]
fn publish_with_nothing_staged_makes_no_remote_call() {
    let store = FakeScheduleStore::with_rows(vec![persisted("s-1", 1, "p1", "t-1", "sub-math")]);
    let mut editor = ScheduleEditor::open(&store, CLASS_ID, YEAR).expect("open");

    let outcome = editor.publish(&store).expect("publish");

    assert_eq!(outcome.submitted(), 0);
    assert_eq!(store.publish_calls.get(), 0);
}
