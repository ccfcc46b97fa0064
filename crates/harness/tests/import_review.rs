use std::fs;

use metaedit_core::{CoreError, FieldValue, ItemDocument, ItemId, Tag, TagId};
use metaedit_engine::{Editor, EditorConfig, EngineError, ReviewState, TrackingMode};
use metaedit_harness::{HarnessError, TestEditor, init_tracing};

fn movie() -> ItemDocument {
    ItemDocument::new()
        .with_field("title", "A")
        .with_field("overview", "A heist goes wrong.")
        .with_field("year", 1999i64)
        .with_field("genres", vec![Tag::label("Crime")])
}

fn loaded() -> Editor {
    init_tracing();
    let mut editor = Editor::new(EditorConfig::default());
    editor.load(ItemId::new(), movie());
    editor
}

fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

// ============================================================================
// Staging
// ============================================================================

#[test]
fn import_holds_dirty_false_while_pending() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();

    let staged = editor.begin_import(
        &ItemDocument::new()
            .with_field("title", "C")
            .with_field("year", 2001i64),
    )?;
    assert_eq!(staged, vec!["title".to_string(), "year".to_string()]);

    assert_eq!(editor.field("title"), Some(&text("C")));
    assert_eq!(editor.field("year"), Some(&FieldValue::Integer(2001)));
    assert!(!editor.dirty());
    assert_eq!(editor.mode(), TrackingMode::ImportPending);
    assert!(editor.review_controls_visible("title"));
    assert!(editor.review_controls_visible("year"));
    assert!(!editor.review_controls_visible("overview"));
    assert_eq!(editor.changed_fields(), vec!["title".to_string(), "year".to_string()]);

    Ok(())
}

#[test]
fn user_edit_during_review_keeps_dirty_false() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;

    editor.set_field("overview", text("Edited while reviewing"))?;
    assert!(!editor.dirty());
    assert!(editor.has_pending_review());

    Ok(())
}

#[test]
fn import_does_not_touch_baseline() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;

    assert_eq!(
        editor.tracker().baseline().and_then(|b| b.get("title")),
        Some(&text("A"))
    );

    Ok(())
}

#[test]
fn empty_import_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    let staged = editor.begin_import(&ItemDocument::new())?;
    assert!(staged.is_empty());
    assert_eq!(editor.mode(), TrackingMode::Active);
    assert!(!editor.tracker().is_paused());
    Ok(())
}

#[test]
fn unknown_import_field_fails_before_any_write() {
    let mut editor = loaded();
    let err = editor
        .begin_import(
            &ItemDocument::new()
                .with_field("title", "C")
                .with_field("director", "Someone"),
        )
        .unwrap_err();

    assert!(matches!(err, EngineError::UnknownField(name) if name == "director"));
    assert_eq!(editor.field("title"), Some(&text("A")));
    assert!(!editor.has_pending_review());
    assert!(!editor.tracker().is_paused());
}

// ============================================================================
// Accept
// ============================================================================

#[test]
fn accept_forces_dirty_even_when_value_matches_baseline() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "A"))?;
    assert!(!editor.dirty());

    editor.accept_field("title")?;
    assert!(editor.dirty());
    assert!(editor.changed_fields().is_empty());
    assert_eq!(editor.review_state("title"), ReviewState::Accepted);
    assert!(!editor.review_controls_visible("title"));
    assert_eq!(editor.mode(), TrackingMode::Active);

    Ok(())
}

#[test]
fn accepted_field_does_not_pin_dirty_after_revert() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "A"))?;
    editor.accept_field("title")?;
    assert!(editor.dirty());

    editor.set_field("overview", text("X"))?;
    assert!(editor.dirty());
    editor.set_field("overview", text("A heist goes wrong."))?;
    assert!(editor.changed_fields().is_empty());
    assert!(!editor.dirty());

    Ok(())
}

#[test]
fn accept_with_other_fields_pending_stays_clean() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(
        &ItemDocument::new()
            .with_field("title", "C")
            .with_field("overview", "Imported overview"),
    )?;

    editor.accept_field("title")?;
    assert!(!editor.dirty());
    assert_eq!(editor.pending_fields(), vec!["overview".to_string()]);

    // Rejecting the last pending field lifts the hold; title still differs.
    editor.reject_field("overview")?;
    assert!(editor.dirty());
    assert_eq!(editor.field("title"), Some(&text("C")));
    assert_eq!(editor.field("overview"), Some(&text("A heist goes wrong.")));

    Ok(())
}

#[test]
fn accept_of_unstaged_field_is_invalid() {
    let mut editor = loaded();
    let err = editor.accept_field("title").unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidReconciliationState { ref field, state: ReviewState::NotStaged } if field == "title"
    ));
    assert!(!editor.dirty());
}

#[test]
fn second_accept_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;
    editor.accept_field("title")?;

    let err = editor.accept_field("title").unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidReconciliationState { state: ReviewState::Accepted, .. }
    ));
    let err = editor.reject_field("title").unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidReconciliationState { state: ReviewState::Accepted, .. }
    ));
    assert_eq!(editor.field("title"), Some(&text("C")));

    Ok(())
}

// ============================================================================
// Reject
// ============================================================================

#[test]
fn reject_restores_pre_import_value_not_baseline() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();

    editor.set_field("title", text("B"))?;
    assert!(editor.dirty());

    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;
    assert_eq!(editor.field("title"), Some(&text("C")));
    assert!(!editor.dirty());

    editor.reject_field("title")?;
    assert_eq!(editor.field("title"), Some(&text("B")));
    assert!(editor.dirty());
    assert_eq!(editor.review_state("title"), ReviewState::NotStaged);
    assert!(editor.reconciler().pre_import_value("title").is_none());

    editor.save_completed()?;
    assert!(!editor.dirty());
    assert_eq!(
        editor.tracker().baseline().and_then(|b| b.get("title")),
        Some(&text("B"))
    );

    Ok(())
}

#[test]
fn reject_back_to_baseline_is_clean() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;

    editor.reject_field("title")?;
    assert_eq!(editor.field("title"), Some(&text("A")));
    assert!(!editor.dirty());
    assert_eq!(editor.mode(), TrackingMode::Active);

    Ok(())
}

#[test]
fn reject_restores_label_set_exactly() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    let crime = TagId::new();
    let original = vec![Tag::label("Crime").with_id(crime), Tag::label("Drama")];
    editor.set_field("genres", original.clone().into())?;

    editor.begin_import(
        &ItemDocument::new().with_field("genres", vec![Tag::label("Crime"), Tag::label("Thriller")]),
    )?;
    editor.reject_field("genres")?;

    assert_eq!(editor.field("genres"), Some(&FieldValue::Labels(original)));
    assert!(editor.dirty());

    Ok(())
}

#[test]
fn reimport_of_pending_field_keeps_first_pre_import_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "B"))?;
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;
    assert_eq!(editor.reconciler().pre_import_value("title"), Some(&text("A")));

    editor.reject_field("title")?;
    assert_eq!(editor.field("title"), Some(&text("A")));

    Ok(())
}

#[test]
fn reimport_of_accepted_field_restages_from_accepted_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "B"))?;
    editor.accept_field("title")?;

    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;
    assert_eq!(editor.review_state("title"), ReviewState::PendingReview);
    assert!(!editor.dirty());

    editor.reject_field("title")?;
    assert_eq!(editor.field("title"), Some(&text("B")));
    assert!(editor.dirty());

    Ok(())
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn save_clears_review_state() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(
        &ItemDocument::new()
            .with_field("title", "C")
            .with_field("year", 2001i64),
    )?;
    editor.accept_field("title")?;

    editor.save_completed()?;
    assert!(!editor.dirty());
    assert!(!editor.has_pending_review());
    assert_eq!(editor.review_state("title"), ReviewState::NotStaged);
    assert_eq!(editor.review_state("year"), ReviewState::NotStaged);
    assert!(matches!(
        editor.reject_field("year"),
        Err(EngineError::InvalidReconciliationState { .. })
    ));

    Ok(())
}

#[test]
fn loading_another_item_drops_pending_review() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;

    editor.load(ItemId::new(), movie());
    assert_eq!(editor.mode(), TrackingMode::Active);
    assert!(editor.pending_fields().is_empty());
    assert!(editor.reconciler().pre_import_value("title").is_none());
    assert_eq!(editor.field("title"), Some(&text("A")));

    Ok(())
}

#[test]
fn clear_drops_pending_review() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = loaded();
    editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;

    editor.clear();
    assert_eq!(editor.mode(), TrackingMode::Idle);
    assert!(!editor.has_pending_review());

    Ok(())
}

#[test]
fn full_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let mut test = TestEditor::new(EditorConfig::default());
    let item_id = test.open_new(ItemDocument::new().with_field("title", "A"))?;
    assert!(!test.save_enabled());

    test.edit("title", "B")?;
    assert!(test.save_enabled());

    test.editor.begin_import(&ItemDocument::new().with_field("title", "C"))?;
    assert_eq!(test.editor.field("title"), Some(&text("C")));
    assert!(!test.save_enabled());

    assert!(test.reject("title"));
    assert_eq!(test.editor.field("title"), Some(&text("B")));
    assert!(test.save_enabled());

    test.save()?;
    assert!(!test.save_enabled());
    assert_eq!(test.catalog.save_count(), 1);
    assert_eq!(test.catalog.fetch(item_id)?.get("title"), Some(&text("B")));
    assert_eq!(test.dirty_transitions(), vec![true, false, true, false]);

    Ok(())
}

#[test]
fn stale_review_controls_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let mut test = TestEditor::new(EditorConfig::default());
    test.open_new(movie())?;

    assert!(!test.accept("title"));
    assert!(!test.reject("title"));
    assert!(!test.save_enabled());

    Ok(())
}

// ============================================================================
// Import Files
// ============================================================================

#[test]
fn export_then_import_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut test = TestEditor::new(EditorConfig::default());
    let studio = TagId::new();
    test.open_new(movie().with_field("studios", vec![Tag::label("Warner").with_id(studio)]))?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("item.json");
    test.export_file(&path)?;

    test.edit("title", "Local title")?;
    test.edit("studios", vec![Tag::label("Warner")])?;

    let staged = test.import_file(&path)?;
    assert_eq!(staged.len(), 5);
    assert_eq!(test.editor.field("title"), Some(&text("A")));
    assert_eq!(
        test.editor.field("studios"),
        Some(&FieldValue::Labels(vec![Tag::label("Warner").with_id(studio)]))
    );
    assert!(!test.save_enabled());

    assert!(test.reject("title"));
    assert!(test.accept("studios"));
    for name in ["overview", "year", "genres"] {
        assert!(test.accept(name));
    }
    assert!(test.save_enabled());
    assert_eq!(test.editor.field("title"), Some(&text("Local title")));

    Ok(())
}

#[test]
fn import_hand_written_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut test = TestEditor::new(EditorConfig::default());
    test.open_new(movie())?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("import.json");
    fs::write(
        &path,
        r#"{
            "fields": {
                "title": { "kind": "text", "value": "Imported" },
                "genres": { "kind": "labels", "value": [
                    { "kind": "label", "name": "Noir" },
                    { "kind": "pair", "key": "Tmdb", "value": "603" }
                ] }
            }
        }"#,
    )?;

    let staged = test.import_file(&path)?;
    assert_eq!(staged, vec!["genres".to_string(), "title".to_string()]);
    assert_eq!(
        test.editor.field("genres"),
        Some(&FieldValue::Labels(vec![Tag::label("Noir"), Tag::pair("Tmdb", "603")]))
    );

    Ok(())
}

#[test]
fn malformed_import_file_is_a_core_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut test = TestEditor::new(EditorConfig::default());
    test.open_new(movie())?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"fields\": { \"title\": 42 } }")?;

    let err = test.import_file(&path).unwrap_err();
    assert!(matches!(err, HarnessError::Core(CoreError::Serialization(_))));
    assert!(!test.editor.has_pending_review());

    let err = test.import_file(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, HarnessError::Io(_)));

    Ok(())
}

#[test]
fn blank_field_name_is_invalid_data() {
    let err = ItemDocument::from_json(r#"{"fields": {" ": {"kind": "null"}}}"#).unwrap_err();
    assert!(matches!(err, CoreError::InvalidData(_)));
}
