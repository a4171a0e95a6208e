#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

fn make_note(z: i64) -> Note {
    make_note_with_id(Uuid::new_v4(), z)
}

fn make_note_with_id(id: Uuid, z: i64) -> Note {
    Note {
        id,
        x: 0.0,
        y: 0.0,
        width: 200.0,
        height: 150.0,
        content: "hello".to_owned(),
        color: "hsl(120, 70%, 80%)".to_owned(),
        rotation: 0.0,
        z_index: z,
        decor_mode: false,
    }
}

// =============================================================
// Note
// =============================================================

#[test]
fn text_content_is_not_image() {
    assert!(!make_note(1).is_image());
}

#[test]
fn data_uri_content_is_image() {
    let note = Note { content: "data:image/png;base64,AAAA".to_owned(), ..make_note(1) };
    assert!(note.is_image());
}

#[test]
fn center_follows_position_and_size() {
    let note = Note { x: 10.0, y: 20.0, width: 100.0, height: 40.0, ..make_note(1) };
    assert_eq!(note.center(), Point::new(60.0, 40.0));
}

#[test]
fn effective_z_index_lifts_active_note() {
    let note = make_note(3);
    assert_eq!(note.effective_z_index(None), 3);
    assert_eq!(note.effective_z_index(Some(Uuid::new_v4())), 3);
    assert_eq!(note.effective_z_index(Some(note.id)), ACTIVE_Z_INDEX);
}

#[test]
fn to_record_fills_optional_fields() {
    let note = Note { rotation: 370.0, z_index: 4, decor_mode: true, ..make_note(4) };
    let record = note.to_record();
    assert_eq!(record.id, note.id);
    assert_eq!(record.rotation, Some(370.0));
    assert_eq!(record.z_index, Some(4));
    assert_eq!(record.decor_mode, Some(true));
}

#[test]
fn from_record_applies_defaults() {
    let record = NoteRecord {
        id: Uuid::nil(),
        content: "x".to_owned(),
        x: 1.0,
        y: 2.0,
        width: 30.0,
        height: 40.0,
        color: "#fff".to_owned(),
        rotation: None,
        z_index: None,
        decor_mode: None,
    };
    let note = Note::from(record);
    assert_eq!(note.rotation, 0.0);
    assert_eq!(note.z_index, 1);
    assert!(!note.decor_mode);
}

#[test]
fn from_record_repairs_bad_geometry() {
    let record = NoteRecord {
        id: Uuid::nil(),
        content: String::new(),
        x: f64::NAN,
        y: 5.0,
        width: 0.0,
        height: -3.0,
        color: String::new(),
        rotation: Some(f64::INFINITY),
        z_index: Some(-2),
        decor_mode: Some(false),
    };
    let note = Note::from(record);
    assert_eq!(note.x, 0.0);
    assert_eq!(note.width, 200.0);
    assert_eq!(note.height, 150.0);
    assert_eq!(note.rotation, 0.0);
    assert_eq!(note.z_index, 0);
}

// =============================================================
// NoteRecord serde
// =============================================================

#[test]
fn record_uses_stored_field_names() {
    let record = make_note_with_id(Uuid::nil(), 2).to_record();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["zIndex"], json!(2));
    assert_eq!(value["decorMode"], json!(false));
    assert!(value.get("z_index").is_none());
}

#[test]
fn record_omits_absent_optionals() {
    let value = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "content": "hi",
        "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0,
        "color": "red"
    });
    let record: NoteRecord = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(record.rotation, None);
    assert_eq!(serde_json::to_value(&record).unwrap(), value);
}

#[test]
fn record_missing_required_field_rejects() {
    let value = json!({ "id": "00000000-0000-0000-0000-000000000000", "content": "hi" });
    assert!(serde_json::from_value::<NoteRecord>(value).is_err());
}

// =============================================================
// DocStore
// =============================================================

#[test]
fn new_store_is_empty() {
    let store = DocStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn insert_and_get() {
    let mut store = DocStore::new();
    let note = make_note(1);
    let id = note.id;
    store.insert(note);
    assert_eq!(store.get(&id).map(|n| n.id), Some(id));
}

#[test]
fn insert_same_id_overwrites() {
    let mut store = DocStore::new();
    let id = Uuid::new_v4();
    store.insert(make_note_with_id(id, 1));
    store.insert(Note { content: "second".to_owned(), ..make_note_with_id(id, 1) });
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&id).map(|n| n.content.as_str()), Some("second"));
}

#[test]
fn remove_returns_note() {
    let mut store = DocStore::new();
    let note = make_note(1);
    let id = note.id;
    store.insert(note);
    assert!(store.remove(&id).is_some());
    assert!(store.remove(&id).is_none());
    assert!(store.is_empty());
}

#[test]
fn apply_partial_missing_returns_false() {
    let mut store = DocStore::new();
    assert!(!store.apply_partial(&Uuid::new_v4(), &PartialNote::position(1.0, 1.0)));
}

#[test]
fn apply_partial_updates_only_present_fields() {
    let mut store = DocStore::new();
    let note = make_note(1);
    let id = note.id;
    store.insert(note);

    assert!(store.apply_partial(&id, &PartialNote::position(5.0, -7.0)));
    let n = store.get(&id).unwrap();
    assert_eq!((n.x, n.y), (5.0, -7.0));
    assert_eq!((n.width, n.height), (200.0, 150.0));
    assert_eq!(n.content, "hello");
}

#[test]
fn apply_partial_all_fields() {
    let mut store = DocStore::new();
    let note = make_note(1);
    let id = note.id;
    store.insert(note);

    let partial = PartialNote {
        x: Some(1.0),
        y: Some(2.0),
        width: Some(3.0),
        height: Some(4.0),
        content: Some("new".to_owned()),
        color: Some("blue".to_owned()),
        rotation: Some(-45.0),
        z_index: Some(9),
        decor_mode: Some(true),
    };
    assert!(store.apply_partial(&id, &partial));
    let n = store.get(&id).unwrap();
    assert_eq!(n.width, 3.0);
    assert_eq!(n.content, "new");
    assert_eq!(n.color, "blue");
    assert_eq!(n.rotation, -45.0);
    assert_eq!(n.z_index, 9);
    assert!(n.decor_mode);
}

#[test]
fn apply_partial_keeps_invariants() {
    let mut store = DocStore::new();
    let note = make_note(1);
    let id = note.id;
    store.insert(note);

    store.apply_partial(&id, &PartialNote { width: Some(-10.0), z_index: Some(-4), ..Default::default() });
    let n = store.get(&id).unwrap();
    assert!(n.width > 0.0);
    assert_eq!(n.z_index, 0);
}

#[test]
fn load_snapshot_replaces_everything() {
    let mut store = DocStore::new();
    store.insert(make_note(1));
    let fresh = vec![make_note(1), make_note(2)];
    store.load_snapshot(fresh);
    assert_eq!(store.len(), 2);
}

#[test]
fn sorted_notes_by_z_then_id() {
    let mut store = DocStore::new();
    let low = make_note_with_id(Uuid::from_u128(9), 0);
    let mid_a = make_note_with_id(Uuid::from_u128(1), 2);
    let mid_b = make_note_with_id(Uuid::from_u128(2), 2);
    let high = make_note_with_id(Uuid::from_u128(3), 5);
    for n in [high.clone(), mid_b.clone(), low.clone(), mid_a.clone()] {
        store.insert(n);
    }
    let order: Vec<NoteId> = store.sorted_notes(None).iter().map(|n| n.id).collect();
    assert_eq!(order, vec![low.id, mid_a.id, mid_b.id, high.id]);
}

#[test]
fn sorted_notes_puts_active_last() {
    let mut store = DocStore::new();
    let bottom = make_note_with_id(Uuid::from_u128(1), 0);
    let top = make_note_with_id(Uuid::from_u128(2), 50);
    store.insert(bottom.clone());
    store.insert(top.clone());
    let order: Vec<NoteId> = store.sorted_notes(Some(bottom.id)).iter().map(|n| n.id).collect();
    assert_eq!(order, vec![top.id, bottom.id]);
}

#[test]
fn active_note_outranks_any_stored_z() {
    let mut store = DocStore::new();
    let picked = make_note_with_id(Uuid::from_u128(1), 0);
    let raised = make_note_with_id(Uuid::from_u128(2), ACTIVE_Z_INDEX + 1);
    store.insert(picked.clone());
    store.insert(raised.clone());
    let order: Vec<NoteId> = store.sorted_notes(Some(picked.id)).iter().map(|n| n.id).collect();
    assert_eq!(order, vec![raised.id, picked.id]);
}

#[test]
fn records_cover_every_note() {
    let mut store = DocStore::new();
    store.insert(make_note(1));
    store.insert(make_note(2));
    assert_eq!(store.records().len(), 2);
}
