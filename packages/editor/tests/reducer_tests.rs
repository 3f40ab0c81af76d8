//! Reducer action tests

use dropzone_editor::document::{AppState, ComponentItem, Data, IdGenerator, Props, ROOT_ZONE};
use dropzone_editor::{Action, ZoneCache};
use serde_json::json;

fn item(id: &str) -> ComponentItem {
    ComponentItem::new("Text", id)
}

fn state(zones: &[(&str, &[&str])]) -> AppState {
    let mut data = Data::new();
    for (zone, ids) in zones {
        let items = data.zone_entry(zone);
        items.extend(ids.iter().map(|id| item(id)));
    }
    AppState::new(data)
}

fn ids_in(state: &AppState, zone: &str) -> Vec<String> {
    state
        .data
        .zone(zone)
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.id().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn insert_at(zone: &str, index: usize) -> Action {
    Action::Insert {
        component_type: "Heading".to_string(),
        destination_zone: zone.to_string(),
        destination_index: index,
        props: Props::new(),
        record_history: true,
    }
}

fn apply(state: &mut AppState, action: Action) {
    let mut ids = IdGenerator::new("reducer-tests");
    action.apply(state, &mut ids, &ZoneCache::new()).unwrap();
}

#[test]
fn test_insert_append_prepend_and_clamp() {
    let mut s = state(&[(ROOT_ZONE, &["a", "b"])]);

    apply(&mut s, insert_at(ROOT_ZONE, 2));
    assert_eq!(s.data.content.len(), 3);
    assert_eq!(s.data.content[2].component_type, "Heading");

    apply(&mut s, insert_at(ROOT_ZONE, 0));
    assert_eq!(s.data.content[0].component_type, "Heading");
    assert_eq!(ids_in(&s, ROOT_ZONE)[1..3], ["a".to_string(), "b".to_string()]);

    apply(&mut s, insert_at(ROOT_ZONE, 99));
    assert_eq!(s.data.content.len(), 5);
    assert_eq!(s.data.content[4].component_type, "Heading");
    assert!(s.data.validate().is_ok());
}

#[test]
fn test_insert_creates_missing_zone() {
    let mut s = state(&[(ROOT_ZONE, &["a"])]);

    apply(&mut s, insert_at("a:content", 5));

    assert_eq!(s.data.zone_len("a:content"), 1);
    let id = s.data.zone("a:content").unwrap()[0].id().unwrap();
    assert!(id.starts_with("Heading-"));
}

#[test]
fn test_replace_and_out_of_bounds() {
    let mut s = state(&[(ROOT_ZONE, &["a", "b"])]);
    let mut replacement = item("a");
    replacement.props.insert("text".to_string(), json!("Hello"));

    apply(
        &mut s,
        Action::Replace {
            destination_zone: ROOT_ZONE.to_string(),
            destination_index: 0,
            data: replacement.clone(),
            record_history: true,
        },
    );
    assert_eq!(s.data.content[0], replacement);

    let before = s.clone();
    apply(
        &mut s,
        Action::Replace {
            destination_zone: ROOT_ZONE.to_string(),
            destination_index: 7,
            data: item("z"),
            record_history: true,
        },
    );
    assert_eq!(s, before);
}

#[test]
fn test_reorder_preserves_ids() {
    let mut s = state(&[(ROOT_ZONE, &["a", "b", "c"])]);

    apply(
        &mut s,
        Action::Reorder {
            destination_zone: ROOT_ZONE.to_string(),
            source_index: 0,
            destination_index: 2,
            record_history: true,
        },
    );

    assert_eq!(ids_in(&s, ROOT_ZONE), vec!["b", "c", "a"]);
}

#[test]
fn test_reorder_out_of_bounds_is_noop() {
    let mut s = state(&[(ROOT_ZONE, &["a", "b"])]);
    let before = s.clone();

    apply(
        &mut s,
        Action::Reorder {
            destination_zone: ROOT_ZONE.to_string(),
            source_index: 5,
            destination_index: 0,
            record_history: true,
        },
    );

    assert_eq!(s, before);
}

#[test]
fn test_self_reorder_leaves_document_unchanged() {
    let mut s = state(&[(ROOT_ZONE, &["a"])]);
    let before = s.clone();

    apply(
        &mut s,
        Action::Reorder {
            destination_zone: ROOT_ZONE.to_string(),
            source_index: 0,
            destination_index: 0,
            record_history: true,
        },
    );

    assert_eq!(s, before);
}

#[test]
fn test_move_across_zones_preserves_count() {
    let mut s = state(&[("x:content", &["x1", "x2", "x3"]), ("y:content", &["y1", "y2"])]);
    let total = s.data.item_count();

    apply(
        &mut s,
        Action::Move {
            source_zone: "x:content".to_string(),
            source_index: 1,
            destination_zone: "y:content".to_string(),
            destination_index: 1,
            record_history: true,
        },
    );

    assert_eq!(s.data.zone_len("x:content"), 2);
    assert_eq!(s.data.zone_len("y:content"), 3);
    assert_eq!(s.data.item_count(), total);
    assert_eq!(ids_in(&s, "y:content"), vec!["y1", "x2", "y2"]);
}

#[test]
fn test_move_clamps_destination() {
    let mut s = state(&[(ROOT_ZONE, &["a", "b"]), ("b:content", &[])]);

    apply(
        &mut s,
        Action::Move {
            source_zone: ROOT_ZONE.to_string(),
            source_index: 0,
            destination_zone: "b:content".to_string(),
            destination_index: 42,
            record_history: true,
        },
    );

    assert_eq!(ids_in(&s, ROOT_ZONE), vec!["b"]);
    assert_eq!(ids_in(&s, "b:content"), vec!["a"]);
}

#[test]
fn test_set_ui_does_not_touch_data() {
    let mut s = state(&[(ROOT_ZONE, &["a"])]);
    let data_before = s.data.clone();

    let action: Action = serde_json::from_value(json!({
        "type": "setUi",
        "ui": { "itemSelector": { "zone": "root", "index": 0 } }
    }))
    .unwrap();
    apply(&mut s, action);

    assert_eq!(s.data, data_before);
    assert_eq!(s.ui.item_selector.as_ref().map(|sel| sel.index), Some(0));
}

#[test]
fn test_set_replaces_everything() {
    let mut s = state(&[(ROOT_ZONE, &["a"])]);
    let next = state(&[(ROOT_ZONE, &["b", "c"])]);

    apply(&mut s, Action::Set { state: next.clone() });

    assert_eq!(s, next);
}
