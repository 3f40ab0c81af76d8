//! # Document Actions
//!
//! Reducer-style state transitions on the editor's [`AppState`].
//!
//! ## Design Principles
//!
//! 1. **Resilient**: Out-of-range source positions are no-ops, destination
//!    indices are clamped. Drag previews race against state updates and must
//!    never fail on a stale index.
//! 2. **Atomic**: Callers apply actions to a copy; an error leaves the live
//!    state untouched.
//! 3. **History-aware**: Structural actions carry `recordHistory`. The reducer
//!    applies provisional actions the same way, the session just does not
//!    record the result.
//!
//! ## Index Semantics
//!
//! - `insert` indexes into the pre-insertion sequence
//! - `reorder`/`move` index into the post-removal sequence
//! - A destination equal to the zone length appends

use dropzone_document::{
    zone_key, AppState, ComponentItem, Data, IdGenerator, Props, PropValue, UiPatch,
};
use crate::zone_cache::ZoneCache;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Editor actions, dispatched through [`crate::EditSession::dispatch`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Create a new item of `component_type` at a position
    #[serde(rename_all = "camelCase")]
    Insert {
        component_type: String,
        destination_zone: String,
        destination_index: usize,
        /// Initial props; an `id` here is used instead of a generated one
        #[serde(default)]
        props: Props,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Overwrite the item at a position
    #[serde(rename_all = "camelCase")]
    Replace {
        destination_zone: String,
        destination_index: usize,
        data: ComponentItem,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Move an item within a single zone
    #[serde(rename_all = "camelCase")]
    Reorder {
        destination_zone: String,
        source_index: usize,
        destination_index: usize,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Move an item from one zone to another
    #[serde(rename_all = "camelCase")]
    Move {
        source_zone: String,
        source_index: usize,
        destination_zone: String,
        destination_index: usize,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Remove an item together with every zone it owns
    #[serde(rename_all = "camelCase")]
    Remove {
        zone: String,
        index: usize,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Copy an item (and its zones) directly after itself
    #[serde(rename_all = "camelCase")]
    Duplicate {
        source_zone: String,
        source_index: usize,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Merge a patch into the UI state
    SetUi { ui: UiPatch },

    /// Replace the document, keeping UI state
    #[serde(rename_all = "camelCase")]
    SetData {
        data: Data,
        #[serde(default = "default_true")]
        record_history: bool,
    },

    /// Replace the whole state (undo/redo navigation)
    Set { state: AppState },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Cannot resolve insertion point in zone {zone:?} at index {index}")]
    UnresolvableZone { zone: String, index: usize },

    #[error("Item {item_id} cannot be placed in zone {zone} which it owns")]
    CycleDetected { item_id: String, zone: String },
}

impl Action {
    /// Whether the session should record the resulting state into history
    pub fn records_history(&self) -> bool {
        match self {
            Action::Insert { record_history, .. }
            | Action::Replace { record_history, .. }
            | Action::Reorder { record_history, .. }
            | Action::Move { record_history, .. }
            | Action::Remove { record_history, .. }
            | Action::Duplicate { record_history, .. }
            | Action::SetData { record_history, .. } => *record_history,
            Action::SetUi { .. } | Action::Set { .. } => false,
        }
    }

    /// Debug name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Action::Insert { .. } => "insert",
            Action::Replace { .. } => "replace",
            Action::Reorder { .. } => "reorder",
            Action::Move { .. } => "move",
            Action::Remove { .. } => "remove",
            Action::Duplicate { .. } => "duplicate",
            Action::SetUi { .. } => "setUi",
            Action::SetData { .. } => "setData",
            Action::Set { .. } => "set",
        }
    }

    /// Apply the action to `state`
    ///
    /// `ids` supplies fresh item ids for `insert` and `duplicate`. Ids held by
    /// `cache` count as taken, so a zone restored later cannot collide.
    pub fn apply(
        &self,
        state: &mut AppState,
        ids: &mut IdGenerator,
        cache: &ZoneCache,
    ) -> Result<(), ActionError> {
        self.validate(&state.data)?;

        match self {
            Action::Insert {
                component_type,
                destination_zone,
                destination_index,
                props,
                ..
            } => {
                Self::apply_insert(
                    &mut state.data,
                    ids,
                    cache,
                    component_type,
                    destination_zone,
                    *destination_index,
                    props,
                );
                Ok(())
            }

            Action::Replace {
                destination_zone,
                destination_index,
                data,
                ..
            } => {
                if let Some(slot) = state
                    .data
                    .zone_mut(destination_zone)
                    .and_then(|items| items.get_mut(*destination_index))
                {
                    *slot = data.clone();
                }
                Ok(())
            }

            Action::Reorder {
                destination_zone,
                source_index,
                destination_index,
                ..
            } => {
                Self::apply_move(
                    &mut state.data,
                    destination_zone,
                    *source_index,
                    destination_zone,
                    *destination_index,
                );
                Ok(())
            }

            Action::Move {
                source_zone,
                source_index,
                destination_zone,
                destination_index,
                ..
            } => {
                Self::apply_move(
                    &mut state.data,
                    source_zone,
                    *source_index,
                    destination_zone,
                    *destination_index,
                );
                Ok(())
            }

            Action::Remove { zone, index, .. } => {
                Self::apply_remove(&mut state.data, zone, *index);
                Ok(())
            }

            Action::Duplicate {
                source_zone,
                source_index,
                ..
            } => {
                Self::apply_duplicate(&mut state.data, ids, cache, source_zone, *source_index);
                Ok(())
            }

            Action::SetUi { ui } => {
                state.ui.merge(ui);
                Ok(())
            }

            Action::SetData { data, .. } => {
                state.data = data.clone();
                Ok(())
            }

            Action::Set { state: next } => {
                *state = next.clone();
                Ok(())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, data: &Data) -> Result<(), ActionError> {
        match self {
            Action::Insert {
                destination_zone,
                destination_index,
                props,
                ..
            } => {
                check_zone(destination_zone, *destination_index)?;

                // A supplied id is kept only when unused, so only then can it own the zone
                match props.get("id").and_then(PropValue::as_str) {
                    Some(id) if !id.is_empty() && !data.contains_id(id) => {
                        check_not_within(data, destination_zone, id)
                    }
                    _ => Ok(()),
                }
            }

            Action::Replace {
                destination_zone,
                destination_index,
                data: item,
                ..
            } => {
                check_zone(destination_zone, *destination_index)?;
                match item.id() {
                    Some(id) => check_not_within(data, destination_zone, id),
                    None => Ok(()),
                }
            }

            Action::Reorder {
                destination_zone,
                destination_index,
                ..
            } => check_zone(destination_zone, *destination_index),

            Action::Move {
                source_zone,
                source_index,
                destination_zone,
                destination_index,
                ..
            } => {
                check_zone(source_zone, *source_index)?;
                check_zone(destination_zone, *destination_index)?;

                // Moving a container into one of its own zones would orphan it
                match data
                    .get_item(source_zone, *source_index)
                    .and_then(ComponentItem::id)
                {
                    Some(item_id) => check_not_within(data, destination_zone, item_id),
                    None => Ok(()),
                }
            }

            Action::Remove { zone, index, .. } => check_zone(zone, *index),

            Action::Duplicate {
                source_zone,
                source_index,
                ..
            } => check_zone(source_zone, *source_index),

            Action::SetUi { .. } | Action::SetData { .. } | Action::Set { .. } => Ok(()),
        }
    }

    fn apply_insert(
        data: &mut Data,
        ids: &mut IdGenerator,
        cache: &ZoneCache,
        component_type: &str,
        zone: &str,
        index: usize,
        props: &Props,
    ) {
        let mut item = ComponentItem::with_props(component_type, props.clone());

        match item.id().map(str::to_string) {
            Some(id) if !id.is_empty() && !data.contains_id(&id) && !cache.contains_id(&id) => {}
            Some(id) if !id.is_empty() => {
                tracing::warn!("insert: id {} already in use, generating a new one", id);
                item.set_id(fresh_id(data, cache, ids, component_type));
            }
            _ => item.set_id(fresh_id(data, cache, ids, component_type)),
        }

        let items = data.zone_entry(zone);
        let insert_index = index.min(items.len());
        items.insert(insert_index, item);
    }

    fn apply_move(
        data: &mut Data,
        source_zone: &str,
        source_index: usize,
        destination_zone: &str,
        destination_index: usize,
    ) {
        let Some(source) = data.zone_mut(source_zone) else {
            return;
        };
        if source_index >= source.len() {
            return;
        }

        let item = source.remove(source_index);
        let destination = data.zone_entry(destination_zone);
        let insert_index = destination_index.min(destination.len());
        destination.insert(insert_index, item);
    }

    fn apply_remove(data: &mut Data, zone: &str, index: usize) {
        let Some(items) = data.zone_mut(zone) else {
            return;
        };
        if index >= items.len() {
            return;
        }

        let removed = items.remove(index);
        if let Some(id) = removed.id() {
            remove_owned_zones(data, id);
        }
    }

    fn apply_duplicate(
        data: &mut Data,
        ids: &mut IdGenerator,
        cache: &ZoneCache,
        zone: &str,
        index: usize,
    ) {
        let Some(original) = data.get_item(zone, index).cloned() else {
            return;
        };

        let mut copier = ZoneCopier {
            data: &*data,
            cache,
            ids,
            visited: HashSet::new(),
            copied_zones: Vec::new(),
        };
        let copy = copier.duplicate_item(&original);
        let copied_zones = copier.copied_zones;

        data.zone_entry(zone).insert(index + 1, copy);
        for (name, items) in copied_zones {
            data.zones.insert(name, items);
        }
    }
}

fn default_true() -> bool {
    true
}

fn check_zone(zone: &str, index: usize) -> Result<(), ActionError> {
    if zone.is_empty() {
        return Err(ActionError::UnresolvableZone {
            zone: zone.to_string(),
            index,
        });
    }
    Ok(())
}

fn check_not_within(data: &Data, zone: &str, item_id: &str) -> Result<(), ActionError> {
    if data.is_zone_within(zone, item_id) {
        return Err(ActionError::CycleDetected {
            item_id: item_id.to_string(),
            zone: zone.to_string(),
        });
    }
    Ok(())
}

/// Generate an id used neither in the document nor in the zone cache
pub(crate) fn fresh_id(
    data: &Data,
    cache: &ZoneCache,
    ids: &mut IdGenerator,
    component_type: &str,
) -> String {
    loop {
        let id = ids.new_id(component_type);
        if !data.contains_id(&id) && !cache.contains_id(&id) {
            return id;
        }
    }
}

fn remove_owned_zones(data: &mut Data, item_id: &str) {
    for name in data.child_zones(item_id) {
        if let Some(items) = data.zones.remove(&name) {
            for item in items {
                if let Some(id) = item.id() {
                    remove_owned_zones(data, id);
                }
            }
        }
    }
}

/// Deep copy of an item subtree, each source zone copied at most once
struct ZoneCopier<'a> {
    data: &'a Data,
    cache: &'a ZoneCache,
    ids: &'a mut IdGenerator,
    visited: HashSet<String>,
    copied_zones: Vec<(String, Vec<ComponentItem>)>,
}

impl ZoneCopier<'_> {
    /// Copy an item under a fresh id, collecting copies of its zones
    fn duplicate_item(&mut self, item: &ComponentItem) -> ComponentItem {
        let mut copy = item.clone();
        let new_id = fresh_id(self.data, self.cache, self.ids, &item.component_type);
        copy.set_id(new_id.clone());

        let data = self.data;
        if let Some(old_id) = item.id() {
            let prefix_len = old_id.len() + 1;
            for name in data.child_zones(old_id) {
                if !self.visited.insert(name.clone()) {
                    continue;
                }
                let area = &name[prefix_len..];
                let children = data
                    .zone(&name)
                    .map(|items| items.iter().map(|child| self.duplicate_item(child)).collect())
                    .unwrap_or_default();
                self.copied_zones.push((zone_key(&new_id, area), children));
            }
        }

        copy
    }
}

/// Props for a drag placeholder carrying a transient id
pub(crate) fn placeholder_props(drag_id: &str) -> Props {
    let mut props = Props::new();
    props.insert("id".to_string(), PropValue::String(drag_id.to_string()));
    props.insert(
        dropzone_document::PLACEHOLDER_PROP.to_string(),
        PropValue::Bool(true),
    );
    props
}
