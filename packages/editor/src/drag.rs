//! # Drag Gesture Translator
//!
//! Turns drag lifecycle events into document actions.
//!
//! ```text
//!          begin              end
//!   Idle ─────────► Dragging ─────► Idle
//!                    │    ▲
//!                    └────┘ over (provisional actions)
//! ```
//!
//! Every `over` produces one provisional action (`recordHistory: false`)
//! that previews the drop. Only `end` produces a recorded action, so a whole
//! drag becomes a single history entry.
//!
//! The translator never mutates state itself: each event returns the actions
//! the caller should dispatch, in order.

use crate::actions::{fresh_id, placeholder_props, Action};
use crate::zone_cache::ZoneCache;
use dropzone_document::{Data, IdGenerator, UiPatch};
use serde::{Deserialize, Serialize};

/// Id prefix marking a descriptor as a zone container rather than an item
pub const ZONE_TARGET_PREFIX: &str = "zone:";

/// What kind of thing is being dragged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    /// A new component dragged in from the component drawer
    Drawer,

    /// An item already in the document
    #[default]
    #[serde(other)]
    Component,
}

/// Data bag attached to a gesture descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorData {
    #[serde(default)]
    pub group: Option<String>,

    #[serde(default)]
    pub index: Option<usize>,

    #[serde(rename = "type", default)]
    pub kind: DescriptorKind,

    #[serde(default)]
    pub component_type: Option<String>,
}

/// Drag source or drop target as reported by the pointer-tracking layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: String,

    #[serde(default)]
    pub data: DescriptorData,
}

impl Descriptor {
    /// An existing item at `group[index]`
    pub fn item(id: impl Into<String>, group: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            data: DescriptorData {
                group: Some(group.into()),
                index: Some(index),
                ..DescriptorData::default()
            },
        }
    }

    /// A new component of `component_type`, identified by a transient drag id
    pub fn drawer(drag_id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: drag_id.into(),
            data: DescriptorData {
                kind: DescriptorKind::Drawer,
                component_type: Some(component_type.into()),
                ..DescriptorData::default()
            },
        }
    }

    /// A zone container accepting drops
    pub fn zone(name: &str) -> Self {
        Self {
            id: format!("{}{}", ZONE_TARGET_PREFIX, name),
            data: DescriptorData::default(),
        }
    }

    /// Zone name when this descriptor is a zone container
    pub fn zone_target(&self) -> Option<&str> {
        self.id.strip_prefix(ZONE_TARGET_PREFIX)
    }

    pub fn is_new_component(&self) -> bool {
        self.data.kind == DescriptorKind::Drawer
    }
}

/// A drag lifecycle event as delivered by the gesture layer
pub trait DragOperation {
    fn source(&self) -> Option<&Descriptor>;

    fn target(&self) -> Option<&Descriptor>;

    /// Disable the gesture layer's own optimistic reordering
    fn prevent_default(&mut self);
}

/// Plain [`DragOperation`] carrying its descriptors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    #[serde(default)]
    pub source: Option<Descriptor>,

    #[serde(default)]
    pub target: Option<Descriptor>,

    #[serde(skip)]
    pub default_prevented: bool,
}

impl GestureEvent {
    pub fn new(source: Option<Descriptor>, target: Option<Descriptor>) -> Self {
        Self {
            source,
            target,
            default_prevented: false,
        }
    }
}

impl DragOperation for GestureEvent {
    fn source(&self) -> Option<&Descriptor> {
        self.source.as_ref()
    }

    fn target(&self) -> Option<&Descriptor> {
        self.target.as_ref()
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Zone + index coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub zone: String,
    pub index: usize,
}

#[derive(Debug, Clone)]
struct DraggedItem {
    /// Id of the dragged item (the drag id for drawer sources)
    item_id: String,

    /// Component type for drawer sources
    component_type: Option<String>,

    is_new: bool,

    /// Where the dragged item currently sits; `None` until a drawer
    /// placeholder has been inserted
    position: Option<Position>,

    /// Data at drag start, restored when the drag is abandoned
    snapshot: Data,

    /// Whether any provisional action was emitted
    dirty: bool,
}

impl DraggedItem {
    /// Current position, re-located by id when the tracked one is stale
    fn locate(&self, data: &Data) -> Option<Position> {
        if let Some(position) = &self.position {
            let matches = data
                .get_item(&position.zone, position.index)
                .and_then(|item| item.id())
                == Some(self.item_id.as_str());
            if matches {
                return Some(position.clone());
            }
        }

        match data.find_item(&self.item_id) {
            Some((zone, index)) => Some(Position {
                zone: zone.to_string(),
                index,
            }),
            None if self.is_new => None,
            None => self.position.clone(),
        }
    }

    /// Provisional action bringing the dragged item to `resolved`, plus the
    /// position it will land at after clamping
    fn reposition(&self, current: Option<&Position>, resolved: &Position, data: &Data) -> Option<(Action, Position)> {
        match current {
            None if self.is_new => {
                let component_type = self.component_type.clone()?;
                let landing = Position {
                    zone: resolved.zone.clone(),
                    index: resolved.index.min(data.zone_len(&resolved.zone)),
                };
                let action = Action::Insert {
                    component_type,
                    destination_zone: resolved.zone.clone(),
                    destination_index: resolved.index,
                    props: placeholder_props(&self.item_id),
                    record_history: false,
                };
                Some((action, landing))
            }
            None => None,
            Some(current) if current.zone == resolved.zone => {
                let last = data.zone_len(&current.zone).saturating_sub(1);
                let landing = Position {
                    zone: resolved.zone.clone(),
                    index: resolved.index.min(last),
                };
                let action = Action::Reorder {
                    destination_zone: resolved.zone.clone(),
                    source_index: current.index,
                    destination_index: resolved.index,
                    record_history: false,
                };
                Some((action, landing))
            }
            Some(current) => {
                let landing = Position {
                    zone: resolved.zone.clone(),
                    index: resolved.index.min(data.zone_len(&resolved.zone)),
                };
                let action = Action::Move {
                    source_zone: current.zone.clone(),
                    source_index: current.index,
                    destination_zone: resolved.zone.clone(),
                    destination_index: resolved.index,
                    record_history: false,
                };
                Some((action, landing))
            }
        }
    }

    /// Actions undoing every provisional change of this drag
    fn abandon(self) -> Vec<Action> {
        if !self.dirty {
            return Vec::new();
        }

        tracing::debug!("drag of {} abandoned, restoring pre-drag data", self.item_id);
        vec![Action::SetData {
            data: self.snapshot,
            record_history: false,
        }]
    }
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(Box<DraggedItem>),
}

/// Drag gesture state machine
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Position of the dragged item as last previewed
    pub fn dragged_position(&self) -> Option<&Position> {
        match &self.state {
            DragState::Dragging(drag) => drag.position.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Start dragging `source`; ignored while a drag is already active
    pub fn begin(&mut self, source: &Descriptor, data: &Data) -> Vec<Action> {
        if self.is_dragging() {
            tracing::warn!("drag start for {} ignored: already dragging", source.id);
            return Vec::new();
        }

        let position = match (&source.data.group, source.data.index) {
            (Some(group), Some(index)) if !source.is_new_component() => Some(Position {
                zone: group.clone(),
                index,
            }),
            _ => None,
        };

        tracing::debug!("drag start: {} ({:?})", source.id, source.data.kind);

        self.state = DragState::Dragging(Box::new(DraggedItem {
            item_id: source.id.clone(),
            component_type: source.data.component_type.clone(),
            is_new: source.is_new_component(),
            position,
            snapshot: data.clone(),
            dirty: false,
        }));

        vec![Action::SetUi {
            ui: UiPatch::clear_selection(),
        }]
    }

    /// Preview the drop at `target`
    pub fn over(&mut self, source: Option<&Descriptor>, target: Option<&Descriptor>, data: &Data) -> Vec<Action> {
        let DragState::Dragging(drag) = &mut self.state else {
            return Vec::new();
        };
        let (Some(_), Some(target)) = (source, target) else {
            return Vec::new();
        };
        let Some(resolved) = resolve_target(target, data) else {
            tracing::warn!("drag over {} ignored: target has no position", target.id);
            return Vec::new();
        };
        if data.is_zone_within(&resolved.zone, &drag.item_id) {
            return Vec::new();
        }

        let current = drag.locate(data);
        match drag.reposition(current.as_ref(), &resolved, data) {
            Some((action, landing)) => {
                tracing::trace!("drag over {}: {} to {:?}", target.id, action.name(), landing);
                drag.position = Some(landing);
                drag.dirty = true;
                vec![action]
            }
            None => Vec::new(),
        }
    }

    /// Finish the drag, committing the dragged item at `target`
    ///
    /// `ids` supplies the permanent id for a committed placeholder, avoiding
    /// ids held in `cache`.
    pub fn end(
        &mut self,
        source: Option<&Descriptor>,
        target: Option<&Descriptor>,
        data: &Data,
        ids: &mut IdGenerator,
        cache: &ZoneCache,
    ) -> Vec<Action> {
        let DragState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return Vec::new();
        };
        let drag = *drag;

        let (Some(_), Some(target)) = (source, target) else {
            return drag.abandon();
        };
        let Some(resolved) = resolve_target(target, data) else {
            return drag.abandon();
        };
        let Some(current) = drag.locate(data) else {
            return drag.abandon();
        };

        let mut actions = Vec::new();
        let mut position = current.clone();

        // Only reposition when the drop lands somewhere the last preview did not
        let moved_elsewhere = match target.zone_target() {
            Some(_) => resolved.zone != current.zone,
            None => resolved != current,
        };
        if moved_elsewhere && !data.is_zone_within(&resolved.zone, &drag.item_id) {
            if let Some((action, landing)) = drag.reposition(Some(&current), &resolved, data) {
                actions.push(action);
                position = landing;
            }
        }

        let Some(item) = data.get_item(&current.zone, current.index) else {
            return drag.abandon();
        };

        let mut committed = item.clone();
        if committed.is_placeholder() {
            committed.strip_placeholder();
            committed.set_id(fresh_id(data, cache, ids, &committed.component_type));
        }

        tracing::debug!(
            "drag end: committing {} at {}[{}]",
            committed.id().unwrap_or_default(),
            position.zone,
            position.index
        );

        actions.push(Action::Replace {
            destination_zone: position.zone,
            destination_index: position.index,
            data: committed,
            record_history: true,
        });
        actions
    }
}

/// Resolve a drop target into the zone + index it designates
///
/// Zone containers resolve to the end of that zone, items to their own slot.
pub fn resolve_target(target: &Descriptor, data: &Data) -> Option<Position> {
    if let Some(zone) = target.zone_target() {
        return Some(Position {
            zone: zone.to_string(),
            index: data.zone_len(zone),
        });
    }

    match (&target.data.group, target.data.index) {
        (Some(group), Some(index)) => Some(Position {
            zone: group.clone(),
            index,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropzone_document::{ComponentItem, ROOT_ZONE};

    fn root_data(ids: &[&str]) -> Data {
        let mut data = Data::new();
        for id in ids {
            data.content.push(ComponentItem::new("Text", *id));
        }
        data
    }

    #[test]
    fn test_descriptor_wire_format() {
        let source: Descriptor = serde_json::from_value(serde_json::json!({
            "id": "drawer-item-1",
            "data": { "type": "drawer", "componentType": "Heading" }
        }))
        .unwrap();
        assert!(source.is_new_component());

        let target: Descriptor = serde_json::from_value(serde_json::json!({
            "id": "a",
            "data": { "group": "root", "index": 0, "type": "component" }
        }))
        .unwrap();
        assert_eq!(target.data.kind, DescriptorKind::Component);
        assert!(target.zone_target().is_none());
    }

    #[test]
    fn test_zone_target_resolves_to_append() {
        let data = root_data(&["a", "b"]);
        let resolved = resolve_target(&Descriptor::zone(ROOT_ZONE), &data).unwrap();

        assert_eq!(
            resolved,
            Position {
                zone: ROOT_ZONE.to_string(),
                index: 2
            }
        );
    }

    #[test]
    fn test_begin_ignored_while_dragging() {
        let data = root_data(&["a"]);
        let mut drag = DragController::new();

        assert_eq!(drag.begin(&Descriptor::item("a", ROOT_ZONE, 0), &data).len(), 1);
        assert!(drag.begin(&Descriptor::item("a", ROOT_ZONE, 0), &data).is_empty());
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_over_without_target_is_ignored() {
        let data = root_data(&["a"]);
        let source = Descriptor::item("a", ROOT_ZONE, 0);
        let mut drag = DragController::new();

        assert!(drag.over(Some(&source), None, &data).is_empty());

        drag.begin(&source, &data);
        assert!(drag.over(Some(&source), None, &data).is_empty());
        assert!(drag.over(None, Some(&source), &data).is_empty());
    }

    #[test]
    fn test_over_same_zone_reorders() {
        let data = root_data(&["a", "b", "c"]);
        let source = Descriptor::item("a", ROOT_ZONE, 0);
        let mut drag = DragController::new();
        drag.begin(&source, &data);

        let actions = drag.over(Some(&source), Some(&Descriptor::item("c", ROOT_ZONE, 2)), &data);

        assert_eq!(
            actions,
            vec![Action::Reorder {
                destination_zone: ROOT_ZONE.to_string(),
                source_index: 0,
                destination_index: 2,
                record_history: false,
            }]
        );
        assert_eq!(drag.dragged_position().map(|p| p.index), Some(2));
    }

    #[test]
    fn test_over_own_zone_is_ignored() {
        let mut data = root_data(&["cols"]);
        data.zone_entry("cols:left");
        let source = Descriptor::item("cols", ROOT_ZONE, 0);
        let mut drag = DragController::new();
        drag.begin(&source, &data);

        assert!(drag
            .over(Some(&source), Some(&Descriptor::zone("cols:left")), &data)
            .is_empty());
    }

    #[test]
    fn test_end_without_target_after_preview_restores() {
        let data = root_data(&["a"]);
        let source = Descriptor::drawer("drag-1", "Heading");
        let mut drag = DragController::new();
        let mut ids = IdGenerator::default();

        drag.begin(&source, &data);
        assert_eq!(drag.over(Some(&source), Some(&Descriptor::zone(ROOT_ZONE)), &data).len(), 1);

        let actions = drag.end(Some(&source), None, &data, &mut ids, &ZoneCache::new());
        assert_eq!(
            actions,
            vec![Action::SetData {
                data: data.clone(),
                record_history: false,
            }]
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_end_without_preview_is_noop() {
        let data = root_data(&["a"]);
        let source = Descriptor::drawer("drag-1", "Heading");
        let mut drag = DragController::new();
        let mut ids = IdGenerator::default();

        drag.begin(&source, &data);
        assert!(drag.end(Some(&source), None, &data, &mut ids, &ZoneCache::new()).is_empty());
    }
}
