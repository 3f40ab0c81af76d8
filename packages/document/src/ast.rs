use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{DocumentError, DocumentResult};

/// Name of the distinguished zone stored in [`Data::content`]
pub const ROOT_ZONE: &str = "root";

/// Prop marking an item as a not-yet-committed drag insertion
pub const PLACEHOLDER_PROP: &str = "__placeholder";

/// Open prop value (string, number, boolean, null, map, sequence)
pub type PropValue = serde_json::Value;

/// Open prop bag keyed by prop name
pub type Props = serde_json::Map<String, PropValue>;

/// Build the key of a zone owned by an item: `<parentId>:<area>`
pub fn zone_key(parent_id: &str, area: &str) -> String {
    format!("{}:{}", parent_id, area)
}

/// Component instance: a type tag plus a prop bag carrying its `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentItem {
    #[serde(rename = "type")]
    pub component_type: String,

    #[serde(default)]
    pub props: Props,
}

impl ComponentItem {
    pub fn new(component_type: impl Into<String>, id: impl Into<String>) -> Self {
        let mut item = Self::with_props(component_type, Props::new());
        item.set_id(id);
        item
    }

    pub fn with_props(component_type: impl Into<String>, props: Props) -> Self {
        Self {
            component_type: component_type.into(),
            props,
        }
    }

    /// The item's document-wide id, read from `props.id`
    pub fn id(&self) -> Option<&str> {
        self.props.get("id").and_then(PropValue::as_str)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.props.insert("id".to_string(), PropValue::String(id.into()));
    }

    pub fn is_placeholder(&self) -> bool {
        self.props
            .get(PLACEHOLDER_PROP)
            .and_then(PropValue::as_bool)
            .unwrap_or(false)
    }

    /// Drop the placeholder marker, keeping every other prop
    pub fn strip_placeholder(&mut self) {
        self.props.remove(PLACEHOLDER_PROP);
    }
}

/// Props of the page itself (not part of any zone)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootData {
    #[serde(default)]
    pub props: Props,
}

/// Editable document: the root zone plus every nested zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default)]
    pub root: RootData,

    /// Items of the `"root"` zone
    #[serde(default)]
    pub content: Vec<ComponentItem>,

    /// Every zone other than `"root"`, keyed `<parentId>:<area>`
    #[serde(default)]
    pub zones: BTreeMap<String, Vec<ComponentItem>>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a document from JSON
    pub fn from_json(source: &str) -> DocumentResult<Self> {
        let data: Data = serde_json::from_str(source)?;
        data.validate()?;
        Ok(data)
    }

    pub fn zone(&self, name: &str) -> Option<&Vec<ComponentItem>> {
        if name == ROOT_ZONE {
            Some(&self.content)
        } else {
            self.zones.get(name)
        }
    }

    pub fn zone_mut(&mut self, name: &str) -> Option<&mut Vec<ComponentItem>> {
        if name == ROOT_ZONE {
            Some(&mut self.content)
        } else {
            self.zones.get_mut(name)
        }
    }

    /// Get a zone for writing, creating it empty if absent
    pub fn zone_entry(&mut self, name: &str) -> &mut Vec<ComponentItem> {
        if name == ROOT_ZONE {
            &mut self.content
        } else {
            self.zones.entry(name.to_string()).or_default()
        }
    }

    pub fn zone_len(&self, name: &str) -> usize {
        self.zone(name).map_or(0, Vec::len)
    }

    pub fn get_item(&self, zone: &str, index: usize) -> Option<&ComponentItem> {
        self.zone(zone).and_then(|items| items.get(index))
    }

    /// Iterate every zone, root first
    pub fn iter_zones(&self) -> impl Iterator<Item = (&str, &Vec<ComponentItem>)> {
        std::iter::once((ROOT_ZONE, &self.content))
            .chain(self.zones.iter().map(|(name, items)| (name.as_str(), items)))
    }

    pub fn item_count(&self) -> usize {
        self.iter_zones().map(|(_, items)| items.len()).sum()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.iter_zones()
            .flat_map(|(_, items)| items.iter())
            .any(|item| item.id() == Some(id))
    }

    /// Locate an item by id
    pub fn find_item(&self, id: &str) -> Option<(&str, usize)> {
        self.iter_zones().find_map(|(zone, items)| {
            items
                .iter()
                .position(|item| item.id() == Some(id))
                .map(|index| (zone, index))
        })
    }

    pub fn has_placeholder(&self) -> bool {
        self.iter_zones()
            .flat_map(|(_, items)| items.iter())
            .any(ComponentItem::is_placeholder)
    }

    /// Names of the zones owned directly by an item
    pub fn child_zones(&self, item_id: &str) -> Vec<String> {
        let prefix = format!("{}:", item_id);
        self.zones
            .keys()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Whether `zone` is owned by `item_id` or by one of its descendants
    pub fn is_zone_within(&self, zone: &str, item_id: &str) -> bool {
        let mut current = zone.to_string();
        let mut visited = HashSet::new();

        while current != ROOT_ZONE && visited.insert(current.clone()) {
            let Some((owner, _area)) = current.split_once(':') else {
                return false;
            };
            if owner == item_id {
                return true;
            }
            match self.find_item(owner) {
                Some((parent_zone, _)) => current = parent_zone.to_string(),
                None => return false,
            }
        }

        false
    }

    /// Check that every item has an id and that ids are unique
    pub fn validate(&self) -> DocumentResult<()> {
        let mut seen = HashSet::new();

        for (zone, items) in self.iter_zones() {
            for (index, item) in items.iter().enumerate() {
                let id = item.id().ok_or_else(|| DocumentError::MissingId {
                    zone: zone.to_string(),
                    index,
                })?;

                if !seen.insert(id) {
                    return Err(DocumentError::DuplicateId(id.to_string()));
                }
            }
        }

        Ok(())
    }
}

/// Position of the selected item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelector {
    pub zone: String,
    pub index: usize,
}

/// Editor UI state, orthogonal to [`Data`] and never historied on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default)]
    pub item_selector: Option<ItemSelector>,

    #[serde(default = "default_true")]
    pub left_side_bar_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            item_selector: None,
            left_side_bar_visible: true,
        }
    }
}

impl UiState {
    /// Merge a partial patch; absent fields are left as they are
    pub fn merge(&mut self, patch: &UiPatch) {
        if let Some(selector) = &patch.item_selector {
            self.item_selector = selector.clone();
        }
        if let Some(visible) = patch.left_side_bar_visible {
            self.left_side_bar_visible = visible;
        }
    }
}

/// Partial [`UiState`] update
///
/// `itemSelector: null` clears the selection, while an absent
/// `itemSelector` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPatch {
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_selector: Option<Option<ItemSelector>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_side_bar_visible: Option<bool>,
}

impl UiPatch {
    pub fn clear_selection() -> Self {
        Self {
            item_selector: Some(None),
            ..Self::default()
        }
    }
}

/// Full editor state: document plus UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub data: Data,

    #[serde(default)]
    pub ui: UiState,
}

impl AppState {
    pub fn new(data: Data) -> Self {
        Self {
            data,
            ui: UiState::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(component_type: &str, id: &str) -> ComponentItem {
        ComponentItem::new(component_type, id)
    }

    #[test]
    fn test_root_zone_is_content() {
        let mut data = Data::new();
        data.content.push(item("Text", "a"));

        assert_eq!(data.zone_len(ROOT_ZONE), 1);
        assert_eq!(data.get_item(ROOT_ZONE, 0).and_then(|i| i.id()), Some("a"));
        assert!(data.zones.is_empty());
    }

    #[test]
    fn test_zone_entry_creates_missing_zone() {
        let mut data = Data::new();
        data.zone_entry("a:content").push(item("Text", "b"));

        assert_eq!(data.zone_len("a:content"), 1);
        assert_eq!(data.child_zones("a"), vec!["a:content".to_string()]);
        assert_eq!(data.item_count(), 1);
    }

    #[test]
    fn test_find_item_across_zones() {
        let mut data = Data::new();
        data.content.push(item("Columns", "cols"));
        data.zone_entry(&zone_key("cols", "left")).push(item("Text", "t1"));

        assert_eq!(data.find_item("t1"), Some(("cols:left", 0)));
        assert_eq!(data.find_item("cols"), Some((ROOT_ZONE, 0)));
        assert!(data.find_item("missing").is_none());
    }

    #[test]
    fn test_zone_within_nested_owner() {
        let mut data = Data::new();
        data.content.push(item("Columns", "cols"));
        data.zone_entry("cols:left").push(item("Card", "card"));
        data.zone_entry("card:body").push(item("Text", "t1"));

        assert!(data.is_zone_within("card:body", "cols"));
        assert!(data.is_zone_within("card:body", "card"));
        assert!(!data.is_zone_within("cols:left", "card"));
        assert!(!data.is_zone_within(ROOT_ZONE, "cols"));
        assert!(!data.is_zone_within("orphan:area", "cols"));
    }

    #[test]
    fn test_zone_within_area_with_colon() {
        let mut data = Data::new();
        data.content.push(item("Card", "card"));
        data.zone_entry("card:body:extra").push(item("Text", "t1"));

        assert_eq!(data.child_zones("card"), vec!["card:body:extra".to_string()]);
        assert!(data.is_zone_within("card:body:extra", "card"));
        assert!(!data.is_zone_within("card:body:extra", "card:body"));
    }

    #[test]
    fn test_placeholder_marker() {
        let mut placeholder = item("Text", "drag-1");
        placeholder
            .props
            .insert(PLACEHOLDER_PROP.to_string(), json!(true));

        assert!(placeholder.is_placeholder());
        placeholder.strip_placeholder();
        assert!(!placeholder.is_placeholder());
        assert_eq!(placeholder.id(), Some("drag-1"));
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let source = json!({
            "content": [
                { "type": "Text", "props": { "id": "a" } }
            ],
            "zones": {
                "x:content": [
                    { "type": "Text", "props": { "id": "a" } }
                ]
            }
        })
        .to_string();

        assert!(matches!(
            Data::from_json(&source),
            Err(DocumentError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_ui_patch_distinguishes_null_from_absent() {
        let mut ui = UiState {
            item_selector: Some(ItemSelector {
                zone: ROOT_ZONE.to_string(),
                index: 0,
            }),
            left_side_bar_visible: true,
        };

        let untouched: UiPatch = serde_json::from_value(json!({ "leftSideBarVisible": false })).unwrap();
        ui.merge(&untouched);
        assert!(ui.item_selector.is_some());
        assert!(!ui.left_side_bar_visible);

        let cleared: UiPatch = serde_json::from_value(json!({ "itemSelector": null })).unwrap();
        ui.merge(&cleared);
        assert!(ui.item_selector.is_none());
    }
}
