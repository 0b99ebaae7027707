// crates/dynform-core/src/core/schema.rs
// ============================================================================
// Module: Form Schema Model
// Description: Typed views of layout, group, array, and leaf schema nodes.
// Purpose: Classify schema nodes once and decode leaf payloads.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A form schema is plain JSON. Every node is classified exactly once by
//! [`classify`] into a [`NodeKind`], in fixed priority order: an explicit
//! layout marker first, then arrays, then objects whose every property is
//! object-shaped (groups), and everything else is a leaf control.
//!
//! Classification looks at the node itself, never inside a leaf payload: a
//! leaf's own `validations: {sync: [], async: []}` sub-object is object-shaped
//! but the leaf carries string fields (`type`, `name`) that keep it a leaf.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key marking a layout node, as a mapping key or as an array entry's `key`.
pub const LAYOUT_MARKER: &str = "F-layout";

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Visual container forwarding its content to the parent path.
    Layout,
    /// Ordered sequence of children.
    Array,
    /// Keyed mapping of children.
    Group,
    /// Terminal user-editable control.
    Leaf,
}

impl NodeKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Array => "array",
            Self::Group => "group",
            Self::Leaf => "leaf",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a schema node reached under `key`.
///
/// `key` is the mapping key for mapping entries and the entry's own `key`
/// field for array entries. A `null` node counts as an empty group.
#[must_use]
pub fn classify(key: Option<&str>, node: &Value) -> NodeKind {
    if key == Some(LAYOUT_MARKER) {
        return NodeKind::Layout;
    }
    match node {
        Value::Array(_) => NodeKind::Array,
        Value::Null => NodeKind::Group,
        Value::Object(map) if children_are_object_shaped(map) => NodeKind::Group,
        _ => NodeKind::Leaf,
    }
}

/// Returns the `key` field of an array entry, if it is a string.
#[must_use]
pub fn entry_key(entry: &Value) -> Option<&str> {
    entry.get("key").and_then(Value::as_str)
}

/// Returns true when every property value is an object, array, or null.
fn children_are_object_shaped(map: &Map<String, Value>) -> bool {
    map.values().all(|child| matches!(child, Value::Object(_) | Value::Array(_) | Value::Null))
}

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Horizontal and vertical alignment tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// Horizontal alignment token.
    #[serde(default)]
    pub x: String,
    /// Vertical alignment token.
    #[serde(default)]
    pub y: String,
}

/// Visual configuration of a layout node; every token is opaque.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Flow direction token such as `flex-row` or `flex-column`.
    #[serde(default)]
    pub direction: Option<String>,
    /// Alignment tokens.
    #[serde(default)]
    pub alignment: Option<Alignment>,
    /// Gap size token.
    #[serde(default)]
    pub gap: Option<String>,
}

impl LayoutConfig {
    /// Derives the class list handed to groups and arrays inside the layout.
    #[must_use]
    pub fn classes(&self) -> String {
        let mut classes = vec!["flex".to_string()];
        if let Some(direction) = self.direction.as_deref().filter(|value| !value.is_empty()) {
            classes.push(direction.to_string());
        }
        if let Some(alignment) = &self.alignment {
            classes.extend(
                [&alignment.x, &alignment.y]
                    .into_iter()
                    .filter(|token| !token.is_empty())
                    .cloned(),
            );
        }
        if let Some(gap) = self.gap.as_deref().filter(|value| !value.is_empty()) {
            if self.direction.as_deref() == Some("flex-row") {
                classes.push(format!("gap-{gap}"));
            } else {
                classes.push(format!("column-gap-{gap}"));
            }
        }
        classes.join(" ")
    }
}

// ============================================================================
// SECTION: Leaf Controls
// ============================================================================

/// Control kind derived from a leaf's `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    /// Free-text input.
    Input,
    /// Enumerated options.
    Select,
    /// Any other type; rendered by the collaborator if it knows it.
    Other(String),
}

/// Decoded payload of a leaf control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeafSpec {
    /// Key of the entry when it sits inside an array.
    #[serde(default)]
    pub key: Option<String>,
    /// Control type, matched case-insensitively.
    #[serde(rename = "type", default)]
    pub control_type: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Label text.
    #[serde(default)]
    pub label: Option<String>,
    /// Placeholder text.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Icon token.
    #[serde(default)]
    pub icon: Option<String>,
    /// Options of a select control.
    #[serde(default)]
    pub options: Option<SelectOptions>,
    /// Validation rules.
    #[serde(default)]
    pub validations: ValidationSpec,
}

impl LeafSpec {
    /// Returns the control kind.
    #[must_use]
    pub fn kind(&self) -> LeafKind {
        match self.control_type.to_ascii_uppercase().as_str() {
            "INPUT" => LeafKind::Input,
            "SELECT" => LeafKind::Select,
            _ => LeafKind::Other(self.control_type.clone()),
        }
    }

    /// Returns the inline options when the leaf is a select with a fixed list.
    #[must_use]
    pub fn inline_options(&self) -> Option<&[SelectOption]> {
        match (&self.kind(), &self.options) {
            (LeafKind::Select, Some(SelectOptions::Inline(options))) => Some(options),
            _ => None,
        }
    }

    /// Returns the remote option source when the leaf is a select backed by a URL.
    #[must_use]
    pub fn option_source(&self) -> Option<&OptionSource> {
        match (&self.kind(), &self.options) {
            (LeafKind::Select, Some(SelectOptions::Remote(source))) => Some(source),
            _ => None,
        }
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown to the user.
    pub display: String,
    /// Value stored in the control.
    pub value: Value,
}

/// Options of a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOptions {
    /// Fixed list of options.
    Inline(Vec<SelectOption>),
    /// Options fetched from a URL.
    Remote(OptionSource),
}

/// Remote option source of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSource {
    /// URL returning a JSON array.
    pub url: String,
    /// Optional `JSONPath` projecting each entry to its option value.
    #[serde(default)]
    pub path: Option<String>,
    /// Optional sort order by display text.
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}

/// Sort order of fetched options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending by display text.
    Asc,
    /// Descending by display text.
    Desc,
}

// ============================================================================
// SECTION: Validation Rules
// ============================================================================

/// Sync and async rules attached to a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSpec {
    /// Rules evaluated locally on every value change.
    #[serde(default)]
    pub sync: Vec<SyncRule>,
    /// Rules requiring a remote round trip.
    #[serde(default, rename = "async")]
    pub async_rules: Vec<AsyncRule>,
}

/// Synchronous validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRule {
    /// Built-in check name or `custom`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Check parameter, or the logical expression of a custom rule.
    #[serde(default)]
    pub value: Option<Value>,
    /// Failure key of a custom rule.
    #[serde(default)]
    pub name: Option<String>,
    /// Failure message of a custom rule.
    #[serde(default)]
    pub message: Option<String>,
}

/// Kind of an asynchronous rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsyncRuleKind {
    /// Fetch a document and evaluate an expression against it.
    Custom,
    /// Post the form status snapshot and read `validationResult`.
    External,
}

/// Asynchronous validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncRule {
    /// Rule kind.
    #[serde(rename = "type")]
    pub kind: AsyncRuleKind,
    /// Remote endpoint.
    pub url: String,
    /// Logical expression of a custom rule.
    #[serde(default)]
    pub value: Option<Value>,
    /// Failure key.
    pub name: String,
    /// Failure message.
    #[serde(default)]
    pub message: Option<String>,
}
