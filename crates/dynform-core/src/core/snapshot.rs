// crates/dynform-core/src/core/snapshot.rs
// ============================================================================
// Module: Status Snapshot
// Description: Serializable view of the control store for external validators.
// Purpose: Capture status flags, errors, and values of the whole form.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! External async validators receive the status snapshot of the entire form.
//! Every node reports `valid`, `invalid`, `pending`, `touched`, `untouched`,
//! `dirty`, and `errors`. Leaves add their `value`, groups flatten their
//! children into the same object by key, and arrays list their children
//! under `controls`.
//!
//! A group child keyed like one of the status fields would shadow it in the
//! serialized object; schemas are expected to avoid those keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::core::control::ControlNode;
use crate::core::control::ControlStatus;
use crate::core::validation::ValidationErrors;

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Status flags shared by every snapshot node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotState {
    /// Status is valid.
    pub valid: bool,
    /// Status is invalid.
    pub invalid: bool,
    /// An async validation is in flight at or below the node.
    pub pending: bool,
    /// The node or a descendant was touched.
    pub touched: bool,
    /// Negation of `touched`.
    pub untouched: bool,
    /// The node or a descendant is dirty.
    pub dirty: bool,
    /// Error object of the node; containers carry none of their own.
    pub errors: Option<ValidationErrors>,
}

/// Kind-specific part of a snapshot node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotBody {
    /// Group children keyed like the group.
    Group(BTreeMap<String, StatusSnapshot>),
    /// Array children in index order.
    Array {
        /// Child snapshots.
        controls: Vec<StatusSnapshot>,
    },
    /// Leaf value.
    Leaf {
        /// Current value.
        value: Value,
    },
}

/// Status snapshot of a control node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// Shared status flags.
    #[serde(flatten)]
    pub state: SnapshotState,
    /// Kind-specific fields.
    #[serde(flatten)]
    pub body: SnapshotBody,
}

impl StatusSnapshot {
    /// Captures the snapshot of a node and its descendants.
    #[must_use]
    pub fn capture(node: &ControlNode) -> Self {
        let status = node.status();
        let touched = node.touched();
        let (errors, body) = match node {
            ControlNode::Group(children) => (
                None,
                SnapshotBody::Group(
                    children.iter().map(|(key, child)| (key.clone(), Self::capture(child))).collect(),
                ),
            ),
            ControlNode::Array(children) => (
                None,
                SnapshotBody::Array {
                    controls: children.iter().map(Self::capture).collect(),
                },
            ),
            ControlNode::Leaf(leaf) => (
                leaf.errors.clone(),
                SnapshotBody::Leaf {
                    value: leaf.value.clone(),
                },
            ),
        };
        Self {
            state: SnapshotState {
                valid: status == ControlStatus::Valid,
                invalid: status == ControlStatus::Invalid,
                pending: status == ControlStatus::Pending,
                touched,
                untouched: !touched,
                dirty: node.dirty(),
                errors,
            },
            body,
        }
    }

    /// Returns the snapshot of a group child.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        match &self.body {
            SnapshotBody::Group(children) => children.get(key),
            SnapshotBody::Array {
                controls,
            } => key.parse::<usize>().ok().and_then(|index| controls.get(index)),
            SnapshotBody::Leaf {
                ..
            } => None,
        }
    }

    /// Serializes the snapshot to JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
