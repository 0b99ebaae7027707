// crates/dynform-core/src/core/control.rs
// ============================================================================
// Module: Control Nodes
// Description: Group, array, and leaf nodes held by the control store.
// Purpose: Carry value, status, and validators of every addressable control.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The control store is a tree of [`ControlNode`] values. Groups and arrays
//! hold no value of their own; their status is derived from their children.
//! Leaves carry the value, interaction flags, the error object, and the
//! validators attached at allocation.
//!
//! Each leaf also carries a generation counter bumped on every value
//! change. Async validation results tagged with an older generation are
//! stale and never applied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::validation::AsyncValidator;
use crate::core::validation::SyncValidator;
use crate::core::validation::ValidationErrors;
use crate::core::validation::run_sync_validators;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Validation status of a control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlStatus {
    /// No validator reports a failure.
    #[default]
    Valid,
    /// At least one validator reports a failure.
    Invalid,
    /// An async validation is in flight.
    Pending,
}

impl ControlStatus {
    /// Returns the wire label of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Pending => "PENDING",
        }
    }

    /// Folds child statuses: invalid wins over pending, which wins over valid.
    #[must_use]
    pub fn aggregate(statuses: impl IntoIterator<Item = Self>) -> Self {
        statuses.into_iter().fold(Self::Valid, |acc, status| match (acc, status) {
            (Self::Invalid, _) | (_, Self::Invalid) => Self::Invalid,
            (Self::Pending, _) | (_, Self::Pending) => Self::Pending,
            (Self::Valid, Self::Valid) => Self::Valid,
        })
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Leaf Control
// ============================================================================

/// Terminal control holding a user-editable value.
#[derive(Debug, Clone, Default)]
pub struct LeafControl {
    /// Current value.
    pub value: Value,
    /// True once the value changed through user input.
    pub dirty: bool,
    /// True once the control was interacted with.
    pub touched: bool,
    /// Current status.
    pub status: ControlStatus,
    /// Current error object; `None` when valid.
    pub errors: Option<ValidationErrors>,
    /// Validators run on every value change.
    pub sync_validators: Vec<SyncValidator>,
    /// Validators requiring a remote round trip.
    pub async_validators: Vec<AsyncValidator>,
    /// Counter bumped on every value change.
    pub generation: u64,
}

impl LeafControl {
    /// Creates an empty leaf carrying the given validators.
    #[must_use]
    pub fn new(sync_validators: Vec<SyncValidator>, async_validators: Vec<AsyncValidator>) -> Self {
        Self {
            value: Value::Null,
            sync_validators,
            async_validators,
            ..Self::default()
        }
    }

    /// Runs the sync validators and updates status and errors.
    ///
    /// Returns true when the value passed every sync validator.
    pub fn run_sync(&mut self) -> bool {
        self.errors = run_sync_validators(&self.sync_validators, &self.value);
        self.status = if self.errors.is_some() { ControlStatus::Invalid } else { ControlStatus::Valid };
        self.errors.is_none()
    }

    /// Returns true when the leaf has async validators.
    #[must_use]
    pub fn has_async(&self) -> bool {
        !self.async_validators.is_empty()
    }
}

// ============================================================================
// SECTION: Control Node
// ============================================================================

/// Node of the control store.
#[derive(Debug, Clone)]
pub enum ControlNode {
    /// Keyed children.
    Group(BTreeMap<String, ControlNode>),
    /// Indexed children.
    Array(Vec<ControlNode>),
    /// Terminal control.
    Leaf(LeafControl),
}

impl ControlNode {
    /// Creates an empty group.
    #[must_use]
    pub const fn group() -> Self {
        Self::Group(BTreeMap::new())
    }

    /// Creates an empty array.
    #[must_use]
    pub const fn array() -> Self {
        Self::Array(Vec::new())
    }

    /// Returns the direct child addressed by a path segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Group(children) => children.get(segment),
            Self::Array(children) => segment.parse::<usize>().ok().and_then(|index| children.get(index)),
            Self::Leaf(_) => None,
        }
    }

    /// Mutable variant of [`ControlNode::child`].
    pub fn child_mut(&mut self, segment: &str) -> Option<&mut Self> {
        match self {
            Self::Group(children) => children.get_mut(segment),
            Self::Array(children) => {
                segment.parse::<usize>().ok().and_then(|index| children.get_mut(index))
            }
            Self::Leaf(_) => None,
        }
    }

    /// Returns the status of the node, aggregating children of containers.
    #[must_use]
    pub fn status(&self) -> ControlStatus {
        match self {
            Self::Group(children) => ControlStatus::aggregate(children.values().map(Self::status)),
            Self::Array(children) => ControlStatus::aggregate(children.iter().map(Self::status)),
            Self::Leaf(leaf) => leaf.status,
        }
    }

    /// Returns true when the node or any descendant was touched.
    #[must_use]
    pub fn touched(&self) -> bool {
        self.any_leaf(|leaf| leaf.touched)
    }

    /// Returns true when the node or any descendant is dirty.
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.any_leaf(|leaf| leaf.dirty)
    }

    /// Returns true when any leaf at or below the node satisfies `predicate`.
    fn any_leaf(&self, predicate: impl Fn(&LeafControl) -> bool + Copy) -> bool {
        match self {
            Self::Group(children) => children.values().any(|child| child.any_leaf(predicate)),
            Self::Array(children) => children.iter().any(|child| child.any_leaf(predicate)),
            Self::Leaf(leaf) => predicate(leaf),
        }
    }

    /// Returns the value of the node; containers assemble their children.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Group(children) => Value::Object(
                children.iter().map(|(key, child)| (key.clone(), child.value())).collect(),
            ),
            Self::Array(children) => Value::Array(children.iter().map(Self::value).collect()),
            Self::Leaf(leaf) => leaf.value.clone(),
        }
    }
}
