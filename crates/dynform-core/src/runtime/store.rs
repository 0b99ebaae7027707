// crates/dynform-core/src/runtime/store.rs
// ============================================================================
// Module: Control Store
// Description: Append-only tree of form controls addressed by path.
// Purpose: Allocate group, array, and leaf nodes and hand back their paths.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The store owns the control tree of one form. Nodes are only ever
//! appended: a group child is inserted under its key, an array child is
//! appended at the current length. The returned path is stable for the
//! lifetime of the store and is never reused.
//!
//! Only leaf state changes after construction; the tree shape does not.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::btree_map::Entry;

use crate::core::ControlNode;
use crate::core::ControlPath;
use crate::core::LeafControl;
use crate::core::StatusSnapshot;
use crate::core::StructuralError;

// ============================================================================
// SECTION: Control Store
// ============================================================================

/// Append-only control tree.
#[derive(Debug, Clone)]
pub struct ControlStore {
    /// Root group.
    root: ControlNode,
}

impl Default for ControlStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStore {
    /// Creates a store holding an empty root group.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: ControlNode::group(),
        }
    }

    /// Adds an empty group under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError`] when `parent` is missing or a leaf, or the
    /// key is taken.
    pub fn add_group(&mut self, key: &str, parent: &ControlPath) -> Result<ControlPath, StructuralError> {
        self.insert(key, parent, ControlNode::group())
    }

    /// Adds an empty array under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError`] when `parent` is missing or a leaf, or the
    /// key is taken.
    pub fn add_array(&mut self, key: &str, parent: &ControlPath) -> Result<ControlPath, StructuralError> {
        self.insert(key, parent, ControlNode::array())
    }

    /// Adds a leaf control under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError`] when `parent` is missing or a leaf, or the
    /// key is taken.
    pub fn add_control(
        &mut self,
        key: &str,
        parent: &ControlPath,
        leaf: LeafControl,
    ) -> Result<ControlPath, StructuralError> {
        self.insert(key, parent, ControlNode::Leaf(leaf))
    }

    /// Resolves a path; the empty path is the root.
    #[must_use]
    pub fn resolve(&self, path: &ControlPath) -> Option<&ControlNode> {
        path.segments().try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Resolves a path mutably.
    pub fn resolve_mut(&mut self, path: &ControlPath) -> Option<&mut ControlNode> {
        path.segments().try_fold(&mut self.root, |node, segment| node.child_mut(segment))
    }

    /// Resolves a path to a leaf.
    #[must_use]
    pub fn leaf(&self, path: &ControlPath) -> Option<&LeafControl> {
        match self.resolve(path) {
            Some(ControlNode::Leaf(leaf)) => Some(leaf),
            _ => None,
        }
    }

    /// Resolves a path to a mutable leaf.
    pub fn leaf_mut(&mut self, path: &ControlPath) -> Option<&mut LeafControl> {
        match self.resolve_mut(path) {
            Some(ControlNode::Leaf(leaf)) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> &ControlNode {
        &self.root
    }

    /// Lists every node path in pre-order, starting with the root.
    #[must_use]
    pub fn paths(&self) -> Vec<ControlPath> {
        let mut paths = Vec::new();
        collect_paths(&self.root, ControlPath::root(), &mut paths);
        paths
    }

    /// Lists the paths of every leaf in pre-order.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<ControlPath> {
        self.paths().into_iter().filter(|path| self.leaf(path).is_some()).collect()
    }

    /// Captures the status snapshot of the whole form.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.root)
    }

    /// Inserts a node under `parent` and returns its path.
    fn insert(
        &mut self,
        key: &str,
        parent: &ControlPath,
        node: ControlNode,
    ) -> Result<ControlPath, StructuralError> {
        let Some(target) = self.resolve_mut(parent) else {
            return Err(StructuralError::UnknownParent {
                path: parent.clone(),
            });
        };
        match target {
            ControlNode::Group(_) if key.is_empty() => Err(StructuralError::EmptyKey {
                parent: parent.clone(),
            }),
            ControlNode::Group(children) => {
                let path = parent.child_key(key);
                match children.entry(key.to_string()) {
                    Entry::Vacant(slot) => {
                        slot.insert(node);
                        Ok(path)
                    }
                    Entry::Occupied(_) => Err(StructuralError::DuplicateKey {
                        path,
                    }),
                }
            }
            ControlNode::Array(children) => {
                let path = parent.child_index(children.len());
                children.push(node);
                Ok(path)
            }
            ControlNode::Leaf(_) => Err(StructuralError::LeafParent {
                path: parent.clone(),
            }),
        }
    }
}

/// Appends `path` and the paths below `node` in pre-order.
fn collect_paths(node: &ControlNode, path: ControlPath, paths: &mut Vec<ControlPath>) {
    match node {
        ControlNode::Group(children) => {
            paths.push(path.clone());
            for (key, child) in children {
                collect_paths(child, path.child_key(key), paths);
            }
        }
        ControlNode::Array(children) => {
            paths.push(path.clone());
            for (index, child) in children.iter().enumerate() {
                collect_paths(child, path.child_index(index), paths);
            }
        }
        ControlNode::Leaf(_) => paths.push(path),
    }
}
