// crates/dynform-core/src/core/path.rs
// ============================================================================
// Module: Control Paths
// Description: Dot-delimited addresses of nodes in the control store.
// Purpose: Build child paths incrementally from parent paths.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ControlPath`] addresses a node in the control store. The empty path
//! is the root group. A group child appends its key and an array child
//! appends its index, both separated by `.`. Paths are assigned once at
//! allocation and never change.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Control Path
// ============================================================================

/// Dot-delimited address of a control store node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlPath(String);

impl ControlPath {
    /// Returns the root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Wraps an existing path string without validation.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the root path.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of a keyed child of a group at this path.
    #[must_use]
    pub fn child_key(&self, key: &str) -> Self {
        if self.is_root() { Self(key.to_string()) } else { Self(format!("{}.{key}", self.0)) }
    }

    /// Path of an indexed child of an array at this path.
    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        Self(format!("{}.{index}", self.0))
    }

    /// Iterates the segments of the path; the root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|_| !self.is_root())
    }
}

impl fmt::Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ControlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}
