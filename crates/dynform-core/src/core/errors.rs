// crates/dynform-core/src/core/errors.rs
// ============================================================================
// Module: Form Errors
// Description: Structural and schema failures raised while building forms.
// Purpose: Separate fatal construction errors from validation failures.
// Dependencies: dynform-logic, thiserror
// ============================================================================

//! ## Overview
//! Only construction can fail. Validation failures are data carried in a
//! leaf's error map and transport failures are mapped to validation
//! failures, so neither appears here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dynform_logic::ExpressionError;
use thiserror::Error;

use crate::core::path::ControlPath;

// ============================================================================
// SECTION: Structural Errors
// ============================================================================

/// Failures while growing the control store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The parent path resolves to a leaf control, which has no children.
    #[error("target path is a control element and can not contain children: `{path}`")]
    LeafParent {
        /// Offending parent path.
        path: ControlPath,
    },
    /// The parent path does not resolve to any node.
    #[error("parent path does not exist: `{path}`")]
    UnknownParent {
        /// Offending parent path.
        path: ControlPath,
    },
    /// Group children need a non-empty key; an empty one would alias the parent.
    #[error("group child key must not be empty under `{parent}`")]
    EmptyKey {
        /// Parent group path.
        parent: ControlPath,
    },
    /// The parent group already holds a child under the key.
    #[error("path is already assigned: `{path}`")]
    DuplicateKey {
        /// Path that would have been reused.
        path: ControlPath,
    },
}

// ============================================================================
// SECTION: Schema Errors
// ============================================================================

/// Failures decoding a schema payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema root is not a JSON object.
    #[error("schema root must be an object")]
    RootNotObject,
    /// A layout node has no object `content`.
    #[error("layout under `{path}` must carry object content")]
    LayoutContent {
        /// Path the layout forwards to.
        path: ControlPath,
    },
    /// A leaf payload could not be decoded.
    #[error("invalid control `{key}` under `{path}`: {reason}")]
    InvalidLeaf {
        /// Parent path of the leaf.
        path: ControlPath,
        /// Key of the leaf.
        key: String,
        /// Decode failure.
        reason: String,
    },
    /// A sync rule names an unknown check.
    #[error("unknown sync validation type `{kind}`")]
    UnknownRule {
        /// Offending rule type.
        kind: String,
    },
    /// A rule is missing a required field or carries a bad parameter.
    #[error("invalid `{kind}` rule: {reason}")]
    InvalidRule {
        /// Rule type.
        kind: String,
        /// What is wrong with the rule.
        reason: String,
    },
    /// A rule expression is malformed.
    #[error("invalid expression in rule `{name}`: {source}")]
    Expression {
        /// Rule name.
        name: String,
        /// Decode failure.
        #[source]
        source: ExpressionError,
    },
}

// ============================================================================
// SECTION: Form Errors
// ============================================================================

/// Errors surfaced by form construction and control access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Control store growth failed.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// Schema decoding failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The path does not resolve to a leaf control.
    #[error("no control at path `{path}`")]
    NotAControl {
        /// Requested path.
        path: ControlPath,
    },
}
