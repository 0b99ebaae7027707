// crates/dynform-core/src/core/mod.rs
// ============================================================================
// Module: Dynform Core Types
// Description: Paths, schema model, control nodes, validators, and errors.
// Purpose: Define the data model shared by the runtime and interfaces.
// Dependencies: serde, serde_json, dynform-logic
// ============================================================================

//! ## Overview
//! Core types are plain data: they hold no I/O and no async state. The
//! runtime grows and mutates them; interfaces hand views of them to
//! collaborators.

pub mod control;
pub mod errors;
pub mod path;
pub mod schema;
pub mod snapshot;
pub mod validation;

pub use control::ControlNode;
pub use control::ControlStatus;
pub use control::LeafControl;
pub use errors::FormError;
pub use errors::SchemaError;
pub use errors::StructuralError;
pub use path::ControlPath;
pub use schema::Alignment;
pub use schema::AsyncRule;
pub use schema::AsyncRuleKind;
pub use schema::LAYOUT_MARKER;
pub use schema::LayoutConfig;
pub use schema::LeafKind;
pub use schema::LeafSpec;
pub use schema::NodeKind;
pub use schema::OptionSource;
pub use schema::SelectOption;
pub use schema::SelectOptions;
pub use schema::SortOrder;
pub use schema::SyncRule;
pub use schema::ValidationSpec;
pub use schema::classify;
pub use schema::entry_key;
pub use snapshot::SnapshotBody;
pub use snapshot::SnapshotState;
pub use snapshot::StatusSnapshot;
pub use validation::AsyncValidator;
pub use validation::BuiltinCheck;
pub use validation::SyncValidator;
pub use validation::ValidationErrors;
pub use validation::run_sync_validators;
pub use validation::single_error;
