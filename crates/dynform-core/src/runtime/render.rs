// crates/dynform-core/src/runtime/render.rs
// ============================================================================
// Module: Renderers
// Description: Renderer implementations with no UI toolkit behind them.
// Purpose: Build forms headless and record dispatch order.
// Dependencies: serde, serde_json, crate::interfaces
// ============================================================================

//! ## Overview
//! [`NoopRenderer`] ignores every call and is used when only the control
//! store matters. [`RecordingRenderer`] keeps one [`RenderCall`] per call in
//! dispatch order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::core::ControlPath;
use crate::core::LayoutConfig;
use crate::core::LeafSpec;
use crate::interfaces::Renderer;

// ============================================================================
// SECTION: Noop Renderer
// ============================================================================

/// Renderer that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render_layout(&mut self, _path: &ControlPath, _layout: &LayoutConfig, _content: &Value) {}

    fn render_group(&mut self, _path: &ControlPath, _key: &str, _node: &Value, _classes: &str) {}

    fn render_array(&mut self, _path: &ControlPath, _key: &str, _entries: &[Value], _classes: &str) {}

    fn render_control(&mut self, _path: &ControlPath, _key: &str, _spec: &LeafSpec) {}
}

// ============================================================================
// SECTION: Recording Renderer
// ============================================================================

/// One renderer call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderCall {
    /// A layout was rendered.
    Layout {
        /// Path the layout forwards to.
        path: ControlPath,
        /// Derived class list.
        classes: String,
    },
    /// A group was rendered.
    Group {
        /// Group path.
        path: ControlPath,
        /// Group key.
        key: String,
        /// Classes inherited from an enclosing layout.
        classes: String,
    },
    /// An array was rendered.
    Array {
        /// Array path.
        path: ControlPath,
        /// Array key.
        key: String,
        /// Number of entries.
        len: usize,
        /// Classes inherited from an enclosing layout.
        classes: String,
    },
    /// A leaf control was rendered.
    Control {
        /// Leaf path.
        path: ControlPath,
        /// Leaf key.
        key: String,
        /// Leaf `type` field.
        control_type: String,
    },
}

impl RenderCall {
    /// Returns the path passed to the call.
    #[must_use]
    pub const fn path(&self) -> &ControlPath {
        match self {
            Self::Layout {
                path, ..
            }
            | Self::Group {
                path, ..
            }
            | Self::Array {
                path, ..
            }
            | Self::Control {
                path, ..
            } => path,
        }
    }
}

/// Renderer that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Calls in dispatch order.
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: Vec::new(),
        }
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Consumes the recorder and returns its calls.
    #[must_use]
    pub fn into_calls(self) -> Vec<RenderCall> {
        self.calls
    }
}

impl Renderer for RecordingRenderer {
    fn render_layout(&mut self, path: &ControlPath, layout: &LayoutConfig, _content: &Value) {
        self.calls.push(RenderCall::Layout {
            path: path.clone(),
            classes: layout.classes(),
        });
    }

    fn render_group(&mut self, path: &ControlPath, key: &str, _node: &Value, classes: &str) {
        self.calls.push(RenderCall::Group {
            path: path.clone(),
            key: key.to_string(),
            classes: classes.to_string(),
        });
    }

    fn render_array(&mut self, path: &ControlPath, key: &str, entries: &[Value], classes: &str) {
        self.calls.push(RenderCall::Array {
            path: path.clone(),
            key: key.to_string(),
            len: entries.len(),
            classes: classes.to_string(),
        });
    }

    fn render_control(&mut self, path: &ControlPath, key: &str, spec: &LeafSpec) {
        self.calls.push(RenderCall::Control {
            path: path.clone(),
            key: key.to_string(),
            control_type: spec.control_type.clone(),
        });
    }
}
