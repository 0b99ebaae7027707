// crates/dynform-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Schema Dispatcher
// Description: Top-down walk of a form schema into the control store.
// Purpose: Classify every schema node once and allocate its control.
// Dependencies: serde_json, crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The dispatcher walks mappings and arrays of schema nodes. Each node is
//! classified with [`classify`] and handled by kind:
//! - layouts allocate nothing and forward their `content` to the enclosing
//!   path, deriving the class list for the containers inside them
//! - arrays and groups allocate a container, then recurse into their entries
//! - leaves are decoded, get their validators, and are allocated last
//!
//! The renderer is called exactly once per node, after allocation, with the
//! path the store assigned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::core::ControlPath;
use crate::core::FormError;
use crate::core::LayoutConfig;
use crate::core::LeafControl;
use crate::core::LeafSpec;
use crate::core::NodeKind;
use crate::core::OptionSource;
use crate::core::SchemaError;
use crate::core::classify;
use crate::core::entry_key;
use crate::interfaces::Renderer;
use crate::runtime::events::FormEvent;
use crate::runtime::events::FormEventSink;
use crate::runtime::messages::MessageRegistry;
use crate::runtime::store::ControlStore;
use crate::runtime::validators::build_async_validators;
use crate::runtime::validators::build_sync_validators;

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Walks schema nodes into a control store.
pub struct SchemaDispatcher<'a, R: Renderer + ?Sized> {
    /// Store receiving allocations.
    store: &'a mut ControlStore,
    /// Registry receiving rule messages.
    messages: &'a mut MessageRegistry,
    /// Visual collaborator.
    renderer: &'a mut R,
    /// Allocation events.
    events: &'a dyn FormEventSink,
    /// Select leaves whose options come from a URL.
    option_sources: Vec<(ControlPath, OptionSource)>,
}

impl<'a, R: Renderer + ?Sized> SchemaDispatcher<'a, R> {
    /// Creates a dispatcher over the given store and collaborators.
    pub fn new(
        store: &'a mut ControlStore,
        messages: &'a mut MessageRegistry,
        renderer: &'a mut R,
        events: &'a dyn FormEventSink,
    ) -> Self {
        Self {
            store,
            messages,
            renderer,
            events,
            option_sources: Vec::new(),
        }
    }

    /// Consumes the dispatcher and returns the remote option sources seen.
    #[must_use]
    pub fn into_option_sources(self) -> Vec<(ControlPath, OptionSource)> {
        self.option_sources
    }

    /// Dispatches the entries of a mapping under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when a node is malformed or cannot be allocated.
    pub fn dispatch_mapping(
        &mut self,
        parent: &ControlPath,
        mapping: &Map<String, Value>,
        classes: &str,
    ) -> Result<(), FormError> {
        for (key, node) in mapping {
            self.dispatch_node(parent, key, Some(key), node, classes)?;
        }
        Ok(())
    }

    /// Dispatches the entries of an array allocated at `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when an entry is malformed or cannot be allocated.
    pub fn dispatch_array(
        &mut self,
        parent: &ControlPath,
        entries: &[Value],
        classes: &str,
    ) -> Result<(), FormError> {
        for (index, entry) in entries.iter().enumerate() {
            let marker = entry_key(entry);
            let key = marker.map_or_else(|| index.to_string(), str::to_string);
            self.dispatch_node(parent, &key, marker, entry, classes)?;
        }
        Ok(())
    }

    /// Classifies one node and handles it by kind.
    fn dispatch_node(
        &mut self,
        parent: &ControlPath,
        key: &str,
        marker: Option<&str>,
        node: &Value,
        classes: &str,
    ) -> Result<(), FormError> {
        match classify(marker, node) {
            NodeKind::Layout => self.dispatch_layout(parent, node),
            NodeKind::Array => {
                let entries = node.as_array().map_or(&[][..], Vec::as_slice);
                let path = self.store.add_array(key, parent)?;
                self.allocated(&path, NodeKind::Array);
                self.renderer.render_array(&path, key, entries, classes);
                self.dispatch_array(&path, entries, classes)
            }
            NodeKind::Group => {
                let path = self.store.add_group(key, parent)?;
                self.allocated(&path, NodeKind::Group);
                self.renderer.render_group(&path, key, node, classes);
                match node.as_object() {
                    Some(children) => self.dispatch_mapping(&path, children, classes),
                    None => Ok(()),
                }
            }
            NodeKind::Leaf => self.dispatch_leaf(parent, key, node),
        }
    }

    /// Forwards a layout's content to the enclosing path.
    fn dispatch_layout(&mut self, parent: &ControlPath, node: &Value) -> Result<(), FormError> {
        let content = node.get("content").and_then(Value::as_object).ok_or_else(|| {
            SchemaError::LayoutContent {
                path: parent.clone(),
            }
        })?;
        let layout: LayoutConfig = node
            .get("config")
            .and_then(|config| serde_json::from_value(config.clone()).ok())
            .unwrap_or_default();
        let content_value = Value::Object(content.clone());
        self.renderer.render_layout(parent, &layout, &content_value);
        self.dispatch_mapping(parent, content, &layout.classes())
    }

    /// Decodes a leaf, builds its validators, and allocates it.
    fn dispatch_leaf(&mut self, parent: &ControlPath, key: &str, node: &Value) -> Result<(), FormError> {
        let invalid = |reason: String| SchemaError::InvalidLeaf {
            path: parent.clone(),
            key: key.to_string(),
            reason,
        };
        if !node.is_object() {
            return Err(invalid("control payload must be an object".to_string()).into());
        }
        let spec: LeafSpec =
            serde_json::from_value(node.clone()).map_err(|err| invalid(err.to_string()))?;
        let sync_validators = build_sync_validators(&spec.validations.sync, self.messages)?;
        let async_validators = build_async_validators(&spec.validations.async_rules, self.messages)?;
        let mut leaf = LeafControl::new(sync_validators, async_validators);
        if let Some(first) = spec.inline_options().and_then(<[_]>::first) {
            leaf.value = first.value.clone();
        }
        leaf.run_sync();
        let path = self.store.add_control(key, parent, leaf)?;
        self.allocated(&path, NodeKind::Leaf);
        if let Some(source) = spec.option_source() {
            self.option_sources.push((path.clone(), source.clone()));
        }
        self.renderer.render_control(&path, key, &spec);
        Ok(())
    }

    /// Reports an allocation.
    fn allocated(&self, path: &ControlPath, kind: NodeKind) {
        self.events.emit(FormEvent::NodeAllocated {
            path: path.clone(),
            kind,
        });
    }
}
