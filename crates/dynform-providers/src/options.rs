// crates/dynform-providers/src/options.rs
// ============================================================================
// Module: Option Source Client
// Description: Fetches and shapes options of selects backed by a URL.
// Purpose: Turn a remote JSON array into sorted display/value pairs.
// Dependencies: dynform-core, dynform-logic, jsonpath_lib, serde_json
// ============================================================================

//! ## Overview
//! A select whose `options` is `{url, path?, sortOrder?}` gets its options
//! from [`OptionSourceClient::fetch`]. The response must be a JSON array.
//! With `path`, each entry is projected through the `JSONPath` and the first
//! match becomes both the display text and the value. Without it, entries
//! already shaped `{display, value}` are kept and anything else is shown as
//! its string form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use dynform_core::FormEventSink;
use dynform_core::OptionSource;
use dynform_core::RemoteTransport;
use dynform_core::RetryPolicy;
use dynform_core::SelectOption;
use dynform_core::SortOrder;
use dynform_core::TransportError;
use dynform_core::with_backoff;
use dynform_logic::js_string;
use jsonpath_lib::select;
use serde_json::Value;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Fetches select options through a remote transport.
#[derive(Clone)]
pub struct OptionSourceClient {
    /// Remote transport.
    transport: Arc<dyn RemoteTransport>,
    /// Retry envelope for every fetch.
    policy: RetryPolicy,
    /// Event sink for retry reporting.
    events: Arc<dyn FormEventSink>,
}

impl OptionSourceClient {
    /// Creates a client.
    #[must_use]
    pub fn new(
        transport: Arc<dyn RemoteTransport>,
        policy: RetryPolicy,
        events: Arc<dyn FormEventSink>,
    ) -> Self {
        Self {
            transport,
            policy,
            events,
        }
    }

    /// Fetches and shapes the options of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the fetch fails after retries, when the
    /// body is not an array, or when `path` is not a valid `JSONPath`.
    pub async fn fetch(&self, source: &OptionSource) -> Result<Vec<SelectOption>, TransportError> {
        let url = source.url.as_str();
        let body = with_backoff(&self.policy, self.events.as_ref(), url, || {
            let transport = Arc::clone(&self.transport);
            async move { transport.get_json(url).await }
        })
        .await?;
        let Value::Array(entries) = body else {
            return Err(decode_error(url, "option source must return an array"));
        };
        let mut options = match source.path.as_deref() {
            Some(path) => entries
                .iter()
                .map(|entry| project(url, entry, path))
                .collect::<Result<Vec<_>, _>>()?,
            None => entries.into_iter().map(shape).collect(),
        };
        if let Some(order) = source.sort_order {
            sort_options(&mut options, order);
        }
        Ok(options)
    }
}

// ============================================================================
// SECTION: Shaping
// ============================================================================

/// Projects one entry through `path`; an entry with no match becomes `null`.
fn project(url: &str, entry: &Value, path: &str) -> Result<SelectOption, TransportError> {
    let matches = select(entry, path).map_err(|_| decode_error(url, "invalid option path"))?;
    let value = matches.first().map_or(Value::Null, |found| (*found).clone());
    Ok(SelectOption {
        display: js_string(&value),
        value,
    })
}

/// Keeps an entry already shaped as an option or wraps it as one.
fn shape(entry: Value) -> SelectOption {
    if let Value::Object(fields) = &entry
        && let (Some(display), Some(value)) = (fields.get("display"), fields.get("value"))
    {
        return SelectOption {
            display: js_string(display),
            value: value.clone(),
        };
    }
    SelectOption {
        display: js_string(&entry),
        value: entry,
    }
}

/// Sorts options by display text.
pub fn sort_options(options: &mut [SelectOption], order: SortOrder) {
    match order {
        SortOrder::Asc => options.sort_by(|a, b| a.display.cmp(&b.display)),
        SortOrder::Desc => options.sort_by(|a, b| b.display.cmp(&a.display)),
    }
}

/// Builds a decode error for an option source.
fn decode_error(url: &str, reason: &str) -> TransportError {
    TransportError::Decode {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
