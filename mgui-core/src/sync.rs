//! Document sync
//!
//! Writes the live widget state back into document text so a later render,
//! or a remote viewer, sees what is on screen now rather than what the
//! document originally said.

use alloc::string::String;

use serde_json::Value;

use mgui_display::{StateFlags, WidgetHandle, WidgetToolkit};
use mgui_protocol::MAX_DOCUMENT_SIZE;

use crate::document::Document;
use crate::error::DocumentError;
use crate::record::WidgetKind;
use crate::registry::Registry;

/// Node property each kind's live state is written to
fn synced_prop(kind: WidgetKind) -> Option<&'static str> {
    match kind {
        WidgetKind::Textfield => Some("text"),
        WidgetKind::Switch | WidgetKind::Checkbox => Some("state"),
        WidgetKind::Slider | WidgetKind::Progressbar => Some("value"),
        _ => None,
    }
}

fn live_state<T: WidgetToolkit>(
    toolkit: &T,
    kind: WidgetKind,
    handle: WidgetHandle,
) -> Option<Value> {
    match kind {
        WidgetKind::Textfield => toolkit.text(handle).map(Value::from),
        WidgetKind::Switch | WidgetKind::Checkbox => toolkit
            .state(handle)
            .map(|state| Value::from(i32::from(state.contains(StateFlags::CHECKED)))),
        WidgetKind::Slider | WidgetKind::Progressbar => toolkit.value(handle).map(Value::from),
        _ => None,
    }
}

/// Return `text` with every registered widget's live state written in
///
/// Only existing properties objects are touched; nodes are never added or
/// removed. Fails with [`DocumentError::TooLarge`] when the result would not
/// parse back.
pub fn sync_document<T: WidgetToolkit>(
    text: &str,
    registry: &Registry,
    toolkit: &T,
) -> Result<String, DocumentError> {
    let mut document = Document::parse(text)?;
    let mut updated = 0usize;

    for kind in WidgetKind::ALL {
        let Some(prop) = synced_prop(kind) else {
            continue;
        };
        for record in registry.records(kind) {
            let Some(value) = live_state(toolkit, kind, record.handle) else {
                continue;
            };
            if document.set_prop(&record.name, prop, value) {
                updated += 1;
            } else {
                debug!("Widget {} has no node to sync into", record.name.as_str());
            }
        }
    }

    debug!("Synced {} widget states into the document", updated);
    let synced = document.to_text()?;
    if synced.len() > MAX_DOCUMENT_SIZE {
        warn!("Synced document is {} bytes, over the limit", synced.len());
        return Err(DocumentError::TooLarge);
    }
    Ok(synced)
}
