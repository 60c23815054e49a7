//! Programmatic widget access
//!
//! Widgets are addressed by node name. Names are not unique across kinds, so
//! each operation resolves a name against a fixed kind order and acts on the
//! first match.

use alloc::string::{String, ToString};

use mgui_display::{StateFlags, ToolkitError, WidgetToolkit};

use crate::error::MutateError;
use crate::record::WidgetKind;
use crate::registry::{Registry, Slot};

/// Kinds searched by [`set_value`], in order
pub const SET_VALUE_ORDER: [WidgetKind; 6] = [
    WidgetKind::Textfield,
    WidgetKind::Slider,
    WidgetKind::Switch,
    WidgetKind::Checkbox,
    WidgetKind::Progressbar,
    WidgetKind::Radiobutton,
];

/// Kinds searched by [`set_text`], in order
pub const SET_TEXT_ORDER: [WidgetKind; 2] = [WidgetKind::Textfield, WidgetKind::Button];

/// Kinds searched by [`get_value`], in order
pub const GET_VALUE_ORDER: [WidgetKind; 5] = [
    WidgetKind::Slider,
    WidgetKind::Switch,
    WidgetKind::Checkbox,
    WidgetKind::Progressbar,
    WidgetKind::Radiobutton,
];

/// What a successful mutation changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A numeric value or checked state
    Value(i32),
    /// Textfield text
    Text(String),
}

fn lookup(registry: &Registry, name: &str, kinds: &[WidgetKind]) -> Result<Slot, MutateError> {
    registry.find(name, kinds).ok_or_else(|| {
        warn!("No widget named {}", name);
        MutateError::NotFound
    })
}

/// Set the value of the widget called `name`
///
/// Textfields show the decimal value as text. Switches and checkboxes are
/// checked for any nonzero value. Radio groups select option `value`.
pub fn set_value<T: WidgetToolkit>(
    registry: &mut Registry,
    toolkit: &mut T,
    name: &str,
    value: i32,
) -> Result<Change, MutateError> {
    let slot = lookup(registry, name, &SET_VALUE_ORDER)?;
    let handle = registry.record(slot).ok_or(MutateError::NotFound)?.handle;

    match slot.kind {
        WidgetKind::Textfield => {
            let text = value.to_string();
            toolkit.set_text(handle, &text)?;
            Ok(Change::Text(text))
        }
        WidgetKind::Slider | WidgetKind::Progressbar => {
            toolkit.set_value(handle, value)?;
            Ok(Change::Value(value))
        }
        WidgetKind::Switch | WidgetKind::Checkbox => {
            if value != 0 {
                toolkit.add_state(handle, StateFlags::CHECKED)?;
            } else {
                toolkit.clear_state(handle, StateFlags::CHECKED)?;
            }
            Ok(Change::Value(value))
        }
        WidgetKind::Radiobutton => {
            let group = registry
                .group_mut(slot.index)
                .ok_or(MutateError::NotFound)?;
            let Some((index, option)) = usize::try_from(value)
                .ok()
                .and_then(|index| Some((index, group.option(index)?)))
            else {
                warn!("Radio group {} has no option {}", name, value);
                return Err(MutateError::OutOfRange);
            };
            if let Some(previous) = group.option(group.active) {
                toolkit.clear_state(previous, StateFlags::CHECKED)?;
            }
            toolkit.add_state(option, StateFlags::CHECKED)?;
            group.active = index;
            Ok(Change::Value(value))
        }
        kind => Err(MutateError::Unsupported(kind)),
    }
}

/// Set the text of the textfield called `name`
///
/// Buttons are found by name but their labels cannot be changed.
pub fn set_text<T: WidgetToolkit>(
    registry: &Registry,
    toolkit: &mut T,
    name: &str,
    text: &str,
) -> Result<(), MutateError> {
    let slot = lookup(registry, name, &SET_TEXT_ORDER)?;
    let handle = registry.record(slot).ok_or(MutateError::NotFound)?.handle;

    match slot.kind {
        WidgetKind::Textfield => Ok(toolkit.set_text(handle, text)?),
        kind => {
            warn!("Cannot set text of {}, not a textfield", name);
            Err(MutateError::Unsupported(kind))
        }
    }
}

/// Current value of the widget called `name`
///
/// Switches and checkboxes read as 1 or 0, radio groups as the index of the
/// selected option.
pub fn get_value<T: WidgetToolkit>(
    registry: &Registry,
    toolkit: &T,
    name: &str,
) -> Result<i32, MutateError> {
    let slot = lookup(registry, name, &GET_VALUE_ORDER)?;
    let handle = registry.record(slot).ok_or(MutateError::NotFound)?.handle;

    match slot.kind {
        WidgetKind::Slider | WidgetKind::Progressbar => toolkit
            .value(handle)
            .ok_or(MutateError::Toolkit(ToolkitError::InvalidHandle)),
        WidgetKind::Switch | WidgetKind::Checkbox => toolkit
            .state(handle)
            .map(|state| i32::from(state.contains(StateFlags::CHECKED)))
            .ok_or(MutateError::Toolkit(ToolkitError::InvalidHandle)),
        WidgetKind::Radiobutton => registry
            .group(slot.index)
            .map(|group| group.active as i32)
            .ok_or(MutateError::NotFound),
        kind => Err(MutateError::Unsupported(kind)),
    }
}
