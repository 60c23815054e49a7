//! Event normalization
//!
//! Toolkit input is reduced to one [`Event`]: the widget's event id, its
//! name and an integer value. The normalizer keeps a single slot for the
//! latest event; a newer event replaces an unread one, and reading empties
//! the slot.

use alloc::string::String;

use mgui_display::{StateFlags, ToolkitInput, Trigger, WidgetToolkit};

use crate::record::WidgetKind;
use crate::registry::{HandleRef, Registry};

/// Event id of the "nothing happened" event
pub const NONE_EVENT_ID: &str = "Default";

/// Widget name of the "nothing happened" event
pub const NONE_PARENT_ID: &str = "None";

/// One widget interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event id configured on the widget (`props.event`)
    pub event_id: String,
    /// Name of the widget
    pub parent_id: String,
    pub value: i32,
}

impl Event {
    pub fn new(event_id: &str, parent_id: &str, value: i32) -> Self {
        Self {
            event_id: String::from(event_id),
            parent_id: String::from(parent_id),
            value,
        }
    }

    /// The event returned when nothing happened
    pub fn none() -> Self {
        Self::new(NONE_EVENT_ID, NONE_PARENT_ID, 0)
    }

    /// Whether this is the "nothing happened" event
    pub fn is_none(&self) -> bool {
        self.event_id == NONE_EVENT_ID && self.parent_id == NONE_PARENT_ID && self.value == 0
    }

    /// Whether the event came from the widget called `name`
    pub fn is_from(&self, name: &str) -> bool {
        self.parent_id == name
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::none()
    }
}

/// A normalized event and whether remote clients should hear about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub event: Event,
    pub broadcast: bool,
}

/// Single-slot mailbox for the latest event
#[derive(Debug, Clone, Default)]
pub struct EventNormalizer {
    latest: Option<Event>,
    broadcast_slider_drag: bool,
}

impl EventNormalizer {
    /// Create an idle normalizer
    ///
    /// With `broadcast_slider_drag` unset, slider movement is reported
    /// remotely only when the knob is released.
    pub fn new(broadcast_slider_drag: bool) -> Self {
        Self {
            latest: None,
            broadcast_slider_drag,
        }
    }

    /// Store an event, replacing an unread one
    pub fn latch(&mut self, event: Event) {
        if let Some(dropped) = self.latest.replace(event) {
            trace!("Unread event from {} replaced", dropped.parent_id.as_str());
        }
    }

    /// Take the latest event, or [`Event::none`] when there is none
    pub fn take(&mut self) -> Event {
        self.latest.take().unwrap_or_default()
    }

    /// Whether an unread event is latched
    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    /// Drop any unread event
    pub fn reset(&mut self) {
        self.latest = None;
    }

    /// Turn raw toolkit input into an event
    ///
    /// Radio group clicks also update the group: the previous option is
    /// unchecked and the clicked one checked. Input for unknown handles or
    /// triggers a widget kind does not report is ignored.
    pub fn normalize<T: WidgetToolkit>(
        &self,
        input: ToolkitInput,
        registry: &mut Registry,
        toolkit: &mut T,
    ) -> Option<Normalized> {
        match registry.resolve(input.handle)? {
            HandleRef::Widget(slot) => {
                let record = registry.record(slot)?;
                let (value, broadcast) = match (record.kind, input.trigger) {
                    (WidgetKind::Button, Trigger::Clicked) => (1, true),
                    (WidgetKind::Slider, Trigger::ValueChanged) => {
                        (toolkit.value(input.handle)?, self.broadcast_slider_drag)
                    }
                    (WidgetKind::Slider, Trigger::Released) => (toolkit.value(input.handle)?, true),
                    (WidgetKind::Switch | WidgetKind::Checkbox, Trigger::ValueChanged) => {
                        let checked = toolkit.state(input.handle)?.contains(StateFlags::CHECKED);
                        (i32::from(checked), true)
                    }
                    _ => return None,
                };
                Some(Normalized {
                    event: Event::new(&record.event, &record.name, value),
                    broadcast,
                })
            }
            HandleRef::RadioOption { group, option } => {
                if input.trigger != Trigger::Clicked {
                    return None;
                }
                let radio = registry.group_mut(group)?;
                if let Some(previous) = radio.option(radio.active) {
                    let _ = toolkit.clear_state(previous, StateFlags::CHECKED);
                }
                toolkit.add_state(input.handle, StateFlags::CHECKED).ok()?;
                radio.active = option;

                let value = i32::from(toolkit.state(input.handle)?.bits());
                let record = registry.records(WidgetKind::Radiobutton).get(group)?;
                Some(Normalized {
                    event: Event::new(&record.event, &record.name, value),
                    broadcast: true,
                })
            }
        }
    }
}
