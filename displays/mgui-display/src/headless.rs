//! Headless widget toolkit
//!
//! Keeps the whole widget tree in memory so the engine can run on a host
//! without a display. Touch input is simulated with [`HeadlessToolkit::click`],
//! [`HeadlessToolkit::drag`] and [`HeadlessToolkit::release`]; the gestures are
//! queued and take effect on the next [`WidgetToolkit::tick`], the way a touch
//! driver's input is read during the toolkit's timer handler.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::backend::{
    Extent, Layout, Orientation, Point, Primitive, ToolkitError, ToolkitInput, Trigger,
    WidgetHandle, WidgetToolkit,
};
use crate::style::{Color, ColorSlot, StateFlags};

/// Default maximum number of live widgets
pub const DEFAULT_CAPACITY: usize = 256;

/// Default bar/slider range upper bound
const DEFAULT_RANGE_MAX: i32 = 100;

/// One widget held by the headless toolkit
#[derive(Debug, Clone)]
pub struct HeadlessWidget {
    pub primitive: Primitive,
    pub parent: Option<WidgetHandle>,
    pub x: i32,
    pub y: i32,
    pub width: Extent,
    pub height: Extent,
    pub centered: bool,
    pub border_width: Option<u8>,
    pub radius: Option<u8>,
    pub line_width: Option<u8>,
    pub font_size: Option<u8>,
    pub text: String,
    pub points: Vec<Point>,
    pub layout: Option<Layout>,
    pub state: StateFlags,
    pub min: i32,
    pub max: i32,
    pub value: i32,
    colors: [Option<Color>; ColorSlot::COUNT],
    subscriptions: Vec<Trigger>,
}

impl HeadlessWidget {
    fn new(primitive: Primitive, parent: Option<WidgetHandle>) -> Self {
        Self {
            primitive,
            parent,
            x: 0,
            y: 0,
            width: Extent::Auto,
            height: Extent::Auto,
            centered: false,
            border_width: None,
            radius: None,
            line_width: None,
            font_size: None,
            text: String::new(),
            points: Vec::new(),
            layout: None,
            state: StateFlags::empty(),
            min: 0,
            max: DEFAULT_RANGE_MAX,
            value: 0,
            colors: [None; ColorSlot::COUNT],
            subscriptions: Vec::new(),
        }
    }

    /// Color applied to a slot, if any
    pub fn color(&self, slot: ColorSlot) -> Option<Color> {
        self.colors[slot.index()]
    }

    /// Whether the widget delivers `trigger` inputs
    pub fn is_subscribed(&self, trigger: Trigger) -> bool {
        self.subscriptions.contains(&trigger)
    }

    pub fn is_checked(&self) -> bool {
        self.state.contains(StateFlags::CHECKED)
    }

    fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Click,
    Drag(i32),
    Release,
}

/// In-memory [`WidgetToolkit`]
///
/// Widgets live in a slab that is emptied on every screen clear. Handles keep
/// counting up across clears, so a handle kept from an older screen stays
/// invalid instead of aliasing a new widget.
#[derive(Debug, Clone)]
pub struct HeadlessToolkit {
    widgets: Vec<Option<HeadlessWidget>>,
    /// Raw handle of `widgets[0]`
    first: u32,
    live: usize,
    capacity: usize,
    resolution: (u16, u16),
    orientation: Orientation,
    gestures: VecDeque<(WidgetHandle, Gesture)>,
}

impl Default for HeadlessToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessToolkit {
    /// Create a toolkit with [`DEFAULT_CAPACITY`] widgets
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a toolkit that fails creation past `capacity` live widgets
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            widgets: Vec::new(),
            first: 0,
            live: 0,
            capacity,
            resolution: (0, 0),
            orientation: Orientation::Portrait,
            gestures: VecDeque::new(),
        }
    }

    /// Configured (width, height)
    pub fn resolution(&self) -> (u16, u16) {
        self.resolution
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of live widgets
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Look up a live widget
    pub fn widget(&self, handle: WidgetHandle) -> Option<&HeadlessWidget> {
        self.widgets
            .get(self.index(handle)?)
            .and_then(|slot| slot.as_ref())
    }

    /// Slots allocated since the last screen clear, live or deleted
    pub fn slab_len(&self) -> usize {
        self.widgets.len()
    }

    fn index(&self, handle: WidgetHandle) -> Option<usize> {
        handle.raw().checked_sub(self.first).map(|index| index as usize)
    }

    fn handle_at(&self, index: usize) -> WidgetHandle {
        WidgetHandle::from_raw(self.first.wrapping_add(index as u32))
    }

    /// All live widgets in creation order
    pub fn widgets(&self) -> impl Iterator<Item = (WidgetHandle, &HeadlessWidget)> {
        self.widgets.iter().enumerate().filter_map(move |(index, slot)| {
            slot.as_ref().map(|widget| (self.handle_at(index), widget))
        })
    }

    /// Live children of `parent` in creation order
    pub fn children(&self, parent: WidgetHandle) -> Vec<WidgetHandle> {
        self.widgets()
            .filter(|(_, widget)| widget.parent == Some(parent))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Live widgets of one primitive in creation order
    pub fn find_primitive(&self, primitive: Primitive) -> Vec<WidgetHandle> {
        self.widgets()
            .filter(|(_, widget)| widget.primitive == primitive)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Simulate a tap on a widget
    pub fn click(&mut self, handle: WidgetHandle) -> Result<(), ToolkitError> {
        self.queue(handle, Gesture::Click)
    }

    /// Simulate dragging a slider knob to `value`
    pub fn drag(&mut self, handle: WidgetHandle, value: i32) -> Result<(), ToolkitError> {
        self.queue(handle, Gesture::Drag(value))
    }

    /// Simulate lifting the finger off a widget
    pub fn release(&mut self, handle: WidgetHandle) -> Result<(), ToolkitError> {
        self.queue(handle, Gesture::Release)
    }

    fn queue(&mut self, handle: WidgetHandle, gesture: Gesture) -> Result<(), ToolkitError> {
        self.get(handle)?;
        self.gestures.push_back((handle, gesture));
        Ok(())
    }

    fn get(&self, handle: WidgetHandle) -> Result<&HeadlessWidget, ToolkitError> {
        self.widget(handle).ok_or(ToolkitError::InvalidHandle)
    }

    fn get_mut(&mut self, handle: WidgetHandle) -> Result<&mut HeadlessWidget, ToolkitError> {
        let index = self.index(handle).ok_or(ToolkitError::InvalidHandle)?;
        self.widgets
            .get_mut(index)
            .and_then(|slot| slot.as_mut())
            .ok_or(ToolkitError::InvalidHandle)
    }

    /// Apply one gesture, returning the triggers it fires in order
    fn apply(&mut self, handle: WidgetHandle, gesture: Gesture) -> Vec<Trigger> {
        let mut fired = Vec::new();
        let Ok(widget) = self.get_mut(handle) else {
            // Deleted between queueing and tick
            return fired;
        };
        if widget.state.contains(StateFlags::DISABLED) {
            return fired;
        }

        match gesture {
            Gesture::Click => {
                if widget.primitive.is_checkable() {
                    widget.state.toggle(StateFlags::CHECKED);
                    fired.push(Trigger::ValueChanged);
                }
                fired.push(Trigger::Clicked);
            }
            Gesture::Drag(value) => {
                if widget.primitive == Primitive::Slider {
                    let value = widget.clamp(value);
                    if value != widget.value {
                        widget.value = value;
                        fired.push(Trigger::ValueChanged);
                    }
                }
            }
            Gesture::Release => fired.push(Trigger::Released),
        }

        fired.retain(|trigger| widget.is_subscribed(*trigger));
        fired
    }
}

impl WidgetToolkit for HeadlessToolkit {
    fn configure(&mut self, width: u16, height: u16, orientation: Orientation) {
        self.resolution = (width, height);
        self.orientation = orientation;
    }

    fn clear_screen(&mut self) {
        self.first = self.first.wrapping_add(self.widgets.len() as u32);
        self.widgets.clear();
        self.live = 0;
        self.gestures.clear();
    }

    fn create(
        &mut self,
        primitive: Primitive,
        parent: Option<WidgetHandle>,
    ) -> Result<WidgetHandle, ToolkitError> {
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        if self.live >= self.capacity {
            return Err(ToolkitError::OutOfMemory);
        }

        let handle = self.handle_at(self.widgets.len());
        self.widgets.push(Some(HeadlessWidget::new(primitive, parent)));
        self.live += 1;
        Ok(handle)
    }

    fn delete(&mut self, handle: WidgetHandle) -> Result<(), ToolkitError> {
        self.get(handle)?;
        for child in self.children(handle) {
            self.delete(child)?;
        }
        if let Some(slot) = self
            .index(handle)
            .and_then(|index| self.widgets.get_mut(index))
        {
            *slot = None;
            self.live -= 1;
        }
        Ok(())
    }

    fn set_position(&mut self, handle: WidgetHandle, x: i32, y: i32) -> Result<(), ToolkitError> {
        let widget = self.get_mut(handle)?;
        widget.x = x;
        widget.y = y;
        widget.centered = false;
        Ok(())
    }

    fn set_width(&mut self, handle: WidgetHandle, width: Extent) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.width = width;
        Ok(())
    }

    fn set_height(&mut self, handle: WidgetHandle, height: Extent) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.height = height;
        Ok(())
    }

    fn center(&mut self, handle: WidgetHandle) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.centered = true;
        Ok(())
    }

    fn set_color(
        &mut self,
        handle: WidgetHandle,
        slot: ColorSlot,
        color: Color,
    ) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.colors[slot.index()] = Some(color);
        Ok(())
    }

    fn set_border_width(&mut self, handle: WidgetHandle, width: u8) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.border_width = Some(width);
        Ok(())
    }

    fn set_radius(&mut self, handle: WidgetHandle, radius: u8) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.radius = Some(radius);
        Ok(())
    }

    fn set_line_width(&mut self, handle: WidgetHandle, width: u8) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.line_width = Some(width);
        Ok(())
    }

    fn set_font(&mut self, handle: WidgetHandle, size_px: u8) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.font_size = Some(size_px);
        Ok(())
    }

    fn set_text(&mut self, handle: WidgetHandle, text: &str) -> Result<(), ToolkitError> {
        let widget = self.get_mut(handle)?;
        widget.text.clear();
        widget.text.push_str(text);
        Ok(())
    }

    fn text(&self, handle: WidgetHandle) -> Option<&str> {
        self.widget(handle).map(|widget| widget.text.as_str())
    }

    fn set_points(&mut self, handle: WidgetHandle, points: &[Point]) -> Result<(), ToolkitError> {
        let widget = self.get_mut(handle)?;
        widget.points.clear();
        widget.points.extend_from_slice(points);
        Ok(())
    }

    fn set_layout(&mut self, handle: WidgetHandle, layout: Layout) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.layout = Some(layout);
        Ok(())
    }

    fn add_state(&mut self, handle: WidgetHandle, state: StateFlags) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.state.insert(state);
        Ok(())
    }

    fn clear_state(
        &mut self,
        handle: WidgetHandle,
        state: StateFlags,
    ) -> Result<(), ToolkitError> {
        self.get_mut(handle)?.state.remove(state);
        Ok(())
    }

    fn state(&self, handle: WidgetHandle) -> Option<StateFlags> {
        self.widget(handle).map(|widget| widget.state)
    }

    fn set_range(&mut self, handle: WidgetHandle, min: i32, max: i32) -> Result<(), ToolkitError> {
        let widget = self.get_mut(handle)?;
        // Toolkits swap a reversed range rather than reject it
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        widget.min = min;
        widget.max = max;
        widget.value = widget.clamp(widget.value);
        Ok(())
    }

    fn set_value(&mut self, handle: WidgetHandle, value: i32) -> Result<(), ToolkitError> {
        let widget = self.get_mut(handle)?;
        widget.value = widget.clamp(value);
        Ok(())
    }

    fn value(&self, handle: WidgetHandle) -> Option<i32> {
        self.widget(handle)
            .filter(|widget| widget.primitive.has_value())
            .map(|widget| widget.value)
    }

    fn subscribe(&mut self, handle: WidgetHandle, trigger: Trigger) -> Result<(), ToolkitError> {
        let widget = self.get_mut(handle)?;
        if !widget.subscriptions.contains(&trigger) {
            widget.subscriptions.push(trigger);
        }
        Ok(())
    }

    fn tick(&mut self, sink: &mut dyn FnMut(ToolkitInput)) {
        while let Some((handle, gesture)) = self.gestures.pop_front() {
            for trigger in self.apply(handle, gesture) {
                sink(ToolkitInput { handle, trigger });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(toolkit: &mut HeadlessToolkit) -> Vec<ToolkitInput> {
        let mut inputs = Vec::new();
        toolkit.tick(&mut |input| inputs.push(input));
        inputs
    }

    #[test]
    fn test_create_and_delete_children() {
        let mut toolkit = HeadlessToolkit::new();
        let parent = toolkit.create(Primitive::Container, None).unwrap();
        let child = toolkit.create(Primitive::Checkbox, Some(parent)).unwrap();
        assert_eq!(toolkit.live_count(), 2);
        assert_eq!(toolkit.children(parent), [child]);

        toolkit.delete(parent).unwrap();
        assert_eq!(toolkit.live_count(), 0);
        assert!(toolkit.widget(child).is_none());
    }

    #[test]
    fn test_handles_not_reused_after_clear() {
        let mut toolkit = HeadlessToolkit::new();
        let first = toolkit.create(Primitive::Panel, None).unwrap();
        toolkit.clear_screen();
        let second = toolkit.create(Primitive::Panel, None).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            toolkit.set_position(first, 1, 1),
            Err(ToolkitError::InvalidHandle)
        );
    }

    #[test]
    fn test_clear_reclaims_slots() {
        let mut toolkit = HeadlessToolkit::new();
        for _ in 0..3 {
            for _ in 0..5 {
                toolkit.create(Primitive::Label, None).unwrap();
            }
            assert_eq!(toolkit.slab_len(), 5);
            toolkit.clear_screen();
            assert_eq!(toolkit.slab_len(), 0);
        }
        let handle = toolkit.create(Primitive::Label, None).unwrap();
        assert_eq!(handle.raw(), 15);
        assert_eq!(toolkit.widgets().map(|(h, _)| h).collect::<Vec<_>>(), [handle]);
    }

    #[test]
    fn test_capacity_limit() {
        let mut toolkit = HeadlessToolkit::with_capacity(1);
        toolkit.create(Primitive::Panel, None).unwrap();
        assert_eq!(
            toolkit.create(Primitive::Panel, None),
            Err(ToolkitError::OutOfMemory)
        );
    }

    #[test]
    fn test_click_toggles_checkable() {
        let mut toolkit = HeadlessToolkit::new();
        let switch = toolkit.create(Primitive::Switch, None).unwrap();
        toolkit.subscribe(switch, Trigger::ValueChanged).unwrap();

        toolkit.click(switch).unwrap();
        // Nothing happens until the toolkit ticks
        assert!(!toolkit.widget(switch).unwrap().is_checked());

        let inputs = collect(&mut toolkit);
        assert_eq!(
            inputs,
            [ToolkitInput {
                handle: switch,
                trigger: Trigger::ValueChanged
            }]
        );
        assert!(toolkit.widget(switch).unwrap().is_checked());
    }

    #[test]
    fn test_unsubscribed_triggers_are_dropped() {
        let mut toolkit = HeadlessToolkit::new();
        let button = toolkit.create(Primitive::Button, None).unwrap();
        toolkit.click(button).unwrap();
        assert!(collect(&mut toolkit).is_empty());
    }

    #[test]
    fn test_drag_clamps_and_skips_unchanged() {
        let mut toolkit = HeadlessToolkit::new();
        let slider = toolkit.create(Primitive::Slider, None).unwrap();
        toolkit.set_range(slider, 0, 50).unwrap();
        toolkit.subscribe(slider, Trigger::ValueChanged).unwrap();

        toolkit.drag(slider, 80).unwrap();
        toolkit.drag(slider, 50).unwrap();
        let inputs = collect(&mut toolkit);
        assert_eq!(inputs.len(), 1);
        assert_eq!(toolkit.value(slider), Some(50));
    }

    #[test]
    fn test_disabled_widget_ignores_input() {
        let mut toolkit = HeadlessToolkit::new();
        let checkbox = toolkit.create(Primitive::Checkbox, None).unwrap();
        toolkit.subscribe(checkbox, Trigger::ValueChanged).unwrap();
        toolkit.add_state(checkbox, StateFlags::DISABLED).unwrap();

        toolkit.click(checkbox).unwrap();
        assert!(collect(&mut toolkit).is_empty());
        assert!(!toolkit.widget(checkbox).unwrap().is_checked());
    }

    #[test]
    fn test_gesture_on_deleted_widget_is_skipped() {
        let mut toolkit = HeadlessToolkit::new();
        let button = toolkit.create(Primitive::Button, None).unwrap();
        toolkit.subscribe(button, Trigger::Clicked).unwrap();
        toolkit.click(button).unwrap();
        toolkit.delete(button).unwrap();
        assert!(collect(&mut toolkit).is_empty());
    }

    #[test]
    fn test_value_only_for_valued_primitives() {
        let mut toolkit = HeadlessToolkit::new();
        let label = toolkit.create(Primitive::Label, None).unwrap();
        let bar = toolkit.create(Primitive::Bar, None).unwrap();
        toolkit.set_value(bar, 140).unwrap();
        assert_eq!(toolkit.value(label), None);
        assert_eq!(toolkit.value(bar), Some(100));
    }
}
