//! Widget toolkit trait
//!
//! Defines the interface between the rendering engine and whatever graphics
//! library owns the widget tree on the device.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::style::{Color, ColorSlot, StateFlags};

/// Toolkit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToolkitError {
    /// No memory left for another widget
    OutOfMemory,
    /// Handle does not refer to a live widget
    InvalidHandle,
}

/// Opaque reference to a toolkit widget
///
/// Handles are never dereferenced by the engine. They are only compared,
/// stored and handed back to the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetHandle(u32);

impl WidgetHandle {
    /// Wrap a raw toolkit identifier
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw toolkit identifier
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Widget primitives the engine builds screens from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Primitive {
    /// Plain rectangle, used for backgrounds and dividers
    Panel,
    /// Pressable button (takes a label child)
    Button,
    /// Text label
    Label,
    /// Two-state switch
    Switch,
    /// Horizontal slider with knob
    Slider,
    /// Check box with optional text
    Checkbox,
    /// Progress bar
    Bar,
    /// Polyline
    Line,
    /// Transparent container for laid-out children
    Container,
}

impl Primitive {
    /// Whether a click toggles the checked state
    pub fn is_checkable(self) -> bool {
        matches!(self, Primitive::Switch | Primitive::Checkbox)
    }

    /// Whether the primitive carries a numeric value and range
    pub fn has_value(self) -> bool {
        matches!(self, Primitive::Slider | Primitive::Bar)
    }
}

/// Input triggers a widget can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Pressed and released over the widget
    Clicked,
    /// Value or checked state changed
    ValueChanged,
    /// Touch released after a press or drag
    Released,
}

/// Raw input delivered by the toolkit for a subscribed widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToolkitInput {
    pub handle: WidgetHandle,
    pub trigger: Trigger,
}

/// Display orientation
///
/// Discriminants match the rotation index drivers use (quarter turns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Portrait = 0,
    Landscape = 1,
    PortraitFlipped = 2,
    LandscapeFlipped = 3,
}

impl Orientation {
    /// Orientation for a rotation index, wrapping past a full turn
    pub fn from_rotation(rotation: u8) -> Self {
        match rotation % 4 {
            0 => Orientation::Portrait,
            1 => Orientation::Landscape,
            2 => Orientation::PortraitFlipped,
            _ => Orientation::LandscapeFlipped,
        }
    }

    /// Rotation index (quarter turns)
    pub fn rotation(self) -> u8 {
        self as u8
    }

    /// Whether the long side is horizontal
    pub fn is_landscape(self) -> bool {
        matches!(self, Orientation::Landscape | Orientation::LandscapeFlipped)
    }
}

/// Size along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Extent {
    /// Toolkit default for the primitive
    #[default]
    Auto,
    /// Fit the content
    Content,
    /// Fixed size in pixels
    Px(u16),
}

/// Child arrangement inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layout {
    /// Children stacked top to bottom
    Column,
    /// Children side by side
    Row,
}

/// Pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Widget toolkit trait
///
/// Provides a hardware-agnostic interface for building and styling a widget
/// tree. Every widget lives on the active screen; `parent: None` places it
/// directly on the screen.
///
/// Setters on a dead handle return [`ToolkitError::InvalidHandle`].
pub trait WidgetToolkit {
    /// Set the resolution and rotation of the display
    fn configure(&mut self, width: u16, height: u16, orientation: Orientation);

    /// Delete every widget on the active screen
    fn clear_screen(&mut self);

    /// Create a widget
    fn create(
        &mut self,
        primitive: Primitive,
        parent: Option<WidgetHandle>,
    ) -> Result<WidgetHandle, ToolkitError>;

    /// Delete a widget and its children
    fn delete(&mut self, handle: WidgetHandle) -> Result<(), ToolkitError>;

    /// Place a widget relative to its parent
    fn set_position(&mut self, handle: WidgetHandle, x: i32, y: i32) -> Result<(), ToolkitError>;

    fn set_width(&mut self, handle: WidgetHandle, width: Extent) -> Result<(), ToolkitError>;

    fn set_height(&mut self, handle: WidgetHandle, height: Extent) -> Result<(), ToolkitError>;

    /// Center a widget inside its parent
    fn center(&mut self, handle: WidgetHandle) -> Result<(), ToolkitError>;

    fn set_color(
        &mut self,
        handle: WidgetHandle,
        slot: ColorSlot,
        color: Color,
    ) -> Result<(), ToolkitError>;

    fn set_border_width(&mut self, handle: WidgetHandle, width: u8) -> Result<(), ToolkitError>;

    fn set_radius(&mut self, handle: WidgetHandle, radius: u8) -> Result<(), ToolkitError>;

    /// Stroke width for line primitives
    fn set_line_width(&mut self, handle: WidgetHandle, width: u8) -> Result<(), ToolkitError>;

    /// Select the font by pixel size
    ///
    /// The engine only asks for sizes from its configured font table.
    fn set_font(&mut self, handle: WidgetHandle, size_px: u8) -> Result<(), ToolkitError>;

    /// Set the text of a label, button label or checkbox
    fn set_text(&mut self, handle: WidgetHandle, text: &str) -> Result<(), ToolkitError>;

    /// Current text of a widget
    fn text(&self, handle: WidgetHandle) -> Option<&str>;

    /// Set the points of a line primitive
    fn set_points(&mut self, handle: WidgetHandle, points: &[Point]) -> Result<(), ToolkitError>;

    fn set_layout(&mut self, handle: WidgetHandle, layout: Layout) -> Result<(), ToolkitError>;

    fn add_state(&mut self, handle: WidgetHandle, state: StateFlags) -> Result<(), ToolkitError>;

    fn clear_state(&mut self, handle: WidgetHandle, state: StateFlags)
        -> Result<(), ToolkitError>;

    /// Current state flags of a widget
    fn state(&self, handle: WidgetHandle) -> Option<StateFlags>;

    /// Set the value range of a slider or bar
    fn set_range(&mut self, handle: WidgetHandle, min: i32, max: i32) -> Result<(), ToolkitError>;

    /// Set the value of a slider or bar without animation
    ///
    /// Values outside the range are clamped.
    fn set_value(&mut self, handle: WidgetHandle, value: i32) -> Result<(), ToolkitError>;

    /// Current value of a slider or bar
    fn value(&self, handle: WidgetHandle) -> Option<i32>;

    /// Deliver `trigger` inputs for this widget from `tick`
    fn subscribe(&mut self, handle: WidgetHandle, trigger: Trigger) -> Result<(), ToolkitError>;

    /// Run the toolkit's periodic work
    ///
    /// Every input for a subscribed widget is passed to `sink` in the order
    /// it happened, before `tick` returns. Widget state (checked bits,
    /// values) is already updated when the input is delivered.
    fn tick(&mut self, sink: &mut dyn FnMut(ToolkitInput));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_wraps() {
        assert_eq!(Orientation::from_rotation(0), Orientation::Portrait);
        assert_eq!(Orientation::from_rotation(3), Orientation::LandscapeFlipped);
        assert_eq!(Orientation::from_rotation(5), Orientation::Landscape);
    }

    #[test]
    fn test_orientation_landscape() {
        assert!(!Orientation::Portrait.is_landscape());
        assert!(Orientation::Landscape.is_landscape());
        assert!(!Orientation::PortraitFlipped.is_landscape());
        assert!(Orientation::LandscapeFlipped.is_landscape());
    }

    #[test]
    fn test_primitive_capabilities() {
        assert!(Primitive::Switch.is_checkable());
        assert!(Primitive::Checkbox.is_checkable());
        assert!(!Primitive::Button.is_checkable());
        assert!(Primitive::Slider.has_value());
        assert!(Primitive::Bar.has_value());
        assert!(!Primitive::Label.has_value());
    }
}
