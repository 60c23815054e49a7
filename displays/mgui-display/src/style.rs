//! Colors, style slots and state flags

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);

    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Which part of a widget a color applies to
///
/// Mirrors the part/state split of touch toolkits: the main body, the
/// indicator (filled track, check box, switch knob track), and the knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorSlot {
    /// Main body background
    Background,
    /// Text color
    Text,
    /// Indicator background in the default state
    Indicator,
    /// Indicator background while checked
    IndicatorChecked,
    /// Indicator border
    IndicatorBorder,
    /// Slider knob
    Knob,
    /// Line stroke
    Line,
}

impl ColorSlot {
    /// Number of slots
    pub const COUNT: usize = 7;

    /// Dense index of this slot
    pub fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Interaction state of a widget
    ///
    /// Bit values follow the common embedded toolkit layout so that a raw
    /// state mask can be reported to remote clients unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StateFlags: u16 {
        const CHECKED = 0x0001;
        const FOCUSED = 0x0002;
        const FOCUS_KEY = 0x0004;
        const EDITED = 0x0008;
        const HOVERED = 0x0010;
        const PRESSED = 0x0020;
        const SCROLLED = 0x0040;
        const DISABLED = 0x0080;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "StateFlags({=u16:#x})", self.bits())
    }
}
