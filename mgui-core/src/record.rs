//! Widget records
//!
//! A record ties a toolkit handle to the node name it was built from and
//! the event id reported when it is used.

use alloc::string::String;

use mgui_display::WidgetHandle;

/// Event id given to widgets that never produce input
pub const NO_INPUT_EVENT: &str = "NoInput";

/// Widget kinds the registry keeps lists for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    Button,
    Switch,
    Slider,
    Checkbox,
    Textfield,
    Divider,
    Radiobutton,
    Progressbar,
}

impl WidgetKind {
    /// Number of kinds
    pub const COUNT: usize = 8;

    /// Every kind, in list order
    pub const ALL: [WidgetKind; Self::COUNT] = [
        WidgetKind::Button,
        WidgetKind::Switch,
        WidgetKind::Slider,
        WidgetKind::Checkbox,
        WidgetKind::Textfield,
        WidgetKind::Divider,
        WidgetKind::Radiobutton,
        WidgetKind::Progressbar,
    ];

    /// Dense index of this kind
    pub fn index(self) -> usize {
        self as usize
    }

    /// Type name used in documents (`type.resolvedName`)
    pub fn type_name(self) -> &'static str {
        match self {
            WidgetKind::Button => "Button",
            WidgetKind::Switch => "Switch",
            WidgetKind::Slider => "Slider",
            WidgetKind::Checkbox => "Checkbox",
            WidgetKind::Textfield => "Textfield",
            WidgetKind::Divider => "Divider",
            WidgetKind::Radiobutton => "Radiobutton",
            WidgetKind::Progressbar => "Progressbar",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Whether the widget reports input and takes its event id from `props.event`
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            WidgetKind::Button
                | WidgetKind::Switch
                | WidgetKind::Slider
                | WidgetKind::Checkbox
                | WidgetKind::Radiobutton
        )
    }
}

/// One rendered widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetRecord {
    /// Toolkit widget (the container, for radio groups)
    pub handle: WidgetHandle,
    /// Node name in the document
    pub name: String,
    /// Event id reported for input on this widget
    pub event: String,
    pub kind: WidgetKind,
}

impl WidgetRecord {
    /// Build a record; non-interactive kinds always get [`NO_INPUT_EVENT`]
    pub fn new(handle: WidgetHandle, kind: WidgetKind, name: &str, event: &str) -> Self {
        let event = if kind.is_interactive() {
            event
        } else {
            NO_INPUT_EVENT
        };
        Self {
            handle,
            name: String::from(name),
            event: String::from(event),
            kind,
        }
    }
}
