//! Error and diagnostic types
//!
//! Nothing in the engine is fatal. Document errors abort one render and
//! leave the previous screen in place; node-level problems are collected as
//! [`Diagnostic`]s while the rest of the document renders.

use alloc::string::String;
use alloc::vec::Vec;

use mgui_display::ToolkitError;
use mgui_hal::FlashError;

use crate::record::WidgetKind;

/// Document-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DocumentError {
    /// Text is not well-formed JSON
    Syntax,
    /// Top level is not an object
    NotAnObject,
    /// No `ROOT` node, or `ROOT` has no `props`
    MissingRoot,
    /// `ROOT.props.width`/`height` missing or out of range
    MissingDimensions,
    /// Text exceeds the document size limit
    TooLarge,
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            serde_json::error::Category::Data => DocumentError::NotAnObject,
            _ => DocumentError::Syntax,
        }
    }
}

/// Failures of programmatic widget access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MutateError {
    /// No widget of a supported kind has this name
    NotFound,
    /// The widget exists but does not support the operation
    Unsupported(WidgetKind),
    /// Value does not select an option of a radio group
    OutOfRange,
    /// The toolkit rejected the change
    Toolkit(ToolkitError),
}

impl From<ToolkitError> for MutateError {
    fn from(e: ToolkitError) -> Self {
        MutateError::Toolkit(e)
    }
}

/// Non-fatal problem found while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Node is not an object with `type.resolvedName` and `props`
    MalformedNode { node: String },
    /// `type.resolvedName` names no known widget
    UnknownType { node: String, type_name: String },
    /// A second canvas node re-created the background
    DuplicateCanvas { node: String },
    /// The toolkit could not build the widget
    WidgetUnavailable { node: String, error: ToolkitError },
    /// The document could not be persisted
    Storage(FlashError),
}

/// Outcome of a successful render
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub width: u16,
    pub height: u16,
    /// Registered widgets, radio groups counted once
    pub widgets: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderReport {
    /// Whether every node rendered and the document was stored if asked
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
