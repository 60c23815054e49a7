//! Board-agnostic GUI engine for MicroGUI
//!
//! This crate turns a JSON screen document into a live widget tree and
//! reduces touch input to simple events:
//!
//! - Document parsing and serialization
//! - Rendering through a [`mgui_display::WidgetToolkit`]
//! - Widget registry and programmatic access by name
//! - Event normalization with a single latest-event slot
//! - Writing live widget state back into the document
//! - Persistence and remote mirroring through [`mgui_hal`] collaborators
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod gui;
pub mod mutate;
pub mod record;
pub mod registry;
pub mod remote;
pub mod render;
pub mod sync;

pub use config::GuiConfig;
pub use document::Document;
pub use error::{Diagnostic, DocumentError, MutateError, RenderReport};
pub use event::Event;
pub use gui::{resolve_orientation, Gui, DEFAULT_DOCUMENT};
pub use record::{WidgetKind, WidgetRecord};
pub use remote::{ChannelTransport, LinkStatus, Outgoing, RemoteInbox};
