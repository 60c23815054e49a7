//! MicroGUI remote protocol
//!
//! This crate defines the text protocol between a display running the GUI
//! engine and remote clients (a browser editor or monitoring page) connected
//! over a WebSocket. Every message is one text frame.
//!
//! # Protocol Overview
//!
//! ```text
//! client                              display
//!   │ ── "documentRequest" ───────────▶ │
//!   │ ◀──────────── chunk 1..n (2000B) ─ │
//!   │ ◀─────────────── "DOCUMENT SENT" ─ │
//!   │                                    │
//!   │ ── "newDocument" ───────────────▶ │
//!   │ ◀────────────────────────── "OK" ─ │
//!   │ ── chunk ───────────────────────▶ │  (repeated)
//!   │ ◀────────────────────────── "OK" ─ │
//!   │ ── "NEW DOCUMENT SENT" ─────────▶ │
//!   │ ◀─────────── "NEW DOCUMENT RECEIVED" │
//!   │                                    │
//!   │ ── {"Parent","Event","Value"} ──▶ │  control a widget
//!   │ ◀──────────── {"<name>": <value>} ─ │  state change notification
//! ```

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod chunk;
pub mod messages;
pub mod session;

pub use chunk::{DocumentChunks, CHUNK_SIZE};
pub use messages::{
    ControlMessage, Notification, ProtocolError, ACK, DOCUMENT_REQUEST, DOCUMENT_SENT,
    MAX_DOCUMENT_SIZE, NEW_DOCUMENT, NEW_DOCUMENT_RECEIVED, NEW_DOCUMENT_SENT,
};
pub use session::{RemoteSession, SessionAction};
