//! MicroGUI Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the GUI engine talks to
//! without knowing which board or network stack sits behind them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / mgui-core engine         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mgui-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ flash driver  │       │ WebSocket     │
//! │ (board crate) │       │ server        │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashStorage`] - Persistent key-value storage
//! - [`remote::RemoteTransport`] - Fire-and-forget text messaging to remote clients

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod remote;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use remote::{ClientId, RemoteTransport};
