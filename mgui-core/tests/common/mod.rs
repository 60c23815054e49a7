//! Collaborator doubles shared by the engine tests
//!
//! Each double hands out a cloneable view of what it recorded, so a test can
//! box the double into the engine and still inspect it afterwards.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use mgui_core::{Gui, GuiConfig};
use mgui_display::HeadlessToolkit;
use mgui_hal::{ClientId, FlashError, FlashStorage, RemoteTransport, StorageKey};

/// Flash storage in memory
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<u8, Vec<u8>>>>,
    writes: Rc<RefCell<usize>>,
    /// Capacity of one entry; larger writes fail with `Full`
    limit: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn preload(&self, key: StorageKey, data: &[u8]) {
        self.entries.borrow_mut().insert(key.as_u8(), data.to_vec());
    }

    pub fn get(&self, key: StorageKey) -> Option<Vec<u8>> {
        self.entries.borrow().get(&key.as_u8()).cloned()
    }

    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl FlashStorage for MemoryStorage {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let entries = self.entries.borrow();
        let data = entries.get(&key.as_u8()).ok_or(FlashError::NotFound)?;
        if data.len() > buffer.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if self.limit.is_some_and(|limit| data.len() > limit) {
            return Err(FlashError::Full);
        }
        *self.writes.borrow_mut() += 1;
        self.entries.borrow_mut().insert(key.as_u8(), data.to_vec());
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.entries.borrow().contains_key(&key.as_u8())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), FlashError> {
        self.entries.borrow_mut().remove(&key.as_u8());
        Ok(())
    }
}

/// One message handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Broadcast(String),
    To(ClientId, String),
}

/// Transport that records every outbound message
#[derive(Clone)]
pub struct RecordingTransport {
    sent: Rc<RefCell<Vec<Sent>>>,
    active: Rc<RefCell<bool>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Rc::default(),
            active: Rc::new(RefCell::new(true)),
        }
    }

    pub fn set_active(&self, active: bool) {
        *self.active.borrow_mut() = active;
    }

    /// Drain everything sent so far
    pub fn take(&self) -> Vec<Sent> {
        self.sent.borrow_mut().drain(..).collect()
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.take()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Broadcast(text) => Some(text),
                Sent::To(..) => None,
            })
            .collect()
    }
}

impl RemoteTransport for RecordingTransport {
    fn broadcast(&mut self, text: &str) {
        self.sent.borrow_mut().push(Sent::Broadcast(text.to_string()));
    }

    fn send_to(&mut self, client: ClientId, text: &str) {
        self.sent.borrow_mut().push(Sent::To(client, text.to_string()));
    }

    fn is_active(&self) -> bool {
        *self.active.borrow()
    }
}

/// A canvas of `width` x `height` holding `nodes` (a comma-led list of
/// `"name": {..}` entries, or empty)
pub fn document(width: u16, height: u16, nodes: &str) -> String {
    format!(
        r#"{{"ROOT":{{"type":{{"resolvedName":"CanvasArea"}},"isCanvas":true,"props":{{"width":{},"height":{},"background":{{"r":0,"g":0,"b":0,"a":1}}}},"nodes":[]}}{}}}"#,
        width, height, nodes
    )
}

/// Node entry for `document`
pub fn node(name: &str, type_name: &str, props: &str) -> String {
    format!(
        r#","{}":{{"type":{{"resolvedName":"{}"}},"props":{{{}}}}}"#,
        name, type_name, props
    )
}

/// Engine on a fresh headless toolkit
pub fn headless_gui() -> Gui<HeadlessToolkit> {
    Gui::new(HeadlessToolkit::new(), GuiConfig::default())
}
