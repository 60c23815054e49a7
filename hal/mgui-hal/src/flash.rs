//! Persistent storage for the GUI document and engine settings
//!
//! A board crate maps [`StorageKey`]s onto whatever non-volatile store it
//! has: a flash map, an EEPROM page or a file on a host.

/// What is persisted, one entry per key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Raw text of the last persistent GUI document
    GuiDocument = 0,
    /// Engine configuration (binary postcard format)
    GuiConfig = 1,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::GuiDocument),
            1 => Some(StorageKey::GuiConfig),
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Key-value storage that survives a reset
///
/// A write replaces the whole entry. The GUI engine calls into storage from
/// its poll loop, so the methods are blocking. Implementations backed by an
/// async driver are expected to block on it or serve from a RAM mirror.
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// # Arguments
    /// * `key` - The storage key to read
    /// * `buffer` - Buffer to read data into
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError>;

    /// Write a value by key
    ///
    /// # Arguments
    /// * `key` - The storage key to write
    /// * `data` - Data to write
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> bool;

    /// Remove the value stored under `key`
    ///
    /// Removing a key that is not stored is not an error.
    fn remove(&mut self, key: StorageKey) -> Result<(), FlashError>;
}
