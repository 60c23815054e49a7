//! Engine configuration
//!
//! Settings that are not part of any document: the font table, display
//! orientation, remote broadcasting and link indication. Stored in flash as
//! postcard-serialized binary data under [`StorageKey::GuiConfig`].

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use mgui_display::{Color, Orientation};
use mgui_hal::{FlashError, FlashStorage, StorageKey};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum number of font sizes
pub const MAX_FONT_SIZES: usize = 8;

/// Maximum length of a widget name stored in the configuration
pub const MAX_FIELD_NAME_LEN: usize = 32;

/// Maximum serialized config size
const MAX_CONFIG_SIZE: usize = 128;

/// Font sizes the toolkit is built with, in pixels
pub const DEFAULT_FONT_SIZES: [u8; 5] = [14, 18, 24, 32, 40];

/// Textfield that shows the network address
pub const DEFAULT_STATUS_FIELD: &str = "default_IP";

/// Inset of the link border from the screen edge, in pixels
pub const BORDER_INSET: i32 = 4;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GuiConfig {
    /// Layout version, checked on load
    pub version: u8,
    /// Available font sizes in ascending order
    pub font_sizes: Vec<u8, MAX_FONT_SIZES>,
    /// Orientation used when `init` is not given one
    pub orientation: Option<Orientation>,
    /// Report every slider movement remotely, not just the release
    pub broadcast_slider_drag: bool,
    /// Textfield that shows the network address while connected
    pub status_field: String<MAX_FIELD_NAME_LEN>,
    /// Link border color
    pub border_color: Color,
    /// Link border stroke width
    pub border_width: u8,
}

impl Default for GuiConfig {
    fn default() -> Self {
        let mut font_sizes = Vec::new();
        for size in DEFAULT_FONT_SIZES {
            let _ = font_sizes.push(size);
        }
        let mut status_field = String::new();
        let _ = status_field.push_str(DEFAULT_STATUS_FIELD);

        Self {
            version: CONFIG_VERSION,
            font_sizes,
            orientation: None,
            broadcast_slider_drag: false,
            status_field,
            border_color: Color::RED,
            border_width: 4,
        }
    }
}

impl GuiConfig {
    /// Font size for a requested size
    ///
    /// Picks the smallest available size not below the request, or the
    /// largest size when the request exceeds them all. `None` when the font
    /// table is empty.
    pub fn font_for(&self, requested: i32) -> Option<u8> {
        self.font_sizes
            .iter()
            .copied()
            .find(|size| requested <= i32::from(*size))
            .or_else(|| self.font_sizes.last().copied())
    }

    /// Load configuration from flash
    pub fn load(storage: &mut dyn FlashStorage) -> Result<Self, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = storage.read(StorageKey::GuiConfig, &mut buffer)?;
        debug!("Read {} bytes of config from flash", len);

        let config: GuiConfig =
            postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;
        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: expected {}, got {}",
                CONFIG_VERSION,
                config.version
            );
            return Err(ConfigError::VersionMismatch);
        }
        Ok(config)
    }

    /// Load configuration from flash, falling back to defaults
    pub fn load_or_default(storage: &mut dyn FlashStorage) -> Self {
        match Self::load(storage) {
            Ok(config) => {
                info!("Loaded GUI configuration");
                config
            }
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                debug!("No GUI configuration in flash, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!("Failed to load GUI configuration: {:?}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Store configuration to flash
    pub fn store(&self, storage: &mut dyn FlashStorage) -> Result<(), ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let bytes =
            postcard::to_slice(self, &mut buffer).map_err(|_| ConfigError::Serialize)?;
        debug!("Saving {} bytes of config to flash", bytes.len());
        storage.write(StorageKey::GuiConfig, bytes)?;
        Ok(())
    }
}
