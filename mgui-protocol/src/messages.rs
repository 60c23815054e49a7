//! Message types for the remote protocol
//!
//! Messages are divided into two categories:
//! - Client → Display: fixed command strings, document chunks, control messages
//! - Display → Client: replies, document chunks, state change notifications

use alloc::format;
use alloc::string::String;
use serde::Deserialize;

// Commands: Client → Display
pub const DOCUMENT_REQUEST: &str = "documentRequest";
pub const NEW_DOCUMENT: &str = "newDocument";
pub const NEW_DOCUMENT_SENT: &str = "NEW DOCUMENT SENT";

// Replies: Display → Client
pub const ACK: &str = "OK";
pub const DOCUMENT_SENT: &str = "DOCUMENT SENT";
pub const NEW_DOCUMENT_RECEIVED: &str = "NEW DOCUMENT RECEIVED";

/// Largest document the display accepts, in bytes
pub const MAX_DOCUMENT_SIZE: usize = 20_000;

/// Type tag attached to text notifications
const TEXT_NOTIFICATION_TYPE: &str = "Textfield";

/// Errors that can occur while handling protocol messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Control message is not the expected JSON object
    Malformed,
    /// Incoming document exceeds [`MAX_DOCUMENT_SIZE`]
    DocumentTooLarge,
    /// End of document received without a transfer in progress
    UnexpectedEnd,
    /// Outgoing message could not be encoded
    Encode,
}

impl From<serde_json::Error> for ProtocolError {
    fn from(_: serde_json::Error) -> Self {
        ProtocolError::Malformed
    }
}

/// Remote control of one widget
///
/// `{"Parent": "<widget name>", "Event": "<event id>", "Value": <int>}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControlMessage {
    /// Name of the widget to change
    #[serde(rename = "Parent")]
    pub parent: String,
    /// Event id reported to the application
    #[serde(rename = "Event", default)]
    pub event: String,
    /// New value
    #[serde(rename = "Value", default)]
    pub value: i32,
}

impl ControlMessage {
    /// Parse a control message from its JSON text
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// State change pushed to every connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification<'a> {
    /// Numeric value of a widget: `{"<name>": <value>}`
    Value { name: &'a str, value: i32 },
    /// Text of a textfield: `{"<name>": "<text>", "type": "Textfield"}`
    Text { name: &'a str, text: &'a str },
}

impl Notification<'_> {
    /// Encode as a JSON text message
    pub fn encode(&self) -> Result<String, ProtocolError> {
        match self {
            Notification::Value { name, value } => Ok(format!("{{{}: {}}}", quote(name)?, value)),
            Notification::Text { name, text } => Ok(format!(
                "{{{}: {}, \"type\": \"{}\"}}",
                quote(name)?,
                quote(text)?,
                TEXT_NOTIFICATION_TYPE
            )),
        }
    }
}

/// JSON string literal for `text`, quotes included
fn quote(text: &str) -> Result<String, ProtocolError> {
    serde_json::to_string(text).map_err(|_| ProtocolError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_notification() {
        let n = Notification::Value {
            name: "Slider_1",
            value: 42,
        };
        assert_eq!(n.encode().unwrap(), "{\"Slider_1\": 42}");
    }

    #[test]
    fn test_negative_value_notification() {
        let n = Notification::Value {
            name: "Slider_1",
            value: -5,
        };
        assert_eq!(n.encode().unwrap(), "{\"Slider_1\": -5}");
    }

    #[test]
    fn test_text_notification() {
        let n = Notification::Text {
            name: "Textfield_1",
            text: "Hello",
        };
        assert_eq!(
            n.encode().unwrap(),
            "{\"Textfield_1\": \"Hello\", \"type\": \"Textfield\"}"
        );
    }

    #[test]
    fn test_text_notification_is_escaped() {
        let n = Notification::Text {
            name: "a\"b",
            text: "line\nbreak",
        };
        let encoded = n.encode().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed["a\"b"], "line\nbreak");
        assert_eq!(parsed["type"], "Textfield");
    }

    #[test]
    fn test_control_message() {
        let msg =
            ControlMessage::parse(r#"{"Parent":"Switch_1","Event":"light","Value":1}"#).unwrap();
        assert_eq!(msg.parent, "Switch_1");
        assert_eq!(msg.event, "light");
        assert_eq!(msg.value, 1);
    }

    #[test]
    fn test_control_message_defaults() {
        let msg = ControlMessage::parse(r#"{"Parent":"Slider_1"}"#).unwrap();
        assert_eq!(msg.event, "");
        assert_eq!(msg.value, 0);
    }

    #[test]
    fn test_control_message_malformed() {
        assert_eq!(
            ControlMessage::parse("not json"),
            Err(ProtocolError::Malformed)
        );
        assert_eq!(
            ControlMessage::parse(r#"{"Event":"x","Value":1}"#),
            Err(ProtocolError::Malformed)
        );
        assert_eq!(
            ControlMessage::parse(r#"{"Parent":"x","Value":"high"}"#),
            Err(ProtocolError::Malformed)
        );
    }
}
