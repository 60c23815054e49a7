//! Inbound session handling
//!
//! A [`RemoteSession`] turns each text message from a client into an action
//! for the engine. Fixed command strings are recognised in every state; any
//! other text is a document chunk while a transfer is open and a control
//! message otherwise.

use alloc::string::String;

use crate::messages::{
    ControlMessage, ProtocolError, ACK, DOCUMENT_REQUEST, MAX_DOCUMENT_SIZE, NEW_DOCUMENT,
    NEW_DOCUMENT_RECEIVED, NEW_DOCUMENT_SENT,
};

/// What the engine should do with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Refresh the document and send it to the client in chunks
    SendDocument,
    /// Transfer started or chunk stored; reply [`ACK`]
    Acknowledge,
    /// Transfer finished; render the document, then reply
    /// [`NEW_DOCUMENT_RECEIVED`]
    DocumentReceived(String),
    /// Apply a value to a widget and report it as an event
    Control(ControlMessage),
}

impl SessionAction {
    /// Reply owed to the client once the action has been carried out
    pub fn reply(&self) -> Option<&'static str> {
        match self {
            SessionAction::Acknowledge => Some(ACK),
            SessionAction::DocumentReceived(_) => Some(NEW_DOCUMENT_RECEIVED),
            SessionAction::SendDocument | SessionAction::Control(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    /// No transfer open
    Idle,
    /// Collecting document chunks
    Receiving(String),
}

/// State machine for one remote link
#[derive(Debug, Clone)]
pub struct RemoteSession {
    state: SessionState,
}

impl Default for RemoteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Abandon any open transfer
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Whether a document transfer is open
    pub fn is_receiving(&self) -> bool {
        matches!(self.state, SessionState::Receiving(_))
    }

    /// Feed one text message to the session
    ///
    /// An oversized transfer is abandoned and reported as
    /// [`ProtocolError::DocumentTooLarge`]; the session is idle afterwards.
    pub fn feed(&mut self, message: &str) -> Result<SessionAction, ProtocolError> {
        match message {
            DOCUMENT_REQUEST => Ok(SessionAction::SendDocument),
            NEW_DOCUMENT => {
                self.state = SessionState::Receiving(String::new());
                Ok(SessionAction::Acknowledge)
            }
            NEW_DOCUMENT_SENT => {
                match core::mem::replace(&mut self.state, SessionState::Idle) {
                    SessionState::Receiving(document) => {
                        Ok(SessionAction::DocumentReceived(document))
                    }
                    SessionState::Idle => Err(ProtocolError::UnexpectedEnd),
                }
            }
            chunk => match &mut self.state {
                SessionState::Receiving(document) => {
                    if document.len() + chunk.len() > MAX_DOCUMENT_SIZE {
                        self.reset();
                        return Err(ProtocolError::DocumentTooLarge);
                    }
                    document.push_str(chunk);
                    Ok(SessionAction::Acknowledge)
                }
                SessionState::Idle => Ok(SessionAction::Control(ControlMessage::parse(chunk)?)),
            },
        }
    }
}
