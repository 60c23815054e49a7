//! Remote transport abstraction
//!
//! The GUI engine mirrors widget changes to remote clients and answers
//! document requests. What carries the text (a WebSocket server, a serial
//! bridge) is up to the implementation.

/// Identifies one connected remote client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClientId(pub u32);

/// Outbound text messaging to remote clients
///
/// All methods are fire-and-forget: they must not block the caller and
/// report nothing back. Implementations drop messages they cannot queue.
pub trait RemoteTransport {
    /// Send a text message to every connected client
    fn broadcast(&mut self, text: &str);

    /// Send a text message to one client
    fn send_to(&mut self, client: ClientId, text: &str);

    /// Whether the transport is up and broadcasting is worthwhile
    fn is_active(&self) -> bool;
}

