//! Remote link plumbing
//!
//! The network stack usually runs in its own task. Inbound messages reach
//! the engine through a [`RemoteInbox`] that the poll loop drains, and
//! outbound messages can leave through a [`ChannelTransport`] so the engine
//! never waits on the network.

use alloc::string::String;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use mgui_hal::{ClientId, RemoteTransport};

/// Network link state as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Link up; `address` is shown in the status textfield
    Connected { address: String },
    Disconnected,
}

/// One inbound text message and the client it came from
pub type Inbound = (ClientId, String);

/// Inbound queue filled by the network task and drained by the poll loop
pub type RemoteInbox<M, const N: usize> = Channel<M, Inbound, N>;

/// Queue a message for the poll loop, dropping it if the inbox is full
pub fn deliver<M: RawMutex, const N: usize>(
    inbox: &RemoteInbox<M, N>,
    client: ClientId,
    text: String,
) -> bool {
    if inbox.try_send((client, text)).is_err() {
        warn!("Remote inbox full, message from client {} dropped", client.0);
        return false;
    }
    true
}

/// Outbound message queued by [`ChannelTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// For every connected client
    Broadcast(String),
    /// For one client
    To(ClientId, String),
}

/// [`RemoteTransport`] that queues outbound messages for a network task
pub struct ChannelTransport<M: RawMutex + 'static, const N: usize> {
    outbox: &'static Channel<M, Outgoing, N>,
}

impl<M: RawMutex + 'static, const N: usize> ChannelTransport<M, N> {
    pub fn new(outbox: &'static Channel<M, Outgoing, N>) -> Self {
        Self { outbox }
    }

    fn queue(&self, message: Outgoing) {
        if self.outbox.try_send(message).is_err() {
            warn!("Remote outbox full, message dropped");
        }
    }
}

impl<M: RawMutex + 'static, const N: usize> RemoteTransport for ChannelTransport<M, N> {
    fn broadcast(&mut self, text: &str) {
        self.queue(Outgoing::Broadcast(String::from(text)));
    }

    fn send_to(&mut self, client: ClientId, text: &str) {
        self.queue(Outgoing::To(client, String::from(text)));
    }

    fn is_active(&self) -> bool {
        true
    }
}
