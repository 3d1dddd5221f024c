mod channel;

pub use channel::{ChannelTransport, RemoteEnd};

use crate::protocol::{ClientMessage, ServerMessage};

/// Error returned when the transport cannot send an outgoing message.
#[derive(Debug)]
pub struct SendError;

/// Error returned when the transport's receive side has failed.
#[derive(Debug)]
pub struct RecvError;

/// Events surfaced by a transport's receive side.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The connection opened and the server assigned a client id during the
    /// transport-level welcome.
    Opened { client_id: String },
    /// A structured message arrived.
    Message(ServerMessage),
    /// The transport reported an error.
    Error(String),
    /// The connection closed.
    Closed,
}

/// A connectable transport. The endpoint to reach lives in the transport's
/// own construction; opening consumes the transport and yields its paired
/// send/receive halves. Dropping both halves closes the connection.
pub trait Transport {
    fn open(self: Box<Self>) -> (Box<dyn MessageSender>, Box<dyn MessageReceiver>);
}

/// Sends messages toward the server.
pub trait MessageSender: Send {
    fn send(&self, message: ClientMessage) -> Result<(), SendError>;
}

/// Receives transport events. Must not block: returns `Ok(None)` when no
/// event has arrived yet. A threaded transport implementation queues inbound
/// messages and hands them over here with arrival order preserved.
pub trait MessageReceiver: Send {
    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError>;
}
