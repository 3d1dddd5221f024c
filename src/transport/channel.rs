use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use super::{MessageReceiver, MessageSender, RecvError, SendError, Transport, TransportEvent};
use crate::protocol::ClientMessage;

/// In-process loopback transport over a pair of ordered channels. The
/// matching `RemoteEnd` plays the server role; useful for local sessions
/// and tests.
pub struct ChannelTransport {
    outgoing: Sender<ClientMessage>,
    incoming: Receiver<TransportEvent>,
}

impl ChannelTransport {
    /// Creates a connected transport / remote-end pair.
    pub fn pair() -> (ChannelTransport, RemoteEnd) {
        let (event_sender, event_receiver) = channel();
        let (message_sender, message_receiver) = channel();
        let transport = ChannelTransport {
            outgoing: message_sender,
            incoming: event_receiver,
        };
        let remote = RemoteEnd {
            incoming: message_receiver,
            outgoing: event_sender,
        };
        (transport, remote)
    }
}

impl Transport for ChannelTransport {
    fn open(self: Box<Self>) -> (Box<dyn MessageSender>, Box<dyn MessageReceiver>) {
        let receiver = ChannelReceiver {
            receiver: self.incoming,
        };
        (Box::new(self.outgoing), Box::new(receiver))
    }
}

impl MessageSender for Sender<ClientMessage> {
    fn send(&self, message: ClientMessage) -> Result<(), SendError> {
        Sender::send(self, message).map_err(|_| SendError)
    }
}

struct ChannelReceiver {
    receiver: Receiver<TransportEvent>,
}

impl MessageReceiver for ChannelReceiver {
    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError),
        }
    }
}

/// The server side of a `ChannelTransport` pair.
pub struct RemoteEnd {
    incoming: Receiver<ClientMessage>,
    outgoing: Sender<TransportEvent>,
}

impl RemoteEnd {
    /// Takes the next message the client has sent, if any. Non-blocking.
    pub fn take_message(&self) -> Option<ClientMessage> {
        self.incoming.try_recv().ok()
    }

    /// Emits a transport event toward the client. Returns false when the
    /// client end has been dropped.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.outgoing.send(event).is_ok()
    }
}
