use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::{
    change::{ChangeEvent, DataChange},
    dispatcher::ChangeDispatcher,
    error::ClientError,
    events::{ClientEvent, ClientEvents},
    pattern::PathPattern,
    protocol::{ClientMessage, ServerMessage},
    session::{MemorySessionStore, SessionStatus, SessionStore},
    transport::{MessageReceiver, MessageSender, Transport, TransportEvent},
};

/// A join or rejoin handshake in flight. The attempt token ties handshake
/// responses to the request that caused them; responses carrying a stale
/// token are discarded.
struct PendingJoin {
    room: String,
    attempt: u64,
}

/// Client half of a room session. Drives the connect/join/rejoin/leave
/// lifecycle, sends application messages once joined, and pumps incoming
/// patches into the listener registry.
///
/// The host owns exactly one `Client` per session and calls [`Client::pump`]
/// every tick; all listener dispatch happens synchronously inside that call.
pub struct Client {
    status: SessionStatus,
    client_id: Option<String>,
    room: Option<String>,
    session_id: Option<String>,
    attempt: u64,
    pending: Option<PendingJoin>,
    sender: Option<Box<dyn MessageSender>>,
    receiver: Option<Box<dyn MessageReceiver>>,
    dispatcher: ChangeDispatcher,
    store: Box<dyn SessionStore>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self::with_session_store(Box::new(MemorySessionStore::new()))
    }

    /// Creates a client with a host-supplied session store, for hosts that
    /// persist the session id across restarts.
    pub fn with_session_store(store: Box<dyn SessionStore>) -> Self {
        Self {
            status: SessionStatus::Idle,
            client_id: None,
            room: None,
            session_id: None,
            attempt: 0,
            pending: None,
            sender: None,
            receiver: None,
            dispatcher: ChangeDispatcher::new(),
            store,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The server-assigned client id, available from `Connected` onward.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// The session id of the joined room, available from `Joined` onward.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The name of the joined room, available from `Joined` onward.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    // Listener registration

    /// Registers a handler for changes matching a path pattern such as
    /// `players/:id` or `players/:id/:axis`. Registrations live until the
    /// session ends.
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<(), ClientError>
    where
        F: FnMut(&DataChange) + 'static,
    {
        let pattern = PathPattern::parse(pattern)?;
        self.dispatcher.register(pattern, Box::new(handler));
        Ok(())
    }

    /// Registers the handler invoked for changes matching no registered
    /// pattern. At most one; a later registration replaces it.
    pub fn register_fallback<F>(&mut self, handler: F)
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.dispatcher.register_fallback(Box::new(handler));
    }

    /// Registers the handler for the full-state snapshot delivered once per
    /// successful join, before any incremental patch.
    pub fn on_first_state<F>(&mut self, handler: F)
    where
        F: FnMut(&Value) + 'static,
    {
        self.dispatcher.on_first_state(Box::new(handler));
    }

    /// Registers the handler for application-level messages from the room.
    pub fn on_message<F>(&mut self, handler: F)
    where
        F: FnMut(&Value) + 'static,
    {
        self.dispatcher.on_message(Box::new(handler));
    }

    // Session lifecycle

    /// Opens the given transport. Legal only from `Idle`; the client moves
    /// to `Connected` once the transport reports open.
    pub fn connect<T: Transport + 'static>(&mut self, transport: T) -> Result<(), ClientError> {
        if self.status != SessionStatus::Idle {
            return Err(ClientError::InvalidState {
                operation: "connect",
                status: self.status,
            });
        }
        let (sender, receiver) = Box::new(transport).open();
        self.sender = Some(sender);
        self.receiver = Some(receiver);
        self.status = SessionStatus::Connecting;
        info!("Connecting to server");
        Ok(())
    }

    /// Requests creation of or entry into a named room, with an arbitrary
    /// options payload (e.g. `create: true`). On success the server issues a
    /// session id, which is persisted for a later [`Client::rejoin`].
    pub fn join(&mut self, room: &str, options: Map<String, Value>) -> Result<(), ClientError> {
        if self.status != SessionStatus::Connected {
            return Err(ClientError::InvalidState {
                operation: "join",
                status: self.status,
            });
        }
        self.attempt += 1;
        self.send_message(ClientMessage::JoinRoom {
            room: room.to_string(),
            options,
            attempt: self.attempt,
        })?;
        self.pending = Some(PendingJoin {
            room: room.to_string(),
            attempt: self.attempt,
        });
        self.status = SessionStatus::Joining;
        debug!("Joining room '{}'", room);
        Ok(())
    }

    /// Resumes a prior membership in a named room using the persisted
    /// session id. Fails with `MissingSession`, causing no state transition,
    /// when nothing is stored for the room.
    pub fn rejoin(&mut self, room: &str) -> Result<(), ClientError> {
        if self.status != SessionStatus::Connected {
            return Err(ClientError::InvalidState {
                operation: "rejoin",
                status: self.status,
            });
        }
        let Some(session_id) = self.store.load(room) else {
            return Err(ClientError::MissingSession {
                room: room.to_string(),
            });
        };
        self.attempt += 1;
        self.send_message(ClientMessage::RejoinRoom {
            room: room.to_string(),
            session_id,
            attempt: self.attempt,
        })?;
        self.pending = Some(PendingJoin {
            room: room.to_string(),
            attempt: self.attempt,
        });
        self.status = SessionStatus::Joining;
        debug!("Rejoining room '{}'", room);
        Ok(())
    }

    /// Forwards an application payload to the room, unchanged. Fails with
    /// `NotJoined` in any state other than `Joined`, without touching the
    /// transport.
    pub fn send(&mut self, payload: Value) -> Result<(), ClientError> {
        if self.status != SessionStatus::Joined {
            return Err(ClientError::NotJoined {
                status: self.status,
            });
        }
        self.send_message(ClientMessage::RoomData { payload })
    }

    /// Leaves the joined room. From `Joined` this waits in `Leaving` for the
    /// server's ack; invoked mid-handshake it abandons the join attempt and
    /// tears down immediately, discarding any late handshake responses. The
    /// persisted session id is retained either way, so the membership can be
    /// resumed with [`Client::rejoin`].
    pub fn leave(&mut self, consented: bool) -> Result<(), ClientError> {
        match self.status {
            SessionStatus::Joined => {
                self.send_message(ClientMessage::LeaveRoom { consented })?;
                self.status = SessionStatus::Leaving;
                debug!("Leaving room");
                Ok(())
            }
            SessionStatus::Joining | SessionStatus::AwaitingReadyToConnect => {
                debug!("Abandoning join attempt");
                self.teardown();
                Ok(())
            }
            _ => Err(ClientError::InvalidState {
                operation: "leave",
                status: self.status,
            }),
        }
    }

    /// Tears down the transport regardless of session state. Always legal.
    /// The persisted session id is retained.
    pub fn disconnect(&mut self) {
        self.teardown();
        info!("Disconnected");
    }

    // Pump

    /// Drains every transport event that has already arrived, dispatching
    /// patches to the registered listeners synchronously and in arrival
    /// order, and returns the lifecycle events collected along the way.
    /// Never blocks; the host calls this every tick.
    pub fn pump(&mut self) -> ClientEvents {
        let mut events = ClientEvents::new();
        loop {
            let received = match self.receiver.as_mut() {
                Some(receiver) => receiver.receive(),
                None => break,
            };
            match received {
                Ok(Some(event)) => self.process_transport_event(event, &mut events),
                Ok(None) => break,
                Err(_) => {
                    warn!("Client Error: transport receive side failed");
                    events.push(ClientEvent::Error {
                        message: "transport receive failed".to_string(),
                    });
                    self.teardown();
                    break;
                }
            }
        }
        events
    }

    fn process_transport_event(&mut self, event: TransportEvent, out: &mut ClientEvents) {
        match event {
            TransportEvent::Opened { client_id } => {
                if self.status != SessionStatus::Connecting {
                    warn!("Transport opened while {:?}; ignoring", self.status);
                    return;
                }
                info!("Connected; assigned client id {}", client_id);
                self.client_id = Some(client_id.clone());
                self.status = SessionStatus::Connected;
                out.push(ClientEvent::Connected { client_id });
            }
            TransportEvent::Message(message) => self.process_server_message(message, out),
            TransportEvent::Error(message) => {
                warn!("Transport error: {}", message);
                out.push(ClientEvent::Error { message });
                self.teardown();
            }
            TransportEvent::Closed => {
                info!("Connection closed");
                self.teardown();
                out.push(ClientEvent::Closed);
            }
        }
    }

    fn process_server_message(&mut self, message: ServerMessage, out: &mut ClientEvents) {
        match message {
            ServerMessage::RoomReady { room, attempt } => {
                if self.status != SessionStatus::Joining || !self.attempt_is_current(attempt) {
                    debug!("Ignoring room-ready for an abandoned join attempt");
                    return;
                }
                debug!("Room '{}' ready; connecting", room);
                if self
                    .send_message(ClientMessage::ConnectRoom { room, attempt })
                    .is_err()
                {
                    warn!("Client Error: Cannot send room connect request to Server");
                    return;
                }
                self.status = SessionStatus::AwaitingReadyToConnect;
            }
            ServerMessage::JoinConfirmed {
                session_id,
                attempt,
            } => {
                if self.status != SessionStatus::AwaitingReadyToConnect
                    || !self.attempt_is_current(attempt)
                {
                    debug!("Ignoring join confirmation for an abandoned join attempt");
                    return;
                }
                let Some(pending) = self.pending.take() else {
                    return;
                };
                self.store.save(&pending.room, &session_id);
                self.room = Some(pending.room);
                self.session_id = Some(session_id.clone());
                self.status = SessionStatus::Joined;
                self.dispatcher.arm_snapshot();
                info!("Joined room successfully; session id {}", session_id);
                out.push(ClientEvent::Joined { session_id });
            }
            ServerMessage::RoomState { state } => {
                if self.status != SessionStatus::Joined {
                    warn!("Dropping state snapshot received while {:?}", self.status);
                    return;
                }
                self.dispatcher.deliver_first_state(&state);
            }
            ServerMessage::RoomPatch { ops } => {
                if self.status != SessionStatus::Joined {
                    warn!("Dropping patch batch received while {:?}", self.status);
                    return;
                }
                self.dispatcher.dispatch_patches(&ops);
            }
            ServerMessage::RoomData { payload } => {
                if self.status != SessionStatus::Joined {
                    warn!("Dropping room message received while {:?}", self.status);
                    return;
                }
                self.dispatcher.deliver_message(&payload);
            }
            ServerMessage::LeaveAck => {
                if self.status != SessionStatus::Leaving {
                    debug!("Ignoring leave ack while {:?}", self.status);
                    return;
                }
                self.teardown();
                out.push(ClientEvent::Left);
            }
            ServerMessage::ServerError { message } => {
                warn!("Server error: {}", message);
                out.push(ClientEvent::Error { message });
                // A rejection mid-handshake abandons the attempt; the
                // connection itself is still up.
                if matches!(
                    self.status,
                    SessionStatus::Joining | SessionStatus::AwaitingReadyToConnect
                ) {
                    self.pending = None;
                    self.status = SessionStatus::Connected;
                }
            }
        }
    }

    fn attempt_is_current(&self, attempt: u64) -> bool {
        matches!(&self.pending, Some(pending) if pending.attempt == attempt && attempt == self.attempt)
    }

    fn send_message(&self, message: ClientMessage) -> Result<(), ClientError> {
        let Some(sender) = &self.sender else {
            return Err(ClientError::SendFailed);
        };
        sender.send(message).map_err(|_| ClientError::SendFailed)
    }

    /// Drops the transport and all per-session state. The session store is
    /// untouched: the last session id stays available for a rejoin.
    fn teardown(&mut self) {
        self.pending = None;
        self.sender = None;
        self.receiver = None;
        self.client_id = None;
        self.room = None;
        self.session_id = None;
        self.dispatcher.clear();
        self.status = SessionStatus::Idle;
    }
}
