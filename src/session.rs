use std::collections::HashMap;

/// Lifecycle states of the client's session with the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// No transport. The starting state, and where every teardown lands.
    Idle,
    /// The transport is opening.
    Connecting,
    /// The transport is open and a client id has been assigned.
    Connected,
    /// A join or rejoin request is in flight, waiting for the room to be
    /// allocated.
    Joining,
    /// The room is allocated; the room-level connect handshake is in flight.
    AwaitingReadyToConnect,
    /// Fully joined. Application messages may be sent and patches arrive.
    Joined,
    /// A leave request is in flight, waiting for the server's ack.
    Leaving,
}

impl SessionStatus {
    /// Whether the transport-level connection is established.
    pub fn is_connected(&self) -> bool {
        !matches!(self, SessionStatus::Idle | SessionStatus::Connecting)
    }

    /// Whether the join handshake has completed.
    pub fn is_joined(&self) -> bool {
        matches!(self, SessionStatus::Joined)
    }
}

/// Persists the last-known session id per room so a membership can be
/// resumed after a disconnect or a process restart. The storage mechanism
/// is the host's concern.
pub trait SessionStore {
    fn load(&self, room: &str) -> Option<String>;
    fn save(&mut self, room: &str, session_id: &str);
}

/// Store for hosts that do not persist across restarts, and for tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, room: &str) -> Option<String> {
        self.sessions.get(room).cloned()
    }

    fn save(&mut self, room: &str, session_id: &str) {
        self.sessions
            .insert(room.to_string(), session_id.to_string());
    }
}
