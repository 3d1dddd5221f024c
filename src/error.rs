use thiserror::Error;

use crate::session::SessionStatus;

/// Errors that can occur while parsing a listener path pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Two wildcard segments within one pattern share a name
    #[error("Duplicate wildcard name ':{name}' in pattern '{pattern}'. Wildcard names must be unique within one pattern")]
    DuplicateWildcard { pattern: String, name: String },

    /// A wildcard segment with no name (a bare ':') can never be read back
    /// out of the bindings
    #[error("Empty wildcard name in pattern '{pattern}'. A wildcard segment must be written as ':name'")]
    EmptyWildcard { pattern: String },
}

/// Errors returned by `Client` operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The operation is not legal in the current session state. The caller
    /// may retry once the session reaches the right state
    #[error("Cannot {operation} while the session is {status:?}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// Rejoin was requested but no session id is stored for the room. The
    /// caller falls back to a fresh join
    #[error("Cannot rejoin room '{room}' without a stored session id")]
    MissingSession { room: String },

    /// Send was requested before the join handshake completed
    #[error("Cannot send while the session is {status:?}. Messages may only be sent once joined")]
    NotJoined { status: SessionStatus },

    /// The transport rejected an outgoing message
    #[error("Transport failed to send the outgoing message")]
    SendFailed,

    /// Pattern error
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
}
