//! Message shapes exchanged with the room server.
//!
//! Encoding these values into wire bytes is the transport's concern; the
//! client only interprets the structured values, discriminated by the serde
//! `type` tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::change::OperationKind;

/// One structural change pushed by the server against the room state tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: OperationKind,
    /// Slash-delimited path into the state tree, e.g. `players/7/x`.
    pub path: String,
    /// Payload carried by add/replace operations; absent for most removes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Messages the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The requested room has been allocated; its data channel may now be
    /// connected. First phase of the join handshake.
    RoomReady { room: String, attempt: u64 },
    /// The join handshake completed. The issued session id resumes this
    /// membership after a disconnect.
    JoinConfirmed { session_id: String, attempt: u64 },
    /// Full state snapshot, sent once per successful join before any patch.
    RoomState { state: Value },
    /// A batch of incremental patches, significant in array order.
    RoomPatch { ops: Vec<PatchOp> },
    /// Application-level payload, opaque to the client.
    RoomData { payload: Value },
    /// The server acknowledged a leave request.
    LeaveAck,
    /// The server rejected a request.
    ServerError { message: String },
}

/// Messages the client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request entry into (or creation of) a named room. The `attempt`
    /// token is echoed back on the handshake responses so the client can
    /// discard responses to an abandoned attempt.
    JoinRoom {
        room: String,
        options: Map<String, Value>,
        attempt: u64,
    },
    /// Resume a prior membership using a stored session id.
    RejoinRoom {
        room: String,
        session_id: String,
        attempt: u64,
    },
    /// Second phase of the join handshake: connect to the allocated room's
    /// data channel.
    ConnectRoom { room: String, attempt: u64 },
    /// Leave the joined room. `consented` distinguishes a deliberate leave
    /// from host teardown.
    LeaveRoom { consented: bool },
    /// Application-level payload, opaque to the client.
    RoomData { payload: Value },
}
