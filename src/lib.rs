//! # Roomlink
//! Client that keeps a local mirror of a server-authoritative room state
//! tree in sync. Incremental patches pushed by the server are routed to
//! consumers through wildcard path-pattern listeners; a session state
//! machine drives connect, join, resumed rejoin, and leave.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod transport;

mod change;
mod client;
mod dispatcher;
mod error;
mod events;
mod listener;
mod pattern;
mod protocol;
mod session;

pub use change::{ChangeEvent, DataChange, OperationKind};
pub use client::Client;
pub use dispatcher::{ChangeDispatcher, MessageHandler, StateHandler};
pub use error::{ClientError, PatternError};
pub use events::{ClientEvent, ClientEvents};
pub use listener::{ChangeHandler, FallbackHandler, ListenerRegistry};
pub use pattern::{Bindings, PathPattern, Segment};
pub use protocol::{ClientMessage, PatchOp, ServerMessage};
pub use session::{MemorySessionStore, SessionStatus, SessionStore};
