use std::panic::{catch_unwind, AssertUnwindSafe};

use log::warn;
use serde_json::Value;

use crate::{
    change::ChangeEvent,
    listener::{ChangeHandler, FallbackHandler, ListenerRegistry},
    pattern::{split_path, PathPattern},
    protocol::PatchOp,
};

/// Handler for the full-state snapshot delivered once per successful join.
pub type StateHandler = Box<dyn FnMut(&Value)>;

/// Handler for application-level messages from the room.
pub type MessageHandler = Box<dyn FnMut(&Value)>;

/// Converts raw patch operations into structured change events and feeds
/// them to the listener registry. Also owns the first-state hook, which sits
/// outside the pattern registry because a snapshot describes the whole tree
/// rather than a path-scoped delta, and the application-message hook.
#[derive(Default)]
pub struct ChangeDispatcher {
    registry: ListenerRegistry,
    first_state: Option<StateHandler>,
    message: Option<MessageHandler>,
    state_pending: bool,
}

impl ChangeDispatcher {
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
            first_state: None,
            message: None,
            state_pending: false,
        }
    }

    pub fn register(&mut self, pattern: PathPattern, handler: ChangeHandler) {
        self.registry.register(pattern, handler);
    }

    pub fn register_fallback(&mut self, handler: FallbackHandler) {
        self.registry.register_fallback(handler);
    }

    /// Installs the first-state hook, silently replacing any previous one.
    pub fn on_first_state(&mut self, handler: StateHandler) {
        self.first_state = Some(handler);
    }

    /// Installs the application-message hook, silently replacing any
    /// previous one.
    pub fn on_message(&mut self, handler: MessageHandler) {
        self.message = Some(handler);
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Marks the start of a fresh join: the next snapshot is that session's
    /// first state.
    pub(crate) fn arm_snapshot(&mut self) {
        self.state_pending = true;
    }

    /// Drops all registrations and hooks. Called when a session ends;
    /// listeners do not outlive it.
    pub(crate) fn clear(&mut self) {
        self.registry.clear();
        self.first_state = None;
        self.message = None;
        self.state_pending = false;
    }

    /// Dispatches one batch of patch operations, strictly in array order. A
    /// later operation on an overlapping path may depend on an earlier one
    /// having been observed.
    pub fn dispatch_patches(&mut self, ops: &[PatchOp]) {
        for op in ops {
            self.dispatch_patch(op);
        }
    }

    /// Converts one raw patch operation into a change event and dispatches
    /// it to the registry.
    pub fn dispatch_patch(&mut self, op: &PatchOp) {
        let event = ChangeEvent {
            operation: op.op,
            path: split_path(&op.path),
            value: op.value.clone(),
        };
        self.registry.dispatch(&event);
    }

    /// Forwards the full-state snapshot to the first-state hook, at most
    /// once per join. A duplicate snapshot is dropped.
    pub(crate) fn deliver_first_state(&mut self, state: &Value) {
        if !self.state_pending {
            warn!("Dropping unexpected state snapshot; one snapshot is expected per join");
            return;
        }
        self.state_pending = false;
        if let Some(handler) = &mut self.first_state {
            if catch_unwind(AssertUnwindSafe(|| handler(state))).is_err() {
                warn!("First-state handler panicked");
            }
        }
    }

    /// Forwards an application-level payload to the message hook.
    pub(crate) fn deliver_message(&mut self, payload: &Value) {
        if let Some(handler) = &mut self.message {
            if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
                warn!("Message handler panicked");
            }
        }
    }
}
