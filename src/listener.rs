use std::panic::{catch_unwind, AssertUnwindSafe};

use log::warn;

use crate::{
    change::{ChangeEvent, DataChange},
    pattern::PathPattern,
};

/// Handler invoked for every change matching its registered pattern.
pub type ChangeHandler = Box<dyn FnMut(&DataChange)>;

/// Handler invoked when a change matches no registered pattern. Receives the
/// full unfiltered event, raw path included, and never per-pattern bindings.
pub type FallbackHandler = Box<dyn FnMut(&ChangeEvent)>;

struct Registration {
    pattern: PathPattern,
    handler: ChangeHandler,
}

/// Ordered collection of pattern listeners plus at most one fallback.
/// Registrations live for one session and are cleared when it ends.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Registration>,
    fallback: Option<FallbackHandler>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            fallback: None,
        }
    }

    /// Appends a registration. No deduplication: registering the same
    /// pattern twice yields two invocations per matching change.
    pub fn register(&mut self, pattern: PathPattern, handler: ChangeHandler) {
        self.listeners.push(Registration { pattern, handler });
    }

    /// Installs the fallback handler, silently replacing any previous one.
    pub fn register_fallback(&mut self, handler: FallbackHandler) {
        self.fallback = Some(handler);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Drops every registration and the fallback.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.fallback = None;
    }

    /// Evaluates every registration's pattern against the event's path in
    /// registration order, invoking each match with bindings recomputed for
    /// its own pattern. When no registration matches, the fallback (if
    /// installed) receives the full event instead. Invocation is synchronous
    /// and on the calling thread. A panicking handler is logged and skipped;
    /// the remaining registrations still see the event.
    pub fn dispatch(&mut self, event: &ChangeEvent) {
        let mut matched = false;
        for registration in &mut self.listeners {
            let Some(bindings) = registration.pattern.matches(&event.path) else {
                continue;
            };
            matched = true;
            let change = DataChange {
                operation: event.operation,
                bindings,
                value: event.value.clone(),
            };
            let handler = &mut registration.handler;
            if catch_unwind(AssertUnwindSafe(|| handler(&change))).is_err() {
                warn!(
                    "Listener for pattern '{}' panicked; continuing with remaining listeners",
                    registration.pattern.text()
                );
            }
        }
        if !matched {
            if let Some(fallback) = &mut self.fallback {
                if catch_unwind(AssertUnwindSafe(|| fallback(event))).is_err() {
                    warn!("Fallback listener panicked");
                }
            }
        }
    }
}
