//! Synchronous signals.
//!
//! A [`Signal`] is a typed notification channel owned by the object that
//! emits it. Handlers run on the emitting call stack, in connection order,
//! and every emission is delivered before `emit` returns. Nothing is queued
//! or coalesced.
//!
//! Dispatch works on a snapshot of the handler list, so a handler may connect
//! or disconnect handlers (including itself) or emit again without
//! invalidating the iteration.
//!
//! [`Guard`] is the companion re-entrancy flag: code that pushes values into
//! something that would notify it back holds a [`GuardToken`] while doing so
//! and its handlers return early while the guard is held.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Handle for a connected handler, used to disconnect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", &self.0.to_string()[..8])
    }
}

type Handler<E> = Rc<dyn Fn(&E)>;

/// A single-threaded, ordered observer list for events of type `E`.
pub struct Signal<E> {
    name: &'static str,
    handlers: RefCell<Vec<(HandlerId, Handler<E>)>>,
}

impl<E> Signal<E> {
    /// Create a signal. `name` only shows up in diagnostics.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Connect a handler. Handlers run in the order they were connected.
    pub fn connect<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&E) + 'static,
    {
        let id = HandlerId::new();
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        tracing::trace!("{} connected to '{}'", id, self.name);
        id
    }

    /// Disconnect a handler.
    ///
    /// Returns true if the handler was found and removed.
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        let removed = handlers.len() != before;
        if removed {
            tracing::trace!("{} disconnected from '{}'", id, self.name);
        }
        removed
    }

    /// Deliver `event` to every connected handler.
    ///
    /// Returns the number of handlers invoked.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Handler<E>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in &snapshot {
            handler(event);
        }
        snapshot.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_connected(&self, id: HandlerId) -> bool {
        self.handlers.borrow().iter().any(|(hid, _)| *hid == id)
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// Re-entrancy flag.
#[derive(Debug, Default)]
pub struct Guard {
    held: Cell<bool>,
}

impl Guard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    /// Hold the guard until the returned token is dropped.
    ///
    /// Holding an already held guard is allowed; the guard is released when
    /// the outermost token goes away.
    pub fn hold(&self) -> GuardToken<'_> {
        let was_held = self.held.replace(true);
        GuardToken {
            guard: self,
            was_held,
        }
    }
}

/// Keeps a [`Guard`] held while alive.
#[must_use = "the guard is released as soon as the token is dropped"]
pub struct GuardToken<'a> {
    guard: &'a Guard,
    was_held: bool,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.held.set(self.was_held);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guard_tokens() {
        let guard = Guard::new();
        {
            let _outer = guard.hold();
            {
                let _inner = guard.hold();
                assert!(guard.is_held());
            }
            assert!(guard.is_held());
        }
        assert!(!guard.is_held());
    }

    #[test]
    fn test_disconnect_unknown_handler() {
        let signal: Signal<()> = Signal::new("test");
        let other: Signal<()> = Signal::new("other");
        let id = other.connect(|_| {});
        assert!(!signal.disconnect(id));
        assert!(other.disconnect(id));
    }
}
