use std::cell::RefCell;

use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.try_borrow().map(|h| h.len()).unwrap_or(0);
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", handlers))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.handlers.borrow_mut().push(Box::new(handler));
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        log::debug!("editor event: {:?}", event);
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => {
                for handler in handlers.iter_mut() {
                    handler.handle_event(&event);
                }
            }
            Err(_) => log::warn!("event emitted from inside a handler was dropped: {:?}", event),
        }
    }
}
