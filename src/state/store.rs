use std::cell::{Cell, RefCell};

/// Handle returned by [`Store::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Listener<S> = Box<dyn FnMut(&S)>;

/// An explicit observable state container.
///
/// Listeners are called synchronously from inside `set`/`update`, so they see
/// every change at the cadence it happens. Listeners must not subscribe or
/// unsubscribe from inside a notification; such calls are dropped with a warning.
pub struct Store<S> {
    state: S,
    listeners: RefCell<Vec<(SubscriptionId, Listener<S>)>>,
    next_id: Cell<usize>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.try_borrow().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &format!("<{} listeners>", listeners))
            .finish()
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Borrow the current state
    pub fn get(&self) -> &S {
        &self.state
    }

    /// Register a listener for every subsequent change
    pub fn subscribe(&self, listener: impl FnMut(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.push((id, Box::new(listener))),
            Err(_) => log::warn!("subscribe called during a store notification; ignored"),
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(existing, _)| *existing != id);
                listeners.len() != before
            }
            Err(_) => {
                log::warn!("unsubscribe called during a store notification; ignored");
                false
            }
        }
    }

    /// Replace the state and notify listeners
    pub fn set(&mut self, state: S) {
        self.state = state;
        self.notify();
    }

    /// Mutate the state in place and notify listeners
    pub fn update(&mut self, f: impl FnOnce(&mut S)) {
        f(&mut self.state);
        self.notify();
    }

    fn notify(&self) {
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => {
                for (_, listener) in listeners.iter_mut() {
                    listener(&self.state);
                }
            }
            Err(_) => log::warn!("nested store notification skipped"),
        }
    }
}

impl<S: Clone> Store<S> {
    /// Copy of the current state
    pub fn snapshot(&self) -> S {
        self.state.clone()
    }
}
