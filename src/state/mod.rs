pub mod drag_session;
mod persistence;
pub mod store;

pub use drag_session::{DragOutcome, DragSession, DragSessionState};
pub use persistence::{CANVAS_PHOTOS_KEY, JsonFileSlot, MemorySlot, PersistenceSlot};
pub use store::{Store, SubscriptionId};
