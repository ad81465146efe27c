use crate::drop_target::DropAction;

/// Notable things that happened in the editor, broadcast on the [`EventBus`](super::EventBus)
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    DragStarted {
        /// `"carousel"` or `"canvas"`
        source: &'static str,
    },
    DragEnded,
    Dropped(DropAction),
    PhotosLoaded {
        count: usize,
    },
    PhotosFailed {
        message: String,
    },
    CanvasChanged {
        count: usize,
    },
}
