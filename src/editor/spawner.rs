use std::thread;

/// A unit of background work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs the editor's background work (the photo fetch) off the UI thread.
/// Results always come back through the editor's channel, never through the task's return.
pub trait TaskSpawner {
    fn spawn(&self, task: Task);
}

/// Runs each task on its own named thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

impl TaskSpawner for ThreadSpawner {
    fn spawn(&self, task: Task) {
        if let Err(e) = thread::Builder::new().name("photo-fetch".into()).spawn(task) {
            log::error!("Failed to spawn fetch thread: {}", e);
        }
    }
}

/// Runs each task immediately on the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineSpawner;

impl TaskSpawner for InlineSpawner {
    fn spawn(&self, task: Task) {
        task();
    }
}
