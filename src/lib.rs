#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod drop_target;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod haptics;
pub mod id_generator;
pub mod input;
pub mod model;
pub mod panels;
pub mod repository;
pub mod state;

pub use app::CollageApp;
pub use config::EditorConfig;
pub use drop_target::{DropAction, DropTargets, is_hovering, resolve};
pub use editor::{EditorOrchestrator, EditorUiState, LoadState};
pub use error::{ConfigError, FetchError, PersistenceError};
pub use event::{EditorEvent, EventBus};
pub use input::{GestureConfig, GestureDelta, GestureEvent};
pub use model::{CanvasPhoto, CanvasPhotoAttributes, DragPayload, Photo};
pub use state::{DragSession, DragSessionState, Store};
