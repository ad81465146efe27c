use crate::model::{CanvasPhoto, Photo};

/// Progress of the carousel fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    /// The fetch failed; the carousel stays empty until a retry succeeds
    Failed(String),
}

/// Everything the screen renders, pushed to subscribers after every change
#[derive(Debug, Clone, PartialEq)]
pub struct EditorUiState {
    pub load_state: LoadState,
    /// Mirrors `load_state == Loading`
    pub is_loading: bool,
    pub carousel_photos: Vec<Photo>,
    pub canvas_photos: Vec<CanvasPhoto>,
    /// The trash zone is only shown while a placed photo is being dragged
    pub show_trash: bool,
    pub is_hovering_trash: bool,
}

impl Default for EditorUiState {
    fn default() -> Self {
        Self {
            load_state: LoadState::Loading,
            is_loading: true,
            carousel_photos: Vec::new(),
            canvas_photos: Vec::new(),
            show_trash: false,
            is_hovering_trash: false,
        }
    }
}

impl EditorUiState {
    pub(crate) fn set_load_state(&mut self, load_state: LoadState) {
        self.is_loading = load_state == LoadState::Loading;
        self.load_state = load_state;
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
