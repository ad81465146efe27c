use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::error::FetchError;
use crate::model::Photo;

/// Image file extensions picked up from an assets directory
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Assets bundled with the editor when no directory is configured
pub const BUILTIN_ASSETS: &[&str] = &[
    "cat",
    "colorful_bird",
    "giraffe",
    "koala",
    "reindeer",
    "stork",
    "tiger",
];

/// Source of the photos offered in the carousel.
///
/// Called from a worker thread, so implementations must be shareable.
pub trait PhotoRepository: Send + Sync {
    fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError>;
}

/// Where [`LocalAssetsRepository`] looks for photos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    BuiltIn,
    Directory(PathBuf),
}

/// Lists the local photo assets. Every fetch hands out fresh photo ids.
#[derive(Debug, Clone)]
pub struct LocalAssetsRepository {
    source: AssetSource,
}

impl Default for LocalAssetsRepository {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocalAssetsRepository {
    pub fn builtin() -> Self {
        Self {
            source: AssetSource::BuiltIn,
        }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: AssetSource::Directory(dir.into()),
        }
    }

    /// Built-in assets unless a directory is given
    pub fn from_config(assets_dir: Option<&Path>) -> Self {
        match assets_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    fn scan_dir(dir: &Path) -> Result<Vec<Photo>, FetchError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_image(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(FetchError::NoAssets(dir.to_path_buf()));
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths
            .into_iter()
            .map(|path| Photo::new(format!("file://{}", path.display())))
            .collect())
    }
}

impl PhotoRepository for LocalAssetsRepository {
    fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        match &self.source {
            AssetSource::BuiltIn => Ok(BUILTIN_ASSETS
                .iter()
                .map(|name| Photo::new(format!("asset://{name}")))
                .collect()),
            AssetSource::Directory(dir) => Self::scan_dir(dir),
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Display name for a photo url: the file stem or asset name
pub fn photo_label(url: &str) -> &str {
    let name = url.rsplit(['/', '\\']).next().unwrap_or(url);
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

/// The fetch use case: ask the repository, optionally shuffle the result
#[derive(Clone)]
pub struct FetchPhotos {
    repository: Arc<dyn PhotoRepository>,
}

impl std::fmt::Debug for FetchPhotos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPhotos").finish_non_exhaustive()
    }
}

impl FetchPhotos {
    pub fn new(repository: Arc<dyn PhotoRepository>) -> Self {
        Self { repository }
    }

    pub fn run(&self, shuffled: bool) -> Result<Vec<Photo>, FetchError> {
        let mut photos = self.repository.fetch_photos()?;
        if shuffled {
            photos.shuffle(&mut rand::thread_rng());
        }
        Ok(photos)
    }
}
