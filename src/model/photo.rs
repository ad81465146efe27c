use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::id_generator;

/// Smallest scale a placed photo can be pinched down to
pub const MIN_SCALE: f32 = 0.1;
/// Largest scale a placed photo can be pinched up to
pub const MAX_SCALE: f32 = 5.0;

/// Clamp a scale into `[MIN_SCALE, MAX_SCALE]`. NaN falls back to 1.
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        1.0
    } else {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}

/// A source image offered by the carousel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
}

impl Photo {
    /// Create a photo with a freshly generated id
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: id_generator::generate_photo_id(),
            url: url.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Placement of a photo on the canvas. Rotation is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AttributesRepr")]
pub struct CanvasPhotoAttributes {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for CanvasPhotoAttributes {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl CanvasPhotoAttributes {
    pub fn new(position: Pos2, scale: f32, rotation: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            scale: clamp_scale(scale),
            rotation,
        }
    }

    /// Unscaled, unrotated placement at `position`
    pub fn at(position: Pos2) -> Self {
        Self::new(position, 1.0, 0.0)
    }

    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }
}

/// Stored form; restored attributes are clamped on the way in
#[derive(Deserialize)]
#[serde(default)]
struct AttributesRepr {
    x: f32,
    y: f32,
    scale: f32,
    rotation: f32,
}

impl Default for AttributesRepr {
    fn default() -> Self {
        let defaults = CanvasPhotoAttributes::default();
        Self {
            x: defaults.x,
            y: defaults.y,
            scale: defaults.scale,
            rotation: defaults.rotation,
        }
    }
}

impl From<AttributesRepr> for CanvasPhotoAttributes {
    fn from(repr: AttributesRepr) -> Self {
        Self::new(Pos2::new(repr.x, repr.y), repr.scale, repr.rotation)
    }
}

/// One placement of a source photo on the canvas.
///
/// The same source may be placed many times; each placement gets its own
/// `instance_id`, which never changes for the lifetime of the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPhoto {
    instance_id: String,
    source_id: String,
    url: String,
    attributes: CanvasPhotoAttributes,
}

impl CanvasPhoto {
    /// Place `photo` at `position` under a fresh instance id
    pub fn place(photo: &Photo, position: Pos2) -> Self {
        Self {
            instance_id: id_generator::generate_instance_id(),
            source_id: photo.id.clone(),
            url: photo.url.clone(),
            attributes: CanvasPhotoAttributes::at(position),
        }
    }

    /// Rebuild an entry with a known instance id, e.g. from a fixture
    pub fn from_parts(
        instance_id: impl Into<String>,
        source_id: impl Into<String>,
        url: impl Into<String>,
        attributes: CanvasPhotoAttributes,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            source_id: source_id.into(),
            url: url.into(),
            attributes: CanvasPhotoAttributes::new(attributes.position(), attributes.scale, attributes.rotation),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn attributes(&self) -> CanvasPhotoAttributes {
        self.attributes
    }

    /// Copy of this entry with its attributes replaced wholesale
    pub fn with_attributes(&self, attributes: CanvasPhotoAttributes) -> Self {
        Self {
            attributes: CanvasPhotoAttributes::new(attributes.position(), attributes.scale, attributes.rotation),
            ..self.clone()
        }
    }
}

/// What is being dragged. Canvas drags carry a full snapshot of the placed photo
/// so the drop can be resolved without reading the model mid-gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    FromCarousel { photo: Photo },
    FromCanvas { canvas_photo: CanvasPhoto },
}

impl DragPayload {
    pub fn is_from_canvas(&self) -> bool {
        matches!(self, DragPayload::FromCanvas { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            DragPayload::FromCarousel { photo } => &photo.url,
            DragPayload::FromCanvas { canvas_photo } => canvas_photo.url(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DragPayload::FromCarousel { .. } => "carousel",
            DragPayload::FromCanvas { .. } => "canvas",
        }
    }
}
