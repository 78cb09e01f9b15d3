//! Canvas element data model: the variant payloads, their shared placement
//! geometry, and the tagged union the rest of the engine works with.

mod photo;
mod sticker;
mod text;

pub use photo::{PhotoBytes, PhotoElement, PHOTO_BASE_SIZE};
pub use sticker::{sticker_catalog, StickerElement, STICKER_BASE_SIZE};
pub use text::{
    clamp_font_size, FontFamily, TextBlock, TextColor, DEFAULT_FONT_SIZE, FONT_SIZE_STEP,
    MAX_FONT_SIZE, MIN_FONT_SIZE, TEXT_MAX_WIDTH,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::CanvasPoint;

/// Stable element identity, assigned once at creation and never reused.
pub type ElementId = Uuid;

/// Geometry shared by every element variant. Flattened into persisted records,
/// so the serialized field names follow the wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Accumulated rotation in degrees. Additive and never normalized, so a
    /// full turn round-trips as 360, not 0.
    #[serde(default, rename = "rotation")]
    pub rotation_degrees: f64,
    #[serde(default)]
    pub z_order: i64,
}

impl Placement {
    pub fn at(position: CanvasPoint) -> Self {
        Self {
            x: position.x,
            y: position.y,
            scale: default_scale(),
            rotation_degrees: 0.0,
            z_order: 0,
        }
    }

    pub fn position(&self) -> CanvasPoint {
        CanvasPoint::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: CanvasPoint) {
        self.x = position.x;
        self.y = position.y;
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(CanvasPoint::new(0.0, 0.0))
    }
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Photo,
    Sticker,
}

impl ElementKind {
    /// Scale range enforced when a pinch commits. Photos shrink further than
    /// stickers and text.
    pub const fn scale_bounds(self) -> (f64, f64) {
        match self {
            Self::Photo => (PHOTO_MIN_SCALE, MAX_SCALE),
            Self::Text | Self::Sticker => (MIN_SCALE, MAX_SCALE),
        }
    }

    pub fn clamp_scale(self, scale: f64) -> f64 {
        let (min, max) = self.scale_bounds();
        scale.clamp(min, max)
    }
}

pub const MIN_SCALE: f64 = 0.3;
pub const PHOTO_MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 5.0;

/// One element on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasElement {
    Sticker(StickerElement),
    Text(TextBlock),
    Photo(PhotoElement),
}

impl CanvasElement {
    pub fn id(&self) -> ElementId {
        match self {
            Self::Sticker(sticker) => sticker.id,
            Self::Text(text) => text.id,
            Self::Photo(photo) => photo.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Sticker(_) => ElementKind::Sticker,
            Self::Text(_) => ElementKind::Text,
            Self::Photo(_) => ElementKind::Photo,
        }
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Self::Sticker(sticker) => &sticker.placement,
            Self::Text(text) => &text.placement,
            Self::Photo(photo) => &photo.placement,
        }
    }

    pub fn placement_mut(&mut self) -> &mut Placement {
        match self {
            Self::Sticker(sticker) => &mut sticker.placement,
            Self::Text(text) => &mut text.placement,
            Self::Photo(photo) => &mut photo.placement,
        }
    }
}

/// Borrowed view of an element inside the store, used by queries and the
/// draw-plan builder.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Sticker(&'a StickerElement),
    Text(&'a TextBlock),
    Photo(&'a PhotoElement),
}

impl<'a> ElementRef<'a> {
    pub fn id(self) -> ElementId {
        match self {
            Self::Sticker(sticker) => sticker.id,
            Self::Text(text) => text.id,
            Self::Photo(photo) => photo.id,
        }
    }

    pub fn kind(self) -> ElementKind {
        match self {
            Self::Sticker(_) => ElementKind::Sticker,
            Self::Text(_) => ElementKind::Text,
            Self::Photo(_) => ElementKind::Photo,
        }
    }

    pub fn placement(self) -> &'a Placement {
        match self {
            Self::Sticker(sticker) => &sticker.placement,
            Self::Text(text) => &text.placement,
            Self::Photo(photo) => &photo.placement,
        }
    }
}
