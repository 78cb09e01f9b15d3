use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ElementId, Placement};
use crate::geometry::CanvasPoint;

/// Ink color of a text block, persisted under its legacy key string. Unknown
/// keys decode to the default instead of failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextColor {
    #[default]
    Primary,
    White,
    Pink,
}

impl TextColor {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::White => "white",
            Self::Pink => "pink",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "white" => Self::White,
            "pink" => Self::Pink,
            _ => Self::Primary,
        }
    }
}

impl From<String> for TextColor {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<TextColor> for String {
    fn from(color: TextColor) -> Self {
        color.key().to_owned()
    }
}

/// Typeface of a text block, persisted under its key string with the same
/// unknown-key fallback as [`TextColor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    #[default]
    System,
    Rounded,
    Serif,
}

impl FontFamily {
    pub const fn key(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Rounded => "rounded",
            Self::Serif => "serif",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "rounded" => Self::Rounded,
            "serif" => Self::Serif,
            _ => Self::System,
        }
    }
}

impl From<String> for FontFamily {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<FontFamily> for String {
    fn from(font: FontFamily) -> Self {
        font.key().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default, rename = "colorName")]
    pub color: TextColor,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default, rename = "fontName")]
    pub font: FontFamily,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, position: CanvasPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            placement: Placement::at(position),
            font_size: DEFAULT_FONT_SIZE,
            color: TextColor::default(),
            is_bold: false,
            font: FontFamily::default(),
        }
    }
}

pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const MIN_FONT_SIZE: f64 = 13.0;
pub const MAX_FONT_SIZE: f64 = 34.0;
pub const FONT_SIZE_STEP: f64 = 2.0;

/// Width a text block wraps into before its scale transform applies.
pub const TEXT_MAX_WIDTH: f64 = 260.0;

pub fn clamp_font_size(size: f64) -> f64 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}
