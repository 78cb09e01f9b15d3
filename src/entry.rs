use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{PhotoBytes, PhotoElement, StickerElement, TextBlock};

/// Mood glyph stored when an entry never picked one.
pub const DEFAULT_MOOD_GLYPH: &str = "🌸";

/// Mood glyphs the entry mood picker offers, in display order.
pub const MOOD_GLYPHS: [&str; 16] = [
    "🌸", "💖", "🎀", "⭐", "🌈", "🦋", "🍰", "🌷", "🐰", "☁️", "🍓", "🧸", "💫", "🌙", "🎵", "💐",
];

/// Most canvas photos one entry may hold.
pub const MAX_CANVAS_PHOTOS: usize = 10;

/// Serialized envelope of one diary entry's composition.
///
/// The three structured collections stay raw JSON here; only the codec
/// interprets them, so a corrupt collection cannot abort envelope parsing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    /// Entry date, `yyyy-MM-dd`. Owned by the host's record layer.
    #[serde(default)]
    pub date_key: String,
    /// Legacy body text, rewritten on every save so old readers stay correct.
    #[serde(default)]
    pub content: String,
    /// Legacy flat photo list, mirrored from the canvas photos on save.
    #[serde(default)]
    pub photo_data_array: Vec<PhotoBytes>,
    /// Mood glyph shown on the calendar.
    #[serde(default)]
    pub sticker_emoji: String,
    #[serde(default)]
    pub stickers: Value,
    #[serde(default)]
    pub text_blocks: Value,
    #[serde(default)]
    pub canvas_photos: Value,
}

impl EntryPayload {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Sparse update produced by a save. Fields left `None` keep the payload's
/// current value, which lets the decorate screen patch stickers alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryPatch {
    pub content: Option<String>,
    pub sticker_emoji: Option<String>,
    pub photo_data_array: Option<Vec<PhotoBytes>>,
    pub stickers: Option<Vec<StickerElement>>,
    pub text_blocks: Option<Vec<TextBlock>>,
    pub canvas_photos: Option<Vec<PhotoElement>>,
}

impl EntryPatch {
    pub fn apply_to(&self, payload: &mut EntryPayload) -> serde_json::Result<()> {
        if let Some(content) = &self.content {
            payload.content = content.clone();
        }
        if let Some(emoji) = &self.sticker_emoji {
            payload.sticker_emoji = emoji.clone();
        }
        if let Some(photo_data) = &self.photo_data_array {
            payload.photo_data_array = photo_data.clone();
        }
        if let Some(stickers) = &self.stickers {
            payload.stickers = serde_json::to_value(stickers)?;
        }
        if let Some(text_blocks) = &self.text_blocks {
            payload.text_blocks = serde_json::to_value(text_blocks)?;
        }
        if let Some(photos) = &self.canvas_photos {
            payload.canvas_photos = serde_json::to_value(photos)?;
        }
        Ok(())
    }
}
