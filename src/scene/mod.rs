mod operations;
mod query;

use crate::element::{
    CanvasElement, ElementId, ElementKind, ElementRef, PhotoElement, StickerElement, TextBlock,
};

/// Authoritative in-memory composition for one diary entry.
///
/// Holds the three typed element collections, the single selection shared
/// across them, and the monotonic z-order cursor. All access is
/// single-threaded; gestures and saves run on the host's UI thread.
#[derive(Debug, Clone)]
pub struct SceneStore {
    stickers: Vec<StickerElement>,
    text_blocks: Vec<TextBlock>,
    photos: Vec<PhotoElement>,
    selected: Option<ElementId>,
    next_z_order: i64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    pub fn new() -> Self {
        Self {
            stickers: Vec::new(),
            text_blocks: Vec::new(),
            photos: Vec::new(),
            selected: None,
            next_z_order: 0,
        }
    }

    /// Builds a store from freshly decoded collections and positions the z
    /// cursor above every persisted element.
    pub fn from_collections(
        stickers: Vec<StickerElement>,
        text_blocks: Vec<TextBlock>,
        photos: Vec<PhotoElement>,
    ) -> Self {
        let mut store = Self {
            stickers,
            text_blocks,
            photos,
            selected: None,
            next_z_order: 0,
        };
        store.initialize_z_cursor();
        store
    }

    pub fn stickers(&self) -> &[StickerElement] {
        &self.stickers
    }

    pub fn text_blocks(&self) -> &[TextBlock] {
        &self.text_blocks
    }

    pub fn photos(&self) -> &[PhotoElement] {
        &self.photos
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }
}

#[cfg(test)]
impl SceneStore {
    fn next_z_order(&self) -> i64 {
        self.next_z_order
    }

    fn sticker_count(&self) -> usize {
        self.stickers.len()
    }
}
