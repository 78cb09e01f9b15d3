//! Editing session for one entry: mode gating, the text draft flow, element
//! adds with their caps, and change tracking over a loaded scene.

use serde_json::Value;
use thiserror::Error;

use crate::codec::{self, DecodeIssue};
use crate::config::SessionDefaults;
use crate::element::{
    clamp_font_size, CanvasElement, ElementId, ElementKind, FontFamily, PhotoBytes, PhotoElement,
    StickerElement, TextBlock, TextColor, FONT_SIZE_STEP,
};
use crate::entry::{EntryPatch, EntryPayload};
use crate::geometry::{CanvasRect, CanvasVec};
use crate::gesture::{DragOutcome, TapOutcome, TransformController};
use crate::scene::SceneStore;

/// Which screen the session backs. Decorate is the sticker-only overlay;
/// text and photos render there but cannot be touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Editor,
    Decorate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("an entry holds at most {limit} canvas photos")]
    PhotoLimitReached { limit: usize },
    #[error("only stickers are editable on the decorate screen")]
    NotEditableInDecorate,
    #[error("no text block with id {id}")]
    UnknownTextBlock { id: ElementId },
}

/// In-progress text input, detached from the store until confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraft {
    target: Option<ElementId>,
    text: String,
    color: TextColor,
    is_bold: bool,
    font: FontFamily,
    font_size: f64,
}

impl TextDraft {
    fn new(font_size: f64) -> Self {
        Self {
            target: None,
            text: String::new(),
            color: TextColor::default(),
            is_bold: false,
            font: FontFamily::default(),
            font_size,
        }
    }

    fn for_block(block: &TextBlock) -> Self {
        Self {
            target: Some(block.id),
            text: block.text.clone(),
            color: block.color,
            is_bold: block.is_bold,
            font: block.font,
            font_size: block.font_size,
        }
    }

    /// Block this draft writes back to, or `None` for a new block.
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> TextColor {
        self.color
    }

    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    pub fn font(&self) -> FontFamily {
        self.font
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Baseline {
    mood_glyph: String,
    stickers: usize,
    text_blocks: usize,
    photos: usize,
}

/// Model layer behind one editor or decorate screen.
#[derive(Debug)]
pub struct EditorSession {
    mode: SessionMode,
    store: SceneStore,
    control: TransformController,
    mood_glyph: String,
    draft: Option<TextDraft>,
    baseline: Baseline,
    issues: Vec<DecodeIssue>,
    defaults: SessionDefaults,
}

impl EditorSession {
    pub fn begin(
        payload: &EntryPayload,
        canvas: CanvasRect,
        mode: SessionMode,
        defaults: SessionDefaults,
    ) -> Self {
        let loaded = codec::load_scene(payload, canvas);
        let mood_glyph = if payload.sticker_emoji.is_empty() {
            defaults.default_mood_glyph.clone()
        } else {
            loaded.mood_glyph
        };
        let baseline = Baseline {
            mood_glyph: mood_glyph.clone(),
            stickers: baseline_count(&payload.stickers, loaded.store.stickers().len()),
            text_blocks: baseline_count(&payload.text_blocks, loaded.store.text_blocks().len()),
            photos: baseline_count(&payload.canvas_photos, loaded.store.photos().len()),
        };
        Self {
            mode,
            store: loaded.store,
            control: TransformController::new(canvas),
            mood_glyph,
            draft: None,
            baseline,
            issues: loaded.issues,
            defaults,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn controller(&self) -> &TransformController {
        &self.control
    }

    /// Collections that failed to decode when the session began.
    pub fn decode_issues(&self) -> &[DecodeIssue] {
        &self.issues
    }

    pub fn mood_glyph(&self) -> &str {
        &self.mood_glyph
    }

    pub fn set_mood_glyph(&mut self, glyph: impl Into<String>) {
        self.mood_glyph = glyph.into();
    }

    /// Whether leaving without saving would lose work. Compares collection
    /// counts and the mood glyph against the loaded entry; elements
    /// synthesized from legacy fields count as unsaved, so the first save
    /// upgrades the entry.
    pub fn has_changes(&self) -> bool {
        self.mood_glyph != self.baseline.mood_glyph
            || self.store.stickers().len() != self.baseline.stickers
            || self.store.text_blocks().len() != self.baseline.text_blocks
            || self.store.photos().len() != self.baseline.photos
    }

    pub fn add_sticker(&mut self, image_name: impl Into<String>) -> ElementId {
        let position = self.control.canvas().midline_point(STICKER_SPAWN_Y_FRACTION);
        self.store
            .add(CanvasElement::Sticker(StickerElement::new(image_name, position)))
    }

    pub fn add_photo(&mut self, data: PhotoBytes) -> Result<ElementId, SessionError> {
        self.ensure_editor()?;
        let limit = self.defaults.max_canvas_photos;
        if self.store.photos().len() >= limit {
            return Err(SessionError::PhotoLimitReached { limit });
        }
        let position = self.control.canvas().midline_point(PHOTO_SPAWN_Y_FRACTION);
        Ok(self
            .store
            .add(CanvasElement::Photo(PhotoElement::new(data, position))))
    }

    // Text draft flow.

    pub fn text_draft(&self) -> Option<&TextDraft> {
        self.draft.as_ref()
    }

    pub fn open_text_draft(&mut self) -> Result<(), SessionError> {
        self.ensure_editor()?;
        self.draft = Some(TextDraft::new(self.defaults.default_font_size));
        Ok(())
    }

    /// Opens a draft prefilled from an existing block. The persisted font
    /// size is shown as-is even when out of range; the first step snaps it
    /// back into `13.0..=34.0`.
    pub fn edit_text_block(&mut self, id: ElementId) -> Result<(), SessionError> {
        self.ensure_editor()?;
        let block = self
            .store
            .text_blocks()
            .iter()
            .find(|block| block.id == id)
            .ok_or(SessionError::UnknownTextBlock { id })?;
        self.draft = Some(TextDraft::for_block(block));
        Ok(())
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        if let Some(draft) = &mut self.draft {
            draft.text = text.into();
        }
    }

    pub fn set_draft_color(&mut self, color: TextColor) {
        if let Some(draft) = &mut self.draft {
            draft.color = color;
        }
    }

    pub fn set_draft_bold(&mut self, is_bold: bool) {
        if let Some(draft) = &mut self.draft {
            draft.is_bold = is_bold;
        }
    }

    pub fn set_draft_font(&mut self, font: FontFamily) {
        if let Some(draft) = &mut self.draft {
            draft.font = font;
        }
    }

    pub fn increase_draft_font_size(&mut self) {
        if let Some(draft) = &mut self.draft {
            draft.font_size = clamp_font_size(draft.font_size + FONT_SIZE_STEP);
        }
    }

    pub fn decrease_draft_font_size(&mut self) {
        if let Some(draft) = &mut self.draft {
            draft.font_size = clamp_font_size(draft.font_size - FONT_SIZE_STEP);
        }
    }

    /// Commits the open draft. Whitespace-only text removes the block being
    /// edited (or discards a new draft). Otherwise the target is updated in
    /// place, or a new block spawns at the text spawn point and is selected.
    /// Returns the id of the surviving block.
    pub fn confirm_text_draft(&mut self) -> Option<ElementId> {
        let draft = self.draft.take()?;
        let trimmed = draft.text.trim();

        if trimmed.is_empty() {
            if let Some(id) = draft.target {
                self.store.remove(id);
            }
            return None;
        }

        if let Some(id) = draft.target {
            if let Some(block) = self.store.text_block_mut(id) {
                block.text = trimmed.to_string();
                block.color = draft.color;
                block.is_bold = draft.is_bold;
                block.font = draft.font;
                block.font_size = draft.font_size;
                return Some(id);
            }
        }

        let position = self.control.canvas().midline_point(TEXT_SPAWN_Y_FRACTION);
        let mut block = TextBlock::new(trimmed, position);
        block.color = draft.color;
        block.is_bold = draft.is_bold;
        block.font = draft.font;
        block.font_size = draft.font_size;
        Some(self.store.add(CanvasElement::Text(block)))
    }

    pub fn cancel_text_draft(&mut self) {
        self.draft = None;
    }

    // Gesture passthroughs, gated by mode.

    pub fn begin_drag(&mut self, id: ElementId) {
        if self.interactable(id) {
            self.control.begin_drag(&self.store, id);
        }
    }

    pub fn update_drag(&mut self, id: ElementId, offset: CanvasVec) -> bool {
        if !self.interactable(id) {
            return false;
        }
        self.control.update_drag(&self.store, id, offset)
    }

    pub fn end_drag(&mut self, id: ElementId) -> DragOutcome {
        if !self.interactable(id) {
            return DragOutcome::Unchanged;
        }
        self.control.end_drag(&mut self.store, id)
    }

    pub fn begin_pinch(&mut self, id: ElementId) {
        if self.interactable(id) {
            self.control.begin_pinch(&self.store, id);
        }
    }

    pub fn update_pinch(&mut self, id: ElementId, factor: f64) {
        if self.interactable(id) {
            self.control.update_pinch(id, factor);
        }
    }

    pub fn end_pinch(&mut self, id: ElementId) -> Option<f64> {
        if !self.interactable(id) {
            return None;
        }
        self.control.end_pinch(&mut self.store, id)
    }

    pub fn begin_rotation(&mut self, id: ElementId) {
        if self.interactable(id) {
            self.control.begin_rotation(&self.store, id);
        }
    }

    pub fn update_rotation(&mut self, id: ElementId, degrees: f64) {
        if self.interactable(id) {
            self.control.update_rotation(id, degrees);
        }
    }

    pub fn end_rotation(&mut self, id: ElementId) -> Option<f64> {
        if !self.interactable(id) {
            return None;
        }
        self.control.end_rotation(&mut self.store, id)
    }

    pub fn cancel_gestures(&mut self) {
        self.control.cancel_all();
    }

    pub fn tap(&mut self, id: ElementId) -> TapOutcome {
        if !self.interactable(id) {
            return TapOutcome::Ignored;
        }
        self.control.tap(&mut self.store, id)
    }

    pub fn tap_background(&mut self) {
        self.control.tap_background(&mut self.store);
    }

    pub fn over_delete_zone(&self, id: ElementId) -> bool {
        self.control.over_delete_zone(&self.store, id)
    }

    pub fn drag_in_progress(&self) -> bool {
        self.control.drag_in_progress()
    }

    /// Patch to persist. Editor mode rewrites the whole composition; the
    /// decorate screen touches only the sticker collection.
    pub fn save(&self) -> EntryPatch {
        match self.mode {
            SessionMode::Editor => codec::save_scene(&self.store, &self.mood_glyph),
            SessionMode::Decorate => EntryPatch {
                stickers: Some(self.store.stickers().to_vec()),
                ..EntryPatch::default()
            },
        }
    }

    fn ensure_editor(&self) -> Result<(), SessionError> {
        match self.mode {
            SessionMode::Editor => Ok(()),
            SessionMode::Decorate => Err(SessionError::NotEditableInDecorate),
        }
    }

    fn interactable(&self, id: ElementId) -> bool {
        match self.mode {
            SessionMode::Editor => true,
            SessionMode::Decorate => {
                matches!(self.store.kind_of(id), Some(ElementKind::Sticker))
            }
        }
    }
}

/// Baseline count for one structured collection. Absent collections load
/// through legacy migration, and those elements count as unsaved.
fn baseline_count(collection: &Value, loaded: usize) -> usize {
    match collection {
        Value::Null => 0,
        Value::Array(records) if records.is_empty() => 0,
        _ => loaded,
    }
}

const TEXT_SPAWN_Y_FRACTION: f64 = 0.42;
const STICKER_SPAWN_Y_FRACTION: f64 = 0.45;
const PHOTO_SPAWN_Y_FRACTION: f64 = 0.45;
