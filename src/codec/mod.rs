//! Versioned payload decoding and encoding.
//!
//! Three payload generations coexist on disk: plain body text plus a flat
//! photo list, early structured collections without z-order or font metadata,
//! and the current full records. Decoding folds all three into one scene;
//! encoding always writes the current shape while rewriting the legacy fields
//! so old readers stay correct.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::element::{PhotoBytes, PhotoElement, StickerElement, TextBlock};
use crate::entry::{EntryPatch, EntryPayload, DEFAULT_MOOD_GLYPH};
use crate::geometry::{CanvasPoint, CanvasRect};
use crate::scene::SceneStore;

/// Hard failures crossing the codec boundary. Anything recoverable is
/// reported as a [`DecodeIssue`] instead.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("entry payload is not valid JSON")]
    MalformedEnvelope(#[source] serde_json::Error),
    #[error("entry payload could not be re-serialized")]
    Serialize(#[source] serde_json::Error),
}

/// One structured collection could not be decoded. The load continues with
/// that collection empty.
#[derive(Debug, Error)]
#[error("{collection} is not a decodable sequence of records")]
pub struct DecodeIssue {
    pub collection: CollectionKind,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Stickers,
    TextBlocks,
    CanvasPhotos,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stickers => "stickers",
            Self::TextBlocks => "textBlocks",
            Self::CanvasPhotos => "canvasPhotos",
        })
    }
}

/// Result of decoding one entry payload.
#[derive(Debug)]
pub struct LoadedScene {
    pub store: SceneStore,
    /// Mood glyph with the documented default already applied.
    pub mood_glyph: String,
    /// The legacy body text exactly as persisted.
    pub legacy_content: String,
    pub issues: Vec<DecodeIssue>,
}

/// Decodes a payload into a scene, migrating legacy shapes.
///
/// Per collection, in priority order: a present non-empty structured
/// collection decodes directly; otherwise a non-empty legacy field is
/// synthesized into elements; otherwise the collection is empty. A corrupt
/// structured collection loads empty and skips the legacy fallback, because
/// the entry had already moved past the legacy shape.
pub fn load_scene(payload: &EntryPayload, canvas: CanvasRect) -> LoadedScene {
    let mut issues = Vec::new();

    let stickers =
        match decode_collection(&payload.stickers, CollectionKind::Stickers, &mut issues) {
            Decoded::Present(stickers) => stickers,
            Decoded::Absent | Decoded::Corrupt => Vec::new(),
        };
    let text_blocks = match decode_collection(
        &payload.text_blocks,
        CollectionKind::TextBlocks,
        &mut issues,
    ) {
        Decoded::Present(blocks) => blocks,
        Decoded::Absent => legacy_text_blocks(&payload.content, canvas),
        Decoded::Corrupt => Vec::new(),
    };
    let photos = match decode_collection(
        &payload.canvas_photos,
        CollectionKind::CanvasPhotos,
        &mut issues,
    ) {
        Decoded::Present(photos) => photos,
        Decoded::Absent => legacy_photo_row(&payload.photo_data_array, canvas),
        Decoded::Corrupt => Vec::new(),
    };

    let store = SceneStore::from_collections(stickers, text_blocks, photos);
    tracing::debug!(
        stickers = store.stickers().len(),
        text_blocks = store.text_blocks().len(),
        photos = store.photos().len(),
        issues = issues.len(),
        "entry payload decoded"
    );

    LoadedScene {
        store,
        mood_glyph: mood_or_default(&payload.sticker_emoji),
        legacy_content: payload.content.clone(),
        issues,
    }
}

/// Encodes the store back to the full current schema.
///
/// Every record field is emitted explicitly so the next decode never falls
/// back to defaults. The legacy fields are rewritten: `content` joins the
/// text bodies in reading order and `photoDataArray` mirrors the canvas
/// photo bytes.
pub fn save_scene(store: &SceneStore, mood_glyph: &str) -> EntryPatch {
    EntryPatch {
        content: Some(derived_content(store)),
        sticker_emoji: Some(mood_or_default(mood_glyph)),
        photo_data_array: Some(
            store
                .photos_z_ordered()
                .iter()
                .map(|photo| photo.data.clone())
                .collect(),
        ),
        stickers: Some(store.stickers().to_vec()),
        text_blocks: Some(store.text_blocks().to_vec()),
        canvas_photos: Some(store.photos().to_vec()),
    }
}

/// Body text derived from the canvas: non-empty blocks in ascending z-order,
/// joined by blank lines.
pub fn derived_content(store: &SceneStore) -> String {
    store
        .text_blocks_z_ordered()
        .iter()
        .map(|block| block.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parses, migrates, and re-serializes a payload in one call, bringing legacy
/// shapes up to the current schema.
pub fn normalize_entry_json(json: &str, canvas: CanvasRect) -> Result<String, CodecError> {
    let mut payload = EntryPayload::from_json_str(json).map_err(CodecError::MalformedEnvelope)?;
    let loaded = load_scene(&payload, canvas);
    let patch = save_scene(&loaded.store, &loaded.mood_glyph);
    patch.apply_to(&mut payload).map_err(CodecError::Serialize)?;
    payload.to_json_string().map_err(CodecError::Serialize)
}

fn mood_or_default(glyph: &str) -> String {
    if glyph.is_empty() {
        DEFAULT_MOOD_GLYPH.to_owned()
    } else {
        glyph.to_owned()
    }
}

enum Decoded<T> {
    /// Records decoded from a present, non-empty collection.
    Present(Vec<T>),
    /// Missing, null, or an empty array; the legacy fallback may apply.
    Absent,
    /// Present but not a decodable sequence; an issue was recorded.
    Corrupt,
}

fn decode_collection<T: for<'de> Deserialize<'de>>(
    value: &Value,
    collection: CollectionKind,
    issues: &mut Vec<DecodeIssue>,
) -> Decoded<T> {
    match value {
        Value::Null => Decoded::Absent,
        Value::Array(records) if records.is_empty() => Decoded::Absent,
        _ => match Vec::<T>::deserialize(value) {
            Ok(records) => Decoded::Present(records),
            Err(err) => {
                tracing::warn!(%collection, ?err, "collection not decodable; loading it empty");
                issues.push(DecodeIssue {
                    collection,
                    source: err,
                });
                Decoded::Corrupt
            }
        },
    }
}

/// Legacy body migration: the whole text becomes one block centered
/// horizontally, at the fixed offset and font size the old editor used.
fn legacy_text_blocks(content: &str, canvas: CanvasRect) -> Vec<TextBlock> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut block = TextBlock::new(
        content,
        CanvasPoint::new(canvas.width / 2.0, LEGACY_TEXT_Y),
    );
    block.font_size = LEGACY_TEXT_FONT_SIZE;
    vec![block]
}

/// Legacy flat photo list: one element per non-empty blob, laid out
/// left-to-right as a row centered on the canvas midline.
fn legacy_photo_row(photo_data: &[PhotoBytes], canvas: CanvasRect) -> Vec<PhotoElement> {
    let blobs: Vec<&PhotoBytes> = photo_data.iter().filter(|data| !data.is_empty()).collect();
    if blobs.is_empty() {
        return Vec::new();
    }
    let y = canvas.height * LEGACY_PHOTO_ROW_Y_FRACTION;
    let row_width = (blobs.len() - 1) as f64 * LEGACY_PHOTO_SPACING;
    let start_x = canvas.width / 2.0 - row_width / 2.0;
    blobs
        .into_iter()
        .enumerate()
        .map(|(index, data)| {
            let x = start_x + index as f64 * LEGACY_PHOTO_SPACING;
            PhotoElement::new(data.clone(), CanvasPoint::new(x, y))
        })
        .collect()
}

const LEGACY_TEXT_Y: f64 = 280.0;
const LEGACY_TEXT_FONT_SIZE: f64 = 17.0;
const LEGACY_PHOTO_ROW_Y_FRACTION: f64 = 0.50;
const LEGACY_PHOTO_SPACING: f64 = 170.0;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{CanvasElement, TextColor};

    fn canvas() -> CanvasRect {
        CanvasRect::new(390.0, 700.0)
    }

    fn payload_from(json: &str) -> EntryPayload {
        EntryPayload::from_json_str(json).expect("test payload should parse")
    }

    #[test]
    fn legacy_content_becomes_one_centered_block() {
        let payload = payload_from(r#"{"dateKey":"2024-11-02","content":"비 오는 날의 일기"}"#);
        let loaded = load_scene(&payload, canvas());

        assert!(loaded.issues.is_empty());
        let blocks = loaded.store.text_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "비 오는 날의 일기");
        assert_eq!(blocks[0].placement.position(), CanvasPoint::new(195.0, 280.0));
        assert_eq!(blocks[0].font_size, 17.0);
        assert_eq!(blocks[0].placement.z_order, 0);
    }

    #[test]
    fn legacy_photos_form_a_centered_row_skipping_empty_blobs() {
        let payload = payload_from(
            r#"{"photoDataArray":["AQ==","","Ag==","Aw=="]}"#,
        );
        let loaded = load_scene(&payload, canvas());

        let photos = loaded.store.photos();
        assert_eq!(photos.len(), 3);
        let xs: Vec<f64> = photos.iter().map(|p| p.placement.x).collect();
        assert_eq!(xs, vec![25.0, 195.0, 365.0]);
        assert!(photos.iter().all(|p| p.placement.y == 350.0));
        assert_eq!(photos[0].data.as_slice(), &[1]);
        assert_eq!(photos[2].data.as_slice(), &[3]);
    }

    #[test]
    fn structured_collections_win_over_legacy_fields() {
        let payload = payload_from(
            r#"{
                "content": "옛날 본문",
                "photoDataArray": ["AQ=="],
                "textBlocks": [{"text":"새 본문","x":40.0,"y":60.0}],
                "canvasPhotos": [{"data":"Ag==","x":80.0,"y":90.0}]
            }"#,
        );
        let loaded = load_scene(&payload, canvas());

        assert_eq!(loaded.store.text_blocks().len(), 1);
        assert_eq!(loaded.store.text_blocks()[0].text, "새 본문");
        assert_eq!(loaded.store.photos().len(), 1);
        assert_eq!(loaded.store.photos()[0].data.as_slice(), &[2]);
        assert_eq!(loaded.legacy_content, "옛날 본문");
    }

    #[test]
    fn partial_records_fill_the_documented_defaults() {
        let payload = payload_from(
            r#"{"textBlocks":[{"id":"7b0f7f6a-9f6e-4a6b-8e36-7f1c07b6f0aa","text":"기본값","x":10.0,"y":20.0}]}"#,
        );
        let loaded = load_scene(&payload, canvas());

        let block = &loaded.store.text_blocks()[0];
        assert_eq!(block.placement.scale, 1.0);
        assert_eq!(block.placement.rotation_degrees, 0.0);
        assert_eq!(block.placement.z_order, 0);
        assert_eq!(block.font_size, 20.0);
        assert_eq!(block.color, TextColor::Primary);
        assert!(!block.is_bold);
        assert_eq!(block.font.key(), "system");
    }

    #[test]
    fn corrupt_collection_loads_empty_without_resurrecting_legacy_text() {
        let payload = payload_from(
            r#"{"content":"살아있는 본문","textBlocks":{"not":"an array"},"stickers":[{"imageName":"sticker1_01","x":1.0,"y":2.0}]}"#,
        );
        let loaded = load_scene(&payload, canvas());

        assert_eq!(loaded.issues.len(), 1);
        assert_eq!(loaded.issues[0].collection, CollectionKind::TextBlocks);
        assert!(loaded.store.text_blocks().is_empty());
        // The intact collection still decodes.
        assert_eq!(loaded.store.stickers().len(), 1);
        assert_eq!(loaded.legacy_content, "살아있는 본문");
    }

    #[test]
    fn wrong_typed_record_field_counts_as_a_corrupt_collection() {
        let payload = payload_from(r#"{"stickers":[{"imageName":"sticker1_01","x":"abc","y":2.0}]}"#);
        let loaded = load_scene(&payload, canvas());

        assert_eq!(loaded.issues.len(), 1);
        assert_eq!(loaded.issues[0].collection, CollectionKind::Stickers);
        assert!(loaded.store.stickers().is_empty());
    }

    #[test]
    fn empty_array_takes_the_legacy_fallback_like_a_missing_one() {
        let payload = payload_from(r#"{"content":"본문","textBlocks":[]}"#);
        let loaded = load_scene(&payload, canvas());

        assert_eq!(loaded.store.text_blocks().len(), 1);
        assert_eq!(loaded.store.text_blocks()[0].text, "본문");
    }

    #[test]
    fn z_cursor_lands_above_persisted_orders_after_load() {
        let payload = payload_from(
            r#"{"stickers":[{"imageName":"sticker1_02","x":1.0,"y":2.0,"zOrder":5}]}"#,
        );
        let mut loaded = load_scene(&payload, canvas());

        let id = loaded.store.add(CanvasElement::Sticker(StickerElement::new(
            "sticker1_03",
            CanvasPoint::new(0.0, 0.0),
        )));
        assert_eq!(loaded.store.placement(id).map(|p| p.z_order), Some(6));
    }

    #[test]
    fn mood_glyph_defaults_when_unset() {
        let loaded = load_scene(&payload_from("{}"), canvas());
        assert_eq!(loaded.mood_glyph, "🌸");

        let loaded = load_scene(&payload_from(r#"{"stickerEmoji":"🧸"}"#), canvas());
        assert_eq!(loaded.mood_glyph, "🧸");
    }

    #[test]
    fn save_rewrites_legacy_fields_from_the_scene() {
        let mut store = SceneStore::new();
        store.add(CanvasElement::Text(TextBlock::new(
            "첫 단락",
            CanvasPoint::new(100.0, 100.0),
        )));
        store.add(CanvasElement::Text(TextBlock::new(
            "",
            CanvasPoint::new(110.0, 140.0),
        )));
        store.add(CanvasElement::Text(TextBlock::new(
            "둘째 단락",
            CanvasPoint::new(120.0, 180.0),
        )));
        store.add(CanvasElement::Photo(PhotoElement::new(
            PhotoBytes::new(vec![9, 9]),
            CanvasPoint::new(50.0, 50.0),
        )));

        let patch = save_scene(&store, "");
        assert_eq!(patch.content.as_deref(), Some("첫 단락\n\n둘째 단락"));
        assert_eq!(patch.sticker_emoji.as_deref(), Some("🌸"));
        let mirrored = patch.photo_data_array.as_deref().expect("photo mirror");
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].as_slice(), &[9, 9]);
    }

    #[test]
    fn derived_content_follows_z_order_not_insertion_order() {
        let mut early = TextBlock::new("나중에 추가했지만 아래", CanvasPoint::new(0.0, 0.0));
        early.placement.z_order = 7;
        let mut late = TextBlock::new("먼저", CanvasPoint::new(0.0, 0.0));
        late.placement.z_order = 2;

        let store = SceneStore::from_collections(Vec::new(), vec![early, late], Vec::new());
        assert_eq!(derived_content(&store), "먼저\n\n나중에 추가했지만 아래");
    }

    #[test]
    fn encode_emits_every_record_field() {
        let mut store = SceneStore::new();
        store.add(CanvasElement::Text(TextBlock::new(
            "모든 필드",
            CanvasPoint::new(30.0, 40.0),
        )));
        store.add(CanvasElement::Sticker(StickerElement::new(
            "sticker3_01",
            CanvasPoint::new(10.0, 20.0),
        )));

        let mut payload = EntryPayload::default();
        save_scene(&store, "🌸")
            .apply_to(&mut payload)
            .expect("patch should apply");

        let sticker = &payload.stickers.as_array().expect("sticker array")[0];
        for key in ["id", "imageName", "x", "y", "scale", "rotation", "zOrder"] {
            assert!(sticker.get(key).is_some(), "sticker record should carry {key}");
        }
        let block = &payload.text_blocks.as_array().expect("text array")[0];
        for key in [
            "id", "text", "x", "y", "scale", "rotation", "zOrder", "fontSize", "colorName",
            "isBold", "fontName",
        ] {
            assert!(block.get(key).is_some(), "text record should carry {key}");
        }
    }

    #[test]
    fn full_records_survive_a_decode_encode_cycle_unchanged() {
        let sticker_json = serde_json::json!({
            "id": "71b936de-1d73-4398-a8af-3f3026bec21b",
            "imageName": "sticker1_09",
            "x": 131.5,
            "y": 77.25,
            "scale": 2.5,
            "rotation": 370.0,
            "zOrder": 3
        });
        let payload = payload_from(&serde_json::json!({ "stickers": [sticker_json] }).to_string());

        let loaded = load_scene(&payload, canvas());
        let mut round_tripped = EntryPayload::default();
        save_scene(&loaded.store, &loaded.mood_glyph)
            .apply_to(&mut round_tripped)
            .expect("patch should apply");

        assert_eq!(round_tripped.stickers.as_array().expect("stickers")[0], sticker_json);
    }

    #[test]
    fn normalize_brings_a_legacy_payload_to_the_current_schema() {
        let json = r#"{"dateKey":"2023-07-09","content":"이사한 날","photoDataArray":["AQ=="]}"#;
        let normalized =
            normalize_entry_json(json, canvas()).expect("legacy payload should normalize");
        let value: Value = serde_json::from_str(&normalized).expect("normalized output is JSON");

        assert_eq!(value["dateKey"], "2023-07-09");
        assert_eq!(value["content"], "이사한 날");
        assert_eq!(value["textBlocks"][0]["text"], "이사한 날");
        assert_eq!(value["textBlocks"][0]["fontSize"], 17.0);
        assert_eq!(value["canvasPhotos"][0]["data"], "AQ==");
        assert_eq!(value["stickerEmoji"], "🌸");
    }

    #[test]
    fn garbage_envelope_is_the_only_hard_failure() {
        let err = normalize_entry_json("not json at all", canvas())
            .expect_err("garbage input should fail");
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));
    }
}
