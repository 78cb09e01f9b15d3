//! Paint plans for host renderers. The engine owns no drawing surface; it
//! hands back draw items in paint order and the host rasterizes them.

use image::GenericImageView;

use crate::element::{
    ElementId, ElementRef, PhotoBytes, PHOTO_BASE_SIZE, STICKER_BASE_SIZE, TEXT_MAX_WIDTH,
};
use crate::element::{FontFamily, TextColor};
use crate::geometry::CanvasPoint;
use crate::gesture::TransformController;
use crate::scene::SceneStore;

/// One element, fully positioned, in back-to-front paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem<'a> {
    pub id: ElementId,
    pub position: CanvasPoint,
    pub scale: f64,
    pub rotation_degrees: f64,
    pub z_order: i64,
    pub selected: bool,
    pub content: DrawContent<'a>,
}

/// What to paint at a [`DrawItem`]'s transform. Base sizes are the unscaled
/// edge lengths the scale factor applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawContent<'a> {
    Sticker {
        asset: &'a str,
        base_size: f64,
    },
    Text {
        text: &'a str,
        font_size: f64,
        color: TextColor,
        is_bold: bool,
        font: FontFamily,
        max_width: f64,
    },
    Photo {
        data: &'a PhotoBytes,
        base_size: f64,
    },
}

/// Plan for the editable canvas: in-flight gesture transforms are composed
/// over committed placements and the selected element is flagged.
pub fn editing_plan<'a>(store: &'a SceneStore, control: &TransformController) -> Vec<DrawItem<'a>> {
    plan(store, Some(control), true)
}

/// Plan for read-only previews and flattened exports: committed placements
/// only, nothing selected.
pub fn snapshot_plan(store: &SceneStore) -> Vec<DrawItem<'_>> {
    plan(store, None, false)
}

fn plan<'a>(
    store: &'a SceneStore,
    control: Option<&TransformController>,
    mark_selection: bool,
) -> Vec<DrawItem<'a>> {
    store
        .z_ordered()
        .into_iter()
        .map(|element| {
            let placement = element.placement();
            let (position, scale, rotation_degrees) = match control
                .and_then(|control| control.resolved(store, element.id()))
            {
                Some(resolved) => (resolved.position, resolved.scale, resolved.rotation_degrees),
                None => (placement.position(), placement.scale, placement.rotation_degrees),
            };
            DrawItem {
                id: element.id(),
                position,
                scale,
                rotation_degrees,
                z_order: placement.z_order,
                selected: mark_selection && store.selected() == Some(element.id()),
                content: content_of(element),
            }
        })
        .collect()
}

fn content_of(element: ElementRef<'_>) -> DrawContent<'_> {
    match element {
        ElementRef::Sticker(sticker) => DrawContent::Sticker {
            asset: &sticker.image_name,
            base_size: STICKER_BASE_SIZE,
        },
        ElementRef::Text(text) => DrawContent::Text {
            text: &text.text,
            font_size: text.font_size,
            color: text.color,
            is_bold: text.is_bold,
            font: text.font,
            max_width: TEXT_MAX_WIDTH,
        },
        ElementRef::Photo(photo) => DrawContent::Photo {
            data: &photo.data,
            base_size: PHOTO_BASE_SIZE,
        },
    }
}

/// Unscaled extent of a text block estimated without a font engine, for hosts
/// that need hit margins or export layout before type is shaped. Lines wrap
/// at [`TEXT_MAX_WIDTH`].
pub fn text_extent_estimate(text: &str, font_size: f64) -> (f64, f64) {
    let char_width = fallback_char_width(font_size);
    let line_height = text_line_height(font_size);
    let chars_per_row = ((TEXT_MAX_WIDTH / char_width).floor() as usize).max(1);

    let mut rows = 0usize;
    let mut widest_row = 0usize;
    for line in text.split('\n') {
        let chars = line.chars().count();
        if chars == 0 {
            rows += 1;
            continue;
        }
        rows += (chars + chars_per_row - 1) / chars_per_row;
        widest_row = widest_row.max(chars.min(chars_per_row));
    }

    let width = (widest_row as f64 * char_width).ceil().min(TEXT_MAX_WIDTH).max(8.0);
    let height = (rows.max(1) as f64 * line_height).max(font_size);
    (width, height)
}

/// Intrinsic pixel size of a photo, or `None` when the bytes do not decode
/// as an image.
pub fn photo_dimensions(data: &PhotoBytes) -> Option<(u32, u32)> {
    image::load_from_memory(data.as_slice())
        .ok()
        .map(|image| image.dimensions())
}

fn fallback_char_width(font_size: f64) -> f64 {
    (font_size * 0.62).max(1.0)
}

fn text_line_height(font_size: f64) -> f64 {
    (font_size * 1.3).max(2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{CanvasElement, PhotoElement, StickerElement, TextBlock};
    use crate::geometry::{CanvasRect, CanvasVec};

    fn canvas() -> CanvasRect {
        CanvasRect::new(390.0, 700.0)
    }

    fn seeded_store() -> SceneStore {
        let mut store = SceneStore::new();
        store.add(CanvasElement::Text(TextBlock::new(
            "hello",
            CanvasPoint::new(100.0, 100.0),
        )));
        store.add(CanvasElement::Photo(PhotoElement::new(
            PhotoBytes::new(vec![1, 2, 3]),
            CanvasPoint::new(200.0, 200.0),
        )));
        store.add(CanvasElement::Sticker(StickerElement::new(
            "sticker1_04",
            CanvasPoint::new(300.0, 300.0),
        )));
        store
    }

    #[test]
    fn snapshot_plan_orders_items_back_to_front_across_collections() {
        let store = seeded_store();

        let plan = snapshot_plan(&store);

        let z: Vec<i64> = plan.iter().map(|item| item.z_order).collect();
        assert_eq!(z, vec![0, 1, 2]);
        assert!(matches!(plan[0].content, DrawContent::Text { .. }));
        assert!(matches!(plan[1].content, DrawContent::Photo { .. }));
        assert!(matches!(plan[2].content, DrawContent::Sticker { .. }));
    }

    #[test]
    fn snapshot_plan_never_marks_selection() {
        let store = seeded_store();
        assert!(store.selected().is_some());

        let plan = snapshot_plan(&store);

        assert!(plan.iter().all(|item| !item.selected));
    }

    #[test]
    fn editing_plan_marks_only_the_selected_element() {
        let mut store = seeded_store();
        let text_id = store.text_blocks()[0].id;
        store.select(text_id);
        let control = TransformController::new(canvas());

        let plan = editing_plan(&store, &control);

        let selected: Vec<ElementId> = plan
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.id)
            .collect();
        assert_eq!(selected, vec![text_id]);
    }

    #[test]
    fn editing_plan_composes_live_drag_over_committed_placement() {
        let mut store = seeded_store();
        let photo_id = store.photos()[0].id;
        let mut control = TransformController::new(canvas());
        control.begin_drag(&store, photo_id);
        control.update_drag(&store, photo_id, CanvasVec::new(15.0, -25.0));

        let plan = editing_plan(&store, &control);

        let photo = plan
            .iter()
            .find(|item| item.id == photo_id)
            .expect("photo should be in the plan");
        assert_eq!(photo.position, CanvasPoint::new(215.0, 175.0));

        let sticker = plan
            .iter()
            .find(|item| matches!(item.content, DrawContent::Sticker { .. }))
            .expect("sticker should be in the plan");
        assert_eq!(sticker.position, CanvasPoint::new(300.0, 300.0));
    }

    #[test]
    fn content_carries_base_sizes_and_text_attributes() {
        let store = seeded_store();

        let plan = snapshot_plan(&store);

        match &plan[0].content {
            DrawContent::Text {
                text,
                font_size,
                max_width,
                ..
            } => {
                assert_eq!(*text, "hello");
                assert_eq!(*font_size, 20.0);
                assert_eq!(*max_width, 260.0);
            }
            other => panic!("expected text content, got {other:?}"),
        }
        match &plan[1].content {
            DrawContent::Photo { base_size, .. } => assert_eq!(*base_size, 150.0),
            other => panic!("expected photo content, got {other:?}"),
        }
        match &plan[2].content {
            DrawContent::Sticker { asset, base_size } => {
                assert_eq!(*asset, "sticker1_04");
                assert_eq!(*base_size, 90.0);
            }
            other => panic!("expected sticker content, got {other:?}"),
        }
    }

    #[test]
    fn text_extent_estimate_grows_with_hard_line_breaks() {
        let (_, one_line) = text_extent_estimate("hello", 20.0);
        let (_, three_lines) = text_extent_estimate("hello\nworld\nagain", 20.0);

        assert_eq!(one_line, 26.0);
        assert_eq!(three_lines, 78.0);
    }

    #[test]
    fn text_extent_estimate_wraps_long_lines_at_max_width() {
        let long = "a".repeat(60);

        let (width, height) = text_extent_estimate(&long, 20.0);

        // 12.4pt per char caps a row at 20 chars, so 60 chars take 3 rows.
        assert_eq!(width, 248.0);
        assert_eq!(height, 78.0);
    }

    #[test]
    fn text_extent_estimate_of_empty_text_is_one_line() {
        let (width, height) = text_extent_estimate("", 20.0);

        assert_eq!(width, 8.0);
        assert_eq!(height, 26.0);
    }

    #[test]
    fn photo_dimensions_reads_intrinsic_size_from_encoded_bytes() {
        let mut encoded = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(2, 3)
            .write_to(&mut encoded, image::ImageFormat::Png)
            .expect("in-memory png encode should succeed");

        let probed = photo_dimensions(&PhotoBytes::new(encoded.into_inner()));

        assert_eq!(probed, Some((2, 3)));
    }

    #[test]
    fn photo_dimensions_of_undecodable_bytes_is_none() {
        assert_eq!(photo_dimensions(&PhotoBytes::new(vec![1, 2, 3])), None);
        assert_eq!(photo_dimensions(&PhotoBytes::new(Vec::new())), None);
    }
}
