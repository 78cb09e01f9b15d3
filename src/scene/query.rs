use super::*;
use crate::element::Placement;

impl SceneStore {
    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.text_blocks
            .iter()
            .find(|t| t.id == id)
            .map(ElementRef::Text)
            .or_else(|| self.photos.iter().find(|p| p.id == id).map(ElementRef::Photo))
            .or_else(|| {
                self.stickers
                    .iter()
                    .find(|s| s.id == id)
                    .map(ElementRef::Sticker)
            })
    }

    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.element(id).map(ElementRef::kind)
    }

    pub fn placement(&self, id: ElementId) -> Option<&Placement> {
        self.element(id).map(ElementRef::placement)
    }

    pub(crate) fn text_block_mut(&mut self, id: ElementId) -> Option<&mut TextBlock> {
        self.text_blocks.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn placement_mut(&mut self, id: ElementId) -> Option<&mut Placement> {
        if let Some(text) = self.text_blocks.iter_mut().find(|t| t.id == id) {
            return Some(&mut text.placement);
        }
        if let Some(photo) = self.photos.iter_mut().find(|p| p.id == id) {
            return Some(&mut photo.placement);
        }
        if let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) {
            return Some(&mut sticker.placement);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.stickers.len() + self.text_blocks.len() + self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every element in ascending paint order. Ties on z-order keep the text,
    /// photo, sticker enumeration, which is how legacy scenes with all-zero
    /// z-orders have always stacked.
    pub fn z_ordered(&self) -> Vec<ElementRef<'_>> {
        let mut elements: Vec<ElementRef<'_>> = Vec::with_capacity(self.len());
        elements.extend(self.text_blocks.iter().map(ElementRef::Text));
        elements.extend(self.photos.iter().map(ElementRef::Photo));
        elements.extend(self.stickers.iter().map(ElementRef::Sticker));
        elements.sort_by_key(|element| element.placement().z_order);
        elements
    }

    /// Text blocks in ascending z-order, used for the derived legacy body.
    pub fn text_blocks_z_ordered(&self) -> Vec<&TextBlock> {
        let mut blocks: Vec<&TextBlock> = self.text_blocks.iter().collect();
        blocks.sort_by_key(|block| block.placement.z_order);
        blocks
    }

    /// Photos in ascending z-order, used to mirror the legacy photo list.
    pub fn photos_z_ordered(&self) -> Vec<&PhotoElement> {
        let mut photos: Vec<&PhotoElement> = self.photos.iter().collect();
        photos.sort_by_key(|photo| photo.placement.z_order);
        photos
    }
}
