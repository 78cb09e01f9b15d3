use super::*;

impl SceneStore {
    /// Inserts the element into its collection, stamps it with the next
    /// z-order, and selects it.
    pub fn add(&mut self, mut element: CanvasElement) -> ElementId {
        let id = element.id();
        element.placement_mut().z_order = self.allocate_z_order();
        match element {
            CanvasElement::Sticker(sticker) => self.stickers.push(sticker),
            CanvasElement::Text(text) => self.text_blocks.push(text),
            CanvasElement::Photo(photo) => self.photos.push(photo),
        }
        self.selected = Some(id);
        id
    }

    /// Removes the element from whichever collection holds it, clearing the
    /// selection if it pointed there. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let removed = if let Some(index) = self.stickers.iter().position(|s| s.id == id) {
            self.stickers.remove(index);
            true
        } else if let Some(index) = self.text_blocks.iter().position(|t| t.id == id) {
            self.text_blocks.remove(index);
            true
        } else if let Some(index) = self.photos.iter().position(|p| p.id == id) {
            self.photos.remove(index);
            true
        } else {
            false
        };
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Single selection shared across all three collections. Selecting an id
    /// that is not present clears the selection.
    pub fn select(&mut self, id: ElementId) {
        self.selected = if self.contains(id) { Some(id) } else { None };
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Positions the z cursor one past the highest persisted z-order, so the
    /// next added element lands above everything already on the canvas.
    pub fn initialize_z_cursor(&mut self) {
        let max_z = self
            .stickers
            .iter()
            .map(|s| s.placement.z_order)
            .chain(self.text_blocks.iter().map(|t| t.placement.z_order))
            .chain(self.photos.iter().map(|p| p.placement.z_order))
            .max();
        self.next_z_order = match max_z {
            Some(z) => z.saturating_add(1),
            None => 0,
        };
    }

    fn allocate_z_order(&mut self) -> i64 {
        let z = self.next_z_order;
        self.next_z_order = self.next_z_order.saturating_add(1);
        z
    }
}
