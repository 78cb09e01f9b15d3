//! Gesture-driven transforms. Uncommitted deltas live here, never in the
//! store; the store only changes when a gesture ends.

use crate::delete_zone::DeleteZone;
use crate::element::{ElementId, ElementKind};
use crate::geometry::{CanvasPoint, CanvasRect, CanvasVec};
use crate::scene::SceneStore;

/// Outcome of a finished drag, reported to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Released inside the delete zone; the element is gone from the store.
    Deleted,
    /// Committed to the clamped position.
    Moved(CanvasPoint),
    /// Nothing changed: unknown id, no active drag, or a zero offset.
    Unchanged,
}

/// Outcome of a tap on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Selected,
    /// The already-selected text block was tapped again; the host should open
    /// its text editor.
    EditRequested,
    Ignored,
}

/// Live transform of one element: the committed placement with any
/// in-progress gesture deltas composed on top. Live values are unclamped;
/// clamping happens only on commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTransform {
    pub position: CanvasPoint,
    pub scale: f64,
    pub rotation_degrees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureEntry {
    id: ElementId,
    drag: Option<CanvasVec>,
    pinch: Option<f64>,
    rotation: Option<f64>,
}

impl GestureEntry {
    fn idle(id: ElementId) -> Self {
        Self {
            id,
            drag: None,
            pinch: None,
            rotation: None,
        }
    }

    fn is_idle(&self) -> bool {
        self.drag.is_none() && self.pinch.is_none() && self.rotation.is_none()
    }
}

/// Per-element gesture state for one canvas.
///
/// Drag and pinch/rotation run concurrently on the same element and commit
/// independently from their own terminal events. Unknown ids are no-ops
/// throughout.
#[derive(Debug, Clone)]
pub struct TransformController {
    canvas: CanvasRect,
    delete_zone: DeleteZone,
    active: Vec<GestureEntry>,
}

impl TransformController {
    pub fn new(canvas: CanvasRect) -> Self {
        Self {
            canvas,
            delete_zone: DeleteZone::for_canvas(canvas),
            active: Vec::new(),
        }
    }

    pub fn canvas(&self) -> CanvasRect {
        self.canvas
    }

    pub fn delete_zone(&self) -> DeleteZone {
        self.delete_zone
    }

    /// Starts a drag, discarding any stale drag state for the element.
    pub fn begin_drag(&mut self, store: &SceneStore, id: ElementId) {
        if !store.contains(id) {
            return;
        }
        self.entry_or_insert(id).drag = Some(CanvasVec::ZERO);
    }

    /// Replaces the live drag offset. Returns true while the live position
    /// sits inside the delete zone, which drives the zone's hot state.
    pub fn update_drag(&mut self, store: &SceneStore, id: ElementId, offset: CanvasVec) -> bool {
        match self.entry_mut(id) {
            Some(entry) if entry.drag.is_some() => entry.drag = Some(offset),
            _ => return false,
        }
        self.over_delete_zone(store, id)
    }

    /// Ends the drag: deletes the element when released inside the zone,
    /// otherwise commits the clamped position. A zero offset commits nothing,
    /// so a pure tap never moves an element.
    pub fn end_drag(&mut self, store: &mut SceneStore, id: ElementId) -> DragOutcome {
        let Some(offset) = self.take_drag(id) else {
            return DragOutcome::Unchanged;
        };
        if offset.is_zero() {
            return DragOutcome::Unchanged;
        }
        let Some(placement) = store.placement(id) else {
            return DragOutcome::Unchanged;
        };
        let live = placement.position().offset_by(offset);

        if self.delete_zone.contains(live) {
            self.cancel(id);
            store.remove(id);
            tracing::debug!(%id, "element released in delete zone");
            return DragOutcome::Deleted;
        }

        let committed = self.canvas.clamp_point(live);
        if let Some(placement) = store.placement_mut(id) {
            placement.set_position(committed);
        }
        tracing::debug!(%id, x = committed.x, y = committed.y, "drag committed");
        DragOutcome::Moved(committed)
    }

    pub fn begin_pinch(&mut self, store: &SceneStore, id: ElementId) {
        if !store.contains(id) {
            return;
        }
        self.entry_or_insert(id).pinch = Some(1.0);
    }

    pub fn update_pinch(&mut self, id: ElementId, factor: f64) {
        if let Some(entry) = self.entry_mut(id) {
            if entry.pinch.is_some() {
                entry.pinch = Some(factor);
            }
        }
    }

    /// Commits `scale * factor` clamped to the variant's bounds. An identity
    /// factor commits nothing, so an out-of-range persisted scale survives a
    /// pinch that never moved.
    pub fn end_pinch(&mut self, store: &mut SceneStore, id: ElementId) -> Option<f64> {
        let factor = self.take_pinch(id)?;
        if factor == 1.0 {
            return None;
        }
        let kind = store.kind_of(id)?;
        let placement = store.placement_mut(id)?;
        placement.scale = kind.clamp_scale(placement.scale * factor);
        tracing::debug!(%id, scale = placement.scale, "pinch committed");
        Some(placement.scale)
    }

    pub fn begin_rotation(&mut self, store: &SceneStore, id: ElementId) {
        if !store.contains(id) {
            return;
        }
        self.entry_or_insert(id).rotation = Some(0.0);
    }

    pub fn update_rotation(&mut self, id: ElementId, degrees: f64) {
        if let Some(entry) = self.entry_mut(id) {
            if entry.rotation.is_some() {
                entry.rotation = Some(degrees);
            }
        }
    }

    /// Adds the live delta to the committed rotation. No normalization and no
    /// bounds; accumulated turns round-trip exactly.
    pub fn end_rotation(&mut self, store: &mut SceneStore, id: ElementId) -> Option<f64> {
        let delta = self.take_rotation(id)?;
        if delta == 0.0 {
            return None;
        }
        let placement = store.placement_mut(id)?;
        placement.rotation_degrees += delta;
        Some(placement.rotation_degrees)
    }

    /// Discards all uncommitted gesture state for the element.
    pub fn cancel(&mut self, id: ElementId) {
        self.active.retain(|entry| entry.id != id);
    }

    /// Discards every in-progress gesture, for view teardown.
    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    /// Tap semantics: select the element, or request text editing when the
    /// selected text block is tapped again. Unknown ids clear the selection.
    pub fn tap(&self, store: &mut SceneStore, id: ElementId) -> TapOutcome {
        let Some(kind) = store.kind_of(id) else {
            store.clear_selection();
            return TapOutcome::Ignored;
        };
        if store.selected() == Some(id) && kind == ElementKind::Text {
            return TapOutcome::EditRequested;
        }
        store.select(id);
        TapOutcome::Selected
    }

    /// Tap on empty canvas clears the selection.
    pub fn tap_background(&self, store: &mut SceneStore) {
        store.clear_selection();
    }

    /// Committed placement with live deltas composed on top.
    pub fn resolved(&self, store: &SceneStore, id: ElementId) -> Option<ResolvedTransform> {
        let placement = store.placement(id)?;
        let entry = self.entry(id);
        let drag = entry.and_then(|e| e.drag).unwrap_or(CanvasVec::ZERO);
        let pinch = entry.and_then(|e| e.pinch).unwrap_or(1.0);
        let rotation = entry.and_then(|e| e.rotation).unwrap_or(0.0);
        Some(ResolvedTransform {
            position: placement.position().offset_by(drag),
            scale: placement.scale * pinch,
            rotation_degrees: placement.rotation_degrees + rotation,
        })
    }

    /// True while any element is mid-drag; the delete zone is only visible
    /// then.
    pub fn drag_in_progress(&self) -> bool {
        self.active.iter().any(|entry| entry.drag.is_some())
    }

    /// True when the element's live position sits inside the delete zone
    /// during an active drag.
    pub fn over_delete_zone(&self, store: &SceneStore, id: ElementId) -> bool {
        let dragging = self
            .entry(id)
            .is_some_and(|entry| entry.drag.is_some());
        if !dragging {
            return false;
        }
        match self.resolved(store, id) {
            Some(resolved) => self.delete_zone.contains(resolved.position),
            None => false,
        }
    }

    fn entry(&self, id: ElementId) -> Option<&GestureEntry> {
        self.active.iter().find(|entry| entry.id == id)
    }

    fn entry_mut(&mut self, id: ElementId) -> Option<&mut GestureEntry> {
        self.active.iter_mut().find(|entry| entry.id == id)
    }

    fn entry_or_insert(&mut self, id: ElementId) -> &mut GestureEntry {
        if let Some(index) = self.active.iter().position(|entry| entry.id == id) {
            return &mut self.active[index];
        }
        self.active.push(GestureEntry::idle(id));
        let last = self.active.len() - 1;
        &mut self.active[last]
    }

    fn take_drag(&mut self, id: ElementId) -> Option<CanvasVec> {
        let index = self.active.iter().position(|entry| entry.id == id)?;
        let offset = self.active[index].drag.take()?;
        if self.active[index].is_idle() {
            self.active.remove(index);
        }
        Some(offset)
    }

    fn take_pinch(&mut self, id: ElementId) -> Option<f64> {
        let index = self.active.iter().position(|entry| entry.id == id)?;
        let factor = self.active[index].pinch.take()?;
        if self.active[index].is_idle() {
            self.active.remove(index);
        }
        Some(factor)
    }

    fn take_rotation(&mut self, id: ElementId) -> Option<f64> {
        let index = self.active.iter().position(|entry| entry.id == id)?;
        let delta = self.active[index].rotation.take()?;
        if self.active[index].is_idle() {
            self.active.remove(index);
        }
        Some(delta)
    }
}
