use crate::geometry::{CanvasPoint, CanvasRect};

/// Circular drop target near the bottom edge that deletes an element released
/// inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteZone {
    pub anchor: CanvasPoint,
    pub radius: f64,
}

impl DeleteZone {
    /// Zone anchored on the canvas horizontal midline, a fixed offset above
    /// the bottom edge.
    pub fn for_canvas(canvas: CanvasRect) -> Self {
        Self {
            anchor: CanvasPoint::new(canvas.width / 2.0, canvas.height - BOTTOM_OFFSET),
            radius: RADIUS,
        }
    }

    /// True when the live element center is strictly inside the zone.
    pub fn contains(&self, position: CanvasPoint) -> bool {
        position.distance_to(self.anchor) < self.radius
    }
}

const BOTTOM_OFFSET: f64 = 100.0;
const RADIUS: f64 = 60.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_sits_centered_above_the_bottom_edge() {
        let zone = DeleteZone::for_canvas(CanvasRect::new(390.0, 700.0));
        assert_eq!(zone.anchor, CanvasPoint::new(195.0, 600.0));
        assert_eq!(zone.radius, 60.0);
    }

    #[test]
    fn containment_is_a_strict_euclidean_test() {
        let zone = DeleteZone::for_canvas(CanvasRect::new(390.0, 700.0));

        assert!(zone.contains(CanvasPoint::new(195.0, 600.0)));
        assert!(zone.contains(CanvasPoint::new(195.0, 541.0)));
        assert!(zone.contains(CanvasPoint::new(230.0, 560.0)));

        // Exactly on the rim counts as outside.
        assert!(!zone.contains(CanvasPoint::new(195.0, 540.0)));
        assert!(!zone.contains(CanvasPoint::new(195.0, 100.0)));
        assert!(!zone.contains(CanvasPoint::new(60.0, 620.0)));
    }
}
