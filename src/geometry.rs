//! Geometric primitives in canvas space. The origin is the canvas top-left
//! corner and element positions refer to element centers.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, offset: CanvasVec) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }

    pub fn distance_to(self, other: CanvasPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Displacement between two canvas points, used for live drag offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasVec {
    pub dx: f64,
    pub dy: f64,
}

impl CanvasVec {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// The fixed composition surface for one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    /// Portrait phone canvas used when the host has not measured its surface.
    pub const FALLBACK: Self = Self::new(390.0, 860.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> CanvasPoint {
        CanvasPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Point on the horizontal midline at the given height fraction.
    pub fn midline_point(self, y_fraction: f64) -> CanvasPoint {
        CanvasPoint::new(self.width / 2.0, self.height * y_fraction)
    }

    /// Clamps componentwise into `[0, width] x [0, height]`.
    pub fn clamp_point(self, point: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }

    pub fn contains(self, point: CanvasPoint) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}
