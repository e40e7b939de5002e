/// Pixel-space box reported by an engine for a recognized region.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct TextRegion {
    pub text: String,
    pub bounding_box: Option<BoundingBox>,
    pub confidence: Option<f32>,
}

/// Rectangle relative to card bounds; every component is expected in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grows the rectangle by `pad` on every side, clamped to the unit square.
    pub fn padded(&self, pad: f32) -> Self {
        let x = (self.x - pad).max(0.0);
        let y = (self.y - pad).max(0.0);
        let right = (self.x + self.width + pad).min(1.0);
        let bottom = (self.y + self.height + pad).min(1.0);
        Self {
            x,
            y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
        }
    }

    pub fn is_within_unit_square(&self) -> bool {
        let parts = [self.x, self.y, self.width, self.height];
        parts.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v))
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.0 + f32::EPSILON
            && self.y + self.height <= 1.0 + f32::EPSILON
    }
}
