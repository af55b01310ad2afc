//! Axis-aligned box geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its min/max corners.
///
/// Serialized as `[xmin, ymin, xmax, ymax]`, the shape layout detectors emit.
/// A box whose max corner lies before its min corner is *degenerate*: it has
/// zero area, never contains anything and is never contained.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub xmin: f32,
    /// Top edge in image space, bottom edge in PDF space
    pub ymin: f32,
    /// Right edge
    pub xmax: f32,
    /// Bottom edge in image space, top edge in PDF space
    pub ymax: f32,
}

impl BBox {
    /// Create a box from its corners.
    pub const fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Create a box from an origin and a size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Signed width (negative for an inverted box).
    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    /// Signed height (negative for an inverted box).
    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    /// Check that all coordinates are finite and the corners are ordered.
    pub fn is_valid(&self) -> bool {
        self.xmin.is_finite()
            && self.ymin.is_finite()
            && self.xmax.is_finite()
            && self.ymax.is_finite()
            && self.xmin <= self.xmax
            && self.ymin <= self.ymax
    }

    /// Box area, `0.0` for degenerate or zero-extent boxes.
    pub fn area(&self) -> f32 {
        if !self.is_valid() || self.xmin >= self.xmax || self.ymin >= self.ymax {
            return 0.0;
        }
        self.width() * self.height()
    }

    /// Area of the overlap with `other`.
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        if !self.is_valid() || !other.is_valid() {
            return 0.0;
        }
        let w = self.xmax.min(other.xmax) - self.xmin.max(other.xmin);
        let h = self.ymax.min(other.ymax) - self.ymin.max(other.ymin);
        w.max(0.0) * h.max(0.0)
    }

    /// Intersection over union in `[0, 1]`.
    ///
    /// Returns `0.0` when the union is empty instead of dividing by zero.
    pub fn iou(&self, other: &BBox) -> f32 {
        let inter = self.intersection_area(other);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            return 0.0;
        }
        (inter / union).clamp(0.0, 1.0)
    }

    /// Check whether `inner` lies within this box grown by `tolerance` on every side.
    ///
    /// Containment is non-strict: a box contains an identical copy of itself.
    pub fn contains(&self, inner: &BBox, tolerance: f32) -> bool {
        if !self.is_valid() || !inner.is_valid() {
            return false;
        }
        self.xmin - tolerance <= inner.xmin
            && self.ymin - tolerance <= inner.ymin
            && self.xmax + tolerance >= inner.xmax
            && self.ymax + tolerance >= inner.ymax
    }

    /// Check whether this box lies within `outer` (see [`BBox::contains`]).
    pub fn is_inside(&self, outer: &BBox, tolerance: f32) -> bool {
        outer.contains(self, tolerance)
    }

    /// Check for identical coordinates.
    pub fn same_coords(&self, other: &BBox) -> bool {
        self.xmin == other.xmin
            && self.ymin == other.ymin
            && self.xmax == other.xmax
            && self.ymax == other.ymax
    }

    /// Shrink the box by `amount` on all four sides.
    ///
    /// The result may be inverted when the box is smaller than `2 * amount`.
    pub fn inset(&self, amount: f32) -> BBox {
        BBox::new(
            self.xmin + amount,
            self.ymin + amount,
            self.xmax - amount,
            self.ymax - amount,
        )
    }

    /// Coordinates as an array.
    pub fn to_array(&self) -> [f32; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl From<[f32; 4]> for BBox {
    fn from(c: [f32; 4]) -> Self {
        BBox::new(c[0], c[1], c[2], c[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        b.to_array()
    }
}
