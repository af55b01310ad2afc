//! Source-page to target-page coordinate mapping.

use crate::error::Result;
use crate::model::{BBox, PageSize};

/// Maps boxes from a top-left-origin source page onto a bottom-left-origin
/// target page with independent horizontal and vertical scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    source: PageSize,
    target: PageSize,
    scale_x: f32,
    scale_y: f32,
}

impl CoordinateMapper {
    /// Create a mapper. Both page sizes must be positive.
    pub fn new(source: PageSize, target: PageSize) -> Result<Self> {
        let source = source.validated()?;
        let target = target.validated()?;
        Ok(Self {
            source,
            target,
            scale_x: target.width / source.width,
            scale_y: target.height / source.height,
        })
    }

    /// Horizontal and vertical scale factors.
    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    /// Source page size.
    pub fn source(&self) -> PageSize {
        self.source
    }

    /// Target page size.
    pub fn target(&self) -> PageSize {
        self.target
    }

    /// Map a source box to target space.
    ///
    /// The vertical origin flips: the source bottom edge `ymax` becomes the
    /// target bottom edge `h1 - ymax * sy`. Width and height scale from the
    /// source extents, so an inverted source box stays inverted.
    pub fn map(&self, bbox: &BBox) -> BBox {
        let x = bbox.xmin * self.scale_x;
        let y = self.target.height - bbox.ymax * self.scale_y;
        let width = bbox.width() * self.scale_x;
        let height = bbox.height() * self.scale_y;
        BBox::from_origin_size(x, y, width, height)
    }
}
