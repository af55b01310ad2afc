//! Drawing surface abstraction.
//!
//! Provides a trait-based interface for the drawing primitives the fitter
//! needs, isolating the concrete PDF writer (lopdf) from layout logic.

use crate::error::{Error, Result};
use crate::model::{BBox, PageSize};
use crate::style::{Color, FontResource};

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Outline only
    Stroke,
    /// Interior only
    Fill,
    /// Interior and outline
    FillStroke,
}

/// A page surface accumulating drawing operations.
///
/// Coordinates are in points with the origin at the bottom-left corner.
/// Operations are buffered until the page is finished, so an element's
/// drawing can be discarded with [`Canvas::rollback`].
pub trait Canvas {
    /// Page dimensions.
    fn page_size(&self) -> PageSize;

    /// Mark the current end of the operation buffer.
    fn checkpoint(&self) -> usize;

    /// Discard every operation recorded after `checkpoint`.
    fn rollback(&mut self, checkpoint: usize);

    /// Number of buffered operations.
    fn op_count(&self) -> usize {
        self.checkpoint()
    }

    /// Push the graphics state.
    fn save_state(&mut self) -> Result<()>;

    /// Pop the graphics state.
    fn restore_state(&mut self) -> Result<()>;

    /// Set the color used for text and fills.
    fn set_fill_color(&mut self, color: Color) -> Result<()>;

    /// Set the color used for outlines.
    fn set_stroke_color(&mut self, color: Color) -> Result<()>;

    /// Set fill and stroke opacity in `[0, 1]`.
    fn set_alpha(&mut self, fill: f32, stroke: f32) -> Result<()>;

    /// Set the dash pattern; empty for solid lines.
    fn set_dash(&mut self, pattern: &[f32]) -> Result<()>;

    /// Set the outline width.
    fn set_line_width(&mut self, width: f32) -> Result<()>;

    /// Paint a rectangle given in page coordinates.
    fn rect(&mut self, rect: &BBox, paint: Paint) -> Result<()>;

    /// Draw one line of text with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, font: &FontResource, size: f32, x: f32, y: f32, text: &str)
        -> Result<()>;
}

/// Reject coordinates a PDF content stream cannot represent.
pub(crate) fn check_finite(what: &str, values: &[f32]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::Render(format!("non-finite {}: {:?}", what, values)))
    }
}
