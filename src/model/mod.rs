//! Data model for page reconstruction.
//!
//! Detector output ([`LabeledBox`], [`Detections`]) and the elements the
//! renderer consumes ([`LayoutElement`], [`LayoutPage`]) are plain data; the
//! geometry on [`BBox`] is pure and never fails.

mod geometry;
mod label;
mod outcome;
mod page;

pub use geometry::BBox;
pub use label::{LabelToken, LayoutLabel};
pub use outcome::{PlacementOutcome, SkipReason};
pub use page::{Detections, LabeledBox, LayoutElement, LayoutPage, PageSize};
