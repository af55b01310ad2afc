//! Region bookkeeping between detection and rendering.
//!
//! [`BoxDeduplicator`] runs on detector output before text exists;
//! [`CoordinateMapper`] moves regions from the analysed image onto the
//! output page.

mod dedup;
mod mapper;

pub use dedup::{filter_contained, retained_indices, BoxDeduplicator};
pub use mapper::CoordinateMapper;
