//! Per-element placement results.

use serde::{Deserialize, Serialize};

/// How one layout element ended up on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// Text flowed as a paragraph inside its box.
    Placed {
        /// Font size the paragraph was committed at
        font_size: f32,
        /// Number of fitting attempts used
        attempts: u32,
    },

    /// Paragraph flow failed; lines were drawn directly and clipped.
    Fallback {
        /// Font size used for direct drawing
        font_size: f32,
        /// Number of fitting attempts used before falling back
        attempts: u32,
        /// Lines drawn inside the box
        lines_drawn: usize,
        /// Lines dropped for lack of vertical space
        lines_dropped: usize,
    },

    /// Nothing was drawn for the element.
    Skipped {
        /// Why the element was skipped
        reason: SkipReason,
    },
}

impl PlacementOutcome {
    /// Create a skipped outcome.
    pub fn skipped(reason: SkipReason) -> Self {
        PlacementOutcome::Skipped { reason }
    }

    /// Check if the element was flowed normally.
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed { .. })
    }

    /// Check if the element used direct line placement.
    pub fn is_fallback(&self) -> bool {
        matches!(self, PlacementOutcome::Fallback { .. })
    }

    /// Check if the element was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, PlacementOutcome::Skipped { .. })
    }

    /// Number of fitting attempts (0 for skipped elements).
    pub fn attempts(&self) -> u32 {
        match self {
            PlacementOutcome::Placed { attempts, .. }
            | PlacementOutcome::Fallback { attempts, .. } => *attempts,
            PlacementOutcome::Skipped { .. } => 0,
        }
    }

    /// Final font size, if any text was drawn.
    pub fn font_size(&self) -> Option<f32> {
        match self {
            PlacementOutcome::Placed { font_size, .. }
            | PlacementOutcome::Fallback { font_size, .. } => Some(*font_size),
            PlacementOutcome::Skipped { .. } => None,
        }
    }
}

/// Reason an element produced no text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Text was empty or whitespace only
    EmptyText,
    /// Box had zero or negative extent after scaling
    DegenerateBox,
    /// A drawing primitive failed; the element's drawing was discarded
    RenderError(String),
}
