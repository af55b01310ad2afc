//! Rendering result with per-element outcomes and statistics.

use serde::{Deserialize, Serialize};

use crate::model::{BBox, LayoutLabel, PageSize, PlacementOutcome, SkipReason};

/// What happened to one input element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementReport {
    /// Position in the input lists
    pub index: usize,

    /// Label of the element
    pub label: LayoutLabel,

    /// Name of the style it resolved to
    pub style: String,

    /// Box on the output page (bottom-left origin)
    pub target: BBox,

    /// Placement result
    pub outcome: PlacementOutcome,
}

/// Result of rendering one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    /// Output page size
    pub page_size: PageSize,

    /// One entry per input element, in input order
    pub elements: Vec<ElementReport>,

    /// Aggregated counts
    pub stats: RenderStats,

    /// Size of the written document in bytes
    pub bytes_written: usize,
}

impl RenderReport {
    /// Create a report, computing statistics from the element outcomes.
    pub fn new(page_size: PageSize, elements: Vec<ElementReport>, bytes_written: usize) -> Self {
        let mut stats = RenderStats::new();
        for element in &elements {
            stats.record(&element.outcome);
        }
        Self {
            page_size,
            elements,
            stats,
            bytes_written,
        }
    }

    /// Outcomes in input order.
    pub fn outcomes(&self) -> Vec<&PlacementOutcome> {
        self.elements.iter().map(|e| &e.outcome).collect()
    }
}

/// Counts of placement outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of input elements
    pub elements: u32,

    /// Elements flowed as paragraphs
    pub placed: u32,

    /// Elements placed line by line
    pub fallback: u32,

    /// Elements skipped for empty text
    pub empty: u32,

    /// Elements skipped for a box without area
    pub degenerate: u32,

    /// Elements abandoned after a drawing error
    pub errors: u32,

    /// Fitting attempts over all elements
    pub attempts: u32,

    /// Elements placed below their style's font size
    pub shrunk: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome.
    pub fn record(&mut self, outcome: &PlacementOutcome) {
        self.elements += 1;
        self.attempts += outcome.attempts();
        match outcome {
            PlacementOutcome::Placed { attempts, .. } => {
                self.placed += 1;
                if *attempts > 1 {
                    self.shrunk += 1;
                }
            }
            PlacementOutcome::Fallback { .. } => {
                self.fallback += 1;
                self.shrunk += 1;
            }
            PlacementOutcome::Skipped { reason } => match reason {
                SkipReason::EmptyText => self.empty += 1,
                SkipReason::DegenerateBox => self.degenerate += 1,
                SkipReason::RenderError(_) => self.errors += 1,
            },
        }
    }

    /// Elements that produced no text.
    pub fn skipped(&self) -> u32 {
        self.empty + self.degenerate + self.errors
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.elements += other.elements;
        self.placed += other.placed;
        self.fallback += other.fallback;
        self.empty += other.empty;
        self.degenerate += other.degenerate;
        self.errors += other.errors;
        self.attempts += other.attempts;
        self.shrunk += other.shrunk;
    }
}
