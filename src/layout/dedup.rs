//! Removal of layout regions subsumed by other regions.

use crate::error::{Error, Result};
use crate::model::{BBox, LabeledBox};

/// Indices of the boxes that are not contained in any other box.
///
/// Containment is checked against the full input, so a box that is itself
/// removed still removes the boxes it contains: for `A ⊂ B ⊂ C` only `C`
/// survives. Boxes with identical coordinates never remove each other, so an
/// exact duplicate keeps both copies. The result is sorted and never
/// reorders the input.
pub fn retained_indices(boxes: &[BBox], tolerance: f32) -> Vec<usize> {
    (0..boxes.len())
        .filter(|&i| {
            let inner = &boxes[i];
            !boxes.iter().enumerate().any(|(j, outer)| {
                j != i && !outer.same_coords(inner) && outer.contains(inner, tolerance)
            })
        })
        .collect()
}

/// Drops regions fully contained in another region of the same page.
///
/// Quadratic in the number of regions, which is bounded by what a layout
/// detector finds on one page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxDeduplicator {
    /// Slack allowed on every edge when testing containment
    pub tolerance: f32,
}

impl BoxDeduplicator {
    /// Create a deduplicator with exact (zero tolerance) containment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the containment tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Filter parallel box and label lists, keeping their alignment.
    pub fn filter<L: Clone>(&self, boxes: &[BBox], labels: &[L]) -> Result<(Vec<BBox>, Vec<L>)> {
        if boxes.len() != labels.len() {
            return Err(Error::length_mismatch(
                boxes.len(),
                boxes.len(),
                labels.len(),
            ));
        }

        let keep = retained_indices(boxes, self.tolerance);
        let kept_boxes = keep.iter().map(|&i| boxes[i]).collect();
        let kept_labels = keep.iter().map(|&i| labels[i].clone()).collect();

        let removed = boxes.len() - keep.len();
        if removed > 0 {
            log::debug!("Removed {} contained boxes of {}", removed, boxes.len());
        }
        Ok((kept_boxes, kept_labels))
    }

    /// Filter labeled regions.
    pub fn dedup(&self, regions: &[LabeledBox]) -> Vec<LabeledBox> {
        let boxes: Vec<BBox> = regions.iter().map(|r| r.bbox).collect();
        retained_indices(&boxes, self.tolerance)
            .into_iter()
            .map(|i| regions[i].clone())
            .collect()
    }
}

/// Filter parallel box and label lists with exact containment.
pub fn filter_contained<L: Clone>(boxes: &[BBox], labels: &[L]) -> Result<(Vec<BBox>, Vec<L>)> {
    BoxDeduplicator::new().filter(boxes, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayoutLabel;

    fn b(x0: f32, y0: f32, x1: f32, y1: f32) -> BBox {
        BBox::new(x0, y0, x1, y1)
    }

    #[test]
    fn test_empty_input() {
        let (boxes, labels) = filter_contained::<LayoutLabel>(&[], &[]).unwrap();
        assert!(boxes.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_strict_chain_keeps_outermost() {
        let boxes = [
            b(10.0, 10.0, 20.0, 20.0),
            b(5.0, 5.0, 30.0, 30.0),
            b(0.0, 0.0, 50.0, 50.0),
        ];
        assert_eq!(retained_indices(&boxes, 0.0), vec![2]);
    }

    #[test]
    fn test_removed_box_still_contains() {
        // B is removed by C but still removes A
        let boxes = [
            b(0.0, 0.0, 50.0, 50.0),
            b(5.0, 5.0, 30.0, 30.0),
            b(10.0, 10.0, 20.0, 20.0),
        ];
        assert_eq!(retained_indices(&boxes, 0.0), vec![0]);
    }

    #[test]
    fn test_exact_duplicates_survive() {
        let boxes = [
            b(0.0, 0.0, 50.0, 50.0),
            b(10.0, 10.0, 20.0, 20.0),
            b(0.0, 0.0, 50.0, 50.0),
        ];
        let labels = ["Text", "Text", "Title"];
        let (kept, kept_labels) = filter_contained(&boxes, &labels).unwrap();
        assert_eq!(kept, vec![boxes[0], boxes[2]]);
        assert_eq!(kept_labels, vec!["Text", "Title"]);
    }

    #[test]
    fn test_idempotent() {
        let boxes = [
            b(0.0, 0.0, 50.0, 50.0),
            b(10.0, 10.0, 20.0, 20.0),
            b(40.0, 40.0, 90.0, 90.0),
            b(45.0, 45.0, 60.0, 60.0),
            b(0.0, 0.0, 50.0, 50.0),
            b(30.0, 30.0, 10.0, 10.0),
        ];
        let labels: Vec<usize> = (0..boxes.len()).collect();
        let (once, once_labels) = filter_contained(&boxes, &labels).unwrap();
        let (twice, twice_labels) = filter_contained(&once, &once_labels).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once_labels, twice_labels);
    }

    #[test]
    fn test_preserves_order_and_degenerate_boxes() {
        let boxes = [
            b(60.0, 0.0, 90.0, 10.0),
            b(30.0, 30.0, 10.0, 10.0),
            b(0.0, 0.0, 50.0, 50.0),
        ];
        assert_eq!(retained_indices(&boxes, 0.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_tolerance() {
        let boxes = [b(0.0, 0.0, 50.0, 50.0), b(-0.5, 10.0, 20.0, 20.0)];
        assert_eq!(retained_indices(&boxes, 0.0), vec![0, 1]);
        let dedup = BoxDeduplicator::new().with_tolerance(1.0);
        let (kept, _) = dedup.filter(&boxes, &[0, 1]).unwrap();
        assert_eq!(kept, vec![boxes[0]]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = filter_contained(&[b(0.0, 0.0, 1.0, 1.0)], &[1, 2]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn test_dedup_labeled() {
        let regions = vec![
            LabeledBox::new(b(0.0, 0.0, 100.0, 100.0), "Table"),
            LabeledBox::new(b(10.0, 10.0, 40.0, 20.0), "Text"),
            LabeledBox::new(b(0.0, 110.0, 100.0, 130.0), "Caption"),
        ];
        let kept = BoxDeduplicator::new().dedup(&regions);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].label, LayoutLabel::Table);
        assert_eq!(kept[1].label, LayoutLabel::Caption);
    }
}
