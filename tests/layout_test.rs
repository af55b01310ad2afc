//! Integration tests for region deduplication, coordinate mapping and layout input.

use repdf::{
    filter_contained, BBox, BoxDeduplicator, CoordinateMapper, Detections, Error, LabeledBox,
    LayoutLabel, LayoutPage, PageSize,
};

#[test]
fn test_dedup_keeps_identical_boxes() {
    let boxes = vec![
        BBox::new(0.0, 0.0, 50.0, 50.0),
        BBox::new(10.0, 10.0, 20.0, 20.0),
        BBox::new(0.0, 0.0, 50.0, 50.0),
    ];
    let labels = vec![LayoutLabel::Text, LayoutLabel::Text, LayoutLabel::Title];

    let (kept_boxes, kept_labels) = filter_contained(&boxes, &labels).unwrap();

    assert_eq!(kept_boxes, vec![boxes[0], boxes[2]]);
    assert_eq!(kept_labels, vec![LayoutLabel::Text, LayoutLabel::Title]);
}

#[test]
fn test_dedup_nested_chain_keeps_outermost() {
    let a = BBox::new(20.0, 20.0, 30.0, 30.0);
    let b = BBox::new(10.0, 10.0, 40.0, 40.0);
    let c = BBox::new(0.0, 0.0, 50.0, 50.0);

    let (kept, labels) = filter_contained(&[a, b, c], &["a", "b", "c"]).unwrap();

    assert_eq!(kept, vec![c]);
    assert_eq!(labels, vec!["c"]);
}

#[test]
fn test_dedup_is_idempotent() {
    let boxes = vec![
        BBox::new(0.0, 0.0, 100.0, 40.0),
        BBox::new(5.0, 5.0, 60.0, 30.0),
        BBox::new(0.0, 50.0, 100.0, 90.0),
        BBox::new(90.0, 80.0, 120.0, 95.0),
    ];
    let labels: Vec<usize> = (0..boxes.len()).collect();

    let (once_boxes, once_labels) = filter_contained(&boxes, &labels).unwrap();
    let (twice_boxes, twice_labels) = filter_contained(&once_boxes, &once_labels).unwrap();

    assert_eq!(once_labels, vec![0, 2, 3]);
    assert_eq!(once_boxes, twice_boxes);
    assert_eq!(once_labels, twice_labels);
}

#[test]
fn test_dedup_tolerance_widens_containment() {
    let outer = BBox::new(0.0, 0.0, 50.0, 50.0);
    let overhanging = BBox::new(10.0, 10.0, 51.0, 20.0);

    let exact = BoxDeduplicator::new()
        .filter(&[outer, overhanging], &[1, 2])
        .unwrap();
    assert_eq!(exact.1, vec![1, 2]);

    let loose = BoxDeduplicator::new()
        .with_tolerance(2.0)
        .filter(&[outer, overhanging], &[1, 2])
        .unwrap();
    assert_eq!(loose.1, vec![1]);
}

#[test]
fn test_dedup_length_mismatch() {
    let result = filter_contained(&[BBox::new(0.0, 0.0, 1.0, 1.0)], &[1, 2]);
    assert!(matches!(result, Err(Error::LengthMismatch { .. })));
}

#[test]
fn test_detections_round_trip_through_dedup() {
    let detections: Detections = serde_json::from_str(
        r#"{"boxes": [[0, 0, 50, 50], [10, 10, 20, 20]], "labels": ["Text", 9]}"#,
    )
    .unwrap();

    let regions = detections.into_labeled().unwrap();
    let kept = BoxDeduplicator::new().dedup(&regions);

    assert_eq!(
        kept,
        vec![LabeledBox::new(BBox::new(0.0, 0.0, 50.0, 50.0), LayoutLabel::Text)]
    );
}

#[test]
fn test_mapper_flips_vertical_axis() {
    let page = PageSize::new(100.0, 100.0);
    let mapper = CoordinateMapper::new(page, page).unwrap();

    assert_eq!(
        mapper.map(&BBox::new(0.0, 0.0, 10.0, 20.0)),
        BBox::new(0.0, 80.0, 10.0, 100.0)
    );
}

#[test]
fn test_mapper_scales_to_target() {
    let mapper =
        CoordinateMapper::new(PageSize::new(600.0, 800.0), PageSize::new(595.0, 842.0)).unwrap();
    let mapped = mapper.map(&BBox::new(10.0, 10.0, 200.0, 40.0));

    assert!((mapped.xmin - 10.0 * 595.0 / 600.0).abs() < 1e-3);
    assert!((mapped.ymin - (842.0 - 40.0 * 842.0 / 800.0)).abs() < 1e-3);
    assert!((mapped.width() - 190.0 * 595.0 / 600.0).abs() < 1e-3);
}

#[test]
fn test_mapper_rejects_invalid_pages() {
    assert!(matches!(
        CoordinateMapper::new(PageSize::new(0.0, 100.0), PageSize::A4),
        Err(Error::InvalidPageSize { .. })
    ));
    assert!(CoordinateMapper::new(PageSize::A4, PageSize::new(100.0, f32::NAN)).is_err());
}

#[test]
fn test_layout_page_from_parallel_lists() {
    let page = LayoutPage::from_json(
        r#"{
            "page_size": [600, 800],
            "texts": ["Heading", "Body"],
            "boxes": [[10, 10, 590, 60], [10, 80, 590, 200]],
            "labels": [10, "Text"]
        }"#,
    )
    .unwrap();

    assert_eq!(page.source_size, PageSize::new(600.0, 800.0));
    assert_eq!(page.len(), 2);
    assert_eq!(page.elements[0].label, LayoutLabel::Title);
    assert_eq!(page.elements[1].label, LayoutLabel::Text);
}

#[test]
fn test_layout_page_rejects_misaligned_lists() {
    let result = LayoutPage::from_json(
        r#"{"source_size": [600, 800], "texts": ["a"], "boxes": [], "labels": []}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_layout_file_and_page_dedup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    std::fs::write(
        &path,
        r#"{
            "source_size": [100, 100],
            "elements": [
                {"text": "outer", "box": [0, 0, 90, 90], "label": "Text"},
                {"text": "inner", "box": [10, 10, 20, 20], "label": "Caption"},
                {"text": "other", "box": [91, 91, 99, 99], "label": "Footnote"}
            ]
        }"#,
    )
    .unwrap();

    let mut page = repdf::load_layout(&path).unwrap();
    assert_eq!(page.dedup(), 1);
    assert_eq!(page.texts(), vec!["outer".to_string(), "other".to_string()]);
}
