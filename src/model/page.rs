//! Page-level types: page sizes, layout elements and pages.

use super::{BBox, LayoutLabel};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page dimensions in points (1 point = 1/72 inch) or pixels for source images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct PageSize {
    /// Page width
    pub width: f32,

    /// Page height
    pub height: f32,
}

impl PageSize {
    /// ISO A4 (210 x 297 mm).
    pub const A4: PageSize = PageSize::new(595.0, 842.0);

    /// US Letter (8.5 x 11 inches).
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);

    /// Create a page size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check that both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Return `self` if valid, otherwise an [`Error::InvalidPageSize`].
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidPageSize {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Parse a page size (`"a4"`, `"letter"`, `"595x842"`).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "a4" => return Ok(PageSize::A4),
            "letter" => return Ok(PageSize::LETTER),
            _ => {}
        }

        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::Other(format!("Invalid page size: {}", s)))?;
        let width: f32 = w
            .trim()
            .parse()
            .map_err(|_| Error::Other(format!("Invalid page width: {}", w)))?;
        let height: f32 = h
            .trim()
            .parse()
            .map_err(|_| Error::Other(format!("Invalid page height: {}", h)))?;
        PageSize::new(width, height).validated()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl From<(f32, f32)> for PageSize {
    fn from((width, height): (f32, f32)) -> Self {
        PageSize::new(width, height)
    }
}

impl From<PageSize> for (f32, f32) {
    fn from(size: PageSize) -> Self {
        (size.width, size.height)
    }
}

impl FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PageSize::parse(s)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A detected region with its label, before any text is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBox {
    /// Region in source-page coordinates
    #[serde(rename = "box")]
    pub bbox: BBox,

    /// Region category
    pub label: LayoutLabel,
}

impl LabeledBox {
    /// Create a labeled box.
    pub fn new(bbox: BBox, label: impl Into<LayoutLabel>) -> Self {
        Self {
            bbox,
            label: label.into(),
        }
    }
}

/// Detector output for one page: parallel box and label lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detections {
    /// Regions in source-page coordinates
    pub boxes: Vec<BBox>,

    /// Label per region
    pub labels: Vec<LayoutLabel>,
}

impl Detections {
    /// Zip boxes and labels, failing if their lengths differ.
    pub fn into_labeled(self) -> Result<Vec<LabeledBox>> {
        if self.boxes.len() != self.labels.len() {
            return Err(Error::length_mismatch(
                self.boxes.len(),
                self.boxes.len(),
                self.labels.len(),
            ));
        }
        Ok(self
            .boxes
            .into_iter()
            .zip(self.labels)
            .map(|(bbox, label)| LabeledBox { bbox, label })
            .collect())
    }
}

/// A text string bound to a region: the unit the renderer places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Text to place
    pub text: String,

    /// Region in source-page coordinates
    #[serde(rename = "box")]
    pub bbox: BBox,

    /// Region category, selects the style
    pub label: LayoutLabel,
}

impl LayoutElement {
    /// Create a layout element.
    pub fn new(text: impl Into<String>, bbox: BBox, label: impl Into<LayoutLabel>) -> Self {
        Self {
            text: text.into(),
            bbox,
            label: label.into(),
        }
    }

    /// Check if the text has nothing to draw.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// All elements of one source page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutPage")]
pub struct LayoutPage {
    /// Size of the analysed source page (image pixels or points)
    pub source_size: PageSize,

    /// Elements in drawing order
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Create an empty page.
    pub fn new(source_size: PageSize) -> Self {
        Self {
            source_size,
            elements: Vec::new(),
        }
    }

    /// Build a page from index-aligned text, box and label lists.
    pub fn from_parts(
        source_size: PageSize,
        texts: Vec<String>,
        boxes: Vec<BBox>,
        labels: Vec<LayoutLabel>,
    ) -> Result<Self> {
        if texts.len() != boxes.len() || boxes.len() != labels.len() {
            return Err(Error::length_mismatch(texts.len(), boxes.len(), labels.len()));
        }
        let elements = texts
            .into_iter()
            .zip(boxes)
            .zip(labels)
            .map(|((text, bbox), label)| LayoutElement { text, bbox, label })
            .collect();
        Ok(Self {
            source_size,
            elements,
        })
    }

    /// Attach texts to detected regions.
    pub fn from_detections(
        source_size: PageSize,
        regions: Vec<LabeledBox>,
        texts: Vec<String>,
    ) -> Result<Self> {
        if regions.len() != texts.len() {
            return Err(Error::length_mismatch(
                texts.len(),
                regions.len(),
                regions.len(),
            ));
        }
        let elements = regions
            .into_iter()
            .zip(texts)
            .map(|(region, text)| LayoutElement {
                text,
                bbox: region.bbox,
                label: region.label,
            })
            .collect();
        Ok(Self {
            source_size,
            elements,
        })
    }

    /// Add an element at the end of the drawing order.
    pub fn push(&mut self, element: LayoutElement) {
        self.elements.push(element);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Texts in element order.
    pub fn texts(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.text.clone()).collect()
    }

    /// Replace every text with the output of a one-to-one text stage
    /// (sanitizer, rephraser). Fails without modifying the page when the
    /// stage returned a different number of strings.
    pub fn replace_texts(&mut self, texts: Vec<String>) -> Result<()> {
        if texts.len() != self.elements.len() {
            return Err(Error::length_mismatch(
                texts.len(),
                self.elements.len(),
                self.elements.len(),
            ));
        }
        for (element, text) in self.elements.iter_mut().zip(texts) {
            element.text = text;
        }
        Ok(())
    }

    /// Drop elements whose region is contained in another region.
    ///
    /// Returns the number of removed elements.
    pub fn dedup(&mut self) -> usize {
        let boxes: Vec<BBox> = self.elements.iter().map(|e| e.bbox).collect();
        let keep = crate::layout::retained_indices(&boxes, 0.0);
        let before = self.elements.len();
        let mut index = 0;
        self.elements.retain(|_| {
            let kept = keep.binary_search(&index).is_ok();
            index += 1;
            kept
        });
        before - self.elements.len()
    }

    /// Parse a page from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Wire form of [`LayoutPage`]: either an `elements` list or parallel
/// `texts` / `boxes` / `labels` lists.
#[derive(Debug, Deserialize)]
struct RawLayoutPage {
    #[serde(alias = "page_size")]
    source_size: PageSize,
    #[serde(default)]
    elements: Vec<LayoutElement>,
    #[serde(default)]
    texts: Vec<String>,
    #[serde(default)]
    boxes: Vec<BBox>,
    #[serde(default)]
    labels: Vec<LayoutLabel>,
}

impl TryFrom<RawLayoutPage> for LayoutPage {
    type Error = Error;

    fn try_from(raw: RawLayoutPage) -> Result<Self> {
        let mut page = LayoutPage::from_parts(raw.source_size, raw.texts, raw.boxes, raw.labels)?;
        if !raw.elements.is_empty() {
            let mut elements = raw.elements;
            elements.append(&mut page.elements);
            page.elements = elements;
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_presets() {
        assert_eq!(PageSize::A4, PageSize::new(595.0, 842.0));
        assert!(!PageSize::LETTER.is_landscape());
        assert!(PageSize::new(842.0, 595.0).is_landscape());
    }

    #[test]
    fn test_page_size_parse() {
        assert_eq!(PageSize::parse("A4").unwrap(), PageSize::A4);
        assert_eq!(PageSize::parse("letter").unwrap(), PageSize::LETTER);
        assert_eq!(
            PageSize::parse("600x800").unwrap(),
            PageSize::new(600.0, 800.0)
        );
        assert!(PageSize::parse("0x800").is_err());
        assert!(PageSize::parse("tabloid").is_err());
    }

    #[test]
    fn test_page_size_validated() {
        assert!(PageSize::new(1.0, 1.0).validated().is_ok());
        let err = PageSize::new(-5.0, 10.0).validated().unwrap_err();
        assert!(matches!(err, Error::InvalidPageSize { .. }));
        assert!(PageSize::new(f32::INFINITY, 10.0).validated().is_err());
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let err = LayoutPage::from_parts(
            PageSize::A4,
            vec!["a".into(), "b".into()],
            vec![BBox::new(0.0, 0.0, 1.0, 1.0)],
            vec![LayoutLabel::Text, LayoutLabel::Text],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                texts: 2,
                boxes: 1,
                labels: 2
            }
        ));
    }

    #[test]
    fn test_replace_texts() {
        let mut page = LayoutPage::new(PageSize::A4);
        page.push(LayoutElement::new(
            "Иван Петров",
            BBox::new(0.0, 0.0, 10.0, 10.0),
            "Text",
        ));
        assert!(page.replace_texts(vec![]).is_err());
        assert_eq!(page.elements[0].text, "Иван Петров");

        page.replace_texts(vec!["[ИМЯ]".to_string()]).unwrap();
        assert_eq!(page.texts(), vec!["[ИМЯ]".to_string()]);
    }

    #[test]
    fn test_layout_page_json_elements() {
        let json = r#"{
            "source_size": [600, 800],
            "elements": [
                {"text": "Обычный текст документа", "box": [10, 10, 200, 40], "label": "9"}
            ]
        }"#;
        let page = LayoutPage::from_json(json).unwrap();
        assert_eq!(page.source_size, PageSize::new(600.0, 800.0));
        assert_eq!(page.elements[0].label, LayoutLabel::Text);
    }

    #[test]
    fn test_layout_page_json_parallel_lists() {
        let json = r#"{
            "page_size": [100, 100],
            "texts": ["a", "b"],
            "boxes": [[0, 0, 10, 10], [10, 10, 20, 20]],
            "labels": [10, "Text"]
        }"#;
        let page = LayoutPage::from_json(json).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.elements[0].label, LayoutLabel::Title);

        let bad = r#"{"page_size": [100, 100], "texts": ["a"], "boxes": [], "labels": []}"#;
        assert!(LayoutPage::from_json(bad).is_err());
    }

    #[test]
    fn test_dedup_drops_contained_elements() {
        let mut page = LayoutPage::new(PageSize::new(100.0, 100.0));
        page.push(LayoutElement::new("outer", BBox::new(0.0, 0.0, 50.0, 50.0), "Text"));
        page.push(LayoutElement::new("inner", BBox::new(10.0, 10.0, 20.0, 20.0), "Text"));
        page.push(LayoutElement::new("apart", BBox::new(60.0, 60.0, 90.0, 90.0), "Title"));

        assert_eq!(page.dedup(), 1);
        let texts = page.texts();
        assert_eq!(texts, vec!["outer".to_string(), "apart".to_string()]);
    }

    #[test]
    fn test_detections_into_labeled() {
        let det = Detections {
            boxes: vec![BBox::new(0.0, 0.0, 1.0, 1.0)],
            labels: vec![],
        };
        assert!(det.into_labeled().is_err());
    }
}
