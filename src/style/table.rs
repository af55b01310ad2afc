//! Label-to-style lookup.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Alignment, Color, FontResource, Style};
use crate::error::{Error, Result};
use crate::model::LayoutLabel;

/// Styles per layout label plus a default for labels without an entry.
///
/// Built once per rendering session and read-only while rendering.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: HashMap<LayoutLabel, Style>,
    default: Style,
    font: FontResource,
}

impl StyleTable {
    /// Create a table holding only a default style.
    pub fn new(default: Style) -> Self {
        let font = default.font.clone();
        Self {
            styles: HashMap::new(),
            default,
            font,
        }
    }

    /// The built-in table for detector labels, drawn with `font`.
    pub fn standard(font: FontResource) -> Self {
        let f = || font.clone();

        let body = Style::new("BodyText", f(), 5.0, 10.0).with_alignment(Alignment::Justify);
        let caption = Style::new("ImageCaption", f(), 4.0, 9.0)
            .with_alignment(Alignment::Center)
            .with_color(Color::GREEN);
        let page_margin = |name: &str| {
            Style::new(name, f(), 8.0, 8.0)
                .with_alignment(Alignment::Center)
                .with_color(Color::GREY)
        };

        let mut table = Self::new(body.clone());
        table.font = font.clone();
        table
            .set(
                LayoutLabel::Title,
                Style::new("DocHeading", f(), 9.0, 18.0)
                    .with_alignment(Alignment::Center)
                    .with_spacing(0.0, 6.0),
            )
            .set(
                LayoutLabel::Footnote,
                Style::new("Footnote", f(), 4.0, 8.0).with_color(Color::GREY),
            )
            .set(
                LayoutLabel::Formula,
                Style::new("Formula", f(), 5.0, 10.0)
                    .with_alignment(Alignment::Center)
                    .with_color(Color::BLUE),
            )
            .set(
                LayoutLabel::ListItem,
                Style::new("ListItem", f(), 5.0, 10.0).with_left_indent(20.0),
            )
            .set(LayoutLabel::PageFooter, page_margin("PageFooter"))
            .set(LayoutLabel::PageHeader, page_margin("PageHeader"))
            .set(LayoutLabel::Picture, caption.clone())
            .set(LayoutLabel::Caption, caption)
            .set(
                LayoutLabel::SectionHeader,
                Style::new("SectionHeading", f(), 7.0, 14.0)
                    .with_color(Color::PURPLE)
                    .with_spacing(12.0, 4.0),
            )
            .set(
                LayoutLabel::Table,
                Style::new("TableText", f(), 5.0, 10.0).with_color(Color::ORANGE),
            )
            .set(LayoutLabel::Text, body);
        table
    }

    /// Set the style for a label.
    pub fn set(&mut self, label: LayoutLabel, style: Style) -> &mut Self {
        self.styles.insert(label, style);
        self
    }

    /// Builder form of [`StyleTable::set`].
    pub fn with_style(mut self, label: LayoutLabel, style: Style) -> Self {
        self.set(label, style);
        self
    }

    /// Replace the default style.
    pub fn with_default(mut self, style: Style) -> Self {
        self.default = style;
        self
    }

    /// Font shared by the table's styles.
    pub fn font(&self) -> &FontResource {
        &self.font
    }

    /// Switch every style to another font.
    pub fn with_font(mut self, font: FontResource) -> Self {
        for style in self.styles.values_mut() {
            style.font = font.clone();
        }
        self.default.font = font.clone();
        self.font = font;
        self
    }

    /// Style registered for a label, without falling back.
    pub fn get(&self, label: &LayoutLabel) -> Option<&Style> {
        self.styles.get(label)
    }

    /// The default style.
    pub fn default_style(&self) -> &Style {
        &self.default
    }

    /// Number of labels with their own style.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no label has its own style.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style for a label, or the default style when the label has no entry.
    ///
    /// Never fails. Falling back logs a warning so unexpected labels can be
    /// audited.
    pub fn resolve(&self, label: &LayoutLabel) -> &Style {
        match self.styles.get(label) {
            Some(style) => style,
            None => {
                log::warn!(
                    "No style for label '{}', using default style '{}'",
                    label,
                    self.default.name
                );
                &self.default
            }
        }
    }

    /// Apply overrides from a style sheet.
    ///
    /// Sheet styles take this table's font. Keys must be known labels.
    pub fn apply_sheet(&mut self, sheet: StyleSheet) -> Result<()> {
        let mut parsed = Vec::with_capacity(sheet.styles.len());
        for (key, style) in sheet.styles {
            let label = LayoutLabel::parse(&key);
            if !label.is_recognized() {
                return Err(Error::Other(format!("Unknown label in style sheet: {}", key)));
            }
            parsed.push((label, style));
        }

        for (label, style) in parsed {
            self.styles.insert(label, style.with_font(self.font.clone()));
        }
        if let Some(default) = sheet.default {
            self.default = default.with_font(self.font.clone());
        }
        Ok(())
    }

    /// Export the table as a style sheet.
    pub fn to_sheet(&self) -> StyleSheet {
        StyleSheet {
            default: Some(self.default.clone()),
            styles: self
                .styles
                .iter()
                .map(|(label, style)| (label.to_string(), style.clone()))
                .collect(),
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::standard(FontResource::default())
    }
}

/// Serializable style overrides keyed by label name or id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Replacement default style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Style>,

    /// Styles by label
    #[serde(default)]
    pub styles: BTreeMap<String, Style>,
}

impl StyleSheet {
    /// Parse a style sheet from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a style sheet file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
