//! Text styles, fonts and the label-to-style table.

mod font;
mod metrics;
mod table;

pub use font::{FontResource, StandardFont, TrueTypeFont};
pub use table::{StyleSheet, StyleTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color with components in `[0, 1]`.
///
/// Serialized as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Default text color
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Outline of a placed box
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    /// `#0000FF`
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    /// `#008000`
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    /// Outline of a skipped box
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    /// `#800080`
    pub const PURPLE: Color = Color::rgb(0.5, 0.0, 0.5);
    /// Outline of a box filled line by line
    pub const ORANGE: Color = Color::rgb(1.0, 0.647, 0.0);

    /// Create a color from components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", c(self.r), c(self.g), c(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color: {}", s))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment (last line left-aligned)
    Justify,
}

/// A named paragraph style.
///
/// Styles in a [`StyleTable`] are templates and are never mutated while
/// rendering; font-size adaptation derives new values with
/// [`Style::with_font_size`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Style name
    pub name: String,

    /// Font to draw with (not part of style sheets)
    #[serde(skip)]
    pub font: FontResource,

    /// Font size in points
    pub font_size: f32,

    /// Distance between baselines in points
    pub leading: f32,

    /// Text color
    #[serde(default)]
    pub color: Color,

    /// Horizontal alignment
    #[serde(default)]
    pub alignment: Alignment,

    /// Indentation of every line from the left edge
    #[serde(default)]
    pub left_indent: f32,

    /// Indentation of every line from the right edge
    #[serde(default)]
    pub right_indent: f32,

    /// Extra indentation of the first line
    #[serde(default)]
    pub first_line_indent: f32,

    /// Space before the paragraph.
    ///
    /// Carried through style sheets for callers that stack paragraphs.
    /// Each element fills its own box with a single paragraph, so the
    /// fitter never reads it.
    #[serde(default)]
    pub space_before: f32,

    /// Space after the paragraph. Not read by the fitter, see
    /// [`Style::space_before`].
    #[serde(default)]
    pub space_after: f32,
}

impl Style {
    /// Create a left-aligned black style.
    pub fn new(name: impl Into<String>, font: FontResource, font_size: f32, leading: f32) -> Self {
        Self {
            name: name.into(),
            font,
            font_size,
            leading,
            color: Color::BLACK,
            alignment: Alignment::Left,
            left_indent: 0.0,
            right_indent: 0.0,
            first_line_indent: 0.0,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the left indentation.
    pub fn with_left_indent(mut self, indent: f32) -> Self {
        self.left_indent = indent;
        self
    }

    /// Set the first-line indentation.
    pub fn with_first_line_indent(mut self, indent: f32) -> Self {
        self.first_line_indent = indent;
        self
    }

    /// Set paragraph spacing.
    pub fn with_spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    /// Set the font.
    pub fn with_font(mut self, font: FontResource) -> Self {
        self.font = font;
        self
    }

    /// Derive a copy at another font size with proportional leading.
    pub fn with_font_size(&self, font_size: f32, leading_ratio: f32) -> Style {
        Style {
            font_size,
            leading: font_size * leading_ratio,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::RED.to_hex(), "#FF0000");
        assert_eq!(Color::from_hex("#008000").unwrap().to_hex(), "#008000");
        assert_eq!(Color::from_hex("ffa500").unwrap().to_hex(), "#FFA500");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GG0000").is_none());
    }

    #[test]
    fn test_style_copy_on_adapt() {
        let template = Style::new("BodyText", FontResource::helvetica(), 5.0, 10.0)
            .with_alignment(Alignment::Justify);
        let adapted = template.with_font_size(4.5, 1.2);

        assert_eq!(template.font_size, 5.0);
        assert_eq!(template.leading, 10.0);
        assert_eq!(adapted.font_size, 4.5);
        assert!((adapted.leading - 5.4).abs() < 1e-5);
        assert_eq!(adapted.alignment, Alignment::Justify);
        assert_eq!(adapted.name, "BodyText");
    }

    #[test]
    fn test_style_json() {
        let style = Style::new("Footnote", FontResource::helvetica(), 4.0, 8.0)
            .with_color(Color::GREY);
        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains("\"color\":\"#808080\""));

        let parsed: Style =
            serde_json::from_str(r#"{"name":"X","font_size":6,"leading":7.2}"#).unwrap();
        assert_eq!(parsed.alignment, Alignment::Left);
        assert_eq!(parsed.color, Color::BLACK);
        assert_eq!(parsed.font, FontResource::helvetica());
    }
}
