//! Font resources used for measuring and drawing text.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::{Font, FontVec, GlyphId};

use super::metrics::{courier_width, helvetica_width, winansi_byte};
use crate::error::{Error, Result};

/// Replacement drawn for characters a standard font cannot encode.
const REPLACEMENT: char = '?';

/// One of the PDF base-14 fonts, usable without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Helvetica (proportional sans-serif)
    Helvetica,
    /// Courier (monospaced)
    Courier,
}

impl StandardFont {
    /// PostScript name used as `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::Courier => "Courier",
        }
    }

    /// Advance width in 1/1000 em, measured as the glyph actually drawn.
    pub fn char_width(&self, c: char) -> f32 {
        let c = if winansi_byte(c).is_some() {
            c
        } else {
            REPLACEMENT
        };
        let w = match self {
            StandardFont::Helvetica => helvetica_width(c),
            StandardFont::Courier => courier_width(c),
        };
        f32::from(w)
    }

    /// Encode text in WinAnsiEncoding, substituting `?` for unsupported characters.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| winansi_byte(c).unwrap_or(REPLACEMENT as u8))
            .collect()
    }
}

/// A TrueType/OpenType font loaded from disk for embedding.
pub struct TrueTypeFont {
    name: String,
    data: Vec<u8>,
    font: FontVec,
    units_per_em: f32,
}

impl TrueTypeFont {
    /// Parse font bytes. `name` becomes the PDF `/BaseFont`.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data.clone())
            .map_err(|e| Error::FontLoad(format!("invalid font data: {}", e)))?;
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let name: String = name
            .into()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        let name = if name.is_empty() {
            "EmbeddedFont".to_string()
        } else {
            name
        };

        Ok(Self {
            name,
            data,
            font,
            units_per_em,
        })
    }

    /// Load a font file; the file stem becomes the font name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::FontLoad(format!("{}: {}", path.display(), e)))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_bytes(stem, data)
    }

    /// Font name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font program.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph index for a character (0 = `.notdef`).
    pub fn glyph_id(&self, c: char) -> u16 {
        self.font.glyph_id(c).0
    }

    /// Advance width of a glyph in 1/1000 em.
    pub fn glyph_width(&self, gid: u16) -> f32 {
        self.font.h_advance_unscaled(GlyphId(gid)) * 1000.0 / self.units_per_em
    }

    /// Ascender in 1/1000 em.
    pub fn ascent(&self) -> f32 {
        self.font.ascent_unscaled() * 1000.0 / self.units_per_em
    }

    /// Descender in 1/1000 em (negative).
    pub fn descent(&self) -> f32 {
        self.font.descent_unscaled() * 1000.0 / self.units_per_em
    }
}

impl fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

/// The font a page draws with.
///
/// Passed explicitly into styles and canvases; there is no process-wide
/// registered font. Cloning is cheap.
#[derive(Debug, Clone)]
pub enum FontResource {
    /// Base-14 font, not embedded
    Standard(StandardFont),
    /// Embedded TrueType font
    TrueType(Arc<TrueTypeFont>),
}

impl FontResource {
    /// Helvetica, the fallback font.
    pub fn helvetica() -> Self {
        FontResource::Standard(StandardFont::Helvetica)
    }

    /// Load an embeddable font file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(FontResource::TrueType(Arc::new(TrueTypeFont::load(path)?)))
    }

    /// Load a font file, falling back to Helvetica when it is missing or invalid.
    ///
    /// Helvetica has no Cyrillic or CJK glyphs; such text is drawn as `?`.
    pub fn load_or_fallback<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(font) => {
                log::info!("Loaded font '{}' from {}", font.name(), path.display());
                font
            }
            Err(e) => {
                log::warn!(
                    "{}; falling back to {}, non-Latin text may not render",
                    e,
                    StandardFont::Helvetica.base_font()
                );
                Self::helvetica()
            }
        }
    }

    /// Font name as written to `/BaseFont`.
    pub fn name(&self) -> &str {
        match self {
            FontResource::Standard(f) => f.base_font(),
            FontResource::TrueType(f) => f.name(),
        }
    }

    /// Check whether this is an embedded font.
    pub fn is_embedded(&self) -> bool {
        matches!(self, FontResource::TrueType(_))
    }

    /// Advance width of one character in 1/1000 em.
    pub fn char_width(&self, c: char) -> f32 {
        match self {
            FontResource::Standard(f) => f.char_width(c),
            FontResource::TrueType(f) => f.glyph_width(f.glyph_id(c)),
        }
    }

    /// Width of `text` at `size` points.
    pub fn string_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * size / 1000.0
    }

    /// Check whether the font can draw `c` as itself.
    pub fn has_glyph(&self, c: char) -> bool {
        match self {
            FontResource::Standard(_) => winansi_byte(c).is_some(),
            FontResource::TrueType(f) => f.glyph_id(c) != 0,
        }
    }

    /// Ascender height at `size` points.
    pub fn ascent(&self, size: f32) -> f32 {
        let units = match self {
            FontResource::Standard(StandardFont::Helvetica) => 718.0,
            FontResource::Standard(StandardFont::Courier) => 629.0,
            FontResource::TrueType(f) => f.ascent(),
        };
        units * size / 1000.0
    }

    /// Check whether two resources refer to the same font.
    pub fn same_font(&self, other: &FontResource) -> bool {
        match (self, other) {
            (FontResource::Standard(a), FontResource::Standard(b)) => a == b,
            (FontResource::TrueType(a), FontResource::TrueType(b)) => {
                Arc::ptr_eq(a, b) || a.name() == b.name()
            }
            _ => false,
        }
    }
}

impl Default for FontResource {
    fn default() -> Self {
        Self::helvetica()
    }
}

impl PartialEq for FontResource {
    fn eq(&self, other: &Self) -> bool {
        self.same_font(other)
    }
}
