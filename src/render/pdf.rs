//! PDF page output backed by lopdf.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::canvas::{check_finite, Canvas, Paint};
use crate::error::{Error, Result};
use crate::model::{BBox, PageSize};
use crate::style::{Color, FontResource, TrueTypeFont};

/// Producer string written to the info dictionary.
const PRODUCER: &str = concat!("repdf ", env!("CARGO_PKG_VERSION"));

/// Entries per `beginbfchar` block (the CMap format limit).
const BFCHAR_BLOCK: usize = 100;

/// A font used on the page and the glyphs drawn with it.
#[derive(Debug)]
struct FontSlot {
    font: FontResource,
    glyphs: BTreeMap<u16, char>,
}

/// [`Canvas`] producing a single-page PDF document.
///
/// Operations are buffered in memory; nothing touches the output until
/// [`PdfCanvas::finish`].
#[derive(Debug)]
pub struct PdfCanvas {
    size: PageSize,
    ops: Vec<Operation>,
    fonts: Vec<FontSlot>,
    alphas: Vec<(f32, f32)>,
    title: Option<String>,
    compress: bool,
}

impl PdfCanvas {
    /// Create an empty page.
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
            fonts: Vec::new(),
            alphas: Vec::new(),
            title: None,
            compress: true,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Buffered content operations.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of text-showing operations buffered.
    pub fn text_count(&self) -> usize {
        self.ops.iter().filter(|op| op.operator == "Tj").count()
    }

    /// Resource name for a font, registering it on first use.
    fn font_index(&mut self, font: &FontResource) -> usize {
        if let Some(idx) = self.fonts.iter().position(|s| s.font.same_font(font)) {
            return idx;
        }
        self.fonts.push(FontSlot {
            font: font.clone(),
            glyphs: BTreeMap::new(),
        });
        self.fonts.len() - 1
    }

    fn alpha_index(&mut self, fill: f32, stroke: f32) -> usize {
        if let Some(idx) = self.alphas.iter().position(|&a| a == (fill, stroke)) {
            return idx;
        }
        self.alphas.push((fill, stroke));
        self.alphas.len() - 1
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    /// Build the document and write it to `sink` in a single write.
    ///
    /// Returns the number of bytes written. On failure nothing has been
    /// written and the page is discarded.
    pub fn finish<W: Write>(self, sink: &mut W) -> Result<usize> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_dict = Dictionary::new();
        for (idx, slot) in self.fonts.iter().enumerate() {
            let font_id = match &slot.font {
                FontResource::Standard(f) => doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => f.base_font(),
                    "Encoding" => "WinAnsiEncoding",
                }),
                FontResource::TrueType(f) => {
                    embed_truetype(&mut doc, f, &slot.glyphs, self.compress)?
                }
            };
            font_dict.set(font_key(idx), font_id);
        }

        let mut gs_dict = Dictionary::new();
        for (idx, &(fill, stroke)) in self.alphas.iter().enumerate() {
            gs_dict.set(
                alpha_key(idx),
                dictionary! {
                    "Type" => "ExtGState",
                    "ca" => Object::Real(fill),
                    "CA" => Object::Real(stroke),
                },
            );
        }

        let mut resources = Dictionary::new();
        resources.set("Font", font_dict);
        if !self.alphas.is_empty() {
            resources.set("ExtGState", gs_dict);
        }
        let resources_id = doc.add_object(resources);

        let content = Content {
            operations: self.ops,
        }
        .encode()?;
        let content_id = doc.add_object(make_stream(Dictionary::new(), content, self.compress)?);

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.size.width),
                Object::Real(self.size.height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(pdf_date(chrono::Utc::now())),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(bytes.len())
    }
}

impl Canvas for PdfCanvas {
    fn page_size(&self) -> PageSize {
        self.size
    }

    fn checkpoint(&self) -> usize {
        self.ops.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.ops.truncate(checkpoint);
    }

    fn save_state(&mut self) -> Result<()> {
        self.push("q", vec![]);
        Ok(())
    }

    fn restore_state(&mut self) -> Result<()> {
        self.push("Q", vec![]);
        Ok(())
    }

    fn set_fill_color(&mut self, color: Color) -> Result<()> {
        self.push("rg", color_operands(color));
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Color) -> Result<()> {
        self.push("RG", color_operands(color));
        Ok(())
    }

    fn set_alpha(&mut self, fill: f32, stroke: f32) -> Result<()> {
        check_finite("alpha", &[fill, stroke])?;
        let idx = self.alpha_index(fill.clamp(0.0, 1.0), stroke.clamp(0.0, 1.0));
        self.push("gs", vec![Object::Name(alpha_key(idx).into_bytes())]);
        Ok(())
    }

    fn set_dash(&mut self, pattern: &[f32]) -> Result<()> {
        check_finite("dash pattern", pattern)?;
        let array = pattern.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>();
        self.push("d", vec![Object::Array(array), Object::Integer(0)]);
        Ok(())
    }

    fn set_line_width(&mut self, width: f32) -> Result<()> {
        check_finite("line width", &[width])?;
        self.push("w", vec![Object::Real(width)]);
        Ok(())
    }

    fn rect(&mut self, rect: &BBox, paint: Paint) -> Result<()> {
        check_finite("rectangle", &rect.to_array())?;
        self.push(
            "re",
            vec![
                Object::Real(rect.xmin),
                Object::Real(rect.ymin),
                Object::Real(rect.width()),
                Object::Real(rect.height()),
            ],
        );
        let op = match paint {
            Paint::Stroke => "S",
            Paint::Fill => "f",
            Paint::FillStroke => "B",
        };
        self.push(op, vec![]);
        Ok(())
    }

    fn draw_text(
        &mut self,
        font: &FontResource,
        size: f32,
        x: f32,
        y: f32,
        text: &str,
    ) -> Result<()> {
        check_finite("text position", &[size, x, y])?;
        if size <= 0.0 {
            return Err(Error::Render(format!("font size must be positive, got {}", size)));
        }

        let idx = self.font_index(font);
        let missing = text.chars().filter(|&c| !font.has_glyph(c)).count();
        if missing > 0 {
            log::warn!(
                "{} character(s) not available in font '{}'",
                missing,
                font.name()
            );
        }

        let shown = match font {
            FontResource::Standard(f) => Object::String(f.encode(text), StringFormat::Literal),
            FontResource::TrueType(f) => {
                let glyphs = &mut self.fonts[idx].glyphs;
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for c in text.chars() {
                    let gid = f.glyph_id(c);
                    if gid != 0 {
                        glyphs.entry(gid).or_insert(c);
                    }
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
        };

        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![Object::Name(font_key(idx).into_bytes()), Object::Real(size)],
        );
        self.push("Td", vec![Object::Real(x), Object::Real(y)]);
        self.push("Tj", vec![shown]);
        self.push("ET", vec![]);
        Ok(())
    }
}

fn font_key(idx: usize) -> String {
    format!("F{}", idx + 1)
}

fn alpha_key(idx: usize) -> String {
    format!("GS{}", idx + 1)
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![
        Object::Real(color.r.clamp(0.0, 1.0)),
        Object::Real(color.g.clamp(0.0, 1.0)),
        Object::Real(color.b.clamp(0.0, 1.0)),
    ]
}

/// PDF date string (`D:YYYYMMDDHHmmSSZ`).
fn pdf_date(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Info dictionary text: PDFDocEncoding for ASCII, UTF-16BE otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn make_stream(mut dict: Dictionary, data: Vec<u8>, compress: bool) -> Result<Stream> {
    if compress {
        dict.set("Filter", "FlateDecode");
        Ok(Stream::new(dict, deflate(&data)?))
    } else {
        Ok(Stream::new(dict, data))
    }
}

/// Embed a TrueType font as a Type0 font with Identity-H encoding.
fn embed_truetype(
    doc: &mut Document,
    font: &TrueTypeFont,
    glyphs: &BTreeMap<u16, char>,
    compress: bool,
) -> Result<ObjectId> {
    let name = font.name().to_string();
    let ascent = font.ascent().round() as i64;
    let descent = font.descent().round() as i64;

    let file = make_stream(
        dictionary! { "Length1" => Object::Integer(font.data().len() as i64) },
        font.data().to_vec(),
        compress,
    )?;
    let file_id = doc.add_object(file);

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => name.as_str(),
        "Flags" => Object::Integer(32),
        "FontBBox" => vec![
            Object::Integer(0),
            Object::Integer(descent),
            Object::Integer(1000),
            Object::Integer(ascent),
        ],
        "ItalicAngle" => Object::Integer(0),
        "Ascent" => Object::Integer(ascent),
        "Descent" => Object::Integer(descent),
        "CapHeight" => Object::Integer(ascent),
        "StemV" => Object::Integer(80),
        "FontFile2" => file_id,
    });

    let mut widths = Vec::with_capacity(glyphs.len() * 2);
    for &gid in glyphs.keys() {
        widths.push(Object::Integer(i64::from(gid)));
        widths.push(Object::Array(vec![Object::Real(font.glyph_width(gid))]));
    }

    let cid_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => name.as_str(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => Object::Integer(0),
        },
        "FontDescriptor" => descriptor_id,
        "DW" => Object::Integer(1000),
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let cmap = make_stream(Dictionary::new(), to_unicode_cmap(glyphs).into_bytes(), compress)?;
    let cmap_id = doc.add_object(cmap);

    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => name.as_str(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_id)],
        "ToUnicode" => cmap_id,
    }))
}

/// ToUnicode CMap mapping 2-byte glyph ids back to text.
fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    for block in entries.chunks(BFCHAR_BLOCK) {
        cmap.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, c) in block {
            let mut buf = [0u16; 2];
            let unicode: String = c
                .encode_utf16(&mut buf)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, unicode));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}
