//! # repdf
//!
//! Rebuild document pages as PDF from detected layout regions.
//!
//! Given text fragments, the boxes a layout detector found them in and the
//! detector's labels, this library places every fragment inside its box on
//! a fixed-size target page. Text that does not fit is shrunk, re-wrapped
//! and, as a last resort, drawn line by line, so every element ends up on
//! the page or is reported as skipped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use repdf::PageRenderer;
//!
//! fn main() -> repdf::Result<()> {
//!     let page = repdf::load_layout("page.json")?;
//!
//!     let renderer = PageRenderer::default();
//!     let report = renderer.render_to_path(&page, "page.pdf")?;
//!     println!("{} placed, {} skipped", report.stats.placed, report.stats.skipped());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Containment deduplication**: drop regions nested inside other regions
//! - **Coordinate mapping**: scale image-space boxes onto PDF pages
//! - **Label styles**: built-in styles per detector label, overridable via JSON
//! - **Adaptive fitting**: bounded font shrinking with a line-by-line fallback
//! - **Embedded fonts**: TrueType embedding for non-Latin text
//! - **Parallel batches**: independent pages rendered with Rayon

pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod style;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{filter_contained, BoxDeduplicator, CoordinateMapper};
pub use model::{
    BBox, Detections, LabeledBox, LayoutElement, LayoutLabel, LayoutPage, PageSize,
    PlacementOutcome, SkipReason,
};
pub use render::{
    Canvas, FitOptions, JsonFormat, PageRenderer, PdfCanvas, RenderOptions, RenderReport,
    RenderStats, TextFitter,
};
pub use style::{Alignment, Color, FontResource, Style, StyleSheet, StyleTable};

use std::path::{Path, PathBuf};

/// Load a layout page from a JSON file.
///
/// # Example
///
/// ```no_run
/// let page = repdf::load_layout("page.json").unwrap();
/// println!("{} elements", page.len());
/// ```
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<LayoutPage> {
    let json = std::fs::read_to_string(path)?;
    LayoutPage::from_json(&json)
}

/// Load detector output from a JSON file.
pub fn load_detections<P: AsRef<Path>>(path: P) -> Result<Detections> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Render a layout JSON file to a PDF file with default settings.
///
/// # Example
///
/// ```no_run
/// let report = repdf::render_file("page.json", "page.pdf").unwrap();
/// assert_eq!(report.stats.errors, 0);
/// ```
pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<RenderReport> {
    Repdf::new().render_file(input, output)
}

/// Builder for configuring and running page rendering.
///
/// # Example
///
/// ```no_run
/// use repdf::{PageSize, Repdf};
///
/// let report = Repdf::new()
///     .with_font("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
///     .with_page_size(PageSize::A4)
///     .with_diagnostics(true)
///     .with_dedup(true)
///     .render_file("page.json", "page.pdf")?;
/// # Ok::<(), repdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Repdf {
    options: RenderOptions,
    font: Option<PathBuf>,
    style_sheet: Option<PathBuf>,
    dedup: bool,
}

impl Repdf {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw with a TrueType font file, falling back to Helvetica if it cannot be loaded.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = Some(path.into());
        self
    }

    /// Apply a JSON style sheet over the built-in styles.
    pub fn with_style_sheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.style_sheet = Some(path.into());
        self
    }

    /// Set the target page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.options = self.options.with_page_size(size);
        self
    }

    /// Enable diagnostic outlines.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.options = self.options.with_diagnostics(enabled);
        self
    }

    /// Set the fit options.
    pub fn with_fit(mut self, fit: FitOptions) -> Self {
        self.options = self.options.with_fit(fit);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Drop regions contained in other regions before rendering.
    pub fn with_dedup(mut self, enabled: bool) -> Self {
        self.dedup = enabled;
        self
    }

    /// Build the style table for the configured font and style sheet.
    pub fn styles(&self) -> Result<StyleTable> {
        let font = self
            .font
            .as_ref()
            .map(FontResource::load_or_fallback)
            .unwrap_or_default();
        let mut styles = StyleTable::standard(font);
        if let Some(path) = &self.style_sheet {
            styles.apply_sheet(StyleSheet::load(path)?)?;
        }
        Ok(styles)
    }

    /// Build a renderer.
    pub fn build(self) -> Result<PageRenderer> {
        let styles = self.styles()?;
        Ok(PageRenderer::new(styles, self.options))
    }

    /// Render one page.
    pub fn render_page<W: std::io::Write>(
        self,
        page: &LayoutPage,
        sink: &mut W,
    ) -> Result<RenderReport> {
        let page = self.prepare(page.clone());
        self.build()?.render_page(&page, sink)
    }

    /// Render a layout JSON file to a PDF file.
    pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(
        self,
        input: P,
        output: Q,
    ) -> Result<RenderReport> {
        let page = self.prepare(load_layout(input)?);
        self.build()?.render_to_path(&page, output)
    }

    fn prepare(&self, mut page: LayoutPage) -> LayoutPage {
        if self.dedup {
            let removed = page.dedup();
            if removed > 0 {
                log::info!("Dropped {} contained regions", removed);
            }
        }
        page
    }
}
