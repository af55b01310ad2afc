//! Page rendering: elements in, one PDF page out.

use std::io::Write;
use std::path::Path;

use rayon::prelude::*;

use super::canvas::Canvas;
use super::fitter::TextFitter;
use super::options::RenderOptions;
use super::pdf::PdfCanvas;
use super::result::{ElementReport, RenderReport};
use crate::error::{Error, Result};
use crate::layout::CoordinateMapper;
use crate::model::{BBox, LayoutLabel, LayoutPage, PageSize};
use crate::style::StyleTable;

/// Renders layout elements onto a target page.
///
/// Elements are drawn strictly in input order on a single canvas; each
/// one is mapped onto the target page, styled by label and fitted into its
/// box. Elements that cannot be placed are skipped without failing the
/// page, which is always finalized.
///
/// # Example
///
/// ```no_run
/// use repdf::render::{PageRenderer, RenderOptions};
/// use repdf::{BBox, LayoutLabel, PageSize, StyleTable};
///
/// let renderer = PageRenderer::new(StyleTable::default(), RenderOptions::default());
/// let mut out = Vec::new();
/// let report = renderer.render_parts(
///     &["Hello"],
///     &[BBox::new(10.0, 10.0, 200.0, 40.0)],
///     &[LayoutLabel::Text],
///     PageSize::new(600.0, 800.0),
///     &mut out,
/// )?;
/// assert_eq!(report.stats.placed, 1);
/// # Ok::<(), repdf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PageRenderer {
    styles: StyleTable,
    options: RenderOptions,
    fitter: TextFitter,
}

impl PageRenderer {
    /// Create a renderer.
    pub fn new(styles: StyleTable, options: RenderOptions) -> Self {
        let fitter = TextFitter::new(options.fit.clone()).with_diagnostics(options.diagnostics);
        Self {
            styles,
            options,
            fitter,
        }
    }

    /// Style table in use.
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Render options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Draw index-aligned lists onto `canvas`.
    ///
    /// Fails before drawing anything when the lists differ in length or a
    /// page size is invalid.
    pub fn draw_parts<C, S>(
        &self,
        texts: &[S],
        boxes: &[BBox],
        labels: &[LayoutLabel],
        source: PageSize,
        canvas: &mut C,
    ) -> Result<Vec<ElementReport>>
    where
        C: Canvas + ?Sized,
        S: AsRef<str>,
    {
        if texts.len() != boxes.len() || boxes.len() != labels.len() {
            return Err(Error::length_mismatch(texts.len(), boxes.len(), labels.len()));
        }
        let mapper = CoordinateMapper::new(source, canvas.page_size())?;
        let items = texts
            .iter()
            .map(|t| AsRef::<str>::as_ref(t))
            .zip(boxes.iter())
            .zip(labels.iter())
            .map(|((text, bbox), label)| (text, bbox, label));
        Ok(self.draw_all(items, &mapper, canvas))
    }

    /// Draw a page's elements onto `canvas`.
    pub fn draw_page<C: Canvas + ?Sized>(
        &self,
        page: &LayoutPage,
        canvas: &mut C,
    ) -> Result<Vec<ElementReport>> {
        let mapper = CoordinateMapper::new(page.source_size, canvas.page_size())?;
        let items = page
            .elements
            .iter()
            .map(|e| (e.text.as_str(), &e.bbox, &e.label));
        Ok(self.draw_all(items, &mapper, canvas))
    }

    fn draw_all<'a, C, I>(
        &self,
        items: I,
        mapper: &CoordinateMapper,
        canvas: &mut C,
    ) -> Vec<ElementReport>
    where
        C: Canvas + ?Sized,
        I: Iterator<Item = (&'a str, &'a BBox, &'a LayoutLabel)>,
    {
        items
            .enumerate()
            .map(|(index, (text, bbox, label))| {
                let target = mapper.map(bbox);
                let style = self.styles.resolve(label);
                let outcome = self.fitter.fit(text, &target, style, canvas);
                log::debug!("Element {} ({}): {:?}", index, label, outcome);
                ElementReport {
                    index,
                    label: label.clone(),
                    style: style.name.clone(),
                    target,
                    outcome,
                }
            })
            .collect()
    }

    /// Render index-aligned lists and write the PDF to `sink`.
    pub fn render_parts<W, S>(
        &self,
        texts: &[S],
        boxes: &[BBox],
        labels: &[LayoutLabel],
        source: PageSize,
        sink: &mut W,
    ) -> Result<RenderReport>
    where
        W: Write,
        S: AsRef<str>,
    {
        let mut canvas = self.new_canvas()?;
        let elements = self.draw_parts(texts, boxes, labels, source, &mut canvas)?;
        self.finish(canvas, elements, sink)
    }

    /// Render a page and write the PDF to `sink`.
    pub fn render_page<W: Write>(&self, page: &LayoutPage, sink: &mut W) -> Result<RenderReport> {
        let mut canvas = self.new_canvas()?;
        let elements = self.draw_page(page, &mut canvas)?;
        self.finish(canvas, elements, sink)
    }

    /// Render a page to a file.
    ///
    /// The document is built in memory first, so a failed page leaves no
    /// file behind.
    pub fn render_to_path<P: AsRef<Path>>(&self, page: &LayoutPage, path: P) -> Result<RenderReport> {
        let mut bytes = Vec::new();
        let report = self.render_page(page, &mut bytes)?;
        std::fs::write(path.as_ref(), &bytes)?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(report)
    }

    /// Render independent pages in parallel, one canvas per page.
    ///
    /// Results are returned in job order.
    pub fn render_batch<P>(&self, jobs: &[(LayoutPage, P)]) -> Vec<Result<RenderReport>>
    where
        P: AsRef<Path> + Sync,
    {
        jobs.par_iter()
            .map(|(page, path)| self.render_to_path(page, path))
            .collect()
    }

    fn new_canvas(&self) -> Result<PdfCanvas> {
        let size = self.options.page_size.validated()?;
        Ok(PdfCanvas::new(size)
            .with_title(self.options.title.clone())
            .with_compression(self.options.compress))
    }

    fn finish<W: Write>(
        &self,
        canvas: PdfCanvas,
        elements: Vec<ElementReport>,
        sink: &mut W,
    ) -> Result<RenderReport> {
        let page_size = canvas.page_size();
        let bytes = canvas.finish(sink)?;
        let report = RenderReport::new(page_size, elements, bytes);
        log::info!(
            "Rendered {} elements: {} placed, {} fallback, {} skipped ({} bytes)",
            report.stats.elements,
            report.stats.placed,
            report.stats.fallback,
            report.stats.skipped(),
            bytes
        );
        Ok(report)
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(StyleTable::default(), RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlacementOutcome;

    #[test]
    fn test_render_parts_writes_pdf() {
        let renderer = PageRenderer::default();
        let mut out = Vec::new();
        let report = renderer
            .render_parts(
                &["Heading", "Body text"],
                &[
                    BBox::new(10.0, 10.0, 300.0, 40.0),
                    BBox::new(10.0, 50.0, 300.0, 200.0),
                ],
                &[LayoutLabel::Title, LayoutLabel::Text],
                PageSize::new(600.0, 800.0),
                &mut out,
            )
            .unwrap();

        assert_eq!(report.stats.placed, 2);
        assert_eq!(report.elements[0].style, "DocHeading");
        assert_eq!(report.bytes_written, out.len());
        assert!(out.starts_with(b"%PDF"));
    }

    #[test]
    fn test_length_mismatch_draws_nothing() {
        let renderer = PageRenderer::default();
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let err = renderer
            .draw_parts(
                &["a", "b"],
                &[BBox::new(0.0, 0.0, 10.0, 10.0)],
                &[LayoutLabel::Text, LayoutLabel::Text],
                PageSize::A4,
                &mut canvas,
            )
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
        assert_eq!(canvas.op_count(), 0);
    }

    #[test]
    fn test_invalid_sizes_fail_before_output() {
        let renderer = PageRenderer::default();
        let mut out = Vec::new();
        let err = renderer
            .render_parts(
                &["a"],
                &[BBox::new(0.0, 0.0, 10.0, 10.0)],
                &[LayoutLabel::Text],
                PageSize::new(0.0, 800.0),
                &mut out,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPageSize { .. }));
        assert!(out.is_empty());

        let bad_target = PageRenderer::new(
            StyleTable::default(),
            RenderOptions::new().with_page_size(PageSize::new(595.0, -1.0)),
        );
        assert!(bad_target
            .render_parts(
                &["a"],
                &[BBox::default()],
                &[LayoutLabel::Text],
                PageSize::A4,
                &mut out
            )
            .is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_elements_keep_input_order() {
        let renderer = PageRenderer::default();
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let reports = renderer
            .draw_parts(
                &["", "x", "y"],
                &[
                    BBox::new(0.0, 0.0, 100.0, 100.0),
                    BBox::new(50.0, 50.0, 50.0, 80.0),
                    BBox::new(0.0, 0.0, 100.0, 100.0),
                ],
                &[LayoutLabel::Text, LayoutLabel::Table, LayoutLabel::from_id(99)],
                PageSize::A4,
                &mut canvas,
            )
            .unwrap();

        let indices: Vec<usize> = reports.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(reports[0].outcome.is_skipped());
        assert!(reports[1].outcome.is_skipped());
        assert!(matches!(reports[2].outcome, PlacementOutcome::Placed { .. }));
        assert_eq!(reports[2].style, "BodyText");
    }
}
