//! Fitting one text into one box.
//!
//! [`TextFitter::fit`] flows the text as a paragraph, shrinking the font
//! until the block fits or the attempt budget runs out, then falls back to
//! drawing clipped lines directly. Every call yields exactly one
//! [`PlacementOutcome`], and a failing element leaves no drawing behind.

use unicode_normalization::UnicodeNormalization;

use super::canvas::{Canvas, Paint};
use super::options::FitOptions;
use super::paragraph::{prewrap, truncate_line, ParagraphLayout};
use crate::error::Result;
use crate::model::{BBox, PlacementOutcome, SkipReason};
use crate::style::{Color, Style};

/// Slack allowed when committing a block to its frame.
const COMMIT_FUZZ: f32 = 1e-6;

/// Font sizes tried during one fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitTrace {
    /// Font size of each paragraph attempt, in order
    pub font_sizes: Vec<f32>,
    /// Font size used for direct line placement, if reached
    pub fallback_size: Option<f32>,
}

/// Places text into boxes with font-size adaptation.
#[derive(Debug, Clone, Default)]
pub struct TextFitter {
    options: FitOptions,
    diagnostics: bool,
}

impl TextFitter {
    /// Create a fitter.
    pub fn new(options: FitOptions) -> Self {
        Self {
            options,
            diagnostics: false,
        }
    }

    /// Enable or disable diagnostic outlines.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Fit options in use.
    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Place `text` inside `target` (page coordinates, bottom-left origin).
    pub fn fit<C: Canvas + ?Sized>(
        &self,
        text: &str,
        target: &BBox,
        style: &Style,
        canvas: &mut C,
    ) -> PlacementOutcome {
        self.fit_with_trace(text, target, style, canvas).0
    }

    /// Like [`TextFitter::fit`], also reporting the font sizes tried.
    pub fn fit_with_trace<C: Canvas + ?Sized>(
        &self,
        text: &str,
        target: &BBox,
        style: &Style,
        canvas: &mut C,
    ) -> (PlacementOutcome, FitTrace) {
        let mut trace = FitTrace::default();

        if text.trim().is_empty() {
            return (PlacementOutcome::skipped(SkipReason::EmptyText), trace);
        }

        let (width, height) = (target.width(), target.height());
        if !(width > 0.0 && height > 0.0) {
            log::warn!(
                "Box {:?} has no area ({:.2} x {:.2}), skipping '{}'",
                target.to_array(),
                width,
                height,
                preview(text)
            );
            self.overlay(canvas, |c| outline_degenerate(c, target));
            return (PlacementOutcome::skipped(SkipReason::DegenerateBox), trace);
        }
        if width <= 1.0 || height <= 1.0 {
            log::warn!(
                "Box for '{}' is very small ({:.2} x {:.2})",
                preview(text),
                width,
                height
            );
        }

        let text: String = text.nfc().collect();
        let mark = canvas.checkpoint();
        match self.place(&text, target, style, canvas, &mut trace) {
            Ok(outcome) => (outcome, trace),
            Err(e) => {
                canvas.rollback(mark);
                log::error!("Failed to place '{}': {}", preview(&text), e);
                self.overlay(canvas, |c| outline_error(c, target));
                (
                    PlacementOutcome::skipped(SkipReason::RenderError(e.to_string())),
                    trace,
                )
            }
        }
    }

    fn place<C: Canvas + ?Sized>(
        &self,
        text: &str,
        target: &BBox,
        style: &Style,
        canvas: &mut C,
        trace: &mut FitTrace,
    ) -> Result<PlacementOutcome> {
        let fit = &self.options;
        let avail_w = (target.width() - 2.0 * fit.padding).max(1.0);
        let avail_h = (target.height() - 2.0 * fit.padding).max(1.0);
        let frame = BBox::from_origin_size(
            target.xmin + fit.padding,
            target.ymin + fit.padding,
            avail_w,
            avail_h,
        );

        let text = prewrap(text, avail_w, fit.prewrap_threshold);
        let mut current = style.clone();
        let mut attempts = 0;

        while attempts < fit.max_attempts {
            attempts += 1;
            trace.font_sizes.push(current.font_size);

            let layout = ParagraphLayout::wrap(&text, &current, avail_w);
            log::debug!(
                "Attempt {} at {:.2}pt: needs {:.1} x {:.1}, has {:.1} x {:.1}",
                attempts,
                current.font_size,
                layout.width(),
                layout.height(),
                avail_w,
                avail_h
            );

            if layout.fits(avail_w, avail_h, fit.tolerance) {
                if commit(&layout, &frame, canvas)? {
                    self.overlay(canvas, |c| outline_boundary(c, target));
                    return Ok(PlacementOutcome::Placed {
                        font_size: current.font_size,
                        attempts,
                    });
                }
                log::debug!("Frame rejected block at {:.2}pt", current.font_size);
            }

            if attempts >= fit.max_attempts {
                break;
            }
            let next = fit.next_font_size(current.font_size);
            if next >= current.font_size {
                break;
            }
            if attempts == 1 {
                log::info!(
                    "Adapting font size for '{}' from {:.2}pt (needs {:.1} x {:.1}, has {:.1} x {:.1})",
                    preview(&text),
                    current.font_size,
                    layout.width(),
                    layout.height(),
                    avail_w,
                    avail_h
                );
            }
            current = style.with_font_size(next, fit.leading_ratio);
        }

        let size = current.font_size.min(fit.min_font_size);
        trace.fallback_size = Some(size);
        let floor_style = style.with_font_size(size, fit.leading_ratio);
        let (lines_drawn, lines_dropped) =
            self.draw_lines(&text, target, avail_w, avail_h, &floor_style, canvas)?;

        log::warn!(
            "Placed '{}' line by line at {:.2}pt ({} drawn, {} dropped)",
            preview(&text),
            size,
            lines_drawn,
            lines_dropped
        );
        self.overlay(canvas, |c| outline_fallback(c, target));
        Ok(PlacementOutcome::Fallback {
            font_size: size,
            attempts,
            lines_drawn,
            lines_dropped,
        })
    }

    /// Draw explicit lines top-down, dropping those below the box and
    /// truncating those wider than it.
    fn draw_lines<C: Canvas + ?Sized>(
        &self,
        text: &str,
        target: &BBox,
        avail_w: f32,
        avail_h: f32,
        style: &Style,
        canvas: &mut C,
    ) -> Result<(usize, usize)> {
        let padding = self.options.padding;
        let max_lines = (avail_h / style.leading).floor() as usize;
        let lines: Vec<&str> = text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        canvas.save_state()?;
        canvas.set_fill_color(style.color)?;
        let mut drawn = 0;
        for (idx, line) in lines.iter().take(max_lines).enumerate() {
            let y = target.ymax - (idx + 1) as f32 * style.leading;
            if y <= target.ymin {
                continue;
            }
            let shown = truncate_line(line, &style.font, style.font_size, avail_w);
            if shown.is_empty() {
                continue;
            }
            canvas.draw_text(
                &style.font,
                style.font_size,
                target.xmin + padding,
                y + padding,
                &shown,
            )?;
            drawn += 1;
        }
        canvas.restore_state()?;

        Ok((drawn, lines.len() - drawn))
    }

    /// Run a diagnostic drawing, discarding it if a primitive fails.
    fn overlay<C, F>(&self, canvas: &mut C, draw: F)
    where
        C: Canvas + ?Sized,
        F: FnOnce(&mut C) -> Result<()>,
    {
        if !self.diagnostics {
            return;
        }
        let mark = canvas.checkpoint();
        if let Err(e) = draw(canvas) {
            canvas.rollback(mark);
            log::debug!("Diagnostic overlay dropped: {}", e);
        }
    }
}

/// Draw the block if it fits its frame exactly. `Ok(false)` draws nothing.
fn commit<C: Canvas + ?Sized>(
    layout: &ParagraphLayout,
    frame: &BBox,
    canvas: &mut C,
) -> Result<bool> {
    if !layout.fits(frame.width(), frame.height(), COMMIT_FUZZ) {
        return Ok(false);
    }
    canvas.save_state()?;
    layout.draw(canvas, frame)?;
    canvas.restore_state()?;
    Ok(true)
}

fn outline_boundary<C: Canvas + ?Sized>(canvas: &mut C, target: &BBox) -> Result<()> {
    canvas.save_state()?;
    canvas.set_stroke_color(Color::GREY)?;
    canvas.set_line_width(0.5)?;
    canvas.rect(target, Paint::Stroke)?;
    canvas.restore_state()
}

fn outline_fallback<C: Canvas + ?Sized>(canvas: &mut C, target: &BBox) -> Result<()> {
    canvas.save_state()?;
    canvas.set_stroke_color(Color::ORANGE)?;
    canvas.set_dash(&[2.0, 4.0])?;
    canvas.rect(target, Paint::Stroke)?;
    canvas.restore_state()
}

fn outline_error<C: Canvas + ?Sized>(canvas: &mut C, target: &BBox) -> Result<()> {
    canvas.save_state()?;
    canvas.set_stroke_color(Color::RED)?;
    canvas.set_fill_color(Color::RED)?;
    canvas.set_alpha(0.1, 0.7)?;
    canvas.rect(target, Paint::FillStroke)?;
    canvas.restore_state()
}

/// Dashed marker for a box with no area, drawn at least 1pt wide and high.
fn outline_degenerate<C: Canvas + ?Sized>(canvas: &mut C, target: &BBox) -> Result<()> {
    let marker = BBox::from_origin_size(
        target.xmin,
        target.ymin,
        target.width().max(1.0),
        target.height().max(1.0),
    );
    canvas.save_state()?;
    canvas.set_stroke_color(Color::RED)?;
    canvas.set_dash(&[3.0, 3.0])?;
    canvas.rect(&marker, Paint::Stroke)?;
    canvas.restore_state()
}

/// First characters of a text for log messages.
fn preview(text: &str) -> String {
    const LEN: usize = 50;
    let mut out: String = text.chars().take(LEN).collect();
    if text.chars().nth(LEN).is_some() {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageSize;
    use crate::render::PdfCanvas;
    use crate::style::FontResource;

    fn body() -> Style {
        Style::new("BodyText", FontResource::helvetica(), 5.0, 10.0)
    }

    fn fitter() -> TextFitter {
        TextFitter::new(FitOptions::default())
    }

    #[test]
    fn test_places_short_text() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let target = BBox::new(10.0, 10.0, 200.0, 40.0);
        let outcome = fitter().fit("Hello", &target, &body(), &mut canvas);
        assert_eq!(
            outcome,
            PlacementOutcome::Placed {
                font_size: 5.0,
                attempts: 1
            }
        );
        assert_eq!(canvas.text_count(), 1);
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let fitter = fitter().with_diagnostics(true);
        for text in ["", "   ", "\n\t"] {
            let target = BBox::new(0.0, 0.0, 100.0, 100.0);
            let outcome = fitter.fit(text, &target, &body(), &mut canvas);
            assert_eq!(outcome, PlacementOutcome::skipped(SkipReason::EmptyText));
        }
        assert_eq!(canvas.op_count(), 0);
    }

    #[test]
    fn test_degenerate_box() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let target = BBox::new(10.0, 10.0, 10.0, 50.0);

        let outcome = fitter().fit("text", &target, &body(), &mut canvas);
        assert_eq!(outcome, PlacementOutcome::skipped(SkipReason::DegenerateBox));
        assert_eq!(canvas.op_count(), 0);

        let outcome = fitter()
            .with_diagnostics(true)
            .fit("text", &target, &body(), &mut canvas);
        assert!(outcome.is_skipped());
        assert!(canvas.operations().iter().any(|op| op.operator == "d"));
        assert_eq!(canvas.text_count(), 0);
    }

    #[test]
    fn test_shrinks_until_fit() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        // Two lines at 5/10 need 20pt; at 4.5pt the text fits on one line
        let target = BBox::new(0.0, 0.0, 40.0, 15.0);
        let (outcome, trace) =
            fitter().fit_with_trace("Hello world again", &target, &body(), &mut canvas);

        assert!(outcome.is_placed(), "{:?}", outcome);
        assert!(outcome.attempts() > 1);
        assert_eq!(trace.font_sizes.len() as u32, outcome.attempts());
        assert_eq!(trace.font_sizes[0], 5.0);
        assert!(trace.fallback_size.is_none());
    }

    #[test]
    fn test_commit_rejects_block_within_tolerance() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        // One line at 5/10 needs 10pt; the frame offers 9.995pt
        let target = BBox::new(0.0, 0.0, 100.0, 11.995);
        let (outcome, trace) = fitter().fit_with_trace("Hi", &target, &body(), &mut canvas);

        assert_eq!(trace.font_sizes, vec![5.0, 4.5]);
        assert_eq!(outcome.attempts(), 2);
        assert!(outcome.is_placed());
    }

    #[test]
    fn test_rejected_commit_on_last_attempt_falls_back() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let fitter = TextFitter::new(FitOptions::default().with_max_attempts(1));
        let target = BBox::new(0.0, 0.0, 100.0, 11.995);
        let (outcome, trace) = fitter.fit_with_trace("Hi", &target, &body(), &mut canvas);

        assert_eq!(
            outcome,
            PlacementOutcome::Fallback {
                font_size: 4.0,
                attempts: 1,
                lines_drawn: 1,
                lines_dropped: 0,
            }
        );
        assert_eq!(trace.font_sizes, vec![5.0]);
        assert_eq!(trace.fallback_size, Some(4.0));
        assert_eq!(canvas.text_count(), 1);
    }

    #[test]
    fn test_fallback_outline_is_dashed_orange() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let fitter =
            TextFitter::new(FitOptions::default().with_max_attempts(1)).with_diagnostics(true);
        let target = BBox::new(0.0, 0.0, 100.0, 11.995);
        let outcome = fitter.fit("Hi", &target, &body(), &mut canvas);
        assert!(outcome.is_fallback(), "{:?}", outcome);

        let ops = canvas.operations();
        let dash = ops
            .iter()
            .position(|op| op.operator == "d")
            .expect("dash operator");
        assert_eq!(
            ops[dash].operands[0],
            lopdf::Object::Array(vec![lopdf::Object::Real(2.0), lopdf::Object::Real(4.0)])
        );

        let stroke = &ops[dash - 1];
        assert_eq!(stroke.operator, "RG");
        assert_eq!(
            stroke.operands,
            vec![
                lopdf::Object::Real(1.0),
                lopdf::Object::Real(0.647),
                lopdf::Object::Real(0.0)
            ]
        );
        assert_eq!(ops[dash + 1].operator, "re");
        assert_eq!(ops[dash + 2].operator, "S");
        // No boundary outline for a fallback
        assert!(!ops.iter().any(|op| op.operator == "w"));
    }

    #[test]
    fn test_long_word_falls_back() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let word = "A".repeat(200);
        let (outcome, trace) = fitter().fit_with_trace(
            &word,
            &BBox::new(0.0, 0.0, 50.0, 20.0),
            &body(),
            &mut canvas,
        );

        assert!(outcome.is_fallback(), "{:?}", outcome);
        assert!(outcome.attempts() <= 5);
        assert_eq!(outcome.font_size(), Some(4.0));
        assert_eq!(trace.fallback_size, Some(4.0));
        for pair in trace.font_sizes.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        assert!(trace.font_sizes.iter().all(|&s| s >= 4.0));

        let shown = canvas
            .operations()
            .iter()
            .filter(|op| op.operator == "Tj")
            .count();
        assert_eq!(shown, 1);
    }

    #[test]
    fn test_fallback_drops_lines_below_box() {
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let fit = FitOptions::default().with_max_attempts(1);
        let text = "first line\nsecond line\nthird line\nfourth line";
        // Short texts are not pre-wrapped; fallback lines come from explicit breaks
        let outcome =
            TextFitter::new(fit).fit(text, &BBox::new(0.0, 0.0, 40.0, 14.0), &body(), &mut canvas);

        match outcome {
            PlacementOutcome::Fallback {
                lines_drawn,
                lines_dropped,
                ..
            } => {
                // 12pt available at 4.8pt leading
                assert_eq!(lines_drawn, 2);
                assert_eq!(lines_dropped, 2);
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_attempts_bounded() {
        let fit = FitOptions::default().with_min_font_size(1.0);
        let fitter = TextFitter::new(fit);
        let mut canvas = PdfCanvas::new(PageSize::A4);
        let (outcome, trace) = fitter.fit_with_trace(
            &"x".repeat(500),
            &BBox::new(0.0, 0.0, 10.0, 10.0),
            &Style::new("Big", FontResource::helvetica(), 40.0, 48.0),
            &mut canvas,
        );
        assert_eq!(outcome.attempts(), 5);
        assert_eq!(trace.font_sizes.len(), 5);
        assert!(outcome.is_fallback());
    }

    #[test]
    fn test_template_style_untouched() {
        let template = body();
        let mut canvas = PdfCanvas::new(PageSize::A4);
        fitter().fit(
            "Hello world again",
            &BBox::new(0.0, 0.0, 40.0, 15.0),
            &template,
            &mut canvas,
        );
        assert_eq!(template.font_size, 5.0);
        assert_eq!(template.leading, 10.0);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("a\nb"), "a b");
        assert!(preview(&"x".repeat(80)).ends_with("..."));
    }
}
