//! Rendering options and configuration.

use crate::model::PageSize;

/// Options controlling how text is fitted into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Maximum number of fitting attempts, including the first
    pub max_attempts: u32,

    /// Font size floor in points
    pub min_font_size: f32,

    /// Inner padding on each side of a box in points
    pub padding: f32,

    /// Slack allowed when comparing measured and available size
    pub tolerance: f32,

    /// Multiplier applied to the font size on each shrink
    pub shrink_factor: f32,

    /// Minimum reduction per shrink in points
    pub min_shrink_step: f32,

    /// Leading as a multiple of the font size after shrinking
    pub leading_ratio: f32,

    /// Texts longer than this (in characters) are pre-wrapped
    pub prewrap_threshold: usize,
}

impl FitOptions {
    /// Create fit options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of attempts (at least 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the font size floor.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size.max(0.5);
        self
    }

    /// Set the box padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set the measurement tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Set the pre-wrap threshold.
    pub fn with_prewrap_threshold(mut self, chars: usize) -> Self {
        self.prewrap_threshold = chars;
        self
    }

    /// Next font size after a failed attempt.
    ///
    /// Shrinks by the larger of `shrink_factor` and `min_shrink_step`, never
    /// below the floor and never above `size`.
    pub fn next_font_size(&self, size: f32) -> f32 {
        let shrunk = (size * self.shrink_factor).min(size - self.min_shrink_step);
        shrunk.max(self.min_font_size).min(size)
    }

    /// Leading for a font size.
    pub fn leading_for(&self, size: f32) -> f32 {
        size * self.leading_ratio
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_font_size: 4.0,
            padding: 1.0,
            tolerance: 0.01,
            shrink_factor: 0.9,
            min_shrink_step: 0.5,
            leading_ratio: 1.2,
            prewrap_threshold: 50,
        }
    }
}

/// Options for rendering a page.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target page size
    pub page_size: PageSize,

    /// Draw diagnostic outlines around boxes
    pub diagnostics: bool,

    /// Text fitting options
    pub fit: FitOptions,

    /// Document title written to the PDF info dictionary
    pub title: Option<String>,

    /// Flate-compress content and font streams
    pub compress: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Enable or disable diagnostic outlines.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Set the fit options.
    pub fn with_fit(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            diagnostics: false,
            fit: FitOptions::default(),
            title: None,
            compress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_step() {
        let fit = FitOptions::default();
        // 10% of 9 is 0.9, larger than 0.5
        assert!((fit.next_font_size(9.0) - 8.1).abs() < 1e-5);
        // 10% of 5 is 0.5, ties
        assert!((fit.next_font_size(5.0) - 4.5).abs() < 1e-5);
        assert_eq!(fit.next_font_size(4.2), 4.0);
        assert_eq!(fit.next_font_size(4.0), 4.0);
    }

    #[test]
    fn test_shrink_never_increases() {
        let fit = FitOptions::default().with_min_font_size(6.0);
        assert_eq!(fit.next_font_size(3.0), 3.0);

        let mut size = 20.0;
        for _ in 0..50 {
            let next = fit.next_font_size(size);
            assert!(next <= size);
            assert!(next >= 6.0);
            size = next;
        }
        assert_eq!(size, 6.0);
    }

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_page_size(PageSize::LETTER)
            .with_diagnostics(true)
            .with_title("Report")
            .with_fit(FitOptions::new().with_max_attempts(0));

        assert_eq!(options.page_size, PageSize::LETTER);
        assert!(options.diagnostics);
        assert_eq!(options.title.as_deref(), Some("Report"));
        assert_eq!(options.fit.max_attempts, 1);
        assert!(options.compress);
    }
}
