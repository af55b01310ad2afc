//! Rendering module: fitting text into boxes and writing PDF pages.

mod canvas;
mod fitter;
mod json;
mod options;
mod page;
pub mod paragraph;
mod pdf;
mod result;

pub use canvas::{Canvas, Paint};
pub use fitter::{FitTrace, TextFitter};
pub use json::{to_json, JsonFormat};
pub use options::{FitOptions, RenderOptions};
pub use page::PageRenderer;
pub use paragraph::ParagraphLayout;
pub use pdf::PdfCanvas;
pub use result::{ElementReport, RenderReport, RenderStats};
