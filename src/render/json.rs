//! JSON output for rendering reports.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a report (or any result type) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, LayoutLabel, PageSize, PlacementOutcome};
    use crate::render::{ElementReport, RenderReport};

    fn report() -> RenderReport {
        RenderReport::new(
            PageSize::A4,
            vec![ElementReport {
                index: 0,
                label: LayoutLabel::Title,
                style: "DocHeading".into(),
                target: BBox::new(10.0, 700.0, 300.0, 720.0),
                outcome: PlacementOutcome::Placed {
                    font_size: 9.0,
                    attempts: 1,
                },
            }],
            1024,
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"status\": \"placed\""));
        assert!(json.contains("\"label\": \"Title\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"bytes_written\":1024"));
    }
}
