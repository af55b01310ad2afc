//! Layout region labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a detected layout region.
///
/// Detectors emit either numeric class ids (`0`..`10`) or class names; both
/// parse into this closed set. Anything else is kept verbatim in
/// [`LayoutLabel::Unrecognized`] so it can still be reported.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "LabelToken", into = "String")]
pub enum LayoutLabel {
    /// Caption for figures or tables
    Caption,
    /// Footnote text
    Footnote,
    /// Mathematical formula
    Formula,
    /// Item in a bulleted or numbered list
    ListItem,
    /// Running footer
    PageFooter,
    /// Running header
    PageHeader,
    /// Picture region (rendered as its caption text)
    Picture,
    /// Section heading
    SectionHeader,
    /// Table region
    Table,
    /// Body text
    #[default]
    Text,
    /// Document title
    Title,
    /// Label token the detector vocabulary does not know
    Unrecognized(String),
}

impl LayoutLabel {
    /// All recognized labels, in detector class-id order.
    pub const KNOWN: [LayoutLabel; 11] = [
        LayoutLabel::Caption,
        LayoutLabel::Footnote,
        LayoutLabel::Formula,
        LayoutLabel::ListItem,
        LayoutLabel::PageFooter,
        LayoutLabel::PageHeader,
        LayoutLabel::Picture,
        LayoutLabel::SectionHeader,
        LayoutLabel::Table,
        LayoutLabel::Text,
        LayoutLabel::Title,
    ];

    /// Map a detector class id to a label.
    pub fn from_id(id: u64) -> Self {
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::KNOWN.get(i).cloned())
            .unwrap_or_else(|| LayoutLabel::Unrecognized(id.to_string()))
    }

    /// Parse a label token: a class id (`"9"`) or a class name in either
    /// detector (`"Section-header"`) or snake case (`"section_header"`) form.
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim();
        if let Ok(id) = trimmed.parse::<u64>() {
            return Self::from_id(id);
        }

        let normalized: String = trimmed
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "caption" => LayoutLabel::Caption,
            "footnote" => LayoutLabel::Footnote,
            "formula" | "equation" => LayoutLabel::Formula,
            "list_item" | "listitem" => LayoutLabel::ListItem,
            "page_footer" => LayoutLabel::PageFooter,
            "page_header" => LayoutLabel::PageHeader,
            "picture" | "figure" | "image" => LayoutLabel::Picture,
            "section_header" => LayoutLabel::SectionHeader,
            "table" => LayoutLabel::Table,
            "text" | "paragraph" => LayoutLabel::Text,
            "title" => LayoutLabel::Title,
            _ => LayoutLabel::Unrecognized(trimmed.to_string()),
        }
    }

    /// Detector class id, if recognized.
    pub fn id(&self) -> Option<u32> {
        Self::KNOWN
            .iter()
            .position(|l| l == self)
            .map(|i| i as u32)
    }

    /// Canonical detector name (e.g. `"Section-header"`).
    pub fn as_str(&self) -> &str {
        match self {
            LayoutLabel::Caption => "Caption",
            LayoutLabel::Footnote => "Footnote",
            LayoutLabel::Formula => "Formula",
            LayoutLabel::ListItem => "List-item",
            LayoutLabel::PageFooter => "Page-footer",
            LayoutLabel::PageHeader => "Page-header",
            LayoutLabel::Picture => "Picture",
            LayoutLabel::SectionHeader => "Section-header",
            LayoutLabel::Table => "Table",
            LayoutLabel::Text => "Text",
            LayoutLabel::Title => "Title",
            LayoutLabel::Unrecognized(raw) => raw,
        }
    }

    /// Check if the label belongs to the known vocabulary.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, LayoutLabel::Unrecognized(_))
    }
}

impl fmt::Display for LayoutLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LayoutLabel {
    fn from(token: &str) -> Self {
        LayoutLabel::parse(token)
    }
}

impl From<u64> for LayoutLabel {
    fn from(id: u64) -> Self {
        LayoutLabel::from_id(id)
    }
}

impl From<LayoutLabel> for String {
    fn from(label: LayoutLabel) -> Self {
        label.as_str().to_string()
    }
}

/// Raw label as it appears in detector output: an id or a name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelToken {
    /// Numeric class id
    Id(u64),
    /// Class name or stringified id
    Name(String),
}

impl From<LabelToken> for LayoutLabel {
    fn from(token: LabelToken) -> Self {
        match token {
            LabelToken::Id(id) => LayoutLabel::from_id(id),
            LabelToken::Name(name) => LayoutLabel::parse(&name),
        }
    }
}
