//! Paragraph flow: greedy word wrap, measurement and drawing.

use std::borrow::Cow;

use super::canvas::Canvas;
use crate::error::Result;
use crate::model::BBox;
use crate::style::{Alignment, FontResource, Style};

/// A word and its width at the layout's font size.
#[derive(Debug, Clone)]
struct Word {
    text: String,
    width: f32,
}

/// One wrapped line.
#[derive(Debug, Clone)]
struct Line {
    words: Vec<Word>,
    /// Natural width with single spaces
    width: f32,
    /// Offset from the frame's left edge
    indent: f32,
    /// Width available to the line
    capacity: f32,
}

impl Line {
    fn text(&self) -> String {
        let words: Vec<&str> = self.words.iter().map(|w| w.text.as_str()).collect();
        words.join(" ")
    }
}

/// A paragraph wrapped into a given width.
///
/// Whitespace, line breaks included, collapses between words. Words are
/// never split, so a long word can make the block wider than the width it
/// was wrapped into.
#[derive(Debug, Clone)]
pub struct ParagraphLayout {
    style: Style,
    lines: Vec<Line>,
    width: f32,
    height: f32,
}

impl ParagraphLayout {
    /// Wrap `text` into `avail_width` using `style`.
    pub fn wrap(text: &str, style: &Style, avail_width: f32) -> Self {
        let font = &style.font;
        let size = style.font_size;
        let space = font.string_width(" ", size);
        let fixed = style.left_indent + style.right_indent;

        let indent_of = |line: usize| {
            if line == 0 {
                style.left_indent + style.first_line_indent
            } else {
                style.left_indent
            }
        };
        let capacity_of = |line: usize| avail_width - fixed - (indent_of(line) - style.left_indent);

        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut current_width = 0.0;

        for token in text.split_whitespace() {
            let word = Word {
                text: token.to_string(),
                width: font.string_width(token, size),
            };
            if current.is_empty() {
                current_width = word.width;
                current.push(word);
            } else if current_width + space + word.width <= capacity_of(lines.len()) {
                current_width += space + word.width;
                current.push(word);
            } else {
                let n = lines.len();
                lines.push(Line {
                    words: std::mem::take(&mut current),
                    width: current_width,
                    indent: indent_of(n),
                    capacity: capacity_of(n),
                });
                current_width = word.width;
                current.push(word);
            }
        }
        if !current.is_empty() {
            let n = lines.len();
            lines.push(Line {
                words: current,
                width: current_width,
                indent: indent_of(n),
                capacity: capacity_of(n),
            });
        }

        let width = lines
            .iter()
            .map(|l| l.indent + l.width + style.right_indent)
            .fold(0.0, f32::max);
        let height = lines.len() as f32 * style.leading;

        Self {
            style: style.clone(),
            lines,
            width,
            height,
        }
    }

    /// Widest line extent including indentation.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Block height: number of lines times the leading.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Number of wrapped lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Wrapped lines as text.
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }

    /// Font size the paragraph was wrapped at.
    pub fn font_size(&self) -> f32 {
        self.style.font_size
    }

    /// Check whether the block fits `width` x `height` within `slack`.
    pub fn fits(&self, width: f32, height: f32, slack: f32) -> bool {
        self.width <= width + slack && self.height <= height + slack
    }

    /// Draw the block with its top edge at the top of `frame`.
    ///
    /// The first baseline sits one font size below the top.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, frame: &BBox) -> Result<()> {
        let style = &self.style;
        let font = &style.font;
        let size = style.font_size;
        let space = font.string_width(" ", size);

        canvas.set_fill_color(style.color)?;
        for (idx, line) in self.lines.iter().enumerate() {
            let baseline = frame.ymax - size - idx as f32 * style.leading;
            let left = frame.xmin + line.indent;
            let slack = (line.capacity - line.width).max(0.0);
            let last = idx + 1 == self.lines.len();

            match style.alignment {
                Alignment::Justify if !last && line.words.len() > 1 => {
                    let gap = space + slack / (line.words.len() - 1) as f32;
                    let mut x = left;
                    for word in &line.words {
                        canvas.draw_text(font, size, x, baseline, &word.text)?;
                        x += word.width + gap;
                    }
                }
                Alignment::Center => {
                    canvas.draw_text(font, size, left + slack / 2.0, baseline, &line.text())?
                }
                Alignment::Right => {
                    canvas.draw_text(font, size, left + slack, baseline, &line.text())?
                }
                _ => canvas.draw_text(font, size, left, baseline, &line.text())?,
            }
        }
        Ok(())
    }
}

/// Insert line breaks into long text at word boundaries.
///
/// Lines are cut once they pass a character budget derived from the
/// available width (one character per 3 points, between 10 and 40). Text at
/// or under `threshold` characters, or without whitespace, is returned as is.
pub fn prewrap(text: &str, avail_width: f32, threshold: usize) -> Cow<'_, str> {
    if text.chars().count() <= threshold || !text.contains(char::is_whitespace) {
        return Cow::Borrowed(text);
    }

    let max_line_chars = ((avail_width / 3.0).max(0.0) as usize).clamp(10, 40);
    let mut out = String::with_capacity(text.len() + text.len() / max_line_chars + 1);
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push(' ');
        }
        out.push_str(word);

        let n = word.chars().count();
        if line_len + n > max_line_chars {
            out.push('\n');
            line_len = 0;
        } else {
            line_len += n + 1;
        }
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    Cow::Owned(out)
}

/// Shorten a line to `avail_width` with a trailing `...`.
///
/// Characters are kept while the measured prefix plus the marker fits. When
/// not even the marker fits, only the prefix that fits is kept, which may be
/// empty.
pub fn truncate_line<'a>(
    line: &'a str,
    font: &FontResource,
    size: f32,
    avail_width: f32,
) -> Cow<'a, str> {
    if font.string_width(line, size) <= avail_width {
        return Cow::Borrowed(line);
    }

    const ELLIPSIS: &str = "...";
    let marker = font.string_width(ELLIPSIS, size);
    let with_marker = marker <= avail_width;
    let budget = if with_marker {
        avail_width - marker
    } else {
        avail_width
    };

    let mut kept = String::new();
    for c in line.chars() {
        kept.push(c);
        if font.string_width(&kept, size) > budget {
            kept.pop();
            break;
        }
    }
    let end = kept.trim_end().len();
    kept.truncate(end);

    if with_marker {
        kept.push_str(ELLIPSIS);
    }
    Cow::Owned(kept)
}
