//! Emphasis of the matched query inside a result name.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            emphasized: false,
        }
    }

    fn emphasized(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            emphasized: true,
        }
    }
}

/// Text split into plain and emphasized runs, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedText {
    pub segments: Vec<Segment>,
}

impl HighlightedText {
    pub fn has_match(&self) -> bool {
        self.segments.iter().any(|segment| segment.emphasized)
    }

    /// The original text with emphasis dropped.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Renders emphasized runs wrapped in brackets, e.g. `[Ap]ple`.
impl fmt::Display for HighlightedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            if segment.emphasized {
                write!(f, "[{}]", segment.text)?;
            } else {
                f.write_str(&segment.text)?;
            }
        }
        Ok(())
    }
}

/// Marks the first case-insensitive occurrence of `query` in `text`.
///
/// Casing of `text` is preserved. An empty query or no match yields the text
/// as a single plain segment.
pub fn highlight_match(text: &str, query: &str) -> HighlightedText {
    let Some((start, end)) = find_case_insensitive(text, query) else {
        return HighlightedText {
            segments: vec![Segment::plain(text)],
        };
    };

    let mut segments = Vec::with_capacity(3);
    if start > 0 {
        segments.push(Segment::plain(&text[..start]));
    }
    segments.push(Segment::emphasized(&text[start..end]));
    if end < text.len() {
        segments.push(Segment::plain(&text[end..]));
    }
    HighlightedText { segments }
}

/// Byte range of the first match, compared char by char so the range always
/// falls on char boundaries of `text`.
fn find_case_insensitive(text: &str, query: &str) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    text.char_indices().find_map(|(start, _)| {
        let mut hay = text[start..].char_indices();
        let mut end = start;
        for needle in query.chars() {
            let (offset, ch) = hay.next()?;
            if !chars_eq_ignore_case(ch, needle) {
                return None;
            }
            end = start + offset + ch.len_utf8();
        }
        Some((start, end))
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multibyte_names_split_on_char_boundaries() {
        let highlighted = highlight_match("Crème Brûlée", "BRÛ");
        assert_eq!(highlighted.to_string(), "Crème [Brû]lée");
    }

    #[test]
    fn query_longer_than_text_is_no_match() {
        let highlighted = highlight_match("Fig", "Figs");
        assert!(!highlighted.has_match());
        assert_eq!(highlighted.plain_text(), "Fig");
    }
}
