use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::SignalSource;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("marker pattern is valid"));
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^,\s]+").expect("token pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationPart<'a> {
    Link {
        number: usize,
        source: &'a SignalSource,
    },
    /// Separators, out-of-range numbers and non-numeric tokens.
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment<'a> {
    Literal(&'a str),
    /// Rendered inside a single bracket pair.
    Citation(Vec<CitationPart<'a>>),
}

impl fmt::Display for CitationPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link { number, .. } => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for TextSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Citation(parts) => {
                f.write_str("[")?;
                for part in parts {
                    write!(f, "{part}")?;
                }
                f.write_str("]")
            }
        }
    }
}

pub fn render_citations<'a>(text: &'a str, sources: &'a [SignalSource]) -> Vec<TextSegment<'a>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in MARKER.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // Brackets without any number are ordinary prose, e.g. "[sic]".
        let Some(parts) = marker_parts(inner.as_str(), sources) else {
            continue;
        };

        if whole.start() > cursor {
            segments.push(TextSegment::Literal(&text[cursor..whole.start()]));
        }
        segments.push(TextSegment::Citation(parts));
        cursor = whole.end();
    }

    if cursor < text.len() {
        segments.push(TextSegment::Literal(&text[cursor..]));
    }
    segments
}

fn marker_parts<'a>(inner: &'a str, sources: &'a [SignalSource]) -> Option<Vec<CitationPart<'a>>> {
    let mut parts = Vec::new();
    let mut has_number = false;
    let mut cursor = 0;

    for token in TOKEN.find_iter(inner) {
        if token.start() > cursor {
            parts.push(CitationPart::Text(&inner[cursor..token.start()]));
        }
        cursor = token.end();

        let Some(number) = citation_number(token.as_str()) else {
            parts.push(CitationPart::Text(token.as_str()));
            continue;
        };
        has_number = true;

        match number.checked_sub(1).and_then(|idx| sources.get(idx)) {
            Some(source) => parts.push(CitationPart::Link { number, source }),
            None => parts.push(CitationPart::Text(token.as_str())),
        }
    }

    if cursor < inner.len() {
        parts.push(CitationPart::Text(&inner[cursor..]));
    }

    has_number.then_some(parts)
}

/// Plain decimal only, so a link prints back exactly as written.
fn citation_number(token: &str) -> Option<usize> {
    let canonical = token.bytes().all(|b| b.is_ascii_digit())
        && (token.len() == 1 || !token.starts_with('0'));
    if canonical { token.parse().ok() } else { None }
}
