/*!
 * Math extraction for definition text.
 *
 * Display blocks (`$$...$$`) are located first; inline spans (`$...$`) are
 * only searched for in the text between display blocks, so a display block
 * can never be read as two inline spans. Each match is replaced by an
 * opaque placeholder built from private-use code points, which markdown
 * passes through as ordinary text.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Opens a placeholder token
pub const PLACEHOLDER_OPEN: char = '\u{E000}';

/// Closes a placeholder token
pub const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Display math, may span lines
static DISPLAY_MATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\$\$(.+?)\$\$").expect("Invalid display math regex")
});

/// Inline math, single line and never crossing a `$`
static INLINE_MATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([^$\n]+?)\$").expect("Invalid inline math regex")
});

/// Placeholder token carrying a segment id
pub static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x{E000}(\d+)\x{E001}").expect("Invalid placeholder regex")
});

/// One extracted formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathSegment {
    /// Position of the formula in the document, referenced by its placeholder
    pub id: usize,
    /// Trimmed formula source
    pub formula: String,
    /// Centered block rather than inline
    pub display_mode: bool,
}

/// Text with formulas replaced by placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub segments: Vec<MathSegment>,
}

/// Placeholder token for a segment id
pub fn placeholder(id: usize) -> String {
    format!("{PLACEHOLDER_OPEN}{id}{PLACEHOLDER_CLOSE}")
}

/// Remove anything that could be mistaken for a placeholder
pub fn strip_placeholder_marks(text: &str) -> Cow<'_, str> {
    if text.contains([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE]) {
        Cow::Owned(
            text.chars()
                .filter(|c| *c != PLACEHOLDER_OPEN && *c != PLACEHOLDER_CLOSE)
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Remove whole placeholder tokens, then any stray marks
///
/// Used where a formula element cannot be rendered, such as attribute values.
pub fn strip_placeholders(text: &str) -> String {
    let text = PLACEHOLDER_REGEX.replace_all(text, "");
    strip_placeholder_marks(&text).into_owned()
}

/// Replace every formula in `source` by a placeholder
///
/// Segments are numbered in document order.
pub fn extract(source: &str) -> Extraction {
    let source = strip_placeholder_marks(source);
    let source = source.as_ref();

    let display: Vec<(Range<usize>, &str)> = DISPLAY_MATH_REGEX
        .captures_iter(source)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
        .collect();

    let mut spans: Vec<(Range<usize>, &str, bool)> = Vec::with_capacity(display.len());
    let mut cursor = 0;
    for (range, formula) in display {
        collect_inline(source, cursor..range.start, &mut spans);
        cursor = range.end;
        spans.push((range, formula, true));
    }
    collect_inline(source, cursor..source.len(), &mut spans);

    let mut text = String::with_capacity(source.len());
    let mut segments = Vec::with_capacity(spans.len());
    let mut last = 0;
    for (id, (range, formula, display_mode)) in spans.into_iter().enumerate() {
        text.push_str(&source[last..range.start]);
        text.push_str(&placeholder(id));
        segments.push(MathSegment {
            id,
            formula: formula.trim().to_string(),
            display_mode,
        });
        last = range.end;
    }
    text.push_str(&source[last..]);

    debug!("Extracted {} math segment(s)", segments.len());
    Extraction { text, segments }
}

fn collect_inline<'a>(
    source: &'a str,
    window: Range<usize>,
    spans: &mut Vec<(Range<usize>, &'a str, bool)>,
) {
    let offset = window.start;
    for caps in INLINE_MATH_REGEX.captures_iter(&source[window]) {
        if let (Some(whole), Some(formula)) = (caps.get(0), caps.get(1)) {
            let range = (whole.start() + offset)..(whole.end() + offset);
            spans.push((range, formula.as_str(), false));
        }
    }
}
