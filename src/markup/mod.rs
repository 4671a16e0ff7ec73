//! # Markup Parsing
//!
//! Turns the inline ruby syntax into an ordered list of spans:
//!
//! ```text
//! {彼女;かのじょ}は{寒気;さむけ}を
//! └─ base;ruby ─┘   └─ base;ruby ┘
//! ```
//!
//! `{base;ruby}` annotates `base` with a ruby label, `{base}` isolates a base
//! run without a label, and anything outside braces is plain base text. There
//! is no escaping. An unmatched `{` drops the rest of the input and `{}` is
//! skipped.
//!
//! The highlight range is given in characters over the *unmarked* text (the
//! concatenation of all base text), so each span's base text is cut into at
//! most three pieces: before, inside, and after the highlight.
//!
//! Parsing does not measure anything. Spans are measured later, against a
//! metrics provider, in [`crate::span`].

use std::ops::Range;

/// A slice of base text, either inside or outside the highlight range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePiece {
    pub text: String,
    pub highlighted: bool,
}

/// One parsed unit: base text split by highlight, plus an optional ruby label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub ruby: Option<String>,
    /// Non-empty pieces in text order. At most three.
    pub pieces: Vec<BasePiece>,
}

impl MarkupSpan {
    /// Build a span from base text and a highlight range relative to the
    /// start of `base` (either end may lie outside the base text).
    fn new(base: &str, ruby: Option<&str>, start: isize, end: isize) -> Self {
        let len = base.chars().count() as isize;
        let mut pieces = Vec::with_capacity(3);

        if start < len && end > 0 && start < end {
            let start = start.max(0) as usize;
            let end = end.min(len) as usize;
            let (before, marked, after) = split_chars(base, start, end);
            push_piece(&mut pieces, before, false);
            push_piece(&mut pieces, marked, true);
            push_piece(&mut pieces, after, false);
        } else {
            push_piece(&mut pieces, base, false);
        }

        Self {
            ruby: ruby.map(str::to_string),
            pieces,
        }
    }

    /// The base text of this span, highlight pieces joined back together.
    pub fn base_text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }

    pub fn has_ruby(&self) -> bool {
        self.ruby.is_some()
    }
}

fn push_piece(pieces: &mut Vec<BasePiece>, text: &str, highlighted: bool) {
    if !text.is_empty() {
        pieces.push(BasePiece {
            text: text.to_string(),
            highlighted,
        });
    }
}

/// Split `s` at two char offsets (`start <= end <= char count`).
fn split_chars(s: &str, start: usize, end: usize) -> (&str, &str, &str) {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    let (a, b) = (byte_at(start), byte_at(end));
    (&s[..a], &s[a..b], &s[b..])
}

/// Parse markup into spans.
///
/// `highlight` is a half-open character range over the unmarked text; an
/// empty range highlights nothing.
pub fn parse(text: &str, highlight: Range<usize>) -> Vec<MarkupSpan> {
    let mut spans = Vec::new();
    let mut rest = text;
    let mut start = highlight.start as isize;
    let mut end = highlight.end as isize;

    while !rest.is_empty() {
        let Some(open) = rest.find('{') else {
            spans.push(MarkupSpan::new(rest, None, start, end));
            break;
        };

        if open > 0 {
            let prefix = &rest[..open];
            spans.push(MarkupSpan::new(prefix, None, start, end));
            let consumed = prefix.chars().count() as isize;
            start -= consumed;
            end -= consumed;
            rest = &rest[open..];
        }

        // `rest` starts with '{', so a closing brace is at byte 1 or later.
        let Some(close) = rest.find('}') else {
            tracing::warn!(
                dropped = rest.chars().count(),
                "unmatched '{{' in markup, dropping the remainder"
            );
            break;
        };

        let body = &rest[1..close];
        rest = &rest[close + 1..];
        if body.is_empty() {
            continue;
        }

        let (base, ruby) = match body.split_once(';') {
            Some((base, ruby)) => (base, Some(ruby)),
            None => (body, None),
        };
        let ruby = ruby.filter(|r| !r.is_empty());
        if base.is_empty() && ruby.is_none() {
            // `{;}` carries nothing
            continue;
        }

        spans.push(MarkupSpan::new(base, ruby, start, end));
        let consumed = base.chars().count() as isize;
        start -= consumed;
        end -= consumed;
    }

    tracing::trace!(spans = spans.len(), "parsed markup");
    spans
}

/// The unmarked text: every span's base text, concatenated.
pub fn plain_text(spans: &[MarkupSpan]) -> String {
    spans.iter().map(MarkupSpan::base_text).collect()
}
