//! # Line Breaking
//!
//! Greedy first-fit packing of measured spans into lines.
//!
//! Each span is offered to the current line one packing unit at a time. If
//! all units fit, the span is placed whole; if only some fit, the span is
//! split and the rest carries over to a new line; if none fit, the line is
//! closed and the span retried on a fresh one. A span that does not start
//! to fit on an empty line is placed whole anyway, alone on its line, so
//! packing always progresses.

use crate::span::{BaseRun, RubyLabel, Span};
use serde::Serialize;

/// A base run at its horizontal position within a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedRun {
    pub run: BaseRun,
    pub x: f64,
}

/// One packed line: base runs and the ruby labels above them, sharing the
/// same horizontal coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub runs: Vec<PositionedRun>,
    /// Labels in left-to-right order, with ideal offsets assigned.
    pub labels: Vec<RubyLabel>,
    /// Realized width: sum of the widths of everything placed.
    pub width: f64,
}

impl Line {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.labels.is_empty()
    }

    /// Place `span` with its left edge at `x`. A label is centred over the
    /// span's base text.
    fn push_span(&mut self, span: Span, x: f64) {
        let span_width = span.width();
        let (ruby, runs) = span.into_parts();

        let mut run_x = x;
        for run in runs {
            let w = run.width();
            self.runs.push(PositionedRun { run, x: run_x });
            run_x += w;
        }

        if let Some(mut label) = ruby {
            label.ideal_offset = x + span_width / 2.0;
            self.labels.push(label);
        }
    }
}

/// Output of a packing pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Packed {
    pub lines: Vec<Line>,
    /// Width of the widest line.
    pub max_line_width: f64,
}

/// Pack measured spans into lines no wider than `max_width`.
///
/// `None` packs everything onto a single line.
pub fn pack(spans: Vec<Span>, max_width: Option<f64>) -> Packed {
    match max_width {
        None => pack_single_line(spans),
        Some(max_width) => pack_constrained(spans, max_width),
    }
}

fn pack_single_line(spans: Vec<Span>) -> Packed {
    let mut line = Line::default();
    let mut x = 0.0;
    for span in spans {
        let w = span.width();
        line.push_span(span, x);
        x += w;
    }
    line.width = x;
    Packed {
        lines: vec![line],
        max_line_width: x,
    }
}

fn pack_constrained(spans: Vec<Span>, max_width: f64) -> Packed {
    let mut packed = Packed::default();
    let mut line = Line::default();
    let mut line_x = 0.0;

    let mut spans = spans.into_iter();
    let mut current = spans.next();

    while let Some(span) = current.take() {
        let start_x = line_x;
        let mut x = line_x;
        let mut fit = 0;
        for &w in span.units() {
            if x + w <= max_width {
                x += w;
                fit += 1;
            } else {
                break;
            }
        }

        if fit == span.units().len() {
            // Span fits entirely
            line.push_span(span, start_x);
            line_x = x;
            current = spans.next();
        } else if fit > 0 {
            // Place the part that fits, carry the rest to the next line
            let (head, tail) = span.split(fit);
            line.push_span(head, start_x);
            line_x = x;
            close_line(&mut packed, &mut line, &mut line_x);
            current = Some(tail);
        } else if !line.is_empty() {
            close_line(&mut packed, &mut line, &mut line_x);
            current = Some(span);
        } else {
            // Wider than an empty line: the whole span overflows, alone on its line
            tracing::debug!(
                width = span.width(),
                max_width,
                "span wider than line, placing anyway"
            );
            line_x = span.width();
            line.push_span(span, 0.0);
            close_line(&mut packed, &mut line, &mut line_x);
            current = spans.next();
        }
    }

    if !line.is_empty() {
        close_line(&mut packed, &mut line, &mut line_x);
    }

    packed
}

fn close_line(packed: &mut Packed, line: &mut Line, line_x: &mut f64) {
    let mut done = std::mem::take(line);
    done.width = *line_x;
    packed.max_line_width = packed.max_line_width.max(*line_x);
    packed.lines.push(done);
    *line_x = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedPitchMetrics;
    use crate::markup;
    use crate::style::FuriganaStyle;

    /// Base text at 20px: wide chars are 20 wide, narrow chars 10.
    fn spans(text: &str) -> Vec<Span> {
        let style = FuriganaStyle::with_size(20.0);
        markup::parse(text, 0..0)
            .iter()
            .map(|m| Span::measure(m, &FixedPitchMetrics, &style))
            .collect()
    }

    fn line_text(line: &Line) -> String {
        line.runs.iter().map(|r| r.run.text.as_str()).collect()
    }

    fn runs_width(line: &Line) -> f64 {
        line.runs.iter().map(|r| r.run.width()).sum()
    }

    #[test]
    fn test_unconstrained_single_line() {
        let packed = pack(spans("abc{定;さだ}def"), None);
        assert_eq!(packed.lines.len(), 1);
        let line = &packed.lines[0];
        assert_eq!(line_text(line), "abc定def");
        assert_eq!(line.width, 80.0);
        assert_eq!(packed.max_line_width, 80.0);
        // label centred over 定 at x 30..50
        assert_eq!(line.labels.len(), 1);
        assert_eq!(line.labels[0].ideal_offset, 40.0);
    }

    #[test]
    fn test_unconstrained_empty_input_has_one_line() {
        let packed = pack(Vec::new(), None);
        assert_eq!(packed.lines.len(), 1);
        assert!(packed.lines[0].is_empty());
    }

    #[test]
    fn test_constrained_empty_input_has_no_lines() {
        let packed = pack(Vec::new(), Some(100.0));
        assert!(packed.lines.is_empty());
        assert_eq!(packed.max_line_width, 0.0);
    }

    #[test]
    fn test_run_positions_are_cumulative() {
        let packed = pack(spans("ab{寒気;さむけ}c"), None);
        let xs: Vec<f64> = packed.lines[0].runs.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 20.0, 60.0]);
    }

    #[test]
    fn test_plain_span_splits_at_char_boundary() {
        // ten narrow chars, 10 each, 35 per line
        let packed = pack(spans("abcdefghij"), Some(35.0));
        let texts: Vec<String> = packed.lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["abc", "def", "ghi", "j"]);
        assert_eq!(packed.max_line_width, 30.0);
        for line in &packed.lines {
            assert!(line.width <= 35.0);
        }
    }

    #[test]
    fn test_labelled_span_moves_to_next_line_whole() {
        // "ab" = 20, 寒気 = 40: 60 > 50, so 寒気 starts line two
        let packed = pack(spans("ab{寒気;さむけ}"), Some(50.0));
        assert_eq!(packed.lines.len(), 2);
        assert_eq!(line_text(&packed.lines[0]), "ab");
        assert!(packed.lines[0].labels.is_empty());
        assert_eq!(line_text(&packed.lines[1]), "寒気");
        assert_eq!(packed.lines[1].labels[0].ideal_offset, 20.0);
    }

    #[test]
    fn test_label_offset_relative_to_its_line() {
        let packed = pack(spans("{寒気;さむけ}{寒気;さむけ}{防;ふせ}"), Some(60.0));
        assert_eq!(packed.lines.len(), 2);
        assert_eq!(packed.lines[0].labels.len(), 1);
        let second = &packed.lines[1];
        assert_eq!(second.labels.len(), 2);
        assert_eq!(second.labels[0].ideal_offset, 20.0);
        assert_eq!(second.labels[1].ideal_offset, 50.0);
    }

    #[test]
    fn test_overwide_unit_is_force_placed_alone() {
        let style = FuriganaStyle::with_size(500.0);
        let span = Span::measure(&markup::parse("寒", 0..0)[0], &FixedPitchMetrics, &style);
        assert_eq!(span.width(), 500.0);

        let packed = pack(vec![span], Some(100.0));
        assert_eq!(packed.lines.len(), 1);
        assert_eq!(packed.lines[0].width, 500.0);
        assert_eq!(packed.max_line_width, 500.0);
    }

    #[test]
    fn test_overwide_plain_span_is_force_placed_whole() {
        // "ab" at 500px: 250 per char, so not even the first char fits 100
        let style = FuriganaStyle::with_size(500.0);
        let measured: Vec<Span> = markup::parse("ab{寒;さむ}", 0..0)
            .iter()
            .map(|m| Span::measure(m, &FixedPitchMetrics, &style))
            .collect();

        let packed = pack(measured, Some(100.0));
        let texts: Vec<String> = packed.lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["ab", "寒"]);
        assert_eq!(packed.lines[0].width, 500.0);
        assert!(packed.lines[0].labels.is_empty());
        assert_eq!(packed.lines[1].labels.len(), 1);
        assert_eq!(packed.max_line_width, 500.0);
    }

    #[test]
    fn test_overwide_labelled_span_is_force_placed_alone() {
        // 寒気 is 40 wide on a 30 line
        let packed = pack(spans("a{寒気;さむけ}b"), Some(30.0));
        let texts: Vec<String> = packed.lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["a", "寒気", "b"]);
        assert_eq!(packed.lines[1].labels.len(), 1);
        assert_eq!(packed.lines[1].width, 40.0);
    }

    #[test]
    fn test_packing_bound() {
        let text = "{彼女;かのじょ}は{寒気;さむけ}を{防;ふせ}ぐために{厚;あつ}いコートを{着;き}ていた。";
        for max_width in [45.0, 60.0, 100.0, 137.0] {
            let packed = pack(spans(text), Some(max_width));
            let all: String = packed.lines.iter().map(line_text).collect();
            assert_eq!(all, "彼女は寒気を防ぐために厚いコートを着ていた。");
            for line in &packed.lines {
                assert!(line.width <= max_width, "{} > {max_width}", line.width);
                assert!((line.width - runs_width(line)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_width_units_always_fit() {
        let style = FuriganaStyle::with_size(20.0);
        let span = Span::new(None, vec![BaseRun::from_advances("\u{200B}", false, vec![0.0])]);
        let full = Span::measure(&markup::parse("寒", 0..0)[0], &FixedPitchMetrics, &style);
        let packed = pack(vec![full, span], Some(20.0));
        assert_eq!(packed.lines.len(), 1);
        assert_eq!(packed.lines[0].runs.len(), 2);
    }
}
