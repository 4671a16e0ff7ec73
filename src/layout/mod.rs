//! # Layout Engine
//!
//! Runs the pipeline from parsed markup to a positioned layout:
//!
//! ```text
//! [MarkupSpan]  ──measure──▶  [Span]  ──pack─────────▶  [Line]
//!                                                          │
//!                                     placement::solve  ◀──┘ (per line)
//!                                                          │
//!                                                    LayoutResult
//! ```
//!
//! A pass is a pure function of the markup, style, available width, and
//! metrics provider. `FuriganaText` wraps it with the state a host needs:
//! text parsed once per `set_text`, and the last result cached until the text,
//! style, or available width changes.

pub mod line_breaker;
pub mod placement;

use std::ops::Range;

use crate::font::{LineMetrics, TextMetrics};
use crate::markup::{self, MarkupSpan};
use crate::span::{RubyLabel, Span};
use crate::style::FuriganaStyle;
use serde::Serialize;

pub use line_breaker::{pack, Line, Packed, PositionedRun};

/// A ruby label ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedLabel {
    pub label: RubyLabel,
    /// Centre of the label: the solved offset, or the ideal one as fallback.
    pub x_center: f64,
    /// Left edge to draw the label at, kept inside the drawing surface.
    pub x_left: f64,
}

/// One laid-out line with everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutLine {
    /// Baseline of the base text.
    pub baseline: f64,
    /// Baseline of the ruby labels.
    pub furigana_baseline: f64,
    pub width: f64,
    pub runs: Vec<PositionedRun>,
    pub labels: Vec<PositionedLabel>,
}

/// The outcome of a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub lines: Vec<LayoutLine>,
    /// Vertical advance per line.
    pub line_size: f64,
    /// Width of the widest line.
    pub max_line_width: f64,
    /// The width the text was packed against, if constrained.
    pub max_width: Option<f64>,
}

/// Intrinsic size of a layout, rounded up to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

impl LayoutResult {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn height(&self) -> f64 {
        self.line_size * self.lines.len() as f64
    }

    /// Height is always intrinsic. Width is intrinsic when the layout was
    /// unconstrained or fits on one line; otherwise it is the available width.
    pub fn measurement(&self) -> Measurement {
        let width = match self.max_width {
            Some(available) if self.lines.len() > 1 => available,
            _ => self.max_line_width.ceil(),
        };
        Measurement {
            width,
            height: self.height().ceil(),
            line_count: self.lines.len(),
        }
    }
}

/// Vertical metrics shared by every line of a pass.
struct VerticalMetrics {
    normal: LineMetrics,
    furigana: LineMetrics,
    line_size: f64,
}

impl VerticalMetrics {
    fn new(metrics: &dyn TextMetrics, style: &FuriganaStyle) -> Self {
        let normal = metrics.line_metrics(&style.normal());
        let highlighted = metrics.line_metrics(&style.highlighted());
        let furigana = metrics.line_metrics(&style.furigana());
        let line_size =
            furigana.font_spacing + normal.font_spacing.max(highlighted.font_spacing);
        Self {
            normal,
            furigana,
            line_size,
        }
    }

    /// Base and furigana baselines of line `index`.
    fn baselines(&self, index: usize) -> (f64, f64) {
        let bottom = self.line_size * (index + 1) as f64;
        (
            bottom - self.normal.descent,
            bottom - self.normal.height() - self.furigana.descent,
        )
    }
}

/// Solve label placement for one line, writing solved offsets into its labels.
/// Labels keep their ideal offsets if no placement could be computed.
fn place_labels(line: &mut Line) {
    if line.labels.is_empty() {
        return;
    }

    let ideal: Vec<f64> = line.labels.iter().map(|l| l.ideal_offset).collect();
    let widths: Vec<f64> = line.labels.iter().map(|l| l.width).collect();

    match placement::solve(&ideal, &widths, line.width) {
        Some(p) => {
            if !p.feasible {
                tracing::warn!(
                    labels = line.labels.len(),
                    line_width = line.width,
                    "ruby labels are wider than their line, overflowing both edges"
                );
            }
            for (label, offset) in line.labels.iter_mut().zip(p.offsets) {
                label.solved_offset = Some(offset);
            }
        }
        None => {
            tracing::warn!("non-finite label geometry, keeping ideal offsets");
        }
    }
}

fn position_label(label: RubyLabel, surface_width: f64) -> PositionedLabel {
    let x_center = label.offset();
    let max_left = (surface_width - label.width).max(0.0);
    let x_left = (x_center - label.width / 2.0).max(0.0).min(max_left);
    PositionedLabel {
        label,
        x_center,
        x_left,
    }
}

/// Lay out parsed markup.
///
/// `max_width` of `None` lays everything out on a single line.
pub fn compute_layout(
    spans: &[MarkupSpan],
    style: &FuriganaStyle,
    max_width: Option<f64>,
    metrics: &dyn TextMetrics,
) -> LayoutResult {
    let vertical = VerticalMetrics::new(metrics, style);

    let measured: Vec<Span> = spans
        .iter()
        .map(|m| Span::measure(m, metrics, style))
        .collect();

    let mut packed = pack(measured, max_width);
    for line in &mut packed.lines {
        place_labels(line);
    }

    let surface_width = max_width.unwrap_or(packed.max_line_width);
    let lines: Vec<LayoutLine> = packed
        .lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let (baseline, furigana_baseline) = vertical.baselines(i);
            LayoutLine {
                baseline,
                furigana_baseline,
                width: line.width,
                runs: line.runs,
                labels: line
                    .labels
                    .into_iter()
                    .map(|l| position_label(l, surface_width))
                    .collect(),
            }
        })
        .collect();

    tracing::debug!(
        spans = spans.len(),
        lines = lines.len(),
        max_line_width = packed.max_line_width,
        "laid out furigana text"
    );

    LayoutResult {
        lines,
        line_size: vertical.line_size,
        max_line_width: packed.max_line_width,
        max_width,
    }
}

/// A furigana text block: parsed markup, style, and a cached layout.
#[derive(Debug, Clone, Default)]
pub struct FuriganaText {
    style: FuriganaStyle,
    spans: Vec<MarkupSpan>,
    cache: Option<(Option<u64>, LayoutResult)>,
}

impl FuriganaText {
    pub fn new(style: FuriganaStyle) -> Self {
        Self {
            style,
            spans: Vec::new(),
            cache: None,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.set_text_highlighted(text, 0..0);
    }

    /// Set markup text with a highlighted character range over the unmarked
    /// text.
    pub fn set_text_highlighted(&mut self, text: &str, highlight: Range<usize>) {
        self.spans = markup::parse(text, highlight);
        self.cache = None;
    }

    pub fn style(&self) -> &FuriganaStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: FuriganaStyle) {
        self.style = style;
        self.cache = None;
    }

    pub fn spans(&self) -> &[MarkupSpan] {
        &self.spans
    }

    /// Drop the cached layout, e.g. after the metrics provider changed.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Lay out against `max_width`, reusing the previous result if neither
    /// the width nor the text or style changed since.
    pub fn layout(&mut self, max_width: Option<f64>, metrics: &dyn TextMetrics) -> &LayoutResult {
        let key = max_width.map(f64::to_bits);
        match &self.cache {
            Some((cached, _)) if *cached == key => {
                tracing::trace!(?max_width, "layout cache hit");
            }
            _ => self.cache = None,
        }
        let (_, result) = self.cache.get_or_insert_with(|| {
            (
                key,
                compute_layout(&self.spans, &self.style, max_width, metrics),
            )
        });
        result
    }

    pub fn measure(&mut self, max_width: Option<f64>, metrics: &dyn TextMetrics) -> Measurement {
        self.layout(max_width, metrics).measurement()
    }
}
