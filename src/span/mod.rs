//! # Span Model
//!
//! Measured spans: the units the line breaker packs.
//!
//! A `Span` is one parsed markup unit after measurement. It holds up to three
//! `BaseRun`s (the highlight pieces of its base text) and at most one
//! `RubyLabel`. Spans expose their width as *packing units*:
//!
//! - a span without a label has one unit per character, so it can be broken
//!   at any character boundary;
//! - a span with a label has a single aggregate unit, so its base text is
//!   never broken away from its label.

use crate::font::TextMetrics;
use crate::markup::MarkupSpan;
use crate::style::{FuriganaStyle, TextRole};
use serde::Serialize;

/// A measured slice of base text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRun {
    pub text: String,
    pub highlighted: bool,
    advances: Vec<f64>,
    width: f64,
}

impl BaseRun {
    /// Measure `text` with the normal or highlighted style.
    pub fn measure(
        text: &str,
        highlighted: bool,
        metrics: &dyn TextMetrics,
        style: &FuriganaStyle,
    ) -> Self {
        let role = if highlighted {
            TextRole::Highlighted
        } else {
            TextRole::Normal
        };
        let run = metrics.measure_run(text, &style.resolve(role));
        Self::from_advances(text, highlighted, run.advances)
    }

    /// Build a run from precomputed advances, one per char of `text`.
    pub fn from_advances(text: &str, highlighted: bool, advances: Vec<f64>) -> Self {
        debug_assert_eq!(text.chars().count(), advances.len());
        let width = advances.iter().sum();
        Self {
            text: text.to_string(),
            highlighted,
            advances,
            width,
        }
    }

    pub fn advances(&self) -> &[f64] {
        &self.advances
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn char_count(&self) -> usize {
        self.advances.len()
    }

    pub fn role(&self) -> TextRole {
        if self.highlighted {
            TextRole::Highlighted
        } else {
            TextRole::Normal
        }
    }

    /// Split after `at` characters. The halves keep disjoint slices of this
    /// run's advances; nothing is re-measured.
    pub fn split(self, at: usize) -> (BaseRun, BaseRun) {
        let at = at.min(self.advances.len());
        let byte = self
            .text
            .char_indices()
            .nth(at)
            .map_or(self.text.len(), |(i, _)| i);
        let (left_text, right_text) = self.text.split_at(byte);
        let (left_adv, right_adv) = self.advances.split_at(at);
        (
            BaseRun::from_advances(left_text, self.highlighted, left_adv.to_vec()),
            BaseRun::from_advances(right_text, self.highlighted, right_adv.to_vec()),
        )
    }
}

/// A ruby label, measured as a single run with the furigana style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubyLabel {
    pub text: String,
    pub width: f64,
    /// Where the label's centre would sit if centred over its base text.
    pub ideal_offset: f64,
    /// Collision-free centre from the placement solver, if it ran.
    pub solved_offset: Option<f64>,
}

impl RubyLabel {
    pub fn measure(text: &str, metrics: &dyn TextMetrics, style: &FuriganaStyle) -> Self {
        let run = metrics.measure_run(text, &style.furigana());
        Self::new(text, run.width)
    }

    pub fn new(text: &str, width: f64) -> Self {
        Self {
            text: text.to_string(),
            width,
            ideal_offset: 0.0,
            solved_offset: None,
        }
    }

    /// The centre to draw at: the solved offset, or the ideal one when the
    /// solver did not produce a placement.
    pub fn offset(&self) -> f64 {
        self.solved_offset.unwrap_or(self.ideal_offset)
    }
}

/// One measured markup unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    ruby: Option<RubyLabel>,
    runs: Vec<BaseRun>,
    units: Vec<f64>,
    width: f64,
}

impl Span {
    pub fn new(ruby: Option<RubyLabel>, runs: Vec<BaseRun>) -> Self {
        let units: Vec<f64> = if ruby.is_some() {
            vec![runs.iter().map(BaseRun::width).sum()]
        } else {
            runs.iter()
                .flat_map(|r| r.advances().iter().copied())
                .collect()
        };
        let width = units.iter().sum();
        Self {
            ruby,
            runs,
            units,
            width,
        }
    }

    /// Measure a parsed markup span.
    pub fn measure(markup: &MarkupSpan, metrics: &dyn TextMetrics, style: &FuriganaStyle) -> Self {
        let runs = markup
            .pieces
            .iter()
            .map(|p| BaseRun::measure(&p.text, p.highlighted, metrics, style))
            .collect();
        let ruby = markup
            .ruby
            .as_deref()
            .map(|text| RubyLabel::measure(text, metrics, style));
        Self::new(ruby, runs)
    }

    pub fn ruby(&self) -> Option<&RubyLabel> {
        self.ruby.as_ref()
    }

    pub fn runs(&self) -> &[BaseRun] {
        &self.runs
    }

    /// Packing units: one aggregate width if labelled, else one per char.
    pub fn units(&self) -> &[f64] {
        &self.units
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn base_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn into_parts(self) -> (Option<RubyLabel>, Vec<BaseRun>) {
        (self.ruby, self.runs)
    }

    /// Split before packing unit `unit` into the part that fits and the rest.
    ///
    /// A labelled span has a single unit and therefore only moves whole: unit
    /// `0` keeps everything in the rest, anything else keeps everything in the
    /// first part.
    pub fn split(self, unit: usize) -> (Span, Span) {
        if self.ruby.is_some() {
            debug_assert!(unit == 0 || unit >= self.units.len());
            return if unit == 0 {
                (Span::new(None, Vec::new()), self)
            } else {
                (self, Span::new(None, Vec::new()))
            };
        }

        let mut first = Vec::new();
        let mut rest = Vec::new();
        let mut offset = unit;
        for run in self.runs {
            let len = run.char_count();
            if offset == 0 {
                rest.push(run);
            } else if offset >= len {
                offset -= len;
                first.push(run);
            } else {
                let (a, b) = run.split(offset);
                offset = 0;
                first.push(a);
                rest.push(b);
            }
        }
        (Span::new(None, first), Span::new(None, rest))
    }
}
