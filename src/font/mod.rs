//! # Font Metrics
//!
//! The text metrics contract the layout engine consumes, plus the providers
//! that ship with the crate.
//!
//! The engine never touches glyphs. It asks a `TextMetrics` provider for
//! per-character advances of a run and for the vertical metrics of a style,
//! and everything else is arithmetic on those numbers. Hosts with their own
//! text stack implement the trait; the built-in `FontContext` covers the
//! common case of "some TrueType fonts, and a sane fallback for the rest".

use std::collections::HashMap;

use crate::error::FuriganaError;
use crate::style::TextStyle;
use unicode_width::UnicodeWidthChar;

/// Advances of a measured run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    /// One advance per `char` of the run.
    pub advances: Vec<f64>,
    /// Sum of `advances`.
    pub width: f64,
}

impl RunMetrics {
    pub fn from_advances(advances: Vec<f64>) -> Self {
        let width = advances.iter().sum();
        Self { advances, width }
    }
}

/// Vertical metrics of a style. Ascent and descent are both positive
/// distances from the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f64,
    pub descent: f64,
    /// Recommended distance between consecutive baselines.
    pub font_spacing: f64,
}

impl LineMetrics {
    /// Distance from the top of the ascent to the bottom of the descent.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// The measurement contract between the layout engine and a text stack.
///
/// Implementations must be deterministic for a given `(text, style)` pair.
pub trait TextMetrics {
    fn measure_run(&self, text: &str, style: &TextStyle) -> RunMetrics;
    fn line_metrics(&self, style: &TextStyle) -> LineMetrics;
}

/// Metrics derived from East Asian cell widths.
///
/// A wide cell (kanji, kana, full-width punctuation) advances one em, a narrow
/// cell half an em, and zero-width or control characters nothing. Exact and
/// font-independent, which makes it the fallback and the test provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPitchMetrics;

impl FixedPitchMetrics {
    pub const ASCENT: f64 = 0.8;
    pub const DESCENT: f64 = 0.2;
    pub const LINE_GAP: f64 = 0.2;

    pub fn char_width(ch: char, font_size: f64) -> f64 {
        let cells = ch.width().unwrap_or(0) as f64;
        cells * 0.5 * font_size
    }
}

impl TextMetrics for FixedPitchMetrics {
    fn measure_run(&self, text: &str, style: &TextStyle) -> RunMetrics {
        RunMetrics::from_advances(
            text.chars()
                .map(|ch| Self::char_width(ch, style.font_size))
                .collect(),
        )
    }

    fn line_metrics(&self, style: &TextStyle) -> LineMetrics {
        let size = style.font_size;
        LineMetrics {
            ascent: Self::ASCENT * size,
            descent: Self::DESCENT * size,
            font_spacing: (Self::ASCENT + Self::DESCENT + Self::LINE_GAP) * size,
        }
    }
}

/// Metrics parsed from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

impl FontMetrics {
    /// Parse metrics from font data. Returns `None` if the data is not a font.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    // Ideographic space is the natural advance for missing CJK glyphs.
                    if ch == '\u{3000}' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em;
        }

        Some(FontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        })
    }

    fn scale(&self, units: f64, font_size: f64) -> f64 {
        units / self.units_per_em as f64 * font_size
    }

    /// Advance width of a character in pixels.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        self.scale(w as f64, font_size)
    }

    pub fn line_metrics(&self, font_size: f64) -> LineMetrics {
        let ascent = self.scale(self.ascender as f64, font_size);
        let descent = self.scale(-(self.descender as f64), font_size);
        LineMetrics {
            ascent,
            descent,
            font_spacing: ascent + descent + self.scale(self.line_gap as f64, font_size),
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
}

/// A registry of parsed fonts with fixed-pitch fallback.
///
/// Lookup tries the exact family and weight, then the weight snapped to
/// regular (400) or bold (700), then any weight of the family. Families that
/// were never registered measure with `FixedPitchMetrics`.
#[derive(Debug, Default)]
pub struct FontContext {
    fonts: HashMap<FontKey, FontMetrics>,
    fallback: FixedPitchMetrics,
}

impl FontContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a font under `family` / `weight`.
    pub fn register(&mut self, family: &str, weight: u32, data: &[u8]) -> Result<(), FuriganaError> {
        let metrics = FontMetrics::from_font_data(data).ok_or_else(|| {
            FuriganaError::Font(format!("'{}' ({}) is not a valid TrueType/OpenType font", family, weight))
        })?;
        tracing::debug!(
            family,
            weight,
            glyphs = metrics.advance_widths.len(),
            "registered font"
        );
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                weight,
            },
            metrics,
        );
        Ok(())
    }

    /// Look up the font for a family and weight, if one is registered.
    pub fn resolve(&self, family: &str, weight: u32) -> Option<&FontMetrics> {
        let key = FontKey {
            family: family.to_string(),
            weight,
        };
        if let Some(font) = self.fonts.get(&key) {
            return Some(font);
        }

        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        let key = FontKey {
            family: family.to_string(),
            weight: snapped_weight,
        };
        if let Some(font) = self.fonts.get(&key) {
            return Some(font);
        }

        // Lowest weight wins so the pick does not depend on map order.
        self.fonts
            .iter()
            .filter(|(k, _)| k.family == family)
            .min_by_key(|(k, _)| k.weight)
            .map(|(_, font)| font)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl TextMetrics for FontContext {
    fn measure_run(&self, text: &str, style: &TextStyle) -> RunMetrics {
        match self.resolve(&style.font_family, style.font_weight) {
            Some(font) => RunMetrics::from_advances(
                text.chars()
                    .map(|ch| font.char_width(ch, style.font_size))
                    .collect(),
            ),
            None => self.fallback.measure_run(text, style),
        }
    }

    fn line_metrics(&self, style: &TextStyle) -> LineMetrics {
        match self.resolve(&style.font_family, style.font_weight) {
            Some(font) => font.line_metrics(style.font_size),
            None => self.fallback.line_metrics(style),
        }
    }
}
