//! # Document Model
//!
//! The JSON input accepted by the CLI and the WASM entry point: markup text,
//! an optional highlight, an optional width to break lines at, a style, and
//! any fonts to measure with.
//!
//! ```json
//! {
//!   "text": "{寒気;さむけ}を{防;ふせ}ぐ",
//!   "highlight": [0, 2],
//!   "maxWidth": 320,
//!   "style": { "baseTextSize": 36 },
//!   "fonts": [{ "family": "Noto Sans JP", "src": "data:font/ttf;base64,..." }]
//! }
//! ```

use std::ops::Range;

use crate::style::FuriganaStyle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Markup text in `{base;ruby}` syntax.
    pub text: String,

    /// Highlighted `[start, end)` character range over the unmarked text.
    #[serde(default)]
    pub highlight: Option<[usize; 2]>,

    /// Width to break lines at. Absent means a single line.
    #[serde(default)]
    pub max_width: Option<f64>,

    #[serde(default)]
    pub style: FuriganaStyle,

    /// Fonts to register before layout. Families that are never registered
    /// measure with fixed-pitch metrics.
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

impl Document {
    pub fn highlight_range(&self) -> Range<usize> {
        match self.highlight {
            Some([start, end]) => start..end,
            None => 0..0,
        }
    }
}

/// A font to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    /// Font family name, matched against `style.fontFamily`.
    pub family: String,
    /// Base64-encoded font data, or a data URI (e.g. "data:font/ttf;base64,...").
    pub src: String,
    /// Font weight (100-900). Defaults to 400.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    400
}
