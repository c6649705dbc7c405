//! Quality filter
//!
//! Cheap lexical checks that separate abstract prose from navigation text,
//! copyright lines and all-caps headers. Each check is independent; the
//! first one that fails is reported.
//!
//! Author: hephaex@gmail.com

use once_cell::sync::Lazy;
use regex::Regex;

use pax_core::ExtractorConfig;

use crate::char_len;

/// Minimum whitespace-separated words
pub const MIN_WORDS: usize = 10;
/// Maximum whitespace-separated words
pub const MAX_WORDS: usize = 1000;
/// A sentence segment counts as prose when it has more than this many words
pub const SEGMENT_MIN_WORDS: usize = 3;
/// Prose segments required
pub const MIN_PROSE_SEGMENTS: usize = 2;
/// Largest tolerated share of uppercase characters
pub const MAX_UPPERCASE_RATIO: f64 = 0.4;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));

/// Split text into sentence segments on runs of `.`, `!` and `?`.
///
/// Empty leading and trailing segments are kept.
pub fn sentence_segments(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_BREAK.split(text)
}

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    TooShort { length: usize, min: usize },
    TooLong { length: usize, max: usize },
    TooFewWords(usize),
    TooManyWords(usize),
    /// Fewer than two sentence segments with more than three words
    NotProse { prose_segments: usize },
    MostlyUppercase { ratio: f64 },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { length, min } => write!(f, "too short ({length} < {min} chars)"),
            Self::TooLong { length, max } => write!(f, "too long ({length} > {max} chars)"),
            Self::TooFewWords(n) => write!(f, "too few words ({n})"),
            Self::TooManyWords(n) => write!(f, "too many words ({n})"),
            Self::NotProse { prose_segments } => {
                write!(f, "not prose ({prose_segments} sentence segments)")
            }
            Self::MostlyUppercase { ratio } => write!(f, "mostly uppercase ({ratio:.2})"),
        }
    }
}

/// Outcome of assessing one normalized text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualityVerdict {
    Pass,
    Reject(Rejection),
}

impl QualityVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Length-bounded quality filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityFilter {
    min_length: usize,
    max_length: usize,
}

impl QualityFilter {
    /// Create a filter accepting `min_length..=max_length` characters
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Create a filter from the extractor configuration
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.min_length, config.max_length)
    }

    /// Classify a normalized text
    pub fn assess(&self, text: &str) -> QualityVerdict {
        let length = char_len(text);
        if length < self.min_length {
            return QualityVerdict::Reject(Rejection::TooShort {
                length,
                min: self.min_length,
            });
        }
        if length > self.max_length {
            return QualityVerdict::Reject(Rejection::TooLong {
                length,
                max: self.max_length,
            });
        }

        let words = text.split_whitespace().count();
        if words < MIN_WORDS {
            return QualityVerdict::Reject(Rejection::TooFewWords(words));
        }
        if words > MAX_WORDS {
            return QualityVerdict::Reject(Rejection::TooManyWords(words));
        }

        let prose_segments = sentence_segments(text)
            .filter(|segment| segment.split_whitespace().count() > SEGMENT_MIN_WORDS)
            .count();
        if prose_segments < MIN_PROSE_SEGMENTS {
            return QualityVerdict::Reject(Rejection::NotProse { prose_segments });
        }

        let ratio = uppercase_ratio(text);
        if ratio > MAX_UPPERCASE_RATIO {
            return QualityVerdict::Reject(Rejection::MostlyUppercase { ratio });
        }

        QualityVerdict::Pass
    }

    /// Shorthand for `assess(text).is_pass()`
    pub fn passes(&self, text: &str) -> bool {
        self.assess(text).is_pass()
    }
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

/// Share of uppercase characters among all characters; 0 for empty text
pub fn uppercase_ratio(text: &str) -> f64 {
    let total = char_len(text);
    if total == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f64 / total as f64
}
