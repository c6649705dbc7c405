//! Final selection over deduplicated candidates
//!
//! Author: hephaex@gmail.com

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::char_len;
use crate::quality::sentence_segments;

/// What the caller wants back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Longest surviving candidate
    #[default]
    Best,
    /// Every surviving candidate, longest first
    All,
    /// Longest surviving candidate plus diagnostic metadata
    WithMetadata,
}

/// Result of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Best(String),
    Ranked(Vec<String>),
    Detailed(AbstractMetadata),
    /// No candidate survived; a normal outcome, not an error
    NotFound,
}

impl ExtractionResult {
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Texts carried by this result, longest first
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Best(text) => vec![text.as_str()],
            Self::Ranked(texts) => texts.iter().map(String::as_str).collect(),
            Self::Detailed(metadata) => vec![metadata.text.as_str()],
            Self::NotFound => Vec::new(),
        }
    }
}

/// Any Unicode decimal digit
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("digit pattern is valid"));

/// Best abstract with descriptive statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractMetadata {
    pub text: String,
    /// Length in characters
    pub length: usize,
    pub word_count: usize,
    /// Pieces after splitting on `.`/`!`/`?` runs, trailing empty piece included
    pub sentence_count: usize,
    pub has_digit: bool,
}

impl AbstractMetadata {
    pub fn from_text(text: String) -> Self {
        Self {
            length: char_len(&text),
            word_count: text.split_whitespace().count(),
            sentence_count: sentence_segments(&text).count(),
            has_digit: DIGIT.is_match(&text),
            text,
        }
    }
}

/// Longest text; the earliest one wins ties
pub fn select_best(texts: Vec<String>) -> Option<String> {
    let mut best: Option<(usize, String)> = None;

    for text in texts {
        let length = char_len(&text);
        let longer = best
            .as_ref()
            .map_or(true, |(best_length, _)| length > *best_length);
        if longer {
            best = Some((length, text));
        }
    }

    best.map(|(_, text)| text)
}

/// All texts by descending length; equal lengths keep their input order
pub fn rank_all(mut texts: Vec<String>) -> Vec<String> {
    texts.sort_by_cached_key(|text| std::cmp::Reverse(char_len(text)));
    texts
}
