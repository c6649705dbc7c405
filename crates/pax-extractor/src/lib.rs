//! PAX Extractor - Abstract extraction pipeline
//!
//! Recovers the abstract of a publication from a single HTML page using
//! lexical heuristics only. Data flows through five stages:
//! - Candidate generation: structural rules, JSON-LD blocks, meta tags
//! - Normalization: markup removal, entity decoding, whitespace cleanup
//! - Quality filtering: length, word count, prose shape, case ratio
//! - Deduplication: length-proximity and exact-match collapse
//! - Selection: longest candidate, ranked list, or longest with metadata
//!
//! Every stage degrades to "nothing from this candidate" instead of failing,
//! so the only caller-visible outcome besides a result is "not found".
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};

/// Strategy that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Container or heading rule from the structural rule library
    StructuralPattern,
    /// `application/ld+json` script block
    StructuredData,
    /// Description meta tag (HTML, Open Graph, Twitter card)
    MetaTag,
}

impl ExtractionMethod {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuralPattern => "structural_pattern",
            Self::StructuredData => "structured_data",
            Self::MetaTag => "meta_tag",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw candidate abstract, still carrying markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub text: String,
    pub method: ExtractionMethod,
}

/// Trait for candidate sources
///
/// A source never fails: anything it cannot match or parse is skipped.
pub trait CandidateSource: Send + Sync {
    /// Strategy tag attached to every candidate of this source
    fn method(&self) -> ExtractionMethod;

    /// Collect raw candidate strings from `html`, in document order
    fn candidates(&self, html: &str) -> Vec<String>;
}

mod markup;

pub mod candidates;
pub mod dedup;
pub mod extractor;
pub mod normalize;
pub mod quality;
pub mod rules;
pub mod select;

pub use candidates::{generate_candidates, CandidateGenerator, MetaTagSource, StructuredDataSource};
pub use dedup::{deduplicate, LENGTH_PROXIMITY};
pub use extractor::{extract_abstract, extract_all_abstracts, extract_with_metadata, AbstractExtractor};
pub use normalize::normalize;
pub use quality::{QualityFilter, QualityVerdict, Rejection};
pub use rules::{
    AttributeMatch, Boundary, ContainerRule, HeadingRule, Rule, StructuralMatcher, TagName,
    ValueMatch, DEFAULT_RULES,
};
pub use select::{rank_all, select_best, AbstractMetadata, ExtractionResult, SelectionMode};

/// Length of `text` in characters, the unit every length bound uses
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
