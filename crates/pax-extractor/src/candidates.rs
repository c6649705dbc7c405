//! Candidate generation
//!
//! Three independent strategies contribute to one pool, in this order:
//! - Structural rules ([`StructuralMatcher`])
//! - JSON-LD script blocks ([`StructuredDataSource`])
//! - Description meta tags ([`MetaTagSource`])
//!
//! The pool is a union: a strategy that finds nothing does not stop the
//! others, and a block that fails to parse is skipped on its own.
//!
//! Author: hephaex@gmail.com

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::markup;
use crate::rules::{StructuralMatcher, TagName};
use crate::{CandidateSource, ExtractionMethod, RawCandidate};

static SCRIPT_OPEN: Lazy<Regex> = Lazy::new(|| {
    markup::open_tag_regex(TagName::Named("script")).expect("script tag pattern is valid")
});
static SCRIPT_CLOSE: Lazy<Regex> = Lazy::new(|| {
    markup::close_tag_regex(TagName::Named("script")).expect("script tag pattern is valid")
});
static META_OPEN: Lazy<Regex> = Lazy::new(|| {
    markup::open_tag_regex(TagName::Named("meta")).expect("meta tag pattern is valid")
});

// ============================================================================
// Structured Data (JSON-LD)
// ============================================================================

/// Reads `description`, `abstract` and `author.description` from
/// `application/ld+json` script blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDataSource;

impl StructuredDataSource {
    const FIELDS: [&'static str; 2] = ["description", "abstract"];

    fn fields_of(payload: &str) -> Vec<String> {
        let payload = payload
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>")
            .trim();

        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                tracing::trace!(error = %e, "Skipping unparsable JSON-LD block");
                return Vec::new();
            }
        };

        let Some(object) = value.as_object() else {
            tracing::trace!("Skipping JSON-LD block without a top-level object");
            return Vec::new();
        };

        let mut found: Vec<String> = Self::FIELDS
            .iter()
            .filter_map(|field| object.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        if let Some(author) = object
            .get("author")
            .and_then(Value::as_object)
            .and_then(|author| author.get("description"))
            .and_then(Value::as_str)
        {
            found.push(author.to_string());
        }

        found
    }
}

impl CandidateSource for StructuredDataSource {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::StructuredData
    }

    fn candidates(&self, html: &str) -> Vec<String> {
        markup::find_elements(&SCRIPT_OPEN, &SCRIPT_CLOSE, html, |tag| {
            tag.attribute("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
        })
        .into_iter()
        .flat_map(|element| Self::fields_of(element.inner))
        .collect()
    }
}

// ============================================================================
// Meta Tags
// ============================================================================

/// Reads the `content` of the description, Open Graph and Twitter card
/// meta tags; the first tag of each kind only
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaTagSource;

impl MetaTagSource {
    /// (identifying attribute, its value)
    const LOOKUPS: [(&'static str, &'static str); 3] = [
        ("name", "description"),
        ("property", "og:description"),
        ("name", "twitter:description"),
    ];
}

impl CandidateSource for MetaTagSource {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::MetaTag
    }

    fn candidates(&self, html: &str) -> Vec<String> {
        Self::LOOKUPS
            .iter()
            .filter_map(|&(attr, expected)| {
                markup::find_open_tag(&META_OPEN, html, 0, |tag| {
                    tag.attribute(attr)
                        .is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
                        && tag.attribute("content").is_some()
                })
                .and_then(|tag| tag.attribute("content"))
            })
            .map(str::to_string)
            .collect()
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Ordered set of candidate sources
pub struct CandidateGenerator {
    sources: Vec<Box<dyn CandidateSource>>,
}

impl CandidateGenerator {
    /// Create a generator with the three standard strategies
    pub fn new() -> Self {
        let mut generator = Self::empty();
        generator.register(StructuralMatcher::new());
        generator.register(StructuredDataSource);
        generator.register(MetaTagSource);
        generator
    }

    /// Create a generator without sources
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source; sources run in registration order
    pub fn register<S: CandidateSource + 'static>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    /// Run every source over `html`
    pub fn generate(&self, html: &str) -> Vec<RawCandidate> {
        let mut pool = Vec::new();

        for source in &self.sources {
            let method = source.method();
            let found = source.candidates(html);
            tracing::debug!(method = %method, count = found.len(), "Candidates collected");

            pool.extend(found.into_iter().map(|text| RawCandidate { text, method }));
        }

        pool
    }
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_GENERATOR: Lazy<CandidateGenerator> = Lazy::new(CandidateGenerator::new);

/// Generate candidates with the standard strategies
pub fn generate_candidates(html: &str) -> Vec<RawCandidate> {
    DEFAULT_GENERATOR.generate(html)
}

// ============================================================================
// Tests
// ============================================================================
