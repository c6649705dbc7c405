//! Extraction pipeline
//!
//! [`AbstractExtractor`] wires the stages together: generate, normalize,
//! filter, deduplicate, select. It holds only fixed configuration and
//! compiled rules, so one instance can serve concurrent callers.
//!
//! Author: hephaex@gmail.com

use once_cell::sync::Lazy;

use pax_core::{ConfigError, ExtractorConfig};

use crate::candidates::CandidateGenerator;
use crate::dedup::deduplicate;
use crate::normalize::normalize;
use crate::quality::{QualityFilter, QualityVerdict};
use crate::select::{rank_all, select_best, AbstractMetadata, ExtractionResult, SelectionMode};

/// Summary lines go to info when verbose, debug otherwise
macro_rules! report {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Abstract extraction engine
pub struct AbstractExtractor {
    config: ExtractorConfig,
    generator: CandidateGenerator,
    filter: QualityFilter,
}

impl AbstractExtractor {
    /// Create an extractor with default bounds (50..=5000 characters)
    pub fn new() -> Self {
        Self::build(ExtractorConfig::default(), CandidateGenerator::new())
    }

    /// Create an extractor with explicit configuration
    pub fn with_config(config: ExtractorConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, CandidateGenerator::new())
    }

    /// Create an extractor with a custom candidate generator
    pub fn with_generator(
        config: ExtractorConfig,
        generator: CandidateGenerator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, generator))
    }

    fn build(config: ExtractorConfig, generator: CandidateGenerator) -> Self {
        Self {
            filter: QualityFilter::from_config(&config),
            config,
            generator,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run the pipeline up to deduplication; output keeps generation order
    pub fn candidates(&self, html: &str) -> Vec<String> {
        let verbose = self.config.verbose;
        let raw = self.generator.generate(html);

        if raw.is_empty() {
            report!(verbose, "No abstract candidates found");
            return Vec::new();
        }
        report!(verbose, count = raw.len(), "Found abstract candidates");

        let passed: Vec<String> = raw
            .into_iter()
            .filter_map(|candidate| {
                let text = normalize(&candidate.text);
                match self.filter.assess(&text) {
                    QualityVerdict::Pass => Some(text),
                    QualityVerdict::Reject(reason) => {
                        tracing::debug!(method = %candidate.method, %reason, "Candidate rejected");
                        None
                    }
                }
            })
            .collect();

        if passed.is_empty() {
            report!(verbose, "No valid abstracts after filtering");
            return Vec::new();
        }

        let unique = deduplicate(passed);
        report!(verbose, count = unique.len(), "Distinct abstracts after deduplication");
        unique
    }

    /// Run the full pipeline in the requested mode
    pub fn run(&self, html: &str, mode: SelectionMode) -> ExtractionResult {
        let survivors = self.candidates(html);

        let result = match mode {
            SelectionMode::Best => select_best(survivors).map(ExtractionResult::Best),
            SelectionMode::WithMetadata => select_best(survivors)
                .map(|text| ExtractionResult::Detailed(AbstractMetadata::from_text(text))),
            SelectionMode::All => {
                let ranked = rank_all(survivors);
                (!ranked.is_empty()).then_some(ExtractionResult::Ranked(ranked))
            }
        };

        match result {
            Some(result) => {
                if let Some(best) = result.texts().first() {
                    let chars = best.chars().count();
                    let words = best.split_whitespace().count();
                    report!(self.config.verbose, chars, words, "Best abstract selected");
                }
                result
            }
            None => ExtractionResult::NotFound,
        }
    }

    /// Longest surviving abstract
    pub fn extract(&self, html: &str) -> Option<String> {
        match self.run(html, SelectionMode::Best) {
            ExtractionResult::Best(text) => Some(text),
            _ => None,
        }
    }

    /// Every surviving abstract, longest first
    pub fn extract_all(&self, html: &str) -> Vec<String> {
        match self.run(html, SelectionMode::All) {
            ExtractionResult::Ranked(texts) => texts,
            _ => Vec::new(),
        }
    }

    /// Longest surviving abstract with its statistics
    pub fn extract_with_metadata(&self, html: &str) -> Option<AbstractMetadata> {
        match self.run(html, SelectionMode::WithMetadata) {
            ExtractionResult::Detailed(metadata) => Some(metadata),
            _ => None,
        }
    }
}

impl Default for AbstractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

static DEFAULT_EXTRACTOR: Lazy<AbstractExtractor> = Lazy::new(AbstractExtractor::new);

/// Extract the best abstract with default configuration
pub fn extract_abstract(html: &str) -> Option<String> {
    DEFAULT_EXTRACTOR.extract(html)
}

/// Extract all abstracts with default configuration
pub fn extract_all_abstracts(html: &str) -> Vec<String> {
    DEFAULT_EXTRACTOR.extract_all(html)
}

/// Extract the best abstract and its metadata with default configuration
pub fn extract_with_metadata(html: &str) -> Option<AbstractMetadata> {
    DEFAULT_EXTRACTOR.extract_with_metadata(html)
}
