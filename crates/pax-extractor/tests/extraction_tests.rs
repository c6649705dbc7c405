//! End-to-end extraction tests over small HTML documents
//!
//! Author: hephaex@gmail.com

use pax_core::ExtractorConfig;
use pax_extractor::{
    extract_abstract, extract_all_abstracts, extract_with_metadata, AbstractExtractor,
    ExtractionResult, QualityFilter, Rejection, SelectionMode,
};

const SENTENCES: [&str; 12] = [
    "Deep neural networks have transformed how we process natural language.",
    "We study the robustness of these models under distribution shift.",
    "Our experiments cover twelve benchmarks drawn from five different domains.",
    "Results show that accuracy drops sharply when test data changes.",
    "We propose a simple training objective that reduces this gap.",
    "The method adds almost no cost during training or inference.",
    "It improves worst case accuracy by nine points on average.",
    "Gains are largest for small models &amp; low resource languages.",
    "We also analyse which features the models rely on most.",
    "Spurious lexical cues explain a large share of the errors.",
    "Removing those cues from training data helps but is costly.",
    "Code and data are released to support further research work.",
];

/// Prose of exactly `len` characters without trailing whitespace
fn prose(len: usize) -> String {
    let mut text: String = "Alpha beta gamma delta epsilon. "
        .repeat(len / 32 + 1)
        .chars()
        .take(len)
        .collect();
    if text.ends_with(' ') {
        text.pop();
        text.push('x');
    }
    text
}

// =============================================================================
// Single Abstract
// =============================================================================

#[test]
fn test_container_abstract_with_entities() {
    let html = format!(
        "<html><body><h1>Robust Models</h1>\n<div class=\"abstract\">\n<p>{}</p>\n<p>{}</p>\n</div></body></html>",
        SENTENCES[..6].join(" "),
        SENTENCES[6..].join(" "),
    );
    let expected = SENTENCES.join(" ").replace("&amp;", "&");

    let best = extract_abstract(&html).expect("abstract found");
    assert_eq!(best, expected);
    assert_eq!(best.split_whitespace().count(), 120);

    // Two rules match the same container; one copy survives
    assert_eq!(extract_all_abstracts(&html), vec![expected]);
}

#[test]
fn test_short_meta_description_not_found() {
    let html = r#"<html><head><meta name="description" content="A short summary"></head><body></body></html>"#;

    assert_eq!(extract_abstract(html), None);
    assert!(extract_all_abstracts(html).is_empty());
    assert_eq!(
        AbstractExtractor::new().run(html, SelectionMode::WithMetadata),
        ExtractionResult::NotFound
    );
}

#[test]
fn test_json_ld_and_section_collapse() {
    let text = SENTENCES[..4].join(" ");
    let spaced = SENTENCES[..4].join("\n      ");
    let html = format!(
        r#"<head><script type="application/ld+json">{{"@type": "ScholarlyArticle", "description": "{text}"}}</script></head>
        <body><section id="Abs1">
            <h2>Abstract</h2>
            <p>
      {spaced}
            </p>
        </section></body>"#
    );

    let all = extract_all_abstracts(&html);
    assert_eq!(all.len(), 1);
    // Structural candidates come first, so the section copy survives
    assert!(all[0].starts_with("Abstract "));
    assert!(all[0].ends_with(&text));
}

#[test]
fn test_meta_description_with_comparison() {
    let description = "We prove the bound holds whenever n > 10 for every graph family studied. \
                       Experiments on synthetic data confirm the predicted scaling behaviour.";
    let html = format!(r#"<html><head><meta name="description" content="{description}"></head></html>"#);

    assert_eq!(extract_abstract(&html), Some(description.to_string()));
}

#[test]
fn test_uppercase_block_rejected() {
    let shouting = "ABSTRACT OF THE STUDY ON LARGE MODELS. RESULTS AND METHODS ARE LISTED BELOW HERE";
    assert_eq!(shouting.chars().count(), 80);
    assert!(matches!(
        QualityFilter::default().assess(shouting),
        pax_extractor::QualityVerdict::Reject(Rejection::MostlyUppercase { .. })
    ));

    let html = format!(r#"<div class="abstract">{shouting}</div>"#);
    assert_eq!(extract_abstract(&html), None);
}

// =============================================================================
// Several Abstracts
// =============================================================================

#[test]
fn test_ranked_by_length() {
    let (short, long, middle) = (prose(200), prose(500), prose(350));
    let html = format!(
        r#"<div class="abstract">{short}</div>
           <blockquote class="abstract">{long}</blockquote>
           <article id="abstract">{middle}</article>"#
    );

    assert_eq!(extract_all_abstracts(&html), vec![long.clone(), middle, short]);
    assert_eq!(extract_abstract(&html), Some(long));
}

#[test]
fn test_metadata_for_best() {
    let html = format!(r#"<div role="doc-abstract">{}</div>"#, SENTENCES[..3].join(" "));
    let meta = extract_with_metadata(&html).expect("abstract found");

    assert_eq!(meta.word_count, 30);
    assert_eq!(meta.sentence_count, 4);
    assert_eq!(meta.length, meta.text.chars().count());
    assert!(!meta.has_digit);
}

#[test]
fn test_configured_bounds() {
    let html = format!(r#"<div class="abstract">{}</div>"#, prose(400));
    let narrow = AbstractExtractor::with_config(ExtractorConfig {
        min_length: 50,
        max_length: 300,
        verbose: false,
    })
    .unwrap();

    assert_eq!(narrow.extract(&html), None);
    assert!(AbstractExtractor::new().extract(&html).is_some());
}

// =============================================================================
// Malformed Input
// =============================================================================

#[test]
fn test_malformed_html_does_not_fail() {
    let abstract_text = SENTENCES[..3].join(" ");
    let html = format!(
        r#"<html><head>
            <script type="application/ld+json">{{ "description": "broken </script>
            <meta name="description" content="unterminated
        </head><body>
            <div class="abstract"><p>{abstract_text}</p></div>
            <section id="abstract"><p>never closed
            <!-- dangling comment"#
    );

    assert_eq!(extract_abstract(&html), Some(abstract_text));
}

#[test]
fn test_empty_and_markup_only() {
    assert_eq!(extract_abstract(""), None);
    assert_eq!(extract_abstract("<div class=\"abstract\"></div>"), None);
    assert_eq!(extract_abstract("<<<>>> &amp; <div"), None);
}
