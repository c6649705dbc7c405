//! Property tests for the extraction pipeline

use pax_extractor::{
    deduplicate, extract_all_abstracts, normalize, select_best, QualityFilter, LENGTH_PROXIMITY,
};
use proptest::prelude::*;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Markup-flavoured input built from fragments the rules look for
fn html_fragment() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "<div class=\"abstract\">",
        "</div>",
        "<section id=\"Abs1\">",
        "</section>",
        "<h2>Abstract</h2>",
        "<h3>Summary</h3>",
        "<script type=\"application/ld+json\">",
        "</script>",
        "{\"description\": \"",
        "\"}",
        "<meta name=\"description\" content=\"",
        "\">",
        "<!--",
        "-->",
        "&amp;",
        "&#8212;",
        "We measure the effect of noise on training. ",
        "Results hold across all tested settings. ",
        "SHOUTING HEADER TEXT ",
        "Show more",
        "...",
        "\n  ",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_arbitrary_input_never_panics(input in "\\PC{0,400}") {
        let _ = extract_all_abstracts(&input);
    }

    #[test]
    fn prop_surfaced_abstracts_are_valid(html in html_fragment()) {
        let filter = QualityFilter::default();
        let found = extract_all_abstracts(&html);

        for text in &found {
            prop_assert!(filter.passes(text), "surfaced text fails the filter: {text:?}");
        }
        for (i, a) in found.iter().enumerate() {
            for b in &found[i + 1..] {
                prop_assert!(char_len(a).abs_diff(char_len(b)) >= LENGTH_PROXIMITY);
            }
        }
        for pair in found.windows(2) {
            prop_assert!(char_len(&pair[0]) >= char_len(&pair[1]));
        }
    }

    #[test]
    fn prop_normalize_is_idempotent(text in "[a-zA-Z0-9 ,.!?\n\t]{0,300}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn prop_dedup_keeps_lengths_apart(lengths in prop::collection::vec(0usize..400, 0..30)) {
        let texts: Vec<String> = lengths.iter().map(|&n| "a".repeat(n)).collect();
        let unique = deduplicate(texts.clone());

        prop_assert!(unique.len() <= texts.len());
        for (i, a) in unique.iter().enumerate() {
            for b in &unique[i + 1..] {
                prop_assert!(a.len().abs_diff(b.len()) >= LENGTH_PROXIMITY);
            }
        }
        if let Some(first) = texts.first() {
            prop_assert_eq!(&unique[0], first);
        }
    }

    #[test]
    fn prop_select_best_is_first_longest(texts in prop::collection::vec("[a-z]{0,20}", 0..20)) {
        let expected = texts
            .iter()
            .map(|t| char_len(t))
            .max()
            .and_then(|max| texts.iter().find(|t| char_len(t) == max).cloned());

        prop_assert_eq!(select_best(texts), expected);
    }

    #[test]
    fn prop_filter_pass_implies_bounds(text in "[A-Za-z .]{0,200}") {
        if QualityFilter::new(50, 5000).passes(&text) {
            let length = char_len(&text);
            prop_assert!((50..=5000).contains(&length));

            let words = text.split_whitespace().count();
            prop_assert!((10..=1000).contains(&words));

            let upper = text.chars().filter(|c| c.is_uppercase()).count();
            prop_assert!(upper as f64 / length as f64 <= 0.4);
        }
    }
}
