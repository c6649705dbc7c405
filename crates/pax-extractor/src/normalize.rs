//! Text normalization
//!
//! Turns a raw candidate (a fragment of markup, or a JSON/meta string that
//! may still carry entities) into plain text. Ordering matters: code-bearing
//! blocks and comments go before generic tag stripping so their contents
//! never leak, and entities are decoded only after tags are gone.
//!
//! Author: hephaex@gmail.com

use once_cell::sync::Lazy;
use regex::Regex;

/// Named entities that are decoded; applied entry by entry, in this order
pub const ENTITY_TABLE: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&mdash;", "\u{2014}"),
    ("&ndash;", "\u{2013}"),
    ("&ldquo;", "\""),
    ("&rdquo;", "\""),
    ("&lsquo;", "'"),
    ("&rsquo;", "'"),
    ("&hellip;", "\u{2026}"),
    ("&deg;", "\u{b0}"),
    ("&copy;", "\u{a9}"),
];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("normalizer pattern is valid")
}

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| regex(r"(?is)<script\b[^>]*>.*?</script\s*>"));
static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| regex(r"(?is)<style\b[^>]*>.*?</style\s*>"));
static EMBEDDED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?is)<noscript\b[^>]*>.*?</noscript\s*>|<iframe\b[^>]*>.*?</iframe\s*>|<embed\b[^>]*>.*?</embed\s*>",
    )
});
static COMMENT: Lazy<Regex> = Lazy::new(|| regex(r"(?s)<!--.*?-->"));
static TAG: Lazy<Regex> = Lazy::new(|| regex(r"<[^>]+>"));
static OTHER_ENTITY: Lazy<Regex> = Lazy::new(|| regex(r"&#?\w+;"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| regex(r"\s+"));
static SHOW_MORE: Lazy<Regex> = Lazy::new(|| regex(r"(?i)\s*show more.*$"));
static TRAILING_ELLIPSIS: Lazy<Regex> = Lazy::new(|| regex(r"(?:\s*\.\.\.)+$"));

/// Reduce a raw candidate to plain text. Never fails; markup-only input
/// yields an empty string.
pub fn normalize(raw: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(raw, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = EMBEDDED_BLOCK.replace_all(&text, "");
    let text = COMMENT.replace_all(&text, "");
    let mut text = TAG.replace_all(&text, "").into_owned();

    for &(entity, replacement) in ENTITY_TABLE {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }

    // Anything not in the table is dropped, not preserved
    let text = OTHER_ENTITY.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SHOW_MORE.replace(text.trim(), "");
    let text = TRAILING_ELLIPSIS.replace(&text, "");

    text.into_owned()
}
