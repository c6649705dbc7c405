//! Tag scanning over unparsed markup
//!
//! Pages are not parsed into a tree. Opening tags are located with a regex
//! per tag name, attributes are read from the tag text, and an element ends
//! at the first closing tag of the same name (nesting is not tracked).

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::rules::TagName;

/// `name`, `name="v"`, `name='v'` or `name=v`
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// Build the opening-tag regex for `tag`; group 1 holds the attribute text.
///
/// A `>` inside a quoted value does not end the tag.
pub(crate) fn open_tag_regex(tag: TagName) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(
        r#"<{}(\s(?:[^>"']|"[^"]*"|'[^']*')*)?/?>"#,
        tag_pattern(tag)
    ))
        .case_insensitive(true)
        .build()
}

/// Build the closing-tag regex for `tag`
pub(crate) fn close_tag_regex(tag: TagName) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"</{}\s*>", tag_pattern(tag)))
        .case_insensitive(true)
        .build()
}

fn tag_pattern(tag: TagName) -> String {
    match tag {
        TagName::Named(name) => regex::escape(name),
        TagName::AnyHeading => r"h\d".to_string(),
    }
}

/// An opening tag found in a document
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenTag<'h> {
    pub start: usize,
    pub end: usize,
    attribute_text: &'h str,
}

impl<'h> OpenTag<'h> {
    /// Attributes in source order as `(name, raw value)`; valueless
    /// attributes have an empty value
    pub fn attributes(&self) -> impl Iterator<Item = (&'h str, &'h str)> {
        ATTRIBUTE.captures_iter(self.attribute_text).map(|caps| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            (name, value)
        })
    }

    /// First value of the attribute called `name` (ASCII case-insensitive)
    pub fn attribute(&self, name: &str) -> Option<&'h str> {
        self.attributes()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

/// An element spanning from its opening tag to the next matching close tag
#[derive(Debug, Clone, Copy)]
pub(crate) struct Element<'h> {
    pub outer: &'h str,
    pub inner: &'h str,
    pub end: usize,
}

/// Find the first opening tag at or after `from` that `accept` agrees to
pub(crate) fn find_open_tag<'h, F>(
    open: &Regex,
    html: &'h str,
    from: usize,
    accept: F,
) -> Option<OpenTag<'h>>
where
    F: Fn(&OpenTag<'h>) -> bool,
{
    let mut pos = from;
    while pos <= html.len() {
        let caps = open.captures_at(html, pos)?;
        let whole = caps.get(0)?;
        let tag = OpenTag {
            start: whole.start(),
            end: whole.end(),
            attribute_text: caps.get(1).map_or("", |m| m.as_str()),
        };
        if accept(&tag) {
            return Some(tag);
        }
        pos = whole.end();
    }
    None
}

/// Collect non-overlapping elements whose opening tag `accept` agrees to
pub(crate) fn find_elements<'h, F>(
    open: &Regex,
    close: &Regex,
    html: &'h str,
    accept: F,
) -> Vec<Element<'h>>
where
    F: Fn(&OpenTag<'h>) -> bool,
{
    let mut elements = Vec::new();
    let mut pos = 0;

    while let Some(tag) = find_open_tag(open, html, pos, &accept) {
        // Without a closing tag after this one, later openings cannot close either
        let Some(close_match) = close.find_at(html, tag.end) else {
            break;
        };

        elements.push(Element {
            outer: &html[tag.start..close_match.end()],
            inner: &html[tag.end..close_match.start()],
            end: close_match.end(),
        });
        pos = close_match.end();
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div() -> (Regex, Regex) {
        (
            open_tag_regex(TagName::Named("div")).unwrap(),
            close_tag_regex(TagName::Named("div")).unwrap(),
        )
    }

    #[test]
    fn test_attribute_quoting_styles() {
        let (open, _) = div();
        let html = r#"<div id=main class='paper abstract' data-x="1" hidden>"#;
        let tag = find_open_tag(&open, html, 0, |_| true).unwrap();

        assert_eq!(tag.attribute("id"), Some("main"));
        assert_eq!(tag.attribute("CLASS"), Some("paper abstract"));
        assert_eq!(tag.attribute("data-x"), Some("1"));
        assert_eq!(tag.attribute("hidden"), Some(""));
        assert_eq!(tag.attribute("role"), None);
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let (open, close) = div();
        let html = r#"<div title="a > b" class='x>y'>body</div>"#;
        let tag = find_open_tag(&open, html, 0, |_| true).unwrap();

        assert_eq!(tag.attribute("title"), Some("a > b"));
        assert_eq!(tag.attribute("class"), Some("x>y"));
        assert_eq!(find_elements(&open, &close, html, |_| true)[0].inner, "body");
    }

    #[test]
    fn test_unterminated_quote_does_not_match() {
        let (open, _) = div();
        let html = r#"<div class="open>text <div id=next>"#;
        let tag = find_open_tag(&open, html, 0, |_| true).unwrap();
        assert_eq!(tag.attribute("id"), Some("next"));
    }

    #[test]
    fn test_tag_name_is_exact() {
        let (open, _) = div();
        assert!(find_open_tag(&open, "<divider class=x>", 0, |_| true).is_none());
        assert!(find_open_tag(&open, "<DIV>", 0, |_| true).is_some());
    }

    #[test]
    fn test_elements_end_at_first_close() {
        let (open, close) = div();
        let html = "<div a><div>inner</div> tail</div><div b>second</div>";
        let elements = find_elements(&open, &close, html, |t| t.attribute("a").is_some() || t.attribute("b").is_some());

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].outer, "<div a><div>inner</div>");
        assert_eq!(elements[0].inner, "<div>inner");
        assert_eq!(elements[1].inner, "second");
    }

    #[test]
    fn test_unclosed_element_is_skipped() {
        let (open, close) = div();
        assert!(find_elements(&open, &close, "<div class=x>never closed", |_| true).is_empty());
    }

    #[test]
    fn test_heading_tags() {
        let open = open_tag_regex(TagName::AnyHeading).unwrap();
        assert!(find_open_tag(&open, "<h2 class=t>", 0, |_| true).is_some());
        assert!(find_open_tag(&open, "<header>", 0, |_| true).is_none());
        assert!(find_open_tag(&open, "<hr>", 0, |_| true).is_none());
    }
}
