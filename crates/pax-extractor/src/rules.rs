//! Structural rule library
//!
//! Publishers wrap abstracts in many different containers. Each known layout
//! is described declaratively as a [`Rule`] and every rule is evaluated by
//! the same [`StructuralMatcher`]. Rules overlap on purpose: several target
//! the generic `class` containing "abstract" shape because sites nest it
//! differently, and the surplus is removed later by filtering and dedup.
//!
//! Author: hephaex@gmail.com

use regex::{Regex, RegexBuilder};

use crate::markup::{self, OpenTag};
use crate::{CandidateSource, ExtractionMethod};

// ============================================================================
// Rule Descriptors
// ============================================================================

/// Element name a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagName {
    /// A specific element, e.g. `div`
    Named(&'static str),
    /// Any of `h0`..`h9`
    AnyHeading,
}

/// Condition on an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMatch {
    Contains(&'static str),
    Equals(&'static str),
    StartsWith(&'static str),
    /// Regular expression, unanchored
    Pattern(&'static str),
}

/// Attribute that must be present with a matching value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: &'static str,
    pub value: ValueMatch,
}

/// Element whose content is the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerRule {
    pub label: &'static str,
    pub tag: TagName,
    /// All conditions must hold, in any attribute order
    pub attributes: &'static [AttributeMatch],
    pub case_sensitive: bool,
}

/// Opening tag that ends a heading rule's region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub tag: TagName,
    pub attributes: &'static [AttributeMatch],
}

/// Heading with a fixed title; the candidate runs from the heading to the
/// first boundary after it, or to the end of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingRule {
    pub label: &'static str,
    pub title: &'static str,
    pub boundaries: &'static [Boundary],
    pub case_sensitive: bool,
}

/// A structural rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Container(ContainerRule),
    Heading(HeadingRule),
}

impl Rule {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Container(rule) => rule.label,
            Self::Heading(rule) => rule.label,
        }
    }
}

// ============================================================================
// Default Library
// ============================================================================

const CLASS_ABSTRACT: &[AttributeMatch] = &[AttributeMatch {
    name: "class",
    value: ValueMatch::Contains("abstract"),
}];

const ID_ABSTRACT: &[AttributeMatch] = &[AttributeMatch {
    name: "id",
    value: ValueMatch::Equals("abstract"),
}];

const ABSTRACT_BOUNDARIES: &[Boundary] = &[
    Boundary {
        tag: TagName::AnyHeading,
        attributes: &[],
    },
    Boundary {
        tag: TagName::Named("section"),
        attributes: &[],
    },
    Boundary {
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "class",
            value: ValueMatch::Pattern("article|paper|publication"),
        }],
    },
    Boundary {
        tag: TagName::Named("footer"),
        attributes: &[],
    },
    Boundary {
        tag: TagName::Named("nav"),
        attributes: &[],
    },
];

const SUMMARY_BOUNDARIES: &[Boundary] = &[
    Boundary {
        tag: TagName::AnyHeading,
        attributes: &[],
    },
    Boundary {
        tag: TagName::Named("section"),
        attributes: &[],
    },
    Boundary {
        tag: TagName::Named("div"),
        attributes: &[],
    },
    Boundary {
        tag: TagName::Named("footer"),
        attributes: &[],
    },
];

/// Known abstract layouts, in evaluation order
pub static DEFAULT_RULES: &[Rule] = &[
    // IEEE
    Rule::Container(ContainerRule {
        label: "div.class~abstract",
        tag: TagName::Named("div"),
        attributes: CLASS_ABSTRACT,
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "section.class~abstract",
        tag: TagName::Named("section"),
        attributes: CLASS_ABSTRACT,
        case_sensitive: false,
    }),
    // Springer
    Rule::Container(ContainerRule {
        label: "div#Abs1",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "id",
            value: ValueMatch::Equals("Abs1"),
        }],
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "section#AbsN",
        tag: TagName::Named("section"),
        attributes: &[AttributeMatch {
            name: "id",
            value: ValueMatch::Pattern(r"^Abs\d+$"),
        }],
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "div.class~springer-abstract",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "class",
            value: ValueMatch::Pattern("springer.*abstract"),
        }],
        case_sensitive: false,
    }),
    // ScienceDirect
    Rule::Container(ContainerRule {
        label: "div.class~abstract (sciencedirect)",
        tag: TagName::Named("div"),
        attributes: CLASS_ABSTRACT,
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "section[data-testid^=abstract]",
        tag: TagName::Named("section"),
        attributes: &[AttributeMatch {
            name: "data-testid",
            value: ValueMatch::StartsWith("abstract"),
        }],
        case_sensitive: false,
    }),
    // ACM Digital Library
    Rule::Container(ContainerRule {
        label: "div#~abstract",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "id",
            value: ValueMatch::Contains("abstract"),
        }],
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "section.class~abstractSection",
        tag: TagName::Named("section"),
        attributes: &[AttributeMatch {
            name: "class",
            value: ValueMatch::Contains("abstractSection"),
        }],
        case_sensitive: false,
    }),
    // JMLR
    Rule::Container(ContainerRule {
        label: "div.class~paper-abstract",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "class",
            value: ValueMatch::Contains("paper-abstract"),
        }],
        case_sensitive: false,
    }),
    // arXiv
    Rule::Container(ContainerRule {
        label: "blockquote.class~abstract",
        tag: TagName::Named("blockquote"),
        attributes: CLASS_ABSTRACT,
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "span.class~abstract",
        tag: TagName::Named("span"),
        attributes: CLASS_ABSTRACT,
        case_sensitive: false,
    }),
    // Generic
    Rule::Container(ContainerRule {
        label: "div[role=doc-abstract]",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "role",
            value: ValueMatch::Equals("doc-abstract"),
        }],
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "article#abstract",
        tag: TagName::Named("article"),
        attributes: ID_ABSTRACT,
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "div#abstract",
        tag: TagName::Named("div"),
        attributes: ID_ABSTRACT,
        case_sensitive: false,
    }),
    Rule::Container(ContainerRule {
        label: "section#abstract",
        tag: TagName::Named("section"),
        attributes: ID_ABSTRACT,
        case_sensitive: false,
    }),
    // Headings
    Rule::Heading(HeadingRule {
        label: "heading:Abstract",
        title: "Abstract",
        boundaries: ABSTRACT_BOUNDARIES,
        case_sensitive: false,
    }),
    Rule::Heading(HeadingRule {
        label: "heading:Summary",
        title: "Summary",
        boundaries: SUMMARY_BOUNDARIES,
        case_sensitive: false,
    }),
    // OpenReview
    Rule::Container(ContainerRule {
        label: "div.class~note_content_value",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "class",
            value: ValueMatch::Contains("note_content_value"),
        }],
        case_sensitive: false,
    }),
    // ResearchGate
    Rule::Container(ContainerRule {
        label: "div.class~abstract-text",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "class",
            value: ValueMatch::Contains("abstract-text"),
        }],
        case_sensitive: false,
    }),
    // Semantic Scholar
    Rule::Container(ContainerRule {
        label: "div[data-test-id=paper-abstract]",
        tag: TagName::Named("div"),
        attributes: &[AttributeMatch {
            name: "data-test-id",
            value: ValueMatch::Equals("paper-abstract"),
        }],
        case_sensitive: false,
    }),
];

// ============================================================================
// Compiled Rules
// ============================================================================

enum ValueMatcher {
    Contains(String),
    Equals(String),
    StartsWith(String),
    Pattern(Regex),
}

struct AttributeMatcher {
    name: &'static str,
    value: ValueMatcher,
    case_sensitive: bool,
}

impl AttributeMatcher {
    fn compile(condition: &AttributeMatch, case_sensitive: bool) -> Result<Self, regex::Error> {
        let fold = |s: &str| {
            if case_sensitive {
                s.to_string()
            } else {
                s.to_lowercase()
            }
        };

        let value = match condition.value {
            ValueMatch::Contains(needle) => ValueMatcher::Contains(fold(needle)),
            ValueMatch::Equals(expected) => ValueMatcher::Equals(fold(expected)),
            ValueMatch::StartsWith(prefix) => ValueMatcher::StartsWith(fold(prefix)),
            ValueMatch::Pattern(pattern) => ValueMatcher::Pattern(
                RegexBuilder::new(pattern)
                    .case_insensitive(!case_sensitive)
                    .build()?,
            ),
        };

        Ok(Self {
            name: condition.name,
            value,
            case_sensitive,
        })
    }

    fn matches(&self, tag: &OpenTag<'_>) -> bool {
        tag.attributes()
            .filter(|(name, _)| name.eq_ignore_ascii_case(self.name))
            .any(|(_, raw)| {
                let value = if self.case_sensitive {
                    raw.to_string()
                } else {
                    raw.to_lowercase()
                };
                match &self.value {
                    ValueMatcher::Contains(needle) => value.contains(needle.as_str()),
                    ValueMatcher::Equals(expected) => value == *expected,
                    ValueMatcher::StartsWith(prefix) => value.starts_with(prefix.as_str()),
                    ValueMatcher::Pattern(regex) => regex.is_match(raw),
                }
            })
    }
}

/// Opening-tag regex plus the attribute conditions a tag must satisfy
struct TagMatcher {
    open: Regex,
    attributes: Vec<AttributeMatcher>,
}

impl TagMatcher {
    fn compile(
        tag: TagName,
        conditions: &[AttributeMatch],
        case_sensitive: bool,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            open: markup::open_tag_regex(tag)?,
            attributes: conditions
                .iter()
                .map(|c| AttributeMatcher::compile(c, case_sensitive))
                .collect::<Result<_, _>>()?,
        })
    }

    fn accepts(&self, tag: &OpenTag<'_>) -> bool {
        self.attributes.iter().all(|condition| condition.matches(tag))
    }
}

enum CompiledRule {
    Container {
        label: &'static str,
        open: TagMatcher,
        close: Regex,
    },
    Heading {
        label: &'static str,
        heading: Regex,
        boundaries: Vec<TagMatcher>,
    },
}

impl CompiledRule {
    fn compile(rule: &Rule) -> Result<Self, regex::Error> {
        match rule {
            Rule::Container(rule) => Ok(Self::Container {
                label: rule.label,
                open: TagMatcher::compile(rule.tag, rule.attributes, rule.case_sensitive)?,
                close: markup::close_tag_regex(rule.tag)?,
            }),
            Rule::Heading(rule) => {
                let heading = RegexBuilder::new(&format!(
                    r#"(?i:<h\d(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>)\s*{}\s*(?i:</h\d\s*>)"#,
                    regex::escape(rule.title)
                ))
                .case_insensitive(!rule.case_sensitive)
                .build()?;

                let boundaries = rule
                    .boundaries
                    .iter()
                    .map(|b| TagMatcher::compile(b.tag, b.attributes, rule.case_sensitive))
                    .collect::<Result<_, _>>()?;

                Ok(Self::Heading {
                    label: rule.label,
                    heading,
                    boundaries,
                })
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Container { label, .. } | Self::Heading { label, .. } => *label,
        }
    }

    fn find_all<'h>(&self, html: &'h str) -> Vec<&'h str> {
        match self {
            Self::Container { open, close, .. } => {
                markup::find_elements(&open.open, close, html, |tag| open.accepts(tag))
                    .into_iter()
                    .map(|element| element.outer)
                    .collect()
            }
            Self::Heading {
                heading,
                boundaries,
                ..
            } => {
                let mut found = Vec::new();
                let mut pos = 0;

                while pos <= html.len() {
                    let Some(title) = heading.find_at(html, pos) else {
                        break;
                    };

                    let end = boundaries
                        .iter()
                        .filter_map(|b| {
                            markup::find_open_tag(&b.open, html, title.end(), |tag| b.accepts(tag))
                        })
                        .map(|tag| tag.start)
                        .min()
                        .unwrap_or(html.len());

                    found.push(&html[title.start()..end]);
                    pos = end;
                }

                found
            }
        }
    }
}

// ============================================================================
// Structural Matcher
// ============================================================================

/// Evaluates a rule library against a document
pub struct StructuralMatcher {
    rules: Vec<CompiledRule>,
}

impl StructuralMatcher {
    /// Create a matcher over [`DEFAULT_RULES`]
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES)
    }

    /// Create a matcher over a custom rule set.
    ///
    /// Rules that fail to compile are skipped with a warning.
    pub fn with_rules(rules: &[Rule]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|rule| match CompiledRule::compile(rule) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!(rule = rule.label(), error = %e, "Skipping structural rule");
                    None
                }
            })
            .collect();

        Self { rules }
    }

    /// Number of usable rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// All matches of all rules, in rule order then document order
    pub fn find_all<'h>(&self, html: &'h str) -> Vec<&'h str> {
        let mut matches = Vec::new();

        for rule in &self.rules {
            let found = rule.find_all(html);
            if !found.is_empty() {
                tracing::trace!(rule = rule.label(), count = found.len(), "Structural rule matched");
            }
            matches.extend(found);
        }

        matches
    }
}

impl Default for StructuralMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for StructuralMatcher {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::StructuralPattern
    }

    fn candidates(&self, html: &str) -> Vec<String> {
        self.find_all(html).into_iter().map(str::to_string).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
