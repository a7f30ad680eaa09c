//! Stylesheet tree types.

use smol_str::SmolStr;
use source_map::Span;

/// A parsed stylesheet: its top-level rules in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stylesheet {
    /// Top-level rules.
    pub rules: Vec<Rule>,
}

/// A top-level or media-nested rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Rule {
    /// `selectors { declarations }`
    Style(StyleRule),
    /// `@media condition { rules }`
    Media(MediaRule),
    /// Any other at-rule (`@import`, `@font-face`, `@keyframes`, ...).
    AtRule(AtRule),
}

impl Rule {
    /// Returns the span of the whole rule.
    pub fn span(&self) -> Span {
        match self {
            Rule::Style(rule) => rule.span,
            Rule::Media(rule) => rule.span,
            Rule::AtRule(rule) => rule.span,
        }
    }

    /// Returns the style rule, if this is one.
    pub fn as_style(&self) -> Option<&StyleRule> {
        match self {
            Rule::Style(rule) => Some(rule),
            _ => None,
        }
    }
}

/// A rule with a selector group and a declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StyleRule {
    /// Selectors of the comma-separated group, as written.
    pub selectors: Vec<String>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// From the first selector character to the closing brace.
    pub span: Span,
}

impl StyleRule {
    /// Returns true if the group contains exactly this selector text.
    pub fn has_selector(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }
}

/// A `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Declaration {
    /// The property name, as written.
    pub property: SmolStr,
    /// The value text, including any `!important`.
    pub value: String,
    /// From the property to the terminating `;` (or the last value character).
    pub span: Span,
}

impl Declaration {
    /// Returns true if the value carries the `!important` marker.
    pub fn is_important(&self) -> bool {
        self.value.contains("!important")
    }
}

/// An `@media` block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MediaRule {
    /// The media condition, e.g. `(max-width:600px)`.
    pub condition: String,
    /// Rules inside the block.
    pub rules: Vec<Rule>,
    /// From `@media` to the closing brace.
    pub span: Span,
}

impl MediaRule {
    /// Style rules directly inside this block. Deeper nesting is not visited.
    pub fn style_rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter().filter_map(Rule::as_style)
    }
}

/// An at-rule other than `@media`, kept for completeness but never analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AtRule {
    /// The name without `@`.
    pub name: SmolStr,
    /// Everything between the name and `;` or `{`.
    pub prelude: String,
    /// Whether the rule had a `{ ... }` block.
    pub has_block: bool,
    /// The whole rule.
    pub span: Span,
}
