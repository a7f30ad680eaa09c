//! Analysis findings.

/// A selector that matched no element of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnusedSelector {
    /// The selector exactly as written in the stylesheet.
    pub selector: String,
    /// Condition of the `@media` block holding the rule, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub media: Option<String>,
}

/// A declaration whose property is set again by a later rule with the same
/// selector in the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OverwrittenProperty {
    /// The selector shared by both rules.
    pub selector: String,
    /// The property name as written in the earlier rule.
    pub property: String,
    /// Condition of the `@media` block holding both rules, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub media: Option<String>,
}

/// Everything found in one source, in stylesheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnalysisResult {
    /// Selectors that match nothing.
    pub unused: Vec<UnusedSelector>,
    /// Declarations replaced later in the same scope.
    pub overwritten: Vec<OverwrittenProperty>,
}

impl AnalysisResult {
    /// Returns true if nothing was found.
    pub fn is_clean(&self) -> bool {
        self.unused.is_empty() && self.overwritten.is_empty()
    }

    /// Total number of findings.
    pub fn len(&self) -> usize {
        self.unused.len() + self.overwritten.len()
    }

    /// Same as [`AnalysisResult::is_clean`].
    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }
}
