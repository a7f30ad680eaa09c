//! The queryable document.

use crate::error::AnalysisError;
use scraper::{Html, Selector};
use thiserror::Error;

/// A document selectors can be matched against.
///
/// Analyzers only ever ask whether a selector matches at least one element,
/// so test doubles can answer from a fixed table.
pub trait Document {
    /// Returns true if at least one element matches `selector`.
    fn matches(&self, selector: &str) -> Result<bool, SelectorError>;
}

/// A selector the document could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{selector}': {message}")]
pub struct SelectorError {
    /// The selector text that was queried.
    pub selector: String,
    /// Why it was rejected.
    pub message: String,
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses normalized markup.
    ///
    /// The HTML parser recovers from any input, so only markup with no content
    /// at all is rejected.
    pub fn parse(markup: &str) -> Result<Self, AnalysisError> {
        if markup.trim().is_empty() {
            return Err(AnalysisError::MarkupParse {
                message: "markup is empty".to_string(),
            });
        }
        Ok(Self {
            html: Html::parse_document(markup),
        })
    }

    /// Text content of the first `<style>` element.
    pub fn style_text(&self) -> Option<String> {
        let selector = Selector::parse("style").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect())
    }
}

impl Document for HtmlDocument {
    fn matches(&self, selector: &str) -> Result<bool, SelectorError> {
        let parsed = Selector::parse(selector).map_err(|err| SelectorError {
            selector: selector.to_string(),
            message: err.to_string(),
        })?;
        Ok(self.html.select(&parsed).next().is_some())
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument").finish_non_exhaustive()
    }
}
