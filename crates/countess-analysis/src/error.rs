//! Analysis errors.

use countess_css::ParseError;
use countess_template::{Construct, TemplateError};
use thiserror::Error;

/// Longest excerpt of style text kept on a stylesheet error.
const SNIPPET_LEN: usize = 60;

/// An error that stopped a source from being analyzed.
///
/// Errors abort the whole analysis: no partial result accompanies them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A script, comment or mixin was opened and never closed.
    #[error("malformed template: unterminated {construct} starting at '{opening}' (expected '{expected}')")]
    MalformedTemplate {
        /// What was being removed.
        construct: Construct,
        /// The word that opened it.
        opening: String,
        /// The terminator that was never found.
        expected: &'static str,
    },

    /// The normalized markup yields no usable document.
    #[error("could not parse markup: {message}")]
    MarkupParse {
        /// What went wrong.
        message: String,
    },

    /// The document has no `<style>` element.
    #[error("no <style> element found")]
    StyleBlockNotFound,

    /// The style text is not valid CSS.
    #[error("could not parse stylesheet: {error} near '{snippet}'")]
    StylesheetParse {
        /// The parser's error; its span points into the style text.
        #[source]
        error: ParseError,
        /// The offending style text.
        snippet: String,
    },

    /// The document rejected a selector.
    #[error("selector '{selector}' could not be evaluated: {message}")]
    SelectorEvaluation {
        /// The selector as written in the stylesheet.
        selector: String,
        /// Why it was rejected.
        message: String,
    },
}

impl AnalysisError {
    /// Wraps a stylesheet parse error with the text it points at.
    pub fn stylesheet(error: ParseError, style: &str) -> Self {
        let snippet = snippet_at(&error, style);
        AnalysisError::StylesheetParse { error, snippet }
    }

    /// The source text this error is attributed to, if any.
    pub fn offending_text(&self) -> Option<&str> {
        match self {
            AnalysisError::MalformedTemplate { opening, .. } => Some(opening),
            AnalysisError::StylesheetParse { snippet, .. } if !snippet.is_empty() => Some(snippet),
            AnalysisError::SelectorEvaluation { selector, .. } => Some(selector),
            _ => None,
        }
    }
}

impl From<TemplateError> for AnalysisError {
    fn from(error: TemplateError) -> Self {
        match error {
            TemplateError::Unterminated {
                construct,
                opening,
                expected,
            } => AnalysisError::MalformedTemplate {
                construct,
                opening,
                expected,
            },
        }
    }
}

/// The statement the error points at: from the end of the previous
/// declaration or rule up to the end of the error span, first line only.
fn snippet_at(error: &ParseError, style: &str) -> String {
    let start = usize::from(error.span.start).min(style.len());
    let end = usize::from(error.span.end).clamp(start, style.len());
    let from = style
        .get(..start)
        .and_then(|before| before.rfind(|c: char| c == '}' || c == ';'))
        .map_or(0, |at| at + 1);

    let text = style
        .get(from..end)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .or_else(|| {
            style
                .get(..end)
                .map(str::trim_end)
                .and_then(|text| text.rsplit('\n').next())
        })
        .unwrap_or("");

    let line = text.trim().lines().next().unwrap_or("");
    line.char_indices()
        .nth(SNIPPET_LEN)
        .map_or(line, |(at, _)| &line[..at])
        .to_string()
}
