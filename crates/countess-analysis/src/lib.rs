//! Stylesheet analysis for countess.
//!
//! Given the source of a page or web component, this crate reports
//!
//! - selectors of its first `<style>` element that match nothing in the
//!   markup, and
//! - declarations whose property is set again by a later rule with the same
//!   selector in the same scope.
//!
//! The source is normalized by `countess-template`, parsed into a document,
//! and the style text is parsed by `countess-css`. Findings are returned in
//! stylesheet order; [`locate`] maps them back to the original source.
//!
//! # Example
//!
//! ```
//! use countess_analysis::analyze;
//!
//! let source = r#"<html><body>
//! <style>
//!   .a { color: red; }
//!   .b { color: red; }
//!   .a { color: blue; }
//! </style>
//! <div class="a"></div>
//! </body></html>"#;
//!
//! let result = analyze(source).unwrap();
//! assert_eq!(result.unused[0].selector, ".b");
//! assert_eq!(result.overwritten[0].property, "color");
//! ```

mod diagnostic;
mod document;
mod error;
pub mod locate;
mod overrides;
mod pseudo;
mod result;
mod usage;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use document::{Document, HtmlDocument, SelectorError};
pub use error::AnalysisError;
pub use overrides::find_overwritten;
pub use pseudo::{normalize_selector, PseudoClassTable, STANDARD_PSEUDO_CLASSES};
pub use result::{AnalysisResult, OverwrittenProperty, UnusedSelector};
pub use usage::find_unused;

pub use countess_template::normalize_template;

use countess_css::Stylesheet;

/// Which checks to run and how selectors are normalized.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Report selectors that match nothing.
    pub unused: bool,
    /// Report overwritten declarations.
    pub overwritten: bool,
    /// Tokens stripped from selectors before they are queried.
    pub pseudo_classes: PseudoClassTable,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            unused: true,
            overwritten: true,
            pseudo_classes: PseudoClassTable::standard(),
        }
    }
}

impl AnalyzeOptions {
    /// Adds project-specific pseudo-classes to strip.
    pub fn with_extra_pseudo_classes<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pseudo_classes = self.pseudo_classes.with_extra(tokens);
        self
    }
}

/// Analyzes a source with both checks and the standard pseudo-class table.
pub fn analyze(source: &str) -> Result<AnalysisResult, AnalysisError> {
    analyze_with(source, &AnalyzeOptions::default())
}

/// Analyzes a source.
///
/// Any failure aborts the analysis: there is no partial result.
pub fn analyze_with(source: &str, options: &AnalyzeOptions) -> Result<AnalysisResult, AnalysisError> {
    let markup = normalize_template(source)?;
    let document = HtmlDocument::parse(&markup)?;
    let style = document
        .style_text()
        .ok_or(AnalysisError::StyleBlockNotFound)?;
    let sheet =
        countess_css::parse(&style).map_err(|error| AnalysisError::stylesheet(error, &style))?;

    analyze_stylesheet(&sheet, &document, options)
}

/// Runs the enabled checks on an already parsed stylesheet and document.
pub fn analyze_stylesheet<D: Document + ?Sized>(
    sheet: &Stylesheet,
    document: &D,
    options: &AnalyzeOptions,
) -> Result<AnalysisResult, AnalysisError> {
    let unused = if options.unused {
        find_unused(sheet, document, &options.pseudo_classes)?
    } else {
        Vec::new()
    };
    let overwritten = if options.overwritten {
        find_overwritten(sheet, document, &options.pseudo_classes)?
    } else {
        Vec::new()
    };

    Ok(AnalysisResult {
        unused,
        overwritten,
    })
}
