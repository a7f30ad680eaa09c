//! Diagnostic types.

use source_map::Span;

/// A diagnostic message located in the analyzed source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// The source location, as bytes of the original file.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            span,
        }
    }
}

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// A finding that does not stop the file from being analyzed.
    Warning,
    /// The file could not be analyzed.
    Error,
}

impl Severity {
    /// Returns the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes for all checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "&'static str"))]
pub enum DiagnosticCode {
    // === Findings ===
    /// `css-unused-selector`: selector matches nothing in the markup
    UnusedSelector,
    /// `css-overwritten-property`: declaration replaced by a later rule
    OverwrittenProperty,
    /// `css-syntax`: line inside a rule that is not a `name: value;` declaration
    CssSyntax,

    // === Failures ===
    /// `css-invalid-selector`: selector the document could not evaluate
    InvalidSelector,
    /// `css-parse-error`: style text is not valid CSS
    CssParseError,
    /// `template-error`: unterminated script, comment or mixin
    TemplateError,
    /// `markup-error`: markup could not be parsed into a document
    MarkupError,
    /// `missing-style`: no `<style>` element
    MissingStyle,
}

impl DiagnosticCode {
    /// Returns the default severity for this diagnostic code.
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::UnusedSelector
            | DiagnosticCode::OverwrittenProperty
            | DiagnosticCode::CssSyntax => Severity::Warning,
            DiagnosticCode::InvalidSelector
            | DiagnosticCode::CssParseError
            | DiagnosticCode::TemplateError
            | DiagnosticCode::MarkupError
            | DiagnosticCode::MissingStyle => Severity::Error,
        }
    }

    /// Returns the diagnostic code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnusedSelector => "css-unused-selector",
            DiagnosticCode::OverwrittenProperty => "css-overwritten-property",
            DiagnosticCode::CssSyntax => "css-syntax",
            DiagnosticCode::InvalidSelector => "css-invalid-selector",
            DiagnosticCode::CssParseError => "css-parse-error",
            DiagnosticCode::TemplateError => "template-error",
            DiagnosticCode::MarkupError => "markup-error",
            DiagnosticCode::MissingStyle => "missing-style",
        }
    }
}

impl From<DiagnosticCode> for &'static str {
    fn from(code: DiagnosticCode) -> Self {
        code.as_str()
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
