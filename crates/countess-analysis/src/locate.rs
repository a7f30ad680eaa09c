//! Places findings and failures in the original source.
//!
//! Analysis runs on normalized markup whose offsets have nothing in common
//! with the file on disk, so findings are located again by searching the
//! lines of the first `<style` ... `</style` region of the original text.
//! Anything that cannot be found there is anchored at the `<style` tag.
//!
//! [`syntax_diagnostics`] is independent of analysis and runs on the original
//! text whether or not analysis succeeded.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::AnalysisError;
use crate::result::{AnalysisResult, OverwrittenProperty, UnusedSelector};
use rustc_hash::FxHashMap;
use source_map::{Line, LineIndex, Span};

const STYLE_OPEN: &str = "<style";
const STYLE_CLOSE: &str = "</style";

/// Turns a result into diagnostics, sorted by position.
pub fn diagnostics(source: &str, result: &AnalysisResult) -> Vec<Diagnostic> {
    let index = LineIndex::new(source);
    let region = StyleRegion::scan(source, &index);

    let unused = place_unused(&region, &result.unused)
        .into_iter()
        .zip(&result.unused)
        .map(|(span, record)| Diagnostic::new(DiagnosticCode::UnusedSelector, unused_message(record), span));

    let overwritten = place_overwritten(&region, &result.overwritten)
        .into_iter()
        .zip(&result.overwritten)
        .map(|(span, record)| {
            Diagnostic::new(
                DiagnosticCode::OverwrittenProperty,
                overwritten_message(record),
                span,
            )
        });

    let mut diagnostics: Vec<Diagnostic> = unused.chain(overwritten).collect();
    diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);
    diagnostics
}

/// Turns an analysis failure into a single error diagnostic.
pub fn error_diagnostic(source: &str, error: &AnalysisError) -> Diagnostic {
    let index = LineIndex::new(source);
    let region = StyleRegion::scan(source, &index);
    let message = error.to_string();

    let (code, span) = match error {
        AnalysisError::MalformedTemplate { opening, .. } => {
            let span = source
                .find(opening.as_str())
                .map(|at| Span::from_usize(at, at + opening.len()))
                .unwrap_or_default();
            (DiagnosticCode::TemplateError, span)
        }
        AnalysisError::MarkupParse { .. } => (DiagnosticCode::MarkupError, Span::default()),
        AnalysisError::StyleBlockNotFound => (DiagnosticCode::MissingStyle, Span::default()),
        AnalysisError::StylesheetParse { snippet, .. } => {
            (DiagnosticCode::CssParseError, region.locate(snippet))
        }
        AnalysisError::SelectorEvaluation { selector, .. } => {
            (DiagnosticCode::InvalidSelector, region.locate(selector))
        }
    };

    Diagnostic::new(code, message, span)
}

/// Flags lines inside a rule block of the first style element that do not
/// read as a `name: value;` declaration, such as a missing semicolon.
///
/// Lines holding `{` or `@`, blank lines and lines within `/* */` comments
/// are skipped.
pub fn syntax_diagnostics(source: &str) -> Vec<Diagnostic> {
    let index = LineIndex::new(source);
    let mut diagnostics = Vec::new();
    let mut in_style = false;
    let mut in_rule = false;
    let mut in_comment = false;

    for line in index.lines(source) {
        let text = line.text;
        if text.contains(STYLE_OPEN) {
            in_style = true;
        }
        if text.contains(STYLE_CLOSE) {
            break;
        }
        if text.contains('}') {
            in_rule = false;
        }
        if text.contains("/*") {
            in_comment = true;
        }

        let trimmed = text.trim();
        if in_style
            && in_rule
            && !in_comment
            && !trimmed.is_empty()
            && !text.contains('{')
            && !text.contains('@')
            && !is_declaration_line(text)
        {
            let col = text.len() - text.trim_start().len();
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::CssSyntax,
                format!("Expected 'property: value;' but found '{trimmed}'"),
                span_in(&line, col, trimmed.len()),
            ));
        }

        if text.contains('{') {
            in_rule = !text.contains('}');
        }
        if text.contains("*/") {
            in_comment = false;
        }
    }

    diagnostics
}

/// Some text, a `:`, some more text, then a `;`.
fn is_declaration_line(text: &str) -> bool {
    let Some((colon, _)) = text.char_indices().skip(1).find(|&(_, c)| c == ':') else {
        return false;
    };
    text[colon + 1..]
        .char_indices()
        .skip(1)
        .any(|(_, c)| c == ';')
}

fn unused_message(record: &UnusedSelector) -> String {
    match &record.media {
        Some(media) => format!("Unused selector '{}' in @media {}", record.selector, media),
        None => format!("Unused selector '{}'", record.selector),
    }
}

fn overwritten_message(record: &OverwrittenProperty) -> String {
    let base = format!(
        "Property '{}' of '{}' is overwritten by a later rule",
        record.property, record.selector
    );
    match &record.media {
        Some(media) => format!("{base} in @media {media}"),
        None => base,
    }
}

/// The lines of the first style element, tag lines included.
struct StyleRegion<'a> {
    lines: Vec<Line<'a>>,
    anchor: Span,
}

impl<'a> StyleRegion<'a> {
    fn scan(source: &'a str, index: &'a LineIndex) -> Self {
        let mut lines = Vec::new();
        let mut anchor = None;

        for line in index.lines(source) {
            if anchor.is_none() {
                match line.text.find(STYLE_OPEN) {
                    Some(col) => anchor = Some(span_in(&line, col, STYLE_OPEN.len())),
                    None => continue,
                }
            }
            lines.push(line);
            if line.text.contains(STYLE_CLOSE) {
                break;
            }
        }

        Self {
            lines,
            anchor: anchor.unwrap_or_default(),
        }
    }

    /// First occurrence of `needle` on a region line at or after `from`,
    /// with the position of that line.
    fn find(&self, needle: &str, from: usize) -> Option<(usize, Span)> {
        if needle.is_empty() {
            return None;
        }
        self.lines
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(position, line)| {
                line.text
                    .find(needle)
                    .map(|col| (position, span_in(line, col, needle.len())))
            })
    }

    fn locate(&self, needle: &str) -> Span {
        self.find(needle, 0).map_or(self.anchor, |(_, span)| span)
    }
}

fn span_in(line: &Line<'_>, col: usize, len: usize) -> Span {
    let start = usize::from(line.span.start) + col;
    Span::from_usize(start, start + len)
}

/// Repeated selectors move on to the next line that mentions them.
fn place_unused(region: &StyleRegion<'_>, records: &[UnusedSelector]) -> Vec<Span> {
    let mut next_line: FxHashMap<&str, usize> = FxHashMap::default();

    records
        .iter()
        .map(|record| {
            let selector = record.selector.as_str();
            let from = next_line.get(selector).copied().unwrap_or(0);
            match region.find(selector, from).or_else(|| region.find(selector, 0)) {
                Some((position, span)) => {
                    next_line.insert(selector, position + 1);
                    span
                }
                None => region.anchor,
            }
        })
        .collect()
}

/// Tracks the selector text of the rule each line belongs to and claims
/// every pending record whose selector is in it and whose property is set on
/// the line.
fn place_overwritten(region: &StyleRegion<'_>, records: &[OverwrittenProperty]) -> Vec<Span> {
    let mut spans: Vec<Option<Span>> = vec![None; records.len()];
    let mut header = String::new();
    let mut in_block = false;

    for line in &region.lines {
        if line.text.contains('{') {
            header.push_str(line.text);
            in_block = true;
        }
        if line.text.contains('}') {
            header.clear();
            in_block = false;
        }
        if !in_block {
            header.push_str(line.text);
        }

        for (record, slot) in records.iter().zip(spans.iter_mut()) {
            if slot.is_some() || !header.contains(record.selector.as_str()) {
                continue;
            }
            if let Some(col) = find_property(line.text, &record.property) {
                *slot = Some(span_in(line, col, record.property.len()));
            }
        }
    }

    spans
        .into_iter()
        .map(|span| span.unwrap_or(region.anchor))
        .collect()
}

/// Column of `property` used as a declaration name on this line: not part of
/// a longer name and followed by a colon.
fn find_property(text: &str, property: &str) -> Option<usize> {
    if property.is_empty() {
        return None;
    }
    text.match_indices(property).map(|(at, _)| at).find(|&at| {
        let before = text[..at].chars().next_back();
        let standalone = !before.is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_');
        let after = text[at + property.len()..].trim_start();
        standalone && after.starts_with(':')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "<dom-module id=\"x\">
<template>
<style>
  .a {
    color: red;
    background-color: red;
  }
  .a {
    color: blue;
  }
  .gone { top: 0; }
  :host { display: block; }
</style>
<div class=\"a\"></div>
</template>
</dom-module>";

    fn text_at(span: Span) -> &'static str {
        span.slice(SOURCE).unwrap()
    }

    fn line_of(span: Span) -> u32 {
        LineIndex::new(SOURCE).line_col(span.start).unwrap().line
    }

    #[test]
    fn test_unused_placed_on_selector() {
        let result = AnalysisResult {
            unused: vec![UnusedSelector {
                selector: ".gone".to_string(),
                media: None,
            }],
            overwritten: Vec::new(),
        };
        let diagnostics = diagnostics(SOURCE, &result);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnusedSelector);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].message, "Unused selector '.gone'");
        assert_eq!(text_at(diagnostics[0].span), ".gone");
        assert_eq!(line_of(diagnostics[0].span), 10);
    }

    #[test]
    fn test_overwritten_placed_on_earlier_declaration() {
        let result = AnalysisResult {
            unused: Vec::new(),
            overwritten: vec![OverwrittenProperty {
                selector: ".a".to_string(),
                property: "color".to_string(),
                media: None,
            }],
        };
        let diagnostics = diagnostics(SOURCE, &result);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(text_at(diagnostics[0].span), "color");
        assert_eq!(line_of(diagnostics[0].span), 4);
        assert_eq!(
            diagnostics[0].message,
            "Property 'color' of '.a' is overwritten by a later rule"
        );
    }

    #[test]
    fn test_unplaceable_record_anchored_at_style_tag() {
        let result = AnalysisResult {
            unused: vec![UnusedSelector {
                selector: "html".to_string(),
                media: Some("print".to_string()),
            }],
            overwritten: Vec::new(),
        };
        let diagnostics = diagnostics(SOURCE, &result);
        assert_eq!(text_at(diagnostics[0].span), "<style");
        assert_eq!(diagnostics[0].message, "Unused selector 'html' in @media print");
    }

    #[test]
    fn test_repeated_unused_selector_moves_on() {
        let source = "<style>\n.x { }\n.x { }\n</style>";
        let record = UnusedSelector {
            selector: ".x".to_string(),
            media: None,
        };
        let result = AnalysisResult {
            unused: vec![record.clone(), record],
            overwritten: Vec::new(),
        };
        let spans: Vec<Span> = diagnostics(source, &result).iter().map(|d| d.span).collect();
        assert_eq!(spans, vec![Span::from_usize(8, 10), Span::from_usize(15, 17)]);
    }

    #[test]
    fn test_result_is_not_consumed() {
        let result = AnalysisResult {
            unused: vec![UnusedSelector {
                selector: ".gone".to_string(),
                media: None,
            }],
            overwritten: Vec::new(),
        };
        let before = result.clone();
        let _ = diagnostics(SOURCE, &result);
        assert_eq!(result, before);
    }

    #[test]
    fn test_find_property() {
        assert_eq!(find_property("  background-color: red;", "color"), None);
        assert_eq!(find_property("  color : red;", "color"), Some(2));
        assert_eq!(find_property("a { top: 0; color: red }", "color"), Some(12));
        assert_eq!(find_property("colorful", "color"), None);
    }

    #[test]
    fn test_selector_error_located() {
        let error = AnalysisError::SelectorEvaluation {
            selector: ".gone".to_string(),
            message: "bad".to_string(),
        };
        let diagnostic = error_diagnostic(SOURCE, &error);
        assert_eq!(diagnostic.code, DiagnosticCode::InvalidSelector);
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(text_at(diagnostic.span), ".gone");
    }

    #[test]
    fn test_template_error_located() {
        let source = "<p></p>\n<script>\nvar a;";
        let error = AnalysisError::MalformedTemplate {
            construct: countess_template::Construct::Script,
            opening: "<script>".to_string(),
            expected: "</script",
        };
        let diagnostic = error_diagnostic(source, &error);
        assert_eq!(diagnostic.code, DiagnosticCode::TemplateError);
        assert_eq!(diagnostic.span, Span::from_usize(8, 16));
    }

    #[test]
    fn test_declaration_lines() {
        assert!(is_declaration_line("    color: red;"));
        assert!(is_declaration_line("a:b;"));
        assert!(!is_declaration_line("    color: red"));
        assert!(!is_declaration_line(":red;"));
        assert!(!is_declaration_line("color:;"));
        assert!(!is_declaration_line("color red;"));
    }

    #[test]
    fn test_syntax_lines_flagged() {
        let source = "<p>no: style</p>
<style>
  .a {
    color: red
    margin: 0;
    /* note
       still comment */
    @apply --m;

  }
  .b { top }
  .c {
    top 0;
  }
</style>
<p>after</p>";
        let diagnostics = syntax_diagnostics(source);
        let flagged: Vec<&str> = diagnostics
            .iter()
            .map(|d| d.span.slice(source).unwrap())
            .collect();
        assert_eq!(flagged, vec!["color: red", "top 0;"]);
        assert_eq!(diagnostics[0].code, DiagnosticCode::CssSyntax);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(
            diagnostics[0].message,
            "Expected 'property: value;' but found 'color: red'"
        );
    }

    #[test]
    fn test_clean_source_has_no_syntax_findings() {
        assert_eq!(syntax_diagnostics(SOURCE), Vec::new());
        assert_eq!(syntax_diagnostics("<p>a</p>\n<p>b: c</p>"), Vec::new());
    }

    #[test]
    fn test_missing_style_at_start() {
        let diagnostic = error_diagnostic("<p></p>", &AnalysisError::StyleBlockNotFound);
        assert_eq!(diagnostic.code, DiagnosticCode::MissingStyle);
        assert_eq!(diagnostic.span, Span::default());
    }
}
