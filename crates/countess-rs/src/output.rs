//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use countess_analysis::{Diagnostic, Severity};
use serde::Serialize;
use source_map::{LineCol, LineIndex};

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error or Warning).
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The file path.
    pub filename: String,
    /// The start position.
    pub start: Position,
    /// The end position.
    pub end: Position,
    /// The message.
    pub message: String,
    /// The diagnostic code.
    pub code: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    }
}

/// What one file contributes to the run's output.
#[derive(Debug)]
pub enum FileOutput {
    /// Text printed as soon as the file is reached.
    Text(String),
    /// Entries of the single JSON array printed at the end of the run.
    Json(Vec<FormattedDiagnostic>),
}

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the diagnostics of one file.
    pub fn format(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path, source: &str) -> FileOutput {
        let line_index = LineIndex::new(source);
        match self.format {
            OutputFormat::Human => {
                FileOutput::Text(format_human(diagnostics, file_path, &line_index, None))
            }
            OutputFormat::HumanVerbose => FileOutput::Text(format_human(
                diagnostics,
                file_path,
                &line_index,
                Some(source),
            )),
            OutputFormat::Machine => {
                FileOutput::Text(format_machine(diagnostics, file_path, &line_index))
            }
            OutputFormat::Json => {
                FileOutput::Json(Self::format_json_diagnostics(diagnostics, file_path, source))
            }
        }
    }

    /// Formats diagnostics into JSON-ready structs.
    pub fn format_json_diagnostics(
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> Vec<FormattedDiagnostic> {
        let line_index = LineIndex::new(source);
        diagnostics
            .iter()
            .map(|diag| {
                let (start, end) = positions(&line_index, diag);
                FormattedDiagnostic {
                    diagnostic_type: severity_label(diag.severity).to_string(),
                    filename: file_path.to_string(),
                    start: Position {
                        line: start.line + 1,
                        column: start.col + 1,
                        offset: u32::from(diag.span.start),
                    },
                    end: Position {
                        line: end.line + 1,
                        column: end.col + 1,
                        offset: u32::from(diag.span.end),
                    },
                    message: diag.message.clone(),
                    code: diag.code.to_string(),
                }
            })
            .collect()
    }
}

fn positions(line_index: &LineIndex, diag: &Diagnostic) -> (LineCol, LineCol) {
    let start = line_index
        .line_col(diag.span.start)
        .unwrap_or(LineCol::new(0, 0));
    let end = line_index.line_col(diag.span.end).unwrap_or(start);
    (start, end)
}

/// `path:line:col`, the message, and with `source` a snippet with a caret.
fn format_human(
    diagnostics: &[Diagnostic],
    file_path: &Utf8Path,
    line_index: &LineIndex,
    source: Option<&str>,
) -> String {
    let mut output = String::new();

    for diag in diagnostics {
        let (start, _) = positions(line_index, diag);
        output.push_str(&format!(
            "{}:{}:{}\n{}: {} ({})\n",
            file_path,
            start.line + 1,
            start.col + 1,
            severity_label(diag.severity),
            diag.message,
            diag.code
        ));

        let snippet = source.and_then(|source| line_index.line_span(start.line, source)?.slice(source));
        if let Some(line) = snippet {
            let number = (start.line + 1).to_string();
            let col = start.col as usize;
            let pad = line.get(..col).map_or(col, |prefix| prefix.chars().count());
            output.push_str(&format!("  {} | {}\n", number, line));
            output.push_str(&format!(
                "  {} | {}^\n",
                " ".repeat(number.len()),
                " ".repeat(pad)
            ));
        }

        output.push('\n');
    }

    output
}

fn format_machine(diagnostics: &[Diagnostic], file_path: &Utf8Path, line_index: &LineIndex) -> String {
    let mut output = String::new();

    for diag in diagnostics {
        let (start, end) = positions(line_index, diag);
        output.push_str(&format!(
            "{} {}:{}:{}:{}:{} {} ({})\n",
            severity_label(diag.severity).to_uppercase(),
            file_path,
            start.line + 1,
            start.col + 1,
            end.line + 1,
            end.col + 1,
            diag.message,
            diag.code
        ));
    }

    output
}

/// Summary of a check run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of files checked.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Whether to fail on warnings.
    pub fail_on_warnings: bool,
}

impl CheckSummary {
    /// Returns true if the run should exit with a failure code.
    pub fn failed(&self) -> bool {
        self.error_count > 0 || (self.warning_count > 0 && self.fail_on_warnings)
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        format!(
            "====================================\ncountess found {} and {} in {}",
            plural(self.error_count, "error"),
            plural(self.warning_count, "warning"),
            plural(self.file_count, "file")
        )
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countess_analysis::DiagnosticCode;
    use pretty_assertions::assert_eq;
    use source_map::Span;

    const SOURCE: &str = "<style>\n  .gone { top: 0; }\n</style>";

    fn text(output: FileOutput) -> String {
        match output {
            FileOutput::Text(text) => text,
            FileOutput::Json(_) => panic!("expected text output"),
        }
    }

    fn unused() -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::UnusedSelector,
            "Unused selector '.gone'",
            Span::from_usize(10, 15),
        )
    }

    #[test]
    fn test_format_human() {
        let formatter = Formatter::new(OutputFormat::Human);
        let output = text(formatter.format(&[unused()], Utf8Path::new("page.html"), SOURCE));
        assert_eq!(
            output,
            "page.html:2:3\nWarning: Unused selector '.gone' (css-unused-selector)\n\n"
        );
    }

    #[test]
    fn test_format_human_verbose() {
        let formatter = Formatter::new(OutputFormat::HumanVerbose);
        let output = text(formatter.format(&[unused()], Utf8Path::new("page.html"), SOURCE));
        insta::assert_snapshot!(output, @r"
        page.html:2:3
        Warning: Unused selector '.gone' (css-unused-selector)
          2 |   .gone { top: 0; }
            |   ^
        ");
    }

    #[test]
    fn test_caret_counts_characters() {
        let source = "<style>\n/* é */ .gone { top: 0; }\n</style>";
        let at = source.find(".gone").unwrap();
        let diagnostic = Diagnostic::new(
            DiagnosticCode::UnusedSelector,
            "Unused selector '.gone'",
            Span::from_usize(at, at + 5),
        );
        let formatter = Formatter::new(OutputFormat::HumanVerbose);
        let output = text(formatter.format(&[diagnostic], Utf8Path::new("page.html"), source));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[2], "  2 | /* é */ .gone { top: 0; }");
        assert_eq!(lines[3], "    |         ^");
    }

    #[test]
    fn test_format_machine() {
        let formatter = Formatter::new(OutputFormat::Machine);
        let output = text(formatter.format(&[unused()], Utf8Path::new("page.html"), SOURCE));
        assert_eq!(
            output,
            "WARNING page.html:2:3:2:8 Unused selector '.gone' (css-unused-selector)\n"
        );
    }

    #[test]
    fn test_format_json() {
        let formatter = Formatter::new(OutputFormat::Json);
        let FileOutput::Json(formatted) =
            formatter.format(&[unused()], Utf8Path::new("page.html"), SOURCE)
        else {
            panic!("expected json output");
        };
        let value = serde_json::to_value(&formatted).unwrap();
        assert_eq!(value[0]["type"], "Warning");
        assert_eq!(value[0]["filename"], "page.html");
        assert_eq!(value[0]["start"]["line"], 2);
        assert_eq!(value[0]["start"]["offset"], 10);
        assert_eq!(value[0]["code"], "css-unused-selector");
    }

    #[test]
    fn test_summary() {
        let summary = CheckSummary {
            file_count: 5,
            error_count: 1,
            warning_count: 3,
            fail_on_warnings: false,
        };

        assert!(summary.format().ends_with("countess found 1 error and 3 warnings in 5 files"));
        assert!(summary.failed());
    }

    #[test]
    fn test_warnings_fail_only_when_asked() {
        let mut summary = CheckSummary {
            file_count: 1,
            error_count: 0,
            warning_count: 2,
            fail_on_warnings: false,
        };
        assert!(!summary.failed());
        summary.fail_on_warnings = true;
        assert!(summary.failed());
    }
}
