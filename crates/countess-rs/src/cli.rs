//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Finds unused selectors and overwritten properties in HTML pages and web
/// components.
#[derive(Debug, Parser)]
#[command(name = "countess")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory to scan
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Minimum severity threshold
    #[arg(long, value_enum, default_value = "warning")]
    pub threshold: Threshold,

    /// Checks to run (comma-separated: unused,overwritten,syntax)
    #[arg(long)]
    pub checks: Option<String>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long = "preserveWatchOutput")]
    pub preserve_watch_output: bool,

    /// Print the normalized markup of each file to stderr (for debugging)
    #[arg(long = "emit-normalized")]
    pub emit_normalized: bool,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// Path to a config file (defaults to countess.config.json in the workspace)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Log debug information to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Human-readable with code snippets
    HumanVerbose,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

/// Severity threshold.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Threshold {
    /// Only show errors
    Error,
    /// Show errors and warnings (default)
    #[default]
    Warning,
}

impl Args {
    /// Returns whether unused selectors should be reported.
    pub fn include_unused(&self) -> bool {
        self.includes_check("unused")
    }

    /// Returns whether overwritten properties should be reported.
    pub fn include_overwritten(&self) -> bool {
        self.includes_check("overwritten")
    }

    /// Returns whether malformed declaration lines should be reported.
    pub fn include_syntax(&self) -> bool {
        self.includes_check("syntax")
    }

    fn includes_check(&self, name: &str) -> bool {
        self.checks
            .as_ref()
            .map(|checks| checks.split(',').any(|check| check.trim() == name))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["countess"]);
        assert_eq!(args.workspace.as_str(), ".");
        assert_eq!(args.output, OutputFormat::Human);
        assert_eq!(args.threshold, Threshold::Warning);
        assert!(!args.watch);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_custom_workspace() {
        let args = Args::parse_from(["countess", "--workspace", "/path/to/site"]);
        assert_eq!(args.workspace.as_str(), "/path/to/site");
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["countess", "--output", "json"]);
        assert_eq!(args.output, OutputFormat::Json);

        let args = Args::parse_from(["countess", "--output", "human-verbose"]);
        assert_eq!(args.output, OutputFormat::HumanVerbose);
    }

    #[test]
    fn test_checks() {
        let args = Args::parse_from(["countess"]);
        assert!(args.include_unused());
        assert!(args.include_overwritten());
        assert!(args.include_syntax());

        let args = Args::parse_from(["countess", "--checks", "overwritten"]);
        assert!(!args.include_unused());
        assert!(args.include_overwritten());
        assert!(!args.include_syntax());

        let args = Args::parse_from(["countess", "--checks", "unused, overwritten"]);
        assert!(args.include_unused());
        assert!(args.include_overwritten());
    }

    #[test]
    fn test_repeated_ignore() {
        let args = Args::parse_from(["countess", "--ignore", "vendor/**", "--ignore", "*.min.html"]);
        assert_eq!(args.ignore, vec!["vendor/**", "*.min.html"]);
    }

    #[test]
    fn test_watch_flags() {
        let args = Args::parse_from(["countess", "--watch", "--preserveWatchOutput", "-v"]);
        assert!(args.watch);
        assert!(args.preserve_watch_output);
        assert!(args.verbose);
    }
}
