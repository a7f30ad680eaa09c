//! Main orchestration logic.

use crate::cli::{Args, OutputFormat, Threshold};
use crate::config::{ConfigError, CountessConfig};
use crate::output::{CheckSummary, FileOutput, FormattedDiagnostic, Formatter};
use camino::{Utf8Path, Utf8PathBuf};
use countess_analysis::{analyze_with, locate, normalize_template, AnalyzeOptions, Diagnostic, Severity};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::fs;
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/bower_components/**"];

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The workspace could not be resolved.
    #[error("invalid workspace {0}")]
    Workspace(String),

    /// The config file could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Everything a check pass needs besides the file list.
struct Settings {
    workspace: Utf8PathBuf,
    options: AnalyzeOptions,
    extensions: Vec<String>,
    ignore: GlobSet,
    fail_on_warnings: bool,
}

impl Settings {
    fn new(args: &Args) -> Result<Self, OrchestratorError> {
        let workspace = resolve_workspace(&args.workspace)?;
        let config = CountessConfig::load(&workspace, args.config.as_deref())?;

        let mut builder = GlobSetBuilder::new();
        let patterns = args
            .ignore
            .iter()
            .chain(&config.exclude)
            .map(String::as_str)
            .chain(DEFAULT_IGNORES.iter().copied());
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
            builder.add(glob);
        }
        let ignore = builder
            .build()
            .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;

        let options = AnalyzeOptions {
            unused: args.include_unused(),
            overwritten: args.include_overwritten(),
            ..AnalyzeOptions::default()
        }
        .with_extra_pseudo_classes(config.extra_pseudo_classes.iter().cloned());

        Ok(Self {
            workspace,
            options,
            extensions: config.file_extensions().into_iter().map(str::to_string).collect(),
            ignore,
            fail_on_warnings: args.fail_on_warnings || config.fail_on_warnings.unwrap_or(false),
        })
    }

    fn is_candidate(&self, path: &Utf8Path) -> bool {
        let file_name = path.file_name().unwrap_or("");
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    fn is_ignored(&self, path: &Utf8Path) -> bool {
        let relative = path.strip_prefix(&self.workspace).unwrap_or(path);
        self.ignore.is_match(relative.as_str())
    }
}

fn resolve_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, OrchestratorError> {
    if workspace.is_absolute() {
        return Ok(workspace.to_owned());
    }
    let current = std::env::current_dir().map_err(|e| OrchestratorError::Workspace(e.to_string()))?;
    let current = Utf8PathBuf::try_from(current)
        .map_err(|e| OrchestratorError::Workspace(e.to_string()))?;
    Ok(current.join(workspace))
}

/// Runs the check on all files.
pub async fn run(args: Args) -> Result<CheckSummary, OrchestratorError> {
    let settings = Settings::new(&args)?;
    tracing::debug!(workspace = %settings.workspace, extensions = ?settings.extensions, "settings resolved");

    if args.watch {
        run_watch_mode(&args, &settings).await
    } else {
        Ok(run_single_check(&args, &settings))
    }
}

/// Finds the files to check, in a stable order.
fn discover_files(settings: &Settings) -> Vec<Utf8PathBuf> {
    let files: Vec<Utf8PathBuf> = WalkDir::new(&settings.workspace)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| settings.is_candidate(p))
        .filter(|p| !settings.is_ignored(p))
        .collect();

    tracing::info!(count = files.len(), workspace = %settings.workspace, "discovered files");
    files
}

/// The outcome for one file.
struct FileReport {
    path: Utf8PathBuf,
    source: String,
    diagnostics: Vec<Diagnostic>,
    elapsed: Duration,
}

fn check_file(path: &Utf8Path, args: &Args, settings: &Settings) -> Option<FileReport> {
    let start = Instant::now();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!(%path, error = %e, "failed to read file");
            return None;
        }
    };

    if args.emit_normalized {
        let relative = path.strip_prefix(&settings.workspace).unwrap_or(path);
        match normalize_template(&source) {
            Ok(markup) => eprintln!("=== normalized {} ===\n{}", relative, markup),
            Err(e) => eprintln!("=== normalized {} ===\n{}", relative, e),
        }
    }

    let mut diagnostics = match analyze_with(&source, &settings.options) {
        Ok(result) => locate::diagnostics(&source, &result),
        Err(e) => {
            tracing::debug!(%path, error = %e, "analysis failed");
            vec![locate::error_diagnostic(&source, &e)]
        }
    };
    if args.include_syntax() {
        diagnostics.extend(locate::syntax_diagnostics(&source));
        diagnostics.sort_by_key(|diag| diag.span.start);
    }
    diagnostics.retain(|diag| include_severity(diag.severity, args.threshold));

    let elapsed = start.elapsed();
    tracing::debug!(%path, ?elapsed, findings = diagnostics.len(), "checked file");

    Some(FileReport {
        path: path.to_owned(),
        source,
        diagnostics,
        elapsed,
    })
}

/// Runs a single check pass.
fn run_single_check(args: &Args, settings: &Settings) -> CheckSummary {
    let total_start = Instant::now();
    let files = discover_files(settings);
    let scan_time = total_start.elapsed();

    let check_start = Instant::now();
    let reports: Vec<FileReport> = files
        .par_iter()
        .filter_map(|path| check_file(path, args, settings))
        .collect();
    let check_time = check_start.elapsed();

    let formatter = Formatter::new(args.output);
    let mut json_output: Vec<FormattedDiagnostic> = Vec::new();
    let mut summary = CheckSummary {
        file_count: files.len(),
        fail_on_warnings: settings.fail_on_warnings,
        ..CheckSummary::default()
    };

    for report in &reports {
        for diag in &report.diagnostics {
            match diag.severity {
                Severity::Error => summary.error_count += 1,
                Severity::Warning => summary.warning_count += 1,
            }
        }
        if report.diagnostics.is_empty() {
            continue;
        }

        let relative = report
            .path
            .strip_prefix(&settings.workspace)
            .unwrap_or(&report.path);
        match formatter.format(&report.diagnostics, relative, &report.source) {
            FileOutput::Text(text) => print!("{}", text),
            FileOutput::Json(entries) => json_output.extend(entries),
        }
    }

    if args.timings {
        eprintln!("=== countess timings ===");
        eprintln!("file scan: {:?} ({} files)", scan_time, files.len());
        eprintln!("analysis: {:?}", check_time);
        if let Some(slowest) = reports.iter().max_by_key(|report| report.elapsed) {
            eprintln!("slowest file: {} ({:?})", slowest.path, slowest.elapsed);
        }
        eprintln!("total: {:?}", total_start.elapsed());
    }

    if args.output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&json_output).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize diagnostics");
            "[]".to_string()
        });
        println!("{}", json);
    } else {
        println!("{}", summary.format());
    }

    summary
}

fn include_severity(severity: Severity, threshold: Threshold) -> bool {
    match threshold {
        Threshold::Error => matches!(severity, Severity::Error),
        Threshold::Warning => true,
    }
}

/// Runs in watch mode.
async fn run_watch_mode(args: &Args, settings: &Settings) -> Result<CheckSummary, OrchestratorError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

    println!("Starting watch mode...\n");

    run_single_check(args, settings);

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(settings.workspace.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        let changed: Vec<Utf8PathBuf> = event
            .paths
            .into_iter()
            .filter_map(|p| Utf8PathBuf::try_from(p).ok())
            .filter(|p| settings.is_candidate(p) && !settings.is_ignored(p))
            .collect();

        if changed.is_empty() {
            continue;
        }
        tracing::info!(?changed, "files changed");

        if !args.preserve_watch_output {
            print!("\x1B[2J\x1B[1;1H");
        }

        println!("File changed, re-checking...\n");
        run_single_check(args, settings);
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}
