//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Name of the config file looked up in the workspace.
pub const CONFIG_FILE: &str = "countess.config.json";

const DEFAULT_EXTENSIONS: &[&str] = &[".html"];

/// Project configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CountessConfig {
    /// File name suffixes to analyze.
    pub extensions: Vec<String>,

    /// Glob patterns to skip, relative to the workspace.
    pub exclude: Vec<String>,

    /// Pseudo-classes to strip in addition to the standard ones.
    pub extra_pseudo_classes: Vec<String>,

    /// Exit with error on warnings.
    pub fail_on_warnings: Option<bool>,
}

/// A config file that could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CountessConfig {
    /// Loads the config file.
    ///
    /// An explicit path must exist. Without one, `countess.config.json` in the
    /// workspace is used if present, and defaults otherwise.
    pub fn load(workspace: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if path.is_relative() => workspace.join(path),
            Some(path) => path.to_owned(),
            None => {
                let path = workspace.join(CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("no {CONFIG_FILE} in {workspace}, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(%path, ?config, "loaded config");
        Ok(config)
    }

    /// Parses config JSON, allowing `//` and `/* */` comments.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_json_comments(content))
    }

    /// Returns the file name suffixes to analyze.
    pub fn file_extensions(&self) -> Vec<&str> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.to_vec()
        } else {
            self.extensions.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Str,
    Escape,
    LineComment,
    BlockComment,
}

/// Blanks out comments, leaving strings untouched. Line breaks inside
/// comments are kept so serde errors report the right line.
fn strip_json_comments(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut state = Scan::Code;
    let mut chars = json.chars().peekable();

    while let Some(c) = chars.next() {
        state = match (state, c) {
            (Scan::Code, '"') => {
                out.push(c);
                Scan::Str
            }
            (Scan::Code, '/') if chars.peek() == Some(&'/') => {
                chars.next();
                Scan::LineComment
            }
            (Scan::Code, '/') if chars.peek() == Some(&'*') => {
                chars.next();
                Scan::BlockComment
            }
            (Scan::Code, _) => {
                out.push(c);
                Scan::Code
            }
            (Scan::Str, '\\') => {
                out.push(c);
                Scan::Escape
            }
            (Scan::Str, '"') => {
                out.push(c);
                Scan::Code
            }
            (Scan::Str | Scan::Escape, _) => {
                out.push(c);
                Scan::Str
            }
            (Scan::LineComment, '\n') => {
                out.push(c);
                Scan::Code
            }
            (Scan::BlockComment, '*') if chars.peek() == Some(&'/') => {
                chars.next();
                Scan::Code
            }
            (Scan::LineComment | Scan::BlockComment, '\n') => {
                out.push(c);
                state
            }
            (Scan::LineComment | Scan::BlockComment, _) => state,
        };
    }

    out
}
