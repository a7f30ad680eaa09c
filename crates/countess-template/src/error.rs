//! Template normalization errors.

use std::fmt;
use thiserror::Error;

/// A construct removed by a balanced scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    /// A custom property mixin, `--name: { ... }` or `--name: value;`.
    Mixin,
    /// A `<script>` element.
    Script,
    /// An HTML comment.
    Comment,
}

impl Construct {
    /// Returns a human-readable name for this construct.
    pub fn as_str(&self) -> &'static str {
        match self {
            Construct::Mixin => "mixin declaration",
            Construct::Script => "script",
            Construct::Comment => "comment",
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that made a template impossible to normalize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A removal scan reached the end of input without finding its terminator.
    #[error("unterminated {construct} starting at '{opening}': expected '{expected}' before end of input")]
    Unterminated {
        /// What was being removed.
        construct: Construct,
        /// The word that started the removal.
        opening: String,
        /// The terminator that was never found.
        expected: &'static str,
    },
}
