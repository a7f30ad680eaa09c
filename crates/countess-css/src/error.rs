//! Parse error types.

use source_map::Span;
use thiserror::Error;

/// An error that stopped stylesheet parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the stylesheet text.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A selector group ran into the end of input, `;` or `}` before its `{`.
    #[error("missing '{{'")]
    MissingOpenBrace,

    /// A block was never closed.
    #[error("missing '}}'")]
    MissingCloseBrace,

    /// A rule had a block but no selector text.
    #[error("selector missing")]
    MissingSelector,

    /// A declaration started with `:`.
    #[error("property missing")]
    MissingProperty,

    /// A declaration had no `:` after its property name.
    #[error("property missing ':' after '{property}'")]
    MissingColon {
        /// The property text read so far.
        property: String,
    },

    /// A `}` appeared outside of any block.
    #[error("unexpected '}}'")]
    UnexpectedCloseBrace,

    /// A `/*` comment was never closed.
    #[error("unterminated comment")]
    UnterminatedComment,

    /// A quoted string was never closed.
    #[error("unterminated string")]
    UnterminatedString,

    /// The lexer could not make sense of the input.
    #[error("invalid token: {found}")]
    InvalidToken {
        /// The offending text.
        found: String,
    },
}
