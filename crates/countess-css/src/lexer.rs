//! Stylesheet lexer using logos.
//!
//! Tokens only mark the characters that give a stylesheet its structure
//! (braces, separators, brackets, strings, comments). Everything else is
//! `Text`, so the parser can rebuild selector and value text verbatim from
//! token slices.

use logos::Logos;
use source_map::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for stylesheet syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// Spaces, tabs and line breaks.
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// `/* ... */`
    #[token("/*", lex_comment)]
    Comment,

    /// A single- or double-quoted string.
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    String,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `,`
    #[token(",")]
    Comma,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `@media`, `@import`, ...
    #[regex(r"@[a-zA-Z_-][a-zA-Z0-9_-]*")]
    AtKeyword,

    /// A lone `@`.
    #[token("@")]
    At,

    /// A lone `/`, as in `font: 12px/1.5`.
    #[token("/")]
    Slash,

    /// Any run of characters without structural meaning.
    #[regex(r#"[^ \t\r\n\f{};:,()\[\]"'@/]+"#)]
    Text,

    /// End of input.
    Eof,

    /// Input the lexer could not tokenize.
    #[default]
    Error,
}

fn lex_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

impl TokenKind {
    /// Returns true for tokens the parser skips between rules and declarations.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Returns true for tokens that open a nesting level.
    pub fn opens_group(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    /// Returns true for tokens that close a nesting level.
    pub fn closes_group(&self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }
}

/// A lexer for stylesheet source.
///
/// Yields every token, then a single `Eof` token.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let kind = match self.inner.next() {
            Some(Ok(kind)) => kind,
            Some(Err(())) => TokenKind::Error,
            None => {
                self.finished = true;
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::from_usize(self.source.len(), self.source.len()),
                });
            }
        };

        let span = self.inner.span();
        Some(Token {
            kind,
            span: Span::from_usize(span.start, span.end),
        })
    }
}
