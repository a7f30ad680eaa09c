//! Stylesheet parser for countess.
//!
//! Produces the rule tree the analyzers walk: style rules with their selector
//! groups and declarations, `@media` blocks holding nested rules, and any
//! other at-rule kept as an opaque node. Selector, property and value text is
//! kept as written (trimmed, comments removed) because analysis results quote
//! it back to the user.
//!
//! # Example
//!
//! ```
//! use countess_css::{parse, Rule};
//!
//! let sheet = parse(".a, .b { color: red !important; }").unwrap();
//! let Rule::Style(rule) = &sheet.rules[0] else { panic!() };
//! assert_eq!(rule.selectors, vec![".a", ".b"]);
//! assert!(rule.declarations[0].is_important());
//! ```

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use source_map::Span;

/// Parses stylesheet text into a [`Stylesheet`].
///
/// Parsing stops at the first syntax error; there is no partial result.
pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    parser::Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let sheet = parse("").unwrap();
        assert!(sheet.rules.is_empty());
    }

    #[test]
    fn test_parse_comment_only() {
        let sheet = parse("/* nothing here */").unwrap();
        assert!(sheet.rules.is_empty());
    }
}
