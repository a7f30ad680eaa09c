//! Recursive descent stylesheet parser.

use crate::ast::{AtRule, Declaration, MediaRule, Rule, StyleRule, Stylesheet};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use smol_str::SmolStr;
use source_map::Span;

/// Parser state over a fully lexed token list.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).collect(),
            pos: 0,
        }
    }

    /// Parses the whole input.
    pub fn parse(mut self) -> Result<Stylesheet, ParseError> {
        let rules = self.parse_rules(None)?;
        Ok(Stylesheet { rules })
    }

    fn peek(&self) -> Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::from_usize(self.source.len(), self.source.len()),
            })
    }

    fn bump(&mut self) -> Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn text(&self, token: Token) -> &'src str {
        token.span.slice(self.source).unwrap_or_default()
    }

    /// Skips whitespace, comments and stray semicolons.
    fn skip_trivia(&mut self) {
        while matches!(
            self.peek().kind,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Semicolon
        ) {
            self.bump();
        }
    }

    fn lex_error(&self, token: Token) -> ParseError {
        let found = self.text(token);
        let kind = if found.starts_with("/*") {
            ParseErrorKind::UnterminatedComment
        } else if found.starts_with('"') || found.starts_with('\'') {
            ParseErrorKind::UnterminatedString
        } else {
            ParseErrorKind::InvalidToken {
                found: found.to_string(),
            }
        };
        ParseError::new(kind, token.span)
    }

    /// Parses rules until end of input, or until the `}` closing the block
    /// opened at `open` (left unconsumed).
    fn parse_rules(&mut self, open: Option<Span>) -> Result<Vec<Rule>, ParseError> {
        let mut rules = Vec::new();

        loop {
            self.skip_trivia();
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    return match open {
                        Some(open) => Err(ParseError::new(ParseErrorKind::MissingCloseBrace, open)),
                        None => Ok(rules),
                    };
                }
                TokenKind::RBrace => {
                    return match open {
                        Some(_) => Ok(rules),
                        None => Err(ParseError::new(
                            ParseErrorKind::UnexpectedCloseBrace,
                            token.span,
                        )),
                    };
                }
                TokenKind::Error => return Err(self.lex_error(token)),
                TokenKind::AtKeyword => rules.push(self.parse_at_rule()?),
                _ => rules.push(Rule::Style(self.parse_style_rule()?)),
            }
        }
    }

    fn parse_style_rule(&mut self) -> Result<StyleRule, ParseError> {
        let start = self.peek().span.start;
        let mut selectors = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        let open = loop {
            let token = self.bump();
            match token.kind {
                TokenKind::LBrace if depth == 0 => break token.span,
                TokenKind::Comma if depth == 0 => {
                    selectors.push(std::mem::take(&mut current));
                }
                TokenKind::RBrace | TokenKind::Semicolon if depth == 0 => {
                    return Err(ParseError::new(
                        ParseErrorKind::MissingOpenBrace,
                        Span::new(start, token.span.end),
                    ));
                }
                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::MissingOpenBrace,
                        Span::new(start, token.span.end),
                    ));
                }
                TokenKind::Error => return Err(self.lex_error(token)),
                TokenKind::Comment => {}
                kind => {
                    if kind.opens_group() {
                        depth += 1;
                    } else if kind.closes_group() {
                        depth = depth.saturating_sub(1);
                    }
                    current.push_str(self.text(token));
                }
            }
        };
        selectors.push(current);

        let selectors: Vec<String> = selectors
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if selectors.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::MissingSelector,
                Span::new(start, open.end),
            ));
        }

        let (declarations, close) = self.parse_declarations(open)?;

        Ok(StyleRule {
            selectors,
            declarations,
            span: Span::new(start, close.end),
        })
    }

    /// Parses declarations up to and including the `}` closing `open`.
    fn parse_declarations(&mut self, open: Span) -> Result<(Vec<Declaration>, Span), ParseError> {
        let mut declarations = Vec::new();

        loop {
            self.skip_trivia();
            let token = self.peek();
            match token.kind {
                TokenKind::RBrace => {
                    self.bump();
                    return Ok((declarations, token.span));
                }
                TokenKind::Eof => {
                    return Err(ParseError::new(ParseErrorKind::MissingCloseBrace, open));
                }
                TokenKind::Error => return Err(self.lex_error(token)),
                _ => declarations.push(self.parse_declaration()?),
            }
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let start = self.peek().span.start;
        let mut property = String::new();

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Colon => {
                    self.bump();
                    break;
                }
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::LBrace | TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::MissingColon {
                            property: property.trim().to_string(),
                        },
                        Span::new(start, token.span.start),
                    ));
                }
                TokenKind::Error => return Err(self.lex_error(token)),
                TokenKind::Comment => {
                    self.bump();
                }
                _ => {
                    self.bump();
                    property.push_str(self.text(token));
                }
            }
        }

        let property = property.trim();
        if property.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::MissingProperty,
                Span::new(start, self.peek().span.start),
            ));
        }

        let mut value = String::new();
        let mut depth = 0usize;
        let end = loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    break token.span.end;
                }
                TokenKind::RBrace if depth == 0 => break token.span.start,
                TokenKind::Eof => break token.span.start,
                TokenKind::Error => return Err(self.lex_error(token)),
                TokenKind::Comment => {
                    self.bump();
                }
                kind => {
                    if kind.opens_group() {
                        depth += 1;
                    } else if kind.closes_group() {
                        depth = depth.saturating_sub(1);
                    }
                    self.bump();
                    value.push_str(self.text(token));
                }
            }
        };

        Ok(Declaration {
            property: SmolStr::new(property),
            value: value.trim().to_string(),
            span: Span::new(start, end),
        })
    }

    fn parse_at_rule(&mut self) -> Result<Rule, ParseError> {
        let keyword = self.bump();
        let name = SmolStr::new(self.text(keyword).trim_start_matches('@'));
        let mut prelude = String::new();
        let mut depth = 0usize;

        let open = loop {
            let token = self.peek();
            match token.kind {
                TokenKind::LBrace if depth == 0 => {
                    self.bump();
                    break token.span;
                }
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof if depth == 0 => {
                    // Statement at-rule; a `}` belongs to the enclosing block.
                    let end = if token.kind == TokenKind::Semicolon {
                        self.bump();
                        token.span.end
                    } else {
                        token.span.start
                    };
                    return Ok(Rule::AtRule(AtRule {
                        name,
                        prelude: prelude.trim().to_string(),
                        has_block: false,
                        span: Span::new(keyword.span.start, end),
                    }));
                }
                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::MissingCloseBrace,
                        Span::new(keyword.span.start, token.span.start),
                    ));
                }
                TokenKind::Error => return Err(self.lex_error(token)),
                TokenKind::Comment => {
                    self.bump();
                }
                kind => {
                    if kind.opens_group() {
                        depth += 1;
                    } else if kind.closes_group() {
                        depth = depth.saturating_sub(1);
                    }
                    self.bump();
                    prelude.push_str(self.text(token));
                }
            }
        };

        if name.eq_ignore_ascii_case("media") {
            let rules = self.parse_rules(Some(open))?;
            let close = self.bump();
            return Ok(Rule::Media(MediaRule {
                condition: prelude.trim().to_string(),
                rules,
                span: Span::new(keyword.span.start, close.span.end),
            }));
        }

        let close = self.skip_block(open)?;
        Ok(Rule::AtRule(AtRule {
            name,
            prelude: prelude.trim().to_string(),
            has_block: true,
            span: Span::new(keyword.span.start, close.end),
        }))
    }

    /// Skips a balanced block whose `{` (at `open`) was already consumed.
    fn skip_block(&mut self, open: Span) -> Result<Span, ParseError> {
        let mut depth = 1usize;
        loop {
            let token = self.bump();
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(token.span);
                    }
                }
                TokenKind::Eof => {
                    return Err(ParseError::new(ParseErrorKind::MissingCloseBrace, open));
                }
                TokenKind::Error => return Err(self.lex_error(token)),
                _ => {}
            }
        }
    }
}
