// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for SDDL schema source.
//!
//! Converts source text into a stream of [`Token`]s. The lexer is
//! hand-written; `#` comments and whitespace are skipped, string escapes
//! are decoded in place, and every token carries its exact source span.
//!
//! The lexer is fail-fast: the first malformed construct aborts the
//! compile with a located diagnostic, matching the compiler's
//! one-error-per-run reporting policy.

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Keyword, Span, Token, TokenKind};
use crate::error::{ErrorKind, SourceResult};

/// Tokenizes a schema file, appending a final [`TokenKind::Eof`] token.
///
/// # Examples
///
/// ```
/// use sddl_core::source_analysis::{lex, TokenKind};
///
/// let tokens = lex("integer N = 2; # answer").unwrap();
/// assert!(matches!(tokens.last().unwrap().kind(), TokenKind::Eof));
/// assert_eq!(tokens.len(), 6); // integer N = 2 ; <EOF>
/// ```
pub fn lex(source: &str) -> SourceResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    let end = Span::new(lexer.current_position(), lexer.current_position());
    tokens.push(Token::new(TokenKind::Eof, end));
    Ok(tokens)
}

/// The lexer state.
struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks two characters ahead without consuming.
    fn peek_char2(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                }
                Some('#') => {
                    self.advance_while(|c| c != '\n');
                }
                _ => break,
            }
        }
    }

    /// Lexes the next token, or `None` at end of input.
    fn next_token(&mut self) -> SourceResult<Option<Token>> {
        self.skip_trivia();

        let start = self.current_position();
        let Some(c) = self.advance() else {
            return Ok(None);
        };

        let kind = match c {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '-' if self.peek_char() == Some('>') => {
                self.advance();
                TokenKind::Arrow
            }
            '-' => TokenKind::Minus,
            '=' if self.peek_char() == Some('=') => {
                self.advance();
                TokenKind::EqualEqual
            }
            '=' => TokenKind::Assign,
            '<' if self.peek_char() == Some('=') => {
                self.advance();
                TokenKind::LessEqual
            }
            '<' => TokenKind::Less,
            '>' if self.peek_char() == Some('=') => {
                self.advance();
                TokenKind::GreaterEqual
            }
            '>' => TokenKind::Greater,
            '!' if self.peek_char() == Some('=') => {
                self.advance();
                TokenKind::NotEqual
            }
            '!' => TokenKind::Not,
            '&' if self.peek_char() == Some('&') => {
                self.advance();
                TokenKind::AndAnd
            }
            '|' if self.peek_char() == Some('|') => {
                self.advance();
                TokenKind::OrOr
            }
            '.' if self.peek_char() == Some('.') => {
                self.advance();
                TokenKind::Concat
            }
            '@' if self.peek_char().is_some_and(|c| c.is_ascii_digit()) => {
                let digits_start = self.current_position();
                self.advance_while(|c| c.is_ascii_digit());
                let digits = self.text_for(self.span_from(digits_start));
                TokenKind::Place(EcoString::from(digits))
            }
            '"' | '\'' => return self.lex_string(start, c).map(Some),
            c if c.is_ascii_digit() => self.lex_number(start, c),
            c if c.is_alphabetic() || c == '_' => {
                self.advance_while(|c| c.is_alphanumeric() || c == '_');
                let text = self.text_for(self.span_from(start));
                match Keyword::from_ident(text) {
                    Some(kw) => TokenKind::Keyword(kw),
                    None => TokenKind::Identifier(EcoString::from(text)),
                }
            }
            other => {
                return Err(ErrorKind::UnexpectedCharacter(other).at(self.span_from(start)));
            }
        };

        Ok(Some(Token::new(kind, self.span_from(start))))
    }

    /// Lexes a numeric literal. `first` is the already-consumed digit.
    fn lex_number(&mut self, start: u32, first: char) -> TokenKind {
        if first == '0' && matches!(self.peek_char(), Some('x' | 'X')) {
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit());
            let text = self.text_for(self.span_from(start));
            return TokenKind::Hex(EcoString::from(text));
        }

        self.advance_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        // A '.' starts a fraction only when a digit follows; otherwise it
        // belongs to a `..` concatenation operator.
        if self.peek_char() == Some('.') && self.peek_char2().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let after_e = self.peek_char2();
            let exponent_digits = match after_e {
                Some('+' | '-') => true,
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent_digits {
                is_float = true;
                self.advance();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }

        let text = EcoString::from(self.text_for(self.span_from(start)));
        if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Integer(text)
        }
    }

    /// Lexes a string literal delimited by `quote`, decoding escapes.
    ///
    /// Escape rules: `\f` `\n` `\r` `\t` `\"` `\\` decode to the usual
    /// characters, `\'` decodes to `"` (a quirk of the language, kept for
    /// compatibility), `\uXXXX` decodes a four-hex-digit code unit, and any
    /// other `\X` pair is dropped entirely.
    fn lex_string(&mut self, start: u32, quote: char) -> SourceResult<Token> {
        let mut text = EcoString::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(ErrorKind::UnterminatedString.at(self.span_from(start)));
            };
            match c {
                c if c == quote => break,
                '\\' => {
                    let Some(escape) = self.advance() else {
                        return Err(ErrorKind::UnterminatedString.at(self.span_from(start)));
                    };
                    match escape {
                        'f' => text.push('\u{000C}'),
                        'n' => text.push('\n'),
                        'r' => text.push('\r'),
                        't' => text.push('\t'),
                        '"' | '\'' => text.push('"'),
                        '\\' => text.push('\\'),
                        'u' => {
                            let mut unit: u32 = 0;
                            let mut digits = 0;
                            while digits < 4 {
                                match self.peek_char().and_then(|c| c.to_digit(16)) {
                                    Some(d) => {
                                        self.advance();
                                        unit = unit * 16 + d;
                                        digits += 1;
                                    }
                                    None => break,
                                }
                            }
                            if digits == 4 {
                                if let Some(decoded) = char::from_u32(unit) {
                                    text.push(decoded);
                                }
                            }
                        }
                        // Unknown escapes are dropped without complaint.
                        _ => {}
                    }
                }
                c => text.push(c),
            }
        }
        Ok(Token::new(TokenKind::String(text), self.span_from(start)))
    }
}
