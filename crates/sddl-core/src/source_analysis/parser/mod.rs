// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for SDDL schema files.
//!
//! The parser consumes the token stream produced by [`super::lex`] and
//! builds the [`Schema`] syntax tree. The three block forms share one
//! leading `NAME`, so the bracket that follows selects the production:
//! `{` opens a message, `[` a typedef, `(` an rpc.
//!
//! Unlike editor-oriented parsers, this one is fail-fast: the compiler
//! reports exactly one error per run, so the first unexpected token aborts
//! parsing with a diagnostic listing the acceptable alternatives.

use ecow::EcoString;

use crate::ast::{
    AliasDef, AliasTarget, AssignClause, CallDef, CallTarget, ConstantDef, ConstantKind, EntryDef,
    Ident, Item, MessageDef, Place, RequirePath, RpcDef, Schema, TypeName, TypeRef, TypedefDef,
};
use crate::error::{ErrorKind, SourceResult};
use crate::source_analysis::{lex, Keyword, Span, Token, TokenKind};

mod expressions;


/// Parses schema source text into a [`Schema`].
///
/// # Examples
///
/// ```
/// use sddl_core::source_analysis::parse;
///
/// let schema = parse("integer N = 2 + 3 * 4;").unwrap();
/// assert_eq!(schema.items.len(), 1);
/// ```
///
/// # Errors
///
/// Returns the first lexical or syntactic error encountered.
pub fn parse(source: &str) -> SourceResult<Schema> {
    parse_tokens(lex(source)?)
}

/// Parses an already-lexed token stream into a [`Schema`].
///
/// # Errors
///
/// Returns the first syntactic error encountered.
pub fn parse_tokens(tokens: Vec<Token>) -> SourceResult<Schema> {
    let mut parser = Parser::new(tokens);
    parser.parse_schema()
}

/// Token display names accepted at the start of a top-level definition.
const ITEM_START: &[&str] = &[
    "'auto'",
    "'local'",
    "'integer'",
    "'number'",
    "'string'",
    "'boolean'",
    "NAME",
    "'<EOF>'",
];

/// The parser state.
pub(crate) struct Parser {
    /// The tokens being parsed; always ends with [`TokenKind::Eof`].
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(Token::kind),
            Some(TokenKind::Eof)
        ));
        Self { tokens, current: 0 }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Returns the current token.
    fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .or_else(|| self.tokens.last())
            .expect("parser has no tokens; expected at least an EOF token")
    }

    /// Returns the current token kind.
    fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Returns the span of the current token.
    fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Peeks at the next token kind.
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.current + 1).map(Token::kind)
    }

    /// Checks if we're at the end of input.
    fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the previous one.
    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current - 1].clone()
    }

    /// Checks the current token against an exact keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current_kind(), TokenKind::Keyword(k) if *k == keyword)
    }

    /// Consumes the current token if it matches the given fixed kind.
    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Builds a "mismatched input" error at the current token.
    fn unexpected(&self, expected: &[&str]) -> crate::error::SourceError {
        ErrorKind::UnexpectedToken {
            found: EcoString::from(self.current_kind().to_string()),
            expected: EcoString::from(expected.join(" or ")),
        }
        .at(self.current_span())
    }

    /// Expects an exact fixed token, advancing past it.
    fn expect(&mut self, kind: &TokenKind) -> SourceResult<Token> {
        if self.current_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&[kind.display_name()]))
        }
    }

    /// Expects an identifier and returns it as an [`Ident`].
    fn expect_name(&mut self) -> SourceResult<Ident> {
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                let ident = Ident {
                    name: name.clone(),
                    span: self.current_span(),
                };
                self.advance();
                Ok(ident)
            }
            _ => Err(self.unexpected(&["NAME"])),
        }
    }

    /// Expects a `@N` place tag and parses its value.
    fn expect_place(&mut self) -> SourceResult<Place> {
        match self.current_kind() {
            TokenKind::Place(digits) => {
                let span = self.current_span();
                let value = digits.parse::<u32>().map_err(|_| {
                    ErrorKind::InvalidNumber {
                        text: EcoString::from(self.current_kind().to_string()),
                    }
                    .at(span)
                })?;
                self.advance();
                Ok(Place { value, span })
            }
            _ => Err(self.unexpected(&["PLACE"])),
        }
    }

    /// Skips any run of `;` separators.
    fn skip_semicolons(&mut self) {
        while self.match_token(&TokenKind::Semicolon) {}
    }

    // ========================================================================
    // Grammar productions
    // ========================================================================

    /// file := require? (constant | message | typedef | rpc)*
    fn parse_schema(&mut self) -> SourceResult<Schema> {
        let start = self.current_span();
        let requires = if self.check_keyword(Keyword::Require) {
            self.parse_require_block()?
        } else {
            Vec::new()
        };

        let mut items = Vec::new();
        loop {
            self.skip_semicolons();
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Keyword(k) if constant_kind(*k).is_some() => {
                    items.push(Item::Constant(self.parse_constant()?));
                }
                TokenKind::Identifier(_) => match self.peek_kind() {
                    Some(TokenKind::LeftBrace) => items.push(Item::Message(self.parse_message()?)),
                    Some(TokenKind::LeftBracket) => {
                        items.push(Item::Typedef(self.parse_typedef()?));
                    }
                    Some(TokenKind::LeftParen) => items.push(Item::Rpc(self.parse_rpc()?)),
                    _ => {
                        // Report at the token after the name, which is the
                        // one that failed to select a block form.
                        self.advance();
                        return Err(self.unexpected(&["'{'", "'['", "'('"]));
                    }
                },
                _ => return Err(self.unexpected(ITEM_START)),
            }
        }

        let span = start.cover(self.current_span());
        Ok(Schema {
            requires,
            items,
            span,
        })
    }

    /// require := 'require' '{' STRING* '}'
    fn parse_require_block(&mut self) -> SourceResult<Vec<RequirePath>> {
        self.advance(); // require
        self.expect(&TokenKind::LeftBrace)?;
        let mut paths = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::String(path) => {
                    paths.push(RequirePath {
                        path: path.clone(),
                        span: self.current_span(),
                    });
                    self.advance();
                }
                TokenKind::RightBrace => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected(&["STRING", "'}'"])),
            }
        }
        Ok(paths)
    }

    /// constant := ('auto'|'local'|'integer'|'number'|'string'|'boolean') NAME '=' expr
    fn parse_constant(&mut self) -> SourceResult<ConstantDef> {
        let start = self.current_span();
        let &TokenKind::Keyword(keyword) = self.current_kind() else {
            return Err(self.unexpected(ITEM_START));
        };
        let kind = constant_kind(keyword).expect("caller checked the keyword");
        self.advance();

        // `local` may be followed by an explicit built-in kind; the grammar
        // accepts it but the kind is still inferred.
        if kind == ConstantKind::Local {
            if let TokenKind::Keyword(extra) = self.current_kind() {
                if extra.is_builtin_kind() {
                    self.advance();
                }
            }
        }

        let name = self.expect_name()?;
        self.expect(&TokenKind::Assign)?;
        let value = self.parse_expr()?;
        let span = start.cover(value.span());
        Ok(ConstantDef {
            kind,
            name,
            value,
            span,
        })
    }

    /// message := NAME '{' (entry ';'?)* '}'
    fn parse_message(&mut self) -> SourceResult<MessageDef> {
        let name = self.expect_name()?;
        self.expect(&TokenKind::LeftBrace)?;
        let mut entries = Vec::new();
        loop {
            self.skip_semicolons();
            if self.current_kind() == &TokenKind::RightBrace {
                break;
            }
            entries.push(self.parse_entry()?);
        }
        let close = self.expect(&TokenKind::RightBrace)?;
        let span = name.span.cover(close.span());
        Ok(MessageDef {
            name,
            entries,
            span,
        })
    }

    /// entry := type NAME PLACE ('=' (delete|option|array|table|expr))?
    fn parse_entry(&mut self) -> SourceResult<EntryDef> {
        let ty = self.parse_type(&["'}'"])?;
        let name = self.expect_name()?;
        let place = self.expect_place()?;
        let assign = if self.match_token(&TokenKind::Assign) {
            Some(self.parse_assign_clause()?)
        } else {
            None
        };
        let end = assign
            .as_ref()
            .map_or(place.span, |clause| match clause {
                AssignClause::Delete(span)
                | AssignClause::Option(span)
                | AssignClause::Array(span)
                | AssignClause::Table(span) => *span,
                AssignClause::Default(expr) => expr.span(),
            });
        Ok(EntryDef {
            span: ty.span.cover(end),
            ty,
            name,
            place,
            assign,
        })
    }

    /// The right-hand side of an entry's `=` clause.
    fn parse_assign_clause(&mut self) -> SourceResult<AssignClause> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Delete) => {
                self.advance();
                Ok(AssignClause::Delete(span))
            }
            TokenKind::Keyword(Keyword::Option) => {
                self.advance();
                Ok(AssignClause::Option(span))
            }
            TokenKind::Keyword(Keyword::Array) => {
                self.advance();
                Ok(AssignClause::Array(span))
            }
            TokenKind::Keyword(Keyword::Table) => {
                self.advance();
                Ok(AssignClause::Table(span))
            }
            _ => Ok(AssignClause::Default(self.parse_expr()?)),
        }
    }

    /// type := 'integer' | 'number' | 'string' | 'boolean' | NAME
    ///
    /// `extra_expected` names the tokens that would also have been legal at
    /// this point, for the diagnostic when neither matches.
    fn parse_type(&mut self, extra_expected: &[&str]) -> SourceResult<TypeRef> {
        let span = self.current_span();
        let name = match self.current_kind() {
            TokenKind::Keyword(Keyword::Boolean) => TypeName::Boolean,
            TokenKind::Keyword(Keyword::Integer) => TypeName::Integer,
            TokenKind::Keyword(Keyword::Number) => TypeName::Number,
            TokenKind::Keyword(Keyword::String) => TypeName::String,
            TokenKind::Identifier(name) => TypeName::Named(name.clone()),
            _ => {
                let mut expected = vec!["'integer'", "'number'", "'string'", "'boolean'", "NAME"];
                expected.extend_from_slice(extra_expected);
                return Err(self.unexpected(&expected));
            }
        };
        self.advance();
        Ok(TypeRef { name, span })
    }

    /// typedef := NAME '[' (alias ';'?)* ']'
    fn parse_typedef(&mut self) -> SourceResult<TypedefDef> {
        let name = self.expect_name()?;
        self.expect(&TokenKind::LeftBracket)?;
        let mut aliases = Vec::new();
        loop {
            self.skip_semicolons();
            if self.current_kind() == &TokenKind::RightBracket {
                break;
            }
            aliases.push(self.parse_alias()?);
        }
        let close = self.expect(&TokenKind::RightBracket)?;
        let span = name.span.cover(close.span());
        Ok(TypedefDef {
            name,
            aliases,
            span,
        })
    }

    /// alias := NAME PLACE '=' ('delete' | 'null' | type)
    fn parse_alias(&mut self) -> SourceResult<AliasDef> {
        let name = self.expect_name()?;
        let place = self.expect_place()?;
        self.expect(&TokenKind::Assign)?;
        let target_span = self.current_span();
        let target = match self.current_kind() {
            TokenKind::Keyword(Keyword::Delete) => {
                self.advance();
                AliasTarget::Delete(target_span)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                AliasTarget::Null(target_span)
            }
            _ => AliasTarget::Type(self.parse_type(&["'delete'", "'null'"])?),
        };
        let span = name.span.cover(target_span);
        Ok(AliasDef {
            name,
            place,
            target,
            span,
        })
    }

    /// rpc := NAME '(' (call ';'?)* ')'
    fn parse_rpc(&mut self) -> SourceResult<RpcDef> {
        let name = self.expect_name()?;
        self.expect(&TokenKind::LeftParen)?;
        let mut calls = Vec::new();
        loop {
            self.skip_semicolons();
            if self.current_kind() == &TokenKind::RightParen {
                break;
            }
            calls.push(self.parse_call()?);
        }
        let close = self.expect(&TokenKind::RightParen)?;
        let span = name.span.cover(close.span());
        Ok(RpcDef { name, calls, span })
    }

    /// call := NAME PLACE '=' ('delete' | type? ('->' type)?)
    fn parse_call(&mut self) -> SourceResult<CallDef> {
        let name = self.expect_name()?;
        let place = self.expect_place()?;
        let assign = self.expect(&TokenKind::Assign)?;
        let mut end = assign.span();

        if self.check_keyword(Keyword::Delete) {
            let span = self.current_span();
            self.advance();
            return Ok(CallDef {
                span: name.span.cover(span),
                name,
                place,
                target: CallTarget::Delete(span),
            });
        }

        let request = if self.starts_request_type() {
            let ty = self.parse_type(&[])?;
            end = ty.span;
            Some(ty)
        } else {
            None
        };
        let response = if self.match_token(&TokenKind::Arrow) {
            let ty = self.parse_type(&[])?;
            end = ty.span;
            Some(ty)
        } else {
            None
        };

        Ok(CallDef {
            span: name.span.cover(end),
            name,
            place,
            target: CallTarget::Signature { request, response },
        })
    }

    /// A request type is present when the current token can start a type
    /// and is not actually the name of the *next* call (a `NAME` directly
    /// followed by a `PLACE`).
    fn starts_request_type(&self) -> bool {
        match self.current_kind() {
            TokenKind::Keyword(k) => k.is_builtin_kind(),
            TokenKind::Identifier(_) => !matches!(self.peek_kind(), Some(TokenKind::Place(_))),
            _ => false,
        }
    }
}

/// Maps a keyword to the constant kind it declares, if any.
fn constant_kind(keyword: Keyword) -> Option<ConstantKind> {
    match keyword {
        Keyword::Auto => Some(ConstantKind::Auto),
        Keyword::Local => Some(ConstantKind::Local),
        Keyword::Boolean => Some(ConstantKind::Boolean),
        Keyword::Integer => Some(ConstantKind::Integer),
        Keyword::Number => Some(ConstantKind::Number),
        Keyword::String => Some(ConstantKind::String),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Expr};

    fn parse_ok(source: &str) -> Schema {
        parse(source).expect("schema should parse")
    }

    #[test]
    fn parses_empty_file() {
        let schema = parse_ok("");
        assert!(schema.requires.is_empty());
        assert!(schema.items.is_empty());
    }

    #[test]
    fn parses_empty_require_block() {
        let schema = parse_ok("require { }");
        assert!(schema.requires.is_empty());
    }

    #[test]
    fn parses_require_paths() {
        let schema = parse_ok("require { \"util.sddl\" 'more.sddl' }");
        let paths: Vec<_> = schema.requires.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["util.sddl", "more.sddl"]);
    }

    #[test]
    fn parses_constant_kinds() {
        let schema = parse_ok(
            "auto A = 1; local B = 2; integer C = 3;\n\
             number D = 4.0; string E = 'e'; boolean F = true;",
        );
        let kinds: Vec<_> = schema
            .items
            .iter()
            .map(|item| match item {
                Item::Constant(c) => c.kind,
                _ => panic!("expected constant"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ConstantKind::Auto,
                ConstantKind::Local,
                ConstantKind::Integer,
                ConstantKind::Number,
                ConstantKind::String,
                ConstantKind::Boolean,
            ]
        );
    }

    #[test]
    fn local_with_explicit_kind_is_accepted_and_ignored() {
        let schema = parse_ok("local integer Hidden = 7;");
        let Item::Constant(c) = &schema.items[0] else {
            panic!("expected constant");
        };
        assert_eq!(c.kind, ConstantKind::Local);
        assert_eq!(c.name.name, "Hidden");
    }

    #[test]
    fn block_shape_selects_production() {
        let schema = parse_ok("M { integer x @1; } T [ a @1 = null; ] R ( c @1 = ; )");
        assert!(matches!(schema.items[0], Item::Message(_)));
        assert!(matches!(schema.items[1], Item::Typedef(_)));
        assert!(matches!(schema.items[2], Item::Rpc(_)));
    }

    #[test]
    fn parses_message_entries() {
        let schema = parse_ok(
            "Position {\n\
             \tinteger x @1;\n\
             \tinteger y @2 = 10;\n\
             \tnumber speed @3 = option;\n\
             \tstring tags @4 = array;\n\
             \tWaypoint next @5;\n\
             \tinteger gone @6 = delete;\n\
             }",
        );
        let Item::Message(message) = &schema.items[0] else {
            panic!("expected message");
        };
        assert_eq!(message.name.name, "Position");
        assert_eq!(message.entries.len(), 6);
        assert_eq!(message.entries[0].assign, None);
        assert!(matches!(
            message.entries[1].assign,
            Some(AssignClause::Default(_))
        ));
        assert!(matches!(
            message.entries[2].assign,
            Some(AssignClause::Option(_))
        ));
        assert!(matches!(
            message.entries[3].assign,
            Some(AssignClause::Array(_))
        ));
        assert_eq!(
            message.entries[4].ty.name,
            TypeName::Named("Waypoint".into())
        );
        assert!(matches!(
            message.entries[5].assign,
            Some(AssignClause::Delete(_))
        ));
        assert_eq!(message.entries[4].place.value, 5);
    }

    #[test]
    fn parses_typedef_aliases() {
        let schema = parse_ok("T [ a @1 = integer; b @2 = delete; c @3 = null; d @4 = Widget ]");
        let Item::Typedef(typedef) = &schema.items[0] else {
            panic!("expected typedef");
        };
        assert_eq!(typedef.aliases.len(), 4);
        assert!(matches!(
            typedef.aliases[0].target,
            AliasTarget::Type(TypeRef {
                name: TypeName::Integer,
                ..
            })
        ));
        assert!(matches!(typedef.aliases[1].target, AliasTarget::Delete(_)));
        assert!(matches!(typedef.aliases[2].target, AliasTarget::Null(_)));
        assert!(matches!(
            typedef.aliases[3].target,
            AliasTarget::Type(TypeRef {
                name: TypeName::Named(_),
                ..
            })
        ));
    }

    #[test]
    fn parses_rpc_call_signatures() {
        let schema = parse_ok(
            "Nav (\n\
             \tping @1 = ;\n\
             \tmove @2 = MoveRequest;\n\
             \tpos @3 = -> Position;\n\
             \troute @4 = RouteRequest -> RouteResponse;\n\
             \tgone @5 = delete;\n\
             )",
        );
        let Item::Rpc(rpc) = &schema.items[0] else {
            panic!("expected rpc");
        };
        assert_eq!(rpc.calls.len(), 5);
        let signatures: Vec<_> = rpc
            .calls
            .iter()
            .map(|call| match &call.target {
                CallTarget::Delete(_) => (false, false, true),
                CallTarget::Signature { request, response } => {
                    (request.is_some(), response.is_some(), false)
                }
            })
            .collect();
        assert_eq!(
            signatures,
            vec![
                (false, false, false),
                (true, false, false),
                (false, true, false),
                (true, true, false),
                (false, false, true),
            ]
        );
    }

    #[test]
    fn rpc_calls_without_semicolons_disambiguate() {
        let schema = parse_ok("Nav ( a @1 = b @2 = delete )");
        let Item::Rpc(rpc) = &schema.items[0] else {
            panic!("expected rpc");
        };
        assert_eq!(rpc.calls.len(), 2);
        assert!(matches!(
            rpc.calls[0].target,
            CallTarget::Signature {
                request: None,
                response: None
            }
        ));
        assert!(matches!(rpc.calls[1].target, CallTarget::Delete(_)));
    }

    #[test]
    fn exponent_is_right_associative() {
        let schema = parse_ok("auto P = 2 ^ 3 ^ 2;");
        let Item::Constant(c) = &schema.items[0] else {
            panic!("expected constant");
        };
        let Expr::Binary { op, lhs, rhs, .. } = &c.value else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Pow);
        assert!(matches!(**lhs, Expr::Int(2, _)));
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let schema = parse_ok("auto N = 2 + 3 * 4;");
        let Item::Constant(c) = &schema.items[0] else {
            panic!("expected constant");
        };
        let Expr::Binary { op, rhs, .. } = &c.value else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn negative_literals_in_atom_position() {
        let schema = parse_ok("auto A = -5; auto B = 1 - 2; auto C = -2.5;");
        let values: Vec<_> = schema
            .items
            .iter()
            .map(|item| match item {
                Item::Constant(c) => &c.value,
                _ => panic!("expected constant"),
            })
            .collect();
        assert!(matches!(values[0], Expr::Int(-5, _)));
        assert!(matches!(values[1], Expr::Binary { op: BinaryOp::Sub, .. }));
        assert!(matches!(values[2], Expr::Float(f, _) if *f == -2.5));
    }

    #[test]
    fn hex_literals_parse_as_base_16() {
        let schema = parse_ok("auto H = 0x2A;");
        let Item::Constant(c) = &schema.items[0] else {
            panic!("expected constant");
        };
        assert!(matches!(c.value, Expr::Int(42, _)));
    }

    #[test]
    fn hex_wraps_into_signed_32_bits() {
        let schema = parse_ok("auto H = 0xFFFFFFFF;");
        let Item::Constant(c) = &schema.items[0] else {
            panic!("expected constant");
        };
        assert!(matches!(c.value, Expr::Int(-1, _)));
    }

    #[test]
    fn integer_overflow_is_a_diagnostic() {
        let err = parse("auto N = 2147483648;").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidNumber { .. }));

        let err = parse("auto N = 0x100000000;").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidNumber { .. }));
    }

    #[test]
    fn minimum_integer_parses() {
        let schema = parse_ok("auto N = -2147483648;");
        let Item::Constant(c) = &schema.items[0] else {
            panic!("expected constant");
        };
        assert!(matches!(c.value, Expr::Int(i32::MIN, _)));
    }

    #[test]
    fn parse_error_lists_expected_tokens() {
        let err = parse("integer = 4").unwrap_err();
        let ErrorKind::UnexpectedToken { found, expected } = err.kind else {
            panic!("expected a parse error");
        };
        assert_eq!(found, "=");
        assert_eq!(expected, "NAME");
    }

    #[test]
    fn top_level_error_mentions_eof_alternative() {
        let err = parse("}").unwrap_err();
        let ErrorKind::UnexpectedToken { found, expected } = err.kind else {
            panic!("expected a parse error");
        };
        assert_eq!(found, "}");
        assert!(expected.as_str().ends_with("NAME or '<EOF>'"));
    }

    #[test]
    fn name_without_block_reports_bracket_alternatives() {
        let err = parse("Lonely").unwrap_err();
        let ErrorKind::UnexpectedToken { expected, .. } = err.kind else {
            panic!("expected a parse error");
        };
        assert_eq!(expected, "'{' or '[' or '('");
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = "require {}\nauto A = B + 1; integer B = 5;\nM { integer x @1; }";
        assert_eq!(parse_ok(source), parse_ok(source));
    }
}
