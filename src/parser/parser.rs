//! Parser state and the program-level grammar.
//!
//! Expressions are parsed Pratt-style: every token kind may have a prefix (NUD)
//! handler, an infix (LED) handler with a binding power, and a statement handler.
//! The tables are filled by [`create_token_lookups`] before parsing starts.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{NodeId, Program},
        declarations::Declaration,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::{parse_fn_decl, parse_var_decl},
};

/// Cursor over a token stream plus the handler tables driving it.
///
/// Also the source of node ids: every node built through one parser gets a
/// distinct id, starting at 1.
pub struct Parser {
    /// Always ends with EOF
    tokens: Vec<Token>,
    pos: usize,
    file: Rc<String>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    current_id: NodeId,
}

impl Parser {
    /// Wraps `tokens`, appending an EOF token when the stream lacks one.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let position = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span { start: position.clone(), end: position }
            ));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            current_id: 1,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead, EOF past the end.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The trailing EOF token is never consumed.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(&mut self, expected_kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind == expected_kind {
            return Ok(self.advance().clone());
        }

        match error {
            Some(error) => Err(error),
            None => Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value.clone() },
                token.span.start.clone(),
            )),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedTokenDetailed` error at the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from(message),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Binding power of the current token, `Default` when it continues no expression.
    pub fn current_binding_power(&self) -> BindingPower {
        self.binding_power_lookup
            .get(&self.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens that are also infix operators keep the binding power of their
    /// LED registration.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Advances the internal ID counter and returns the previous value.
    pub fn advance_id(&mut self) -> NodeId {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Returns the position where the current token starts.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the position where the previously consumed token ends.
    pub fn previous_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(previous) => self.tokens[previous].span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, parses the top-level declarations and
/// finally the `func main:void()` entry point, which must be the last item.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing)
/// - Result containing either the Program or an Error
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<Program, Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let result = parse_program(&mut parser);
    if let Err(error) = &result {
        tracing::debug!(%error, "parsing failed");
    }

    (parser, result)
}

fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let start = Position(0, Rc::clone(&parser.file));
    let mut declarations = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::Func => {
                let is_entry = parser.peek_kind(1) == TokenKind::Identifier
                    && parser.tokens[parser.pos + 1].value == "main";
                let function = parse_fn_decl(parser)?;

                if !is_entry {
                    declarations.push(Declaration::Function(function));
                    continue;
                }

                if !function.parameters.is_empty() {
                    return Err(Error::new(
                        ErrorImpl::InvalidExpression {
                            message: String::from("the entry point `main` takes no parameters"),
                        },
                        function.span.start.clone(),
                    ));
                }
                if function.return_type_name.as_deref().is_some_and(|name| name != "void") {
                    return Err(Error::new(
                        ErrorImpl::InvalidExpression {
                            message: String::from("the entry point `main` must be declared `void`"),
                        },
                        function.span.start.clone(),
                    ));
                }
                if parser.has_tokens() {
                    return Err(parser.unexpected("expected end of file after the entry point"));
                }

                return Ok(Program {
                    declarations,
                    entry: function.body,
                    span: Span { start, end: parser.previous_end() },
                });
            }
            TokenKind::Let | TokenKind::Const => declarations.push(parse_var_decl(parser)?),
            TokenKind::EOF => return Err(parser.unexpected("expected entry point `func main:void()`")),
            _ => return Err(parser.unexpected("expected a top-level declaration")),
        }
    }
}
