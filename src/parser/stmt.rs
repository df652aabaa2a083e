use crate::{
    ast::{
        ast::{Expression, ExpressionKind, SwitchCase},
        declarations::{
            ConstantDeclaration, Declaration, FunctionDeclaration, ParameterDeclaration,
            VariableDeclaration,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_arguments, parse_expr},
        lookups::BindingPower,
    },
    Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect_error(TokenKind::Semicolon, Some(parser.unexpected("expected `;` after expression")))?;

    Ok(expr)
}

fn parse_type_name(parser: &mut Parser) -> Result<String, Error> {
    let error = parser.unexpected("expected a type name");
    Ok(parser.expect_error(TokenKind::Identifier, Some(error))?.value)
}

/// `let name[:type] [= value];` or `const name:type [= value];`
pub fn parse_var_decl(parser: &mut Parser) -> Result<Declaration, Error> {
    let start_token = parser.advance().clone();
    let is_constant = start_token.kind == TokenKind::Const;

    let error = parser.unexpected("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type_name(parser)?)
    } else if is_constant {
        return Err(parser.unexpected("expected explicit type in constant definition"));
    } else {
        None
    };

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else if explicit_type.is_none() {
        return Err(parser.unexpected("expected rhs or explicit type"));
    } else {
        None
    };

    parser.expect_error(TokenKind::Semicolon, Some(parser.unexpected("expected `;` after declaration")))?;

    let span = Span { start: start_token.span.start, end: parser.previous_end() };
    let id = parser.advance_id();

    Ok(match explicit_type {
        Some(type_name) if is_constant => Declaration::Constant(ConstantDeclaration {
            id,
            span,
            name,
            type_name,
            initializer,
        }),
        type_name => Declaration::Variable(VariableDeclaration {
            id,
            span,
            name,
            type_name,
            initializer,
        }),
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let declaration = parse_var_decl(parser)?;

    Ok(Expression::new(
        parser.advance_id(),
        declaration.span().clone(),
        ExpressionKind::Declaration(Box::new(declaration)),
    ))
}

/// `func name[:type](param:type, ...) { ... }`
pub fn parse_fn_decl(parser: &mut Parser) -> Result<FunctionDeclaration, Error> {
    let start = parser.advance().span.start.clone();

    let error = parser.unexpected("expected function name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let return_type_name = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type_name(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let name_token = parser.expect(TokenKind::Identifier)?;
        parser.expect_error(TokenKind::Colon, Some(parser.unexpected("expected `:` and a parameter type")))?;
        let type_name = parse_type_name(parser)?;

        parameters.push(ParameterDeclaration {
            id: parser.advance_id(),
            span: Span { start: name_token.span.start, end: parser.previous_end() },
            name: name_token.value,
            type_name,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("expected `,` or `)` in parameter list"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_body(parser)?;

    Ok(FunctionDeclaration {
        id: parser.advance_id(),
        span: Span { start, end: parser.previous_end() },
        name,
        parameters,
        return_type_name,
        body,
    })
}

fn parse_body(parser: &mut Parser) -> Result<Expression, Error> {
    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Err(parser.unexpected("expected `{`"));
    }
    parse_block_stmt(parser)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}`"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::Sequence(statements),
    ))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let span = parser.advance().span.clone();
    Ok(Expression::new(parser.advance_id(), span, ExpressionKind::Empty))
}

/// `if (c) {..} elif (c) {..} else {..}`; every `elif` becomes an if-else nested
/// in the else branch of the previous one.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_branch = parse_body(parser)?;

    let else_branch = match parser.current_token_kind() {
        TokenKind::Elif => Some(Box::new(parse_if_stmt(parser)?)),
        TokenKind::Else => {
            parser.advance();
            Some(Box::new(parse_body(parser)?))
        }
        _ => None,
    };

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::IfElse {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
        },
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_body(parser)?;

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::WhileLoop {
            condition: Box::new(condition),
            body: Box::new(body),
        },
    ))
}

/// `for (let i[:type] = start; condition; step) { ... }`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    parser.expect_error(TokenKind::Let, Some(parser.unexpected("expected `let` to declare the loop iterator")))?;
    let iterator = parser.expect(TokenKind::Identifier)?.value;

    let iterator_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type_name(parser)?)
    } else {
        None
    };

    parser.expect_error(TokenKind::Assignment, Some(parser.unexpected("expected `=` and a start value")))?;
    let start_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let step = if parser.current_token_kind() != TokenKind::CloseParen {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_body(parser)?;

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::ForLoop {
            iterator,
            iterator_type,
            start: Box::new(start_value),
            condition: Box::new(condition),
            step,
            body: Box::new(body),
        },
    ))
}

fn parse_case_body(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.get_position();

    let mut statements = Vec::new();
    while !matches!(
        parser.current_token_kind(),
        TokenKind::Case | TokenKind::Default | TokenKind::CloseCurly | TokenKind::EOF
    ) {
        statements.push(parse_stmt(parser)?);
    }

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::Sequence(statements),
    ))
}

/// `switch (value) { case v: ... default: ... }`
pub fn parse_switch_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    let scrutinee = parse_expr(parser, BindingPower::Default)?;
    parser.expect_error(TokenKind::OpenCurly, Some(parser.unexpected("expected `{` after switch value")))?;

    let mut cases = Vec::new();
    let mut default = None;

    while parser.current_token_kind() != TokenKind::CloseCurly {
        match parser.current_token_kind() {
            TokenKind::Case => {
                parser.advance();
                let value = parse_expr(parser, BindingPower::Default)?;
                parser.expect_error(TokenKind::Colon, Some(parser.unexpected("expected `:` after case value")))?;
                let body = parse_case_body(parser)?;
                cases.push(SwitchCase { value, body });
            }
            TokenKind::Default if default.is_none() => {
                parser.advance();
                parser.expect_error(TokenKind::Colon, Some(parser.unexpected("expected `:` after default")))?;
                default = Some(Box::new(parse_case_body(parser)?));
            }
            TokenKind::Default => return Err(parser.unexpected("duplicate default case")),
            _ => return Err(parser.unexpected("expected `case`, `default` or `}`")),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::Switch {
            scrutinee: Box::new(scrutinee),
            cases,
            default,
        },
    ))
}

/// `break;` and `continue;`
pub fn parse_jump_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();
    parser.expect_error(TokenKind::Semicolon, Some(parser.unexpected("expected `;`")))?;

    let kind = if token.kind == TokenKind::Break {
        ExpressionKind::Break
    } else {
        ExpressionKind::Continue
    };

    Ok(Expression::new(parser.advance_id(), token.span, kind))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };

    parser.expect_error(TokenKind::Semicolon, Some(parser.unexpected("expected `;` after return")))?;

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::Return(value),
    ))
}

/// `print(a, b, ...);`
pub fn parse_print_stmt(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect_error(TokenKind::OpenParen, Some(parser.unexpected("expected `(` after print")))?;
    let arguments = parse_arguments(parser)?;
    parser.expect_error(TokenKind::Semicolon, Some(parser.unexpected("expected `;` after print")))?;

    Ok(Expression::new(
        parser.advance_id(),
        Span { start, end: parser.previous_end() },
        ExpressionKind::Print(arguments),
    ))
}
