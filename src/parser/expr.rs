use crate::{
    ast::ast::{BinaryOperator, Expression, ExpressionKind, UnaryOperator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    runtime::value::Value,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

const PI: f32 = 3.1415927;
const EULER: f32 = 2.7182818;

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expression, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("expected an expression")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected("expected an operator or `;`")),
        };

        let led_bp = parser.current_binding_power();
        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();

    let kind = match token.kind {
        TokenKind::Integer => ExpressionKind::Literal(Value::Int(parse_number(&token)?)),
        TokenKind::Float => ExpressionKind::Literal(Value::Float(parse_number(&token)?)),
        TokenKind::String => ExpressionKind::Literal(Value::String(token.value.clone())),
        TokenKind::True => ExpressionKind::Literal(Value::Bool(true)),
        TokenKind::False => ExpressionKind::Literal(Value::Bool(false)),
        TokenKind::Pi => ExpressionKind::Literal(Value::Float(PI)),
        TokenKind::Euler => ExpressionKind::Literal(Value::Float(EULER)),
        TokenKind::Identifier => ExpressionKind::VariableRef { name: token.value.clone() },
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value.clone() },
                token.span.start.clone(),
            ))
        }
    };

    Ok(Expression::new(parser.advance_id(), token.span, kind))
}

fn parse_number<T: std::str::FromStr>(token: &Token) -> Result<T, Error> {
    token.value.parse().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError { token: token.value.clone() },
            token.span.start.clone(),
        )
    })
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::SlashSlash => BinaryOperator::IntegerDivide,
        TokenKind::Percent => BinaryOperator::Remainder,
        TokenKind::StarStar => BinaryOperator::Power,
        TokenKind::Equals => BinaryOperator::Equal,
        TokenKind::NotEquals => BinaryOperator::NotEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEquals => BinaryOperator::LessEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEquals => BinaryOperator::GreaterEqual,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Or => BinaryOperator::Or,
        _ => return None,
    };
    Some(operator)
}

fn make_binary(parser: &mut Parser, operator_token: Token, left: Expression, right: Expression) -> Result<Expression, Error> {
    let operator = binary_operator(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken { token: operator_token.value.clone() },
            operator_token.span.start.clone(),
        )
    })?;

    Ok(Expression::new(
        parser.advance_id(),
        left.span.to(&right.span),
        ExpressionKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expression, bp: BindingPower) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    make_binary(parser, operator_token, left, right)
}

/// `**` is right associative: `2 ** 3 ** 2` is `2 ** (3 ** 2)`.
pub fn parse_power_expr(parser: &mut Parser, left: Expression, bp: BindingPower) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, bp.weaker())?;

    make_binary(parser, operator_token, left, right)
}

fn expect_variable_name(operand: &Expression, operator: &Token, message: &str) -> Result<String, Error> {
    match &operand.kind {
        ExpressionKind::VariableRef { name } => Ok(name.clone()),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: operator.value.clone(),
                message: String::from(message),
            },
            operator.span.start.clone(),
        )),
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let operator = match operator_token.kind {
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Dash => UnaryOperator::Minus,
        TokenKind::Not => UnaryOperator::Not,
        TokenKind::PlusPlus => UnaryOperator::PreIncrement,
        TokenKind::MinusMinus => UnaryOperator::PreDecrement,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: operator_token.value.clone() },
                operator_token.span.start.clone(),
            ))
        }
    };

    if operator.is_update() {
        expect_variable_name(&operand, &operator_token, "expected a variable after increment or decrement")?;
    }

    Ok(Expression::new(
        parser.advance_id(),
        operator_token.span.to(&operand.span),
        ExpressionKind::Unary { operator, operand: Box::new(operand) },
    ))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expression, _bp: BindingPower) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    expect_variable_name(&left, &operator_token, "expected a variable before increment or decrement")?;

    let operator = if operator_token.kind == TokenKind::PlusPlus {
        UnaryOperator::PostIncrement
    } else {
        UnaryOperator::PostDecrement
    };

    Ok(Expression::new(
        parser.advance_id(),
        left.span.to(&operator_token.span),
        ExpressionKind::Unary { operator, operand: Box::new(left) },
    ))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expression, _bp: BindingPower) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let name = expect_variable_name(&left, &operator_token, "only variables can be assigned to")?;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expression::new(
        parser.advance_id(),
        left.span.to(&value.span),
        ExpressionKind::Assignment { name, value: Box::new(value) },
    ))
}

/// `condition ? then : else`, represented as an if-else with both branches.
pub fn parse_ternary_expr(parser: &mut Parser, left: Expression, bp: BindingPower) -> Result<Expression, Error> {
    parser.advance();
    let then_branch = parse_expr(parser, BindingPower::Default)?;
    parser.expect_error(TokenKind::Colon, Some(parser.unexpected("expected `:` in conditional expression")))?;
    let else_branch = parse_expr(parser, bp.weaker())?;

    Ok(Expression::new(
        parser.advance_id(),
        left.span.to(&else_branch.span),
        ExpressionKind::IfElse {
            condition: Box::new(left),
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
        },
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.clone();
    let mut expr = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect_error(TokenKind::CloseParen, Some(parser.unexpected("expected `)`")))?;

    expr.span = start.to(&end.span);
    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expression, _bp: BindingPower) -> Result<Expression, Error> {
    let open_paren = parser.advance().clone();
    let name = match &left.kind {
        ExpressionKind::VariableRef { name } => name.clone(),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: open_paren.value,
                    message: String::from("only named functions can be called"),
                },
                open_paren.span.start,
            ))
        }
    };

    let arguments = parse_arguments(parser)?;
    let end = parser.previous_end();

    Ok(Expression::new(
        parser.advance_id(),
        Span { start: left.span.start.clone(), end },
        ExpressionKind::FunctionCall { name, arguments },
    ))
}

/// Parses a comma-separated expression list up to and including the closing `)`.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expression>, Error> {
    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect_error(TokenKind::CloseParen, Some(parser.unexpected("expected `,` or `)` in argument list")))?;
    Ok(arguments)
}
