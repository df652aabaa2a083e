use crate::{
    ast::{
        ast::{Expression, ExpressionKind, Program},
        declarations::Declaration,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{annotations::Annotations, symbols::SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Default,
    InsideLoop,
    InsideSwitch,
    InsideFunction,
}

pub struct ContextChecker<'a> {
    pub stack: Vec<Context>,
    pub annotations: &'a Annotations,
}

impl<'a> ContextChecker<'a> {
    pub fn new(annotations: &'a Annotations) -> Self {
        ContextChecker {
            stack: vec![Context::Default],
            annotations,
        }
    }

    fn top(&self) -> Context {
        self.stack.last().copied().unwrap_or(Context::Default)
    }

    /// `break` leaves the innermost loop or switch.
    pub fn can_break(&self) -> bool {
        matches!(self.top(), Context::InsideLoop | Context::InsideSwitch)
    }

    /// `continue` passes through switches to reach a loop.
    pub fn can_continue(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|context| **context != Context::InsideSwitch)
            == Some(&Context::InsideLoop)
    }

    /// `return` passes through loops and switches to reach a function.
    pub fn can_return(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|context| !matches!(context, Context::InsideLoop | Context::InsideSwitch))
            == Some(&Context::InsideFunction)
    }

    fn within(&mut self, context: Context, expression: &Expression) -> Result<(), Error> {
        self.stack.push(context);
        let result = check_expr(self, expression);
        self.stack.pop();
        result
    }
}

/// Rejects jumps outside of the constructs they target, calls whose argument
/// count fits no overload, and writes to constants.
pub fn check_context(program: &Program, annotations: &Annotations) -> Result<(), Error> {
    let mut checker = ContextChecker::new(annotations);

    for declaration in &program.declarations {
        check_declaration(&mut checker, declaration)?;
    }

    checker.within(Context::InsideFunction, &program.entry)
}

pub fn check_declaration(checker: &mut ContextChecker, declaration: &Declaration) -> Result<(), Error> {
    match declaration {
        Declaration::Variable(variable) => match &variable.initializer {
            Some(initializer) => check_expr(checker, initializer),
            None => Ok(()),
        },
        Declaration::Constant(constant) => match &constant.initializer {
            Some(initializer) => check_expr(checker, initializer),
            None => Ok(()),
        },
        Declaration::Function(function) => {
            // A nested function does not inherit the loops around it
            let outer = std::mem::replace(&mut checker.stack, vec![Context::Default]);
            let result = checker.within(Context::InsideFunction, &function.body);
            checker.stack = outer;
            result
        }
    }
}

fn check_writable(checker: &ContextChecker, expression: &Expression, name: &str) -> Result<(), Error> {
    let kind = checker
        .annotations
        .binding(expression.id)
        .and_then(|declaration| checker.annotations.symbol_kind(declaration));

    if kind == Some(SymbolKind::Constant) {
        return Err(ErrorImpl::InvalidAssignment { variable: String::from(name) }.at(expression.span.start.clone()));
    }
    Ok(())
}

fn invalid(expression: &Expression, message: &str) -> Error {
    ErrorImpl::InvalidExpression { message: String::from(message) }.at(expression.span.start.clone())
}

pub fn check_expr(checker: &mut ContextChecker, expression: &Expression) -> Result<(), Error> {
    match &expression.kind {
        ExpressionKind::Literal(_) | ExpressionKind::VariableRef { .. } | ExpressionKind::Empty => Ok(()),
        ExpressionKind::Break if checker.can_break() => Ok(()),
        ExpressionKind::Break => Err(invalid(expression, "`break` outside of a loop or switch")),
        ExpressionKind::Continue if checker.can_continue() => Ok(()),
        ExpressionKind::Continue => Err(invalid(expression, "`continue` outside of a loop")),
        ExpressionKind::Return(_) if !checker.can_return() => Err(invalid(expression, "`return` outside of a function")),
        ExpressionKind::Return(value) => match value {
            Some(value) => check_expr(checker, value),
            None => Ok(()),
        },
        ExpressionKind::Assignment { name, value } => {
            check_writable(checker, expression, name)?;
            check_expr(checker, value)
        }
        ExpressionKind::Unary { operator, operand } => {
            if let (true, ExpressionKind::VariableRef { name }) = (operator.is_update(), &operand.kind) {
                check_writable(checker, operand, name)?;
            }
            check_expr(checker, operand)
        }
        ExpressionKind::Binary { left, right, .. } => {
            check_expr(checker, left)?;
            check_expr(checker, right)
        }
        ExpressionKind::FunctionCall { name, arguments } => {
            let candidates = checker.annotations.candidates(expression.id);
            if !candidates.iter().any(|candidate| candidate.parameter_types.len() == arguments.len()) {
                let mut arities: Vec<usize> = candidates
                    .iter()
                    .map(|candidate| candidate.parameter_types.len())
                    .collect();
                arities.sort_unstable();
                arities.dedup();

                return Err(ErrorImpl::ArityMismatch {
                    function: name.clone(),
                    expected: arities
                        .iter()
                        .map(|arity| arity.to_string())
                        .collect::<Vec<String>>()
                        .join(" or "),
                    received: arguments.len(),
                }
                .at(expression.span.start.clone()));
            }

            arguments.iter().try_for_each(|argument| check_expr(checker, argument))
        }
        ExpressionKind::IfElse { condition, then_branch, else_branch } => {
            check_expr(checker, condition)?;
            check_expr(checker, then_branch)?;
            match else_branch {
                Some(else_branch) => check_expr(checker, else_branch),
                None => Ok(()),
            }
        }
        ExpressionKind::WhileLoop { condition, body } => {
            check_expr(checker, condition)?;
            checker.within(Context::InsideLoop, body)
        }
        ExpressionKind::ForLoop { start, condition, step, body, .. } => {
            check_expr(checker, start)?;
            check_expr(checker, condition)?;
            if let Some(step) = step {
                check_expr(checker, step)?;
            }
            checker.within(Context::InsideLoop, body)
        }
        ExpressionKind::Switch { scrutinee, cases, default } => {
            check_expr(checker, scrutinee)?;
            for case in cases {
                check_expr(checker, &case.value)?;
                checker.within(Context::InsideSwitch, &case.body)?;
            }
            match default {
                Some(default) => checker.within(Context::InsideSwitch, default),
                None => Ok(()),
            }
        }
        ExpressionKind::Print(expressions) | ExpressionKind::Sequence(expressions) => {
            expressions.iter().try_for_each(|expression| check_expr(checker, expression))
        }
        ExpressionKind::Declaration(declaration) => check_declaration(checker, declaration),
    }
}
