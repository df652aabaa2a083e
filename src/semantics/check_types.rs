use crate::{
    ast::{
        ast::{Expression, ExpressionKind, Program},
        declarations::Declaration,
    },
    errors::errors::{Error, ErrorImpl},
    runtime::value_type::{are_compatible, ValueType},
    Position,
};

use super::annotations::Annotations;

pub struct TypeChecker<'a> {
    pub annotations: &'a Annotations,
    /// Declared return type of each enclosing function; `None` for the entry point,
    /// whose `return` may carry any value.
    pub return_types: Vec<Option<ValueType>>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(annotations: &'a Annotations) -> Self {
        TypeChecker {
            annotations,
            return_types: vec![],
        }
    }

    fn type_of(&self, expression: &Expression) -> Result<&'a ValueType, Error> {
        self.annotations.result_type(expression.id).ok_or_else(|| {
            ErrorImpl::TypeError {
                message: String::from("expression has no inferred type"),
            }
            .at(expression.span.start.clone())
        })
    }
}

fn mismatch(context: String, expected: &ValueType, received: &ValueType, position: Position) -> Error {
    ErrorImpl::TypeMismatch {
        context,
        expected: expected.to_string(),
        received: received.to_string(),
    }
    .at(position)
}

fn type_error(message: String, position: Position) -> Error {
    ErrorImpl::TypeError { message }.at(position)
}

/// Declared types accept their own type, and record types also accept an absent value.
fn accepts(declared: &ValueType, received: &ValueType) -> bool {
    declared == received || (declared.is_record() && are_compatible(declared, received))
}

/// Validates the inferred types against declared types: declarations, assignments,
/// conditions, switch cases, returns and function bodies.
pub fn check_types(program: &Program, annotations: &Annotations) -> Result<(), Error> {
    let mut checker = TypeChecker::new(annotations);

    for declaration in &program.declarations {
        check_declaration(&mut checker, declaration)?;
    }

    checker.return_types.push(None);
    check_expr(&mut checker, &program.entry)?;
    checker.return_types.pop();
    Ok(())
}

fn check_initializer(
    checker: &mut TypeChecker,
    name: &str,
    declared: Option<&ValueType>,
    initializer: &Expression,
    position: Position,
) -> Result<(), Error> {
    check_expr(checker, initializer)?;
    let received = checker.type_of(initializer)?;

    match declared {
        Some(declared) if !accepts(declared, received) => {
            Err(mismatch(format!("declaration of `{}`", name), declared, received, position))
        }
        None if *received == ValueType::Void => {
            Err(type_error(format!("cannot infer type of `{}` from nil", name), position))
        }
        _ => Ok(()),
    }
}

pub fn check_declaration(checker: &mut TypeChecker, declaration: &Declaration) -> Result<(), Error> {
    match declaration {
        Declaration::Variable(variable) => match &variable.initializer {
            Some(initializer) => {
                let declared = checker.annotations.declared_type(variable.id);
                check_initializer(checker, &variable.name, declared, initializer, variable.span.start.clone())
            }
            None => Ok(()),
        },
        Declaration::Constant(constant) => {
            let position = constant.span.start.clone();
            let Some(initializer) = &constant.initializer else {
                return Err(type_error(format!("constant `{}` requires an initializer", constant.name), position));
            };

            if *checker.type_of(initializer)? == ValueType::Void {
                return Err(type_error(format!("cannot infer type of `{}` from nil", constant.name), position));
            }
            let declared = checker.annotations.declared_type(constant.id);
            check_initializer(checker, &constant.name, declared, initializer, position)
        }
        Declaration::Function(function) => {
            let declared = checker
                .annotations
                .declared_type(function.id)
                .cloned()
                .unwrap_or(ValueType::Void);

            checker.return_types.push(Some(declared.clone()));
            let result = check_expr(checker, &function.body);
            checker.return_types.pop();
            result?;

            // The value of a void function's body is discarded
            let body_type = checker.type_of(&function.body)?;
            if declared != ValueType::Void && *body_type != declared {
                return Err(mismatch(
                    format!("body of function `{}`", function.name),
                    &declared,
                    body_type,
                    function.span.start.clone(),
                ));
            }
            Ok(())
        }
    }
}

fn expect_bool(checker: &TypeChecker, condition: &Expression) -> Result<(), Error> {
    let ty = checker.type_of(condition)?;
    if *ty != ValueType::Bool {
        return Err(mismatch(String::from("condition"), &ValueType::Bool, ty, condition.span.start.clone()));
    }
    Ok(())
}

pub fn check_expr(checker: &mut TypeChecker, expression: &Expression) -> Result<(), Error> {
    let position = expression.span.start.clone();

    match &expression.kind {
        ExpressionKind::Literal(_)
        | ExpressionKind::VariableRef { .. }
        | ExpressionKind::Break
        | ExpressionKind::Continue
        | ExpressionKind::Empty => Ok(()),
        ExpressionKind::Assignment { name, value } => {
            check_expr(checker, value)?;

            let target = checker
                .annotations
                .binding(expression.id)
                .and_then(|declaration| checker.annotations.symbol_type(declaration))
                .ok_or_else(|| ErrorImpl::UnknownSymbol { symbol: name.clone() }.at(position.clone()))?;
            let received = checker.type_of(value)?;

            if !accepts(target, received) {
                return Err(mismatch(format!("assignment to `{}`", name), target, received, position));
            }
            Ok(())
        }
        ExpressionKind::Unary { operand, .. } => check_expr(checker, operand),
        ExpressionKind::Binary { left, right, .. } => {
            check_expr(checker, left)?;
            check_expr(checker, right)
        }
        ExpressionKind::FunctionCall { arguments, .. } | ExpressionKind::Print(arguments) => {
            arguments.iter().try_for_each(|argument| check_expr(checker, argument))
        }
        ExpressionKind::IfElse { condition, then_branch, else_branch } => {
            check_expr(checker, condition)?;
            expect_bool(checker, condition)?;
            check_expr(checker, then_branch)?;
            match else_branch {
                Some(else_branch) => check_expr(checker, else_branch),
                None => Ok(()),
            }
        }
        ExpressionKind::WhileLoop { condition, body } => {
            check_expr(checker, condition)?;
            expect_bool(checker, condition)?;
            check_expr(checker, body)
        }
        ExpressionKind::ForLoop { iterator, start, condition, step, body, .. } => {
            check_expr(checker, start)?;
            let context = || format!("loop iterator `{}`", iterator);
            if let Some(declared) = checker.annotations.declared_type(expression.id) {
                if *declared != ValueType::Int {
                    return Err(mismatch(context(), &ValueType::Int, declared, position));
                }
            }
            let start_type = checker.type_of(start)?;
            if *start_type != ValueType::Int {
                return Err(mismatch(context(), &ValueType::Int, start_type, position));
            }

            check_expr(checker, condition)?;
            expect_bool(checker, condition)?;
            if let Some(step) = step {
                check_expr(checker, step)?;
            }
            check_expr(checker, body)
        }
        ExpressionKind::Switch { scrutinee, cases, default } => {
            check_expr(checker, scrutinee)?;
            let scrutinee_type = checker.type_of(scrutinee)?;

            for case in cases {
                check_expr(checker, &case.value)?;
                let case_type = checker.type_of(&case.value)?;
                if !are_compatible(scrutinee_type, case_type) {
                    return Err(mismatch(
                        String::from("switch case"),
                        scrutinee_type,
                        case_type,
                        case.value.span.start.clone(),
                    ));
                }
                check_expr(checker, &case.body)?;
            }

            match default {
                Some(default) => check_expr(checker, default),
                None => Ok(()),
            }
        }
        ExpressionKind::Return(value) => {
            let received = match value {
                Some(value) => {
                    check_expr(checker, value)?;
                    checker.type_of(value)?.clone()
                }
                None => ValueType::Void,
            };

            if let Some(Some(expected)) = checker.return_types.last() {
                if received != *expected {
                    return Err(mismatch(String::from("return"), expected, &received, position));
                }
            }
            Ok(())
        }
        ExpressionKind::Sequence(expressions) => {
            expressions.iter().try_for_each(|expression| check_expr(checker, expression))
        }
        ExpressionKind::Declaration(declaration) => check_declaration(checker, declaration),
    }
}
