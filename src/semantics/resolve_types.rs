use crate::{
    ast::{
        ast::{BinaryOperator, Expression, ExpressionKind, Program, UnaryOperator},
        declarations::Declaration,
    },
    errors::errors::{Error, ErrorImpl},
    runtime::value_type::{are_compatible, describe_types, ValueType},
};

use super::annotations::Annotations;

pub struct TypeResolver<'a> {
    pub annotations: &'a mut Annotations,
}

/// Infers a type for every expression and declaration, bottom-up, and selects the
/// overload of every function call.
pub fn resolve_types(program: &Program, annotations: &mut Annotations) -> Result<(), Error> {
    let mut resolver = TypeResolver { annotations };

    for declaration in &program.declarations {
        resolve_declaration_type(&mut resolver, declaration)?;
    }

    resolve_expr_type(&mut resolver, &program.entry)?;
    Ok(())
}

/// Result type of `left operator right`, or `None` when the operator does not
/// apply to those operand types.
pub fn binary_type(operator: BinaryOperator, left: &ValueType, right: &ValueType) -> Option<ValueType> {
    let both_numeric = left.is_numeric() && right.is_numeric();

    match operator {
        BinaryOperator::Add if *left == ValueType::String && *right == ValueType::String => Some(ValueType::String),
        BinaryOperator::Add | BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide => {
            match (left, right) {
                (ValueType::Int, ValueType::Int) => Some(ValueType::Int),
                _ if both_numeric => Some(ValueType::Float),
                _ => None,
            }
        }
        BinaryOperator::Remainder | BinaryOperator::Power if both_numeric => Some(ValueType::Float),
        BinaryOperator::IntegerDivide if both_numeric => Some(ValueType::Int),
        BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => {
            let ordered = matches!(left, ValueType::Int | ValueType::Float | ValueType::String | ValueType::Bool);
            (ordered && left == right).then_some(ValueType::Bool)
        }
        BinaryOperator::Equal | BinaryOperator::NotEqual => are_compatible(left, right).then_some(ValueType::Bool),
        BinaryOperator::And | BinaryOperator::Or => {
            (*left == ValueType::Bool && *right == ValueType::Bool).then_some(ValueType::Bool)
        }
        _ => None,
    }
}

pub fn unary_type(operator: UnaryOperator, operand: &ValueType) -> Option<ValueType> {
    match operator {
        UnaryOperator::Not => (*operand == ValueType::Bool).then_some(ValueType::Bool),
        _ => operand.is_numeric().then(|| operand.clone()),
    }
}

pub fn resolve_declaration_type(resolver: &mut TypeResolver, declaration: &Declaration) -> Result<ValueType, Error> {
    match declaration {
        Declaration::Variable(variable) => {
            let initializer_type = match &variable.initializer {
                Some(initializer) => resolve_expr_type(resolver, initializer)?,
                None => ValueType::Void,
            };
            let symbol_type = resolver
                .annotations
                .declared_type(variable.id)
                .cloned()
                .unwrap_or_else(|| initializer_type.clone());

            resolver.annotations.set_symbol_type(variable.id, symbol_type);
            resolver.annotations.set_result_type(variable.id, initializer_type.clone());
            Ok(initializer_type)
        }
        Declaration::Constant(constant) => {
            let initializer_type = match &constant.initializer {
                Some(initializer) => resolve_expr_type(resolver, initializer)?,
                None => ValueType::Void,
            };
            let declared = resolver
                .annotations
                .declared_type(constant.id)
                .cloned()
                .unwrap_or_else(|| initializer_type.clone());

            resolver.annotations.set_symbol_type(constant.id, declared);
            resolver.annotations.set_result_type(constant.id, initializer_type.clone());
            Ok(initializer_type)
        }
        Declaration::Function(function) => {
            for parameter in &function.parameters {
                let ty = resolver
                    .annotations
                    .declared_type(parameter.id)
                    .cloned()
                    .ok_or_else(|| unresolved(&parameter.name, parameter.span.start.clone()))?;
                resolver.annotations.set_symbol_type(parameter.id, ty.clone());
                resolver.annotations.set_result_type(parameter.id, ty);
            }

            let body_type = resolve_expr_type(resolver, &function.body)?;
            resolver.annotations.set_result_type(function.id, body_type.clone());
            Ok(body_type)
        }
    }
}

fn unresolved(name: &str, position: crate::Position) -> Error {
    ErrorImpl::UnknownSymbol { symbol: String::from(name) }.at(position)
}

fn operator_error(expression: &Expression, operator: &str, operands: &[ValueType]) -> Error {
    ErrorImpl::TypeError {
        message: format!("operator `{}` cannot be applied to ({})", operator, describe_types(operands)),
    }
    .at(expression.span.start.clone())
}

pub fn resolve_expr_type(resolver: &mut TypeResolver, expression: &Expression) -> Result<ValueType, Error> {
    let ty = match &expression.kind {
        ExpressionKind::Literal(value) => value.value_type(),
        ExpressionKind::VariableRef { name } => {
            let declaration = resolver.annotations.binding(expression.id);
            declaration
                .and_then(|declaration| resolver.annotations.symbol_type(declaration))
                .cloned()
                .ok_or_else(|| unresolved(name, expression.span.start.clone()))?
        }
        ExpressionKind::Assignment { value, .. } => {
            resolve_expr_type(resolver, value)?;
            ValueType::Void
        }
        ExpressionKind::Unary { operator, operand } => {
            let operand_type = resolve_expr_type(resolver, operand)?;
            unary_type(*operator, &operand_type)
                .ok_or_else(|| operator_error(expression, operator.symbol(), &[operand_type]))?
        }
        ExpressionKind::Binary { operator, left, right } => {
            let left_type = resolve_expr_type(resolver, left)?;
            let right_type = resolve_expr_type(resolver, right)?;
            binary_type(*operator, &left_type, &right_type)
                .ok_or_else(|| operator_error(expression, operator.symbol(), &[left_type, right_type]))?
        }
        ExpressionKind::FunctionCall { name, arguments } => {
            let mut argument_types = vec![];
            for argument in arguments {
                argument_types.push(resolve_expr_type(resolver, argument)?);
            }

            let selected = resolver
                .annotations
                .candidates(expression.id)
                .iter()
                .find(|candidate| candidate.parameter_types == argument_types)
                .cloned()
                .ok_or_else(|| {
                    ErrorImpl::NoMatchingOverload {
                        function: name.clone(),
                        arguments: describe_types(&argument_types),
                    }
                    .at(expression.span.start.clone())
                })?;

            resolver.annotations.set_callee(expression.id, selected.callee);
            selected.return_type
        }
        ExpressionKind::IfElse { condition, then_branch, else_branch } => {
            resolve_expr_type(resolver, condition)?;
            let then_type = resolve_expr_type(resolver, then_branch)?;

            match else_branch {
                None => ValueType::Void,
                Some(else_branch) => {
                    let else_type = resolve_expr_type(resolver, else_branch)?;

                    // A branch that always jumps away contributes no value
                    if then_branch.always_exits() {
                        else_type
                    } else if else_branch.always_exits() || then_type == else_type {
                        then_type
                    } else {
                        ValueType::Void
                    }
                }
            }
        }
        ExpressionKind::WhileLoop { condition, body } => {
            resolve_expr_type(resolver, condition)?;
            resolve_expr_type(resolver, body)?;
            ValueType::Void
        }
        ExpressionKind::ForLoop { start, condition, step, body, .. } => {
            // The iterator is always an int; a mismatching start is reported by the checker
            resolve_expr_type(resolver, start)?;
            resolver.annotations.set_symbol_type(expression.id, ValueType::Int);

            resolve_expr_type(resolver, condition)?;
            if let Some(step) = step {
                resolve_expr_type(resolver, step)?;
            }
            resolve_expr_type(resolver, body)?;
            ValueType::Void
        }
        ExpressionKind::Switch { scrutinee, cases, default } => {
            resolve_expr_type(resolver, scrutinee)?;
            for case in cases {
                resolve_expr_type(resolver, &case.value)?;
                resolve_expr_type(resolver, &case.body)?;
            }
            if let Some(default) = default {
                resolve_expr_type(resolver, default)?;
            }
            ValueType::Void
        }
        ExpressionKind::Break | ExpressionKind::Continue | ExpressionKind::Empty => ValueType::Void,
        ExpressionKind::Return(value) => match value {
            Some(value) => resolve_expr_type(resolver, value)?,
            None => ValueType::Void,
        },
        ExpressionKind::Print(arguments) => {
            for argument in arguments {
                resolve_expr_type(resolver, argument)?;
            }
            ValueType::Void
        }
        ExpressionKind::Sequence(expressions) => {
            let mut last = ValueType::Void;
            for expression in expressions {
                last = resolve_expr_type(resolver, expression)?;
            }
            last
        }
        ExpressionKind::Declaration(declaration) => {
            resolve_declaration_type(resolver, declaration)?;
            ValueType::Void
        }
    };

    resolver.annotations.set_result_type(expression.id, ty.clone());
    Ok(ty)
}
