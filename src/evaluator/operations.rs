use std::cmp::Ordering;

use crate::{
    ast::ast::{BinaryOperator, UnaryOperator},
    errors::errors::ErrorImpl,
    runtime::value::Value,
};

fn overflow(operation: &str) -> ErrorImpl {
    ErrorImpl::IntegerOverflow {
        operation: String::from(operation),
    }
}

fn division_by_zero(operation: &str) -> ErrorImpl {
    ErrorImpl::DivisionByZero {
        operation: String::from(operation),
    }
}

fn checked_int(result: Option<i32>, operation: &str) -> Result<Value, ErrorImpl> {
    result.map(Value::Int).ok_or_else(|| overflow(operation))
}

/// Floor of `left / right` for two integers.
fn floor_div(left: i32, right: i32) -> Result<i32, ErrorImpl> {
    if right == 0 {
        return Err(division_by_zero("integer division"));
    }
    let quotient = left.checked_div(right).ok_or_else(|| overflow("integer division"))?;
    if left % right != 0 && ((left < 0) != (right < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

/// Applies a binary operator to two already evaluated operands.
///
/// `and`/`or` are accepted here for completeness; the evaluator short-circuits them
/// before both operands exist.
pub fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    use BinaryOperator::*;

    match (operator, left, right) {
        (Add, Value::String(left), Value::String(right)) => Ok(Value::String(format!("{}{}", left, right))),
        (Add, Value::Int(left), Value::Int(right)) => checked_int(left.checked_add(*right), "addition"),
        (Subtract, Value::Int(left), Value::Int(right)) => checked_int(left.checked_sub(*right), "subtraction"),
        (Multiply, Value::Int(left), Value::Int(right)) => checked_int(left.checked_mul(*right), "multiplication"),
        (Divide, Value::Int(_), Value::Int(0)) => Err(division_by_zero("division")),
        (Divide, Value::Int(left), Value::Int(right)) => checked_int(left.checked_div(*right), "division"),
        (IntegerDivide, Value::Int(left), Value::Int(right)) => floor_div(*left, *right).map(Value::Int),
        (Add | Subtract | Multiply | Divide | IntegerDivide | Remainder | Power, _, _) => {
            float_arithmetic(operator, left.as_number()?, right.as_number()?)
        }
        (Equal, _, _) => Ok(Value::Bool(left == right)),
        (NotEqual, _, _) => Ok(Value::Bool(left != right)),
        (Less, _, _) => Ok(Value::Bool(left.compare(right)?.is_some_and(Ordering::is_lt))),
        (LessEqual, _, _) => Ok(Value::Bool(left.compare(right)?.is_some_and(Ordering::is_le))),
        (Greater, _, _) => Ok(Value::Bool(left.compare(right)?.is_some_and(Ordering::is_gt))),
        (GreaterEqual, _, _) => Ok(Value::Bool(left.compare(right)?.is_some_and(Ordering::is_ge))),
        (And, _, _) => Ok(Value::Bool(left.as_bool()? && right.as_bool()?)),
        (Or, _, _) => Ok(Value::Bool(left.as_bool()? || right.as_bool()?)),
    }
}

fn float_arithmetic(operator: BinaryOperator, left: f32, right: f32) -> Result<Value, ErrorImpl> {
    match operator {
        BinaryOperator::Add => Ok(Value::Float(left + right)),
        BinaryOperator::Subtract => Ok(Value::Float(left - right)),
        BinaryOperator::Multiply => Ok(Value::Float(left * right)),
        BinaryOperator::Divide if right == 0.0 => Err(division_by_zero("division")),
        BinaryOperator::Divide => Ok(Value::Float(left / right)),
        BinaryOperator::Remainder if right == 0.0 => Err(division_by_zero("remainder")),
        BinaryOperator::Remainder => Ok(Value::Float(left % right)),
        BinaryOperator::Power => Ok(Value::Float(left.powf(right))),
        BinaryOperator::IntegerDivide if right == 0.0 => Err(division_by_zero("integer division")),
        BinaryOperator::IntegerDivide => {
            let quotient = (left / right).floor();
            if quotient.is_finite() && quotient >= i32::MIN as f32 && quotient < i32::MAX as f32 {
                Ok(Value::Int(quotient as i32))
            } else {
                Err(overflow("integer division"))
            }
        }
        _ => Err(ErrorImpl::TypeError {
            message: format!("operator `{}` is not arithmetic", operator),
        }),
    }
}

/// Adds `delta` to a numeric value, as `++`/`--` do.
pub fn step(value: &Value, delta: i32) -> Result<Value, ErrorImpl> {
    match value {
        Value::Int(value) => checked_int(value.checked_add(delta), "increment"),
        Value::Float(value) => Ok(Value::Float(value + delta as f32)),
        other => Err(ErrorImpl::ValueTypeMismatch {
            expected: String::from("number"),
            received: String::from(other.kind_name()),
        }),
    }
}

/// Applies a non-updating unary operator.
pub fn unary(operator: UnaryOperator, operand: &Value) -> Result<Value, ErrorImpl> {
    match (operator, operand) {
        (UnaryOperator::Not, _) => Ok(Value::Bool(!operand.as_bool()?)),
        (UnaryOperator::Minus, Value::Int(value)) => checked_int(value.checked_neg(), "negation"),
        (UnaryOperator::Minus, _) => Ok(Value::Float(-operand.as_float()?)),
        (UnaryOperator::Plus, Value::Int(_) | Value::Float(_)) => Ok(operand.clone()),
        (UnaryOperator::PreIncrement | UnaryOperator::PostIncrement, _) => step(operand, 1),
        (UnaryOperator::PreDecrement | UnaryOperator::PostDecrement, _) => step(operand, -1),
        (UnaryOperator::Plus, _) => Err(ErrorImpl::ValueTypeMismatch {
            expected: String::from("number"),
            received: String::from(operand.kind_name()),
        }),
    }
}
