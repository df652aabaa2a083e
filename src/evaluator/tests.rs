use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    evaluator::Evaluator,
    operations::{binary, step, unary},
};
use crate::{
    ast::ast::{BinaryOperator, UnaryOperator},
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
    runtime::{builtins::BuiltinRegistry, environment::FakeEnvironment, value::Value},
    semantics::semantics::analyze,
};

fn run_with(source: &str, environment: &mut FakeEnvironment, max_call_depth: usize) -> Result<Value, Error> {
    let tokens = tokenize(source.to_string(), Some("test.sl".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.sl".to_string()));
    let program = result.unwrap();
    let registry = BuiltinRegistry::standard();
    let annotations = analyze(&program, &registry).unwrap();

    Evaluator::new(&annotations, &registry, environment, max_call_depth).run(&program)
}

/// Runs `body` as the entry point and returns what it printed.
fn output_of(body: &str) -> Vec<String> {
    let mut environment = FakeEnvironment::new();
    run_with(&format!("func main:void() {{ {} }}", body), &mut environment, 100).unwrap();
    environment.written_text()
}

#[test]
fn test_integer_arithmetic() {
    use BinaryOperator::*;

    assert_eq!(binary(Add, &Value::Int(2), &Value::Int(3)), Ok(Value::Int(5)));
    assert_eq!(binary(Divide, &Value::Int(7), &Value::Int(2)), Ok(Value::Int(3)));
    assert_eq!(binary(Divide, &Value::Int(-7), &Value::Int(2)), Ok(Value::Int(-3)));
    assert_eq!(binary(IntegerDivide, &Value::Int(-7), &Value::Int(2)), Ok(Value::Int(-4)));
    assert_eq!(binary(IntegerDivide, &Value::Int(7), &Value::Int(2)), Ok(Value::Int(3)));
    assert_eq!(binary(Remainder, &Value::Int(7), &Value::Int(3)), Ok(Value::Float(1.0)));
    assert_eq!(binary(Power, &Value::Int(2), &Value::Int(10)), Ok(Value::Float(1024.0)));

    assert!(matches!(
        binary(Add, &Value::Int(i32::MAX), &Value::Int(1)),
        Err(ErrorImpl::IntegerOverflow { .. })
    ));
    assert!(matches!(
        binary(Divide, &Value::Int(i32::MIN), &Value::Int(-1)),
        Err(ErrorImpl::IntegerOverflow { .. })
    ));
}

#[test]
fn test_division_by_zero() {
    use BinaryOperator::*;

    for (operator, left, right) in [
        (Divide, Value::Int(1), Value::Int(0)),
        (Divide, Value::Float(1.0), Value::Int(0)),
        (IntegerDivide, Value::Int(1), Value::Int(0)),
        (IntegerDivide, Value::Float(1.0), Value::Float(0.0)),
        (Remainder, Value::Int(1), Value::Int(0)),
    ] {
        let error = binary(operator, &left, &right).unwrap_err();
        assert!(matches!(error, ErrorImpl::DivisionByZero { .. }), "{} gave {:?}", operator, error);
        assert_eq!(error.kind(), ErrorKind::Runtime);
    }
}

#[test]
fn test_mixed_and_string_operations() {
    use BinaryOperator::*;

    assert_eq!(binary(Add, &Value::Int(1), &Value::Float(0.5)), Ok(Value::Float(1.5)));
    assert_eq!(binary(IntegerDivide, &Value::Float(7.5), &Value::Int(2)), Ok(Value::Int(3)));
    assert_eq!(
        binary(Add, &Value::String("ab".into()), &Value::String("cd".into())),
        Ok(Value::String("abcd".into()))
    );
    assert_eq!(
        binary(Less, &Value::String("apple".into()), &Value::String("banana".into())),
        Ok(Value::Bool(true))
    );
    assert_eq!(binary(Equal, &Value::Float(0.1), &Value::Float(0.1001)), Ok(Value::Bool(true)));
    assert_eq!(binary(GreaterEqual, &Value::Bool(true), &Value::Bool(false)), Ok(Value::Bool(true)));
}

#[test]
fn test_nan_orders_as_false() {
    use BinaryOperator::*;

    let nan = Value::Float(f32::NAN);
    for operator in [Less, LessEqual, Greater, GreaterEqual] {
        assert_eq!(binary(operator, &nan, &Value::Float(1.0)), Ok(Value::Bool(false)), "{}", operator);
        assert_eq!(binary(operator, &Value::Float(1.0), &nan), Ok(Value::Bool(false)), "{}", operator);
    }

    let printed = output_of("let x:float = (0.0 - 1.0) ** 0.5; print(x < 1.0, x >= 1.0, x == x);");
    assert_eq!(printed, vec!["false", "false", "false"]);
}

#[test]
fn test_unary_operations() {
    assert_eq!(unary(UnaryOperator::Minus, &Value::Int(5)), Ok(Value::Int(-5)));
    assert_eq!(unary(UnaryOperator::Minus, &Value::Float(2.5)), Ok(Value::Float(-2.5)));
    assert_eq!(unary(UnaryOperator::Not, &Value::Bool(true)), Ok(Value::Bool(false)));
    assert_eq!(unary(UnaryOperator::Plus, &Value::Int(3)), Ok(Value::Int(3)));
    assert!(unary(UnaryOperator::Minus, &Value::Int(i32::MIN)).is_err());
    assert_eq!(step(&Value::Float(0.5), 1), Ok(Value::Float(1.5)));
    assert!(step(&Value::Int(i32::MIN), -1).is_err());
}

#[test]
fn test_entry_completion_value() {
    let mut environment = FakeEnvironment::new();
    assert_eq!(run_with("func main:void() { return 42; }", &mut environment, 10), Ok(Value::Int(42)));
    assert_eq!(run_with("func main:void() { print(1); }", &mut environment, 10), Ok(Value::Void));
}

#[test]
fn test_scopes_and_assignment() {
    let output = output_of(
        "let x = 1;
         if (true) { let x = 10; x = x + 1; print(x); }
         if (true) { x = x + 5; }
         print(x);",
    );
    assert_eq!(output, vec!["11", "6"]);
}

#[test]
fn test_globals_are_shared_with_functions() {
    let mut environment = FakeEnvironment::new();
    let source = "
        let counter = 0;
        func tick() { counter++; }
        func main:void() { let counter = 100; tick(); tick(); print(counter); }
        ";
    run_with(source, &mut environment, 10).unwrap();
    assert_eq!(environment.written_text(), vec!["100"]);

    let source = "
        let counter = 0;
        func tick() { counter++; }
        func read:int() { return counter; }
        func main:void() { tick(); tick(); print(read()); }
        ";
    let mut environment = FakeEnvironment::new();
    run_with(source, &mut environment, 10).unwrap();
    assert_eq!(environment.written_text(), vec!["2"]);
}

#[test]
fn test_update_operators() {
    assert_eq!(
        output_of("let i = 5; print(i++, i, ++i, i--, --i);"),
        vec!["5", "6", "7", "7", "5"]
    );
}

#[test]
fn test_default_values() {
    assert_eq!(
        output_of("let a:int; let b:float; let c:bool; let d:string; print(a, b, c, d);"),
        vec!["0", "0.0", "false", ""]
    );
}

#[test]
fn test_loop_signals() {
    assert_eq!(
        output_of("for (let i = 0; i < 6; i++) { if (i == 1) { continue; } if (i == 4) { break; } print(i); }"),
        vec!["0", "2", "3"]
    );
    assert_eq!(
        output_of("let n = 0; while (true) { n++; if (n > 3) { break; } } print(n);"),
        vec!["4"]
    );
}

#[test]
fn test_switch_break_only_leaves_switch() {
    let output = output_of(
        "for (let i = 0; i < 4; i++) {
            switch (i) {
                case 0: print(\"zero\"); break;
                case 2: continue;
                default: print(\"other\");
            }
            print(i);
        }",
    );
    assert_eq!(output, vec!["zero", "0", "other", "1", "other", "3"]);
}

#[test]
fn test_return_unwinds_loops_and_scopes() {
    let source = "
        func firstAbove:int(limit:int) {
            for (let i = 0; i < 100; i++) {
                let square = i * i;
                if (square > limit) { return i; }
            }
            return -1;
        }
        func main:void() { print(firstAbove(10), firstAbove(50), firstAbove(100000)); }
        ";
    let mut environment = FakeEnvironment::new();
    run_with(source, &mut environment, 10).unwrap();
    assert_eq!(environment.written_text(), vec!["4", "8", "-1"]);
}

#[test]
fn test_short_circuit() {
    assert_eq!(
        output_of("print(false and (1 / 0 == 0), true or (1 / 0 == 0));"),
        vec!["false", "true"]
    );
}

#[test]
fn test_runtime_error_keeps_output() {
    let mut environment = FakeEnvironment::new();
    let error = run_with(
        "func main:void() { print(\"before\"); let zero = 0; print(1 / zero); print(\"after\"); }",
        &mut environment,
        10,
    )
    .unwrap_err();

    assert_eq!(error.get_error_name(), "DivisionByZero");
    assert_eq!(error.kind(), ErrorKind::Runtime);
    assert_eq!(environment.written_text(), vec!["before"]);
}

#[test]
fn test_call_depth_limit() {
    let source = "
        func down:int(n:int) { if (n == 0) { return 0; } return down(n - 1); }
        func main:void() { print(down(5)); }
        ";

    let mut environment = FakeEnvironment::new();
    assert!(run_with(source, &mut environment, 6).is_ok());

    let mut environment = FakeEnvironment::new();
    let error = run_with(source, &mut environment, 5).unwrap_err();
    assert_eq!(error.get_error_name(), "CallDepthExceeded");
    assert!(environment.written_text().is_empty());
}

#[test]
fn test_builtin_calls_use_environment() {
    let mut environment = FakeEnvironment::with_inputs([Value::Int(3), Value::String("hi".into())]);
    run_with(
        "func main:void() { let n = input(); let s = inputString(); print(abs(-n), toUpper(s)); }",
        &mut environment,
        10,
    )
    .unwrap();

    assert_eq!(environment.outputs(), &[Value::Int(3), Value::String("HI".into())]);
    assert_eq!(environment.remaining_inputs(), 0);
}
