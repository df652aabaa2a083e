use pretty_assertions::assert_eq;

use super::interpreter::{Interpreter, InterpreterConfig, DEFAULT_MAX_CALL_DEPTH};
use crate::{
    errors::errors::{ErrorImpl, ErrorKind},
    runtime::{
        builtins::BuiltinRegistry, environment::FakeEnvironment, value::Value, value_type::ValueType,
    },
};

#[test]
fn test_default_config() {
    let config = InterpreterConfig::default();
    assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    assert_eq!(config.file_name, "shell");
}

#[test]
fn test_check_reports_positions_in_configured_file() {
    let interpreter = Interpreter::new(InterpreterConfig {
        file_name: String::from("broken.sl"),
        ..InterpreterConfig::default()
    });

    let error = interpreter.check("func main:void() { print(x); }").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownSymbol);
    assert_eq!(error.get_position().1.as_str(), "broken.sl");
    assert_eq!(error.get_position().0, 25);
}

#[test]
fn test_check_stops_at_first_phase_error() {
    let interpreter = Interpreter::new(InterpreterConfig::default());

    assert_eq!(interpreter.check("func main:void() { let a = $; }").unwrap_err().kind(), ErrorKind::Lexical);
    assert_eq!(interpreter.check("func main:void() { let a = ; }").unwrap_err().kind(), ErrorKind::Syntax);
    assert!(interpreter.check("func main:void() { let a = 1; }").is_ok());
}

#[test]
fn test_analysis_errors_prevent_evaluation() {
    let interpreter = Interpreter::new(InterpreterConfig::default());
    let mut environment = FakeEnvironment::new();

    let error = interpreter
        .run("func main:void() { print(\"side effect\"); const x:int; }", &mut environment)
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::TypeError);
    assert!(environment.outputs().is_empty());
}

fn double(_: &mut dyn crate::runtime::environment::Environment, arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let value = arguments[0].as_int()?;
    value.checked_mul(2).map(Value::Int).ok_or(ErrorImpl::IntegerOverflow {
        operation: String::from("double"),
    })
}

#[test]
fn test_custom_builtins() {
    let mut registry = BuiltinRegistry::standard();
    registry.register("double", &[("x", ValueType::Int)], ValueType::Int, double);
    let interpreter = Interpreter::with_builtins(registry, InterpreterConfig::default());
    let mut environment = FakeEnvironment::new();

    let result = interpreter.run("func main:void() { return double(double(5)); }", &mut environment);
    assert_eq!(result, Ok(Value::Int(20)));

    let stock = Interpreter::new(InterpreterConfig::default());
    let error = stock.check("func main:void() { print(double(1)); }").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownSymbol);
}

#[test]
fn test_duplicate_builtin_signature_is_rejected() {
    let interpreter = Interpreter::new(InterpreterConfig::default());

    let error = interpreter
        .check("func abs:int(x:int) { return x; } func main:void() { }")
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::DuplicateSymbol);

    // A new signature joins the builtin overloads
    assert!(interpreter
        .check("func abs:string(x:string) { return x; } func main:void() { print(abs(\"a\"), abs(-1)); }")
        .is_ok());
}
