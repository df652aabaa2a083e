//! Unit tests for the semantic passes.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    annotations::Annotations,
    resolve_types::binary_type,
    semantics::analyze,
    symbols::{Callee, FunctionSymbol, SymbolKind, SymbolTable, VariableSymbol},
};
use crate::{
    ast::ast::{BinaryOperator, Expression, ExpressionKind, Program},
    errors::errors::{Error, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
    runtime::{builtins::BuiltinRegistry, value_type::ValueType},
    Position,
};

fn parse_program(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.sl".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.sl".to_string()));
    result.unwrap()
}

fn analyze_source(source: &str) -> Result<(Program, Annotations), Error> {
    let program = parse_program(source);
    let annotations = analyze(&program, &BuiltinRegistry::standard())?;
    Ok((program, annotations))
}

fn analyze_main(body: &str) -> Result<(Program, Annotations), Error> {
    analyze_source(&format!("func main:void() {{ {} }}", body))
}

fn error_of(source: &str) -> (ErrorKind, String) {
    let error = analyze_source(source).unwrap_err();
    (error.kind(), error.get_error_name().to_string())
}

fn first_statement(program: &Program) -> &Expression {
    match &program.entry.kind {
        ExpressionKind::Sequence(statements) => &statements[0],
        other => panic!("entry is not a sequence: {:?}", other),
    }
}

fn first_print_argument(program: &Program) -> &Expression {
    match &first_statement(program).kind {
        ExpressionKind::Print(arguments) => &arguments[0],
        other => panic!("expected print, got {:?}", other),
    }
}

const FIBONACCI: &str = "
    func fibonacci:int(n:int) {
        if (n <= 1) { return n; }
        return fibonacci(n - 1) + fibonacci(n - 2);
    }
    func main:void() { print(fibonacci(7)); }
";

#[test]
fn test_fibonacci_is_well_typed() {
    assert!(analyze_source(FIBONACCI).is_ok());
}

#[test]
fn test_analysis_is_idempotent() {
    let program = parse_program(FIBONACCI);
    let registry = BuiltinRegistry::standard();

    let first = analyze(&program, &registry).unwrap();
    let second = analyze(&program, &registry).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_symbol_table_scoping() {
    let mut table = SymbolTable::new();
    let position = Position::null();
    let symbol = |name: &str, declaration: u32| VariableSymbol {
        name: String::from(name),
        kind: SymbolKind::Variable,
        declaration,
    };

    table.declare_variable(symbol("x", 1), position.clone()).unwrap();
    assert!(table.declare_variable(symbol("x", 2), position.clone()).is_err());

    table.push_scope();
    assert_eq!(table.depth(), 2);
    table.declare_variable(symbol("x", 3), position.clone()).unwrap();
    assert_eq!(table.get_variable("x", position.clone()).unwrap().declaration, 3);

    table.pop_scope();
    assert_eq!(table.get_variable("x", position.clone()).unwrap().declaration, 1);

    // Popping the global scope keeps it current
    table.pop_scope();
    assert_eq!(table.depth(), 1);

    let error = table.get_variable("y", position).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownSymbol);
}

#[test]
fn test_symbol_table_overloads() {
    let mut table = SymbolTable::new();
    let position = Position::null();
    let overload = |parameter: ValueType, declaration: u32| FunctionSymbol {
        name: String::from("f"),
        parameter_types: vec![parameter],
        return_type: ValueType::Void,
        callee: Callee::User(declaration),
    };

    table.declare_function(overload(ValueType::Int, 1), position.clone()).unwrap();
    table.declare_function(overload(ValueType::Float, 2), position.clone()).unwrap();
    let error = table.declare_function(overload(ValueType::Int, 3), position.clone()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::DuplicateSymbol);

    table.push_scope();
    assert_eq!(table.get_function_overloads("f", position.clone()).unwrap().len(), 2);
    assert!(table.get_function_overloads("g", position.clone()).is_err());
    assert!(table.get_type("int", position).is_err());
}

#[test]
fn test_binary_type_table() {
    use BinaryOperator::*;
    let (int, float, string, boolean) = (ValueType::Int, ValueType::Float, ValueType::String, ValueType::Bool);

    assert_eq!(binary_type(Add, &int, &int), Some(ValueType::Int));
    assert_eq!(binary_type(Divide, &int, &int), Some(ValueType::Int));
    assert_eq!(binary_type(Multiply, &int, &float), Some(ValueType::Float));
    assert_eq!(binary_type(Remainder, &int, &int), Some(ValueType::Float));
    assert_eq!(binary_type(Power, &int, &int), Some(ValueType::Float));
    assert_eq!(binary_type(IntegerDivide, &float, &float), Some(ValueType::Int));
    assert_eq!(binary_type(Add, &string, &string), Some(ValueType::String));
    assert_eq!(binary_type(Add, &string, &int), None);
    assert_eq!(binary_type(Subtract, &string, &string), None);
    assert_eq!(binary_type(Less, &string, &string), Some(ValueType::Bool));
    assert_eq!(binary_type(Less, &int, &float), None);
    assert_eq!(binary_type(Equal, &boolean, &boolean), Some(ValueType::Bool));
    assert_eq!(binary_type(Equal, &int, &string), None);
    assert_eq!(binary_type(Equal, &ValueType::Void, &ValueType::Void), Some(ValueType::Bool));
    assert_eq!(binary_type(NotEqual, &ValueType::Void, &int), None);
    assert_eq!(binary_type(And, &boolean, &boolean), Some(ValueType::Bool));
    assert_eq!(binary_type(Or, &int, &boolean), None);
}

#[test]
fn test_overload_selection_by_argument_type() {
    let registry = BuiltinRegistry::standard();

    for (source, expected) in [("abs(-15)", ValueType::Int), ("abs(-1.5)", ValueType::Float)] {
        let (program, annotations) = analyze_main(&format!("print({});", source)).unwrap();
        let call = first_print_argument(&program);

        assert_eq!(annotations.result_type(call.id), Some(&expected));
        let Some(Callee::Builtin(index)) = annotations.callee(call.id) else {
            panic!("abs did not resolve to a builtin");
        };
        assert_eq!(registry.function(index).unwrap().parameter_types(), vec![expected]);
    }
}

#[test]
fn test_calls_are_not_widened() {
    let (kind, name) = error_of("func half:float(x:float) { return x / 2.0; } func main:void() { print(half(3)); }");
    assert_eq!(kind, ErrorKind::InvalidFunctionCall);
    assert_eq!(name, "NoMatchingOverload");
}

#[test]
fn test_arity_mismatch() {
    let (kind, name) = error_of("func main:void() { print(abs(1, 2)); }");
    assert_eq!(kind, ErrorKind::InvalidFunctionCall);
    assert_eq!(name, "ArityMismatch");
}

#[test]
fn test_user_overloads_and_hoisting() {
    let source = "
        func isEven:bool(n:int) { if (n == 0) { return true; } return isOdd(n - 1); }
        func isOdd:bool(n:int) { if (n == 0) { return false; } return isEven(n - 1); }
        func describe:string(x:int) { return \"int\"; }
        func describe:string(x:float) { return \"float\"; }
        func main:void() { print(isEven(4), describe(1), describe(1.0)); }
    ";
    assert!(analyze_source(source).is_ok());

    let (kind, _) = error_of("func f() { } func f() { } func main:void() { }");
    assert_eq!(kind, ErrorKind::DuplicateSymbol);
}

#[test]
fn test_unknown_symbols() {
    assert_eq!(error_of("func main:void() { print(missing); }").0, ErrorKind::UnknownSymbol);
    assert_eq!(error_of("func main:void() { missing(); }").0, ErrorKind::UnknownSymbol);
    assert_eq!(error_of("func main:void() { let x:integer = 1; }").0, ErrorKind::UnknownSymbol);
    // Globals are visible only after their declaration
    assert_eq!(
        error_of("func f:int() { return later; } let later = 1; func main:void() { }").0,
        ErrorKind::UnknownSymbol
    );
}

#[test]
fn test_shadowing_and_branch_scopes() {
    assert!(analyze_main("let x = 1; if (x > 0) { let x = \"inner\"; print(x); } print(x + 1);").is_ok());
    assert_eq!(
        analyze_main("let x = 1; let x = 2;").unwrap_err().kind(),
        ErrorKind::DuplicateSymbol
    );
    assert_eq!(
        analyze_main("if (true) { let y = 1; } else { print(y); }").unwrap_err().kind(),
        ErrorKind::UnknownSymbol
    );
    assert_eq!(
        analyze_main("while (false) { let z = 1; } print(z);").unwrap_err().kind(),
        ErrorKind::UnknownSymbol
    );
    assert_eq!(
        analyze_main("for (let i = 0; i < 3; i++) { print(i); } print(i);").unwrap_err().kind(),
        ErrorKind::UnknownSymbol
    );
}

#[test]
fn test_jump_placement() {
    assert_eq!(error_of("func f:void() { break; } func main:void() { }").0, ErrorKind::InvalidExpression);
    assert_eq!(analyze_main("continue;").unwrap_err().kind(), ErrorKind::InvalidExpression);
    assert!(analyze_main("while (true) { if (true) { break; } continue; }").is_ok());
    assert!(analyze_main("return;").is_ok());

    // Inside a switch, break leaves the switch and continue needs an enclosing loop
    assert!(analyze_main("switch (1) { case 1: break; }").is_ok());
    assert_eq!(
        analyze_main("switch (1) { case 1: continue; }").unwrap_err().kind(),
        ErrorKind::InvalidExpression
    );
    assert!(analyze_main("for (let i = 0; i < 3; i++) { switch (i) { case 1: continue; default: break; } }").is_ok());
}

#[test]
fn test_constants() {
    let (kind, name) = error_of("func main:void() { const x:int; }");
    assert_eq!(kind, ErrorKind::TypeError);
    assert_eq!(name, "TypeError");

    assert_eq!(
        analyze_main("const x:int = 1; x = 2;").unwrap_err().get_error_name(),
        "InvalidAssignment"
    );
    assert_eq!(analyze_main("const x:int = 1; x++;").unwrap_err().kind(), ErrorKind::InvalidExpression);
    assert_eq!(
        analyze_main("const x:float = 1;").unwrap_err().get_error_name(),
        "TypeMismatch"
    );
}

#[test]
fn test_declaration_types() {
    let (program, annotations) = analyze_main("let x:float; let y = 2;").unwrap();
    let declaration_id = |index: usize| match &program.entry.kind {
        ExpressionKind::Sequence(statements) => match &statements[index].kind {
            ExpressionKind::Declaration(declaration) => declaration.id(),
            other => panic!("expected a declaration, got {:?}", other),
        },
        _ => unreachable!(),
    };

    assert_eq!(annotations.symbol_type(declaration_id(0)), Some(&ValueType::Float));
    assert_eq!(annotations.result_type(declaration_id(0)), Some(&ValueType::Void));
    assert_eq!(annotations.symbol_type(declaration_id(1)), Some(&ValueType::Int));

    assert_eq!(analyze_main("let x:int = 2.5;").unwrap_err().get_error_name(), "TypeMismatch");
    assert_eq!(
        error_of("func nothing() { } func main:void() { let x = nothing(); }").0,
        ErrorKind::TypeError
    );
}

#[test]
fn test_assignment_and_operator_types() {
    assert_eq!(analyze_main("let x = 1; x = \"one\";").unwrap_err().kind(), ErrorKind::TypeError);
    assert_eq!(analyze_main("print(1 + \"a\");").unwrap_err().kind(), ErrorKind::TypeError);
    assert_eq!(analyze_main("print(not 1);").unwrap_err().kind(), ErrorKind::TypeError);
    assert_eq!(analyze_main("let s = \"a\"; s++;").unwrap_err().kind(), ErrorKind::TypeError);
    assert!(analyze_main("let f = 1.5; f++; let i = 2; i = -i; print(i // 2, f % 2, 2 ** 3);").is_ok());
}

#[test]
fn test_conditions_must_be_bool() {
    assert_eq!(analyze_main("if (1) { }").unwrap_err().get_error_name(), "TypeMismatch");
    assert_eq!(analyze_main("while (0) { }").unwrap_err().kind(), ErrorKind::TypeError);
    assert_eq!(analyze_main("print(1 ? 2 : 3);").unwrap_err().kind(), ErrorKind::TypeError);
    assert_eq!(analyze_main("print(true and 1);").unwrap_err().kind(), ErrorKind::TypeError);
}

#[test]
fn test_if_else_types() {
    let (program, annotations) = analyze_main("print(true ? 1 : 2);").unwrap();
    assert_eq!(annotations.result_type(first_print_argument(&program).id), Some(&ValueType::Int));

    // Differing branch types leave nothing to use
    assert_eq!(
        analyze_main("let x = true ? 1 : \"one\";").unwrap_err().kind(),
        ErrorKind::TypeError
    );
}

#[test]
fn test_function_return_types() {
    assert!(analyze_source("func sign:int(x:int) { if (x < 0) { return -1; } else { return 1; } } func main:void() { }").is_ok());
    assert_eq!(
        error_of("func f:int() { return \"a\"; } func main:void() { }").1,
        "TypeMismatch"
    );
    // Falling off the end of a non-void function
    assert_eq!(
        error_of("func f:int(x:int) { if (x > 0) { return 1; } } func main:void() { }").0,
        ErrorKind::TypeError
    );
    assert_eq!(error_of("func f() { return 1; } func main:void() { }").0, ErrorKind::TypeError);
    // The value of a void body is discarded
    assert!(analyze_source("let counter = 0; func tick() { counter++; } func main:void() { tick(); }").is_ok());
    // The entry point may return any value
    assert!(analyze_main("return 42;").is_ok());
}

#[test]
fn test_switch_case_types() {
    assert!(analyze_main("let s = \"a\"; switch (s) { case \"a\": print(1); case \"b\": print(2); }").is_ok());
    assert_eq!(
        analyze_main("switch (1) { case \"a\": print(1); }").unwrap_err().kind(),
        ErrorKind::TypeError
    );
}

#[test]
fn test_for_loop_iterator_type() {
    let (program, annotations) = analyze_main("for (let i = 0; i < 3; i++) { print(i); }").unwrap();
    assert_eq!(annotations.symbol_type(first_statement(&program).id), Some(&ValueType::Int));

    for source in [
        "for (let x:float = 0.5; x < 2; x++) { }",
        "for (let x:int = 0.5; x < 2; x++) { }",
        "for (let s = \"a\"; s < 3; s++) { print(s); }",
    ] {
        assert_eq!(analyze_main(source).unwrap_err().get_error_name(), "TypeMismatch", "{}", source);
    }
}
