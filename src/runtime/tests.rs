use std::{collections::BTreeMap, io::Cursor};

use pretty_assertions::assert_eq;

use super::{
    builtins::BuiltinRegistry,
    environment::{parse_input_line, ConsoleEnvironment, Environment, FakeEnvironment},
    value::Value,
    value_type::{are_compatible, describe_types, ValueType},
};
use crate::errors::errors::ErrorImpl;

fn call(registry: &BuiltinRegistry, name: &str, args: &[Value]) -> Result<Value, ErrorImpl> {
    let types: Vec<ValueType> = args.iter().map(Value::value_type).collect();
    let function = registry
        .functions()
        .iter()
        .find(|function| function.name == name && function.parameter_types() == types)
        .unwrap_or_else(|| panic!("no builtin {}({})", name, describe_types(&types)));

    (function.implementation)(&mut FakeEnvironment::new(), args)
}

#[test]
fn test_float_equality_uses_tolerance() {
    assert_eq!(Value::Float(3.14159265), Value::Float(3.14159266));
    assert_ne!(Value::Float(3.0), Value::Float(3.002));
    assert_ne!(Value::Int(3), Value::Float(3.0));
    assert_eq!(Value::Nil, Value::Nil);
}

#[test]
fn test_value_accessors_report_mismatch() {
    assert_eq!(Value::Int(4).as_int(), Ok(4));
    assert_eq!(Value::Int(4).as_number(), Ok(4.0));
    assert_eq!(
        Value::from("x").as_int(),
        Err(ErrorImpl::ValueTypeMismatch {
            expected: String::from("int"),
            received: String::from("string"),
        })
    );
    assert!(Value::Bool(true).as_float().is_err());
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::Float(3.0).to_string(), "3.0");
    assert_eq!(Value::Float(314.15927).to_string(), "314.15927");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Void.to_string(), "void");
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::from("a\"b\n").to_debug_string(), "\"a\\\"b\\n\"");
    assert_eq!(Value::Int(1).to_debug_string(), "1");
}

#[test]
fn test_value_types_and_ordering() {
    assert_eq!(Value::Nil.value_type(), ValueType::Void);
    assert_eq!(Value::from(String::from("s")).value_type(), ValueType::String);
    assert_eq!(Value::Int(1).compare(&Value::Int(2)), Ok(Some(std::cmp::Ordering::Less)));
    assert_eq!(Value::from("b").compare(&Value::from("a")), Ok(Some(std::cmp::Ordering::Greater)));
    assert_eq!(Value::Float(f32::NAN).compare(&Value::Float(1.0)), Ok(None));
    assert!(matches!(
        Value::Int(1).compare(&Value::Float(1.0)),
        Err(ErrorImpl::ValueTypeMismatch { .. })
    ));
}

#[test]
fn test_record_types_are_nominal() {
    let point = ValueType::record("Point", BTreeMap::from([(String::from("x"), ValueType::Int)]));
    let same_shape = ValueType::record("Point", BTreeMap::from([(String::from("x"), ValueType::Int)]));

    assert_eq!(point, point.clone());
    assert_ne!(point, same_shape);
    assert!(are_compatible(&point, &ValueType::Void));
    assert!(are_compatible(&ValueType::Void, &point));
    assert!(!are_compatible(&ValueType::Int, &ValueType::Void));
    assert_eq!(point.default_value(), Value::Nil);
    assert_eq!(ValueType::String.default_value(), Value::from(""));
}

#[test]
fn test_describe_types() {
    assert_eq!(describe_types(&[ValueType::Int, ValueType::Float]), "int, float");
    assert_eq!(describe_types(&[]), "");
}

#[test]
fn test_registry_contains_primitive_types() {
    let registry = BuiltinRegistry::new();
    let names: Vec<&str> = registry.types().iter().map(|ty| ty.name.as_str()).collect();

    assert_eq!(names, vec!["int", "float", "bool", "string", "str", "void"]);
    assert!(registry.functions().is_empty());
}

#[test]
fn test_abs_overloads() {
    let registry = BuiltinRegistry::standard();

    assert_eq!(call(&registry, "abs", &[Value::Int(-5)]), Ok(Value::Int(5)));
    assert_eq!(call(&registry, "abs", &[Value::Float(-2.5)]), Ok(Value::Float(2.5)));
    assert!(matches!(
        call(&registry, "abs", &[Value::Int(i32::MIN)]),
        Err(ErrorImpl::IntegerOverflow { .. })
    ));
}

#[test]
fn test_math_builtins() {
    let registry = BuiltinRegistry::standard();

    assert_eq!(call(&registry, "max", &[Value::Int(2), Value::Int(9)]), Ok(Value::Int(9)));
    assert_eq!(call(&registry, "min", &[Value::Float(2.0), Value::Float(-1.0)]), Ok(Value::Float(-1.0)));
    assert_eq!(call(&registry, "pow", &[Value::Int(2), Value::Int(10)]), Ok(Value::Float(1024.0)));
    assert_eq!(call(&registry, "round", &[Value::Float(2.5)]), Ok(Value::Float(3.0)));
    assert_eq!(call(&registry, "sqrt", &[Value::Int(16)]), Ok(Value::Float(4.0)));
    assert!(call(&registry, "sqrt", &[Value::Float(-1.0)]).is_err());
}

#[test]
fn test_string_builtins() {
    let registry = BuiltinRegistry::standard();

    assert_eq!(call(&registry, "length", &[Value::from("héllo")]), Ok(Value::Int(5)));
    assert_eq!(
        call(&registry, "indexOf", &[Value::from("héllo"), Value::from("l")]),
        Ok(Value::Int(2))
    );
    assert_eq!(
        call(&registry, "lastIndexOf", &[Value::from("hello"), Value::from("l")]),
        Ok(Value::Int(3))
    );
    assert_eq!(
        call(&registry, "indexOf", &[Value::from("hello"), Value::from("z")]),
        Ok(Value::Int(-1))
    );
    assert_eq!(
        call(&registry, "substring", &[Value::from("scripting"), Value::Int(1), Value::Int(4)]),
        Ok(Value::from("crip"))
    );
    assert!(call(&registry, "substring", &[Value::from("abc"), Value::Int(2), Value::Int(5)]).is_err());
    assert_eq!(
        call(&registry, "replace", &[Value::from("a-b-c"), Value::from("-"), Value::from("+")]),
        Ok(Value::from("a+b+c"))
    );
    assert_eq!(call(&registry, "toUpper", &[Value::from("abc")]), Ok(Value::from("ABC")));
    assert_eq!(call(&registry, "trim", &[Value::from("  x ")]), Ok(Value::from("x")));
}

#[test]
fn test_conversion_builtins() {
    let registry = BuiltinRegistry::standard();

    assert_eq!(call(&registry, "toInt", &[Value::Float(3.9)]), Ok(Value::Int(3)));
    assert_eq!(call(&registry, "toInt", &[Value::Float(-2147483648.0)]), Ok(Value::Int(i32::MIN)));
    for out_of_range in [3000000000.0, -3000000000.0, 2147483648.0, f32::INFINITY, f32::NAN] {
        assert!(
            matches!(
                call(&registry, "toInt", &[Value::Float(out_of_range)]),
                Err(ErrorImpl::ConversionError { .. })
            ),
            "{}",
            out_of_range
        );
    }
    assert_eq!(call(&registry, "toInt", &[Value::from(" 42 ")]), Ok(Value::Int(42)));
    assert!(matches!(
        call(&registry, "toInt", &[Value::from("forty")]),
        Err(ErrorImpl::ConversionError { .. })
    ));
    assert_eq!(call(&registry, "toFloat", &[Value::Bool(true)]), Ok(Value::Float(1.0)));
    assert_eq!(call(&registry, "toBool", &[Value::Int(0)]), Ok(Value::Bool(false)));
    assert_eq!(call(&registry, "toString", &[Value::Float(2.0)]), Ok(Value::from("2.0")));
    assert_eq!(call(&registry, "isInt", &[Value::Int(1)]), Ok(Value::Bool(true)));
    assert_eq!(call(&registry, "isStr", &[Value::Int(1)]), Ok(Value::Bool(false)));
}

#[test]
fn test_input_builtins() {
    let registry = BuiltinRegistry::standard();
    let input = registry.functions().iter().find(|function| function.name == "input").unwrap();
    let input_float = registry.functions().iter().find(|function| function.name == "inputFloat").unwrap();

    let mut environment = FakeEnvironment::with_inputs([Value::Int(7), Value::Int(2), Value::from("x")]);

    assert_eq!((input.implementation)(&mut environment, &[]), Ok(Value::Int(7)));
    assert_eq!((input_float.implementation)(&mut environment, &[]), Ok(Value::Float(2.0)));
    assert!(matches!(
        (input.implementation)(&mut environment, &[]),
        Err(ErrorImpl::InputShape { .. })
    ));
    assert_eq!((input.implementation)(&mut environment, &[]), Err(ErrorImpl::InputExhausted));
}

#[test]
fn test_fake_environment_is_fifo() {
    let mut environment = FakeEnvironment::new();
    environment.push_input(Value::Int(1));
    environment.push_input(Value::Int(2));

    assert_eq!(environment.remaining_inputs(), 2);
    assert_eq!(environment.read(), Ok(Value::Int(1)));
    assert_eq!(environment.read(), Ok(Value::Int(2)));
    assert_eq!(environment.read(), Err(ErrorImpl::InputExhausted));

    environment.write(Value::Int(3));
    environment.write(Value::Float(0.5));
    assert_eq!(environment.outputs(), &[Value::Int(3), Value::Float(0.5)]);
    assert_eq!(environment.written_text(), vec!["3", "0.5"]);
}

#[test]
fn test_console_environment() {
    let reader = Cursor::new("12\n2.5\ntrue\nhello world\n");
    let mut environment = ConsoleEnvironment::new(reader, Vec::new());

    assert_eq!(environment.read(), Ok(Value::Int(12)));
    assert_eq!(environment.read(), Ok(Value::Float(2.5)));
    assert_eq!(environment.read(), Ok(Value::Bool(true)));
    assert_eq!(environment.read(), Ok(Value::from("hello world")));
    assert_eq!(environment.read(), Err(ErrorImpl::InputExhausted));

    environment.write(Value::Int(5));
    environment.write(Value::from("done"));
    assert_eq!(String::from_utf8(environment.into_writer()).unwrap(), "5\ndone\n");
}

#[test]
fn test_parse_input_line_keeps_inner_whitespace() {
    assert_eq!(parse_input_line(" -3 \r\n"), Value::Int(-3));
    assert_eq!(parse_input_line("  padded text\n"), Value::from("  padded text"));
}
