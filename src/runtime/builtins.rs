use crate::{
    ast::declarations::{BuiltinFunctionDeclaration, NativeFunction},
    errors::errors::ErrorImpl,
};

use super::{environment::Environment, value::Value, value_type::ValueType};

/// A named type available to every program.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinType {
    pub name: String,
    pub value_type: ValueType,
}

/// Native functions and types made visible in the global scope of every analysis.
///
/// Several entries may share a name as long as their parameter types differ; the
/// overload is picked statically from the argument types at each call site.
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    functions: Vec<BuiltinFunctionDeclaration>,
    types: Vec<BuiltinType>,
}

const PRIMITIVES: [ValueType; 4] = [
    ValueType::Int,
    ValueType::Float,
    ValueType::Bool,
    ValueType::String,
];

impl BuiltinRegistry {
    /// Registry holding only the primitive type names.
    pub fn new() -> Self {
        let mut registry = BuiltinRegistry {
            functions: vec![],
            types: vec![],
        };

        registry.register_type("int", ValueType::Int);
        registry.register_type("float", ValueType::Float);
        registry.register_type("bool", ValueType::Bool);
        registry.register_type("string", ValueType::String);
        registry.register_type("str", ValueType::String);
        registry.register_type("void", ValueType::Void);

        registry
    }

    /// Primitive types plus the standard math, string, conversion and input functions.
    pub fn standard() -> Self {
        use ValueType::{Bool, Float, Int, String};

        let mut registry = BuiltinRegistry::new();

        registry.register("abs", &[("x", Int)], Int, abs);
        registry.register("abs", &[("x", Float)], Float, abs);
        let extrema: [(&str, NativeFunction); 2] = [("min", min), ("max", max)];
        for (name, implementation) in extrema {
            registry.register(name, &[("x", Int), ("y", Int)], Int, implementation);
            registry.register(name, &[("x", Float), ("y", Float)], Float, implementation);
        }
        registry.register("pow", &[("a", Int), ("b", Int)], Float, pow);
        registry.register("pow", &[("a", Float), ("b", Float)], Float, pow);
        let rounding: [(&str, NativeFunction); 4] = [
            ("round", round),
            ("ceil", ceil),
            ("floor", floor),
            ("sqrt", sqrt),
        ];
        for (name, implementation) in rounding {
            registry.register(name, &[("x", Int)], Float, implementation);
            registry.register(name, &[("x", Float)], Float, implementation);
        }

        registry.register("length", &[("s", String)], Int, length);
        registry.register("contains", &[("s", String), ("sub", String)], Bool, contains);
        registry.register("startsWith", &[("s", String), ("prefix", String)], Bool, starts_with);
        registry.register("endsWith", &[("s", String), ("suffix", String)], Bool, ends_with);
        registry.register("toLower", &[("s", String)], String, to_lower);
        registry.register("toUpper", &[("s", String)], String, to_upper);
        registry.register("trim", &[("s", String)], String, trim);
        registry.register("indexOf", &[("s", String), ("sub", String)], Int, index_of);
        registry.register("lastIndexOf", &[("s", String), ("sub", String)], Int, last_index_of);
        registry.register(
            "replace",
            &[("s", String), ("old", String), ("new", String)],
            String,
            replace,
        );
        registry.register(
            "substring",
            &[("s", String), ("start", Int), ("length", Int)],
            String,
            substring,
        );

        for ty in PRIMITIVES {
            registry.register("toString", &[("x", ty.clone())], String, to_string);
            registry.register("toInt", &[("x", ty.clone())], Int, to_int);
            registry.register("toFloat", &[("x", ty.clone())], Float, to_float);
            registry.register("toBool", &[("x", ty.clone())], Bool, to_bool);
            registry.register("isInt", &[("x", ty.clone())], Bool, is_int);
            registry.register("isFloat", &[("x", ty.clone())], Bool, is_float);
            registry.register("isBool", &[("x", ty.clone())], Bool, is_bool);
            registry.register("isStr", &[("x", ty)], Bool, is_str);
        }

        registry.register("input", &[], Int, input_int);
        registry.register("inputFloat", &[], Float, input_float);
        registry.register("inputString", &[], String, input_string);
        registry.register("inputBool", &[], Bool, input_bool);

        registry
    }

    pub fn register(
        &mut self,
        name: &str,
        parameters: &[(&str, ValueType)],
        return_type: ValueType,
        implementation: NativeFunction,
    ) {
        self.functions.push(BuiltinFunctionDeclaration {
            name: String::from(name),
            parameters: parameters
                .iter()
                .map(|(name, ty)| (String::from(*name), ty.clone()))
                .collect(),
            return_type,
            implementation,
        });
    }

    pub fn register_type(&mut self, name: &str, value_type: ValueType) {
        self.types.push(BuiltinType {
            name: String::from(name),
            value_type,
        });
    }

    pub fn functions(&self) -> &[BuiltinFunctionDeclaration] {
        &self.functions
    }

    pub fn function(&self, index: usize) -> Option<&BuiltinFunctionDeclaration> {
        self.functions.get(index)
    }

    pub fn types(&self) -> &[BuiltinType] {
        &self.types
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        BuiltinRegistry::standard()
    }
}

fn expect_count(function: &str, args: &[Value], count: usize) -> Result<(), ErrorImpl> {
    if args.len() != count {
        return Err(ErrorImpl::BuiltinArguments {
            function: String::from(function),
            message: format!("expected {} arguments, received {}", count, args.len()),
        });
    }
    Ok(())
}

fn invalid(function: &str, message: String) -> ErrorImpl {
    ErrorImpl::BuiltinArguments {
        function: String::from(function),
        message,
    }
}

fn abs(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("abs", args, 1)?;
    match &args[0] {
        Value::Int(x) => x.checked_abs().map(Value::Int).ok_or(ErrorImpl::IntegerOverflow {
            operation: String::from("abs"),
        }),
        other => Ok(Value::Float(other.as_float()?.abs())),
    }
}

fn min(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("min", args, 2)?;
    match (&args[0], &args[1]) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(*x.min(y))),
        (x, y) => Ok(Value::Float(x.as_float()?.min(y.as_float()?))),
    }
}

fn max(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("max", args, 2)?;
    match (&args[0], &args[1]) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(*x.max(y))),
        (x, y) => Ok(Value::Float(x.as_float()?.max(y.as_float()?))),
    }
}

fn pow(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("pow", args, 2)?;
    Ok(Value::Float(args[0].as_number()?.powf(args[1].as_number()?)))
}

fn round(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("round", args, 1)?;
    Ok(Value::Float(args[0].as_number()?.round()))
}

fn ceil(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("ceil", args, 1)?;
    Ok(Value::Float(args[0].as_number()?.ceil()))
}

fn floor(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("floor", args, 1)?;
    Ok(Value::Float(args[0].as_number()?.floor()))
}

fn sqrt(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("sqrt", args, 1)?;
    let x = args[0].as_number()?;
    if x < 0.0 {
        return Err(invalid("sqrt", format!("cannot take the square root of {}", x)));
    }
    Ok(Value::Float(x.sqrt()))
}

fn length(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("length", args, 1)?;
    Ok(Value::Int(args[0].as_string()?.chars().count() as i32))
}

fn contains(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("contains", args, 2)?;
    Ok(Value::Bool(args[0].as_string()?.contains(args[1].as_string()?)))
}

fn starts_with(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("startsWith", args, 2)?;
    Ok(Value::Bool(args[0].as_string()?.starts_with(args[1].as_string()?)))
}

fn ends_with(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("endsWith", args, 2)?;
    Ok(Value::Bool(args[0].as_string()?.ends_with(args[1].as_string()?)))
}

fn to_lower(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("toLower", args, 1)?;
    Ok(Value::String(args[0].as_string()?.to_lowercase()))
}

fn to_upper(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("toUpper", args, 1)?;
    Ok(Value::String(args[0].as_string()?.to_uppercase()))
}

fn trim(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("trim", args, 1)?;
    Ok(Value::String(String::from(args[0].as_string()?.trim())))
}

// Byte offsets from `str::find` are converted to character offsets
fn char_index(haystack: &str, byte_index: Option<usize>) -> Value {
    match byte_index {
        Some(index) => Value::Int(haystack[..index].chars().count() as i32),
        None => Value::Int(-1),
    }
}

fn index_of(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("indexOf", args, 2)?;
    let haystack = args[0].as_string()?;
    Ok(char_index(haystack, haystack.find(args[1].as_string()?)))
}

fn last_index_of(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("lastIndexOf", args, 2)?;
    let haystack = args[0].as_string()?;
    Ok(char_index(haystack, haystack.rfind(args[1].as_string()?)))
}

fn replace(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("replace", args, 3)?;
    let old = args[1].as_string()?;
    if old.is_empty() {
        return Err(invalid("replace", String::from("the replaced text cannot be empty")));
    }
    Ok(Value::String(args[0].as_string()?.replace(old, args[2].as_string()?)))
}

fn substring(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("substring", args, 3)?;
    let text = args[0].as_string()?;
    let start = args[1].as_int()?;
    let count = args[2].as_int()?;
    let available = text.chars().count() as i64;

    if start < 0 || count < 0 || start as i64 + count as i64 > available {
        return Err(invalid(
            "substring",
            format!(
                "range {}..{} is outside a string of length {}",
                start,
                start as i64 + count as i64,
                available
            ),
        ));
    }

    Ok(Value::String(
        text.chars().skip(start as usize).take(count as usize).collect(),
    ))
}

fn to_string(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("toString", args, 1)?;
    Ok(Value::String(args[0].to_string()))
}

fn conversion_error(value: &Value, target: &str) -> ErrorImpl {
    ErrorImpl::ConversionError {
        value: value.to_string(),
        target: String::from(target),
    }
}

fn to_int(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("toInt", args, 1)?;
    match &args[0] {
        Value::Int(x) => Ok(Value::Int(*x)),
        // Truncates toward zero; the result must fit an int
        Value::Float(x) if x.is_finite() && *x >= i32::MIN as f32 && *x < i32::MAX as f32 => {
            Ok(Value::Int(*x as i32))
        }
        Value::Bool(x) => Ok(Value::Int(*x as i32)),
        Value::String(x) => x
            .trim()
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| conversion_error(&args[0], "int")),
        other => Err(conversion_error(other, "int")),
    }
}

fn to_float(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("toFloat", args, 1)?;
    match &args[0] {
        Value::Int(x) => Ok(Value::Float(*x as f32)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Bool(x) => Ok(Value::Float(if *x { 1.0 } else { 0.0 })),
        Value::String(x) => x
            .trim()
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| conversion_error(&args[0], "float")),
        other => Err(conversion_error(other, "float")),
    }
}

fn to_bool(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("toBool", args, 1)?;
    match &args[0] {
        Value::Bool(x) => Ok(Value::Bool(*x)),
        Value::Int(x) => Ok(Value::Bool(*x != 0)),
        Value::Float(x) => Ok(Value::Bool(*x != 0.0)),
        Value::String(x) => Ok(Value::Bool(!x.is_empty())),
        other => Err(conversion_error(other, "bool")),
    }
}

fn is_int(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("isInt", args, 1)?;
    Ok(Value::Bool(args[0].is_int()))
}

fn is_float(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("isFloat", args, 1)?;
    Ok(Value::Bool(args[0].is_float()))
}

fn is_bool(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("isBool", args, 1)?;
    Ok(Value::Bool(args[0].is_bool()))
}

fn is_str(_: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("isStr", args, 1)?;
    Ok(Value::Bool(args[0].is_string()))
}

fn input_shape(expected: &str, received: &Value) -> ErrorImpl {
    ErrorImpl::InputShape {
        expected: String::from(expected),
        received: String::from(received.kind_name()),
    }
}

fn input_int(environment: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("input", args, 0)?;
    match environment.read()? {
        value @ Value::Int(_) => Ok(value),
        other => Err(input_shape("int", &other)),
    }
}

fn input_float(environment: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("inputFloat", args, 0)?;
    match environment.read()? {
        Value::Int(x) => Ok(Value::Float(x as f32)),
        value @ Value::Float(_) => Ok(value),
        other => Err(input_shape("float", &other)),
    }
}

fn input_string(environment: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("inputString", args, 0)?;
    match environment.read()? {
        value @ Value::String(_) => Ok(value),
        Value::Void | Value::Nil => Err(input_shape("string", &Value::Void)),
        other => Ok(Value::String(other.to_string())),
    }
}

fn input_bool(environment: &mut dyn Environment, args: &[Value]) -> Result<Value, ErrorImpl> {
    expect_count("inputBool", args, 0)?;
    match environment.read()? {
        value @ Value::Bool(_) => Ok(value),
        other => Err(input_shape("bool", &other)),
    }
}
