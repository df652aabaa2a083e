use std::{rc::Rc, time::Instant};

use crate::{
    ast::ast::Program,
    errors::errors::Error,
    evaluator::evaluator::Evaluator,
    lexer::lexer::tokenize,
    parser::parser::parse,
    runtime::{builtins::BuiltinRegistry, environment::Environment, value::Value},
    semantics::{annotations::Annotations, semantics::analyze},
};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterConfig {
    /// Nested user function calls allowed before evaluation fails with `CallDepthExceeded`.
    pub max_call_depth: usize,
    /// Name reported in diagnostic positions.
    pub file_name: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            file_name: String::from("shell"),
        }
    }
}

/// Lexes, parses, analyses and evaluates programs against one builtin registry.
///
/// ```ignore
/// let interpreter = Interpreter::new(InterpreterConfig::default());
/// let mut environment = FakeEnvironment::new();
/// interpreter.run("func main:void() { print(1 + 2); }", &mut environment)?;
/// assert_eq!(environment.written_text(), vec!["3"]);
/// ```
#[derive(Debug, Clone)]
pub struct Interpreter {
    registry: BuiltinRegistry,
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Interpreter::with_builtins(BuiltinRegistry::standard(), config)
    }

    pub fn with_builtins(registry: BuiltinRegistry, config: InterpreterConfig) -> Self {
        Interpreter { registry, config }
    }

    pub fn registry(&self) -> &BuiltinRegistry {
        &self.registry
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Runs every phase up to and including semantic analysis.
    pub fn check(&self, source: &str) -> Result<(Program, Annotations), Error> {
        let file_name = self.config.file_name.clone();

        let start = Instant::now();
        let tokens = tokenize(source.to_string(), Some(file_name.clone()))?;
        tracing::debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

        let parse_start = Instant::now();
        let (_, program) = parse(tokens, Rc::new(file_name));
        let program = program?;
        tracing::debug!(elapsed = ?parse_start.elapsed(), "parsed");

        let analysis_start = Instant::now();
        let annotations = analyze(&program, &self.registry)?;
        tracing::debug!(elapsed = ?analysis_start.elapsed(), "analysed");

        Ok((program, annotations))
    }

    /// Checks `source` and, if it is well formed, evaluates it against `environment`.
    ///
    /// Returns the value given to `return` in the entry point, or void. Nothing is
    /// evaluated when any phase before evaluation fails.
    pub fn run(&self, source: &str, environment: &mut dyn Environment) -> Result<Value, Error> {
        let (program, annotations) = self.check(source)?;

        let start = Instant::now();
        let mut evaluator = Evaluator::new(&annotations, &self.registry, environment, self.config.max_call_depth);
        let result = evaluator.run(&program);
        tracing::debug!(elapsed = ?start.elapsed(), ok = result.is_ok(), "evaluated");

        result.inspect_err(|error| tracing::debug!(%error, kind = %error.kind(), "evaluation failed"))
    }
}
