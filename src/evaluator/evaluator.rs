use std::collections::HashMap;

use crate::{
    ast::{
        ast::{BinaryOperator, Expression, ExpressionKind, NodeId, Program, UnaryOperator},
        declarations::{Declaration, FunctionDeclaration},
    },
    errors::errors::{Error, ErrorImpl},
    runtime::{builtins::BuiltinRegistry, environment::Environment, value::Value, value_type::ValueType},
    semantics::{annotations::Annotations, symbols::Callee},
    Position, PROPAGATE_SIGNAL,
};

use super::operations::{binary, step, unary};

/// Stack kept free before entering a user function body, and the size of each new
/// segment when it runs out.
const RED_ZONE: usize = 128 * 1024;
const STACK_PER_CALL: usize = 2 * 1024 * 1024;

/// Non-local control flow leaving a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Break,
    Continue,
    Return(Value),
}

/// Outcome of evaluating one expression: a value, or a signal that must travel up
/// to the construct that handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Normal(Value),
    Abrupt(Signal),
}

/// Values bound by one function activation. The base frame's first scope holds the
/// globals, which every frame can see.
#[derive(Debug)]
struct Frame {
    scopes: Vec<HashMap<String, Value>>,
}

pub struct Evaluator<'a> {
    annotations: &'a Annotations,
    registry: &'a BuiltinRegistry,
    environment: &'a mut dyn Environment,
    functions: HashMap<NodeId, &'a FunctionDeclaration>,
    frames: Vec<Frame>,
    max_call_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        annotations: &'a Annotations,
        registry: &'a BuiltinRegistry,
        environment: &'a mut dyn Environment,
        max_call_depth: usize,
    ) -> Self {
        Evaluator {
            annotations,
            registry,
            environment,
            functions: HashMap::new(),
            frames: vec![Frame {
                scopes: vec![HashMap::new()],
            }],
            max_call_depth,
        }
    }

    /// Number of user function activations currently on the stack.
    pub fn call_depth(&self) -> usize {
        self.frames.len() - 1
    }

    fn push_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(HashMap::new());
        }
    }

    fn pop_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.pop();
        }
    }

    /// Runs `body` inside a fresh scope, popping it whatever the outcome.
    fn in_scope<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.push_scope();
        let result = body(self);
        self.pop_scope();
        result
    }

    fn declare(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.frames.last_mut().and_then(|frame| frame.scopes.last_mut()) {
            scope.insert(String::from(name), value);
        }
    }

    /// Frame and scope index of the innermost visible binding of `name`.
    fn locate(&self, name: &str) -> Option<(usize, usize)> {
        let current = self.frames.len().checked_sub(1)?;
        if let Some(scope) = self.frames[current].scopes.iter().rposition(|scope| scope.contains_key(name)) {
            return Some((current, scope));
        }

        let globals = self.frames.first()?.scopes.first()?;
        globals.contains_key(name).then_some((0, 0))
    }

    fn lookup(&self, name: &str, position: &Position) -> Result<Value, Error> {
        self.locate(name)
            .and_then(|(frame, scope)| self.frames[frame].scopes[scope].get(name))
            .cloned()
            .ok_or_else(|| unbound(name, position))
    }

    /// Overwrites the innermost visible binding of `name`; never creates one.
    fn assign(&mut self, name: &str, value: Value, position: &Position) -> Result<(), Error> {
        let (frame, scope) = self.locate(name).ok_or_else(|| unbound(name, position))?;
        if let Some(slot) = self.frames[frame].scopes[scope].get_mut(name) {
            *slot = value;
        }
        Ok(())
    }

    /// Evaluates the top-level declarations and then the entry point.
    ///
    /// Every global is bound to its type's default before the first initializer
    /// runs, so a function called from an initializer may read a global declared
    /// after it and sees the default until that global is initialised.
    pub fn run(&mut self, program: &'a Program) -> Result<Value, Error> {
        for declaration in &program.declarations {
            match declaration {
                Declaration::Function(function) => {
                    self.functions.insert(function.id, function);
                }
                global => {
                    let value = self.default_value(global.id());
                    self.declare(global.name(), value);
                }
            }
        }

        for declaration in &program.declarations {
            self.evaluate_declaration(declaration)?;
        }

        match self.evaluate(&program.entry)? {
            Completion::Abrupt(Signal::Return(value)) => Ok(value),
            _ => Ok(Value::Void),
        }
    }

    fn default_value(&self, declaration: NodeId) -> Value {
        self.annotations
            .symbol_type(declaration)
            .map(ValueType::default_value)
            .unwrap_or(Value::Void)
    }

    pub fn evaluate_declaration(&mut self, declaration: &'a Declaration) -> Result<Completion, Error> {
        match declaration {
            Declaration::Variable(variable) => {
                let value = match &variable.initializer {
                    Some(initializer) => PROPAGATE_SIGNAL!(self.evaluate(initializer)?),
                    None => self.default_value(variable.id),
                };
                self.declare(&variable.name, value);
            }
            Declaration::Constant(constant) => {
                let value = match &constant.initializer {
                    Some(initializer) => PROPAGATE_SIGNAL!(self.evaluate(initializer)?),
                    None => Value::Void,
                };
                self.declare(&constant.name, value);
            }
            // Functions only appear at the top level and are registered by `run`
            Declaration::Function(_) => {}
        }
        Ok(Completion::Normal(Value::Void))
    }

    pub fn evaluate(&mut self, expression: &'a Expression) -> Result<Completion, Error> {
        let position = &expression.span.start;

        let value = match &expression.kind {
            ExpressionKind::Literal(value) => value.clone(),
            ExpressionKind::VariableRef { name } => self.lookup(name, position)?,
            ExpressionKind::Assignment { name, value } => {
                let value = PROPAGATE_SIGNAL!(self.evaluate(value)?);
                self.assign(name, value, position)?;
                Value::Void
            }
            ExpressionKind::Unary { operator, operand } => {
                return self.evaluate_unary(*operator, operand, position);
            }
            ExpressionKind::Binary { operator, left, right } => {
                return self.evaluate_binary(*operator, left, right, position);
            }
            ExpressionKind::FunctionCall { arguments, .. } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(PROPAGATE_SIGNAL!(self.evaluate(argument)?));
                }
                self.call(expression, values)?
            }
            ExpressionKind::IfElse { condition, then_branch, else_branch } => {
                let condition = PROPAGATE_SIGNAL!(self.evaluate(condition)?);
                let condition = condition.as_bool().map_err(|error| error.at(position.clone()))?;
                match else_branch {
                    Some(_) if condition => return self.evaluate(then_branch),
                    Some(else_branch) => return self.evaluate(else_branch),
                    // Without an else the statement has no value
                    None if condition => {
                        PROPAGATE_SIGNAL!(self.evaluate(then_branch)?);
                        Value::Void
                    }
                    None => Value::Void,
                }
            }
            ExpressionKind::WhileLoop { condition, body } => {
                while self.test(condition)? {
                    match self.evaluate(body)? {
                        Completion::Abrupt(Signal::Break) => break,
                        Completion::Abrupt(Signal::Return(value)) => {
                            return Ok(Completion::Abrupt(Signal::Return(value)));
                        }
                        Completion::Normal(_) | Completion::Abrupt(Signal::Continue) => {}
                    }
                }
                Value::Void
            }
            ExpressionKind::ForLoop { iterator, start, condition, step, body, .. } => {
                return self.in_scope(|evaluator| {
                    let start = PROPAGATE_SIGNAL!(evaluator.evaluate(start)?);
                    evaluator.declare(iterator, start);

                    while evaluator.test(condition)? {
                        match evaluator.evaluate(body)? {
                            Completion::Abrupt(Signal::Break) => break,
                            Completion::Abrupt(Signal::Return(value)) => {
                                return Ok(Completion::Abrupt(Signal::Return(value)));
                            }
                            Completion::Normal(_) | Completion::Abrupt(Signal::Continue) => {}
                        }
                        if let Some(step) = step {
                            PROPAGATE_SIGNAL!(evaluator.evaluate(step)?);
                        }
                    }
                    Ok(Completion::Normal(Value::Void))
                });
            }
            ExpressionKind::Switch { scrutinee, cases, default } => {
                let scrutinee = PROPAGATE_SIGNAL!(self.evaluate(scrutinee)?);

                let mut selected = default.as_deref();
                for case in cases {
                    let value = PROPAGATE_SIGNAL!(self.evaluate(&case.value)?);
                    if value == scrutinee {
                        selected = Some(&case.body);
                        break;
                    }
                }

                if let Some(body) = selected {
                    match self.evaluate(body)? {
                        // `break` leaves the switch only
                        Completion::Abrupt(Signal::Break) | Completion::Normal(_) => {}
                        abrupt => return Ok(abrupt),
                    }
                }
                Value::Void
            }
            ExpressionKind::Break => return Ok(Completion::Abrupt(Signal::Break)),
            ExpressionKind::Continue => return Ok(Completion::Abrupt(Signal::Continue)),
            ExpressionKind::Return(value) => {
                let value = match value {
                    Some(value) => PROPAGATE_SIGNAL!(self.evaluate(value)?),
                    None => Value::Void,
                };
                return Ok(Completion::Abrupt(Signal::Return(value)));
            }
            ExpressionKind::Print(arguments) => {
                for argument in arguments {
                    let value = PROPAGATE_SIGNAL!(self.evaluate(argument)?);
                    self.environment.write(value);
                }
                Value::Void
            }
            ExpressionKind::Sequence(expressions) => {
                return self.in_scope(|evaluator| {
                    let mut last = Value::Void;
                    for expression in expressions {
                        last = PROPAGATE_SIGNAL!(evaluator.evaluate(expression)?);
                    }
                    Ok(Completion::Normal(last))
                });
            }
            ExpressionKind::Declaration(declaration) => return self.evaluate_declaration(declaration),
            ExpressionKind::Empty => Value::Void,
        };

        Ok(Completion::Normal(value))
    }

    /// Evaluates a loop condition. Conditions are plain expressions and never signal.
    fn test(&mut self, condition: &'a Expression) -> Result<bool, Error> {
        match self.evaluate(condition)? {
            Completion::Normal(value) => value.as_bool().map_err(|error| error.at(condition.span.start.clone())),
            Completion::Abrupt(_) => Ok(false),
        }
    }

    fn evaluate_unary(
        &mut self,
        operator: UnaryOperator,
        operand: &'a Expression,
        position: &Position,
    ) -> Result<Completion, Error> {
        if !operator.is_update() {
            let value = PROPAGATE_SIGNAL!(self.evaluate(operand)?);
            let result = unary(operator, &value).map_err(|error| error.at(position.clone()))?;
            return Ok(Completion::Normal(result));
        }

        let ExpressionKind::VariableRef { name } = &operand.kind else {
            return Err(ErrorImpl::InvalidExpression {
                message: format!("operator `{}` needs a variable", operator),
            }
            .at(position.clone()));
        };

        let previous = self.lookup(name, position)?;
        let delta = match operator {
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => 1,
            _ => -1,
        };
        let updated = step(&previous, delta).map_err(|error| error.at(position.clone()))?;
        self.assign(name, updated.clone(), position)?;

        match operator {
            UnaryOperator::PreIncrement | UnaryOperator::PreDecrement => Ok(Completion::Normal(updated)),
            _ => Ok(Completion::Normal(previous)),
        }
    }

    fn evaluate_binary(
        &mut self,
        operator: BinaryOperator,
        left: &'a Expression,
        right: &'a Expression,
        position: &Position,
    ) -> Result<Completion, Error> {
        let left = PROPAGATE_SIGNAL!(self.evaluate(left)?);

        // The right operand of `and`/`or` runs only when it decides the result
        if matches!(operator, BinaryOperator::And | BinaryOperator::Or) {
            let left = left.as_bool().map_err(|error| error.at(position.clone()))?;
            if left == (operator == BinaryOperator::Or) {
                return Ok(Completion::Normal(Value::Bool(left)));
            }
            let right = PROPAGATE_SIGNAL!(self.evaluate(right)?);
            let right = right.as_bool().map_err(|error| error.at(position.clone()))?;
            return Ok(Completion::Normal(Value::Bool(right)));
        }

        let right = PROPAGATE_SIGNAL!(self.evaluate(right)?);
        let result = binary(operator, &left, &right).map_err(|error| error.at(position.clone()))?;
        Ok(Completion::Normal(result))
    }

    fn call(&mut self, call: &'a Expression, arguments: Vec<Value>) -> Result<Value, Error> {
        let position = &call.span.start;
        let callee = self.annotations.callee(call.id).ok_or_else(|| {
            ErrorImpl::InvalidExpression {
                message: String::from("call has no resolved overload"),
            }
            .at(position.clone())
        })?;

        match callee {
            Callee::Builtin(index) => {
                let registry = self.registry;
                let builtin = registry.function(index).ok_or_else(|| {
                    ErrorImpl::InvalidExpression {
                        message: format!("unknown builtin #{}", index),
                    }
                    .at(position.clone())
                })?;

                tracing::trace!(function = %builtin.name, "calling builtin");
                (builtin.implementation)(&mut *self.environment, &arguments).map_err(|error| error.at(position.clone()))
            }
            Callee::User(id) => {
                let function = *self.functions.get(&id).ok_or_else(|| {
                    ErrorImpl::InvalidExpression {
                        message: String::from("call to a function that is not in scope"),
                    }
                    .at(position.clone())
                })?;
                self.call_user(function, arguments, position)
            }
        }
    }

    fn call_user(
        &mut self,
        function: &'a FunctionDeclaration,
        arguments: Vec<Value>,
        position: &Position,
    ) -> Result<Value, Error> {
        if self.call_depth() >= self.max_call_depth {
            return Err(ErrorImpl::CallDepthExceeded {
                depth: self.max_call_depth,
            }
            .at(position.clone()));
        }

        tracing::trace!(function = %function.name, depth = self.call_depth() + 1, "calling function");

        let parameters: HashMap<String, Value> = function
            .parameters
            .iter()
            .map(|parameter| parameter.name.clone())
            .zip(arguments)
            .collect();
        self.frames.push(Frame {
            scopes: vec![parameters],
        });
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_CALL, || self.evaluate(&function.body));
        self.frames.pop();

        let value = match result? {
            Completion::Normal(value) | Completion::Abrupt(Signal::Return(value)) => value,
            Completion::Abrupt(_) => Value::Void,
        };

        match self.annotations.declared_type(function.id) {
            Some(ValueType::Void) | None => Ok(Value::Void),
            Some(_) => Ok(value),
        }
    }
}

fn unbound(name: &str, position: &Position) -> Error {
    ErrorImpl::UnknownSymbol {
        symbol: String::from(name),
    }
    .at(position.clone())
}
