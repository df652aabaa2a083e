use crate::{
    ast::{
        ast::{Expression, ExpressionKind, NodeId, Program},
        declarations::{Declaration, FunctionDeclaration},
    },
    errors::errors::Error,
    runtime::{builtins::BuiltinRegistry, value_type::ValueType},
    Position,
};

use super::{
    annotations::Annotations,
    symbols::{Callee, FunctionSymbol, SymbolKind, SymbolTable, TypeDeclaration, VariableSymbol},
};

pub struct NameResolver<'a> {
    pub symbols: SymbolTable,
    pub annotations: &'a mut Annotations,
}

impl<'a> NameResolver<'a> {
    pub fn new(annotations: &'a mut Annotations) -> Self {
        NameResolver {
            symbols: SymbolTable::new(),
            annotations,
        }
    }

    fn declare(&mut self, name: &str, kind: SymbolKind, declaration: NodeId, position: Position) -> Result<(), Error> {
        self.symbols.declare_variable(
            VariableSymbol {
                name: String::from(name),
                kind,
                declaration,
            },
            position,
        )?;
        self.annotations.set_symbol_kind(declaration, kind);
        Ok(())
    }

    fn resolve_type_name(&self, name: &str, position: Position) -> Result<ValueType, Error> {
        Ok(self.symbols.get_type(name, position)?.value_type.clone())
    }
}

/// Binds every name in `program` to its declaration.
///
/// Builtins live in the global scope next to the program's own globals. Top-level
/// functions are declared before any body is visited so they may call each other;
/// variables and constants only become visible after their declaration.
pub fn resolve_names(program: &Program, registry: &BuiltinRegistry, annotations: &mut Annotations) -> Result<(), Error> {
    let mut resolver = NameResolver::new(annotations);
    let position = program.span.start.clone();

    for builtin in registry.types() {
        resolver.symbols.declare_type(
            TypeDeclaration {
                name: builtin.name.clone(),
                value_type: builtin.value_type.clone(),
            },
            position.clone(),
        )?;
    }

    for (index, builtin) in registry.functions().iter().enumerate() {
        resolver.symbols.declare_function(
            FunctionSymbol {
                name: builtin.name.clone(),
                parameter_types: builtin.parameter_types(),
                return_type: builtin.return_type.clone(),
                callee: Callee::Builtin(index),
            },
            position.clone(),
        )?;
    }

    for declaration in &program.declarations {
        if let Declaration::Function(function) = declaration {
            declare_function(&mut resolver, function)?;
        }
    }

    for declaration in &program.declarations {
        resolve_declaration(&mut resolver, declaration)?;
    }

    resolve_expr(&mut resolver, &program.entry)
}

fn declare_function(resolver: &mut NameResolver, function: &FunctionDeclaration) -> Result<(), Error> {
    let mut parameter_types = vec![];
    for parameter in &function.parameters {
        let ty = resolver.resolve_type_name(&parameter.type_name, parameter.span.start.clone())?;
        resolver.annotations.set_declared_type(parameter.id, ty.clone());
        parameter_types.push(ty);
    }

    let return_type = match &function.return_type_name {
        Some(name) => resolver.resolve_type_name(name, function.span.start.clone())?,
        None => ValueType::Void,
    };
    resolver.annotations.set_declared_type(function.id, return_type.clone());

    resolver.symbols.declare_function(
        FunctionSymbol {
            name: function.name.clone(),
            parameter_types,
            return_type,
            callee: Callee::User(function.id),
        },
        function.span.start.clone(),
    )
}

pub fn resolve_declaration(resolver: &mut NameResolver, declaration: &Declaration) -> Result<(), Error> {
    match declaration {
        Declaration::Variable(variable) => {
            if let Some(initializer) = &variable.initializer {
                resolve_expr(resolver, initializer)?;
            }
            if let Some(type_name) = &variable.type_name {
                let ty = resolver.resolve_type_name(type_name, variable.span.start.clone())?;
                resolver.annotations.set_declared_type(variable.id, ty);
            }
            resolver.declare(&variable.name, SymbolKind::Variable, variable.id, variable.span.start.clone())
        }
        Declaration::Constant(constant) => {
            if let Some(initializer) = &constant.initializer {
                resolve_expr(resolver, initializer)?;
            }
            let ty = resolver.resolve_type_name(&constant.type_name, constant.span.start.clone())?;
            resolver.annotations.set_declared_type(constant.id, ty);
            resolver.declare(&constant.name, SymbolKind::Constant, constant.id, constant.span.start.clone())
        }
        // Functions are top-level only and declared up front by `resolve_names`
        Declaration::Function(function) => {
            resolver.symbols.push_scope();
            let result = resolve_function_body(resolver, function);
            resolver.symbols.pop_scope();
            result
        }
    }
}

fn resolve_function_body(resolver: &mut NameResolver, function: &FunctionDeclaration) -> Result<(), Error> {
    for parameter in &function.parameters {
        resolver.declare(&parameter.name, SymbolKind::Parameter, parameter.id, parameter.span.start.clone())?;
    }

    resolve_expr(resolver, &function.body)
}

pub fn resolve_expr(resolver: &mut NameResolver, expression: &Expression) -> Result<(), Error> {
    let position = || expression.span.start.clone();

    match &expression.kind {
        ExpressionKind::Literal(_)
        | ExpressionKind::Break
        | ExpressionKind::Continue
        | ExpressionKind::Empty => Ok(()),
        ExpressionKind::VariableRef { name } => {
            let declaration = resolver.symbols.get_variable(name, position())?.declaration;
            resolver.annotations.bind(expression.id, declaration);
            Ok(())
        }
        ExpressionKind::Assignment { name, value } => {
            resolve_expr(resolver, value)?;
            let declaration = resolver.symbols.get_variable(name, position())?.declaration;
            resolver.annotations.bind(expression.id, declaration);
            Ok(())
        }
        ExpressionKind::Unary { operand, .. } => resolve_expr(resolver, operand),
        ExpressionKind::Binary { left, right, .. } => {
            resolve_expr(resolver, left)?;
            resolve_expr(resolver, right)
        }
        ExpressionKind::FunctionCall { name, arguments } => {
            for argument in arguments {
                resolve_expr(resolver, argument)?;
            }
            let overloads = resolver.symbols.get_function_overloads(name, position())?.to_vec();
            resolver.annotations.set_candidates(expression.id, overloads);
            Ok(())
        }
        ExpressionKind::IfElse { condition, then_branch, else_branch } => {
            resolve_expr(resolver, condition)?;
            resolve_expr(resolver, then_branch)?;
            match else_branch {
                Some(else_branch) => resolve_expr(resolver, else_branch),
                None => Ok(()),
            }
        }
        ExpressionKind::WhileLoop { condition, body } => {
            resolve_expr(resolver, condition)?;
            resolve_expr(resolver, body)
        }
        ExpressionKind::ForLoop { .. } => {
            resolver.symbols.push_scope();
            let result = resolve_for_loop(resolver, expression);
            resolver.symbols.pop_scope();
            result
        }
        ExpressionKind::Switch { scrutinee, cases, default } => {
            resolve_expr(resolver, scrutinee)?;
            for case in cases {
                resolve_expr(resolver, &case.value)?;
                resolve_expr(resolver, &case.body)?;
            }
            match default {
                Some(default) => resolve_expr(resolver, default),
                None => Ok(()),
            }
        }
        ExpressionKind::Return(value) => match value {
            Some(value) => resolve_expr(resolver, value),
            None => Ok(()),
        },
        ExpressionKind::Print(arguments) => {
            for argument in arguments {
                resolve_expr(resolver, argument)?;
            }
            Ok(())
        }
        ExpressionKind::Sequence(expressions) => {
            resolver.symbols.push_scope();
            let result = expressions
                .iter()
                .try_for_each(|expression| resolve_expr(resolver, expression));
            resolver.symbols.pop_scope();
            result
        }
        ExpressionKind::Declaration(declaration) => resolve_declaration(resolver, declaration),
    }
}

/// The start value is resolved before the iterator exists; the condition, step and
/// body see it. Called with the loop's scope already open.
fn resolve_for_loop(resolver: &mut NameResolver, expression: &Expression) -> Result<(), Error> {
    let ExpressionKind::ForLoop { iterator, iterator_type, start, condition, step, body } = &expression.kind else {
        return Ok(());
    };

    resolve_expr(resolver, start)?;

    if let Some(type_name) = iterator_type {
        let ty = resolver.resolve_type_name(type_name, expression.span.start.clone())?;
        resolver.annotations.set_declared_type(expression.id, ty);
    }
    resolver.declare(iterator, SymbolKind::Iterator, expression.id, expression.span.start.clone())?;

    resolve_expr(resolver, condition)?;
    if let Some(step) = step {
        resolve_expr(resolver, step)?;
    }
    resolve_expr(resolver, body)
}
