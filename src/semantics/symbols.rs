use std::collections::HashMap;

use crate::{
    ast::ast::NodeId,
    errors::errors::{Error, ErrorImpl},
    runtime::value_type::{describe_types, ValueType},
    Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Parameter,
    Iterator,
}

/// A variable-like name: the node that declared it and how it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub declaration: NodeId,
}

/// Where the body of a resolved function lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    /// Index into the builtin registry
    Builtin(usize),
    /// Id of the user's function declaration
    User(NodeId),
}

/// One overload of a function name.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameter_types: Vec<ValueType>,
    pub return_type: ValueType,
    pub callee: Callee,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub value_type: ValueType,
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<usize>,
    variables: HashMap<String, VariableSymbol>,
    functions: HashMap<String, Vec<FunctionSymbol>>,
    types: HashMap<String, TypeDeclaration>,
}

/// Lexical scopes stored in an arena and linked by parent index.
///
/// Scope 0 is the global scope. Popping a scope only moves the cursor back to its
/// parent; the arena keeps every scope until the table is dropped.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
            current: 0,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope {
            parent: Some(self.current),
            ..Scope::default()
        });
        self.current = self.scopes.len() - 1;
    }

    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    fn chain(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(&self.scopes[self.current]), |scope| {
            scope.parent.map(|parent| &self.scopes[parent])
        })
    }

    /// Declares a variable in the current scope. Shadowing a name from an
    /// enclosing scope is allowed.
    pub fn declare_variable(&mut self, symbol: VariableSymbol, position: Position) -> Result<(), Error> {
        let scope = &mut self.scopes[self.current];
        if scope.variables.contains_key(&symbol.name) {
            return Err(ErrorImpl::DuplicateSymbol { symbol: symbol.name }.at(position));
        }

        scope.variables.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Adds an overload. Only an identical parameter signature in the current
    /// scope is a conflict.
    pub fn declare_function(&mut self, symbol: FunctionSymbol, position: Position) -> Result<(), Error> {
        let overloads = self.scopes[self.current]
            .functions
            .entry(symbol.name.clone())
            .or_default();

        if overloads
            .iter()
            .any(|overload| overload.parameter_types == symbol.parameter_types)
        {
            return Err(ErrorImpl::DuplicateSymbol {
                symbol: format!("{}({})", symbol.name, describe_types(&symbol.parameter_types)),
            }
            .at(position));
        }

        overloads.push(symbol);
        Ok(())
    }

    pub fn declare_type(&mut self, declaration: TypeDeclaration, position: Position) -> Result<(), Error> {
        let scope = &mut self.scopes[self.current];
        if scope.types.contains_key(&declaration.name) {
            return Err(ErrorImpl::DuplicateSymbol { symbol: declaration.name }.at(position));
        }

        scope.types.insert(declaration.name.clone(), declaration);
        Ok(())
    }

    pub fn get_variable(&self, name: &str, position: Position) -> Result<&VariableSymbol, Error> {
        self.chain()
            .find_map(|scope| scope.variables.get(name))
            .ok_or_else(|| unknown(name, position))
    }

    /// Overloads from the nearest scope that declares `name`.
    pub fn get_function_overloads(&self, name: &str, position: Position) -> Result<&[FunctionSymbol], Error> {
        self.chain()
            .find_map(|scope| scope.functions.get(name))
            .map(|overloads| overloads.as_slice())
            .ok_or_else(|| unknown(name, position))
    }

    pub fn get_type(&self, name: &str, position: Position) -> Result<&TypeDeclaration, Error> {
        self.chain()
            .find_map(|scope| scope.types.get(name))
            .ok_or_else(|| unknown(name, position))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

fn unknown(name: &str, position: Position) -> Error {
    ErrorImpl::UnknownSymbol { symbol: String::from(name) }.at(position)
}
