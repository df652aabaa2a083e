use std::fmt::Debug;

use crate::{
    errors::errors::ErrorImpl,
    runtime::{environment::Environment, value::Value, value_type::ValueType},
    Span,
};

use super::ast::{Expression, NodeId};

#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Constant(ConstantDeclaration),
    Function(FunctionDeclaration),
}

impl Declaration {
    pub fn id(&self) -> NodeId {
        match self {
            Declaration::Variable(declaration) => declaration.id,
            Declaration::Constant(declaration) => declaration.id,
            Declaration::Function(declaration) => declaration.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable(declaration) => &declaration.name,
            Declaration::Constant(declaration) => &declaration.name,
            Declaration::Function(declaration) => &declaration.name,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Declaration::Variable(declaration) => &declaration.span,
            Declaration::Constant(declaration) => &declaration.span,
            Declaration::Function(declaration) => &declaration.span,
        }
    }
}

/// `let name[:type] [= initializer];`
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub type_name: Option<String>,
    pub initializer: Option<Expression>,
}

/// `const name:type = initializer;`
///
/// A missing initializer survives parsing so that type checking can reject it.
#[derive(Debug, Clone)]
pub struct ConstantDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub type_name: String,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct ParameterDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub parameters: Vec<ParameterDeclaration>,
    /// `None` declares a void function.
    pub return_type_name: Option<String>,
    pub body: Expression,
}

pub type NativeFunction = fn(&mut dyn Environment, &[Value]) -> Result<Value, ErrorImpl>;

/// A function implemented natively and exposed to programs by name.
#[derive(Clone)]
pub struct BuiltinFunctionDeclaration {
    pub name: String,
    pub parameters: Vec<(String, ValueType)>,
    pub return_type: ValueType,
    pub implementation: NativeFunction,
}

impl BuiltinFunctionDeclaration {
    pub fn parameter_types(&self) -> Vec<ValueType> {
        self.parameters.iter().map(|(_, ty)| ty.clone()).collect()
    }
}

impl Debug for BuiltinFunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunctionDeclaration")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}
