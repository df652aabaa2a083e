use std::collections::HashMap;

use crate::{ast::ast::NodeId, runtime::value_type::ValueType};

use super::symbols::{Callee, FunctionSymbol, SymbolKind};

/// Facts attached to AST nodes by the semantic passes, keyed by node id.
///
/// Each table is written by exactly one pass:
///
/// - name resolution: `bindings`, `candidates`, `declared_types`, `symbol_kinds`
/// - type resolution: `result_types`, `symbol_types`, `callees`
///
/// The evaluator only reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Variable reference, assignment or for-loop node -> declaring node
    bindings: HashMap<NodeId, NodeId>,
    /// Function call -> every overload visible under the called name
    candidates: HashMap<NodeId, Vec<FunctionSymbol>>,
    /// Declaration -> the type its type name resolved to
    declared_types: HashMap<NodeId, ValueType>,
    /// Declaring node -> how the symbol was declared
    symbol_kinds: HashMap<NodeId, SymbolKind>,
    /// Expression or declaration -> inferred type
    result_types: HashMap<NodeId, ValueType>,
    /// Declaring node -> static type of the declared symbol
    symbol_types: HashMap<NodeId, ValueType>,
    /// Function call -> selected overload
    callees: HashMap<NodeId, Callee>,
}

impl Annotations {
    pub fn new() -> Self {
        Annotations::default()
    }

    pub fn bind(&mut self, node: NodeId, declaration: NodeId) {
        self.bindings.insert(node, declaration);
    }

    pub fn binding(&self, node: NodeId) -> Option<NodeId> {
        self.bindings.get(&node).copied()
    }

    pub fn set_candidates(&mut self, node: NodeId, candidates: Vec<FunctionSymbol>) {
        self.candidates.insert(node, candidates);
    }

    pub fn candidates(&self, node: NodeId) -> &[FunctionSymbol] {
        self.candidates.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_declared_type(&mut self, node: NodeId, value_type: ValueType) {
        self.declared_types.insert(node, value_type);
    }

    pub fn declared_type(&self, node: NodeId) -> Option<&ValueType> {
        self.declared_types.get(&node)
    }

    pub fn set_symbol_kind(&mut self, declaration: NodeId, kind: SymbolKind) {
        self.symbol_kinds.insert(declaration, kind);
    }

    pub fn symbol_kind(&self, declaration: NodeId) -> Option<SymbolKind> {
        self.symbol_kinds.get(&declaration).copied()
    }

    pub fn set_result_type(&mut self, node: NodeId, value_type: ValueType) {
        self.result_types.insert(node, value_type);
    }

    pub fn result_type(&self, node: NodeId) -> Option<&ValueType> {
        self.result_types.get(&node)
    }

    pub fn set_symbol_type(&mut self, declaration: NodeId, value_type: ValueType) {
        self.symbol_types.insert(declaration, value_type);
    }

    pub fn symbol_type(&self, declaration: NodeId) -> Option<&ValueType> {
        self.symbol_types.get(&declaration)
    }

    pub fn set_callee(&mut self, node: NodeId, callee: Callee) {
        self.callees.insert(node, callee);
    }

    pub fn callee(&self, node: NodeId) -> Option<Callee> {
        self.callees.get(&node).copied()
    }
}
