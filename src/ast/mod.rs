/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Expression nodes, operators, node ids and the program root
/// - declarations: Variable, constant, parameter, function and builtin declarations
pub mod ast;
pub mod declarations;
