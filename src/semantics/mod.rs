//! Semantic analysis.
//!
//! Four passes run in a fixed order, each a full walk of the program:
//!
//! 1. `resolve_names` - binds names to declarations and collects overload candidates
//! 2. `check_context` - placement of `break`/`continue`/`return`, call arity, constants
//! 3. `resolve_types` - bottom-up type inference and overload selection
//! 4. `check_types` - inferred types against declared types
//!
//! Results are written to an [`Annotations`](annotations::Annotations) side table
//! keyed by node id, leaving the tree itself untouched.

pub mod annotations;
pub mod check_context;
pub mod check_types;
pub mod resolve_names;
pub mod resolve_types;
pub mod semantics;
pub mod symbols;

#[cfg(test)]
mod tests;
