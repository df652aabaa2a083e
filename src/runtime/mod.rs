//! Runtime model shared by analysis and evaluation.
//!
//! - `value` / `value_type` - tagged runtime values and their static types
//! - `builtins` - the registry of native functions and primitive type names
//! - `environment` - the input/output boundary a running program talks to

pub mod builtins;
pub mod environment;
pub mod value;
pub mod value_type;

#[cfg(test)]
mod tests;
