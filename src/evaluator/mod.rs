//! Tree-walking evaluation of analysed programs.
//!
//! Every expression evaluates to a [`Completion`](evaluator::Completion): either a
//! value, or a `break`/`continue`/`return` signal travelling outwards until a loop,
//! switch or call absorbs it.

pub mod evaluator;
pub mod operations;

#[cfg(test)]
mod tests;
