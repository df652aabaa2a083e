//! Embedding entry point: source text in, analysed program or completion value out.

pub mod interpreter;

#[cfg(test)]
mod tests;
