//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using an anchored regex pattern table
//! - Recognition of keywords, identifiers, literals, and operators
//! - Token position tracking for error reporting
//! - `///` line comments, `/* */` block comments and whitespace

pub mod lexer;
pub mod tokens;
