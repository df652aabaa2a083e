//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program). It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Top-level declarations and the `main` entry point
//! - Statement parsing (declarations, control flow, print, return)
//! - Expression parsing (binary and unary ops, calls, ternaries, literals)
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.
//! Statements are expressions too: the tree has a single node type.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
