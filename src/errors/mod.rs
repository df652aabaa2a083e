//! Error types and error handling for the interpreter.
//!
//! This module defines the error types used from lexing through evaluation.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for every phase, grouped into an [`errors::ErrorKind`]
//! - Error tips used when rendering diagnostics

pub mod errors;
