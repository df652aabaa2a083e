use crate::{ast::ast::Program, errors::errors::Error, runtime::builtins::BuiltinRegistry};

use super::{
    annotations::Annotations, check_context::check_context, check_types::check_types,
    resolve_names::resolve_names, resolve_types::resolve_types,
};

/// Runs the four semantic passes over `program` in order and returns what they
/// learned about it.
///
/// The first failing pass aborts the analysis. The program is never modified, so
/// analysing the same tree again yields equal annotations.
#[tracing::instrument(level = "debug", skip_all, fields(declarations = program.declarations.len()))]
pub fn analyze(program: &Program, registry: &BuiltinRegistry) -> Result<Annotations, Error> {
    let mut annotations = Annotations::new();

    tracing::debug!("resolving names");
    resolve_names(program, registry, &mut annotations).inspect_err(log_failure)?;

    tracing::debug!("checking context rules");
    check_context(program, &annotations).inspect_err(log_failure)?;

    tracing::debug!("resolving types");
    resolve_types(program, &mut annotations).inspect_err(log_failure)?;

    tracing::debug!("checking types");
    check_types(program, &annotations).inspect_err(log_failure)?;

    tracing::debug!("analysis complete");
    Ok(annotations)
}

fn log_failure(error: &Error) {
    tracing::debug!(%error, kind = %error.kind(), "analysis failed");
}
