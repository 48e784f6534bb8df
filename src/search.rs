//! Search entry points with the function extensions pre-wired
//!
//! A process-wide [`Runtime`] holding the evaluator's builtin functions plus
//! this crate's extensions is built once and shared by every call. The
//! runtime is read-only after construction, so sharing it across threads
//! needs no synchronization.

use jmespath::{Expression, JmespathError, Rcvar, Runtime, ToJmespath};

use crate::functions;

lazy_static::lazy_static! {
    static ref RUNTIME: Runtime = {
        let mut runtime = Runtime::new();
        runtime.register_builtin_functions();
        functions::register(&mut runtime);
        runtime
    };
}

/// The shared runtime: every builtin plus `exclude`, `map_merge` and `slice`.
///
/// Exposed for callers that need the evaluator's own configuration surface
/// directly, e.g. to compile many expressions against it.
#[must_use]
pub fn runtime() -> &'static Runtime {
    &RUNTIME
}

/// Compile an expression against the shared runtime.
///
/// Drop-in replacement for `jmespath::compile` that makes the function
/// extensions available to the expression. Useful when one expression is
/// evaluated against many inputs.
///
/// # Errors
///
/// Returns the evaluator's parse error for malformed expression syntax.
pub fn compile(expression: &str) -> Result<Expression<'static>, JmespathError> {
    runtime().compile(expression)
}

/// Evaluate an expression against `data` with the function extensions active.
///
/// Equivalent to building a runtime with the builtin functions, registering
/// this crate's extensions on it, then compiling and searching. The result is
/// exactly what the underlying evaluator returns, with no post-processing;
/// parse errors, type-mismatch errors and unknown-function errors all
/// propagate unchanged.
///
/// # Errors
///
/// Any [`JmespathError`] the evaluator or a registered function produces.
pub fn search<T: ToJmespath>(expression: &str, data: T) -> Result<Rcvar, JmespathError> {
    tracing::trace!(expression, "evaluating jmespath expression");
    compile(expression)?.search(data)
}
