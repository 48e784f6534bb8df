//! Function extensions for the JMESPath query language
//!
//! This crate registers three custom functions (`exclude`, `map_merge` and
//! `slice`) with the `jmespath` evaluator and exposes a search entry point
//! that has them pre-wired. The evaluator itself is consumed, not
//! reimplemented: parsing, path resolution and argument-type checking are all
//! the `jmespath` crate's, and every error surfaces as its native
//! [`JmespathError`] with no wrapping.
//!
//! # Examples
//!
//! ```rust
//! use jmespath_functions::search;
//! use jmespath::Variable;
//!
//! let data = Variable::from_json(r#"[{"id": "foo", "bar": "baz"}]"#).unwrap();
//! let result = search("[*].exclude(@, 'id')", data).unwrap();
//!
//! let expected = Variable::from_json(r#"[{"bar": "baz"}]"#).unwrap();
//! assert_eq!(*result, expected);
//! ```
//!
//! Callers that already configure their own [`Runtime`] can install the same
//! function set into it with [`functions::register`] instead of going through
//! [`search`].

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod functions;
pub mod search;

pub use functions::{exclude_fn, map_merge_fn, register, slice_fn};
pub use search::{compile, runtime, search};

// Re-export the evaluator types that appear in this crate's public signatures
pub use jmespath::{ErrorReason, JmespathError, Rcvar, Runtime, RuntimeError, Variable};
