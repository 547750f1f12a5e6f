//! Provide the shared, pure naming rules and C vocabulary used by the qapigen generator.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic helpers that both the schema
//! model and the backend emitters rely on, so that an identifier derived from a schema name is spelled the same way
//! no matter which component derives it.
//!
//! ## Notes
//!
//! - No IO, no global state, no generator-specific types.
//! - Current scope: identifier mangling (`c_name`), generated-unit basenames, builtin scalar types, C keyword
//!   vocabulary, and the names of the serialization/transport runtime referenced by generated code.

pub mod lang;
pub mod naming;

pub use naming::{c_name, c_name_unprotected, module_basename};
