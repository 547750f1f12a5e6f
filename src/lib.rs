#![forbid(unsafe_code)]
//! QAPI command marshaller generator
//!
//! Given resolved QAPI command descriptors, this crate generates the client side of each command: a C entry point
//! that serializes its arguments into a request, performs the remote call and decodes the typed result.
//!
//! - [`qapigen_schema`] holds the descriptor model and the JSON interchange loader
//! - [`backend`] holds the fragment emitters, the per-module coordinator and the writers
//! - [`cli`] is the `qapigen` command line
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: failures inside generated C travel through the `Error *err` slot and never panic here.

pub mod backend;
pub mod cli;

pub use backend::{CommandGenerator, GenerationError, GeneratorConfig, gen_commands};
pub use qapigen_schema::{CommandDescriptor, Schema, SchemaError, TypeDescriptor};
