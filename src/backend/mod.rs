//! QAPI command marshaller backend
//!
//! This module turns resolved command descriptors into C source: one declarations stream (`.h`) and one
//! definitions stream (`.c`) per schema module.
//!
//! The pipeline is:
//! 1. [`qapigen_schema::Schema`] walks its modules and commands in order
//! 2. [`CommandGenerator`] asks the fragment emitters in `commands/` for text and wraps it in guards
//! 3. Closed units go to a [`UnitWriter`]
//!
//! ## Module Organization
//!
//! - `commands/` - Per-command fragment emitters
//!   - `decl.rs` - Entry-point declarations
//!   - `marshal.rs` - Per-return-type decoders
//!   - `stub.rs` - Entry-point bodies
//! - `unit.rs` - Emission units and the coordinator state machine
//! - `writer.rs` - Filesystem and in-memory unit writers
//! - `ifcond.rs` - `#if`/`#endif` guard wrapping
//! - `c_emitter.rs` - Low-level C code string builder
//! - `config.rs` - Generator configuration
//! - `errors.rs` - Generation-time errors

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod c_emitter;
pub mod commands;
pub mod config;
pub mod errors;
pub mod ifcond;
pub mod unit;
pub mod writer;

pub use config::{CondMismatchPolicy, GeneratorConfig};
pub use errors::GenerationError;
pub use unit::{CommandGenerator, EmissionUnit, gen_commands};
pub use writer::{FsWriter, GeneratedUnit, MemoryWriter, UnitWriter};
