//! Define error types for command marshaller generation.
//!
//! These errors represent *generation-time* failures: a descriptor the generator cannot turn into valid C, or a
//! coordinator used out of order. Errors inside the generated code travel through the `Error *err` slot of the
//! emitted procedures and never surface here.
//!
//! ## Notes
//!
//! - Every descriptor error names the offending command.
//! - Any error aborts the whole run; a unit is never flushed half-emitted.

use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// Error during command marshaller generation.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    #[error("command '{command}' is boxed but has no argument type")]
    #[diagnostic(
        code(qapigen::boxed_without_args),
        help("drop 'boxed' or give the command a 'data' type")
    )]
    BoxedWithoutArgs { command: String },

    #[error("command '{command}' is boxed over union '{ty}'")]
    #[diagnostic(code(qapigen::boxed_union))]
    BoxedUnion { command: String, ty: String },

    #[error("command '{command}' takes union '{ty}' as unboxed arguments")]
    #[diagnostic(code(qapigen::unboxed_union), help("union arguments cannot be unpacked into parameters"))]
    UnboxedUnion { command: String, ty: String },

    #[error("command '{command}' has argument member '{member}', which collides with a generated local")]
    #[diagnostic(
        code(qapigen::reserved_member),
        help("rename the member, or make the command 'boxed' so members are reached through 'arg'")
    )]
    ReservedMember { command: String, member: String },

    #[error("command with an empty name in module '{module}'")]
    #[diagnostic(code(qapigen::empty_name))]
    EmptyName { module: String },

    #[error("command '{command}' references '{ty}', which is compiled under '{missing}' while the command is not")]
    #[diagnostic(
        code(qapigen::cond_mismatch),
        help("add the type's condition to the command's 'if', or relax the type's condition")
    )]
    ConditionMismatch {
        command: String,
        ty: String,
        missing: String,
    },

    #[error("command '{command}' visited with no open unit")]
    #[diagnostic(code(qapigen::no_open_unit))]
    NoOpenUnit { command: String },

    #[error("unit '{module}' opened while '{open}' is still open")]
    #[diagnostic(code(qapigen::unit_already_open))]
    UnitAlreadyOpen { module: String, open: String },

    #[error("module '{module}' maps to unit '{basename}', which was already generated")]
    #[diagnostic(code(qapigen::duplicate_unit), help("module file stems must be unique within a schema"))]
    DuplicateUnit { module: String, basename: String },

    #[error("no unit is open")]
    #[diagnostic(code(qapigen::unit_not_open))]
    UnitNotOpen,

    #[error("failed to write unit '{basename}': {source}")]
    #[diagnostic(code(qapigen::write))]
    Write {
        basename: String,
        #[source]
        source: io::Error,
    },
}
