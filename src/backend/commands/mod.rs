//! Per-command fragment emitters.
//!
//! - `decl` - entry-point declaration (`qmp_<command>(...)`)
//! - `marshal` - per-return-type decoder (`qmp_marshal_rpc_<type>`)
//! - `stub` - entry-point body: serialize, call, deserialize
//!
//! All three are pure: they take descriptors and return text. Ordering, deduplication and guards belong to
//! [`crate::backend::unit`].

pub mod decl;
pub mod marshal;
pub mod stub;

pub use decl::gen_command_decl;
pub use marshal::{decoder_name, gen_marshal_rpc};
pub use stub::gen_rpc_call;

use qapigen_core::c_name;
use qapigen_core::lang::runtime::STUB_LOCALS;
use qapigen_schema::TypeDescriptor;

use super::errors::GenerationError;

/// How a command's arguments reach the entry point.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ArgShape<'a> {
    /// No parameters besides the error slot.
    None,
    /// One `<T> *arg` parameter carrying the whole aggregate.
    Boxed(&'a TypeDescriptor),
    /// One parameter per member (plus `has_` flags), non-empty.
    Members(&'a TypeDescriptor),
}

impl<'a> ArgShape<'a> {
    /// Classify a command's arguments, rejecting inconsistent descriptors.
    pub(crate) fn of(
        command: &str,
        arg_type: Option<&'a TypeDescriptor>,
        boxed: bool,
    ) -> Result<Self, GenerationError> {
        match (arg_type, boxed) {
            (None, true) => Err(GenerationError::BoxedWithoutArgs {
                command: command.to_string(),
            }),
            (Some(ty), true) if ty.has_variants() => Err(GenerationError::BoxedUnion {
                command: command.to_string(),
                ty: ty.name().to_string(),
            }),
            (Some(ty), true) => Ok(ArgShape::Boxed(ty)),
            (Some(ty), false) if ty.has_variants() => Err(GenerationError::UnboxedUnion {
                command: command.to_string(),
                ty: ty.name().to_string(),
            }),
            (Some(ty), false) if !ty.members().is_empty() => {
                check_member_names(command, ty)?;
                Ok(ArgShape::Members(ty))
            }
            (_, false) => Ok(ArgShape::None),
        }
    }

    /// The aggregate to serialize under `"arguments"`, if there is anything to serialize.
    pub(crate) fn aggregate(&self) -> Option<&'a TypeDescriptor> {
        match *self {
            ArgShape::Boxed(ty) if !ty.is_empty() => Some(ty),
            ArgShape::Members(ty) => Some(ty),
            _ => None,
        }
    }
}

/// Unboxed members become parameters of the stub, so none may share a name with its locals.
fn check_member_names(command: &str, ty: &TypeDescriptor) -> Result<(), GenerationError> {
    for member in ty.members() {
        let name = c_name(&member.name);
        if STUB_LOCALS.contains(&name.as_str()) {
            return Err(GenerationError::ReservedMember {
                command: command.to_string(),
                member: member.name.clone(),
            });
        }
    }
    Ok(())
}
