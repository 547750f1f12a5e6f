//! Entry-point declarations.

use qapigen_core::lang::runtime::{COMMAND_PREFIX, ERRP_PARAM};
use qapigen_core::{c_name, c_name_unprotected};
use qapigen_schema::TypeDescriptor;

use super::ArgShape;
use crate::backend::c_emitter::c_decl;
use crate::backend::errors::GenerationError;

/// Generate the declaration of a command's entry point.
///
/// With `proto` the declaration ends the statement (`...;`) for the header stream; without it the text is the
/// signature line a definition body follows.
///
/// ## Errors
///
/// Returns [`GenerationError`] when `boxed` is inconsistent with `arg_type`.
///
/// ## Examples
///
/// ```rust
/// use qapigen::backend::commands::gen_command_decl;
///
/// let decl = gen_command_decl("ping", None, false, None, true).unwrap();
/// assert_eq!(decl, "void qmp_ping(Error **errp);\n");
/// ```
pub fn gen_command_decl(
    name: &str,
    arg_type: Option<&TypeDescriptor>,
    boxed: bool,
    ret_type: Option<&TypeDescriptor>,
    proto: bool,
) -> Result<String, GenerationError> {
    let shape = ArgShape::of(name, arg_type, boxed)?;
    let mut decl = signature(name, shape, ret_type);
    if proto {
        decl.push(';');
    }
    decl.push('\n');
    Ok(decl)
}

/// `<ret> qmp_<name>(<params>)` with no terminator.
pub(crate) fn signature(name: &str, shape: ArgShape<'_>, ret_type: Option<&TypeDescriptor>) -> String {
    let c_type = ret_type.map_or_else(|| "void".to_string(), TypeDescriptor::c_type);
    let function = format!("{}{}", COMMAND_PREFIX, c_name_unprotected(name));
    format!("{}({})", c_decl(&c_type, &function), build_params(shape))
}

/// Parameter list: the argument parameters followed by the error slot.
fn build_params(shape: ArgShape<'_>) -> String {
    let mut params = Vec::new();
    match shape {
        ArgShape::None => {}
        ArgShape::Boxed(ty) => params.push(c_decl(&ty.c_param_type(), "arg")),
        ArgShape::Members(ty) => {
            for member in ty.members() {
                let member_name = c_name(&member.name);
                if member.optional {
                    params.push(format!("bool has_{}", member_name));
                }
                params.push(c_decl(&member.ty.c_param_type(), &member_name));
            }
        }
    }
    params.push(ERRP_PARAM.to_string());
    params.join(", ")
}
