//! Command descriptors.

use std::rc::Rc;

use crate::ifcond::IfCond;
use crate::types::TypeDescriptor;

/// One command definition as handed to the generator.
///
/// Descriptors are consumed in schema order; the generator keeps nothing of them beyond the return type's symbol
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: String,
    pub arg_type: Option<Rc<TypeDescriptor>>,
    /// Pass `arg_type` as one aggregate pointer instead of unpacked members.
    pub boxed: bool,
    pub ret_type: Option<Rc<TypeDescriptor>>,
    /// `false` suppresses every fragment for this command.
    pub generate: bool,
    pub ifcond: IfCond,
    // Passed through from the schema; the marshaller does not use them.
    pub success_response: bool,
    pub allow_oob: bool,
    pub allow_preconfig: bool,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type: None,
            boxed: false,
            ret_type: None,
            generate: true,
            ifcond: IfCond::always(),
            success_response: true,
            allow_oob: false,
            allow_preconfig: false,
        }
    }

    pub fn with_args(mut self, arg_type: Rc<TypeDescriptor>) -> Self {
        self.arg_type = Some(arg_type);
        self
    }

    pub fn boxed(mut self) -> Self {
        self.boxed = true;
        self
    }

    pub fn returning(mut self, ret_type: Rc<TypeDescriptor>) -> Self {
        self.ret_type = Some(ret_type);
        self
    }

    pub fn with_ifcond(mut self, ifcond: IfCond) -> Self {
        self.ifcond = ifcond;
        self
    }

    /// Mark the command as implemented elsewhere (`gen: false`).
    pub fn suppressed(mut self) -> Self {
        self.generate = false;
        self
    }
}
