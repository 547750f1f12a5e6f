//! Entry-point bodies.
//!
//! A stub serializes the command name and arguments into a request, performs the call (through the return type's
//! decoder when there is one) and hands any error to the caller. The body is first planned as a [`StubPlan`]:
//! locals, an ordered list of steps where serialization steps may fail, and a cleanup block that every path reaches.
//! Rendering turns each failing step into a check-and-jump to the shared cleanup label, which is the only way the C
//! side can express release-on-every-exit.

use qapigen_core::c_name;
use qapigen_core::lang::runtime::{
    ARGUMENTS_KEY, CLEANUP_LABEL, ERROR_PROPAGATE, ERROR_TYPE, EXECUTE_KEY, HANDLE_RELEASE, HANDLE_TYPE,
    OUTPUT_VISITOR_NEW, RPC_CALL, VISIT_COMPLETE, VISIT_FREE, VISIT_PREFIX, VISITOR_TYPE,
};
use qapigen_schema::{CommandDescriptor, TypeDescriptor};

use super::marshal::decoder_name;
use super::{ArgShape, decl};
use crate::backend::c_emitter::{CEmitter, c_decl, c_string};
use crate::backend::errors::GenerationError;

/// One statement of the stub's main path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Plain(String),
    /// A serialization step; a populated error slot skips everything up to cleanup.
    Serialize(String),
}

/// The structure of one stub before rendering.
#[derive(Debug, Clone, Default)]
struct StubPlan {
    locals: Vec<String>,
    steps: Vec<Step>,
    cleanup: Vec<String>,
    ret: bool,
}

impl StubPlan {
    fn plan(command: &CommandDescriptor, shape: ArgShape<'_>) -> Self {
        let mut plan = StubPlan::default();

        plan.locals.push(format!("const char *cmdname = {};", c_string(&command.name)));
        plan.locals.push(format!("{} cfargs = NULL;", HANDLE_TYPE));
        plan.locals.push(format!("{} *err = NULL;", ERROR_TYPE));
        plan.locals.push(format!("{} *v = NULL;", VISITOR_TYPE));
        if let Some(ret) = command.ret_type.as_deref() {
            plan.locals.push(format!("{} = {{0}};", c_decl(&ret.c_type(), "ret")));
            plan.ret = true;
        }
        plan.locals.extend(aggregate_locals(shape));

        plan.steps.push(Step::Plain(format!("v = {}(&cfargs);", OUTPUT_VISITOR_NEW)));
        plan.steps.push(Step::Serialize(format!(
            "{}str(v, {}, (char **)&cmdname, &err);",
            VISIT_PREFIX,
            c_string(EXECUTE_KEY)
        )));
        if let Some(aggregate) = shape.aggregate() {
            plan.steps.push(Step::Serialize(format!(
                "{}{}(v, {}, &argp, &err);",
                VISIT_PREFIX,
                aggregate.symbol_name(),
                c_string(ARGUMENTS_KEY)
            )));
        }
        plan.steps.push(Step::Plain(format!("{}(v, &cfargs);", VISIT_COMPLETE)));
        plan.steps.push(Step::Plain(match command.ret_type.as_deref() {
            Some(ret) => format!("ret = {}(cfargs, &err);", decoder_name(ret)),
            None => format!("{}(cfargs, NULL, &err);", RPC_CALL),
        }));
        plan.steps.push(Step::Plain(format!("{}(cfargs);", HANDLE_RELEASE)));

        plan.cleanup.push(format!("{}(errp, err);", ERROR_PROPAGATE));
        plan.cleanup.push(format!("{}(v);", VISIT_FREE));
        plan
    }

    fn render(&self, e: &mut CEmitter) {
        for local in &self.locals {
            e.line(local);
        }
        e.blank_line();
        for step in &self.steps {
            match step {
                Step::Plain(stmt) => e.line(stmt),
                Step::Serialize(stmt) => {
                    e.line(stmt);
                    e.block("if (err)", |e| e.line(&format!("goto {};", CLEANUP_LABEL)));
                }
            }
        }
        e.blank_line();
        e.label(CLEANUP_LABEL);
        for stmt in &self.cleanup {
            e.line(stmt);
        }
        if self.ret {
            e.line("return ret;");
        }
    }
}

/// Locals binding `argp` to the aggregate to serialize.
fn aggregate_locals(shape: ArgShape<'_>) -> Vec<String> {
    match shape {
        ArgShape::None => Vec::new(),
        ArgShape::Boxed(ty) if ty.is_empty() => Vec::new(),
        ArgShape::Boxed(ty) => vec![format!("{} = arg;", c_decl(&ty.c_type(), "argp"))],
        ArgShape::Members(ty) => {
            let symbol = ty.symbol_name();
            let mut locals = vec![format!("{} arg = {{", symbol)];
            for member in ty.members() {
                let name = c_name(&member.name);
                if member.optional {
                    locals.push(format!("    .has_{0} = has_{0},", name));
                }
                let value = member_value(&name, &member.ty.c_type(), &member.ty.c_param_type());
                locals.push(format!("    .{} = {},", name, value));
            }
            locals.push("};".to_string());
            locals.push(format!("{} = &arg;", c_decl(&format!("{} *", symbol), "argp")));
            locals
        }
    }
}

/// Parameter expression stored into an aggregate field, cast when the parameter is a read-only view.
fn member_value(name: &str, c_type: &str, c_param_type: &str) -> String {
    if c_type == c_param_type {
        name.to_string()
    } else {
        format!("({}){}", c_type, name)
    }
}

/// Generate the definition of a command's entry point.
///
/// ## Errors
///
/// Returns [`GenerationError`] when the command's `boxed` flag is inconsistent with its argument type.
pub fn gen_rpc_call(command: &CommandDescriptor) -> Result<String, GenerationError> {
    let arg_type: Option<&TypeDescriptor> = command.arg_type.as_deref();
    let shape = ArgShape::of(&command.name, arg_type, command.boxed)?;
    let signature = decl::signature(&command.name, shape, command.ret_type.as_deref());
    let plan = StubPlan::plan(command, shape);

    let mut e = CEmitter::new();
    e.blank_line();
    e.function(&signature, |e| plan.render(e));
    Ok(e.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use qapigen_core::lang::builtins::BuiltinTypeId;
    use qapigen_schema::{Member, TypeRef};

    fn foo_args() -> Rc<TypeDescriptor> {
        Rc::new(TypeDescriptor::object(
            "q_obj_foo-arg",
            vec![
                Member::optional("bar", TypeRef::builtin(BuiltinTypeId::Str)),
                Member::new("count", TypeRef::builtin(BuiltinTypeId::Int)),
            ],
        ))
    }

    #[test]
    fn test_unboxed_synthesizes_aggregate_literal() {
        let text = gen_rpc_call(&CommandDescriptor::new("foo").with_args(foo_args())).unwrap();
        assert!(text.contains(
            "    q_obj_foo_arg arg = {\n        .has_bar = has_bar,\n        .bar = (char *)bar,\n        .count = count,\n    };\n    q_obj_foo_arg *argp = &arg;\n"
        ));
        assert!(text.contains("visit_type_q_obj_foo_arg(v, \"arguments\", &argp, &err);"));
    }

    #[test]
    fn test_boxed_uses_incoming_reference() {
        let args = Rc::new(TypeDescriptor::object(
            "BlockResize",
            vec![Member::new("size", TypeRef::builtin(BuiltinTypeId::Int))],
        ));
        let text = gen_rpc_call(&CommandDescriptor::new("block-resize").with_args(args).boxed()).unwrap();
        assert!(text.contains("    BlockResize *argp = arg;\n"));
        assert!(!text.contains(" arg = {"));
        assert!(text.contains("visit_type_BlockResize(v, \"arguments\", &argp, &err);"));
    }

    #[test]
    fn test_every_serialization_failure_jumps_to_cleanup() {
        let text = gen_rpc_call(&CommandDescriptor::new("foo").with_args(foo_args())).unwrap();
        assert_eq!(text.matches("goto out;").count(), 2);
        assert_eq!(text.matches("\nout:\n").count(), 1);
        assert_eq!(text.matches("visit_free(v);").count(), 1);
        let label = text.find("\nout:\n").unwrap();
        assert!(text[label..].contains("error_propagate(errp, err);"));
        assert!(text[label..].contains("visit_free(v);"));
    }

    #[test]
    fn test_return_value_flows_through_decoder() {
        let ret = Rc::new(TypeDescriptor::object("StatusInfo", vec![]));
        let text = gen_rpc_call(&CommandDescriptor::new("get_status").returning(ret)).unwrap();
        assert!(text.contains("    StatusInfo *ret = {0};\n"));
        assert!(text.contains("    ret = qmp_marshal_rpc_StatusInfo(cfargs, &err);\n"));
        assert!(!text.contains("qmp_rpc_call"));
        assert!(text.ends_with("    visit_free(v);\n    return ret;\n}\n"));
    }

    #[test]
    fn test_discriminator_is_command_name() {
        let text = gen_rpc_call(&CommandDescriptor::new("query-status")).unwrap();
        assert!(text.contains("const char *cmdname = \"query-status\";"));
        assert!(text.contains("\nvoid qmp_query_status(Error **errp)\n{\n"));
    }

    #[test]
    fn test_inconsistent_descriptor_is_fatal() {
        let mut command = CommandDescriptor::new("broken");
        command.boxed = true;
        assert!(matches!(gen_rpc_call(&command), Err(GenerationError::BoxedWithoutArgs { .. })));
    }
}
