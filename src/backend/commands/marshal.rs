//! Per-return-type decoders.
//!
//! A decoder performs the remote call for an already-serialized request and turns the response into a typed value.
//! Many commands may share a return type; the coordinator emits each decoder at most once per unit, keyed by
//! [`TypeDescriptor::symbol_name`].

use qapigen_core::lang::runtime::{
    DECODER_PREFIX, ERROR_PROPAGATE, ERROR_TYPE, HANDLE_RELEASE, HANDLE_TYPE, INPUT_VISITOR_NEW, RETURN_KEY,
    RPC_CALL, VISIT_COMPLETE, VISIT_FREE, VISIT_PREFIX, VISITOR_TYPE,
};
use qapigen_schema::TypeDescriptor;

use crate::backend::c_emitter::{CEmitter, c_decl, c_string};

/// Name of the decoder generated for `ret_type`.
pub fn decoder_name(ret_type: &TypeDescriptor) -> String {
    format!("{}{}", DECODER_PREFIX, ret_type.symbol_name())
}

/// Generate the decoder for `ret_type`.
///
/// The decoder takes the request handle and the caller's error slot, performs the call and returns the decoded
/// value. On a failed call it returns the zero value without decoding; the response handle is released on every
/// path that obtained one.
pub fn gen_marshal_rpc(ret_type: &TypeDescriptor) -> String {
    let c_type = ret_type.c_type();
    let signature = format!(
        "static {}({} args, {} **errp)",
        c_decl(&c_type, &decoder_name(ret_type)),
        HANDLE_TYPE,
        ERROR_TYPE
    );

    let mut e = CEmitter::new();
    e.blank_line();
    e.function(&signature, |e| {
        e.line(&format!("{} *err = NULL;", ERROR_TYPE));
        e.line(&format!("{} *v;", VISITOR_TYPE));
        e.line(&format!("{} cfret = NULL;", HANDLE_TYPE));
        e.line(&format!("{} = {{0}};", c_decl(&c_type, "ret")));
        e.blank_line();
        e.line(&format!("{}(args, &cfret, &err);", RPC_CALL));
        e.block("if (err)", |e| {
            e.line(&format!("{}(errp, err);", ERROR_PROPAGATE));
            e.line("return ret;");
        });
        e.line(&format!("v = {}(cfret);", INPUT_VISITOR_NEW));
        e.line(&format!(
            "{}{}(v, {}, &ret, &err);",
            VISIT_PREFIX,
            ret_type.symbol_name(),
            c_string(RETURN_KEY)
        ));
        e.block("if (!err)", |e| {
            e.line(&format!("{}(v, &ret);", VISIT_COMPLETE));
        });
        e.line(&format!("{}(errp, err);", ERROR_PROPAGATE));
        e.line(&format!("{}(v);", VISIT_FREE));
        e.line(&format!("{}(cfret);", HANDLE_RELEASE));
        e.line("return ret;");
    });
    e.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use qapigen_core::lang::builtins::BuiltinTypeId;

    #[test]
    fn test_decoder_name_uses_symbol() {
        let ty = TypeDescriptor::object("StatusInfo", vec![]);
        assert_eq!(decoder_name(&ty), "qmp_marshal_rpc_StatusInfo");
        assert_eq!(decoder_name(&TypeDescriptor::array(&ty)), "qmp_marshal_rpc_StatusInfoList");
        assert_eq!(
            decoder_name(&TypeDescriptor::builtin(BuiltinTypeId::Str)),
            "qmp_marshal_rpc_str"
        );
    }

    #[test]
    fn test_failed_call_returns_before_decoding() {
        let text = gen_marshal_rpc(&TypeDescriptor::builtin(BuiltinTypeId::Int));
        let call = text.find("qmp_rpc_call(args, &cfret, &err);").unwrap();
        let early = text.find("        return ret;\n    }").unwrap();
        let visitor = text.find("cf_input_visitor_new(cfret)").unwrap();
        assert!(call < early && early < visitor);
        assert!(text.contains("int64_t ret = {0};"));
        assert!(text.contains("visit_type_int(v, \"return\", &ret, &err);"));
    }

    #[test]
    fn test_response_released_after_decode() {
        let text = gen_marshal_rpc(&TypeDescriptor::object("StatusInfo", vec![]));
        let free = text.find("visit_free(v);").unwrap();
        let release = text.find("CFRelease(cfret);").unwrap();
        assert!(free < release);
        assert_eq!(text.matches("CFRelease(cfret);").count(), 1);
        assert!(text.starts_with("\nstatic StatusInfo *qmp_marshal_rpc_StatusInfo(CFDictionaryRef args, Error **errp)\n{\n"));
    }
}
