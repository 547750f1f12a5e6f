//! Names of the serialization and transport runtime referenced by generated code.
//!
//! Generated stubs never implement these; they only call them. Keeping the spellings here means a runtime rename
//! touches one file.

/// Prefix of every generated command entry point (`qmp_<command>`).
pub const COMMAND_PREFIX: &str = "qmp_";

/// Prefix of every generated return-type decoder (`qmp_marshal_rpc_<type>`).
pub const DECODER_PREFIX: &str = "qmp_marshal_rpc_";

/// Prefix of the serialization visitor for a type (`visit_type_<type>`).
pub const VISIT_PREFIX: &str = "visit_type_";

/// Transport call primitive: `qmp_rpc_call(request, result_slot_or_NULL, errp)`.
pub const RPC_CALL: &str = "qmp_rpc_call";

/// Opaque property-container handle type.
pub const HANDLE_TYPE: &str = "CFDictionaryRef";

/// Releases a property-container handle.
pub const HANDLE_RELEASE: &str = "CFRelease";

/// Output visitor constructor, bound to the handle it fills on completion.
pub const OUTPUT_VISITOR_NEW: &str = "cf_output_visitor_new";

/// Input visitor constructor over a result handle.
pub const INPUT_VISITOR_NEW: &str = "cf_input_visitor_new";

pub const VISITOR_TYPE: &str = "Visitor";
pub const VISIT_COMPLETE: &str = "visit_complete";
pub const VISIT_FREE: &str = "visit_free";

/// Error slot type and propagation helper.
pub const ERROR_TYPE: &str = "Error";
pub const ERROR_PROPAGATE: &str = "error_propagate";

/// Trailing error-output parameter of every entry point.
pub const ERRP_PARAM: &str = "Error **errp";

/// Field key carrying the command name in a request.
pub const EXECUTE_KEY: &str = "execute";

/// Field key carrying the argument aggregate in a request.
pub const ARGUMENTS_KEY: &str = "arguments";

/// Field key carrying the result in a response.
pub const RETURN_KEY: &str = "return";

/// Label of the shared cleanup block in generated stubs.
pub const CLEANUP_LABEL: &str = "out";

/// Identifiers a stub declares itself; an unboxed argument member spelled like one would shadow it.
pub const STUB_LOCALS: &[&str] = &["cmdname", "cfargs", "err", "v", "ret", "arg", "argp", "errp"];

/// Headers every generated command unit includes before its sibling units.
pub const RUNTIME_HEADERS: &[&str] = &[
    "qemu-compat.h",
    "cf-output-visitor.h",
    "cf-input-visitor.h",
    "dealloc-visitor.h",
    "error.h",
];
