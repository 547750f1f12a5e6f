//! Errors raised while assembling or loading a schema.

use miette::Diagnostic;
use thiserror::Error;

/// Schema assembly error.
///
/// These are descriptor-level problems (dangling references, duplicates); the backend reports its own generation
/// errors separately.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("invalid descriptor document: {0}")]
    #[diagnostic(code(qapigen_schema::json))]
    Json(#[from] serde_json::Error),

    #[error("type '{name}' referenced by '{referenced_by}' is not defined")]
    #[diagnostic(code(qapigen_schema::unknown_type))]
    UnknownType { name: String, referenced_by: String },

    #[error("type '{name}' is defined more than once")]
    #[diagnostic(code(qapigen_schema::duplicate_type))]
    DuplicateType { name: String },

    #[error("'{name}' redefines a builtin type")]
    #[diagnostic(code(qapigen_schema::builtin_redefined))]
    BuiltinRedefined { name: String },

    #[error("command '{name}' is defined more than once")]
    #[diagnostic(code(qapigen_schema::duplicate_command))]
    DuplicateCommand { name: String },

    #[error("nested array '{name}' referenced by '{referenced_by}'")]
    #[diagnostic(code(qapigen_schema::nested_array), help("wrap the inner array in an object type"))]
    NestedArray { name: String, referenced_by: String },

    #[error("union branch '{branch}' of '{union}' must be an object type, found '{found}'")]
    #[diagnostic(code(qapigen_schema::union_branch))]
    UnionBranch {
        union: String,
        branch: String,
        found: String,
    },

    #[error("main module '{module}' is listed at position {position}, but must come first")]
    #[diagnostic(
        code(qapigen_schema::main_module_not_first),
        help("move the main module to the front of 'modules', or leave it out")
    )]
    MainModuleNotFirst { module: String, position: usize },

    #[error("module '{module}' is listed more than once")]
    #[diagnostic(code(qapigen_schema::duplicate_module))]
    DuplicateModule { module: String },

    #[error("empty name in {context}")]
    #[diagnostic(code(qapigen_schema::empty_name))]
    EmptyName { context: String },
}
