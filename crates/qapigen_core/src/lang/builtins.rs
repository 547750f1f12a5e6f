//! Builtin scalar type vocabulary.
//!
//! This module defines the canonical set of builtin schema types and the C tokens they map to.
//! Callers should use [`BuiltinTypeId`] for identity and query spellings through [`BuiltinTypeInfo`] /
//! [`BUILTIN_TYPES`].
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `c_param_type` differs from `c_type` only where a parameter is passed as a read-only view (`str`).
//!
//! ## Examples
//! ```rust
//! use qapigen_core::lang::builtins::{self, BuiltinTypeId};
//!
//! assert_eq!(builtins::from_str("int"), Some(BuiltinTypeId::Int));
//! assert_eq!(builtins::as_str(BuiltinTypeId::Int), "int");
//! assert_eq!(builtins::info_for(BuiltinTypeId::Int).c_type, "int64_t");
//! ```

/// Stable identifier for a builtin schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    Str,
    Number,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Size,
    Bool,
    Any,
    Null,
}

/// Metadata for a builtin schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinTypeId,
    /// Schema spelling; also the symbol name used in `visit_type_<name>`.
    pub canonical: &'static str,
    /// C type of a value (locals, struct members, return values).
    pub c_type: &'static str,
    /// C type used when the value is passed as a parameter.
    pub c_param_type: &'static str,
}

const fn info(
    id: BuiltinTypeId,
    canonical: &'static str,
    c_type: &'static str,
    c_param_type: &'static str,
) -> BuiltinTypeInfo {
    BuiltinTypeInfo {
        id,
        canonical,
        c_type,
        c_param_type,
    }
}

/// Registry of all builtin schema types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(BuiltinTypeId::Str, "str", "char *", "const char *"),
    info(BuiltinTypeId::Number, "number", "double", "double"),
    info(BuiltinTypeId::Int, "int", "int64_t", "int64_t"),
    info(BuiltinTypeId::Int8, "int8", "int8_t", "int8_t"),
    info(BuiltinTypeId::Int16, "int16", "int16_t", "int16_t"),
    info(BuiltinTypeId::Int32, "int32", "int32_t", "int32_t"),
    info(BuiltinTypeId::Int64, "int64", "int64_t", "int64_t"),
    info(BuiltinTypeId::Uint8, "uint8", "uint8_t", "uint8_t"),
    info(BuiltinTypeId::Uint16, "uint16", "uint16_t", "uint16_t"),
    info(BuiltinTypeId::Uint32, "uint32", "uint32_t", "uint32_t"),
    info(BuiltinTypeId::Uint64, "uint64", "uint64_t", "uint64_t"),
    info(BuiltinTypeId::Size, "size", "uint64_t", "uint64_t"),
    info(BuiltinTypeId::Bool, "bool", "bool", "bool"),
    info(BuiltinTypeId::Any, "any", "QObject *", "QObject *"),
    info(BuiltinTypeId::Null, "null", "QNull *", "QNull *"),
];

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a builtin type.
///
/// ## Parameters
/// - `id`: Builtin type identifier.
///
/// ## Returns
/// - The associated [`BuiltinTypeInfo`] from [`BUILTIN_TYPES`].
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    // BUILTIN_TYPES is declared in enum order.
    &BUILTIN_TYPES[id as usize]
}

/// Resolve a spelling to a builtin type identifier.
///
/// ## Returns
/// - `Some(BuiltinTypeId)` if `name` matches a canonical spelling.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|b| b.canonical == name).map(|b| b.id)
}
