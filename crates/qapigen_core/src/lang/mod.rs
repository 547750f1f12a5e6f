//! C-side vocabulary registries.
//!
//! Callers work with stable IDs (e.g. [`builtins::BuiltinTypeId`]) and look up spellings and C type tokens through
//! the registry tables instead of scattering string literals across the emitters.
//!
//! ## Examples
//! ```rust
//! use qapigen_core::lang::builtins::{self, BuiltinTypeId};
//!
//! assert_eq!(builtins::from_str("str"), Some(BuiltinTypeId::Str));
//! assert_eq!(builtins::info_for(BuiltinTypeId::Str).c_type, "char *");
//! ```

pub mod builtins;
pub mod c_keywords;
pub mod runtime;
