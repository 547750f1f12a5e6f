//! Resolved schema model consumed by the qapigen backend.
//!
//! The backend never sees schema text. It receives already-resolved descriptors:
//!
//! - [`TypeDescriptor`]: a closed set of kinds (builtin, enum, object, union, array) exposing the symbol name,
//!   member list and condition the generator needs.
//! - [`CommandDescriptor`]: one command definition, consumed immediately by the generator.
//! - [`Schema`] / [`SchemaVisitor`]: the ordered walker that feeds modules and commands to a visitor.
//!
//! Schemas are assembled programmatically through [`SchemaBuilder`] or loaded from a pre-resolved JSON descriptor
//! document with [`Schema::from_json`].

pub mod command;
pub mod error;
pub mod ifcond;
mod load;
pub mod schema;
pub mod types;

pub use command::CommandDescriptor;
pub use error::SchemaError;
pub use ifcond::IfCond;
pub use schema::{Module, Schema, SchemaBuilder, SchemaVisitor};
pub use types::{Member, RefKind, TypeDescriptor, TypeKind, TypeRef, Variant};
