//! Type descriptors.
//!
//! A [`TypeDescriptor`] is what the generator sees of a schema type: its symbol name, its member list and its own
//! condition. Members and array elements refer to other types through a [`TypeRef`], which carries enough shape to
//! spell the C type without following the reference, so recursive schema types need no cycles here.

use qapigen_core::c_name;
use qapigen_core::lang::builtins::{self, BuiltinTypeId};

use crate::ifcond::IfCond;

/// Shape of a referenced type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefKind {
    Builtin(BuiltinTypeId),
    Enum,
    Object,
    Union,
    Array(Box<TypeRef>),
}

/// A resolved reference to a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: String,
    kind: RefKind,
}

impl TypeRef {
    pub fn builtin(id: BuiltinTypeId) -> Self {
        Self {
            name: builtins::as_str(id).to_string(),
            kind: RefKind::Builtin(id),
        }
    }

    pub fn named(name: impl Into<String>, kind: RefKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Array of `element`; the schema name is `<element>List`.
    pub fn array(element: TypeRef) -> Self {
        Self {
            name: format!("{}List", element.name),
            kind: RefKind::Array(Box::new(element)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RefKind {
        &self.kind
    }

    /// Identifier fragment naming this type in generated symbols (`visit_type_<symbol>`, decoders, dedup keys).
    pub fn symbol_name(&self) -> String {
        match &self.kind {
            RefKind::Builtin(id) => builtins::as_str(*id).to_string(),
            RefKind::Array(element) => format!("{}List", element.symbol_name()),
            _ => c_name(&self.name),
        }
    }

    /// C type of a value of this type.
    pub fn c_type(&self) -> String {
        match &self.kind {
            RefKind::Builtin(id) => builtins::info_for(*id).c_type.to_string(),
            RefKind::Enum => self.symbol_name(),
            RefKind::Object | RefKind::Union | RefKind::Array(_) => format!("{} *", self.symbol_name()),
        }
    }

    /// C type used when a value of this type is passed as a parameter.
    pub fn c_param_type(&self) -> String {
        match &self.kind {
            RefKind::Builtin(id) => builtins::info_for(*id).c_param_type.to_string(),
            _ => self.c_type(),
        }
    }
}

/// One member of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub optional: bool,
    pub ty: TypeRef,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            optional: false,
            ty,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            optional: true,
            ty,
        }
    }
}

/// One branch of a union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub ty: TypeRef,
}

/// Kind-specific payload of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Builtin(BuiltinTypeId),
    Enum { values: Vec<String> },
    Object { members: Vec<Member> },
    /// Base members shared by every branch, plus the branches.
    Union { members: Vec<Member>, variants: Vec<Variant> },
    Array { element: TypeRef },
}

/// A resolved schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    ifcond: IfCond,
}

impl TypeDescriptor {
    pub fn builtin(id: BuiltinTypeId) -> Self {
        Self {
            name: builtins::as_str(id).to_string(),
            kind: TypeKind::Builtin(id),
            ifcond: IfCond::always(),
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: TypeKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
            ifcond: IfCond::always(),
        }
    }

    pub fn object(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Object { members },
            ifcond: IfCond::always(),
        }
    }

    pub fn union(name: impl Into<String>, members: Vec<Member>, variants: Vec<Variant>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Union { members, variants },
            ifcond: IfCond::always(),
        }
    }

    /// Array of `element`, compiled under the element's condition.
    pub fn array(element: &TypeDescriptor) -> Self {
        let element_ref = element.type_ref();
        Self {
            name: format!("{}List", element.name),
            kind: TypeKind::Array { element: element_ref },
            ifcond: element.ifcond.clone(),
        }
    }

    pub fn with_ifcond(mut self, ifcond: IfCond) -> Self {
        self.ifcond = ifcond;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn ifcond(&self) -> &IfCond {
        &self.ifcond
    }

    /// Reference to this type, as a member or array element would hold it.
    pub fn type_ref(&self) -> TypeRef {
        match &self.kind {
            TypeKind::Builtin(id) => TypeRef::builtin(*id),
            TypeKind::Enum { .. } => TypeRef::named(&self.name, RefKind::Enum),
            TypeKind::Object { .. } => TypeRef::named(&self.name, RefKind::Object),
            TypeKind::Union { .. } => TypeRef::named(&self.name, RefKind::Union),
            TypeKind::Array { element } => TypeRef::array(element.clone()),
        }
    }

    pub fn symbol_name(&self) -> String {
        self.type_ref().symbol_name()
    }

    pub fn c_type(&self) -> String {
        self.type_ref().c_type()
    }

    pub fn c_param_type(&self) -> String {
        self.type_ref().c_param_type()
    }

    /// Ordered member list; empty for kinds without members.
    pub fn members(&self) -> &[Member] {
        match &self.kind {
            TypeKind::Object { members } | TypeKind::Union { members, .. } => members,
            _ => &[],
        }
    }

    pub fn variants(&self) -> &[Variant] {
        match &self.kind {
            TypeKind::Union { variants, .. } => variants,
            _ => &[],
        }
    }

    pub fn has_variants(&self) -> bool {
        !self.variants().is_empty()
    }

    /// An aggregate with nothing to serialize.
    pub fn is_empty(&self) -> bool {
        self.members().is_empty() && !self.has_variants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_info() -> TypeDescriptor {
        TypeDescriptor::object(
            "StatusInfo",
            vec![Member::new("running", TypeRef::builtin(BuiltinTypeId::Bool))],
        )
    }

    #[test]
    fn test_c_types_per_kind() {
        assert_eq!(TypeDescriptor::builtin(BuiltinTypeId::Str).c_type(), "char *");
        assert_eq!(TypeDescriptor::builtin(BuiltinTypeId::Str).c_param_type(), "const char *");
        assert_eq!(TypeDescriptor::enumeration("RunState", ["running"]).c_type(), "RunState");
        assert_eq!(status_info().c_type(), "StatusInfo *");
        assert_eq!(TypeDescriptor::array(&status_info()).c_type(), "StatusInfoList *");
        assert_eq!(TypeDescriptor::array(&TypeDescriptor::builtin(BuiltinTypeId::Str)).c_type(), "strList *");
    }

    #[test]
    fn test_symbol_name_mangles_separators() {
        let ty = TypeDescriptor::object("q_obj_get-status-arg", vec![]);
        assert_eq!(ty.symbol_name(), "q_obj_get_status_arg");
        assert_eq!(ty.c_type(), "q_obj_get_status_arg *");
    }

    #[test]
    fn test_array_inherits_element_condition() {
        let element = status_info().with_ifcond(IfCond::new(["defined(CONFIG_X)"]));
        let array = TypeDescriptor::array(&element);
        assert_eq!(array.ifcond(), element.ifcond());
        assert_eq!(array.name(), "StatusInfoList");
        assert_eq!(array.symbol_name(), "StatusInfoList");
    }

    #[test]
    fn test_members_and_emptiness() {
        assert!(TypeDescriptor::object("Empty", vec![]).is_empty());
        assert!(!status_info().is_empty());
        let union = TypeDescriptor::union(
            "Choice",
            vec![],
            vec![Variant {
                name: "status".to_string(),
                ty: status_info().type_ref(),
            }],
        );
        assert!(union.has_variants());
        assert!(!union.is_empty());
        assert!(TypeDescriptor::builtin(BuiltinTypeId::Int).members().is_empty());
    }
}
