//! Loading a pre-resolved JSON descriptor document.
//!
//! The document is the interchange format between the schema front end and this generator: a flat type table plus
//! modules listing their commands in order. Type references are names (`"StatusInfo"`), builtin spellings
//! (`"str"`) or single-level arrays (`"[StatusInfo]"`).

use std::collections::HashMap;
use std::rc::Rc;

use qapigen_core::lang::builtins;
use serde::Deserialize;

use crate::command::CommandDescriptor;
use crate::error::SchemaError;
use crate::ifcond::IfCond;
use crate::schema::{Schema, SchemaBuilder};
use crate::types::{Member, RefKind, TypeDescriptor, TypeRef, Variant};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawSchema {
    main_module: String,
    #[serde(default)]
    types: Vec<RawType>,
    modules: Vec<RawModule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawMeta {
    Enum,
    Object,
    Union,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawType {
    name: String,
    meta_type: RawMeta,
    #[serde(default)]
    members: Vec<RawMember>,
    #[serde(default)]
    variants: Vec<RawVariant>,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default, rename = "if")]
    ifcond: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMember {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    optional: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVariant {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModule {
    name: String,
    #[serde(default)]
    commands: Vec<RawCommand>,
}

/// Command arguments: a named type or an inline member list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArgs {
    Named(String),
    Inline(Vec<RawMember>),
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawCommand {
    name: String,
    #[serde(default)]
    data: Option<RawArgs>,
    #[serde(default)]
    boxed: bool,
    #[serde(default)]
    returns: Option<String>,
    #[serde(default = "default_true", rename = "gen")]
    generate: bool,
    #[serde(default, rename = "if")]
    ifcond: Vec<String>,
    #[serde(default = "default_true")]
    success_response: bool,
    #[serde(default)]
    allow_oob: bool,
    #[serde(default)]
    allow_preconfig: bool,
}

impl Schema {
    /// Load a schema from a JSON descriptor document.
    ///
    /// ## Errors
    ///
    /// Returns [`SchemaError`] when the document is malformed, references an undefined type, lists the main
    /// module anywhere but first, or defines a type, module or command twice.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn from_json(source: &str) -> Result<Schema, SchemaError> {
        let raw: RawSchema = serde_json::from_str(source)?;
        if let Some(position) = raw.modules.iter().position(|m| m.name == raw.main_module) {
            if position > 0 {
                return Err(SchemaError::MainModuleNotFirst {
                    module: raw.main_module,
                    position,
                });
            }
        }
        let mut resolver = Resolver::new(&raw.types)?;
        resolver.build_named()?;

        let mut modules = Vec::with_capacity(raw.modules.len());
        for module in &raw.modules {
            let mut commands = Vec::with_capacity(module.commands.len());
            for command in &module.commands {
                commands.push(resolver.command(command)?);
            }
            modules.push((module.name.clone(), commands));
        }

        let mut builder = SchemaBuilder::new(raw.main_module.clone());
        for ty in resolver.order {
            builder = builder.ty(ty);
        }
        for (i, (name, commands)) in modules.into_iter().enumerate() {
            // the builder opens the main module itself
            if i > 0 || name != raw.main_module {
                builder = builder.module(name);
            }
            for command in commands {
                builder = builder.command(command);
            }
        }
        let schema = builder.build()?;
        tracing::debug!(
            modules = schema.modules().len(),
            commands = schema.command_count(),
            "loaded schema"
        );
        Ok(schema)
    }
}

struct Resolver<'a> {
    raw: HashMap<&'a str, &'a RawType>,
    declared: Vec<&'a RawType>,
    named: HashMap<String, Rc<TypeDescriptor>>,
    order: Vec<Rc<TypeDescriptor>>,
}

impl<'a> Resolver<'a> {
    fn new(types: &'a [RawType]) -> Result<Self, SchemaError> {
        let mut raw = HashMap::new();
        for ty in types {
            if ty.name.is_empty() {
                return Err(SchemaError::EmptyName {
                    context: "type table".to_string(),
                });
            }
            if builtins::from_str(&ty.name).is_some() {
                return Err(SchemaError::BuiltinRedefined { name: ty.name.clone() });
            }
            if raw.insert(ty.name.as_str(), ty).is_some() {
                return Err(SchemaError::DuplicateType { name: ty.name.clone() });
            }
        }
        Ok(Self {
            raw,
            declared: types.iter().collect(),
            named: HashMap::new(),
            order: Vec::new(),
        })
    }

    fn type_ref(&self, name: &str, referenced_by: &str) -> Result<TypeRef, SchemaError> {
        if let Some(inner) = name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
            if inner.starts_with('[') {
                return Err(SchemaError::NestedArray {
                    name: name.to_string(),
                    referenced_by: referenced_by.to_string(),
                });
            }
            return Ok(TypeRef::array(self.type_ref(inner, referenced_by)?));
        }
        if let Some(id) = builtins::from_str(name) {
            return Ok(TypeRef::builtin(id));
        }
        match self.raw.get(name) {
            Some(raw) => {
                let kind = match raw.meta_type {
                    RawMeta::Enum => RefKind::Enum,
                    RawMeta::Object => RefKind::Object,
                    RawMeta::Union => RefKind::Union,
                };
                Ok(TypeRef::named(name, kind))
            }
            None => Err(SchemaError::UnknownType {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            }),
        }
    }

    fn members(&self, raw: &[RawMember], owner: &str) -> Result<Vec<Member>, SchemaError> {
        raw.iter()
            .map(|m| {
                if m.name.is_empty() {
                    return Err(SchemaError::EmptyName {
                        context: format!("members of '{owner}'"),
                    });
                }
                Ok(Member {
                    name: m.name.clone(),
                    optional: m.optional,
                    ty: self.type_ref(&m.ty, owner)?,
                })
            })
            .collect()
    }

    /// Build every declared type in declaration order.
    fn build_named(&mut self) -> Result<(), SchemaError> {
        for raw in self.declared.clone() {
            let ifcond = IfCond::new(raw.ifcond.iter().cloned());
            let descriptor = match raw.meta_type {
                RawMeta::Enum => TypeDescriptor::enumeration(&raw.name, raw.values.iter().cloned()),
                RawMeta::Object => TypeDescriptor::object(&raw.name, self.members(&raw.members, &raw.name)?),
                RawMeta::Union => {
                    let mut variants = Vec::with_capacity(raw.variants.len());
                    for v in &raw.variants {
                        let ty = self.type_ref(&v.ty, &raw.name)?;
                        if *ty.kind() != RefKind::Object {
                            return Err(SchemaError::UnionBranch {
                                union: raw.name.clone(),
                                branch: v.name.clone(),
                                found: v.ty.clone(),
                            });
                        }
                        variants.push(Variant {
                            name: v.name.clone(),
                            ty,
                        });
                    }
                    TypeDescriptor::union(&raw.name, self.members(&raw.members, &raw.name)?, variants)
                }
            };
            self.record(Rc::new(descriptor.with_ifcond(ifcond)));
        }
        Ok(())
    }

    fn record(&mut self, ty: Rc<TypeDescriptor>) {
        self.named.insert(ty.name().to_string(), Rc::clone(&ty));
        self.order.push(ty);
    }

    fn descriptor(&mut self, name: &str, referenced_by: &str) -> Result<Rc<TypeDescriptor>, SchemaError> {
        // validates the reference, including array nesting
        let type_ref = self.type_ref(name, referenced_by)?;
        if let Some(ty) = self.named.get(type_ref.name()) {
            return Ok(Rc::clone(ty));
        }
        let ty = match type_ref.kind() {
            RefKind::Builtin(id) => Rc::new(TypeDescriptor::builtin(*id)),
            RefKind::Array(element) => {
                let element = self.descriptor(element.name(), referenced_by)?;
                Rc::new(TypeDescriptor::array(&element))
            }
            // declared types were all built up front
            _ => {
                return Err(SchemaError::UnknownType {
                    name: name.to_string(),
                    referenced_by: referenced_by.to_string(),
                });
            }
        };
        self.record(Rc::clone(&ty));
        Ok(ty)
    }

    fn command(&mut self, raw: &RawCommand) -> Result<CommandDescriptor, SchemaError> {
        let ifcond = IfCond::new(raw.ifcond.iter().cloned());
        let mut command = CommandDescriptor::new(&raw.name).with_ifcond(ifcond.clone());
        command.boxed = raw.boxed;
        command.generate = raw.generate;
        command.success_response = raw.success_response;
        command.allow_oob = raw.allow_oob;
        command.allow_preconfig = raw.allow_preconfig;

        command.arg_type = match &raw.data {
            None => None,
            Some(RawArgs::Named(name)) => Some(self.descriptor(name, &raw.name)?),
            Some(RawArgs::Inline(members)) => {
                let implicit = format!("q_obj_{}-arg", raw.name);
                let members = self.members(members, &raw.name)?;
                let ty = Rc::new(TypeDescriptor::object(&implicit, members).with_ifcond(ifcond));
                if self.named.contains_key(&implicit) {
                    return Err(SchemaError::DuplicateType { name: implicit });
                }
                self.record(Rc::clone(&ty));
                Some(ty)
            }
        };
        command.ret_type = match &raw.returns {
            None => None,
            Some(name) => Some(self.descriptor(name, &raw.name)?),
        };
        Ok(command)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "main-module": "schema.json",
        "types": [
            { "name": "StatusInfo", "meta-type": "object", "if": ["defined(CONFIG_STATUS)"],
              "members": [ { "name": "running", "type": "bool" },
                           { "name": "child", "type": "StatusInfo", "optional": true } ] },
            { "name": "RunState", "meta-type": "enum", "values": ["running", "paused"] }
        ],
        "modules": [
            { "name": "schema.json", "commands": [
                { "name": "ping" },
                { "name": "get-status", "returns": "StatusInfo" },
                { "name": "list-status", "returns": "[StatusInfo]" },
                { "name": "set-label", "data": [ { "name": "label", "type": "str", "optional": true } ],
                  "if": ["defined(CONFIG_LABEL)"] }
            ] },
            { "name": "qapi/misc.json", "commands": [
                { "name": "quit", "gen": false, "allow-oob": true }
            ] }
        ]
    }"#;

    #[test]
    fn test_loads_modules_in_order() {
        let schema = Schema::from_json(DOC).unwrap();
        assert_eq!(schema.main_module(), "schema.json");
        let names: Vec<_> = schema.modules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["schema.json", "qapi/misc.json"]);
        let commands: Vec<_> = schema.modules()[0].commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(commands, vec!["ping", "get-status", "list-status", "set-label"]);
    }

    #[test]
    fn test_recursive_member_resolves() {
        let schema = Schema::from_json(DOC).unwrap();
        let status = schema.lookup_type("StatusInfo").unwrap();
        assert_eq!(status.members()[1].ty.c_type(), "StatusInfo *");
        assert!(status.members()[1].optional);
    }

    #[test]
    fn test_array_return_shares_element_condition() {
        let schema = Schema::from_json(DOC).unwrap();
        let list = &schema.modules()[0].commands[2];
        let ret = list.ret_type.as_ref().unwrap();
        assert_eq!(ret.c_type(), "StatusInfoList *");
        assert_eq!(ret.ifcond(), &IfCond::new(["defined(CONFIG_STATUS)"]));
    }

    #[test]
    fn test_inline_arguments_become_implicit_type() {
        let schema = Schema::from_json(DOC).unwrap();
        let set_label = &schema.modules()[0].commands[3];
        let args = set_label.arg_type.as_ref().unwrap();
        assert_eq!(args.name(), "q_obj_set-label-arg");
        assert_eq!(args.symbol_name(), "q_obj_set_label_arg");
        assert_eq!(args.ifcond(), &set_label.ifcond);
    }

    #[test]
    fn test_flags_pass_through() {
        let schema = Schema::from_json(DOC).unwrap();
        let quit = &schema.modules()[1].commands[0];
        assert!(!quit.generate);
        assert!(quit.allow_oob);
        assert!(quit.success_response);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let doc = r#"{ "main-module": "m.json",
            "modules": [ { "name": "m.json", "commands": [ { "name": "x", "returns": "Missing" } ] } ] }"#;
        let err = Schema::from_json(doc).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref name, ref referenced_by }
            if name == "Missing" && referenced_by == "x"));
    }

    #[test]
    fn test_nested_array_rejected() {
        let doc = r#"{ "main-module": "m.json",
            "modules": [ { "name": "m.json", "commands": [ { "name": "x", "returns": "[[str]]" } ] } ] }"#;
        assert!(matches!(Schema::from_json(doc).unwrap_err(), SchemaError::NestedArray { .. }));
    }

    #[test]
    fn test_builtin_redefinition_rejected() {
        let doc = r#"{ "main-module": "m.json",
            "types": [ { "name": "str", "meta-type": "object" } ],
            "modules": [] }"#;
        assert!(matches!(Schema::from_json(doc).unwrap_err(), SchemaError::BuiltinRedefined { .. }));
    }

    #[test]
    fn test_union_branch_must_be_object() {
        let doc = r#"{ "main-module": "m.json",
            "types": [ { "name": "U", "meta-type": "union",
                         "variants": [ { "name": "a", "type": "int" } ] } ],
            "modules": [] }"#;
        assert!(matches!(Schema::from_json(doc).unwrap_err(), SchemaError::UnionBranch { .. }));
    }

    #[test]
    fn test_main_module_listed_late_rejected() {
        let doc = r#"{ "main-module": "schema.json",
            "modules": [ { "name": "qapi/block.json", "commands": [] },
                         { "name": "schema.json", "commands": [ { "name": "ping" } ] } ] }"#;
        let err = Schema::from_json(doc).unwrap_err();
        assert!(matches!(err, SchemaError::MainModuleNotFirst { ref module, position: 1 } if module == "schema.json"));
    }

    #[test]
    fn test_main_module_may_be_omitted() {
        let doc = r#"{ "main-module": "schema.json",
            "modules": [ { "name": "qapi/block.json", "commands": [ { "name": "ping" } ] } ] }"#;
        let schema = Schema::from_json(doc).unwrap();
        let names: Vec<_> = schema.modules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["schema.json", "qapi/block.json"]);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(Schema::from_json("{").unwrap_err(), SchemaError::Json(_)));
    }
}
