//! The schema walker.
//!
//! A [`Schema`] is an ordered list of modules, each an ordered list of commands. [`Schema::visit`] replays them to a
//! [`SchemaVisitor`] in declaration order; generators never see the schema any other way.

use std::collections::HashSet;
use std::rc::Rc;

use crate::command::CommandDescriptor;
use crate::error::SchemaError;
use crate::types::TypeDescriptor;

/// Receiver of the ordered descriptor stream.
pub trait SchemaVisitor {
    type Error;

    /// Called once before the first module.
    fn visit_begin(&mut self, _main_module: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when the walk enters a module; every command until the next call belongs to it.
    fn visit_module(&mut self, name: &str) -> Result<(), Self::Error>;

    fn visit_command(&mut self, command: &CommandDescriptor) -> Result<(), Self::Error>;

    /// Called once after the last command of the last module.
    fn visit_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// One schema module (one source file of the schema).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub commands: Vec<CommandDescriptor>,
}

/// A resolved schema.
#[derive(Debug, Clone)]
pub struct Schema {
    main_module: String,
    modules: Vec<Module>,
    types: Vec<Rc<TypeDescriptor>>,
}

impl Schema {
    pub fn main_module(&self) -> &str {
        &self.main_module
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn lookup_type(&self, name: &str) -> Option<&Rc<TypeDescriptor>> {
        self.types.iter().find(|ty| ty.name() == name)
    }

    pub fn command_count(&self) -> usize {
        self.modules.iter().map(|m| m.commands.len()).sum()
    }

    /// Replay the schema to `visitor` in declaration order.
    pub fn visit<V: SchemaVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_begin(&self.main_module)?;
        for module in &self.modules {
            visitor.visit_module(&module.name)?;
            for command in &module.commands {
                visitor.visit_command(command)?;
            }
        }
        visitor.visit_end()
    }
}

/// Incremental construction of a [`Schema`].
///
/// ## Examples
/// ```rust
/// use qapigen_schema::{CommandDescriptor, SchemaBuilder};
///
/// let schema = SchemaBuilder::new("schema.json")
///     .command(CommandDescriptor::new("ping"))
///     .module("qapi/block.json")
///     .command(CommandDescriptor::new("block-resize"))
///     .build()
///     .unwrap();
/// assert_eq!(schema.modules().len(), 2);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    main_module: String,
    modules: Vec<Module>,
    types: Vec<Rc<TypeDescriptor>>,
}

impl SchemaBuilder {
    /// Start a schema whose first module is `main_module`.
    pub fn new(main_module: impl Into<String>) -> Self {
        let main_module = main_module.into();
        Self {
            modules: vec![Module {
                name: main_module.clone(),
                commands: Vec::new(),
            }],
            main_module,
            types: Vec::new(),
        }
    }

    /// Start a new module; following commands belong to it.
    pub fn module(mut self, name: impl Into<String>) -> Self {
        self.modules.push(Module {
            name: name.into(),
            commands: Vec::new(),
        });
        self
    }

    /// Register a type so it can be found through [`Schema::lookup_type`].
    pub fn ty(mut self, ty: Rc<TypeDescriptor>) -> Self {
        self.types.push(ty);
        self
    }

    /// Append a command to the current module.
    pub fn command(mut self, command: CommandDescriptor) -> Self {
        if let Some(module) = self.modules.last_mut() {
            module.commands.push(command);
        }
        self
    }

    /// Validate names and finish the schema.
    ///
    /// ## Errors
    ///
    /// Returns [`SchemaError`] on empty names, duplicated modules, duplicated commands or duplicated types.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut modules = HashSet::new();
        let mut commands = HashSet::new();
        for module in &self.modules {
            if module.name.is_empty() {
                return Err(SchemaError::EmptyName {
                    context: "module list".to_string(),
                });
            }
            if !modules.insert(module.name.as_str()) {
                return Err(SchemaError::DuplicateModule {
                    module: module.name.clone(),
                });
            }
            for command in &module.commands {
                if command.name.is_empty() {
                    return Err(SchemaError::EmptyName {
                        context: format!("module '{}'", module.name),
                    });
                }
                if !commands.insert(command.name.as_str()) {
                    return Err(SchemaError::DuplicateCommand {
                        name: command.name.clone(),
                    });
                }
            }
        }

        let mut types = HashSet::new();
        for ty in &self.types {
            if !types.insert(ty.name()) {
                return Err(SchemaError::DuplicateType {
                    name: ty.name().to_string(),
                });
            }
        }

        Ok(Schema {
            main_module: self.main_module,
            modules: self.modules,
            types: self.types,
        })
    }
}
