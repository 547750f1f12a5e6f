//! Emission units and the coordinator that fills them.
//!
//! One [`EmissionUnit`] collects the declarations stream (`.h`) and the definitions stream (`.c`) for one schema
//! module. The [`CommandGenerator`] walks the command stream, decides which fragments each command needs, wraps them
//! in their guards and appends them in schema order.
//!
//! ## State machine
//!
//! ```text
//! Idle --open_unit--> UnitOpen --visit_command--> UnitOpen --close_unit--> UnitClosed --open_unit--> UnitOpen ...
//! ```
//!
//! The set of decoders already emitted lives inside the unit and is dropped with it, so every module gets its own
//! decoders and no state crosses a module boundary.

use std::collections::HashSet;

use qapigen_core::lang::runtime::RUNTIME_HEADERS;
use qapigen_core::module_basename;
use qapigen_core::naming::include_guard;
use qapigen_schema::{CommandDescriptor, IfCond, Schema, SchemaVisitor, TypeDescriptor};

use super::c_emitter::CEmitter;
use super::commands::{gen_command_decl, gen_marshal_rpc, gen_rpc_call};
use super::config::{CondMismatchPolicy, GeneratorConfig};
use super::errors::GenerationError;
use super::ifcond::wrap;
use super::writer::UnitWriter;

const COMMANDS_UNIT: &str = "qapi-commands";
const TYPES_UNIT: &str = "qapi-types";
const VISIT_UNIT: &str = "qapi-visit";
const BLURB: &str = "Schema-defined QAPI/QMP commands";

/// Basenames of a command unit and the sibling units it includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNames {
    pub commands: String,
    pub types: String,
    pub visit: String,
}

impl UnitNames {
    pub fn new(prefix: &str, module: &str, main_module: &str) -> Self {
        Self {
            commands: module_basename(prefix, COMMANDS_UNIT, module, main_module),
            types: module_basename(prefix, TYPES_UNIT, module, main_module),
            visit: module_basename(prefix, VISIT_UNIT, module, main_module),
        }
    }
}

/// Generated text for one module.
#[derive(Debug)]
pub struct EmissionUnit {
    module: String,
    names: UnitNames,
    header: String,
    body: String,
    /// Symbol names of the return types whose decoder is already in `body`.
    visited_ret_types: HashSet<String>,
    commands: usize,
}

impl EmissionUnit {
    /// Start a unit with its preamble in both streams.
    pub fn open(module: &str, names: UnitNames) -> Self {
        Self {
            module: module.to_string(),
            header: header_preamble(&names),
            body: body_preamble(&names),
            names,
            visited_ret_types: HashSet::new(),
            commands: 0,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn basename(&self) -> &str {
        &self.names.commands
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn has_decoder(&self, ret_type: &TypeDescriptor) -> bool {
        self.visited_ret_types.contains(&ret_type.symbol_name())
    }

    pub fn decoder_count(&self) -> usize {
        self.visited_ret_types.len()
    }

    /// Number of commands emitted into this unit.
    pub fn command_count(&self) -> usize {
        self.commands
    }

    /// Append the decoder for `ret_type` unless the unit already has it.
    ///
    /// The decoder is wrapped in the type's own guard, whichever command asked for it.
    fn add_decoder(&mut self, ret_type: &TypeDescriptor) -> bool {
        if !self.visited_ret_types.insert(ret_type.symbol_name()) {
            return false;
        }
        self.body.push_str(&wrap(ret_type.ifcond(), &gen_marshal_rpc(ret_type)));
        true
    }

    fn add_command(&mut self, ifcond: &IfCond, decl: &str, stub: &str) {
        self.header.push_str(&wrap(ifcond, decl));
        self.body.push_str(&wrap(ifcond, stub));
        self.commands += 1;
    }

    /// Terminate both streams; the unit accepts no more fragments.
    fn finish(mut self) -> (String, String, String) {
        let guard = include_guard(&self.names.commands);
        self.header.push('\n');
        self.header.push_str(&format!("#endif /* {} */\n", guard));
        (self.names.commands, self.header, self.body)
    }
}

fn file_preamble(e: &mut CEmitter) {
    e.comment("AUTOMATICALLY GENERATED, DO NOT MODIFY");
    e.blank_line();
    e.block_comment(&[
        BLURB,
        "",
        "Client-side marshallers: every entry point serializes its arguments,",
        "performs the remote call and decodes the result.",
    ]);
    e.blank_line();
}

fn header_preamble(names: &UnitNames) -> String {
    let guard = include_guard(&names.commands);
    let mut e = CEmitter::new();
    file_preamble(&mut e);
    e.directive(&format!("ifndef {}", guard));
    e.directive(&format!("define {}", guard));
    e.blank_line();
    e.include(&format!("{}.h", names.types));
    e.blank_line();
    e.finish()
}

fn body_preamble(names: &UnitNames) -> String {
    let mut e = CEmitter::new();
    file_preamble(&mut e);
    for header in RUNTIME_HEADERS {
        e.include(header);
    }
    e.include(&format!("{}.h", names.visit));
    e.include(&format!("{}.h", names.commands));
    e.finish()
}

#[derive(Debug)]
enum CoordinatorState {
    Idle,
    UnitOpen(EmissionUnit),
    UnitClosed,
}

/// Walks the command stream and fills one [`EmissionUnit`] per module.
#[derive(Debug)]
pub struct CommandGenerator<W: UnitWriter> {
    config: GeneratorConfig,
    /// The module whose unit carries no module suffix.
    main_module: String,
    /// Basenames of every unit opened so far.
    opened: HashSet<String>,
    state: CoordinatorState,
    writer: W,
}

impl<W: UnitWriter> CommandGenerator<W> {
    pub fn new(config: GeneratorConfig, main_module: impl Into<String>, writer: W) -> Self {
        Self {
            config,
            main_module: main_module.into(),
            opened: HashSet::new(),
            state: CoordinatorState::Idle,
            writer,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// The unit currently being filled, if any.
    pub fn current_unit(&self) -> Option<&EmissionUnit> {
        match &self.state {
            CoordinatorState::UnitOpen(unit) => Some(unit),
            _ => None,
        }
    }

    /// Whether a unit was closed and no new one opened since.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, CoordinatorState::UnitClosed)
    }

    /// Open the unit for `module`, resetting buffers and the decoder set.
    ///
    /// ## Errors
    ///
    /// Returns [`GenerationError::UnitAlreadyOpen`] if the previous unit was not closed, or
    /// [`GenerationError::DuplicateUnit`] if `module` maps to the basename of a unit already opened.
    pub fn open_unit(&mut self, module: &str) -> Result<(), GenerationError> {
        if let CoordinatorState::UnitOpen(unit) = &self.state {
            return Err(GenerationError::UnitAlreadyOpen {
                module: module.to_string(),
                open: unit.module().to_string(),
            });
        }
        let names = UnitNames::new(&self.config.prefix, module, &self.main_module);
        if !self.opened.insert(names.commands.clone()) {
            return Err(GenerationError::DuplicateUnit {
                module: module.to_string(),
                basename: names.commands,
            });
        }
        tracing::debug!(module, basename = %names.commands, "opening unit");
        self.state = CoordinatorState::UnitOpen(EmissionUnit::open(module, names));
        Ok(())
    }

    /// Emit every fragment `command` needs into the open unit.
    ///
    /// ## Errors
    ///
    /// Returns [`GenerationError`] when no unit is open, when the descriptor is inconsistent, or when a guard
    /// mismatch is found under [`CondMismatchPolicy::Deny`].
    pub fn visit_command(&mut self, command: &CommandDescriptor) -> Result<(), GenerationError> {
        let CoordinatorState::UnitOpen(unit) = &self.state else {
            return Err(GenerationError::NoOpenUnit {
                command: command.name.clone(),
            });
        };
        if command.name.is_empty() {
            return Err(GenerationError::EmptyName {
                module: unit.module().to_string(),
            });
        }
        if !command.generate {
            tracing::trace!(command = %command.name, "skipping command with gen disabled");
            return Ok(());
        }

        check_conditions(command, self.config.cond_mismatch)?;
        let decl = gen_command_decl(
            &command.name,
            command.arg_type.as_deref(),
            command.boxed,
            command.ret_type.as_deref(),
            true,
        )?;
        let stub = gen_rpc_call(command)?;

        let CoordinatorState::UnitOpen(unit) = &mut self.state else {
            return Err(GenerationError::UnitNotOpen);
        };
        if let Some(ret_type) = command.ret_type.as_deref() {
            if !unit.add_decoder(ret_type) {
                tracing::trace!(command = %command.name, ret = %ret_type.name(), "decoder already emitted");
            }
        }
        unit.add_command(&command.ifcond, &decl, &stub);
        Ok(())
    }

    /// Finish the open unit and hand both streams to the writer.
    ///
    /// ## Errors
    ///
    /// Returns [`GenerationError::UnitNotOpen`] when there is nothing to close, or the writer's error.
    pub fn close_unit(&mut self) -> Result<(), GenerationError> {
        let unit = match std::mem::replace(&mut self.state, CoordinatorState::UnitClosed) {
            CoordinatorState::UnitOpen(unit) => unit,
            other => {
                self.state = other;
                return Err(GenerationError::UnitNotOpen);
            }
        };
        tracing::debug!(
            module = unit.module(),
            commands = unit.command_count(),
            decoders = unit.decoder_count(),
            "closing unit"
        );
        let (basename, header, body) = unit.finish();
        self.writer.flush(&header, &body, &basename)
    }
}

/// Compare the command's guard with the guards of the types its fragments reference.
fn check_conditions(command: &CommandDescriptor, policy: CondMismatchPolicy) -> Result<(), GenerationError> {
    for ty in [command.arg_type.as_deref(), command.ret_type.as_deref()].into_iter().flatten() {
        let missing = command.ifcond.missing(ty.ifcond());
        if missing.is_empty() {
            continue;
        }
        let missing = IfCond::new(missing).to_string();
        match policy {
            CondMismatchPolicy::Warn => tracing::warn!(
                command = %command.name,
                ty = %ty.name(),
                %missing,
                "command guard does not imply the guard of a referenced type"
            ),
            CondMismatchPolicy::Deny => {
                return Err(GenerationError::ConditionMismatch {
                    command: command.name.clone(),
                    ty: ty.name().to_string(),
                    missing,
                });
            }
        }
    }
    Ok(())
}

impl<W: UnitWriter> SchemaVisitor for CommandGenerator<W> {
    type Error = GenerationError;

    fn visit_begin(&mut self, main_module: &str) -> Result<(), GenerationError> {
        self.main_module = main_module.to_string();
        Ok(())
    }

    fn visit_module(&mut self, name: &str) -> Result<(), GenerationError> {
        if self.current_unit().is_some() {
            self.close_unit()?;
        }
        self.open_unit(name)
    }

    fn visit_command(&mut self, command: &CommandDescriptor) -> Result<(), GenerationError> {
        CommandGenerator::visit_command(self, command)
    }

    fn visit_end(&mut self) -> Result<(), GenerationError> {
        if self.current_unit().is_some() {
            self.close_unit()?;
        }
        Ok(())
    }
}

/// Generate the command units of every module of `schema`.
///
/// ## Errors
///
/// Returns the first [`GenerationError`]; units already flushed stay flushed, the failing unit is dropped.
#[tracing::instrument(skip_all, fields(modules = schema.modules().len(), commands = schema.command_count()))]
pub fn gen_commands<W: UnitWriter>(
    schema: &Schema,
    config: &GeneratorConfig,
    writer: W,
) -> Result<W, GenerationError> {
    let mut generator = CommandGenerator::new(config.clone(), schema.main_module(), writer);
    schema.visit(&mut generator)?;
    Ok(generator.into_writer())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::backend::writer::MemoryWriter;

    fn generator() -> CommandGenerator<MemoryWriter> {
        CommandGenerator::new(GeneratorConfig::new(), "schema.json", MemoryWriter::default())
    }

    #[test]
    fn test_command_outside_unit_is_rejected() {
        let mut generator = generator();
        let err = generator.visit_command(&CommandDescriptor::new("ping")).unwrap_err();
        assert!(matches!(err, GenerationError::NoOpenUnit { ref command } if command == "ping"));
    }

    #[test]
    fn test_double_open_is_rejected() {
        let mut generator = generator();
        generator.open_unit("schema.json").unwrap();
        assert!(matches!(
            generator.open_unit("other.json"),
            Err(GenerationError::UnitAlreadyOpen { .. })
        ));
    }

    #[test]
    fn test_close_without_open_is_rejected() {
        let mut generator = generator();
        assert!(matches!(generator.close_unit(), Err(GenerationError::UnitNotOpen)));
        assert!(!generator.is_closed());
    }

    #[test]
    fn test_preamble_written_on_open() {
        let mut generator = generator();
        generator.open_unit("schema.json").unwrap();
        let unit = generator.current_unit().unwrap();
        assert!(unit.header().contains("#ifndef QAPI_COMMANDS_H\n#define QAPI_COMMANDS_H\n"));
        assert!(unit.header().contains("#include \"qapi-types.h\"\n"));
        assert!(unit.body().contains("#include \"qapi-visit.h\"\n#include \"qapi-commands.h\"\n"));
        assert_eq!(unit.command_count(), 0);
    }

    #[test]
    fn test_decoder_set_resets_between_units() {
        let ret = Rc::new(TypeDescriptor::object("StatusInfo", vec![]));
        let mut generator = generator();
        generator.open_unit("schema.json").unwrap();
        generator
            .visit_command(&CommandDescriptor::new("a").returning(Rc::clone(&ret)))
            .unwrap();
        generator.close_unit().unwrap();
        assert!(generator.is_closed());

        generator.open_unit("qapi/other.json").unwrap();
        assert!(!generator.current_unit().unwrap().has_decoder(&ret));
        generator.visit_command(&CommandDescriptor::new("b").returning(ret)).unwrap();
        generator.close_unit().unwrap();

        let writer = generator.into_writer();
        assert_eq!(writer.units().len(), 2);
        assert_eq!(writer.units()[1].basename, "qapi-commands-other");
        for unit in writer.units() {
            assert_eq!(unit.body.matches("static StatusInfo *qmp_marshal_rpc_StatusInfo(").count(), 1);
        }
    }

    #[test]
    fn test_units_named_against_constructor_main_module() {
        let mut generator = generator();
        for module in ["qapi/block.json", "schema.json"] {
            generator.open_unit(module).unwrap();
            generator.close_unit().unwrap();
        }
        let names: Vec<_> = generator.into_writer().into_units().into_iter().map(|u| u.basename).collect();
        assert_eq!(names, ["qapi-commands-block", "qapi-commands"]);
    }

    #[test]
    fn test_module_with_taken_basename_is_rejected() {
        let mut generator = generator();
        generator.open_unit("qapi/block.json").unwrap();
        generator.close_unit().unwrap();
        let err = generator.open_unit("other/block.json").unwrap_err();
        assert!(matches!(err, GenerationError::DuplicateUnit { ref basename, .. }
            if basename == "qapi-commands-block"));
        assert_eq!(generator.into_writer().units().len(), 1);
    }

    #[test]
    fn test_deny_policy_rejects_uncovered_return_guard() {
        let ret = Rc::new(
            TypeDescriptor::object("StatusInfo", vec![]).with_ifcond(IfCond::new(["defined(CONFIG_STATUS)"])),
        );
        let config = GeneratorConfig::new().with_cond_mismatch(CondMismatchPolicy::Deny);
        let mut generator = CommandGenerator::new(config, "schema.json", MemoryWriter::default());
        generator.open_unit("schema.json").unwrap();
        let err = generator
            .visit_command(&CommandDescriptor::new("get-status").returning(ret))
            .unwrap_err();
        assert!(matches!(err, GenerationError::ConditionMismatch { ref missing, .. }
            if missing == "defined(CONFIG_STATUS)"));
        // nothing was appended for the rejected command
        assert_eq!(generator.current_unit().unwrap().decoder_count(), 0);
    }

    #[test]
    fn test_covered_guard_passes_deny_policy() {
        let cond = IfCond::new(["defined(CONFIG_STATUS)"]);
        let ret = Rc::new(TypeDescriptor::object("StatusInfo", vec![]).with_ifcond(cond.clone()));
        let config = GeneratorConfig::new().with_cond_mismatch(CondMismatchPolicy::Deny);
        let mut generator = CommandGenerator::new(config, "schema.json", MemoryWriter::default());
        generator.open_unit("schema.json").unwrap();
        generator
            .visit_command(&CommandDescriptor::new("get-status").returning(ret).with_ifcond(cond))
            .unwrap();
        assert_eq!(generator.current_unit().unwrap().command_count(), 1);
    }

    #[test]
    fn test_unit_names_follow_prefix_and_module() {
        let names = UnitNames::new("utm-", "qapi/block.json", "schema.json");
        assert_eq!(names.commands, "utm-qapi-commands-block");
        assert_eq!(names.types, "utm-qapi-types-block");
        assert_eq!(names.visit, "utm-qapi-visit-block");
    }
}
