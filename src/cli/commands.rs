//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use qapigen_schema::Schema;

use crate::backend::unit::UnitNames;
use crate::backend::{FsWriter, GeneratorConfig, MemoryWriter, gen_commands};

use super::{CliError, CliResult, ExitCode};

/// Maximum schema document size (10 MB).
///
/// Descriptor documents are generated by the schema frontend; anything larger is almost certainly the wrong file.
const MAX_SCHEMA_SIZE: u64 = 10 * 1024 * 1024;

/// Validate the output directory to prevent path traversal attacks.
///
/// This function ensures:
/// - The path doesn't contain `..` components
/// - Absolute paths are allowed but logged
pub fn validate_output_dir(out_dir: &Path) -> CliResult<()> {
    for component in out_dir.components() {
        if let std::path::Component::ParentDir = component {
            return Err(CliError::failure(format!(
                "Output directory '{}' contains path traversal (..)",
                out_dir.display()
            )));
        }
    }

    if out_dir.is_absolute() {
        tracing::warn!(
            "Using absolute output path: {}. Consider using a relative path.",
            out_dir.display()
        );
    }

    Ok(())
}

/// Read a schema document.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SCHEMA_SIZE` (10 MB)
pub fn read_schema_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SCHEMA_SIZE {
        return Err(CliError::failure(format!(
            "Schema file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SCHEMA_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Read and resolve a schema document.
pub fn load_schema(path: &Path) -> CliResult<Schema> {
    let source = read_schema_source(path)?;
    Schema::from_json(&source).map_err(CliError::diagnostic)
}

/// Generate every command unit of `schema_path` into `output_dir`.
pub fn generate(schema_path: &Path, output_dir: &Path, config: &GeneratorConfig) -> CliResult<ExitCode> {
    validate_output_dir(output_dir)?;
    let schema = load_schema(schema_path)?;

    let writer = gen_commands(&schema, config, FsWriter::new(output_dir)).map_err(CliError::diagnostic)?;

    tracing::info!(
        output_dir = %writer.output_dir().display(),
        written = writer.written().len(),
        unchanged = writer.unchanged().len(),
        "generated command units"
    );
    Ok(ExitCode::SUCCESS)
}

/// Print generated units to stdout, optionally only the one for `module`.
pub fn emit(schema_path: &Path, module: Option<&str>, config: &GeneratorConfig) -> CliResult<ExitCode> {
    let schema = load_schema(schema_path)?;

    let wanted = match module {
        Some(name) => {
            if !schema.modules().iter().any(|m| m.name == name) {
                return Err(CliError::failure(format!(
                    "Module '{}' not found in '{}'",
                    name,
                    schema_path.display()
                )));
            }
            Some(UnitNames::new(&config.prefix, name, schema.main_module()).commands)
        }
        None => None,
    };

    let writer = gen_commands(&schema, config, MemoryWriter::default()).map_err(CliError::diagnostic)?;
    for unit in writer.units() {
        if wanted.as_deref().is_some_and(|w| w != unit.basename) {
            continue;
        }
        println!("/* {}.h */", unit.basename);
        print!("{}", unit.header);
        println!();
        println!("/* {}.c */", unit.basename);
        print!("{}", unit.body);
    }
    Ok(ExitCode::SUCCESS)
}
