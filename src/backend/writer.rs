//! Unit writers - where finished emission units go
//!
//! Writes `<basename>.h` (declarations stream) and `<basename>.c` (definitions stream). [`FsWriter`] leaves a file
//! untouched when its contents did not change, so build systems keyed on modification time do not rebuild.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::errors::GenerationError;

/// Sink for closed units.
pub trait UnitWriter {
    /// Persist one unit under `basename`.
    fn flush(&mut self, header: &str, body: &str, basename: &str) -> Result<(), GenerationError>;
}

impl<W: UnitWriter + ?Sized> UnitWriter for &mut W {
    fn flush(&mut self, header: &str, body: &str, basename: &str) -> Result<(), GenerationError> {
        (**self).flush(header, body, basename)
    }
}

/// Writes units as files into one output directory.
#[derive(Debug)]
pub struct FsWriter {
    /// Output directory for the generated units
    output_dir: PathBuf,
    written: Vec<PathBuf>,
    unchanged: Vec<PathBuf>,
}

impl FsWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            written: Vec::new(),
            unchanged: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Files whose contents were (re)written.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Files left in place because their contents already matched.
    pub fn unchanged(&self) -> &[PathBuf] {
        &self.unchanged
    }

    fn write_if_changed(&mut self, path: PathBuf, contents: &str) -> io::Result<()> {
        match fs::read_to_string(&path) {
            Ok(existing) if existing == contents => {
                tracing::trace!(path = %path.display(), "unchanged");
                self.unchanged.push(path);
                return Ok(());
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote");
        self.written.push(path);
        Ok(())
    }
}

impl UnitWriter for FsWriter {
    fn flush(&mut self, header: &str, body: &str, basename: &str) -> Result<(), GenerationError> {
        let wrap = |source: io::Error| GenerationError::Write {
            basename: basename.to_string(),
            source,
        };
        fs::create_dir_all(&self.output_dir).map_err(wrap)?;
        let h = self.output_dir.join(format!("{}.h", basename));
        let c = self.output_dir.join(format!("{}.c", basename));
        self.write_if_changed(h, header).map_err(wrap)?;
        self.write_if_changed(c, body).map_err(wrap)?;
        Ok(())
    }
}

/// One unit as handed to a writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub basename: String,
    pub header: String,
    pub body: String,
}

/// Keeps units in memory, in flush order.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    units: Vec<GeneratedUnit>,
}

impl MemoryWriter {
    pub fn units(&self) -> &[GeneratedUnit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<GeneratedUnit> {
        self.units
    }

    pub fn unit(&self, basename: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.basename == basename)
    }
}

impl UnitWriter for MemoryWriter {
    fn flush(&mut self, header: &str, body: &str, basename: &str) -> Result<(), GenerationError> {
        self.units.push(GeneratedUnit {
            basename: basename.to_string(),
            header: header.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_writer_keeps_order() {
        let mut writer = MemoryWriter::default();
        writer.flush("h1", "c1", "qapi-commands").unwrap();
        writer.flush("h2", "c2", "qapi-commands-block").unwrap();
        let names: Vec<_> = writer.units().iter().map(|u| u.basename.as_str()).collect();
        assert_eq!(names, ["qapi-commands", "qapi-commands-block"]);
        assert_eq!(writer.unit("qapi-commands-block").unwrap().body, "c2");
    }

    #[test]
    fn test_borrowed_writer_forwards() {
        fn flush_once<W: UnitWriter>(mut writer: W) {
            writer.flush("h", "c", "x").unwrap();
        }
        let mut writer = MemoryWriter::default();
        flush_once(&mut writer);
        assert_eq!(writer.units().len(), 1);
    }
}
