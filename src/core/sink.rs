//! Destinations for generated units.
//!
//! The pipeline only hands units to a sink after the whole collection pass
//! succeeded, so a sink never sees output from a failed pass.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::core::emit::GeneratedUnit;

pub trait OutputSink {
    fn write_unit(&mut self, unit: &GeneratedUnit) -> Result<()>;
}

/// What happened to one unit in a [`DirectorySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Writes units as files into an output directory.
///
/// Files whose content is already identical are left untouched so that
/// repeated runs do not bump modification times.
pub struct DirectorySink {
    out_dir: PathBuf,
    pub written: Vec<(PathBuf, WriteOutcome)>,
}

impl DirectorySink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Number of files created or updated.
    pub fn changed_count(&self) -> usize {
        self.written
            .iter()
            .filter(|(_, outcome)| *outcome != WriteOutcome::Unchanged)
            .count()
    }
}

impl OutputSink for DirectorySink {
    fn write_unit(&mut self, unit: &GeneratedUnit) -> Result<()> {
        fs::create_dir_all(&self.out_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.out_dir.display()
            )
        })?;

        let path = self.out_dir.join(&unit.file_name);
        let outcome = match fs::read_to_string(&path) {
            Ok(existing) if existing == unit.contents => WriteOutcome::Unchanged,
            Ok(_) => WriteOutcome::Updated,
            Err(_) => WriteOutcome::Created,
        };

        if outcome != WriteOutcome::Unchanged {
            fs::write(&path, &unit.contents)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }

        self.written.push((path, outcome));
        Ok(())
    }
}

/// Compares units against the files on disk without writing anything.
pub struct CheckSink {
    out_dir: PathBuf,
    /// Files that are missing or differ from the generated content.
    pub stale: Vec<PathBuf>,
    pub checked: usize,
}

impl CheckSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            stale: Vec::new(),
            checked: 0,
        }
    }
}

impl OutputSink for CheckSink {
    fn write_unit(&mut self, unit: &GeneratedUnit) -> Result<()> {
        let path = self.out_dir.join(&unit.file_name);
        let up_to_date = fs::read_to_string(&path).is_ok_and(|existing| existing == unit.contents);
        if !up_to_date {
            self.stale.push(path);
        }
        self.checked += 1;
        Ok(())
    }
}

/// Keeps units in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub units: Vec<GeneratedUnit>,
}

impl OutputSink for MemorySink {
    fn write_unit(&mut self, unit: &GeneratedUnit) -> Result<()> {
        self.units.push(unit.clone());
        Ok(())
    }
}

/// Hand every unit to the sink, in order.
pub fn write_all<S: OutputSink + ?Sized>(sink: &mut S, units: &[GeneratedUnit]) -> Result<()> {
    for unit in units {
        sink.write_unit(unit)?;
    }
    Ok(())
}
