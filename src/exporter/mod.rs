//! YAML export of parsed collections and output-directory housekeeping.
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/deliverables.yaml          collection strategy
//! <root>/committees.yaml
//! <root>/ics.yaml
//! <root>/deliverables/<ref>.yaml    individual-files strategy
//! <root>/committees/<ref>.yaml
//! <root>/ics/<identifier>.yaml
//! ```
//!
//! The two strategies never touch each other's files.

pub mod fs;

use crate::constants::EXPORT_EXTENSION;
use crate::error::{ImporterError, Result};
use crate::logging::{default_sink, DiagnosticSink};
use crate::models::{Collection, Deliverable, ExportMap, IcsEntry, Record, TechnicalCommittee};
use crate::sanitize::sanitize_filename;
use crate::types::{ExportStrategy, RecordKind};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use fs::{FileSystem, LocalFs};

const COMPONENT: &str = "exporter";

pub struct Exporter {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Exporter {
    /// Creating an exporter does not touch the filesystem; call [`Exporter::prepare`]
    /// to lay out the directories up front.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fs: Arc::new(LocalFs),
            sink: default_sink(),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subdir_path(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.subdir())
    }

    pub fn collection_path(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.collection_file())
    }

    /// Creates `path` and any missing ancestors; an existing directory is fine.
    pub fn ensure_output_directory(&self, path: &Path) -> Result<()> {
        if self.fs.is_dir(path) {
            return Ok(());
        }
        self.fs
            .create_dir_all(path)
            .map_err(|e| ImporterError::filesystem(path, e))
    }

    /// Ensures the root and every per-kind subdirectory exist.
    pub fn prepare(&self) -> Result<()> {
        self.sink.info(
            COMPONENT,
            &format!("Ensuring output directories under {}", self.root.display()),
        );
        self.ensure_output_directory(&self.root)?;
        for kind in RecordKind::ALL {
            self.ensure_output_directory(&self.subdir_path(kind))?;
        }
        Ok(())
    }

    /// Removes the outputs of one strategy and returns how many files went away.
    ///
    /// Never removes a directory, and a second call without writes in between
    /// removes nothing.
    pub fn clean(&self, strategy: ExportStrategy) -> Result<usize> {
        self.sink.info(
            COMPONENT,
            &format!("Cleaning {} outputs under {}", strategy, self.root.display()),
        );
        let removed = match strategy {
            ExportStrategy::Collection => self.clean_collection_files()?,
            ExportStrategy::IndividualFiles => self.clean_individual_files()?,
        };
        crate::metrics::exporter::files_removed(removed);
        self.sink
            .info(COMPONENT, &format!("Removed {} files", removed));
        Ok(removed)
    }

    fn clean_collection_files(&self) -> Result<usize> {
        let mut removed = 0;
        for kind in RecordKind::ALL {
            let path = self.collection_path(kind);
            if self.fs.is_file(&path) {
                self.remove(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn clean_individual_files(&self) -> Result<usize> {
        let mut removed = 0;
        for kind in RecordKind::ALL {
            let dir = self.subdir_path(kind);
            if !self.fs.is_dir(&dir) {
                continue;
            }
            self.sink
                .info(COMPONENT, &format!("Cleaning directory: {}", dir.display()));
            let entries = self
                .fs
                .list_dir(&dir)
                .map_err(|e| ImporterError::filesystem(&dir, e))?;
            for path in entries {
                if has_export_extension(&path) && self.fs.is_file(&path) {
                    self.remove(&path)?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.fs
            .remove_file(path)
            .map_err(|e| ImporterError::filesystem(path, e))
    }

    /// Writes a collection with the given strategy and returns the number of
    /// files written. An absent or empty collection writes nothing.
    pub fn export<R: Record>(
        &self,
        collection: Option<&Collection<R>>,
        strategy: ExportStrategy,
    ) -> Result<usize> {
        let collection = match collection {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(0),
        };
        self.sink.info(
            COMPONENT,
            &format!(
                "Exporting {} {} to YAML ({})...",
                collection.len(),
                R::KIND,
                strategy
            ),
        );
        let written = match strategy {
            ExportStrategy::Collection => self.export_collection_file(collection)?,
            ExportStrategy::IndividualFiles => self.export_individual_files(collection)?,
        };
        crate::metrics::exporter::files_written(R::KIND, written);
        self.sink.info(
            COMPONENT,
            &format!("{} export complete ({} files)", R::KIND, written),
        );
        Ok(written)
    }

    pub fn export_deliverables(
        &self,
        collection: Option<&Collection<Deliverable>>,
        strategy: ExportStrategy,
    ) -> Result<usize> {
        self.export(collection, strategy)
    }

    pub fn export_technical_committees(
        &self,
        collection: Option<&Collection<TechnicalCommittee>>,
        strategy: ExportStrategy,
    ) -> Result<usize> {
        self.export(collection, strategy)
    }

    pub fn export_ics_entries(
        &self,
        collection: Option<&Collection<IcsEntry>>,
        strategy: ExportStrategy,
    ) -> Result<usize> {
        self.export(collection, strategy)
    }

    fn export_collection_file<R: Record>(&self, collection: &Collection<R>) -> Result<usize> {
        let data = collection.export_representation()?;
        self.ensure_output_directory(&self.root)?;
        let path = self.collection_path(R::KIND);
        self.write_yaml(&path, data)?;
        Ok(1)
    }

    fn export_individual_files<R: Record>(&self, collection: &Collection<R>) -> Result<usize> {
        let dir = self.subdir_path(R::KIND);
        self.ensure_output_directory(&dir)?;

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut written = 0;
        for (index, record) in collection.iter().enumerate() {
            let stem = file_stem(record);
            if let Some(previous) = seen.insert(stem.clone(), index) {
                // Last write wins
                crate::metrics::exporter::name_collision(R::KIND);
                self.sink.warn(
                    COMPONENT,
                    &format!(
                        "{} record {} overwrites record {} at {}.{}",
                        R::KIND,
                        index,
                        previous,
                        stem,
                        EXPORT_EXTENSION
                    ),
                );
            }
            let path = dir.join(format!("{}.{}", stem, EXPORT_EXTENSION));
            self.write_yaml(&path, record.export_representation()?)?;
            written += 1;
        }
        Ok(written)
    }

    fn write_yaml(&self, path: &Path, data: ExportMap) -> Result<()> {
        let yaml = serde_yaml::to_string(&Value::Object(data))?;
        self.fs
            .write(path, yaml.as_bytes())
            .map_err(|e| ImporterError::filesystem(path, e))
    }
}

/// Sanitized file stem for a record; an identifying string that sanitizes to
/// nothing falls back to the record's `unknown_*` name.
pub fn file_stem<R: Record>(record: &R) -> String {
    let stem = sanitize_filename(&record.filename_base());
    if stem.is_empty() {
        sanitize_filename(&record.fallback_name())
    } else {
        stem
    }
}

fn has_export_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == EXPORT_EXTENSION)
        .unwrap_or(false)
}
