use anyhow::Result;
use iso_data_importer::exporter::fs::{FileSystem, LocalFs};
use iso_data_importer::exporter::Exporter;
use iso_data_importer::models::{Collection, Deliverable, IcsEntry, TechnicalCommittee};
use iso_data_importer::types::ExportStrategy;
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Counts mutating calls and forwards everything to the real filesystem
#[derive(Default)]
struct CountingFs {
    writes: AtomicUsize,
    dirs_created: AtomicUsize,
}

impl FileSystem for CountingFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dirs_created.fetch_add(1, Ordering::SeqCst);
        LocalFs.create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        LocalFs.write(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        LocalFs.remove_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        LocalFs.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        LocalFs.is_file(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        LocalFs.list_dir(path)
    }
}

fn deliverable(id: i64, reference: Option<&str>) -> Deliverable {
    Deliverable {
        id: Some(id),
        reference: reference.map(str::to_string),
        ..Default::default()
    }
}

fn sample_deliverables() -> Collection<Deliverable> {
    vec![
        deliverable(1, Some("ISO 9001:2015")),
        deliverable(2, Some("ISO/TR 10013")),
    ]
    .into_iter()
    .collect()
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

#[test]
fn test_collection_export_preserves_order() -> Result<()> {
    let temp_dir = tempdir()?;
    let exporter = Exporter::new(temp_dir.path());

    let written =
        exporter.export_deliverables(Some(&sample_deliverables()), ExportStrategy::Collection)?;

    assert_eq!(written, 1);
    let data = read_yaml(&temp_dir.path().join("deliverables.yaml"))?;
    assert_eq!(
        data,
        json!({
            "deliverables": [
                {"id": 1, "docidentifier": "ISO 9001:2015"},
                {"id": 2, "docidentifier": "ISO/TR 10013"}
            ]
        })
    );
    Ok(())
}

#[test]
fn test_individual_export_uses_sanitized_names() -> Result<()> {
    let temp_dir = tempdir()?;
    let exporter = Exporter::new(temp_dir.path());

    let written = exporter
        .export_deliverables(Some(&sample_deliverables()), ExportStrategy::IndividualFiles)?;

    assert_eq!(written, 2);
    let dir = temp_dir.path().join("deliverables");
    let mut names: Vec<String> = fs::read_dir(&dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<io::Result<_>>()?;
    names.sort();
    assert_eq!(names, vec!["ISO_9001_2015.yaml", "ISO_TR_10013.yaml"]);

    let first = read_yaml(&dir.join("ISO_9001_2015.yaml"))?;
    assert_eq!(first, json!({"id": 1, "docidentifier": "ISO 9001:2015"}));
    Ok(())
}

#[test]
fn test_missing_reference_uses_fallback_name() -> Result<()> {
    let temp_dir = tempdir()?;
    let exporter = Exporter::new(temp_dir.path());
    let collection: Collection<Deliverable> = vec![deliverable(99, None)].into_iter().collect();

    exporter.export_deliverables(Some(&collection), ExportStrategy::IndividualFiles)?;

    assert!(temp_dir
        .path()
        .join("deliverables")
        .join("unknown_deliverable_99.yaml")
        .is_file());
    Ok(())
}

#[test]
fn test_empty_or_absent_collection_touches_nothing() -> Result<()> {
    let temp_dir = tempdir()?;
    let fs_spy = Arc::new(CountingFs::default());
    let exporter = Exporter::new(temp_dir.path().join("out")).with_fs(fs_spy.clone());

    for strategy in [ExportStrategy::Collection, ExportStrategy::IndividualFiles] {
        assert_eq!(exporter.export_deliverables(None, strategy)?, 0);
        assert_eq!(
            exporter.export_technical_committees(Some(&Collection::<TechnicalCommittee>::new()), strategy)?,
            0
        );
        assert_eq!(
            exporter.export_ics_entries(Some(&Collection::<IcsEntry>::new()), strategy)?,
            0
        );
    }

    assert_eq!(fs_spy.writes.load(Ordering::SeqCst), 0);
    assert_eq!(fs_spy.dirs_created.load(Ordering::SeqCst), 0);
    assert!(!temp_dir.path().join("out").exists());
    Ok(())
}

#[test]
fn test_clean_strategies_are_independent() -> Result<()> {
    let temp_dir = tempdir()?;
    let exporter = Exporter::new(temp_dir.path());
    let collection = sample_deliverables();
    exporter.export_deliverables(Some(&collection), ExportStrategy::Collection)?;
    exporter.export_deliverables(Some(&collection), ExportStrategy::IndividualFiles)?;

    let removed = exporter.clean(ExportStrategy::IndividualFiles)?;

    assert_eq!(removed, 2);
    assert!(temp_dir.path().join("deliverables.yaml").is_file());
    assert!(temp_dir.path().join("deliverables").is_dir());
    assert_eq!(fs::read_dir(temp_dir.path().join("deliverables"))?.count(), 0);
    assert_eq!(exporter.clean(ExportStrategy::IndividualFiles)?, 0);

    exporter.export_deliverables(Some(&collection), ExportStrategy::IndividualFiles)?;
    let removed = exporter.clean(ExportStrategy::Collection)?;

    assert_eq!(removed, 1);
    assert!(!temp_dir.path().join("deliverables.yaml").exists());
    assert!(temp_dir
        .path()
        .join("deliverables")
        .join("ISO_TR_10013.yaml")
        .is_file());
    assert_eq!(exporter.clean(ExportStrategy::Collection)?, 0);
    Ok(())
}

#[test]
fn test_export_creates_missing_root() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("nested").join("data");
    let exporter = Exporter::new(&root);

    exporter.export_deliverables(Some(&sample_deliverables()), ExportStrategy::Collection)?;

    assert!(root.join("deliverables.yaml").is_file());
    Ok(())
}
