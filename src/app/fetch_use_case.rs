use crate::app::ports::SourceProvider;
use crate::error::ImporterError;
use crate::logging::{default_sink, DiagnosticSink};
use crate::models::{Collection, Deliverable, IcsEntry, Record, TechnicalCommittee};
use crate::parser::{LineFailure, LineParser};
use crate::types::RecordKind;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

const COMPONENT: &str = "fetch";

/// Result of fetching and parsing one kind.
///
/// A fatal error (transport or missing source) leaves the collection empty.
#[derive(Debug)]
pub struct KindOutcome<R> {
    pub collection: Collection<R>,
    pub failed_lines: Vec<LineFailure>,
    pub error: Option<ImporterError>,
}

impl<R: Record> KindOutcome<R> {
    fn failed(error: ImporterError) -> Self {
        Self {
            collection: Collection::new(),
            failed_lines: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn summary(&self) -> KindSummary {
        KindSummary {
            kind: R::KIND,
            succeeded: self.collection.len(),
            failed_lines: self.failed_lines.len(),
            error: self.error.as_ref().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindSummary {
    pub kind: RecordKind,
    pub succeeded: usize,
    pub failed_lines: usize,
    pub error: Option<String>,
}

impl fmt::Display for KindSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} parsed, {} failed lines",
            self.kind, self.succeeded, self.failed_lines
        )?;
        if let Some(err) = &self.error {
            write!(f, " (fetch failed: {})", err)?;
        }
        Ok(())
    }
}

/// Collections for every kind, keyed by field
#[derive(Debug)]
pub struct FetchAllResult {
    pub deliverables: KindOutcome<Deliverable>,
    pub technical_committees: KindOutcome<TechnicalCommittee>,
    pub ics_entries: KindOutcome<IcsEntry>,
}

impl FetchAllResult {
    pub fn summaries(&self) -> Vec<KindSummary> {
        vec![
            self.deliverables.summary(),
            self.technical_committees.summary(),
            self.ics_entries.summary(),
        ]
    }
}

/// Sequences source retrieval and parsing for each kind.
///
/// Kinds run one after another; a failure in one never stops the next, and the
/// `force` flag reaches every kind unchanged.
pub struct FetchUseCase {
    provider: Box<dyn SourceProvider>,
    parser: LineParser,
    sink: Arc<dyn DiagnosticSink>,
}

impl FetchUseCase {
    pub fn new(provider: Box<dyn SourceProvider>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            provider,
            parser: LineParser::new(sink.clone()),
            sink,
        }
    }

    pub fn with_default_sink(provider: Box<dyn SourceProvider>) -> Self {
        Self::new(provider, default_sink())
    }

    pub fn fetch_kind<R: Record>(&self, force: bool) -> KindOutcome<R> {
        self.sink.info(
            COMPONENT,
            &format!("Starting to fetch ISO {} data (force={})...", R::KIND, force),
        );
        let parsed = self
            .provider
            .provide(R::KIND, force)
            .and_then(|path| self.parser.parse_file::<R>(&path));

        match parsed {
            Ok(report) => {
                self.sink.info(
                    COMPONENT,
                    &format!("Fetched {} ISO {}.", report.success_count(), R::KIND),
                );
                KindOutcome {
                    collection: report.collection,
                    failed_lines: report.failures,
                    error: None,
                }
            }
            Err(e) => {
                crate::metrics::fetch::failure(R::KIND, e.kind_label());
                self.sink.error(
                    COMPONENT,
                    &format!("Fetching ISO {} failed: {}", R::KIND, e),
                );
                KindOutcome::failed(e)
            }
        }
    }

    pub fn fetch_deliverables(&self, force: bool) -> KindOutcome<Deliverable> {
        self.fetch_kind(force)
    }

    pub fn fetch_technical_committees(&self, force: bool) -> KindOutcome<TechnicalCommittee> {
        self.fetch_kind(force)
    }

    pub fn fetch_ics_entries(&self, force: bool) -> KindOutcome<IcsEntry> {
        self.fetch_kind(force)
    }

    pub fn fetch_all(&self, force: bool) -> FetchAllResult {
        self.sink
            .info(COMPONENT, "Starting to fetch all ISO open data...");
        let result = FetchAllResult {
            deliverables: self.fetch_deliverables(force),
            technical_committees: self.fetch_technical_committees(force),
            ics_entries: self.fetch_ics_entries(force),
        };
        self.sink.info(COMPONENT, "Fetching complete.");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::logging::{MemorySink, Severity};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serves fixture files and records every request
    struct SpyProvider {
        dir: PathBuf,
        calls: Arc<Mutex<Vec<(RecordKind, bool)>>>,
        failing: Option<RecordKind>,
    }

    impl SourceProvider for SpyProvider {
        fn provide(&self, kind: RecordKind, force: bool) -> Result<PathBuf> {
            self.calls.lock().unwrap().push((kind, force));
            if self.failing == Some(kind) {
                return Err(ImporterError::Transport {
                    url: format!("http://test/{}", kind.cache_file()),
                    message: "Network error: connection refused".to_string(),
                });
            }
            Ok(self.dir.join(kind.cache_file()))
        }
    }

    fn fixtures(dir: &TempDir) {
        fs::write(
            dir.path().join(RecordKind::Deliverable.cache_file()),
            "{\"id\": 1, \"reference\": \"ISO 1\"}\n{\"id\": 2, \"reference\": \"ISO 2\"}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(RecordKind::TechnicalCommittee.cache_file()),
            "{\"id\": 101, \"reference\": \"ISO/TC 1\"}\n{broken\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(RecordKind::IcsEntry.cache_file()),
            "{\"identifier\": \"01.020\"}\n",
        )
        .unwrap();
    }

    fn use_case(
        dir: &TempDir,
        failing: Option<RecordKind>,
    ) -> (FetchUseCase, Arc<Mutex<Vec<(RecordKind, bool)>>>, Arc<MemorySink>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(MemorySink::new());
        let provider = SpyProvider {
            dir: dir.path().to_path_buf(),
            calls: calls.clone(),
            failing,
        };
        (FetchUseCase::new(Box::new(provider), sink.clone()), calls, sink)
    }

    #[test]
    fn test_fetch_all_collects_every_kind() {
        let dir = TempDir::new().unwrap();
        fixtures(&dir);
        let (use_case, _calls, _sink) = use_case(&dir, None);

        let result = use_case.fetch_all(false);

        assert_eq!(result.deliverables.collection.len(), 2);
        assert_eq!(result.technical_committees.collection.len(), 1);
        assert_eq!(result.technical_committees.failed_lines.len(), 1);
        assert_eq!(result.ics_entries.collection.len(), 1);
        assert!(result.summaries().iter().all(|s| s.error.is_none()));
    }

    #[test]
    fn test_force_reaches_every_kind_in_order() {
        let dir = TempDir::new().unwrap();
        fixtures(&dir);
        let (use_case, calls, _sink) = use_case(&dir, Some(RecordKind::Deliverable));

        use_case.fetch_all(true);

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                (RecordKind::Deliverable, true),
                (RecordKind::TechnicalCommittee, true),
                (RecordKind::IcsEntry, true),
            ]
        );
    }

    #[test]
    fn test_default_force_is_passed_as_false() {
        let dir = TempDir::new().unwrap();
        fixtures(&dir);
        let (use_case, calls, _sink) = use_case(&dir, None);

        use_case.fetch_ics_entries(false);

        assert_eq!(*calls.lock().unwrap(), vec![(RecordKind::IcsEntry, false)]);
    }

    #[test]
    fn test_one_kind_failing_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        fixtures(&dir);
        let (use_case, _calls, sink) = use_case(&dir, Some(RecordKind::TechnicalCommittee));

        let result = use_case.fetch_all(false);

        assert!(result.technical_committees.collection.is_empty());
        assert!(matches!(
            result.technical_committees.error,
            Some(ImporterError::Transport { .. })
        ));
        assert_eq!(result.deliverables.collection.len(), 2);
        assert_eq!(result.ics_entries.collection.len(), 1);
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[test]
    fn test_missing_source_is_isolated() {
        let dir = TempDir::new().unwrap();
        fixtures(&dir);
        fs::remove_file(dir.path().join(RecordKind::IcsEntry.cache_file())).unwrap();
        let (use_case, _calls, _sink) = use_case(&dir, None);

        let result = use_case.fetch_all(false);

        assert!(matches!(
            result.ics_entries.error,
            Some(ImporterError::SourceUnavailable { .. })
        ));
        assert!(result.ics_entries.collection.is_empty());
        assert!(result.deliverables.is_ok());

        let summary = result.ics_entries.summary();
        assert_eq!(summary.succeeded, 0);
        assert!(summary.to_string().contains("fetch failed"));
    }
}
