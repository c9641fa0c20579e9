use crate::app::ports::{SourceProvider, Transport};
use crate::config::SourcesConfig;
use crate::error::{ImporterError, Result};
use crate::logging::{default_sink, DiagnosticSink};
use crate::types::RecordKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COMPONENT: &str = "source_cache";

/// Downloads each dataset into a cache directory and reuses the cached copy
/// unless a fresh download is forced.
///
/// Downloads land in a `.tmp` sibling first and are renamed into place, so an
/// interrupted write never leaves a partial file under the cache name.
pub struct CachedSourceProvider<T: Transport> {
    transport: T,
    sources: SourcesConfig,
    cache_dir: PathBuf,
    sink: Arc<dyn DiagnosticSink>,
}

impl<T: Transport> CachedSourceProvider<T> {
    pub fn new(transport: T, sources: SourcesConfig, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            sources,
            cache_dir: cache_dir.into(),
            sink: default_sink(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn cache_path(&self, kind: RecordKind) -> PathBuf {
        self.cache_dir.join(kind.cache_file())
    }

    fn store(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| ImporterError::filesystem(&self.cache_dir, e))?;
        let tmp_path = path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp_path, bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ImporterError::filesystem(&tmp_path, e));
        }
        fs::rename(&tmp_path, path).map_err(|e| ImporterError::filesystem(path, e))
    }
}

impl<T: Transport> SourceProvider for CachedSourceProvider<T> {
    fn provide(&self, kind: RecordKind, force: bool) -> Result<PathBuf> {
        let path = self.cache_path(kind);
        if !force && path.is_file() {
            self.sink.info(
                COMPONENT,
                &format!("Using cached {} source at {}", kind, path.display()),
            );
            crate::metrics::fetch::cache_hit(kind);
            return Ok(path);
        }

        let url = self.sources.url_for(kind);
        self.sink.info(
            COMPONENT,
            &format!("Downloading {} from {} to {}...", kind, url, path.display()),
        );
        let bytes = self.transport.fetch(url)?;
        self.store(&path, &bytes)?;
        crate::metrics::fetch::download(kind, bytes.len());
        self.sink.info(
            COMPONENT,
            &format!("Successfully saved {} bytes to {}", bytes.len(), path.display()),
        );
        Ok(path)
    }
}
