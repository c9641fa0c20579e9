use crate::error::Result;
use crate::types::RecordKind;
use std::path::PathBuf;

/// Retrieves the raw bytes behind a URL.
///
/// Implementations return `ImporterError::Transport` for non-success statuses and
/// for connection or timeout failures. No retries.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Makes the source file for one kind available locally.
///
/// `force` asks for a fresh download even when a previous copy exists.
pub trait SourceProvider: Send + Sync {
    fn provide(&self, kind: RecordKind, force: bool) -> Result<PathBuf>;
}
