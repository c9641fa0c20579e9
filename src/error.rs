use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Failed to decode record on line {line_number}: {cause}")]
    RecordDecode { line_number: usize, cause: String },

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImporterError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImporterError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short stable label used for summaries and metrics
    pub fn kind_label(&self) -> &'static str {
        match self {
            ImporterError::Transport { .. } => "transport",
            ImporterError::SourceUnavailable { .. } => "source_unavailable",
            ImporterError::RecordDecode { .. } => "record_decode",
            ImporterError::Filesystem { .. } => "filesystem",
            ImporterError::Json(_) | ImporterError::Yaml(_) => "serialization",
            ImporterError::Toml(_) | ImporterError::Config(_) => "config",
            ImporterError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, ImporterError>;
