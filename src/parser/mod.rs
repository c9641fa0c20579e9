//! Newline-delimited JSON parsing into typed collections.
//!
//! Every line is decoded on its own. A bad line is reported and skipped; only a
//! source that cannot be opened or read aborts the parse.

use crate::constants::MAX_EXCERPT_CHARS;
use crate::error::{ImporterError, Result};
use crate::logging::{default_sink, DiagnosticSink};
use crate::models::{decode_record, Collection, Record};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

const COMPONENT: &str = "parser";

/// One line that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    /// 1-based
    pub line_number: usize,
    pub excerpt: String,
    pub cause: String,
}

impl LineFailure {
    fn new(line_number: usize, raw: &str, cause: String) -> Self {
        Self {
            line_number,
            excerpt: excerpt(raw),
            cause,
        }
    }
}

impl From<&LineFailure> for ImporterError {
    fn from(failure: &LineFailure) -> Self {
        ImporterError::RecordDecode {
            line_number: failure.line_number,
            cause: failure.cause.clone(),
        }
    }
}

/// Successfully decoded records plus the lines that were skipped
#[derive(Debug)]
pub struct ParseReport<R> {
    pub collection: Collection<R>,
    pub failures: Vec<LineFailure>,
}

impl<R: Record> ParseReport<R> {
    pub fn success_count(&self) -> usize {
        self.collection.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

pub struct LineParser {
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(default_sink())
    }
}

impl LineParser {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Parses a local source file. A missing or unreadable file is
    /// `SourceUnavailable`; bad lines inside it are not errors.
    pub fn parse_file<R: Record>(&self, path: &Path) -> Result<ParseReport<R>> {
        let unavailable = |e: std::io::Error| ImporterError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let file = File::open(path).map_err(|e| {
            self.sink.error(
                COMPONENT,
                &format!("Source file {} not found or unreadable: {}", path.display(), e),
            );
            unavailable(e)
        })?;
        self.sink.info(
            COMPONENT,
            &format!("Processing {} from {}...", R::KIND, path.display()),
        );
        self.parse_reader(BufReader::new(file)).map_err(|e| match e {
            ImporterError::Io(io) => unavailable(io),
            other => other,
        })
    }

    pub fn parse_bytes<R: Record>(&self, bytes: &[u8]) -> Result<ParseReport<R>> {
        self.parse_reader(bytes)
    }

    pub fn parse_reader<R: Record, B: BufRead>(&self, reader: B) -> Result<ParseReport<R>> {
        let started = Instant::now();
        let mut collection = Collection::new();
        let mut failures = Vec::new();

        for (index, chunk) in reader.split(b'\n').enumerate() {
            let raw = chunk?;
            let line_number = index + 1;
            match decode_line::<R>(&raw) {
                LineOutcome::Blank => {}
                LineOutcome::Record(record) => collection.push(record),
                LineOutcome::Failed { raw, cause } => {
                    let failure = LineFailure::new(line_number, &raw, cause);
                    self.sink.error(
                        COMPONENT,
                        &format!(
                            "{} ({} source). Line: {}",
                            ImporterError::from(&failure),
                            R::KIND,
                            failure.excerpt
                        ),
                    );
                    failures.push(failure);
                }
            }
        }

        crate::metrics::parser::records_parsed(R::KIND, collection.len());
        crate::metrics::parser::lines_failed(R::KIND, failures.len());
        crate::metrics::parser::duration(R::KIND, started.elapsed().as_secs_f64());
        self.sink.info(
            COMPONENT,
            &format!(
                "Finished processing {} {} ({} failed lines)",
                collection.len(),
                R::KIND,
                failures.len()
            ),
        );

        Ok(ParseReport {
            collection,
            failures,
        })
    }
}

enum LineOutcome<R> {
    Blank,
    Record(R),
    Failed { raw: String, cause: String },
}

fn decode_line<R: Record>(raw: &[u8]) -> LineOutcome<R> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            return LineOutcome::Failed {
                raw: String::from_utf8_lossy(raw).into_owned(),
                cause: format!("invalid UTF-8: {}", e),
            }
        }
    };
    if text.trim().is_empty() {
        return LineOutcome::Blank;
    }
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            return LineOutcome::Failed {
                raw: text.to_string(),
                cause: format!("invalid JSON: {}", e),
            }
        }
    };
    match decode_record::<R>(value) {
        Ok(record) => LineOutcome::Record(record),
        Err(cause) => LineOutcome::Failed {
            raw: text.to_string(),
            cause,
        },
    }
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}
