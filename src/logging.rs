use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging() {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    // Create a non-blocking file appender for daily log rotation
    let file_appender = tracing_appender::rolling::daily("logs", "importer.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Create a JSON layer for file logging
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Create a formatted layer for console logging
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("iso_data_importer=info"));

    // Set the global default subscriber
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // We need to keep the guard alive for the whole process so logs are flushed on exit
    std::mem::forget(guard);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Destination for pipeline diagnostics.
///
/// The parser, exporter and orchestrator report through a sink handed to them at
/// construction instead of logging to ambient state, so tests can observe exactly
/// what was reported.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, severity: Severity, component: &str, message: &str);

    fn info(&self, component: &str, message: &str) {
        self.emit(Severity::Info, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        self.emit(Severity::Warn, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.emit(Severity::Error, component, message);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, severity: Severity, component: &str, message: &str) {
        match severity {
            Severity::Info => tracing::info!(component = component, "{}", message),
            Severity::Warn => tracing::warn!(component = component, "{}", message),
            Severity::Error => tracing::error!(component = component, "{}", message),
        }
    }
}

pub fn default_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(TracingSink)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub component: String,
    pub message: String,
}

/// Keeps every diagnostic in memory; used by tests and by callers that want to
/// render their own report.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    // A panic while holding the lock must not lose what was already recorded
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, severity: Severity, component: &str, message: &str) {
        self.lock().push(Diagnostic {
            severity,
            component: component.to_string(),
            message: message.to_string(),
        });
    }
}
