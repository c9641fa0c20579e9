//! Counters for the import pipeline.
//!
//! Everything goes through the `metrics` facade; without an installed recorder the
//! calls are no-ops, so library users and tests pay nothing for them.

use crate::types::RecordKind;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const METRICS_ADDR_ENV: &str = "ISO_IMPORTER_METRICS_ADDR";

/// Installs the Prometheus exporter when `ISO_IMPORTER_METRICS_ADDR` is set.
pub fn init_metrics() {
    let addr_str = match std::env::var(METRICS_ADDR_ENV) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return,
    };
    let addr: SocketAddr = match addr_str.trim().parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics addr '{}': {}", addr_str, e);
            return;
        }
    };
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed (possibly already installed): {}", e),
    }
}

fn kind_label(kind: RecordKind) -> &'static str {
    kind.collection_key()
}

pub mod parser {
    use super::*;

    pub fn records_parsed(kind: RecordKind, count: usize) {
        ::metrics::counter!("iso_importer_records_parsed_total", "kind" => kind_label(kind))
            .increment(count as u64);
    }

    pub fn lines_failed(kind: RecordKind, count: usize) {
        ::metrics::counter!("iso_importer_lines_failed_total", "kind" => kind_label(kind))
            .increment(count as u64);
    }

    pub fn duration(kind: RecordKind, secs: f64) {
        ::metrics::histogram!("iso_importer_parse_duration_seconds", "kind" => kind_label(kind))
            .record(secs);
    }
}

pub mod exporter {
    use super::*;

    pub fn files_written(kind: RecordKind, count: usize) {
        ::metrics::counter!("iso_importer_files_written_total", "kind" => kind_label(kind))
            .increment(count as u64);
    }

    pub fn files_removed(count: usize) {
        ::metrics::counter!("iso_importer_files_removed_total").increment(count as u64);
    }

    pub fn name_collision(kind: RecordKind) {
        ::metrics::counter!("iso_importer_filename_collisions_total", "kind" => kind_label(kind))
            .increment(1);
    }
}

pub mod fetch {
    use super::*;

    pub fn download(kind: RecordKind, bytes: usize) {
        ::metrics::counter!("iso_importer_downloads_total", "kind" => kind_label(kind)).increment(1);
        ::metrics::histogram!("iso_importer_download_bytes", "kind" => kind_label(kind))
            .record(bytes as f64);
    }

    pub fn cache_hit(kind: RecordKind) {
        ::metrics::counter!("iso_importer_cache_hits_total", "kind" => kind_label(kind)).increment(1);
    }

    pub fn failure(kind: RecordKind, error_kind: &'static str) {
        ::metrics::counter!(
            "iso_importer_kind_failures_total",
            "kind" => kind_label(kind),
            "error" => error_kind
        )
        .increment(1);
    }
}
