//! Names and paths shared across the importer.
//! Kind-specific values are looked up through `RecordKind` rather than used directly.

// Default locations (overridable via config)
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_CACHE_DIR: &str = "tmp";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

// Export format
pub const EXPORT_EXTENSION: &str = "yaml";

// Per-record output subdirectories
pub const DELIVERABLES_SUBDIR: &str = "deliverables";
pub const TC_SUBDIR: &str = "committees";
pub const ICS_SUBDIR: &str = "ics";

// Single-file collection outputs
pub const DELIVERABLES_FILE: &str = "deliverables.yaml";
pub const TC_FILE: &str = "committees.yaml";
pub const ICS_FILE: &str = "ics.yaml";

// Top-level keys of the collection outputs
pub const DELIVERABLES_KEY: &str = "deliverables";
pub const TC_KEY: &str = "technical_committees";
pub const ICS_KEY: &str = "ics_entries";

// Cached source files
pub const DELIVERABLES_CACHE_FILE: &str = "iso_deliverables.jsonl";
pub const TC_CACHE_FILE: &str = "iso_technical_committees.jsonl";
pub const ICS_CACHE_FILE: &str = "iso_ics.jsonl";

// Published open data locations
pub const DELIVERABLES_SOURCE_URL: &str = "https://isopublicstorageprod.blob.core.windows.net/opendata/_latest/iso_deliverables_metadata/json/iso_deliverables_metadata.jsonl";
pub const TC_SOURCE_URL: &str = "https://isopublicstorageprod.blob.core.windows.net/opendata/_latest/iso_technical_committees/json/iso_technical_committees.jsonl";
pub const ICS_SOURCE_URL: &str = "https://isopublicstorageprod.blob.core.windows.net/opendata/_latest/iso_ics/json/iso_ics.jsonl";

// Longest raw line excerpt kept in a decode failure
pub const MAX_EXCERPT_CHARS: usize = 200;

// Longest response body excerpt kept in a transport failure
pub const MAX_BODY_EXCERPT_BYTES: usize = 500;
