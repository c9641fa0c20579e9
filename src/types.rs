use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three datasets published by ISO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Deliverable,
    TechnicalCommittee,
    IcsEntry,
}

impl RecordKind {
    /// Processing order for orchestration
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Deliverable,
        RecordKind::TechnicalCommittee,
        RecordKind::IcsEntry,
    ];

    /// Short label used in fallback filenames (`unknown_<label>_<id>`)
    pub fn fallback_label(&self) -> &'static str {
        match self {
            RecordKind::Deliverable => "deliverable",
            RecordKind::TechnicalCommittee => "tc",
            RecordKind::IcsEntry => "ics",
        }
    }

    /// Top-level key of the collection export
    pub fn collection_key(&self) -> &'static str {
        match self {
            RecordKind::Deliverable => DELIVERABLES_KEY,
            RecordKind::TechnicalCommittee => TC_KEY,
            RecordKind::IcsEntry => ICS_KEY,
        }
    }

    pub fn subdir(&self) -> &'static str {
        match self {
            RecordKind::Deliverable => DELIVERABLES_SUBDIR,
            RecordKind::TechnicalCommittee => TC_SUBDIR,
            RecordKind::IcsEntry => ICS_SUBDIR,
        }
    }

    pub fn collection_file(&self) -> &'static str {
        match self {
            RecordKind::Deliverable => DELIVERABLES_FILE,
            RecordKind::TechnicalCommittee => TC_FILE,
            RecordKind::IcsEntry => ICS_FILE,
        }
    }

    pub fn cache_file(&self) -> &'static str {
        match self {
            RecordKind::Deliverable => DELIVERABLES_CACHE_FILE,
            RecordKind::TechnicalCommittee => TC_CACHE_FILE,
            RecordKind::IcsEntry => ICS_CACHE_FILE,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Deliverable => "deliverables",
            RecordKind::TechnicalCommittee => "technical committees",
            RecordKind::IcsEntry => "ICS entries",
        };
        f.write_str(name)
    }
}

/// How a collection is laid out on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportStrategy {
    /// One aggregate file per kind
    #[default]
    Collection,
    /// One file per record, named from its sanitized reference
    IndividualFiles,
}

impl fmt::Display for ExportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStrategy::Collection => f.write_str("collection"),
            ExportStrategy::IndividualFiles => f.write_str("individual_files"),
        }
    }
}
