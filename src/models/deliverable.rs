use super::coerce;
use super::{compact, ExportMap, Record};
use crate::error::Result;
use crate::types::RecordKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A published ISO deliverable (standard, technical report, amendment, ...)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deliverable {
    #[serde(deserialize_with = "coerce::opt_i64")]
    pub id: Option<i64>,
    pub reference: Option<String>,
    pub deliverable_type: Option<String>,
    pub supplement_type: Option<String>,
    #[serde(deserialize_with = "coerce::opt_date")]
    pub publication_date: Option<NaiveDate>,
    #[serde(deserialize_with = "coerce::opt_i64")]
    pub edition: Option<i64>,
    pub ics_code: Option<Vec<String>>,
    pub owner_committee: Option<String>,
    #[serde(deserialize_with = "coerce::opt_i64")]
    pub current_stage: Option<i64>,
    #[serde(deserialize_with = "coerce::opt_i64_seq")]
    pub replaces: Option<Vec<i64>>,
    #[serde(deserialize_with = "coerce::opt_i64_seq")]
    pub replaced_by: Option<Vec<i64>>,
    pub languages: Option<Vec<String>>,
    #[serde(deserialize_with = "coerce::opt_object")]
    pub pages: Option<ExportMap>,
    #[serde(deserialize_with = "coerce::opt_object")]
    pub scope: Option<ExportMap>,
    #[serde(flatten)]
    pub extra: ExportMap,
}

#[derive(Serialize)]
struct DeliverableExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    docidentifier: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    deliverable_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplement_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edition: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ics: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    committee: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replaces: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replaced_by: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    languages: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<&'a ExportMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a ExportMap>,
}

impl Record for Deliverable {
    const KIND: RecordKind = RecordKind::Deliverable;
    const SOURCE_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("docidentifier", "reference"),
        ("deliverable_type", "deliverableType"),
        ("supplement_type", "supplementType"),
        ("publication_date", "publicationDate"),
        ("ics_code", "icsCode"),
        ("owner_committee", "ownerCommittee"),
        ("current_stage", "currentStage"),
        ("replaced_by", "replacedBy"),
    ];

    fn identifying_string(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn fallback_id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn export_representation(&self) -> Result<ExportMap> {
        let view = DeliverableExport {
            id: self.id,
            docidentifier: self.reference.as_deref(),
            deliverable_type: self.deliverable_type.as_deref(),
            supplement_type: self.supplement_type.as_deref(),
            publication_date: self.publication_date.map(|d| d.to_string()),
            edition: self.edition,
            ics: self.ics_code.as_deref(),
            committee: self.owner_committee.as_deref(),
            stage: self.current_stage,
            replaces: self.replaces.as_deref(),
            replaced_by: self.replaced_by.as_deref(),
            languages: self.languages.as_deref(),
            pages: self.pages.as_ref(),
            scope: self.scope.as_ref(),
        };
        compact(&view, &self.extra)
    }
}
