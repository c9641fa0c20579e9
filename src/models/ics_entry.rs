use super::{compact, ExportMap, Record};
use crate::error::Result;
use crate::types::RecordKind;
use serde::{Deserialize, Serialize};

/// An International Classification for Standards entry, e.g. `03.140`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IcsEntry {
    pub identifier: Option<String>,
    pub parent: Option<String>,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub scope_en: Option<String>,
    pub scope_fr: Option<String>,
    pub references: Option<Vec<ExportMap>>,
    #[serde(flatten)]
    pub extra: ExportMap,
}

#[derive(Serialize)]
struct IcsEntryExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_en: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_fr: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope_en: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope_fr: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    references: Option<&'a [ExportMap]>,
}

impl Record for IcsEntry {
    const KIND: RecordKind = RecordKind::IcsEntry;
    const SOURCE_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("title_en", "titleEn"),
        ("title_fr", "titleFr"),
        ("scope_en", "scopeEn"),
        ("scope_fr", "scopeFr"),
    ];

    fn identifying_string(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    // ICS entries carry no numeric id; the fallback name uses a timestamp
    fn fallback_id(&self) -> Option<String> {
        None
    }

    fn export_representation(&self) -> Result<ExportMap> {
        let view = IcsEntryExport {
            identifier: self.identifier.as_deref(),
            parent: self.parent.as_deref(),
            title_en: self.title_en.as_deref(),
            title_fr: self.title_fr.as_deref(),
            scope_en: self.scope_en.as_deref(),
            scope_fr: self.scope_fr.as_deref(),
            references: self.references.as_deref(),
        };
        compact(&view, &self.extra)
    }
}
