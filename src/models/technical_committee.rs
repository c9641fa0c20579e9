use super::coerce;
use super::{compact, ExportMap, Record};
use crate::error::Result;
use crate::types::RecordKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A technical committee, sub-committee or working group
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TechnicalCommittee {
    #[serde(deserialize_with = "coerce::opt_i64")]
    pub id: Option<i64>,
    pub reference: Option<String>,
    /// "Active" or "Suspended"
    pub status: Option<String>,
    #[serde(deserialize_with = "coerce::opt_object")]
    pub title: Option<ExportMap>,
    #[serde(deserialize_with = "coerce::opt_object")]
    pub secretariat: Option<ExportMap>,
    #[serde(deserialize_with = "coerce::opt_date")]
    pub creation_date: Option<NaiveDate>,
    #[serde(deserialize_with = "coerce::opt_object")]
    pub scope: Option<ExportMap>,
    #[serde(deserialize_with = "coerce::opt_i64")]
    pub parent_id: Option<i64>,
    #[serde(deserialize_with = "coerce::opt_i64_seq")]
    pub children_id: Option<Vec<i64>>,
    pub p_members: Option<Vec<ExportMap>>,
    pub o_members: Option<Vec<ExportMap>>,
    pub committee_liaisons: Option<Vec<ExportMap>>,
    pub organization_liaisons: Option<Vec<ExportMap>>,
    pub sort_key: Option<String>,
    #[serde(flatten)]
    pub extra: ExportMap,
}

#[derive(Serialize)]
struct TechnicalCommitteeExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a ExportMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secretariat: Option<&'a ExportMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a ExportMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children_id: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p_members: Option<&'a [ExportMap]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    o_members: Option<&'a [ExportMap]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    committee_liaisons: Option<&'a [ExportMap]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_liaisons: Option<&'a [ExportMap]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_key: Option<&'a str>,
}

impl Record for TechnicalCommittee {
    const KIND: RecordKind = RecordKind::TechnicalCommittee;
    const SOURCE_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("creation_date", "creationDate"),
        ("parent_id", "parentId"),
        ("children_id", "childrenId"),
        ("p_members", "pMembers"),
        ("o_members", "oMembers"),
        ("committee_liaisons", "committeeLiaisons"),
        ("organization_liaisons", "organizationLiaisons"),
        ("sort_key", "sortKey"),
    ];

    fn identifying_string(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn fallback_id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn export_representation(&self) -> Result<ExportMap> {
        let view = TechnicalCommitteeExport {
            id: self.id,
            reference: self.reference.as_deref(),
            status: self.status.as_deref(),
            title: self.title.as_ref(),
            secretariat: self.secretariat.as_ref(),
            creation_date: self.creation_date.map(|d| d.to_string()),
            scope: self.scope.as_ref(),
            parent_id: self.parent_id,
            children_id: self.children_id.as_deref(),
            p_members: self.p_members.as_deref(),
            o_members: self.o_members.as_deref(),
            committee_liaisons: self.committee_liaisons.as_deref(),
            organization_liaisons: self.organization_liaisons.as_deref(),
            sort_key: self.sort_key.as_deref(),
        };
        compact(&view, &self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decode_record;
    use serde_json::json;

    #[test]
    fn test_decode_committee() {
        let tc = decode_record::<TechnicalCommittee>(json!({
            "id": 45020,
            "reference": "ISO/TC 176",
            "status": "Active",
            "title": {"en": "Quality management and quality assurance"},
            "secretariat": {"id": 2101, "acronym": "SCC"},
            "creationDate": "1979-01-01",
            "childrenId": [53882, 53896],
            "pMembers": [{"id": 1511, "acronym": "DIN"}],
            "sortKey": "TC 0176"
        }))
        .unwrap();

        assert_eq!(tc.reference.as_deref(), Some("ISO/TC 176"));
        assert_eq!(tc.children_id, Some(vec![53882, 53896]));
        assert_eq!(tc.p_members.as_ref().map(Vec::len), Some(1));

        let out = tc.export_representation().unwrap();
        assert_eq!(out["creation_date"], json!("1979-01-01"));
        assert_eq!(out["secretariat"], json!({"id": 2101, "acronym": "SCC"}));
        assert!(!out.contains_key("parent_id"));
        assert!(!out.contains_key("extra"));
    }

    #[test]
    fn test_members_must_be_mappings() {
        let res = decode_record::<TechnicalCommittee>(json!({
            "id": 1,
            "pMembers": ["DIN"]
        }));
        assert!(res.is_err());
    }
}
