//! Typed record models for the three ISO datasets.
//!
//! Each kind is its own struct with kind-specific attributes. Unrecognized source
//! keys land in the `extra` map of the record. The exporter only relies on the
//! [`Record`] trait: an identifying string plus an export representation.

pub mod coerce;
pub mod collection;
pub mod deliverable;
pub mod ics_entry;
pub mod technical_committee;

pub use collection::Collection;
pub use deliverable::Deliverable;
pub use ics_entry::IcsEntry;
pub use technical_committee::TechnicalCommittee;

use crate::error::Result;
use crate::types::RecordKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Ordered key/value form written to output files
pub type ExportMap = serde_json::Map<String, Value>;

/// Key under which unrecognized source attributes are exported
pub const EXTRA_KEY: &str = "extra";

pub trait Record: DeserializeOwned {
    const KIND: RecordKind;

    /// `(alias, canonical)` source keys. An alias stands in for its canonical key
    /// only when the canonical key is absent; otherwise it stays an unknown key.
    const SOURCE_ALIASES: &'static [(&'static str, &'static str)] = &[];

    /// Human-facing reference used to name per-record files
    fn identifying_string(&self) -> Option<&str>;

    /// Stable identifier used by the fallback filename, if the record has one
    fn fallback_id(&self) -> Option<String>;

    /// Compact export form: absent attributes are omitted
    fn export_representation(&self) -> Result<ExportMap>;

    /// `unknown_<kind>_<id>`, or a timestamp when the record has no id
    fn fallback_name(&self) -> String {
        let suffix = self
            .fallback_id()
            .unwrap_or_else(|| chrono::Utc::now().timestamp().to_string());
        format!("unknown_{}_{}", Self::KIND.fallback_label(), suffix)
    }

    /// Identifying string when present and non-empty, otherwise the fallback
    fn filename_base(&self) -> String {
        match self.identifying_string() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => self.fallback_name(),
        }
    }
}

/// Serializes an export view (whose optional fields skip `None`) and appends the
/// extra bag when it carries anything.
pub(crate) fn compact<T: Serialize>(view: &T, extra: &ExportMap) -> Result<ExportMap> {
    let Value::Object(mut map) = serde_json::to_value(view)? else {
        return Err(<serde_json::Error as serde::ser::Error>::custom(
            "export view did not serialize to a mapping",
        )
        .into());
    };
    if !extra.is_empty() {
        map.insert(EXTRA_KEY.to_string(), Value::Object(extra.clone()));
    }
    Ok(map)
}

/// Decodes one JSON value into a record, rejecting non-object values up front so
/// the error names the actual problem.
pub fn decode_record<R: Record>(value: Value) -> std::result::Result<R, String> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(format!("expected a JSON object, found {}", value_kind(&other))),
    };
    resolve_aliases(&mut object, R::SOURCE_ALIASES);
    serde_json::from_value(Value::Object(object)).map_err(|e| e.to_string())
}

fn resolve_aliases(object: &mut ExportMap, aliases: &[(&str, &str)]) {
    for (alias, canonical) in aliases {
        if object.contains_key(*canonical) {
            continue;
        }
        if let Some(value) = object.shift_remove(*alias) {
            object.insert(canonical.to_string(), value);
        }
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
