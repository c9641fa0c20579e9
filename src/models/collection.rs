use super::{ExportMap, Record};
use crate::error::Result;
use serde_json::Value;

/// Ordered, append-only set of successfully decoded records of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// `{ "<collection_key>": [record, ...] }` in insertion order
    pub fn export_representation(&self) -> Result<ExportMap> {
        let items = self
            .records
            .iter()
            .map(|r| r.export_representation().map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        let mut map = ExportMap::new();
        map.insert(R::KIND.collection_key().to_string(), Value::Array(items));
        Ok(map)
    }
}

impl<R: Record> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
