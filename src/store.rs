//! In-memory record store.

use crate::cell::{CellValue, RowId};
use crate::config::DrawConfig;
use crate::host::DataStore;
use std::collections::HashMap;

/// A single field value of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Null/empty value.
    #[default]
    Null,
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Sparkline data points.
    Series(Vec<f64>),
    /// Sparkline data points with their own draw configuration.
    SeriesWithConfig(Vec<f64>, DrawConfig),
}

impl FieldValue {
    /// Numeric value, if this is a finite number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// The chart payload this field carries, if it is a series.
    #[must_use]
    pub fn to_cell_value(&self) -> Option<CellValue> {
        match self {
            Self::Series(points) => Some(CellValue::Direct(points.clone())),
            Self::SeriesWithConfig(points, config) => {
                Some(CellValue::WithConfig(points.clone(), config.clone()))
            }
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(points: Vec<f64>) -> Self {
        Self::Series(points)
    }
}

impl From<(Vec<f64>, DrawConfig)> for FieldValue {
    fn from((points, config): (Vec<f64>, DrawConfig)) -> Self {
        Self::SeriesWithConfig(points, config)
    }
}

/// One row of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RowId,
    fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with no fields.
    #[must_use]
    pub fn new(id: impl Into<RowId>) -> Self {
        Self { id: id.into(), fields: HashMap::new() }
    }

    /// Sets a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Record identity.
    #[must_use]
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Field value; missing fields read as `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Ordered, in-memory collection of records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, replacing any record with the same id in place.
    pub fn insert(&mut self, record: Record) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Removes the record with `id`.
    pub fn remove(&mut self, id: &RowId) -> Option<Record> {
        let index = self.records.iter().position(|r| &r.id == id)?;
        Some(self.records.remove(index))
    }

    /// Looks up a record.
    #[must_use]
    pub fn get(&self, id: &RowId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Looks up a record for mutation.
    pub fn get_mut(&mut self, id: &RowId) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| &r.id == id)
    }

    /// Records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

impl DataStore for RecordStore {
    fn row_ids(&self) -> Vec<RowId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    fn max(&self, field: &str) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|r| r.get(field).and_then(FieldValue::as_number))
            .reduce(f64::max)
    }
}
