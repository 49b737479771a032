//! Cell identity, payloads and render metadata.

use crate::config::DrawConfig;
use std::fmt;

/// Identity of a record in the grid's store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for RowId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Joins the column and row parts of a [`CellId`]. Column ids never contain it.
pub const CELL_ID_SEPARATOR: char = '-';

/// Stable identifier of one chart cell: `"{column}-{row}"`.
///
/// The same (column, row) pair always yields the same id, so a cell that is
/// re-rendered before it is drawn maps onto its existing queue slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(String);

impl CellId {
    /// Derives the identifier for a column/row pair.
    #[must_use]
    pub fn new(column_id: &str, row: &RowId) -> Self {
        Self(format!("{column_id}{CELL_ID_SEPARATOR}{row}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Markup attribute carrying this id, as written into the cell.
    #[must_use]
    pub fn attribute(&self) -> String {
        format!("id=\"{}\"", self.0)
    }

    /// Extracts the id from an attribute produced by [`CellId::attribute`].
    #[must_use]
    pub fn from_attribute(attr: &str) -> Option<Self> {
        let value = attr.trim().strip_prefix("id=\"")?.strip_suffix('"')?;
        (!value.is_empty()).then(|| Self(value.to_string()))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of a sparkline cell, waiting to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain data points; the column's shared configuration applies.
    Direct(Vec<f64>),
    /// Data points with their own draw configuration.
    WithConfig(Vec<f64>, DrawConfig),
}

impl CellValue {
    /// Returns the data points regardless of shape.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        match self {
            Self::Direct(points) | Self::WithConfig(points, _) => points,
        }
    }

    /// Splits the value into points and the per-cell configuration, if any.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Option<DrawConfig>) {
        match self {
            Self::Direct(points) => (points, None),
            Self::WithConfig(points, config) => (points, Some(config)),
        }
    }
}

impl From<Vec<f64>> for CellValue {
    fn from(points: Vec<f64>) -> Self {
        Self::Direct(points)
    }
}

impl From<(Vec<f64>, DrawConfig)> for CellValue {
    fn from((points, config): (Vec<f64>, DrawConfig)) -> Self {
        Self::WithConfig(points, config)
    }
}

/// Out-parameter filled by a cell renderer alongside the returned markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellMeta {
    /// Extra attribute text for the cell element.
    pub td_attr: String,
}

impl CellMeta {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The chart cell this metadata marks, if any.
    #[must_use]
    pub fn cell_id(&self) -> Option<CellId> {
        CellId::from_attribute(&self.td_attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id_is_deterministic() {
        let row = RowId::from(7);
        assert_eq!(CellId::new("trend", &row), CellId::new("trend", &row));
        assert_eq!(CellId::new("trend", &row).as_str(), "trend-7");
        assert_ne!(CellId::new("trend", &row), CellId::new("load", &row));
    }

    #[test]
    fn test_attribute_round_trip() {
        let id = CellId::new("trend", &RowId::new("r-1"));
        assert_eq!(id.attribute(), "id=\"trend-r-1\"");
        assert_eq!(CellId::from_attribute(&id.attribute()), Some(id));
    }

    #[test]
    fn test_from_attribute_rejects_garbage() {
        assert_eq!(CellId::from_attribute(""), None);
        assert_eq!(CellId::from_attribute("id=\"\""), None);
        assert_eq!(CellId::from_attribute("class=\"x\""), None);
    }

    #[test]
    fn test_meta_without_marker() {
        assert_eq!(CellMeta::new().cell_id(), None);
    }

    #[test]
    fn test_cell_value_parts() {
        let direct = CellValue::from(vec![1.0, 2.0]);
        assert_eq!(direct.points(), &[1.0, 2.0]);
        assert_eq!(direct.into_parts(), (vec![1.0, 2.0], None));

        let config = DrawConfig::new().range_max(5.0);
        let with = CellValue::from((vec![3.0], config.clone()));
        assert_eq!(with.points(), &[3.0]);
        assert_eq!(with.into_parts(), (vec![3.0], Some(config)));
    }
}
