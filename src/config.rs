//! Column and grid configuration.
//!
//! Columns are configured in code through the builder methods on
//! [`ColumnConfig`] or loaded from YAML via [`GridConfig::load`]. Both the
//! snake_case keys and the camelCase spellings used by grid front-ends
//! (`sparklineConfig`, `globalMaxDataIndex`, `chartRangeMax`) are accepted.

use crate::cell::CELL_ID_SEPARATOR;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Maximum number of cells drawn per deferred cycle unless configured otherwise.
pub const DEFAULT_BATCH_LIMIT: usize = 10;

/// Declared chart width.
///
/// A fixed width does not depend on the column, so resizing the column
/// leaves the chart untouched. A percentage width is resolved against the
/// current column width at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDimension", into = "String")]
pub enum Dimension {
    /// Absolute width in cells (`"40"`, `"40px"` or a bare integer).
    Fixed(u16),
    /// Width as a percentage of the column (`"50%"`).
    Percent(f64),
}

impl Dimension {
    /// Returns true if the resolved width follows the column width.
    #[must_use]
    pub fn is_proportional(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Resolves this dimension against a column width, never below one cell.
    #[must_use]
    pub fn resolve(&self, column_width: u16) -> u16 {
        match *self {
            Self::Fixed(units) => units.max(1),
            Self::Percent(pct) => {
                let units = (f64::from(column_width) * pct / 100.0).floor();
                (units.clamp(1.0, f64::from(u16::MAX))) as u16
            }
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(pct) = trimmed.strip_suffix('%') {
            return match pct.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Ok(Self::Percent(value)),
                _ => Err(Error::InvalidDimension(s.to_string())),
            };
        }

        let units = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
        units.parse::<u16>().map(Self::Fixed).map_err(|_| Error::InvalidDimension(s.to_string()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(units) => write!(f, "{units}"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl From<Dimension> for String {
    fn from(value: Dimension) -> Self {
        value.to_string()
    }
}

/// YAML accepts both `width: 40` and `width: "40%"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDimension {
    Units(u16),
    Text(String),
}

impl TryFrom<RawDimension> for Dimension {
    type Error = Error;

    fn try_from(raw: RawDimension) -> Result<Self> {
        match raw {
            RawDimension::Units(units) => Ok(Self::Fixed(units)),
            RawDimension::Text(text) => text.parse(),
        }
    }
}

/// Per-chart draw configuration handed to the drawing surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Declared chart width; `None` fills the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,

    /// Lower bound of the value range; defaults to the data minimum.
    #[serde(default, alias = "chartRangeMin", skip_serializing_if = "Option::is_none")]
    pub chart_range_min: Option<f64>,

    /// Upper bound of the value range; defaults to the data maximum.
    #[serde(default, alias = "chartRangeMax", skip_serializing_if = "Option::is_none")]
    pub chart_range_max: Option<f64>,
}

impl DrawConfig {
    /// Creates an empty draw configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the declared width.
    #[must_use]
    pub fn width(mut self, width: Dimension) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the range floor.
    #[must_use]
    pub fn range_min(mut self, min: f64) -> Self {
        self.chart_range_min = Some(min);
        self
    }

    /// Sets the range ceiling.
    #[must_use]
    pub fn range_max(mut self, max: f64) -> Self {
        self.chart_range_max = Some(max);
        self
    }

    /// Returns true if the declared width is a fixed unit count.
    #[must_use]
    pub fn has_fixed_width(&self) -> bool {
        self.width.is_some_and(|w| !w.is_proportional())
    }
}

/// Configuration of one sparkline column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column identity; prefixes every cell identifier.
    ///
    /// Must not contain `-`, which separates the column from the row in a
    /// cell identifier, or `"`, which would end the id attribute.
    pub id: String,

    /// Record field carrying the cell value.
    #[serde(alias = "dataIndex")]
    pub data_index: String,

    /// Shared draw configuration for every cell.
    ///
    /// When present, cell values are plain point sequences. When absent,
    /// each cell value carries its own configuration.
    #[serde(default, alias = "sparklineConfig", skip_serializing_if = "Option::is_none")]
    pub sparkline_config: Option<DrawConfig>,

    /// Field whose maximum across all rows becomes every chart's ceiling.
    #[serde(default, alias = "globalMaxDataIndex", skip_serializing_if = "Option::is_none")]
    pub global_max_data_index: Option<String>,

    /// Cells drawn per deferred cycle.
    #[serde(default = "default_batch_limit", alias = "batchLimit")]
    pub batch_limit: usize,
}

fn default_batch_limit() -> usize {
    DEFAULT_BATCH_LIMIT
}

impl ColumnConfig {
    /// Creates a column reading `data_index`, with per-cell configuration.
    #[must_use]
    pub fn new(id: impl Into<String>, data_index: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_index: data_index.into(),
            sparkline_config: None,
            global_max_data_index: None,
            batch_limit: DEFAULT_BATCH_LIMIT,
        }
    }

    /// Sets the shared draw configuration.
    #[must_use]
    pub fn sparkline_config(mut self, config: DrawConfig) -> Self {
        self.sparkline_config = Some(config);
        self
    }

    /// Enables the shared ceiling computed from `field`.
    #[must_use]
    pub fn global_max(mut self, field: impl Into<String>) -> Self {
        self.global_max_data_index = Some(field.into());
        self
    }

    /// Sets the per-cycle batch limit.
    #[must_use]
    pub fn batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    /// Checks the column for values the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty"));
        }
        if self.id.contains(CELL_ID_SEPARATOR) || self.id.contains('"') {
            return Err(invalid(&format!("{}.id", self.id), "must not contain '-' or '\"'"));
        }
        if self.data_index.trim().is_empty() {
            return Err(invalid(&format!("{}.data_index", self.id), "must not be empty"));
        }
        if self.batch_limit == 0 {
            return Err(invalid(&format!("{}.batch_limit", self.id), "must be positive"));
        }
        if self.global_max_data_index.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(invalid(
                &format!("{}.global_max_data_index", self.id),
                "must name a field",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> Error {
    Error::ConfigInvalid { key: key.to_string(), message: message.to_string() }
}

/// Grid-level configuration: the set of sparkline columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Sparkline columns in display order.
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

fn default_version() -> u32 {
    1
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { version: default_version(), columns: Vec::new() }
    }
}

impl GridConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ConfigNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// Parse errors carry the offending line number.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Validates every column and rejects duplicate ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.id.as_str()) {
                return Err(Error::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse() {
        assert_eq!("40".parse::<Dimension>().unwrap(), Dimension::Fixed(40));
        assert_eq!("40px".parse::<Dimension>().unwrap(), Dimension::Fixed(40));
        assert_eq!(" 50% ".parse::<Dimension>().unwrap(), Dimension::Percent(50.0));
        assert!("wide".parse::<Dimension>().is_err());
        assert!("-5%".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_resolve() {
        assert_eq!(Dimension::Fixed(12).resolve(80), 12);
        assert_eq!(Dimension::Percent(50.0).resolve(80), 40);
        assert_eq!(Dimension::Percent(100.0).resolve(7), 7);
        // Never collapses to zero
        assert_eq!(Dimension::Percent(1.0).resolve(10), 1);
        assert_eq!(Dimension::Fixed(0).resolve(10), 1);
    }

    #[test]
    fn test_dimension_display_round_trips() {
        for dim in [Dimension::Fixed(30), Dimension::Percent(75.0)] {
            assert_eq!(dim.to_string().parse::<Dimension>().unwrap(), dim);
        }
    }

    #[test]
    fn test_draw_config_fixed_width() {
        assert!(!DrawConfig::new().has_fixed_width());
        assert!(DrawConfig::new().width(Dimension::Fixed(20)).has_fixed_width());
        assert!(!DrawConfig::new().width(Dimension::Percent(90.0)).has_fixed_width());
    }

    #[test]
    fn test_column_defaults() {
        let column = ColumnConfig::new("trend", "history");
        assert_eq!(column.batch_limit, DEFAULT_BATCH_LIMIT);
        assert!(column.sparkline_config.is_none());
        assert!(column.global_max_data_index.is_none());
        assert!(column.validate().is_ok());
    }

    #[test]
    fn test_column_validate_rejects_zero_batch() {
        let err = ColumnConfig::new("trend", "history").batch_limit(0).validate().unwrap_err();
        assert!(err.to_string().contains("trend.batch_limit"));
    }

    #[test]
    fn test_column_validate_rejects_empty_fields() {
        assert!(ColumnConfig::new("", "history").validate().is_err());
        assert!(ColumnConfig::new("trend", " ").validate().is_err());
        assert!(ColumnConfig::new("trend", "history").global_max("").validate().is_err());
    }

    #[test]
    fn test_column_validate_rejects_separator_in_id() {
        let err = ColumnConfig::new("a-1", "history").validate().unwrap_err();
        assert!(err.to_string().contains("a-1.id"));
        assert!(ColumnConfig::new("a\"b", "history").validate().is_err());
        assert!(ColumnConfig::new("cpu_load", "history").validate().is_ok());
    }

    #[test]
    fn test_grid_parse_full() {
        let yaml = r#"
version: 1
columns:
  - id: cpu
    data_index: cpu_history
    sparklineConfig:
      width: "100%"
      chartRangeMin: 0
    globalMaxDataIndex: cpu_peak
  - id: mem
    dataIndex: mem_history
    batch_limit: 4
    sparkline_config:
      width: 24
"#;

        let config = GridConfig::parse(yaml).unwrap();
        assert_eq!(config.columns.len(), 2);

        let cpu = &config.columns[0];
        let shared = cpu.sparkline_config.as_ref().unwrap();
        assert_eq!(shared.width, Some(Dimension::Percent(100.0)));
        assert_eq!(shared.chart_range_min, Some(0.0));
        assert_eq!(cpu.global_max_data_index.as_deref(), Some("cpu_peak"));
        assert_eq!(cpu.batch_limit, DEFAULT_BATCH_LIMIT);

        let mem = &config.columns[1];
        assert_eq!(mem.data_index, "mem_history");
        assert_eq!(mem.batch_limit, 4);
        assert_eq!(mem.sparkline_config.as_ref().unwrap().width, Some(Dimension::Fixed(24)));
    }

    #[test]
    fn test_grid_parse_error_includes_line() {
        let yaml = r#"
version: 1
columns:
  - id: cpu
    data_index: cpu_history
    batch_limit: lots
"#;

        let err = GridConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("6"), "Error should include line number: {err}");
    }

    #[test]
    fn test_grid_parse_rejects_bad_width() {
        let yaml = r#"
columns:
  - id: cpu
    data_index: cpu_history
    sparkline_config:
      width: "half"
"#;
        assert!(GridConfig::parse(yaml).is_err());
    }

    #[test]
    fn test_grid_rejects_duplicate_ids() {
        let yaml = r#"
columns:
  - { id: cpu, data_index: a }
  - { id: cpu, data_index: b }
"#;
        let err = GridConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(ref id) if id == "cpu"));
    }

    #[test]
    fn test_grid_serialize_round_trip() {
        let mut config = GridConfig::new();
        config.columns.push(
            ColumnConfig::new("cpu", "cpu_history")
                .sparkline_config(DrawConfig::new().width(Dimension::Percent(50.0)))
                .global_max("cpu_peak"),
        );

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert_eq!(GridConfig::parse(&yaml).unwrap(), config);
    }

    #[test]
    fn test_grid_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.yaml");
        std::fs::write(&path, "columns:\n  - { id: cpu, data_index: cpu_history }\n").unwrap();

        let config = GridConfig::load(&path).unwrap();
        assert_eq!(config.columns[0].id, "cpu");
    }

    #[test]
    fn test_grid_load_missing_file() {
        let err = GridConfig::load("/nonexistent/grid.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
        assert_eq!(GridConfig::load_or_default("/nonexistent/grid.yaml").version, 1);
    }

    #[test]
    fn test_grid_load_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "expected Io, got {err:?}");
    }
}
