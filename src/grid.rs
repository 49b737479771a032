//! Grid host wiring columns to a store, a surface and an event loop.
//!
//! The grid plays the parts a table widget plays for a sparkline column:
//! it runs the synchronous render pass, attaches rendered cells to the
//! surface, forwards header-container resize notifications, re-renders cells
//! on request and fires deferred tasks.
//!
//! ```rust,ignore
//! use sparkgrid::prelude::*;
//!
//! let store: RecordStore = records.into_iter().collect();
//! let mut grid = Grid::new(store);
//! grid.add_column(ColumnConfig::new("trend", "history").sparkline_config(DrawConfig::new()))?;
//! grid.render_rows();
//! grid.run_until_idle();
//! println!("{:?}", grid.cell_text("trend", &RowId::from(1)));
//! ```

use crate::cell::{CellMeta, RowId};
use crate::column::{DrawReport, SparklineColumn};
use crate::config::{ColumnConfig, GridConfig};
use crate::error::{Error, Result};
use crate::host::TableView;
use crate::runtime::EventLoop;
use crate::store::{FieldValue, RecordStore};
use crate::surface::TextSurface;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Output of rendering one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    /// Column the cell belongs to.
    pub column: String,
    /// Markup returned by the column renderer.
    pub markup: String,
    /// Metadata the renderer wrote.
    pub meta: CellMeta,
}

/// Output of rendering one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Row identity.
    pub row: RowId,
    /// Cells in column order.
    pub cells: Vec<RenderedCell>,
}

/// Refresh calls collected while a column handles a resize.
#[derive(Debug, Default)]
struct RefreshRequests(Vec<(RowId, String)>);

impl TableView for RefreshRequests {
    fn refresh_cell(&mut self, row: &RowId, data_index: &str) {
        self.0.push((row.clone(), data_index.to_string()));
    }
}

/// A data grid with sparkline columns.
#[derive(Debug, Default)]
pub struct Grid {
    store: RecordStore,
    columns: Vec<SparklineColumn>,
    surface: TextSurface,
    event_loop: EventLoop,
}

impl Grid {
    /// Creates a grid over `store` with no columns.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self { store, ..Self::default() }
    }

    /// Creates a grid with every column from `config`.
    pub fn from_config(config: &GridConfig, store: RecordStore) -> Result<Self> {
        config.validate()?;
        let mut grid = Self::new(store);
        for column in &config.columns {
            grid.add_column(column.clone())?;
        }
        Ok(grid)
    }

    /// Attaches a column.
    pub fn add_column(&mut self, config: ColumnConfig) -> Result<()> {
        let column = SparklineColumn::new(config)?;
        if self.column(column.id()).is_some() {
            return Err(Error::DuplicateColumn(column.id().to_string()));
        }
        debug!(column = %column.id(), data_index = %column.data_index(), "column added");
        self.columns.push(column);
        Ok(())
    }

    /// Tears a column down: its pending draw is cancelled and its cells detached.
    pub fn remove_column(&mut self, id: &str) -> Result<()> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| Error::UnknownColumn(id.to_string()))?;

        let column = self.columns.remove(index);
        column.destroy(&mut self.event_loop);
        self.surface.detach_column(id);
        debug!(column = %id, "column removed");
        Ok(())
    }

    /// Looks up a column.
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&SparklineColumn> {
        self.columns.iter().find(|c| c.id() == id)
    }

    /// Columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = &SparklineColumn> {
        self.columns.iter()
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The record store, for updates. Follow up with [`Grid::refresh_cell`]
    /// or [`Grid::render_rows`] to re-mark changed cells.
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// The drawing surface.
    #[must_use]
    pub fn surface(&self) -> &TextSurface {
        &self.surface
    }

    /// The drawing surface, e.g. to detach scrolled-away cells.
    pub fn surface_mut(&mut self) -> &mut TextSurface {
        &mut self.surface
    }

    /// The deferred task loop.
    #[must_use]
    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Synchronously renders every row of the store.
    pub fn render_rows(&mut self) -> Vec<RenderedRow> {
        let rows = self.store.iter().map(|r| r.id().clone()).collect::<Vec<_>>();
        rows.into_iter()
            .map(|row| {
                let cells = (0..self.columns.len()).map(|i| self.render_cell(i, &row)).collect();
                RenderedRow { row, cells }
            })
            .collect()
    }

    /// Re-renders every cell of `row` whose column shows `data_index`.
    ///
    /// Returns the number of cells rendered.
    pub fn refresh_cell(&mut self, row: &RowId, data_index: &str) -> usize {
        let mut rendered = 0;
        for index in 0..self.columns.len() {
            if self.columns[index].data_index() == data_index {
                self.render_cell(index, row);
                rendered += 1;
            }
        }
        rendered
    }

    fn render_cell(&mut self, index: usize, row: &RowId) -> RenderedCell {
        let column = &mut self.columns[index];
        let value = self
            .store
            .get(row)
            .and_then(|record| record.get(column.data_index()))
            .and_then(FieldValue::to_cell_value);

        let mut meta = CellMeta::new();
        let markup = column.render(value, &mut meta, row, &mut self.event_loop);

        match meta.cell_id() {
            Some(id) => self.surface.attach(column.id(), id),
            None => {
                self.surface.detach(&column.cell_id(row));
            }
        }

        RenderedCell { column: column.id().to_string(), markup, meta }
    }

    /// Resizes a column and notifies every column of the resize.
    ///
    /// Returns the number of cells re-rendered.
    pub fn resize_column(&mut self, id: &str, width: u16) -> Result<usize> {
        if self.column(id).is_none() {
            return Err(Error::UnknownColumn(id.to_string()));
        }
        self.surface.set_column_width(id, width);
        Ok(self.notify_column_resize())
    }

    /// Delivers a header-container resize notification to every column.
    ///
    /// Each requested (row, field) pair is refreshed once, even when several
    /// columns show the same field. Returns the number of cells re-rendered.
    pub fn notify_column_resize(&mut self) -> usize {
        let mut requests = RefreshRequests::default();
        for column in &self.columns {
            column.on_column_resize(&self.store, &mut requests);
        }

        let mut seen = HashSet::new();
        requests
            .0
            .into_iter()
            .filter(|request| seen.insert(request.clone()))
            .map(|(row, data_index)| self.refresh_cell(&row, &data_index))
            .sum()
    }

    /// Fires the next deferred task, returning the owning column and its report.
    ///
    /// Tasks whose column is gone, or that the column no longer expects,
    /// are dropped. Returns `None` once the loop is idle.
    pub fn run_pending(&mut self) -> Option<(String, DrawReport)> {
        while let Some(task) = self.event_loop.next_ready() {
            let Some(column) = self.columns.iter_mut().find(|c| c.id() == task.owner) else {
                trace!(owner = %task.owner, "draw task for detached column");
                continue;
            };
            if let Some(report) =
                column.run_draw_cycle(task.handle, &self.store, &mut self.surface, &mut self.event_loop)
            {
                return Some((task.owner, report));
            }
        }
        None
    }

    /// Fires deferred tasks until none remain.
    pub fn run_until_idle(&mut self) -> Vec<(String, DrawReport)> {
        std::iter::from_fn(|| self.run_pending()).collect()
    }

    /// Drawn sparkline text of a cell.
    #[must_use]
    pub fn cell_text(&self, column: &str, row: &RowId) -> Option<&str> {
        let column = self.column(column)?;
        self.surface.text(&column.cell_id(row))
    }
}
