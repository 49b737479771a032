//! Sparkline column: cell marking, deferred batch drawing and the resize hook.
//!
//! Rendering a cell only writes an id attribute into its metadata and queues
//! the value. Charts are drawn later, from a zero-delay task on the host's
//! event loop, at most `batch_limit` cells per task. When more cells remain
//! the column queues a follow-up task, yielding to the event loop in between.
//!
//! ```rust,ignore
//! use sparkgrid::prelude::*;
//!
//! let mut column = SparklineColumn::new(ColumnConfig::new("trend", "history"))?;
//! let mut meta = CellMeta::new();
//! column.render(Some(value), &mut meta, &row, &mut event_loop);
//! // ... later, when the event loop fires the task:
//! column.run_draw_cycle(handle, &store, &mut surface, &mut event_loop);
//! ```

use crate::cell::{CellId, CellMeta, CellValue, RowId};
use crate::config::{ColumnConfig, DrawConfig};
use crate::error::Result;
use crate::host::{DataStore, DrawSurface, TableView, TaskHandle, Timer};
use crate::queue::DrawQueue;
use tracing::{debug, trace, warn};

/// Outcome of one deferred draw cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawReport {
    /// Cells drawn into a live target.
    pub drawn: usize,
    /// Cells processed whose target was no longer attached.
    pub missing: usize,
    /// Cells still queued after this cycle.
    pub remaining: usize,
    /// Shared ceiling applied in this cycle, if one was computed.
    pub ceiling: Option<f64>,
    /// Whether a follow-up cycle was scheduled.
    pub rescheduled: bool,
}

impl DrawReport {
    /// Cells taken off the queue in this cycle.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.drawn + self.missing
    }
}

/// A grid column whose cells show sparklines.
#[derive(Debug)]
pub struct SparklineColumn {
    config: ColumnConfig,
    queue: DrawQueue,
    /// The single outstanding draw task, if any.
    pending: Option<TaskHandle>,
}

impl SparklineColumn {
    /// Creates a column with an empty queue and no pending task.
    ///
    /// Fails if `config` does not validate; a zero batch limit would never
    /// drain the queue.
    pub fn new(config: ColumnConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, queue: DrawQueue::new(), pending: None })
    }

    /// Column identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Record field shown in this column.
    #[must_use]
    pub fn data_index(&self) -> &str {
        &self.config.data_index
    }

    /// Column configuration.
    #[must_use]
    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    /// Cells waiting to be drawn.
    #[must_use]
    pub fn queue(&self) -> &DrawQueue {
        &self.queue
    }

    /// The outstanding draw task, if any.
    #[must_use]
    pub fn pending_task(&self) -> Option<TaskHandle> {
        self.pending
    }

    /// Identifier of this column's cell in `row`.
    #[must_use]
    pub fn cell_id(&self, row: &RowId) -> CellId {
        CellId::new(&self.config.id, row)
    }

    /// Renders a cell synchronously.
    ///
    /// An absent value yields empty markup and queues nothing. Otherwise the
    /// cell id is written into `meta`, the value is queued (replacing any
    /// undrawn value for the same cell without moving it) and a draw task is
    /// requested. The returned markup is always empty; the chart arrives later.
    pub fn render<T: Timer>(
        &mut self,
        value: Option<CellValue>,
        meta: &mut CellMeta,
        row: &RowId,
        timer: &mut T,
    ) -> String {
        let Some(value) = value else {
            return String::new();
        };

        let id = self.cell_id(row);
        meta.td_attr = id.attribute();

        let fresh = self.queue.enqueue(id.clone(), value);
        trace!(column = %self.config.id, cell = %id, fresh, "cell marked");

        self.request_draw(timer);
        String::new()
    }

    /// Ensures exactly one draw task is outstanding.
    pub fn request_draw<T: Timer>(&mut self, timer: &mut T) {
        if self.pending.is_some() {
            return;
        }
        let handle = timer.defer(&self.config.id);
        trace!(column = %self.config.id, %handle, "draw deferred");
        self.pending = Some(handle);
    }

    /// Runs one draw cycle for a fired task.
    ///
    /// Returns `None` if `handle` is not this column's outstanding task; a
    /// stale or cancelled firing touches nothing.
    pub fn run_draw_cycle<S, D, T>(
        &mut self,
        handle: TaskHandle,
        store: &S,
        surface: &mut D,
        timer: &mut T,
    ) -> Option<DrawReport>
    where
        S: DataStore + ?Sized,
        D: DrawSurface + ?Sized,
        T: Timer + ?Sized,
    {
        if self.pending != Some(handle) {
            trace!(column = %self.config.id, %handle, "ignoring stale draw task");
            return None;
        }
        self.pending = None;

        let ceiling = self.config.global_max_data_index.as_deref().map(|field| store.max(field));

        let mut report = DrawReport { ceiling: ceiling.flatten(), ..DrawReport::default() };
        for (id, value) in self.queue.drain_front(self.config.batch_limit) {
            let (points, mut config) = self.resolve(&id, value);
            if let Some(max) = ceiling {
                config.chart_range_max = max;
            }

            match surface.locate(&id) {
                Some(target) => {
                    surface.draw(target, &points, &config);
                    report.drawn += 1;
                }
                None => report.missing += 1,
            }
        }

        report.remaining = self.queue.len();
        if !self.queue.is_empty() {
            self.reschedule(timer);
            report.rescheduled = true;
        }

        debug!(
            column = %self.config.id,
            drawn = report.drawn,
            missing = report.missing,
            remaining = report.remaining,
            "draw cycle"
        );
        Some(report)
    }

    fn reschedule<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        if self.pending.is_none() {
            self.pending = Some(timer.defer(&self.config.id));
        }
    }

    /// Picks the points and configuration a cell is drawn with.
    fn resolve(&self, id: &CellId, value: CellValue) -> (Vec<f64>, DrawConfig) {
        if let Some(shared) = &self.config.sparkline_config {
            return (value.into_parts().0, shared.clone());
        }
        match value.into_parts() {
            (points, Some(config)) => (points, config),
            (points, None) => {
                warn!(
                    column = %self.config.id,
                    cell = %id,
                    "cell value has no draw config and column has no shared config"
                );
                (points, DrawConfig::default())
            }
        }
    }

    /// Handles a column-resize notification from the header container.
    ///
    /// Charts with a fixed declared width are unaffected. Otherwise every
    /// row in the store is refreshed, which re-marks its cell. Returns the
    /// number of rows refreshed.
    pub fn on_column_resize<S, V>(&self, store: &S, view: &mut V) -> usize
    where
        S: DataStore + ?Sized,
        V: TableView + ?Sized,
    {
        if self.config.sparkline_config.as_ref().is_some_and(DrawConfig::has_fixed_width) {
            trace!(column = %self.config.id, "fixed-width charts, resize ignored");
            return 0;
        }

        let rows = store.row_ids();
        for row in &rows {
            view.refresh_cell(row, &self.config.data_index);
        }
        debug!(column = %self.config.id, rows = rows.len(), "resize re-mark");
        rows.len()
    }

    /// Tears the column down, cancelling its outstanding task.
    pub fn destroy<T: Timer + ?Sized>(mut self, timer: &mut T) {
        if let Some(handle) = self.pending.take() {
            timer.cancel(handle);
            trace!(column = %self.config.id, %handle, "draw task cancelled");
        }
        self.queue.clear();
    }
}
