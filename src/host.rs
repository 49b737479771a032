//! Collaborator seams between a sparkline column and its host grid.
//!
//! A column never owns the grid, the data store, the drawing surface or the
//! event loop. It reaches them only through these traits, which keeps the
//! scheduler independent of any particular UI toolkit. The crate ships one
//! implementation of each ([`RecordStore`](crate::store::RecordStore),
//! [`TextSurface`](crate::surface::TextSurface),
//! [`EventLoop`](crate::runtime::EventLoop), [`Grid`](crate::grid::Grid)).

use crate::cell::{CellId, RowId};
use crate::config::DrawConfig;
use std::fmt;

/// Read access to the records loaded into a grid.
pub trait DataStore {
    /// Ids of every loaded record, in store order.
    fn row_ids(&self) -> Vec<RowId>;

    /// Maximum numeric value of `field` across all loaded records.
    ///
    /// Returns `None` when no record holds a numeric value for the field.
    fn max(&self, field: &str) -> Option<f64>;
}

/// The table view's per-cell update machinery.
pub trait TableView {
    /// Re-renders the cell showing `data_index` for `row`.
    fn refresh_cell(&mut self, row: &RowId, data_index: &str);
}

/// Where charts end up.
///
/// Lookup and drawing are separate so that a cell which left the view
/// between marking and drawing is simply not found.
pub trait DrawSurface {
    /// Resolved handle to a live cell.
    type Target;

    /// Finds the live cell carrying `id`, if it is still attached.
    fn locate(&mut self, id: &CellId) -> Option<Self::Target>;

    /// Draws `points` into `target` using `config`.
    fn draw(&mut self, target: Self::Target, points: &[f64], config: &DrawConfig);
}

/// Zero-delay deferred execution on the host's event loop.
pub trait Timer {
    /// Queues a task for `owner` to run once the current synchronous work ends.
    fn defer(&mut self, owner: &str) -> TaskHandle;

    /// Cancels a queued task. Cancelling a fired or unknown task is a no-op.
    fn cancel(&mut self, handle: TaskHandle);
}

/// Handle to one deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wraps a raw task number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw task number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_handle_display() {
        assert_eq!(TaskHandle::new(3).to_string(), "task#3");
        assert_eq!(TaskHandle::new(3).get(), 3);
    }
}
