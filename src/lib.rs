//! # sparkgrid
//!
//! Deferred, batched sparkline drawing for data-grid columns.
//!
//! Rendering a grid row must stay synchronous and cheap, but drawing a chart
//! needs the cell to exist on screen. A [`SparklineColumn`] splits the two:
//! rendering only tags the cell with a stable id and queues its value; a
//! zero-delay task drawn from the host's event loop later draws at most ten
//! queued charts, then yields and reschedules itself until the queue is empty.
//!
//! ## Features
//!
//! - **One task per column**: marking many cells coalesces into one deferred draw
//! - **Bounded cycles**: each cycle draws a fixed batch so the UI stays responsive
//! - **Latest value wins**: re-rendering a pending cell updates it without reordering
//! - **Shared ceilings**: a column can scale every chart to a store-wide maximum
//! - **Resize aware**: percentage-width charts are re-marked when columns resize
//! - **Safe teardown**: a destroyed column's pending draw never fires
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sparkgrid::prelude::*;
//!
//! let store: RecordStore = [
//!     Record::new(1u64).field("history", vec![3.0, 1.0, 4.0]).field("peak", 4.0),
//!     Record::new(2u64).field("history", vec![1.0, 5.0, 9.0]).field("peak", 9.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut grid = Grid::new(store);
//! grid.add_column(
//!     ColumnConfig::new("trend", "history")
//!         .sparkline_config(DrawConfig::new().width("100%".parse()?))
//!         .global_max("peak"),
//! )?;
//!
//! grid.render_rows();     // synchronous pass: ids + queue, no drawing
//! grid.run_until_idle();  // deferred cycles: charts appear
//! ```
//!
//! ## Feature Flags
//!
//! - `tui`: [`SparkTable`](widget::SparkTable), a ratatui widget for grids

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Cell identity, payloads and render metadata.
pub mod cell;

/// Column and grid configuration.
pub mod config;

/// Collaborator traits between columns and their host.
pub mod host;

/// FIFO draw queue.
pub mod queue;

/// Sparkline column: marker, scheduler and resize hook.
pub mod column;

// ============================================================================
// Host Implementations
// ============================================================================

/// In-memory record store.
pub mod store;

/// Single-threaded deferred task loop.
pub mod runtime;

/// Text drawing surface.
pub mod surface;

/// Grid host.
pub mod grid;

/// Terminal table widget.
#[cfg(feature = "tui")]
#[cfg_attr(docsrs, doc(cfg(feature = "tui")))]
pub mod widget;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for sparkgrid operations.
pub mod error;

pub use cell::{CellId, CellMeta, CellValue, RowId, CELL_ID_SEPARATOR};
pub use column::{DrawReport, SparklineColumn};
pub use config::{ColumnConfig, Dimension, DrawConfig, GridConfig, DEFAULT_BATCH_LIMIT};
pub use error::{Error, Result};
pub use grid::Grid;

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use sparkgrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cell::{CellId, CellMeta, CellValue, RowId};
    pub use crate::column::{DrawReport, SparklineColumn};
    pub use crate::config::{ColumnConfig, Dimension, DrawConfig, GridConfig};
    pub use crate::error::{Error, Result};
    pub use crate::grid::Grid;
    pub use crate::host::{DataStore, DrawSurface, TableView, TaskHandle, Timer};
    pub use crate::queue::DrawQueue;
    pub use crate::runtime::EventLoop;
    pub use crate::store::{FieldValue, Record, RecordStore};
    pub use crate::surface::TextSurface;
    #[cfg(feature = "tui")]
    pub use crate::widget::SparkTable;
}
