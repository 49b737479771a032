//! Text drawing surface with Unicode block sparklines.
//!
//! Cells become addressable when a rendered row is attached and stop being
//! addressable when detached (scrolled away, row removed). Drawing into a
//! cell stores its sparkline text: `▁▂▃▄▅▆▇█`.

use crate::cell::CellId;
use crate::config::DrawConfig;
use crate::host::DrawSurface;
use std::collections::HashMap;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Column width used until the host sets one.
pub const DEFAULT_COLUMN_WIDTH: u16 = 20;

/// Renders `values` as a block sparkline of at most `width` characters.
///
/// The value range defaults to the data extent; `range_min`/`range_max`
/// override either end and values outside the range are clamped.
/// Non-finite values render as blanks.
#[must_use]
pub fn render_sparkline(
    values: &[f64],
    width: usize,
    range_min: Option<f64>,
    range_max: Option<f64>,
) -> String {
    let finite = || values.iter().copied().filter(|v| v.is_finite());
    if width == 0 || finite().next().is_none() {
        return " ".repeat(width);
    }

    let min = range_min.unwrap_or_else(|| finite().fold(f64::INFINITY, f64::min));
    let max = range_max.unwrap_or_else(|| finite().fold(f64::NEG_INFINITY, f64::max));
    let range = (max - min).max(1e-10);

    let sample_width = width.min(values.len());
    (0..sample_width)
        .map(|i| {
            let v = values[i * values.len() / sample_width];
            if !v.is_finite() {
                return ' ';
            }
            let norm = ((v - min) / range * 7.0).round().clamp(0.0, 7.0) as usize;
            BARS[norm]
        })
        .collect()
}

/// Live cell resolved by [`TextSurface::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSlot {
    id: CellId,
    column_width: u16,
}

#[derive(Debug, Clone)]
struct AttachedCell {
    column: String,
    text: Option<String>,
}

/// In-memory surface of attached cells and their drawn sparklines.
#[derive(Debug, Default)]
pub struct TextSurface {
    cells: HashMap<CellId, AttachedCell>,
    column_widths: HashMap<String, u16>,
    draws: usize,
}

impl TextSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a rendered cell addressable. Re-attaching keeps drawn text.
    pub fn attach(&mut self, column: &str, id: CellId) {
        self.cells
            .entry(id)
            .or_insert_with(|| AttachedCell { column: column.to_string(), text: None });
    }

    /// Removes a cell from the surface.
    pub fn detach(&mut self, id: &CellId) -> bool {
        self.cells.remove(id).is_some()
    }

    /// Removes every cell belonging to `column`.
    pub fn detach_column(&mut self, column: &str) {
        self.cells.retain(|_, cell| cell.column != column);
    }

    /// Returns true if `id` is attached.
    #[must_use]
    pub fn is_attached(&self, id: &CellId) -> bool {
        self.cells.contains_key(id)
    }

    /// Sets the width of a column in character cells.
    pub fn set_column_width(&mut self, column: &str, width: u16) {
        self.column_widths.insert(column.to_string(), width);
    }

    /// Width of a column in character cells.
    #[must_use]
    pub fn column_width(&self, column: &str) -> u16 {
        self.column_widths.get(column).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Drawn sparkline text of a cell, if it has been drawn.
    #[must_use]
    pub fn text(&self, id: &CellId) -> Option<&str> {
        self.cells.get(id)?.text.as_deref()
    }

    /// Total number of draw calls served.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draws
    }
}

impl DrawSurface for TextSurface {
    type Target = CellSlot;

    fn locate(&mut self, id: &CellId) -> Option<CellSlot> {
        let cell = self.cells.get(id)?;
        Some(CellSlot { id: id.clone(), column_width: self.column_width(&cell.column) })
    }

    fn draw(&mut self, target: CellSlot, points: &[f64], config: &DrawConfig) {
        let width = config
            .width
            .map_or(target.column_width, |w| w.resolve(target.column_width));
        let text = render_sparkline(
            points,
            usize::from(width),
            config.chart_range_min,
            config.chart_range_max,
        );
        if let Some(cell) = self.cells.get_mut(&target.id) {
            cell.text = Some(text);
            self.draws += 1;
        }
    }
}
