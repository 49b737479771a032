//! Terminal table widget for a [`Grid`].
//!
//! Draws a header row of column ids followed by one line per record: the row
//! id, then each column's drawn sparkline. Cells still waiting for their
//! deferred draw are left blank.

use crate::grid::Grid;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// Width of the leading row-id column.
const ROW_LABEL_WIDTH: u16 = 8;

/// A scrollable view of a grid's sparkline columns.
#[derive(Debug, Clone, Copy)]
pub struct SparkTable<'a> {
    grid: &'a Grid,
    /// First record shown.
    offset: usize,
    /// Color of drawn sparklines.
    color: Color,
}

impl<'a> SparkTable<'a> {
    /// Creates a table over `grid`.
    #[must_use]
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid, offset: 0, color: Color::Cyan }
    }

    /// Scrolls to the given first record.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset.min(self.grid.store().len().saturating_sub(1));
        self
    }

    /// Sets the sparkline color.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for SparkTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let right = area.x.saturating_add(area.width);
        let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

        let mut x = area.x.saturating_add(ROW_LABEL_WIDTH);
        for column in self.grid.columns() {
            if x >= right {
                break;
            }
            let width = self.grid.surface().column_width(column.id());
            let text: String =
                column.id().chars().take(usize::from(width.min(right - x))).collect();
            buf.set_string(x, area.y, text, header_style);
            x = x.saturating_add(width).saturating_add(1);
        }

        let visible_height = usize::from(area.height - 1);
        let records = self.grid.store().iter().skip(self.offset).take(visible_height);

        for (i, record) in records.enumerate() {
            let y = area.y + 1 + i as u16;

            let label: String = record
                .id()
                .as_str()
                .chars()
                .take(usize::from(ROW_LABEL_WIDTH.saturating_sub(1).min(area.width)))
                .collect();
            buf.set_string(area.x, y, label, Style::default().fg(Color::DarkGray));

            let mut x = area.x.saturating_add(ROW_LABEL_WIDTH);
            for column in self.grid.columns() {
                if x >= right {
                    break;
                }
                let width = self.grid.surface().column_width(column.id());
                if let Some(text) = self.grid.cell_text(column.id(), record.id()) {
                    let truncated: String =
                        text.chars().take(usize::from(width.min(right - x))).collect();
                    buf.set_string(x, y, truncated, Style::default().fg(self.color));
                }
                x = x.saturating_add(width).saturating_add(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnConfig, DrawConfig};
    use crate::store::{Record, RecordStore};

    fn drawn_grid() -> Grid {
        let store: RecordStore = (0..3u64)
            .map(|i| Record::new(i).field("history", vec![1.0, 2.0, 3.0, 4.0]))
            .collect();
        let mut grid = Grid::new(store);
        grid.add_column(ColumnConfig::new("trend", "history").sparkline_config(DrawConfig::new()))
            .unwrap();
        grid.surface_mut().set_column_width("trend", 4);
        grid.render_rows();
        grid.run_until_idle();
        grid
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_renders_header_and_sparklines() {
        let grid = drawn_grid();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);

        SparkTable::new(&grid).render(area, &mut buf);

        assert!(line(&buf, 0).contains("trend"));
        assert!(line(&buf, 1).starts_with('0'));
        assert!(line(&buf, 1).contains("▁▃▆█"));
        assert!(line(&buf, 3).contains("▁▃▆█"));
    }

    #[test]
    fn test_offset_skips_records() {
        let grid = drawn_grid();
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);

        SparkTable::new(&grid).offset(2).render(area, &mut buf);

        assert!(line(&buf, 1).starts_with('2'));
    }

    #[test]
    fn test_empty_area_is_noop() {
        let grid = drawn_grid();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        SparkTable::new(&grid).render(area, &mut buf);
    }

    #[test]
    fn test_undrawn_cells_are_blank() {
        let store: RecordStore =
            std::iter::once(Record::new(1u64).field("history", vec![1.0, 2.0])).collect();
        let mut grid = Grid::new(store);
        grid.add_column(ColumnConfig::new("trend", "history").sparkline_config(DrawConfig::new()))
            .unwrap();
        grid.render_rows();

        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        SparkTable::new(&grid).render(area, &mut buf);

        assert_eq!(line(&buf, 1).trim(), "1");
    }
}
