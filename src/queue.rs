//! FIFO draw queue with per-cell payloads.
//!
//! Key properties:
//!
//! - **First-mark order**: cells are drawn in the order they were first marked
//! - **No duplicates**: an id occupies at most one slot in the ordering
//! - **Latest value wins**: re-marking a pending cell replaces its payload in place
//! - **Paired removal**: an id leaves the ordering and the payload map together

use crate::cell::{CellId, CellValue};
use std::collections::{HashMap, VecDeque};

/// Pending cells of one column, in first-marked order.
#[derive(Debug, Clone, Default)]
pub struct DrawQueue {
    /// Ids awaiting a draw, oldest first.
    order: VecDeque<CellId>,
    /// Latest payload for every id in `order`.
    payloads: HashMap<CellId, CellValue>,
}

impl DrawQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `id`, appending the id only if it is not already queued.
    ///
    /// Returns true if the id took a new slot.
    pub fn enqueue(&mut self, id: CellId, value: CellValue) -> bool {
        if let Some(slot) = self.payloads.get_mut(&id) {
            *slot = value;
            return false;
        }
        self.order.push_back(id.clone());
        self.payloads.insert(id, value);
        debug_assert_eq!(self.order.len(), self.payloads.len());
        true
    }

    /// Removes up to `limit` cells from the front, oldest first.
    pub fn drain_front(&mut self, limit: usize) -> Vec<(CellId, CellValue)> {
        let count = limit.min(self.order.len());
        let mut batch = Vec::with_capacity(count);
        for id in self.order.drain(..count) {
            if let Some(value) = self.payloads.remove(&id) {
                batch.push((id, value));
            }
        }
        batch
    }

    /// Returns the pending payload for `id`.
    #[must_use]
    pub fn get(&self, id: &CellId) -> Option<&CellValue> {
        self.payloads.get(id)
    }

    /// Returns true if `id` is waiting to be drawn.
    #[must_use]
    pub fn contains(&self, id: &CellId) -> bool {
        self.payloads.contains_key(id)
    }

    /// Position of `id` in draw order.
    #[must_use]
    pub fn position(&self, id: &CellId) -> Option<usize> {
        self.order.iter().position(|queued| queued == id)
    }

    /// Pending ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &CellId> {
        self.order.iter()
    }

    /// Number of pending cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drops every pending cell.
    pub fn clear(&mut self) {
        self.order.clear();
        self.payloads.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::RowId;

    fn id(row: u64) -> CellId {
        CellId::new("col", &RowId::from(row))
    }

    fn points(v: f64) -> CellValue {
        CellValue::Direct(vec![v])
    }

    #[test]
    fn test_enqueue_preserves_fifo() {
        let mut queue = DrawQueue::new();
        for row in 0..5 {
            assert!(queue.enqueue(id(row), points(row as f64)));
        }
        let order: Vec<_> = queue.ids().cloned().collect();
        assert_eq!(order, (0..5).map(id).collect::<Vec<_>>());
    }

    #[test]
    fn test_remark_overwrites_in_place() {
        let mut queue = DrawQueue::new();
        queue.enqueue(id(1), points(1.0));
        queue.enqueue(id(2), points(2.0));

        assert!(!queue.enqueue(id(1), points(9.0)));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.position(&id(1)), Some(0));
        assert_eq!(queue.get(&id(1)), Some(&points(9.0)));
    }

    #[test]
    fn test_drain_front_is_bounded() {
        let mut queue = DrawQueue::new();
        for row in 0..13 {
            queue.enqueue(id(row), points(row as f64));
        }

        let batch = queue.drain_front(10);
        assert_eq!(batch.len(), 10);
        assert_eq!(batch[0].0, id(0));
        assert_eq!(batch[9].0, id(9));
        assert_eq!(queue.len(), 3);
        assert!(!queue.contains(&id(0)));
        assert!(queue.contains(&id(10)));
    }

    #[test]
    fn test_drain_more_than_available() {
        let mut queue = DrawQueue::new();
        queue.enqueue(id(1), points(1.0));
        assert_eq!(queue.drain_front(10).len(), 1);
        assert!(queue.is_empty());
        assert!(queue.drain_front(10).is_empty());
    }

    #[test]
    fn test_requeue_after_drain_takes_new_slot() {
        let mut queue = DrawQueue::new();
        queue.enqueue(id(1), points(1.0));
        queue.enqueue(id(2), points(2.0));
        queue.drain_front(1);

        assert!(queue.enqueue(id(1), points(3.0)));
        assert_eq!(queue.position(&id(1)), Some(1));
    }

    #[test]
    fn test_clear() {
        let mut queue = DrawQueue::new();
        queue.enqueue(id(1), points(1.0));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.get(&id(1)), None);
    }
}
