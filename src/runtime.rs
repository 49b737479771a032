//! Single-threaded deferred task loop.
//!
//! Tasks are zero-delay: they run in the order they were deferred, after the
//! synchronous work that deferred them returns control to the loop.

use crate::host::{TaskHandle, Timer};
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// A deferred task ready to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyTask {
    /// Handle returned when the task was deferred.
    pub handle: TaskHandle,
    /// Owner named when the task was deferred.
    pub owner: String,
}

/// FIFO of zero-delay tasks with cancellation.
#[derive(Debug, Default)]
pub struct EventLoop {
    next_id: u64,
    tasks: VecDeque<ReadyTask>,
    cancelled: HashSet<TaskHandle>,
}

impl EventLoop {
    /// Creates an idle loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the next task that has not been cancelled.
    pub fn next_ready(&mut self) -> Option<ReadyTask> {
        while let Some(task) = self.tasks.pop_front() {
            if !self.cancelled.remove(&task.handle) {
                return Some(task);
            }
            trace!(handle = %task.handle, owner = %task.owner, "skipping cancelled task");
        }
        None
    }

    /// Number of live tasks waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !self.cancelled.contains(&t.handle)).count()
    }

    /// Returns true if no live task is waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

impl Timer for EventLoop {
    fn defer(&mut self, owner: &str) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle::new(self.next_id);
        self.tasks.push_back(ReadyTask { handle, owner: owner.to_string() });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.tasks.iter().any(|t| t.handle == handle) {
            self.cancelled.insert(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_defer_order() {
        let mut event_loop = EventLoop::new();
        let a = event_loop.defer("a");
        let b = event_loop.defer("b");

        assert_eq!(event_loop.next_ready().map(|t| t.handle), Some(a));
        let second = event_loop.next_ready().unwrap();
        assert_eq!(second.handle, b);
        assert_eq!(second.owner, "b");
        assert!(event_loop.next_ready().is_none());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut event_loop = EventLoop::new();
        let a = event_loop.defer("a");
        let b = event_loop.defer("b");
        event_loop.cancel(a);

        assert_eq!(event_loop.pending(), 1);
        assert_eq!(event_loop.next_ready().map(|t| t.handle), Some(b));
        assert!(event_loop.is_idle());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut event_loop = EventLoop::new();
        let a = event_loop.defer("a");
        event_loop.next_ready();
        event_loop.cancel(a);
        assert!(event_loop.cancelled.is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut event_loop = EventLoop::new();
        let a = event_loop.defer("a");
        let b = event_loop.defer("a");
        assert_ne!(a, b);
    }
}
