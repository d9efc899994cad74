//! In-memory service queue.
//!
//! Prospects are appended here every time they are created or updated so an
//! attendant can pick them up in arrival order. The queue lives only as long
//! as the process and is never persisted.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::models::Prospect;

/// FIFO of prospect snapshots shared by every request handler.
#[derive(Debug, Default)]
pub struct ServiceQueue {
    entries: Mutex<VecDeque<Prospect>>,
}

impl ServiceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Prospect>> {
        // Every critical section is a single deque call; poisoning is ignored.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends a snapshot of `prospect` to the tail.
    pub fn enqueue(&self, prospect: Prospect) {
        let mut entries = self.lock();
        entries.push_back(prospect);
        tracing::debug!("Service queue size after enqueue: {}", entries.len());
    }

    /// Head-to-tail copy of the queue. Later mutations do not affect it.
    pub fn snapshot(&self) -> Vec<Prospect> {
        self.lock().iter().cloned().collect()
    }

    /// Removes and returns the head, or `None` when the queue is empty.
    pub fn poll(&self) -> Option<Prospect> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::prospect_with_id;
    use std::sync::Arc;

    #[test]
    fn poll_on_empty_queue_returns_none() {
        let queue = ServiceQueue::new();
        assert!(queue.poll().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn preserves_fifo_order() {
        let queue = ServiceQueue::new();
        for id in 1..=3 {
            queue.enqueue(prospect_with_id(id));
        }

        let polled: Vec<_> = std::iter::from_fn(|| queue.poll())
            .map(|p| p.id)
            .collect();
        assert_eq!(polled, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn snapshot_matches_poll_sequence_without_consuming() {
        let queue = ServiceQueue::new();
        queue.enqueue(prospect_with_id(7));
        queue.enqueue(prospect_with_id(8));

        let snapshot = queue.snapshot();
        assert_eq!(queue.len(), 2);

        let polled: Vec<_> = std::iter::from_fn(|| queue.poll()).collect();
        assert_eq!(snapshot, polled);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let queue = ServiceQueue::new();
        queue.enqueue(prospect_with_id(1));

        let snapshot = queue.snapshot();
        queue.enqueue(prospect_with_id(2));
        queue.poll();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, Some(1));
    }

    #[test]
    fn same_prospect_may_be_queued_twice() {
        let queue = ServiceQueue::new();
        queue.enqueue(prospect_with_id(1));
        queue.enqueue(prospect_with_id(1));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        let queue = Arc::new(ServiceQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        queue.enqueue(prospect_with_id(worker * 1000 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.len(), 200);

        // Per-producer order survives interleaving
        let snapshot = queue.snapshot();
        for worker in 0..4 {
            let ids: Vec<i64> = snapshot
                .iter()
                .filter_map(|p| p.id)
                .filter(|id| id / 1000 == worker)
                .collect();
            let mut sorted = ids.clone();
            sorted.sort();
            assert_eq!(ids, sorted);
        }
    }
}
