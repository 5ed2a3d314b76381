//! Bounded priority queue of pending activations.
//!
//! The queue is the single piece of state shared between the dispatch
//! loop, the currently executing cell, and any external producer, so
//! enqueue/dequeue must be safe under concurrent use. Capacity is
//! enforced with a semaphore: `push` suspends the caller while the queue
//! is full (backpressure), `try_pop` frees a slot on success.
//!
//! Ordering: lowest priority value first. Among equal priorities a
//! monotonic sequence number assigned at enqueue time breaks the tie, so
//! equal-priority activations dequeue FIFO.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use tokio::sync::Semaphore;

use crate::activation::Activation;

/// Heap entry: activation plus its enqueue sequence number.
struct Entry {
    activation: Activation,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.activation.priority == other.activation.priority && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    // BinaryHeap is a max-heap; reverse both keys so the smallest
    // (priority, seq) pair surfaces first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .activation
            .priority
            .cmp(&self.activation.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded, priority-ordered activation queue.
pub struct ActivationQueue {
    heap: Mutex<BinaryHeap<Entry>>,
    /// Free slots; a permit is held for every queued activation.
    slots: Semaphore,
    seq: AtomicU64,
    capacity: usize,
}

impl ActivationQueue {
    /// Create a queue holding at most `capacity` pending activations.
    /// Capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            slots: Semaphore::new(capacity),
            seq: AtomicU64::new(0),
            capacity,
        }
    }

    /// Enqueue an activation, suspending the caller while the queue is
    /// at capacity.
    pub async fn push(&self, activation: Activation) {
        let permit = self
            .slots
            .acquire()
            .await
            .expect("queue semaphore is never closed");
        permit.forget();
        self.insert(activation);
    }

    /// Non-blocking enqueue. Returns the activation back if the queue is
    /// at capacity.
    pub fn try_push(&self, activation: Activation) -> Result<(), Activation> {
        match self.slots.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.insert(activation);
                Ok(())
            }
            Err(_) => Err(activation),
        }
    }

    /// Dequeue the pending activation with the lowest priority value, or
    /// `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<Activation> {
        let popped = self.lock().pop();
        if let Some(entry) = popped {
            self.slots.add_permits(1);
            Some(entry.activation)
        } else {
            None
        }
    }

    /// Number of pending activations.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue holds no pending activations.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn insert(&self, activation: Activation) {
        let seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
        self.lock().push(Entry { activation, seq });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BinaryHeap<Entry>> {
        // The heap is only touched in short, non-panicking sections.
        self.heap.lock().expect("queue mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn act(cell: &str, priority: u32) -> Activation {
        Activation::new(cell).with_priority(priority)
    }

    #[tokio::test]
    async fn pops_lowest_priority_value_first() {
        let q = ActivationQueue::new(10);
        q.push(act("low", 999)).await;
        q.push(act("high", 0)).await;
        q.push(act("mid", 5)).await;

        assert_eq!(q.try_pop().unwrap().cell, "high");
        assert_eq!(q.try_pop().unwrap().cell, "mid");
        assert_eq!(q.try_pop().unwrap().cell, "low");
        assert!(q.try_pop().is_none());
    }

    #[tokio::test]
    async fn equal_priorities_dequeue_fifo() {
        let q = ActivationQueue::new(10);
        for name in ["a", "b", "c"] {
            q.push(act(name, 7)).await;
        }

        assert_eq!(q.try_pop().unwrap().cell, "a");
        assert_eq!(q.try_pop().unwrap().cell, "b");
        assert_eq!(q.try_pop().unwrap().cell, "c");
    }

    #[tokio::test]
    async fn try_push_rejects_when_full() {
        let q = ActivationQueue::new(2);
        assert!(q.try_push(act("a", 1)).is_ok());
        assert!(q.try_push(act("b", 1)).is_ok());

        let rejected = q.try_push(act("c", 1)).unwrap_err();
        assert_eq!(rejected.cell, "c");
        assert_eq!(q.len(), 2);
    }

    #[tokio::test]
    async fn push_applies_backpressure_until_a_slot_frees() {
        let q = std::sync::Arc::new(ActivationQueue::new(1));
        q.push(act("first", 1)).await;

        // A second push must suspend while the queue is full.
        let blocked = tokio::time::timeout(Duration::from_millis(50), q.push(act("second", 1)));
        assert!(blocked.await.is_err(), "push should block on a full queue");

        // Freeing a slot lets the push complete.
        let producer = {
            let q = q.clone();
            tokio::spawn(async move { q.push(act("second", 1)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(q.try_pop().unwrap().cell, "first");

        tokio::time::timeout(Duration::from_secs(1), producer)
            .await
            .expect("push should complete once a slot frees")
            .unwrap();
        assert_eq!(q.try_pop().unwrap().cell, "second");
    }

    #[test]
    fn capacity_is_clamped_to_one() {
        let q = ActivationQueue::new(0);
        assert_eq!(q.capacity(), 1);
        assert!(q.try_push(act("a", 1)).is_ok());
        assert!(q.try_push(act("b", 1)).is_err());
    }
}
