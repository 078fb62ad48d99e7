//! Multi-producer event queue feeding the single detection task.
//!
//! Producers (sensor feeds, social scrapers, webhook handlers) may push from
//! any thread; exactly one consumer drains the queue, which serializes all
//! access to the detection engine's window state. Backpressure is signalled
//! by `EventError::QueueFull` rather than blocking the producer.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::SegQueue;
use thiserror::Error;

use super::DisasterEvent;

/// Event bus error conditions.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EventError {
    #[error("Event queue capacity exceeded")]
    QueueFull,
    #[error("Event bus is closed")]
    Closed,
}

/// Bounded multi-producer, single-consumer event queue.
pub struct EventBus {
    queue: SegQueue<DisasterEvent>,
    capacity: usize,
    closed: AtomicBool,
}

impl EventBus {
    /// Create a new event bus with fixed capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: SegQueue::new(),
            capacity,
            closed: AtomicBool::new(false),
        }
    }

    /// Attempts to enqueue an event.
    pub fn send(&self, event: DisasterEvent) -> Result<(), EventError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(EventError::Closed);
        }
        if self.queue.len() >= self.capacity {
            return Err(EventError::QueueFull);
        }
        self.queue.push(event);
        Ok(())
    }

    /// Dequeues the next event, or `None` if the queue is currently empty.
    pub fn recv(&self) -> Option<DisasterEvent> {
        self.queue.pop()
    }

    /// Closes the bus for producers. Queued events remain drainable.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPayload;

    fn tweet(seq: u64) -> DisasterEvent {
        DisasterEvent::with_ts(
            EventPayload::Tweet {
                text: Some(format!("test-{}", seq)),
                coords: None,
            },
            seq,
        )
    }

    #[test]
    fn maintains_fifo_ordering() {
        let bus = EventBus::with_capacity(16);
        for i in 0..4 {
            bus.send(tweet(i)).unwrap();
        }
        for i in 0..4 {
            assert_eq!(bus.recv().unwrap().ts, Some(i));
        }
        assert!(bus.recv().is_none());
    }

    #[test]
    fn signals_queue_full() {
        let bus = EventBus::with_capacity(2);
        bus.send(tweet(1)).unwrap();
        bus.send(tweet(2)).unwrap();
        assert_eq!(bus.send(tweet(3)), Err(EventError::QueueFull));
    }

    #[test]
    fn close_rejects_new_events_but_drains() {
        let bus = EventBus::with_capacity(4);
        bus.send(tweet(1)).unwrap();
        bus.close();
        assert_eq!(bus.send(tweet(2)), Err(EventError::Closed));
        assert_eq!(bus.recv().unwrap().ts, Some(1));
        assert!(bus.is_closed());
        assert!(bus.is_empty());
    }
}
