//! One-shot timers keyed on scene time.
//!
//! Timers never run callbacks themselves. The owner polls the queue with the current elapsed time
//! and dispatches the returned payloads, so all state mutation stays inside one synchronous call.
//! Cancellation is by group: `clear` drops everything pending, `close` also refuses new timers.

use std::time::Duration;

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    seq: u64,
    deadline: Duration,
    payload: T,
}

/// Queue of pending one-shot timers carrying a payload of type `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_seq: u64,
    /// Once closed the queue refuses new timers and never fires again.
    closed: bool,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            closed: false,
        }
    }

    /// Schedule `payload` to fire `delay` after `now`. Dropped if the queue is closed.
    pub fn schedule(&mut self, now: Duration, delay: Duration, payload: T) {
        if self.closed {
            log::debug!("Timer scheduled on a closed queue, dropping it");
            return;
        }
        self.entries.push(TimerEntry {
            seq: self.next_seq,
            deadline: now + delay,
            payload,
        });
        self.next_seq += 1;
    }

    /// Remove and return every payload whose deadline is at or before `now`, earliest first.
    /// Timers sharing a deadline fire in scheduling order.
    pub fn poll(&mut self, now: Duration) -> Vec<T> {
        if self.entries.iter().all(|e| e.deadline > now) {
            return Vec::new();
        }
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|e| (e.deadline, e.seq));
        due.into_iter().map(|e| e.payload).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every pending timer and refuse new ones. Used on teardown.
    pub fn close(&mut self) {
        self.entries.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
