//! Single logical clock with delayed tasks
//!
//! Tasks fire in `(fire_tick, scheduling order)` order. Nothing can be
//! cancelled once scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    fire_tick: u64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_tick == other.fire_tick && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_tick, self.seq).cmp(&(other.fire_tick, other.seq))
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `task` to fire `delay` ticks from now. A zero delay fires on
    /// the next call to [`Scheduler::pop_due`].
    pub fn schedule(&mut self, delay: u64, task: T) {
        let entry = Entry {
            fire_tick: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Move the clock forward one tick.
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// Next task whose fire tick has been reached, if any.
    pub fn pop_due(&mut self) -> Option<T> {
        let due = matches!(self.queue.peek(), Some(Reverse(entry)) if entry.fire_tick <= self.now);
        if !due {
            return None;
        }
        self.queue.pop().map(|Reverse(entry)| entry.task)
    }
}
