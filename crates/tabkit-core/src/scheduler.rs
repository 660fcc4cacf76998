//! Single-threaded virtual clock for debounce timers and frame callbacks.
//!
//! Nothing here sleeps. The host moves time forward with
//! [`Scheduler::advance`] and flushes frame callbacks with
//! [`Scheduler::run_frame`]; both hand back the due tasks for the caller to
//! run. Every entry belongs to a tab set so teardown can cancel them all.

use crate::tabset::TabSetId;

/// Handle returned when scheduling, used to cancel.
pub type TimerId = u64;

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    owner: TabSetId,
    due_ms: u64,
    task: T,
}

/// Timer and frame queue over an abstract task type.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: TimerId,
    timeouts: Vec<Entry<T>>,
    frames: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            timeouts: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` once `delay_ms` of virtual time has passed.
    pub fn set_timeout(&mut self, owner: TabSetId, delay_ms: u64, task: T) -> TimerId {
        let id = self.allocate();
        self.timeouts.push(Entry {
            id,
            owner,
            due_ms: self.now_ms + delay_ms,
            task,
        });
        id
    }

    /// Run `task` on the next frame.
    pub fn request_frame(&mut self, owner: TabSetId, task: T) -> TimerId {
        let id = self.allocate();
        self.frames.push(Entry {
            id,
            owner,
            due_ms: self.now_ms,
            task,
        });
        id
    }

    /// Cancel a pending timeout or frame callback. Returns `false` if it
    /// already ran or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending();
        self.timeouts.retain(|e| e.id != id);
        self.frames.retain(|e| e.id != id);
        self.pending() != before
    }

    /// Cancel everything owned by one tab set. Returns how many entries
    /// were dropped.
    pub fn cancel_owner(&mut self, owner: TabSetId) -> usize {
        let before = self.pending();
        self.timeouts.retain(|e| e.owner != owner);
        self.frames.retain(|e| e.owner != owner);
        before - self.pending()
    }

    /// Number of pending timeouts and frame callbacks.
    pub fn pending(&self) -> usize {
        self.timeouts.len() + self.frames.len()
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timeouts.iter().chain(&self.frames).any(|e| e.id == id)
    }

    /// Move the clock forward and return every timeout that came due, in
    /// due-time order. Ties keep scheduling order.
    pub fn advance(&mut self, ms: u64) -> Vec<T> {
        self.now_ms += ms;
        let now = self.now_ms;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.timeouts.drain(..).partition(|e| e.due_ms <= now);
        self.timeouts = waiting;
        // Ids grow monotonically, so they double as the scheduling sequence.
        due.sort_by_key(|e| (e.due_ms, e.id));
        due.into_iter().map(|e| e.task).collect()
    }

    /// Take every frame callback requested so far, in request order.
    /// Callbacks requested while the frame runs wait for the next one.
    pub fn run_frame(&mut self) -> Vec<T> {
        std::mem::take(&mut self.frames)
            .into_iter()
            .map(|e| e.task)
            .collect()
    }

    fn allocate(&mut self) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
