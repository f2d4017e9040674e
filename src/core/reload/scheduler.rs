//=========================================================================
// Deferred Scheduler
//=========================================================================
//
// Zero-delay continuations run at the start of the next core tick.
//
// Architecture:
//   module (during evaluation) ──defer()──> channel ──drain()──> host tick
//
// Only used for the deferred engine construction path; there is no
// timing, no priority and no cancellation beyond `clear()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;

//=== Deferred ============================================================

/// Work a module asks to have run on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Construct the engine instance if none exists yet.
    StartEngine,
}

//=== Scheduler ===========================================================

/// Queue of deferred continuations.
pub struct Scheduler {
    sender: Sender<Deferred>,
    receiver: Receiver<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Queues `task` for the next tick.
    pub fn defer(&self, task: Deferred) {
        debug!(target: "reload", "Deferred {:?} to next tick", task);
        // Both ends live in `self`, so the channel cannot be disconnected.
        let _ = self.sender.send(task);
    }

    /// Removes and returns every queued task, in FIFO order.
    pub fn drain(&self) -> Vec<Deferred> {
        self.receiver.try_iter().collect()
    }

    /// Drops every queued task.
    pub fn clear(&self) -> usize {
        self.receiver.try_iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
