//=========================================================================
// Reload Registry
//=========================================================================
//
// The one piece of state whose lifetime crosses a module boundary.
//
// Slot lifecycle:
// ```text
//   Empty ──stash()──> Populated ──take()──> Consumed ──stash()──> Populated …
// ```
//
// Single writer (teardown) and single reader (accept) alternate strictly.
// Out-of-turn writes or reads are protocol violations, not data races,
// so no locking is involved.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::ReloadError;
use crate::core::scene::PlayerSnapshot;

//=== ReloadEntry =========================================================

/// Carry-over bag written at teardown and read at accept.
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadEntry {
    pub player: Option<PlayerSnapshot>,
    pub reload_count: u64,
}

//=== Slot ================================================================

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Empty,
    Populated(ReloadEntry),
    Consumed,
}

//=== ReloadRegistry ======================================================

/// Single-slot handoff between an outgoing and an incoming module.
#[derive(Debug)]
pub struct ReloadRegistry {
    slot: Slot,
    handoffs: u64,
}

impl ReloadRegistry {
    pub fn new() -> Self {
        Self {
            slot: Slot::Empty,
            handoffs: 0,
        }
    }

    //--- Protocol ---------------------------------------------------------

    /// Writes the carry-over bag. Fails if the previous one was never read.
    pub fn stash(&mut self, entry: ReloadEntry) -> Result<(), ReloadError> {
        if matches!(self.slot, Slot::Populated(_)) {
            return Err(ReloadError::SlotOccupied);
        }

        debug!(
            target: "reload",
            "Registry populated (reload_count {}, player {})",
            entry.reload_count,
            if entry.player.is_some() { "present" } else { "absent" }
        );
        self.slot = Slot::Populated(entry);
        Ok(())
    }

    /// Reads the carry-over bag once, leaving the slot consumed.
    pub fn take(&mut self) -> Result<ReloadEntry, ReloadError> {
        match std::mem::replace(&mut self.slot, Slot::Consumed) {
            Slot::Populated(entry) => {
                self.handoffs += 1;
                debug!(target: "reload", "Registry consumed (handoff #{})", self.handoffs);
                Ok(entry)
            }
            other => {
                self.slot = other;
                Err(ReloadError::NothingToAccept)
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Whether a bag is waiting to be accepted.
    pub fn is_populated(&self) -> bool {
        matches!(self.slot, Slot::Populated(_))
    }

    /// Whether nothing has ever been written.
    pub fn is_empty(&self) -> bool {
        matches!(self.slot, Slot::Empty)
    }

    /// Number of completed teardown → accept handoffs.
    pub fn handoffs(&self) -> u64 {
        self.handoffs
    }
}

impl Default for ReloadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(count: u64) -> ReloadEntry {
        ReloadEntry {
            player: None,
            reload_count: count,
        }
    }

    #[test]
    fn starts_empty() {
        let registry = ReloadRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_populated());
        assert_eq!(registry.handoffs(), 0);
    }

    #[test]
    fn stash_then_take() {
        let mut registry = ReloadRegistry::new();

        registry.stash(entry(4)).unwrap();
        assert!(registry.is_populated());

        assert_eq!(registry.take().unwrap(), entry(4));
        assert!(!registry.is_populated());
        assert!(!registry.is_empty());
        assert_eq!(registry.handoffs(), 1);
    }

    #[test]
    fn entry_is_read_once() {
        let mut registry = ReloadRegistry::new();
        registry.stash(entry(0)).unwrap();
        registry.take().unwrap();

        assert_eq!(registry.take(), Err(ReloadError::NothingToAccept));
    }

    #[test]
    fn take_from_empty_fails() {
        let mut registry = ReloadRegistry::new();
        assert_eq!(registry.take(), Err(ReloadError::NothingToAccept));
        assert!(registry.is_empty());
    }

    #[test]
    fn double_stash_is_rejected() {
        let mut registry = ReloadRegistry::new();
        registry.stash(entry(1)).unwrap();

        assert_eq!(registry.stash(entry(2)), Err(ReloadError::SlotOccupied));
        assert_eq!(registry.take().unwrap(), entry(1));
    }

    #[test]
    fn consumed_slot_accepts_next_stash() {
        let mut registry = ReloadRegistry::new();

        for count in 0..3 {
            registry.stash(entry(count)).unwrap();
            assert_eq!(registry.take().unwrap().reload_count, count);
        }
        assert_eq!(registry.handoffs(), 3);
    }
}
