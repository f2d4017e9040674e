//=========================================================================
// Key State
//=========================================================================
//
// Persistent held-key tracking fed by batches of input events.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys held) → Controls
//
// Held state survives frame boundaries and hot reloads alike: the key
// tracker lives on the core thread, outside any reloadable module.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== Internal Dependencies ===============================================

use super::controls::Controls;
use super::event::{InputEvent, KeyCode};

//=== KeyState ============================================================

/// Tracks which keys are currently held.
#[derive(Debug, Default)]
pub struct KeyState {
    keys_down: HashSet<KeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Applies a batch of events in order.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                InputEvent::KeyDown(key) => {
                    if self.keys_down.insert(key) {
                        trace!(target: "input", "Key down: {:?}", key);
                    }
                }
                InputEvent::KeyUp(key) => {
                    if self.keys_down.remove(&key) {
                        trace!(target: "input", "Key up: {:?}", key);
                    }
                }
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Snapshot of the four keys the scene reads.
    pub fn controls(&self) -> Controls {
        Controls {
            left: self.is_down(KeyCode::ArrowLeft),
            right: self.is_down(KeyCode::ArrowRight),
            up: self.is_down(KeyCode::ArrowUp),
            space: self.is_down(KeyCode::Space),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
