//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit keyboard events into what the core thread understands.
//
// Architecture:
//   Winit KeyEvent → InputProcessor → KeyAction
//                                      ├─ Input(InputEvent) → InputBuffer
//                                      ├─ Reload            → ReloadRequested
//                                      └─ Close             → WindowClosed
//
// Stateful pressed-key tracking: auto-repeat presses and releases of keys
// that were never seen going down are filtered, so the core thread sees
// clean down/up pairs. Unmapped keys return None.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode};

//=== KeyAction ===========================================================

/// What the platform should do with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    /// Forward to the core thread as a gameplay key transition.
    Input(InputEvent),

    /// Ask the core thread for a hot reload.
    Reload,

    /// Close the window.
    Close,
}

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    pressed: HashSet<KeyCode>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            pressed: HashSet::with_capacity(8),
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit KeyEvent (filters unmapped keys).
    pub(crate) fn process_key_event(&mut self, key_event: &KeyEvent) -> Option<KeyAction> {
        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        self.process_key(key, key_event.state)
    }

    /// Releases every held key, e.g. when the window loses focus.
    pub(crate) fn release_all(&mut self) -> Vec<InputEvent> {
        self.pressed.drain().map(InputEvent::KeyUp).collect()
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_key(&mut self, key: KeyCode, state: ElementState) -> Option<KeyAction> {
        if key == KeyCode::Unidentified {
            return None;
        }

        match state {
            ElementState::Pressed => {
                // Auto-repeat
                if !self.pressed.insert(key) {
                    return None;
                }
                if key == KeyCode::Escape {
                    Some(KeyAction::Close)
                } else if key.is_reload_trigger() {
                    Some(KeyAction::Reload)
                } else {
                    Some(KeyAction::Input(InputEvent::KeyDown(key)))
                }
            }
            ElementState::Released => {
                if !self.pressed.remove(&key) {
                    return None;
                }
                if key == KeyCode::Escape || key.is_reload_trigger() {
                    None
                } else {
                    Some(KeyAction::Input(InputEvent::KeyUp(key)))
                }
            }
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Only the gameplay and host keys are mapped; everything else is
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        match code {
            //--- Movement -----------------------------------------------------

            WinitKeyCode::ArrowUp => KeyCode::ArrowUp,
            WinitKeyCode::ArrowLeft => KeyCode::ArrowLeft,
            WinitKeyCode::ArrowRight => KeyCode::ArrowRight,
            WinitKeyCode::Space => KeyCode::Space,

            //--- Host ---------------------------------------------------------

            WinitKeyCode::KeyR => KeyCode::KeyR,
            WinitKeyCode::F5 => KeyCode::F5,
            WinitKeyCode::Escape => KeyCode::Escape,

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
