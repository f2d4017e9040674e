//=========================================================================
// Input Event Types
//
// Portable representation of the keyboard input the game consumes.
//
// Platform-specific key events (winit) are converted into these types on
// the platform thread and shipped to the core thread in batches.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    KeyState (held keys)
//         ↓
//    Controls (left / right / up / space for the scene)
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Only the keys the game reacts to are named. Everything else maps to
/// `Unidentified` and is filtered by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Movement ---------------------------------------------------------

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    Space,

    //--- Host Controls ----------------------------------------------------

    /// Requests a hot reload.
    KeyR,

    /// Requests a hot reload.
    F5,

    /// Closes the window.
    Escape,

    /// Fallback for keys not explicitly mapped.
    Unidentified,
}

impl KeyCode {
    /// Whether this key asks the host for a hot reload.
    pub fn is_reload_trigger(self) -> bool {
        matches!(self, KeyCode::KeyR | KeyCode::F5)
    }
}

//=== InputEvent ==========================================================

/// Low-level key transition from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

//=========================================================================
// Unit Tests
//=========================================================================
