//=========================================================================
// Input System
//
// Keyboard input as the game sees it.
//
// Responsibilities:
// - Represent key transitions in a platform-independent way
// - Track held keys across frames
// - Produce the per-frame `Controls` snapshot the scene consumes
//
// Notes:
// The key tracker is owned by the core orchestrator, not by the
// reloadable module, so held keys are not lost when code is swapped.
//
//=========================================================================

//=== Submodules ==========================================================

mod controls;
pub mod event;
mod key_state;

//=== Public API ==========================================================

pub use controls::Controls;
pub use event::{InputEvent, KeyCode};
pub use key_state::KeyState;
