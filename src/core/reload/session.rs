//=========================================================================
// Session State
//=========================================================================
//
// Module-owned state that replaces ambient globals.
//
// Owned by the reload coordinator and lent to the scene controller on
// `create`. Filled from the registry on accept; a fresh module that is
// not a reload starts from `Default`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::PlayerSnapshot;

//=== SessionState ========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Number of reloads this process has gone through.
    pub reload_count: u64,

    /// Player carried over from the previous module, consumed by `create`.
    pub restore: Option<PlayerSnapshot>,
}
