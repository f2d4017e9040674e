//=========================================================================
// Controls
//=========================================================================
//
// Per-frame discrete input the scene controller reads.
//
//=========================================================================

/// Pressed / not-pressed state of the four game keys for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub space: bool,
}

impl Controls {
    /// Whether either jump key is held.
    #[inline]
    pub fn jump(&self) -> bool {
        self.up || self.space
    }
}
