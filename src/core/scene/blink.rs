//=========================================================================
// Blink Effect
//=========================================================================
//
// Fixed-count alpha oscillation played after a hazard hit.
//
// Each blink is one dim + one restore. Toggles happen every `interval`
// frames, starting on the first tick. The effect always ends at full
// opacity.
//
//=========================================================================

/// Alpha used for the dimmed half of a blink.
pub const DIM_ALPHA: f32 = 0.3;

//=== Blink ===============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Blink {
    remaining_toggles: u32,
    interval: u32,
    elapsed: u32,
    dimmed: bool,
}

impl Blink {
    /// Creates a blink of `count` dips, toggling every `interval` frames.
    ///
    /// # Panics
    ///
    /// Panics if `interval == 0`.
    pub fn new(count: u32, interval: u32) -> Self {
        assert!(interval > 0, "Blink interval must be positive");
        Self {
            remaining_toggles: count.saturating_mul(2),
            interval,
            elapsed: 0,
            dimmed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_toggles > 0
    }

    /// Advances one frame; returns the alpha to apply when it changes.
    pub fn tick(&mut self) -> Option<f32> {
        if self.remaining_toggles == 0 {
            return None;
        }

        let toggle = self.elapsed % self.interval == 0;
        self.elapsed += 1;
        if !toggle {
            return None;
        }

        self.remaining_toggles -= 1;
        self.dimmed = !self.dimmed;
        Some(if self.dimmed { DIM_ALPHA } else { 1.0 })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
