//=========================================================================
// Player
//=========================================================================
//
// Value types describing the one logical player that persists across
// reloads, independent of the engine object backing it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::backend::Vec2;

//=== Facing ==============================================================

/// Horizontal direction the player sprite faces.
///
/// The sheet is drawn facing right; facing left flips the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Sprite flip flag for this facing.
    #[inline]
    pub fn flip_x(self) -> bool {
        matches!(self, Facing::Left)
    }

    /// Facing implied by a sprite flip flag.
    #[inline]
    pub fn from_flip_x(flip: bool) -> Self {
        if flip {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

//=== Animation ===========================================================

/// Player animations registered on the spritesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Idle,
    Walk,
    Jump,
}

impl Animation {
    pub fn key(self) -> &'static str {
        match self {
            Animation::Idle => "idle",
            Animation::Walk => "walk",
            Animation::Jump => "jump",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "idle" => Some(Animation::Idle),
            "walk" => Some(Animation::Walk),
            "jump" => Some(Animation::Jump),
            _ => None,
        }
    }
}

//=== PlayerSnapshot ======================================================

/// Everything known about the player at the moment of teardown.
///
/// Reconstruction only restores `position` and `facing`; the rest is
/// carried for diagnostics and re-derived by the new scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub animation: Option<Animation>,
    pub collide_world_bounds: bool,
    pub bounce: f32,
}

//=========================================================================
// Unit Tests
//=========================================================================
