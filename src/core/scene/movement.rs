//=========================================================================
// Movement Policy
//=========================================================================
//
// Pure per-frame decision: given held keys, floor contact and the current
// facing, what should the player's velocity, facing and animation be.
//
// Rules:
//   horizontal  left → -speed, else right → +speed, else 0
//   vertical    (up | space) && on_floor → -jump_impulse
//   facing      vx > 0 → Right, vx < 0 → Left, vx == 0 → unchanged
//   animation   jump → Jump; on floor → Walk / Idle; airborne → unchanged
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::player::{Animation, Facing};
use crate::core::input::Controls;

//=== FramePlan ===========================================================

/// Result of the movement policy for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan {
    pub velocity_x: f32,
    /// Vertical velocity to set; `None` leaves it to the engine.
    pub velocity_y: Option<f32>,
    pub facing: Facing,
    /// Animation to play; `None` keeps whatever is playing.
    pub animation: Option<Animation>,
}

//=== plan_frame() ========================================================

pub fn plan_frame(
    controls: Controls,
    on_floor: bool,
    facing: Facing,
    speed: f32,
    jump_impulse: f32,
) -> FramePlan {
    let velocity_x = if controls.left {
        -speed
    } else if controls.right {
        speed
    } else {
        0.0
    };

    let velocity_y = (controls.jump() && on_floor).then_some(-jump_impulse);

    let facing = if velocity_x > 0.0 {
        Facing::Right
    } else if velocity_x < 0.0 {
        Facing::Left
    } else {
        facing
    };

    let animation = if velocity_y.is_some() {
        Some(Animation::Jump)
    } else if on_floor && velocity_x == 0.0 {
        Some(Animation::Idle)
    } else if on_floor {
        Some(Animation::Walk)
    } else {
        None
    };

    FramePlan {
        velocity_x,
        velocity_y,
        facing,
        animation,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: f32 = 200.0;
    const JUMP: f32 = 350.0;

    fn plan(controls: Controls, on_floor: bool, facing: Facing) -> FramePlan {
        plan_frame(controls, on_floor, facing, SPEED, JUMP)
    }

    fn keys(left: bool, right: bool, up: bool, space: bool) -> Controls {
        Controls { left, right, up, space }
    }

    //--- Horizontal -------------------------------------------------------

    #[test]
    fn left_moves_left() {
        assert_eq!(plan(keys(true, false, false, false), true, Facing::Right).velocity_x, -SPEED);
    }

    #[test]
    fn right_moves_right() {
        assert_eq!(plan(keys(false, true, false, false), true, Facing::Right).velocity_x, SPEED);
    }

    #[test]
    fn no_keys_stops() {
        assert_eq!(plan(Controls::default(), true, Facing::Right).velocity_x, 0.0);
    }

    #[test]
    fn left_wins_over_right() {
        let plan = plan(keys(true, true, false, false), true, Facing::Right);
        assert_eq!(plan.velocity_x, -SPEED);
        assert_eq!(plan.facing, Facing::Left);
    }

    //--- Jump -------------------------------------------------------------

    #[test]
    fn up_on_floor_jumps() {
        let plan = plan(keys(false, false, true, false), true, Facing::Right);
        assert_eq!(plan.velocity_y, Some(-JUMP));
    }

    #[test]
    fn space_on_floor_jumps() {
        let plan = plan(keys(false, false, false, true), true, Facing::Right);
        assert_eq!(plan.velocity_y, Some(-JUMP));
    }

    #[test]
    fn both_jump_keys_apply_single_impulse() {
        let plan = plan(keys(false, false, true, true), true, Facing::Right);
        assert_eq!(plan.velocity_y, Some(-JUMP));
    }

    #[test]
    fn airborne_suppresses_jump() {
        let plan = plan(keys(false, false, true, true), false, Facing::Right);
        assert_eq!(plan.velocity_y, None);
        assert_eq!(plan.animation, None);
    }

    #[test]
    fn no_jump_key_no_jump() {
        assert_eq!(plan(Controls::default(), true, Facing::Right).velocity_y, None);
    }

    //--- Facing -----------------------------------------------------------

    #[test]
    fn facing_is_sticky_when_stopped() {
        let mut facing = Facing::Left;

        facing = plan(keys(false, true, false, false), true, facing).facing;
        assert_eq!(facing, Facing::Right);

        for _ in 0..10 {
            facing = plan(Controls::default(), true, facing).facing;
            assert_eq!(facing, Facing::Right);
        }

        facing = plan(keys(true, false, false, false), true, facing).facing;
        assert_eq!(facing, Facing::Left);
    }

    //--- Animation --------------------------------------------------------

    #[test]
    fn idle_when_grounded_and_still() {
        assert_eq!(plan(Controls::default(), true, Facing::Right).animation, Some(Animation::Idle));
    }

    #[test]
    fn walk_when_grounded_and_moving() {
        let plan = plan(keys(true, false, false, false), true, Facing::Right);
        assert_eq!(plan.animation, Some(Animation::Walk));
    }

    #[test]
    fn jump_overrides_walk() {
        let plan = plan(keys(false, true, false, true), true, Facing::Right);
        assert_eq!(plan.animation, Some(Animation::Jump));
    }

    #[test]
    fn airborne_keeps_current_animation() {
        let plan = plan(keys(false, true, false, false), false, Facing::Right);
        assert_eq!(plan.animation, None);
    }
}
