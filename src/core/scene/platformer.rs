//=========================================================================
// Platformer Scene
//=========================================================================
//
// The single gameplay scene: one player, a floor, and spike hazards.
//
// Architecture:
// ```text
//   create(session)
//     ├─ create_sprite(dude) at snapshot position or default spawn
//     ├─ body flags: bounce, world bounds, extra gravity
//     └─ spikes + player/spikes overlap pairs
//
//   update(controls, contacts)
//     ├─ hazard contact → reset to spawn, idle, blink
//     └─ otherwise     → plan_frame() → velocity / flip / animation
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::blink::Blink;
use super::movement::plan_frame;
use super::player::{Animation, Facing, PlayerSnapshot};
use super::Scene;
use crate::core::backend::{Contact, EngineBackend, EntityId, OverlapId, Vec2};
use crate::core::config::GameConfig;
use crate::core::error::EngineError;
use crate::core::input::Controls;
use crate::core::reload::SessionState;

//=== Asset Keys ==========================================================

pub const PLAYER_KEY: &str = "dude";
pub const HAZARD_KEY: &str = "spikes";

const PLAYER_FRAME: (u32, u32) = (32, 48);
const HAZARD_SIZE: (u32, u32) = (32, 32);

//=== LevelLayout =========================================================

/// Static placement of hazards in the level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub hazards: Vec<Vec2>,
}

impl LevelLayout {
    /// A level with no hazards.
    pub fn empty() -> Self {
        Self { hazards: Vec::new() }
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            hazards: vec![Vec2::new(600.0, 584.0)],
        }
    }
}

//=== PlayerHandle ========================================================

#[derive(Debug, Clone, Copy)]
struct PlayerHandle {
    id: EntityId,
    facing: Facing,
}

//=== PlatformerScene =====================================================

/// Scene controller for the platformer.
pub struct PlatformerScene {
    config: GameConfig,
    level: LevelLayout,
    player: Option<PlayerHandle>,
    hazard_overlaps: HashSet<OverlapId>,
    blink: Option<Blink>,
}

impl PlatformerScene {
    pub const KEY: &'static str = "platformer";

    pub fn new(config: GameConfig, level: LevelLayout) -> Self {
        Self {
            config,
            level,
            player: None,
            hazard_overlaps: HashSet::new(),
            blink: None,
        }
    }

    /// Handle of the live player, if created.
    pub fn player(&self) -> Option<EntityId> {
        self.player.map(|p| p.id)
    }

    pub fn facing(&self) -> Option<Facing> {
        self.player.map(|p| p.facing)
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.as_ref().is_some_and(Blink::is_active)
    }

    //--- Internal Helpers -------------------------------------------------

    fn hit_hazard<E: EngineBackend>(
        &mut self,
        engine: &mut E,
        player: EntityId,
    ) -> Result<(), EngineError> {
        info!(target: "scene", "Player hit a hazard, respawning");

        engine.set_velocity(player, Vec2::ZERO)?;
        engine.set_position(player, self.config.spawn())?;
        engine.play_animation(player, Animation::Idle.key())?;

        self.blink = Some(Blink::new(
            self.config.blink_count,
            self.config.blink_interval_frames,
        ));
        Ok(())
    }

    fn move_player<E: EngineBackend>(
        &mut self,
        engine: &mut E,
        controls: Controls,
    ) -> Result<(), EngineError> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };

        let on_floor = engine.is_on_floor(player.id)?;
        let plan = plan_frame(
            controls,
            on_floor,
            player.facing,
            self.config.player_speed,
            self.config.jump_impulse,
        );

        engine.set_velocity_x(player.id, plan.velocity_x)?;
        if let Some(vy) = plan.velocity_y {
            engine.set_velocity_y(player.id, vy)?;
        }

        if plan.facing != player.facing {
            player.facing = plan.facing;
            engine.set_flip_x(player.id, plan.facing.flip_x())?;
        }

        if let Some(animation) = plan.animation {
            engine.play_animation(player.id, animation.key())?;
        }
        Ok(())
    }
}

//=== Scene Implementation ================================================

impl<E: EngineBackend> Scene<E> for PlatformerScene {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn preload(&mut self, engine: &mut E) {
        engine.preload_spritesheet(PLAYER_KEY, PLAYER_FRAME.0, PLAYER_FRAME.1);
        engine.preload_image(HAZARD_KEY, HAZARD_SIZE.0, HAZARD_SIZE.1);
    }

    fn create(&mut self, engine: &mut E, session: &mut SessionState) -> Result<(), EngineError> {
        self.hazard_overlaps.clear();
        self.blink = None;

        // The carried snapshot is used once and dropped.
        let (position, facing) = match session.restore.take() {
            Some(snapshot) => {
                debug!(
                    target: "scene",
                    "Restoring player at ({}, {}) facing {:?}",
                    snapshot.position.x,
                    snapshot.position.y,
                    snapshot.facing
                );
                (snapshot.position, snapshot.facing)
            }
            None => (self.config.spawn(), Facing::default()),
        };

        let id = engine.create_sprite(PLAYER_KEY, position.x, position.y)?;
        engine.set_bounce(id, self.config.player_bounce)?;
        engine.set_collide_world_bounds(id, true)?;
        engine.set_gravity_y(id, self.config.player_gravity_y)?;
        engine.set_flip_x(id, facing.flip_x())?;
        engine.play_animation(id, Animation::Idle.key())?;

        for spot in &self.level.hazards {
            let hazard = engine.create_static(HAZARD_KEY, spot.x, spot.y)?;
            self.hazard_overlaps.insert(engine.add_overlap(id, hazard)?);
        }

        self.player = Some(PlayerHandle { id, facing });

        info!(
            target: "scene",
            "Scene created (reload #{}), player at ({}, {})",
            session.reload_count,
            position.x,
            position.y
        );
        Ok(())
    }

    fn update(
        &mut self,
        engine: &mut E,
        controls: Controls,
        contacts: &[Contact],
    ) -> Result<(), EngineError> {
        let Some(player) = self.player.map(|p| p.id) else {
            return Ok(());
        };

        let hit = contacts
            .iter()
            .any(|contact| self.hazard_overlaps.contains(&contact.overlap));

        if hit {
            self.hit_hazard(engine, player)?;
        } else {
            self.move_player(engine, controls)?;
        }

        if let Some(blink) = self.blink.as_mut() {
            if let Some(alpha) = blink.tick() {
                engine.set_alpha(player, alpha)?;
            }
            if !blink.is_active() {
                self.blink = None;
            }
        }
        Ok(())
    }

    fn capture(&self, engine: &E) -> Result<Option<PlayerSnapshot>, EngineError> {
        let Some(player) = self.player else {
            return Ok(None);
        };

        Ok(Some(PlayerSnapshot {
            position: engine.position(player.id)?,
            velocity: engine.velocity(player.id)?,
            facing: Facing::from_flip_x(engine.flip_x(player.id)?),
            animation: engine
                .current_animation(player.id)?
                .and_then(Animation::from_key),
            collide_world_bounds: engine.collide_world_bounds(player.id)?,
            bounce: engine.bounce(player.id)?,
        }))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
