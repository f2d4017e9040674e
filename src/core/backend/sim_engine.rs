//=========================================================================
// Sim Engine
//=========================================================================
//
// Headless reference implementation of `EngineBackend`.
//
// Architecture:
//   step(dt) → integrate dynamic bodies → resolve world bounds
//            → test registered overlap pairs → Vec<Contact>
//
// Bodies are axis-aligned boxes centred on their position. Integration is
// explicit Euler at whatever `dt` the caller supplies. Only the features
// the platformer needs are modelled: world-bounds floor contact, bounce,
// per-body gravity and overlap pairs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Contact, EngineBackend, EngineFactory, EngineSettings, EntityId, OverlapId, Vec2};
use crate::core::error::EngineError;

//=== Constants ===========================================================

/// Below this rebound speed a body settles instead of bouncing again.
const REST_SPEED: f32 = 15.0;

//=== LiveInstances =======================================================

/// Shared count of engine instances built but not yet destroyed.
///
/// Cloned into every instance a factory builds. Single-threaded by
/// construction: engine instances never leave the core thread.
#[derive(Debug, Clone, Default)]
pub struct LiveInstances(Rc<Cell<usize>>);

impl LiveInstances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances currently alive.
    pub fn count(&self) -> usize {
        self.0.get()
    }

    fn increment(&self) {
        self.0.set(self.0.get() + 1);
    }

    fn decrement(&self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

//=== Body ================================================================

#[derive(Debug, Clone)]
struct Body {
    position: Vec2,
    velocity: Vec2,
    half_extents: Vec2,
    dynamic: bool,
    collide_world_bounds: bool,
    bounce: f32,
    gravity_y: f32,
    on_floor: bool,
    flip_x: bool,
    alpha: f32,
    animation: Option<String>,
}

impl Body {
    fn new(position: Vec2, size: (u32, u32), dynamic: bool) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(size.0 as f32 / 2.0, size.1 as f32 / 2.0),
            dynamic,
            collide_world_bounds: false,
            bounce: 0.0,
            gravity_y: 0.0,
            on_floor: false,
            flip_x: false,
            alpha: 1.0,
            animation: None,
        }
    }

    fn overlaps(&self, other: &Body) -> bool {
        (self.position.x - other.position.x).abs() < self.half_extents.x + other.half_extents.x
            && (self.position.y - other.position.y).abs()
                < self.half_extents.y + other.half_extents.y
    }
}

//=== SimEngine ===========================================================

/// Headless engine instance.
pub struct SimEngine {
    settings: EngineSettings,
    assets: HashMap<String, (u32, u32)>,
    bodies: Vec<Body>,
    overlaps: Vec<(OverlapId, EntityId, EntityId)>,
    destroyed: bool,
    live: Option<LiveInstances>,
}

impl SimEngine {
    //--- Construction -----------------------------------------------------

    pub fn new(settings: EngineSettings) -> Self {
        info!(
            target: "engine",
            "Engine instance created: {}x{} {:?}, gravity {}, scene '{}'",
            settings.width,
            settings.height,
            settings.scale_mode,
            settings.gravity_y,
            settings.scene
        );

        Self {
            settings,
            assets: HashMap::new(),
            bodies: Vec::new(),
            overlaps: Vec::new(),
            destroyed: false,
            live: None,
        }
    }

    /// Creates an instance that reports its lifetime to `live`.
    pub fn with_tracker(settings: EngineSettings, live: LiveInstances) -> Self {
        live.increment();
        let mut engine = Self::new(settings);
        engine.live = Some(live);
        engine
    }

    //--- Internal Helpers -------------------------------------------------

    fn ensure_alive(&self) -> Result<(), EngineError> {
        if self.destroyed {
            Err(EngineError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn body(&self, id: EntityId) -> Result<&Body, EngineError> {
        self.ensure_alive()?;
        self.bodies
            .get(id.0 as usize)
            .ok_or(EngineError::UnknownEntity(id))
    }

    fn body_mut(&mut self, id: EntityId) -> Result<&mut Body, EngineError> {
        self.ensure_alive()?;
        self.bodies
            .get_mut(id.0 as usize)
            .ok_or(EngineError::UnknownEntity(id))
    }

    fn spawn(&mut self, key: &str, x: f32, y: f32, dynamic: bool) -> Result<EntityId, EngineError> {
        self.ensure_alive()?;
        let size = *self
            .assets
            .get(key)
            .ok_or_else(|| EngineError::MissingAsset(key.to_string()))?;

        let id = EntityId(self.bodies.len() as u32);
        self.bodies.push(Body::new(Vec2::new(x, y), size, dynamic));
        debug!(target: "engine", "Spawned {:?} '{}' at ({}, {})", id, key, x, y);
        Ok(id)
    }

    fn resolve_world_bounds(body: &mut Body, width: f32, height: f32) {
        let half = body.half_extents;

        if body.position.x - half.x < 0.0 {
            body.position.x = half.x;
            body.velocity.x = -body.velocity.x * body.bounce;
        } else if body.position.x + half.x > width {
            body.position.x = width - half.x;
            body.velocity.x = -body.velocity.x * body.bounce;
        }

        if body.position.y - half.y < 0.0 {
            body.position.y = half.y;
            body.velocity.y = -body.velocity.y * body.bounce;
        } else if body.position.y + half.y >= height {
            body.position.y = height - half.y;
            body.on_floor = true;

            let rebound = -body.velocity.y * body.bounce;
            body.velocity.y = if rebound.abs() < REST_SPEED { 0.0 } else { rebound };
        }
    }
}

//=== EngineBackend Implementation ========================================

impl EngineBackend for SimEngine {
    //--- Assets -----------------------------------------------------------

    fn preload_spritesheet(&mut self, key: &str, frame_width: u32, frame_height: u32) {
        self.assets.insert(key.to_string(), (frame_width, frame_height));
    }

    fn preload_image(&mut self, key: &str, width: u32, height: u32) {
        self.assets.insert(key.to_string(), (width, height));
    }

    //--- Entities ---------------------------------------------------------

    fn create_sprite(&mut self, key: &str, x: f32, y: f32) -> Result<EntityId, EngineError> {
        self.spawn(key, x, y, true)
    }

    fn create_static(&mut self, key: &str, x: f32, y: f32) -> Result<EntityId, EngineError> {
        self.spawn(key, x, y, false)
    }

    fn position(&self, id: EntityId) -> Result<Vec2, EngineError> {
        Ok(self.body(id)?.position)
    }

    fn set_position(&mut self, id: EntityId, position: Vec2) -> Result<(), EngineError> {
        self.body_mut(id)?.position = position;
        Ok(())
    }

    fn velocity(&self, id: EntityId) -> Result<Vec2, EngineError> {
        Ok(self.body(id)?.velocity)
    }

    fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> Result<(), EngineError> {
        self.body_mut(id)?.velocity = velocity;
        Ok(())
    }

    fn flip_x(&self, id: EntityId) -> Result<bool, EngineError> {
        Ok(self.body(id)?.flip_x)
    }

    fn set_flip_x(&mut self, id: EntityId, flip: bool) -> Result<(), EngineError> {
        self.body_mut(id)?.flip_x = flip;
        Ok(())
    }

    fn alpha(&self, id: EntityId) -> Result<f32, EngineError> {
        Ok(self.body(id)?.alpha)
    }

    fn set_alpha(&mut self, id: EntityId, alpha: f32) -> Result<(), EngineError> {
        self.body_mut(id)?.alpha = alpha.clamp(0.0, 1.0);
        Ok(())
    }

    //--- Physics Body -----------------------------------------------------

    fn collide_world_bounds(&self, id: EntityId) -> Result<bool, EngineError> {
        Ok(self.body(id)?.collide_world_bounds)
    }

    fn set_collide_world_bounds(&mut self, id: EntityId, collide: bool) -> Result<(), EngineError> {
        self.body_mut(id)?.collide_world_bounds = collide;
        Ok(())
    }

    fn bounce(&self, id: EntityId) -> Result<f32, EngineError> {
        Ok(self.body(id)?.bounce)
    }

    fn set_bounce(&mut self, id: EntityId, bounce: f32) -> Result<(), EngineError> {
        self.body_mut(id)?.bounce = bounce;
        Ok(())
    }

    fn set_gravity_y(&mut self, id: EntityId, gravity_y: f32) -> Result<(), EngineError> {
        self.body_mut(id)?.gravity_y = gravity_y;
        Ok(())
    }

    fn is_on_floor(&self, id: EntityId) -> Result<bool, EngineError> {
        Ok(self.body(id)?.on_floor)
    }

    //--- Animation --------------------------------------------------------

    fn play_animation(&mut self, id: EntityId, key: &str) -> Result<(), EngineError> {
        let body = self.body_mut(id)?;
        if body.animation.as_deref() != Some(key) {
            body.animation = Some(key.to_string());
        }
        Ok(())
    }

    fn current_animation(&self, id: EntityId) -> Result<Option<&str>, EngineError> {
        Ok(self.body(id)?.animation.as_deref())
    }

    //--- Collision --------------------------------------------------------

    fn add_overlap(&mut self, a: EntityId, b: EntityId) -> Result<OverlapId, EngineError> {
        self.body(a)?;
        self.body(b)?;

        let id = OverlapId(self.overlaps.len() as u32);
        self.overlaps.push((id, a, b));
        Ok(id)
    }

    //--- Lifecycle --------------------------------------------------------

    fn step(&mut self, dt: f32) -> Result<Vec<Contact>, EngineError> {
        self.ensure_alive()?;

        let width = self.settings.width as f32;
        let height = self.settings.height as f32;
        let world_gravity = self.settings.gravity_y;

        for body in self.bodies.iter_mut().filter(|b| b.dynamic) {
            body.velocity.y += (world_gravity + body.gravity_y) * dt;
            body.position.x += body.velocity.x * dt;
            body.position.y += body.velocity.y * dt;
            body.on_floor = false;

            if body.collide_world_bounds {
                Self::resolve_world_bounds(body, width, height);
            }
        }

        let contacts = self
            .overlaps
            .iter()
            .filter(|(_, a, b)| {
                let (a, b) = (&self.bodies[a.0 as usize], &self.bodies[b.0 as usize]);
                a.overlaps(b)
            })
            .map(|&(overlap, a, b)| Contact { overlap, a, b })
            .collect();

        Ok(contacts)
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        self.destroyed = true;
        self.bodies.clear();
        self.overlaps.clear();
        if let Some(live) = &self.live {
            live.decrement();
        }

        info!(target: "engine", "Engine instance destroyed (scene '{}')", self.settings.scene);
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Drop for SimEngine {
    fn drop(&mut self) {
        if !self.destroyed {
            warn!(
                target: "engine",
                "Engine instance for scene '{}' dropped without destroy()",
                self.settings.scene
            );
        }
    }
}

//=== SimEngineFactory ====================================================

/// Builds [`SimEngine`] instances, optionally tracking how many are alive.
#[derive(Debug, Clone, Default)]
pub struct SimEngineFactory {
    live: Option<LiveInstances>,
}

impl SimEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracker(live: LiveInstances) -> Self {
        Self { live: Some(live) }
    }
}

impl EngineFactory for SimEngineFactory {
    type Engine = SimEngine;

    fn build(&self, settings: &EngineSettings) -> SimEngine {
        match &self.live {
            Some(live) => SimEngine::with_tracker(settings.clone(), live.clone()),
            None => SimEngine::new(settings.clone()),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::ScaleMode;

    fn settings() -> EngineSettings {
        EngineSettings {
            width: 800,
            height: 600,
            scale_mode: ScaleMode::Fit,
            gravity_y: 300.0,
            scene: "test".to_string(),
        }
    }

    fn engine_with_dude() -> SimEngine {
        let mut engine = SimEngine::new(settings());
        engine.preload_spritesheet("dude", 32, 48);
        engine.preload_image("spikes", 32, 32);
        engine
    }

    //=====================================================================
    // Assets & Entities
    //=====================================================================

    #[test]
    fn create_sprite_requires_preloaded_asset() {
        let mut engine = SimEngine::new(settings());
        let result = engine.create_sprite("dude", 0.0, 0.0);
        assert_eq!(result, Err(EngineError::MissingAsset("dude".to_string())));
        engine.destroy();
    }

    #[test]
    fn unknown_entity_is_reported() {
        let mut engine = engine_with_dude();
        let result = engine.position(EntityId(42));
        assert_eq!(result, Err(EngineError::UnknownEntity(EntityId(42))));
        engine.destroy();
    }

    #[test]
    fn alpha_is_clamped() {
        let mut engine = engine_with_dude();
        let id = engine.create_sprite("dude", 100.0, 100.0).unwrap();

        engine.set_alpha(id, 3.0).unwrap();
        assert_eq!(engine.alpha(id).unwrap(), 1.0);

        engine.set_alpha(id, -1.0).unwrap();
        assert_eq!(engine.alpha(id).unwrap(), 0.0);
        engine.destroy();
    }

    //=====================================================================
    // Physics
    //=====================================================================

    #[test]
    fn body_falls_and_lands_on_world_floor() {
        let mut engine = engine_with_dude();
        let id = engine.create_sprite("dude", 100.0, 450.0).unwrap();
        engine.set_collide_world_bounds(id, true).unwrap();

        assert!(!engine.is_on_floor(id).unwrap());

        let mut landed = false;
        for _ in 0..240 {
            engine.step(1.0 / 60.0).unwrap();
            if engine.is_on_floor(id).unwrap() {
                landed = true;
                break;
            }
        }

        assert!(landed, "body should reach the floor");
        assert_eq!(engine.position(id).unwrap().y, 600.0 - 24.0);
    }

    #[test]
    fn resting_body_stays_on_floor() {
        let mut engine = engine_with_dude();
        let id = engine.create_sprite("dude", 100.0, 576.0).unwrap();
        engine.set_collide_world_bounds(id, true).unwrap();
        engine.set_bounce(id, 0.2).unwrap();

        for _ in 0..30 {
            engine.step(1.0 / 60.0).unwrap();
            assert!(engine.is_on_floor(id).unwrap());
        }
        assert_eq!(engine.velocity(id).unwrap().y, 0.0);
        engine.destroy();
    }

    #[test]
    fn static_bodies_ignore_gravity() {
        let mut engine = engine_with_dude();
        let id = engine.create_static("spikes", 300.0, 300.0).unwrap();

        engine.step(1.0).unwrap();

        assert_eq!(engine.position(id).unwrap(), Vec2::new(300.0, 300.0));
        engine.destroy();
    }

    #[test]
    fn horizontal_velocity_moves_body() {
        let mut engine = engine_with_dude();
        let id = engine.create_sprite("dude", 100.0, 576.0).unwrap();
        engine.set_collide_world_bounds(id, true).unwrap();
        engine.set_velocity_x(id, 200.0).unwrap();

        engine.step(0.5).unwrap();

        assert_eq!(engine.position(id).unwrap().x, 200.0);
        engine.destroy();
    }

    #[test]
    fn overlap_pairs_report_contacts() {
        let mut engine = engine_with_dude();
        let player = engine.create_sprite("dude", 100.0, 100.0).unwrap();
        let spikes = engine.create_static("spikes", 110.0, 100.0).unwrap();
        let overlap = engine.add_overlap(player, spikes).unwrap();

        let contacts = engine.step(0.0).unwrap();

        assert_eq!(contacts, vec![Contact { overlap, a: player, b: spikes }]);
        engine.destroy();
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    #[test]
    fn destroyed_instance_rejects_calls() {
        let mut engine = engine_with_dude();
        let id = engine.create_sprite("dude", 0.0, 0.0).unwrap();

        engine.destroy();

        assert!(engine.is_destroyed());
        assert_eq!(engine.position(id), Err(EngineError::Destroyed));
        assert_eq!(engine.step(0.1), Err(EngineError::Destroyed));
    }

    #[test]
    fn tracker_counts_live_instances() {
        let live = LiveInstances::new();
        let factory = SimEngineFactory::with_tracker(live.clone());

        let mut first = factory.build(&settings());
        assert_eq!(live.count(), 1);

        let mut second = factory.build(&settings());
        assert_eq!(live.count(), 2);

        first.destroy();
        first.destroy();
        assert_eq!(live.count(), 1);

        second.destroy();
        assert_eq!(live.count(), 0);
    }
}
