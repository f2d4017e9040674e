//=========================================================================
// Engine Backend
//=========================================================================
//
// The capability surface the game consumes from its engine.
//
// Architecture:
// ```text
//   EngineFactory ──build(settings)──> EngineBackend (one live instance)
//                                          │
//        Scene ── create_sprite / set_velocity / play_animation ──┤
//        Coordinator ── step(dt) → Vec<Contact> ──────────────────┤
//        Coordinator ── destroy() ────────────────────────────────┘
// ```
//
// Rendering and physics belong to the backend. The crate ships
// `SimEngine`, a headless implementation good enough to answer every
// capability query deterministically.
//
//=========================================================================

//=== Module Declarations =================================================

mod sim_engine;

//=== Public API ==========================================================

pub use sim_engine::{LiveInstances, SimEngine, SimEngineFactory};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;

//=== Handles =============================================================

/// Handle to an entity inside a single engine instance.
///
/// Handles are never valid across instances: after a reload every entity
/// is recreated and receives a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

/// Handle to a registered overlap pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapId(pub(crate) u32);

//=== Vec2 ================================================================

/// 2D vector in world pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

//=== EngineSettings ======================================================

/// How the canvas is scaled to the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Native size, no scaling.
    None,

    /// Scale to fit while preserving aspect ratio.
    #[default]
    Fit,
}

/// Parameters an engine instance is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub width: u32,
    pub height: u32,
    pub scale_mode: ScaleMode,
    /// World gravity applied to every dynamic body (pixels / s²).
    pub gravity_y: f32,
    /// Name of the scene registered with the instance.
    pub scene: String,
}

//=== Contact =============================================================

/// An overlap reported by [`EngineBackend::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub overlap: OverlapId,
    pub a: EntityId,
    pub b: EntityId,
}

//=== EngineBackend =======================================================

/// Capability surface of a running engine instance.
///
/// Every entity operation fails with [`EngineError::Destroyed`] once
/// [`EngineBackend::destroy`] has been called.
pub trait EngineBackend {
    //--- Assets -----------------------------------------------------------

    /// Registers an animated spritesheet under `key`.
    fn preload_spritesheet(&mut self, key: &str, frame_width: u32, frame_height: u32);

    /// Registers a static image under `key`.
    fn preload_image(&mut self, key: &str, width: u32, height: u32);

    //--- Entities ---------------------------------------------------------

    /// Creates a dynamic (gravity-affected) sprite centred on `(x, y)`.
    fn create_sprite(&mut self, key: &str, x: f32, y: f32) -> Result<EntityId, EngineError>;

    /// Creates an immovable sprite centred on `(x, y)`.
    fn create_static(&mut self, key: &str, x: f32, y: f32) -> Result<EntityId, EngineError>;

    fn position(&self, id: EntityId) -> Result<Vec2, EngineError>;
    fn set_position(&mut self, id: EntityId, position: Vec2) -> Result<(), EngineError>;

    fn velocity(&self, id: EntityId) -> Result<Vec2, EngineError>;
    fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> Result<(), EngineError>;

    /// Sets only the horizontal velocity, leaving vertical untouched.
    fn set_velocity_x(&mut self, id: EntityId, vx: f32) -> Result<(), EngineError> {
        let v = self.velocity(id)?;
        self.set_velocity(id, Vec2::new(vx, v.y))
    }

    /// Sets only the vertical velocity, leaving horizontal untouched.
    fn set_velocity_y(&mut self, id: EntityId, vy: f32) -> Result<(), EngineError> {
        let v = self.velocity(id)?;
        self.set_velocity(id, Vec2::new(v.x, vy))
    }

    fn flip_x(&self, id: EntityId) -> Result<bool, EngineError>;
    fn set_flip_x(&mut self, id: EntityId, flip: bool) -> Result<(), EngineError>;

    fn alpha(&self, id: EntityId) -> Result<f32, EngineError>;
    fn set_alpha(&mut self, id: EntityId, alpha: f32) -> Result<(), EngineError>;

    //--- Physics Body -----------------------------------------------------

    fn collide_world_bounds(&self, id: EntityId) -> Result<bool, EngineError>;
    fn set_collide_world_bounds(&mut self, id: EntityId, collide: bool) -> Result<(), EngineError>;

    fn bounce(&self, id: EntityId) -> Result<f32, EngineError>;
    fn set_bounce(&mut self, id: EntityId, bounce: f32) -> Result<(), EngineError>;

    /// Extra gravity on top of the world gravity for this body.
    fn set_gravity_y(&mut self, id: EntityId, gravity_y: f32) -> Result<(), EngineError>;

    /// Whether the body touched the floor during the last step.
    fn is_on_floor(&self, id: EntityId) -> Result<bool, EngineError>;

    //--- Animation --------------------------------------------------------

    /// Plays the named animation; a no-op if it is already playing.
    fn play_animation(&mut self, id: EntityId, key: &str) -> Result<(), EngineError>;

    fn current_animation(&self, id: EntityId) -> Result<Option<&str>, EngineError>;

    //--- Collision --------------------------------------------------------

    /// Registers an overlap pair; matching contacts are reported by `step`.
    fn add_overlap(&mut self, a: EntityId, b: EntityId) -> Result<OverlapId, EngineError>;

    //--- Lifecycle --------------------------------------------------------

    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32) -> Result<Vec<Contact>, EngineError>;

    /// Tears the instance down, releasing its input and surface bindings.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

//=== EngineFactory =======================================================

/// Builds fresh engine instances.
///
/// The coordinator calls this once per session (and once per reload).
pub trait EngineFactory {
    type Engine: EngineBackend;

    fn build(&self, settings: &EngineSettings) -> Self::Engine;
}
