//=========================================================================
// Scene System
//=========================================================================
//
// Engine-driven scene lifecycle that rebuilds every entity whenever a
// module is (re-)evaluated.
//
// Flow:
//   preload() → create(session) → update() every frame
//                                    ↑
//   capture() at teardown ───────────┘ (reads the live player)
//
// Scenes never hold engine objects across instances: every `create`
// starts from an empty engine and whatever the session carries over.
//
//=========================================================================

//=== Module Declarations =================================================

mod blink;
mod movement;
mod platformer;
mod player;

//=== Public API ==========================================================

pub use blink::{Blink, DIM_ALPHA};
pub use movement::{plan_frame, FramePlan};
pub use platformer::{LevelLayout, PlatformerScene, HAZARD_KEY, PLAYER_KEY};
pub use player::{Animation, Facing, PlayerSnapshot};

//=== Internal Dependencies ===============================================

use crate::core::backend::{Contact, EngineBackend};
use crate::core::error::EngineError;
use crate::core::input::Controls;
use crate::core::reload::SessionState;

//=== Scene Trait =========================================================

/// Defines scene behavior across the preload → create → update lifecycle.
///
/// The same scene value may be asked to `create` on a brand-new engine
/// instance; implementations must not assume entities from a previous
/// instance still exist.
pub trait Scene<E: EngineBackend> {
    /// Name the scene is registered under in the engine instance.
    fn key(&self) -> &'static str;

    /// Registers assets with a freshly built engine instance.
    fn preload(&mut self, engine: &mut E);

    /// Builds all entities, consuming any snapshot carried by `session`.
    fn create(&mut self, engine: &mut E, session: &mut SessionState) -> Result<(), EngineError>;

    /// Called once per frame after the engine has stepped.
    fn update(
        &mut self,
        engine: &mut E,
        controls: Controls,
        contacts: &[Contact],
    ) -> Result<(), EngineError>;

    /// Reads the live player so it can be handed to the next module.
    ///
    /// Returns `None` if the scene has not created its player yet.
    fn capture(&self, engine: &E) -> Result<Option<PlayerSnapshot>, EngineError>;
}
