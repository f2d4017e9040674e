//=========================================================================
// Reload Coordinator
//=========================================================================
//
// One reloadable module instance: owns the session state, the scene
// controller and the engine instance, and sequences the handoff.
//
// Lifecycle:
// ```text
//   Initial eval:  Ready ──start()──> Running ──on_teardown()──> TornDown
//                         build + create
//
//   Reload eval:   AwaitingAccept ──on_accept()──> Ready ──start()──> Running …
//                        │           build         create
//                        └─ start() here is CreateBeforeAccept
// ```
//
// The engine instance is destroyed inside `on_teardown`, before the host
// evaluates the replacement module. The replacement builds its instance
// while accepting, so exactly one is alive from the moment `on_accept`
// returns; the scene is only created on `start`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::host::{HotModule, ModuleEval};
use super::registry::{ReloadEntry, ReloadRegistry};
use super::scheduler::{Deferred, Scheduler};
use super::session::SessionState;
use crate::core::backend::{EngineBackend, EngineFactory};
use crate::core::config::GameConfig;
use crate::core::error::ReloadError;
use crate::core::input::Controls;
use crate::core::scene::{PlayerSnapshot, Scene};

//=== Phase ===============================================================

/// Where a module is in the reload protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Evaluated as a reload; must accept before creating entities.
    AwaitingAccept,

    /// Free to create the scene. After an accept the instance already
    /// exists here.
    Ready,

    /// Scene created, frames being ticked.
    Running,

    /// Engine instance destroyed, state handed to the registry.
    TornDown,
}

//=== ReloadCoordinator ===================================================

/// A reloadable module: session state + scene + engine instance.
pub struct ReloadCoordinator<F, S>
where
    F: EngineFactory,
    S: Scene<F::Engine>,
{
    factory: F,
    scene: S,
    config: GameConfig,
    session: SessionState,
    engine: Option<F::Engine>,
    phase: Phase,
    evaluated: bool,
}

impl<F, S> ReloadCoordinator<F, S>
where
    F: EngineFactory,
    S: Scene<F::Engine>,
{
    //--- Construction -----------------------------------------------------

    /// Evaluates a module. The engine is not built yet.
    ///
    /// The module counts as still evaluating until
    /// [`finish_evaluation`](Self::finish_evaluation) is called.
    pub fn new(eval: ModuleEval, factory: F, scene: S, config: GameConfig) -> Self {
        let phase = match eval {
            ModuleEval::Initial => Phase::Ready,
            ModuleEval::Reload => Phase::AwaitingAccept,
        };
        debug!(target: "reload", "Module evaluated ({:?})", eval);

        Self {
            factory,
            scene,
            config,
            session: SessionState::default(),
            engine: None,
            phase,
            evaluated: false,
        }
    }

    /// Marks the end of module evaluation.
    pub fn finish_evaluation(&mut self) {
        self.evaluated = true;
    }

    /// Starts now if evaluation has finished, otherwise defers to the
    /// next scheduler tick.
    pub fn request_start(&mut self, scheduler: &Scheduler) -> Result<bool, ReloadError> {
        if self.evaluated {
            self.start_engine()
        } else {
            scheduler.defer(Deferred::StartEngine);
            Ok(false)
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn reload_count(&self) -> u64 {
        self.session.reload_count
    }

    pub fn engine(&self) -> Option<&F::Engine> {
        self.engine.as_ref()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Current state of the live player, if there is one.
    pub fn player(&self) -> Result<Option<PlayerSnapshot>, ReloadError> {
        match &self.engine {
            Some(engine) => Ok(self.scene.capture(engine)?),
            None => Ok(None),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Builds the engine instance and preloads the scene's assets.
    ///
    /// A no-op if an instance already exists.
    fn build_engine(&mut self) {
        if self.engine.is_some() {
            return;
        }

        let settings = self.config.engine_settings(self.scene.key());
        let mut engine = self.factory.build(&settings);
        self.scene.preload(&mut engine);
        self.engine = Some(engine);
    }

    /// Creates the scene, building the instance first if needed.
    ///
    /// Returns `Ok(false)` without side effects once the scene exists.
    fn start_engine(&mut self) -> Result<bool, ReloadError> {
        match self.phase {
            Phase::AwaitingAccept => return Err(ReloadError::CreateBeforeAccept),
            Phase::TornDown => return Err(ReloadError::TornDown),
            Phase::Running => {
                warn!(target: "reload", "Scene already created, skipping construction");
                return Ok(false);
            }
            Phase::Ready => {}
        }

        self.build_engine();
        let Some(engine) = self.engine.as_mut() else {
            return Err(ReloadError::NotRunning);
        };

        if let Err(e) = self.scene.create(engine, &mut self.session) {
            engine.destroy();
            self.engine = None;
            return Err(e.into());
        }
        self.phase = Phase::Running;

        info!(
            target: "reload",
            "Engine instance running (reload #{})",
            self.session.reload_count
        );
        Ok(true)
    }
}

//=== HotModule Implementation ============================================

impl<F, S> HotModule for ReloadCoordinator<F, S>
where
    F: EngineFactory,
    S: Scene<F::Engine>,
{
    fn on_teardown(&mut self, registry: &mut ReloadRegistry) -> Result<(), ReloadError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(ReloadError::NotRunning);
        };

        let player = self.scene.capture(engine)?;
        registry.stash(ReloadEntry {
            player,
            reload_count: self.session.reload_count,
        })?;

        // Destroying releases the instance's input bindings. Skipping this
        // leaves a rendering but unresponsive player after the swap.
        engine.destroy();
        self.engine = None;
        self.phase = Phase::TornDown;

        info!(
            target: "reload",
            "Teardown complete (reload_count {})",
            self.session.reload_count
        );
        Ok(())
    }

    fn on_accept(&mut self, registry: &mut ReloadRegistry) -> Result<(), ReloadError> {
        if self.phase != Phase::AwaitingAccept {
            return Err(ReloadError::UnexpectedAccept);
        }

        let entry = registry.take()?;
        self.session.reload_count = entry.reload_count + 1;
        self.session.restore = entry.player;
        self.phase = Phase::Ready;

        // The old instance is gone by now; the new one must exist before
        // accept returns, with its scene still uncreated.
        self.build_engine();

        info!(target: "reload", "Accepted reload #{}", self.session.reload_count);
        Ok(())
    }

    fn start(&mut self) -> Result<bool, ReloadError> {
        self.evaluated = true;
        self.start_engine()
    }

    fn run_deferred(&mut self, task: Deferred) -> Result<(), ReloadError> {
        match task {
            Deferred::StartEngine => {
                if self.phase == Phase::Running {
                    debug!(target: "reload", "Deferred start skipped, scene exists");
                } else {
                    self.start_engine()?;
                }
            }
        }
        Ok(())
    }

    fn tick(&mut self, controls: Controls, dt: f32) -> Result<(), ReloadError> {
        if self.phase != Phase::Running {
            return Err(ReloadError::NotRunning);
        }
        let Some(engine) = self.engine.as_mut() else {
            return Err(ReloadError::NotRunning);
        };

        let contacts = engine.step(dt)?;
        self.scene.update(engine, controls, &contacts)?;
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
            self.phase = Phase::TornDown;
            info!(target: "reload", "Module shut down");
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::{LiveInstances, SimEngineFactory, Vec2};
    use crate::core::scene::{Facing, LevelLayout, PlatformerScene};

    type Module = ReloadCoordinator<SimEngineFactory, PlatformerScene>;

    const DT: f32 = 1.0 / 60.0;

    fn module(eval: ModuleEval, live: &LiveInstances) -> Module {
        let config = GameConfig::default();
        ReloadCoordinator::new(
            eval,
            SimEngineFactory::with_tracker(live.clone()),
            PlatformerScene::new(config.clone(), LevelLayout::empty()),
            config,
        )
    }

    fn position(module: &Module) -> Vec2 {
        module.player().unwrap().unwrap().position
    }

    //=====================================================================
    // No-reload path
    //=====================================================================

    #[test]
    fn initial_start_builds_one_instance() {
        let live = LiveInstances::new();
        let mut m = module(ModuleEval::Initial, &live);

        assert_eq!(m.phase(), Phase::Ready);
        assert!(m.start().unwrap());

        assert_eq!(m.phase(), Phase::Running);
        assert_eq!(live.count(), 1);
        assert_eq!(m.reload_count(), 0);
        assert_eq!(position(&m), Vec2::new(100.0, 450.0));
        m.shutdown();
    }

    #[test]
    fn second_start_is_ignored() {
        let live = LiveInstances::new();
        let mut m = module(ModuleEval::Initial, &live);

        assert!(m.start().unwrap());
        assert!(!m.start().unwrap());
        assert_eq!(live.count(), 1);
        m.shutdown();
    }

    //=====================================================================
    // Deferred construction
    //=====================================================================

    #[test]
    fn start_during_evaluation_is_deferred() {
        let live = LiveInstances::new();
        let scheduler = Scheduler::new();
        let mut m = module(ModuleEval::Initial, &live);

        assert!(!m.request_start(&scheduler).unwrap());
        assert!(m.engine().is_none());
        assert_eq!(live.count(), 0);

        m.finish_evaluation();
        for task in scheduler.drain() {
            m.run_deferred(task).unwrap();
        }

        assert!(m.engine().is_some());
        assert_eq!(live.count(), 1);
        m.shutdown();
    }

    #[test]
    fn deferred_start_after_direct_start_is_noop() {
        let live = LiveInstances::new();
        let scheduler = Scheduler::new();
        let mut m = module(ModuleEval::Initial, &live);

        m.request_start(&scheduler).unwrap();
        m.finish_evaluation();
        m.start().unwrap();

        for task in scheduler.drain() {
            m.run_deferred(task).unwrap();
        }

        assert_eq!(live.count(), 1);
        m.shutdown();
    }

    #[test]
    fn request_start_after_evaluation_runs_immediately() {
        let live = LiveInstances::new();
        let scheduler = Scheduler::new();
        let mut m = module(ModuleEval::Initial, &live);

        m.finish_evaluation();
        assert!(m.request_start(&scheduler).unwrap());
        assert!(scheduler.is_empty());
        m.shutdown();
    }

    //=====================================================================
    // Teardown / Accept
    //=====================================================================

    #[test]
    fn teardown_stashes_player_and_destroys_instance() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();
        let mut m = module(ModuleEval::Initial, &live);
        m.start().unwrap();
        m.tick(Controls { right: true, ..Controls::default() }, DT).unwrap();
        m.tick(Controls::default(), DT).unwrap();
        let before = position(&m);

        m.on_teardown(&mut registry).unwrap();

        assert_eq!(live.count(), 0);
        assert!(m.engine().is_none());
        assert_eq!(m.phase(), Phase::TornDown);

        let entry = registry.take().unwrap();
        let player = entry.player.unwrap();
        assert_eq!(player.position, before);
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(entry.reload_count, 0);
    }

    #[test]
    fn teardown_carries_live_body_flags() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();
        let mut m = module(ModuleEval::Initial, &live);
        m.start().unwrap();

        let id = m.scene().player().unwrap();
        m.engine.as_mut().unwrap().set_bounce(id, 0.75).unwrap();
        m.on_teardown(&mut registry).unwrap();

        let player = registry.take().unwrap().player.unwrap();
        assert_eq!(player.bounce, 0.75);
        assert!(player.collide_world_bounds);
    }

    #[test]
    fn teardown_without_engine_fails() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();
        let mut m = module(ModuleEval::Initial, &live);

        assert_eq!(m.on_teardown(&mut registry), Err(ReloadError::NotRunning));
        assert!(registry.is_empty());
    }

    #[test]
    fn torn_down_module_cannot_restart() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();
        let mut m = module(ModuleEval::Initial, &live);
        m.start().unwrap();
        m.on_teardown(&mut registry).unwrap();

        assert_eq!(m.start(), Err(ReloadError::TornDown));
        assert_eq!(live.count(), 0);
    }

    #[test]
    fn accept_increments_counter_and_restores_player() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();

        let mut old = module(ModuleEval::Initial, &live);
        old.start().unwrap();
        old.tick(Controls { left: true, ..Controls::default() }, DT).unwrap();
        old.tick(Controls::default(), DT).unwrap();
        let before = position(&old);
        old.on_teardown(&mut registry).unwrap();

        let mut new = module(ModuleEval::Reload, &live);
        assert_eq!(live.count(), 0);
        new.on_accept(&mut registry).unwrap();

        assert_eq!(new.reload_count(), 1);
        assert_eq!(new.phase(), Phase::Ready);
        assert_eq!(live.count(), 1, "accept leaves exactly one instance alive");
        assert!(new.scene().player().is_none(), "scene is created by start, not accept");
        assert_eq!(new.tick(Controls::default(), DT), Err(ReloadError::NotRunning));

        assert!(new.start().unwrap());
        assert_eq!(live.count(), 1);
        assert_eq!(position(&new), before);
        assert_eq!(new.scene().facing(), Some(Facing::Left));
        assert!(new.session().restore.is_none());
        new.shutdown();
    }

    //=====================================================================
    // Ordering violations
    //=====================================================================

    #[test]
    fn reload_module_refuses_create_before_accept() {
        let live = LiveInstances::new();
        let mut m = module(ModuleEval::Reload, &live);

        assert_eq!(m.start(), Err(ReloadError::CreateBeforeAccept));
        assert_eq!(live.count(), 0);
    }

    #[test]
    fn deferred_start_before_accept_fails() {
        let live = LiveInstances::new();
        let mut m = module(ModuleEval::Reload, &live);

        assert_eq!(
            m.run_deferred(Deferred::StartEngine),
            Err(ReloadError::CreateBeforeAccept)
        );
    }

    #[test]
    fn accept_without_teardown_fails() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();
        let mut m = module(ModuleEval::Reload, &live);

        assert_eq!(m.on_accept(&mut registry), Err(ReloadError::NothingToAccept));
        assert_eq!(m.phase(), Phase::AwaitingAccept);
    }

    #[test]
    fn accept_after_start_fails() {
        let live = LiveInstances::new();
        let mut registry = ReloadRegistry::new();
        let mut m = module(ModuleEval::Initial, &live);
        m.start().unwrap();

        assert_eq!(m.on_accept(&mut registry), Err(ReloadError::UnexpectedAccept));
        assert_eq!(m.phase(), Phase::Running);
        assert_eq!(live.count(), 1);
        m.shutdown();
    }

    #[test]
    fn deferred_start_after_accept_reuses_instance() {
        let live = LiveInstances::new();
        let scheduler = Scheduler::new();
        let mut registry = ReloadRegistry::new();

        let mut old = module(ModuleEval::Initial, &live);
        old.start().unwrap();
        old.on_teardown(&mut registry).unwrap();

        let mut new = module(ModuleEval::Reload, &live);
        assert!(!new.request_start(&scheduler).unwrap());
        new.finish_evaluation();
        new.on_accept(&mut registry).unwrap();
        assert_eq!(live.count(), 1);

        for task in scheduler.drain() {
            new.run_deferred(task).unwrap();
        }
        assert_eq!(new.phase(), Phase::Running);
        assert_eq!(live.count(), 1);

        assert!(!new.start().unwrap());
        assert_eq!(live.count(), 1);
        new.shutdown();
        assert_eq!(live.count(), 0);
    }

    #[test]
    fn tick_before_start_fails() {
        let live = LiveInstances::new();
        let mut m = module(ModuleEval::Initial, &live);

        assert_eq!(m.tick(Controls::default(), DT), Err(ReloadError::NotRunning));
    }

    #[test]
    fn shutdown_destroys_instance() {
        let live = LiveInstances::new();
        let mut m = module(ModuleEval::Initial, &live);
        m.start().unwrap();

        m.shutdown();

        assert_eq!(live.count(), 0);
        assert!(m.engine().is_none());
        assert_eq!(m.phase(), Phase::TornDown);
    }
}
