//=========================================================================
// Reload Host
//=========================================================================
//
// The runtime side of the reload contract: owns the registry, evaluates
// module instances and calls their hooks in the only legal order.
//
// Reload sequence:
// ```text
//   old.on_teardown(registry)      state out, engine destroyed
//   drop(old)                      module replaced
//   new = evaluate(Reload)
//   new.on_accept(registry)        state in, counter + 1, engine built
//   new.start()                    scene created
// ```
//
// Nothing else runs in between: update, teardown and accept all happen on
// the core thread, one at a time.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::registry::ReloadRegistry;
use super::scheduler::{Deferred, Scheduler};
use crate::core::error::ReloadError;
use crate::core::input::Controls;

//=== ModuleEval ==========================================================

/// Why a module is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleEval {
    /// Process start. No registry entry is consulted.
    Initial,

    /// Replacement for a torn-down module. Must accept before creating.
    Reload,
}

//=== HotModule ===========================================================

/// Two-phase callback interface every reloadable module implements.
pub trait HotModule {
    /// Called right before the module is replaced.
    ///
    /// Writes carry-over state into `registry` and destroys the engine
    /// instance.
    fn on_teardown(&mut self, registry: &mut ReloadRegistry) -> Result<(), ReloadError>;

    /// Called right after the replacement is evaluated, before `start`.
    ///
    /// Takes the carry-over state and builds the new engine instance,
    /// leaving scene creation to `start`.
    fn on_accept(&mut self, registry: &mut ReloadRegistry) -> Result<(), ReloadError>;

    /// Creates the scene, building the engine instance if none exists.
    ///
    /// Returns whether the scene was created by this call.
    fn start(&mut self) -> Result<bool, ReloadError>;

    /// Runs a continuation queued on the scheduler.
    fn run_deferred(&mut self, task: Deferred) -> Result<(), ReloadError>;

    /// Advances one frame.
    fn tick(&mut self, controls: Controls, dt: f32) -> Result<(), ReloadError>;

    /// Destroys the engine instance without handing state over.
    fn shutdown(&mut self);
}

//=== ReloadHost ==========================================================

/// Owns the process-lifetime registry and drives module replacement.
///
/// `evaluate` stands in for re-executing module code: it is called once
/// at boot and once per reload, and must return a brand-new module.
pub struct ReloadHost<M, B>
where
    M: HotModule,
    B: FnMut(ModuleEval, &Scheduler) -> M,
{
    registry: ReloadRegistry,
    scheduler: Scheduler,
    evaluate: B,
    module: Option<M>,
}

impl<M, B> ReloadHost<M, B>
where
    M: HotModule,
    B: FnMut(ModuleEval, &Scheduler) -> M,
{
    pub fn new(evaluate: B) -> Self {
        Self {
            registry: ReloadRegistry::new(),
            scheduler: Scheduler::new(),
            evaluate,
            module: None,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Evaluates and starts the first module.
    pub fn boot(&mut self) -> Result<(), ReloadError> {
        if self.module.is_some() {
            warn!(target: "reload", "Host already booted, ignoring");
            return Ok(());
        }

        info!(target: "reload", "Booting initial module");
        let module = self
            .module
            .insert((self.evaluate)(ModuleEval::Initial, &self.scheduler));
        module.start()?;
        Ok(())
    }

    /// Replaces the running module, carrying its state across.
    pub fn reload(&mut self) -> Result<(), ReloadError> {
        let Some(mut old) = self.module.take() else {
            return Err(ReloadError::NotRunning);
        };

        info!(target: "reload", "Hot reload requested");

        if let Err(e) = old.on_teardown(&mut self.registry) {
            self.module = Some(old);
            return Err(e);
        }
        drop(old);

        let stale = self.scheduler.clear();
        if stale > 0 {
            debug!(target: "reload", "Dropped {} continuations from replaced module", stale);
        }

        let module = self
            .module
            .insert((self.evaluate)(ModuleEval::Reload, &self.scheduler));
        module.on_accept(&mut self.registry)?;
        module.start()?;
        Ok(())
    }

    /// Runs pending continuations, then one frame.
    pub fn tick(&mut self, controls: Controls, dt: f32) -> Result<(), ReloadError> {
        let module = self.module.as_mut().ok_or(ReloadError::NotRunning)?;

        for task in self.scheduler.drain() {
            module.run_deferred(task)?;
        }
        module.tick(controls, dt)
    }

    /// Destroys the running module's engine instance.
    pub fn shutdown(&mut self) {
        if let Some(module) = self.module.as_mut() {
            module.shutdown();
        }
        self.module = None;
    }

    //--- Queries ----------------------------------------------------------

    pub fn module(&self) -> Option<&M> {
        self.module.as_ref()
    }

    pub fn registry(&self) -> &ReloadRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::{LiveInstances, SimEngineFactory, Vec2};
    use crate::core::config::GameConfig;
    use crate::core::reload::ReloadCoordinator;
    use crate::core::scene::{Facing, LevelLayout, PlatformerScene};

    type Module = ReloadCoordinator<SimEngineFactory, PlatformerScene>;

    const DT: f32 = 1.0 / 60.0;

    fn right() -> Controls {
        Controls { right: true, ..Controls::default() }
    }

    fn host(
        live: &LiveInstances,
        defer_start: bool,
    ) -> ReloadHost<Module, impl FnMut(ModuleEval, &Scheduler) -> Module> {
        let live = live.clone();
        ReloadHost::new(move |eval, scheduler: &Scheduler| {
            let config = GameConfig::default();
            let mut module = ReloadCoordinator::new(
                eval,
                SimEngineFactory::with_tracker(live.clone()),
                PlatformerScene::new(config.clone(), LevelLayout::empty()),
                config,
            );
            if defer_start {
                module
                    .request_start(scheduler)
                    .expect("deferring never fails");
            }
            module.finish_evaluation();
            module
        })
    }

    fn position<B>(host: &ReloadHost<Module, B>) -> Vec2
    where
        B: FnMut(ModuleEval, &Scheduler) -> Module,
    {
        host.module().unwrap().player().unwrap().unwrap().position
    }

    fn reload_count<B>(host: &ReloadHost<Module, B>) -> u64
    where
        B: FnMut(ModuleEval, &Scheduler) -> Module,
    {
        host.module().unwrap().reload_count()
    }

    //=====================================================================
    // End-to-end
    //=====================================================================

    #[test]
    fn position_survives_reload_mid_move() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);

        host.boot().unwrap();
        assert_eq!(position(&host), Vec2::new(100.0, 450.0));
        assert_eq!(reload_count(&host), 0);

        // First frame sets the velocity; movement shows from the second.
        host.tick(right(), DT).unwrap();
        let mut last_x = position(&host).x;
        for _ in 0..30 {
            host.tick(right(), DT).unwrap();
            let x = position(&host).x;
            assert!((x - last_x - 200.0 * DT).abs() < 1e-3, "moved {}", x - last_x);
            last_x = x;
        }

        let before = position(&host);
        host.reload().unwrap();

        assert_eq!(position(&host), before);
        assert_eq!(reload_count(&host), 1);
        assert_eq!(live.count(), 1);
        assert_eq!(host.module().unwrap().scene().facing(), Some(Facing::Right));

        host.shutdown();
        assert_eq!(live.count(), 0);
    }

    #[test]
    fn counter_increments_once_per_reload() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);
        host.boot().unwrap();

        for expected in 1..=5 {
            host.tick(right(), DT).unwrap();
            host.reload().unwrap();

            assert_eq!(reload_count(&host), expected);
            assert_eq!(host.registry().handoffs(), expected);
            assert_eq!(live.count(), 1);
        }
        host.shutdown();
    }

    #[test]
    fn one_instance_alive_between_accept_and_start() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);
        host.boot().unwrap();

        let mut old = host.module.take().unwrap();
        old.on_teardown(&mut host.registry).unwrap();
        drop(old);
        assert_eq!(live.count(), 0);

        let mut new = (host.evaluate)(ModuleEval::Reload, &host.scheduler);
        new.on_accept(&mut host.registry).unwrap();

        assert_eq!(live.count(), 1);
        assert!(new.scene().player().is_none());

        new.start().unwrap();
        assert_eq!(live.count(), 1);
        new.shutdown();
    }

    #[test]
    fn player_keeps_moving_after_reload() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);
        host.boot().unwrap();
        host.tick(right(), DT).unwrap();
        host.reload().unwrap();

        let before = position(&host).x;
        host.tick(right(), DT).unwrap();
        host.tick(right(), DT).unwrap();

        assert!(position(&host).x > before, "new instance responds to input");
        host.shutdown();
    }

    //=====================================================================
    // Deferred construction
    //=====================================================================

    #[test]
    fn deferred_and_direct_start_build_one_instance() {
        let live = LiveInstances::new();
        let mut host = host(&live, true);

        host.boot().unwrap();
        assert_eq!(live.count(), 1);
        assert!(!host.scheduler().is_empty());

        host.tick(Controls::default(), DT).unwrap();
        assert_eq!(live.count(), 1);
        assert!(host.scheduler().is_empty());

        host.reload().unwrap();
        host.tick(Controls::default(), DT).unwrap();
        assert_eq!(live.count(), 1);
        host.shutdown();
    }

    //=====================================================================
    // Failure paths
    //=====================================================================

    #[test]
    fn reload_before_boot_fails() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);

        assert_eq!(host.reload(), Err(ReloadError::NotRunning));
        assert_eq!(live.count(), 0);
    }

    #[test]
    fn tick_before_boot_fails() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);

        assert_eq!(host.tick(Controls::default(), DT), Err(ReloadError::NotRunning));
    }

    #[test]
    fn boot_twice_is_ignored() {
        let live = LiveInstances::new();
        let mut host = host(&live, false);

        host.boot().unwrap();
        host.boot().unwrap();

        assert_eq!(live.count(), 1);
        host.shutdown();
    }
}
