//=========================================================================
// Module Loader
//=========================================================================
//
// Evaluates the platformer module for the reload host.
//
// Each evaluation builds a brand-new coordinator, scene controller and
// engine factory. On reload the tuning file is read again first, so the
// replacement module runs with whatever tunables are on disk.
//
// Evaluation mirrors a module body that kicks off construction before it
// has finished executing: `request_start` is issued mid-evaluation and
// lands on the scheduler, then the host's own `start` wins the race and
// the deferred task is skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::backend::SimEngineFactory;
use crate::core::config::GameConfig;
use crate::core::reload::{ModuleEval, ReloadCoordinator, Scheduler};
use crate::core::scene::{LevelLayout, PlatformerScene};

//=== GameModule ==========================================================

/// The reloadable unit the runtime hosts.
pub type GameModule = ReloadCoordinator<SimEngineFactory, PlatformerScene>;

//=== ModuleLoader ========================================================

/// Produces fresh [`GameModule`]s, re-reading tunables on reload.
pub struct ModuleLoader {
    config: GameConfig,
    tuning_file: Option<PathBuf>,
    level: LevelLayout,
}

impl ModuleLoader {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            tuning_file: None,
            level: LevelLayout::default(),
        }
    }

    pub fn with_tuning_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tuning_file = Some(path.into());
        self
    }

    pub fn with_level(mut self, level: LevelLayout) -> Self {
        self.level = level;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Evaluates one module instance.
    pub fn evaluate(&mut self, eval: ModuleEval, scheduler: &Scheduler) -> GameModule {
        if eval == ModuleEval::Reload {
            self.refresh_tuning();
        }

        let mut module = ReloadCoordinator::new(
            eval,
            SimEngineFactory::new(),
            PlatformerScene::new(self.config.clone(), self.level.clone()),
            self.config.clone(),
        );

        // Not yet evaluated, so this only queues the continuation.
        if let Err(e) = module.request_start(scheduler) {
            warn!(target: "reload", "Start request during evaluation failed: {}", e);
        }
        module.finish_evaluation();
        module
    }

    //--- Internal Helpers -------------------------------------------------

    /// Replaces the config with the tuning file's contents.
    ///
    /// A missing or broken file keeps the last good config.
    fn refresh_tuning(&mut self) {
        let Some(path) = &self.tuning_file else {
            return;
        };

        match GameConfig::load(path) {
            Ok(config) => {
                if config != self.config {
                    info!(target: "config", "Tuning changed, applying to reloaded module");
                }
                self.config = config;
            }
            Err(e) => {
                warn!(
                    target: "config",
                    "Keeping previous tuning, {} unusable: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
