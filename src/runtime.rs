//=========================================================================
// Runtime
//
// Main entry point: wires the window, the core thread and the reload host.
//
// Architecture:
// ```text
//     RuntimeBuilder  ──build()──>  Runtime  ──run()──>  [Threads]
//         │                           │
//         ├─ with_tps()               └─ spawns core thread
//         ├─ with_channel_capacity()     runs platform
//         └─ with_tuning_file()          blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::loader::ModuleLoader;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

const WINDOW_TITLE: &str = "Hotswap Platformer";

//=== RuntimeBuilder ======================================================

/// Builder for configuring and constructing a [`Runtime`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Tuning**: [`GameConfig::default`], no tuning file
///
/// # Examples
///
/// ```no_run
/// use hotswap_platformer::RuntimeBuilder;
///
/// RuntimeBuilder::new()
///     .with_tps(120.0)
///     .with_tuning_file("tuning.toml")
///     .build()
///     .run()
///     .unwrap();
/// ```
pub struct RuntimeBuilder {
    tps: f64,
    channel_capacity: usize,
    tuning_file: Option<PathBuf>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            tuning_file: None,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Every frame advances the simulation by exactly `1 / tps` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the TOML file re-read on every hot reload.
    ///
    /// The file is also read once at build time; if that fails the
    /// configured defaults are used.
    pub fn with_tuning_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tuning_file = Some(path.into());
        self
    }

    pub fn build(self) -> Runtime {
        info!("Building runtime (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let config = match &self.tuning_file {
            Some(path) => GameConfig::load(path).unwrap_or_else(|e| {
                warn!(target: "config", "Using default tuning, {}: {}", path.display(), e);
                GameConfig::default()
            }),
            None => GameConfig::default(),
        };

        let window_size = (config.width, config.height);
        let mut loader = ModuleLoader::new(config);
        if let Some(path) = self.tuning_file {
            loader = loader.with_tuning_file(path);
        }

        Runtime {
            orchestrator: CoreSystemsOrchestrator::new(loader),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window_size,
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Runtime =============================================================

/// A configured game session, ready to run.
///
/// ```text
/// Runtime (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► ReloadHost ─► ReloadCoordinator ─► SimEngine
///   │
///   └─► Platform (Event Loop)
///         └─► Window, keyboard
/// ```
pub struct Runtime {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    window_size: (u32, u32),
}

impl Runtime {
    /// Runs until the window closes.
    ///
    /// 1. Creates the platform → core channel
    /// 2. Spawns the logic thread at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. Joins the logic thread
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, WINDOW_TITLE, self.window_size);
        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Wait for logic thread to terminate ------------------------
        if core_handle.join().is_err() {
            error!("Core thread panicked");
            return Err(PlatformError::CoreThreadPanicked);
        }

        info!("Runtime shutdown complete");
        platform_result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
