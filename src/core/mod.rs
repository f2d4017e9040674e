//=========================================================================
// Core Systems Orchestrator
//
// Runs the reload host on the logic (non-platform) thread.
//
// Responsibilities:
// - Own the reload host, the held-key tracker and the event collector
// - Receive platform events via the bridge channel
// - Perform hot reloads between frames when the platform asks for one
// - Maintain deterministic pacing using a fixed tick rate (TPS)
//
// Notes:
// The host and every engine instance live entirely on the core thread.
// Only the module loader (plain config data) crosses the thread boundary;
// the host is built after the thread starts.
//
// Per tick:
// ```text
//   collect events ─> KeyState ─> [reload?] ─> host.tick(controls, dt)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{error, info, trace};

//=== Internal Modules ====================================================
pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod loader;
pub(crate) mod platform_bridge;
pub mod reload;
pub mod scene;

use input::KeyState;
use loader::ModuleLoader;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use reload::ReloadHost;

//=== CoreSystemsOrchestrator =============================================
//
// Owns what the core thread needs before it starts. Everything with
// interior `Rc` state is created inside the thread.
//
pub(crate) struct CoreSystemsOrchestrator {
    loader: ModuleLoader,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub fn new(loader: ModuleLoader) -> Self {
        Self { loader }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread ticking the hosted module at `tps`.
    //
    // Each tick:
    //  1. Collects platform events (exits on close or disconnect)
    //  2. Updates held keys
    //  3. Reloads the module if requested
    //  4. Ticks the module with a fixed dt
    //  5. Sleeps to maintain fixed pacing
    //
    // Any reload or engine fault ends the loop. The engine instance is
    // destroyed on the way out.
    //
    pub fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();

        thread::spawn(move || {
            let mut loader = self.loader;
            let mut host = ReloadHost::new(move |eval, scheduler: &reload::Scheduler| {
                loader.evaluate(eval, scheduler)
            });
            let mut collector = EventCollector::new(receiver);
            let mut keys = KeyState::new();

            if let Err(e) = host.boot() {
                error!("Initial module failed to start: {}", e);
                host.shutdown();
                return;
            }

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 2: Held keys -------------------------------------
                if !collector.inputs().is_empty() {
                    trace!(target: "input", "{} key events this tick", collector.inputs().len());
                }
                keys.process_events(collector.inputs());

                //--- Step 3: Hot reload between frames --------------------
                if collector.take_reload_request() {
                    if let Err(e) = host.reload() {
                        error!(target: "reload", "Hot reload failed: {}", e);
                        break;
                    }
                }

                //--- Step 4: Update ----------------------------------------
                if let Err(e) = host.tick(keys.controls(), dt) {
                    error!("Frame update failed: {}", e);
                    break;
                }

                //--- Step 5: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            host.shutdown();
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
