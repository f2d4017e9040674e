//=========================================================================
// Hotswap Platformer: Library Root
//
// A 2D platformer whose player survives live code reloads.
//
// Responsibilities:
// - Expose the runtime entry point (`RuntimeBuilder`)
// - Expose the reload protocol, scene and engine backend in `core`
// - Keep the window layer (`platform`) private
//
// Typical usage:
// ```no_run
// use hotswap_platformer::RuntimeBuilder;
//
// fn main() {
//     RuntimeBuilder::new().build().run().unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs on the logic thread: the reload
// host and coordinator, the scene controller, the engine backend and
// input handling. It can be driven headless, without a window.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the Winit window and event loop. It is not part of the
// public API surface.
//
mod platform;
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use runtime::{Runtime, RuntimeBuilder};
