//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use hotswap_platformer::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::runtime::{Runtime, RuntimeBuilder};
pub use crate::logging::{init_logging, LoggingConfig};

// Reload protocol
pub use crate::core::reload::{HotModule, ModuleEval, ReloadCoordinator, ReloadHost, ReloadRegistry};

// Engine backend
pub use crate::core::backend::{EngineBackend, EngineFactory, SimEngine, SimEngineFactory, Vec2};

// Scene
pub use crate::core::scene::{Facing, PlatformerScene, PlayerSnapshot, Scene};

// Configuration and errors
pub use crate::core::config::GameConfig;
pub use crate::core::error::{ConfigError, EngineError, ReloadError};
pub use crate::core::input::Controls;
