//=========================================================================
// Reload Protocol
//=========================================================================
//
// Two-phase state handoff between a module instance that is being
// replaced and its replacement.
//
// Components:
// - ReloadRegistry:    single slot that outlives module instances
// - ReloadCoordinator: one module instance (session + scene + engine)
// - ReloadHost:        calls the hooks in order and owns the registry
// - Scheduler:         next-tick continuations for deferred construction
//
//=========================================================================

mod coordinator;
mod host;
mod registry;
mod scheduler;
mod session;

pub use coordinator::{Phase, ReloadCoordinator};
pub use host::{HotModule, ModuleEval, ReloadHost};
pub use registry::{ReloadEntry, ReloadRegistry};
pub use scheduler::{Deferred, Scheduler};
pub use session::SessionState;
