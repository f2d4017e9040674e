//=========================================================================
// Error Types
//=========================================================================
//
// Faults raised by the engine backend, the reload protocol and the
// tuning loader.
//
// None of these are recovered from. They are propagated with `?` up to
// the reload host or the runtime, logged, and the core loop stops.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::backend::EntityId;

//=== EngineError =========================================================

/// Faults reported by an [`EngineBackend`](crate::core::backend::EngineBackend).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A sprite or image was requested for a key that was never preloaded.
    #[error("asset '{0}' was not preloaded")]
    MissingAsset(String),

    /// The entity handle does not belong to this engine instance.
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// The engine instance has already been destroyed.
    #[error("engine instance has been destroyed")]
    Destroyed,
}

//=== ReloadError =========================================================

/// Violations of the teardown → accept → create ordering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReloadError {
    /// Teardown tried to write into a slot nobody has read yet.
    #[error("reload registry already holds an unconsumed entry")]
    SlotOccupied,

    /// Accept ran without a preceding teardown.
    #[error("reload registry has nothing to accept")]
    NothingToAccept,

    /// A reloaded module tried to build entities before accepting state.
    #[error("scene creation attempted before the reload was accepted")]
    CreateBeforeAccept,

    /// Accept called on a module that was not evaluated as a reload, or
    /// that has already accepted.
    #[error("module is not awaiting a reload handoff")]
    UnexpectedAccept,

    /// Teardown or tick on a module whose engine was never started.
    #[error("no engine instance is running")]
    NotRunning,

    /// The module was already torn down and cannot be restarted.
    #[error("module has been torn down")]
    TornDown,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

//=== ConfigError =========================================================

/// Failures while loading a tuning file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tuning value: {0}")]
    Invalid(String),
}
