//! Error types for the simulator.
//!
//! Library operations return [`SimResult`]; the binary wraps these in
//! `anyhow` with context.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Orbit graph =====
    /// A body was asked to orbit itself. The system is left unchanged.
    #[error("body '{name}' cannot orbit itself")]
    SelfOrbit { name: String },

    /// Assigning the primary would close a loop in the satellite forest.
    #[error("'{child}' cannot orbit '{primary}': '{primary}' already orbits '{child}' (directly or transitively)")]
    OrbitCycle { child: String, primary: String },

    /// Orbital elements outside the bound-orbit domain.
    #[error("invalid orbital elements: {reason}")]
    InvalidElements { reason: String },

    /// `set_orbit` on a body that carries no orbital elements.
    #[error("body '{name}' has no orbital elements")]
    MissingElements { name: String },

    // ===== Bodies / lookup =====
    /// Non-physical mass or radius.
    #[error("invalid body '{name}': {reason}")]
    InvalidBody { name: String, reason: String },

    /// Names are unique within a system.
    #[error("a body named '{0}' already exists in this system")]
    DuplicateBody(String),

    /// Name lookup miss where a body is required (scenario building).
    #[error("unknown body '{0}'")]
    UnknownBody(String),

    /// Handle that does not belong to this system.
    #[error("no body with id {0}")]
    UnknownBodyId(usize),

    // ===== Threaded stepping =====
    /// A worker thread exited or panicked before reaching a barrier.
    #[error("worker {index} was lost during the threaded run")]
    WorkerLost { index: usize },

    /// A barrier was not reached in time.
    #[error("barrier '{phase}' not reached after {waited:?}")]
    BarrierTimeout { phase: &'static str, waited: Duration },

    // ===== Configuration =====
    /// Semantic error in a scenario description.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// File or thread-spawn I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid-elements error.
    pub fn invalid_elements(reason: impl Into<String>) -> Self {
        Self::InvalidElements {
            reason: reason.into(),
        }
    }
}
