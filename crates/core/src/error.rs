//! Error types for the fallible edges of the engine.
//!
//! Gameplay outcomes (blocked moves, game over) are state, not errors.

use thiserror::Error;

/// Failure to load an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
