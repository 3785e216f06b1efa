//! Engine Error Types

use thiserror::Error;

/// Errors that can occur outside the audio callback
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("DSP error: {0}")]
    Dsp(#[from] trident_dsp::DspError),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to decode state: {0}")]
    StateDecode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to spawn thread: {0}")]
    ThreadSpawn(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
