//! Engine Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Overall engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz (e.g., 44100, 48000, 96000)
    pub sample_rate: u32,

    /// Largest block the host will hand to `process_block`, in frames
    pub max_block_size: usize,

    /// Response curve refresh rate (ticks per second)
    pub refresh_rate_hz: u32,

    /// Number of points (pixel columns) in the response curve
    pub curve_width: usize,

    /// Height of the response display in pixels
    pub curve_height: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            max_block_size: 512,
            refresh_rate_hz: 60,
            curve_width: 512,
            curve_height: 200.0,
        }
    }
}

impl EngineConfig {
    /// Create config optimized for low latency
    pub fn low_latency() -> Self {
        Self {
            max_block_size: 128, // ~2.6ms at 48kHz
            ..Self::default()
        }
    }

    /// Create config optimized for stability
    pub fn stable() -> Self {
        Self {
            max_block_size: 1024, // ~21ms at 48kHz
            refresh_rate_hz: 30,
            ..Self::default()
        }
    }

    /// Block latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        (self.max_block_size as f32 / self.sample_rate as f32) * 1000.0
    }

    /// Period of the response curve tick
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate_hz.max(1) as f64)
    }

    /// Validate configuration
    pub fn validate(&self) -> EngineResult<()> {
        if !(8000..=192_000).contains(&self.sample_rate) {
            return Err(EngineError::ConfigError(format!(
                "Invalid sample rate: {}",
                self.sample_rate
            )));
        }
        if !(16..=8192).contains(&self.max_block_size) {
            return Err(EngineError::ConfigError(format!(
                "Invalid block size: {}",
                self.max_block_size
            )));
        }
        if self.refresh_rate_hz == 0 || self.refresh_rate_hz > 240 {
            return Err(EngineError::ConfigError(format!(
                "Invalid refresh rate: {}",
                self.refresh_rate_hz
            )));
        }
        if self.curve_width == 0 {
            return Err(EngineError::ConfigError("Curve width must be non-zero".into()));
        }
        if !(self.curve_height.is_finite() && self.curve_height > 0.0) {
            return Err(EngineError::ConfigError(format!(
                "Invalid curve height: {}",
                self.curve_height
            )));
        }
        Ok(())
    }
}
