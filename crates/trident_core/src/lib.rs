//! Trident Core - EQ Engine
//!
//! This crate wires the Trident DSP chain to the outside world:
//! - Lock-free parameter store shared by the control surface and the audio thread
//! - Dirty-flag change notification and the response-curve sampler
//! - Host-facing `EqProcessor` implementing `AudioProcessor`
//! - Engine configuration and persisted EQ state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Control Surface                         │
//! │        set / set_by_name / set_normalized / apply_state     │
//! └─────────────────────────────────────────────────────────────┘
//!                 │ atomic f32 fields       │ notify()
//!                 ▼                         ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │        Audio Thread       │   │    Visualization Thread   │
//! │ snapshot ─▶ StereoEngine  │   │ take() ─▶ ResponseSampler │
//! │   (zero allocation)       │   │   ─▶ curve / pixel path   │
//! └───────────────────────────┘   └───────────────────────────┘
//! ```

mod config;
mod error;
mod notifier;
mod params;
mod processor;
mod response;
mod state;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use notifier::ChangeNotifier;
pub use params::{ParameterId, ParameterRange, ParameterStore};
pub use processor::EqProcessor;
pub use response::{ResponseDisplay, ResponseSampler, ResponseTicker};
pub use state::EqState;

// Re-export DSP types for convenience
pub use trident_dsp::{
    AudioProcessor, BandParameters, ChainCoefficients, ProcessContext, ResponsePoint, Slope,
};
