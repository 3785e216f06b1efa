//! Trident DSP - Digital Signal Processing Module
//!
//! This crate provides the signal path of the Trident three-band EQ:
//! - Butterworth low-cut and high-cut cascades (12/24/36/48 dB/oct)
//! - RBJ peaking (bell) band
//! - Dual-mono stereo engine with per-block coefficient refresh
//! - Magnitude response math for drawing the curve
//!
//! # Architecture
//!
//! ```text
//! BandParameters ──▶ ChainCoefficients::from_parameters ──▶ StereoEngine
//!                                                        ├─▶ left:  LowCut → Peak → HighCut
//!                                                        └─▶ right: LowCut → Peak → HighCut
//! ```
//!
//! The DSP chain follows a strict "no allocation in audio callback" rule.
//! Coefficients are replaced wholesale at block boundaries.

mod cascade;
mod chain;
mod coefficients;
mod engine;
mod error;
mod params;
mod processor;
mod response;
mod stage;

pub use cascade::BandCascade;
pub use chain::ChannelChain;
pub use coefficients::{
    check_below_nyquist, check_sample_rate, make_cut_cascade, make_peak_coefficients,
    CascadeCoefficients, ChainCoefficients, CoefficientSet, CutKind, MAX_CUTOFF_RATIO,
};
pub use engine::StereoEngine;
pub use error::DspError;
pub use params::{
    BandParameters, Slope, MAX_CUT_STAGES, MAX_FREQUENCY_HZ, MAX_GAIN_DB, MAX_Q,
    MIN_FREQUENCY_HZ, MIN_GAIN_DB, MIN_Q,
};
pub use processor::{AudioProcessor, ProcessContext};
pub use response::{db_to_y, log_frequency, magnitude_to_db, pixel_path, ResponsePoint, SILENCE_DB};
pub use stage::FilterStage;
