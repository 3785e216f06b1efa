//! Parameter Store
//!
//! The control surface writes here from any thread; the audio callback and
//! the response sampler each read their own snapshot.
//!
//! # Thread Safety
//!
//! Every parameter is an `f32` bit-cast into an `AtomicU32`, so each field
//! read is atomic. Setters clamp, store, then raise the change notifier.

use std::sync::atomic::{AtomicU32, Ordering};

use trident_dsp::{
    BandParameters, Slope, MAX_FREQUENCY_HZ, MAX_GAIN_DB, MAX_Q, MIN_FREQUENCY_HZ, MIN_GAIN_DB,
    MIN_Q,
};

use crate::error::{EngineError, EngineResult};
use crate::notifier::ChangeNotifier;
use crate::state::EqState;

/// The seven host-visible parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterId {
    LowCutFreq,
    LowCutSlope,
    HighCutFreq,
    HighCutSlope,
    PeakFreq,
    PeakGain,
    PeakQuality,
}

impl ParameterId {
    pub const COUNT: usize = 7;

    pub const ALL: [ParameterId; Self::COUNT] = [
        ParameterId::LowCutFreq,
        ParameterId::LowCutSlope,
        ParameterId::HighCutFreq,
        ParameterId::HighCutSlope,
        ParameterId::PeakFreq,
        ParameterId::PeakGain,
        ParameterId::PeakQuality,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Host-facing identifier
    pub fn name(self) -> &'static str {
        match self {
            ParameterId::LowCutFreq => "LowCut Freq",
            ParameterId::LowCutSlope => "LowCut Slope",
            ParameterId::HighCutFreq => "HighCut Freq",
            ParameterId::HighCutSlope => "HighCut Slope",
            ParameterId::PeakFreq => "Peak Freq",
            ParameterId::PeakGain => "Peak Gain",
            ParameterId::PeakQuality => "Peak Quality",
        }
    }

    pub fn from_name(name: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == name)
            .ok_or_else(|| EngineError::UnknownParameter(name.to_string()))
    }

    pub fn is_slope(self) -> bool {
        matches!(self, ParameterId::LowCutSlope | ParameterId::HighCutSlope)
    }

    /// Range, step, skew and default of this parameter
    pub fn range(self) -> ParameterRange {
        match self {
            ParameterId::LowCutFreq => {
                ParameterRange::new(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ, 1.0, 0.25, MIN_FREQUENCY_HZ)
            }
            ParameterId::HighCutFreq => {
                ParameterRange::new(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ, 1.0, 1.25, MAX_FREQUENCY_HZ)
            }
            ParameterId::PeakFreq => {
                ParameterRange::new(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ, 1.0, 0.38, 1000.0)
            }
            ParameterId::PeakGain => ParameterRange::new(MIN_GAIN_DB, MAX_GAIN_DB, 0.5, 1.0, 0.0),
            ParameterId::PeakQuality => ParameterRange::new(MIN_Q, MAX_Q, 0.005, 1.0, 0.7),
            ParameterId::LowCutSlope | ParameterId::HighCutSlope => {
                ParameterRange::new(0.0, 3.0, 1.0, 1.0, 0.0)
            }
        }
    }
}

/// Value range with a step size and a skew for host-normalized automation
///
/// A skew below 1 spends more of the 0..1 travel on the low end of the
/// range (useful for frequencies).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub interval: f32,
    pub skew: f32,
    pub default: f32,
}

impl ParameterRange {
    pub const fn new(min: f32, max: f32, interval: f32, skew: f32, default: f32) -> Self {
        Self {
            min,
            max,
            interval,
            skew,
            default,
        }
    }

    /// Clamp into range; non-finite values become the default
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    /// Clamp and round to the nearest step
    pub fn snap(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        if self.interval > 0.0 {
            let steps = ((value - self.min) / self.interval).round();
            (self.min + steps * self.interval).clamp(self.min, self.max)
        } else {
            value
        }
    }

    /// Plain value → 0..1
    pub fn to_normalized(&self, value: f32) -> f32 {
        let proportion = ((self.clamp(value) - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        if self.skew == 1.0 {
            proportion
        } else {
            proportion.powf(self.skew)
        }
    }

    /// 0..1 → plain value, snapped to the step
    pub fn from_normalized(&self, proportion: f32) -> f32 {
        let proportion = if proportion.is_finite() {
            proportion.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let proportion = if self.skew != 1.0 && proportion > 0.0 {
            (proportion.ln() / self.skew).exp()
        } else {
            proportion
        };
        self.snap(self.min + (self.max - self.min) * proportion)
    }
}

/// Thread-safe store of the current band settings
pub struct ParameterStore {
    /// One slot per `ParameterId`, stored as f32 bits
    values: [AtomicU32; ParameterId::COUNT],
    changes: ChangeNotifier,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    /// Store holding every parameter's default
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|i| {
                AtomicU32::new(ParameterId::ALL[i].range().default.to_bits())
            }),
            changes: ChangeNotifier::new(),
        }
    }

    /// Store initialized from a full parameter set
    pub fn with_parameters(params: &BandParameters) -> Self {
        let store = Self::new();
        store.set_parameters(params);
        store
    }

    #[inline]
    fn load(&self, id: ParameterId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, id: ParameterId, value: f32) {
        self.values[id.index()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Set a plain value. Out-of-range values are clamped; slope ordinals
    /// are rounded to the nearest valid ordinal.
    pub fn set(&self, id: ParameterId, value: f32) {
        let range = id.range();
        let value = if id.is_slope() {
            Slope::from_ordinal_clamped(range.clamp(value)).ordinal() as f32
        } else {
            range.clamp(value)
        };
        self.store(id, value);
        self.changes.notify();
    }

    /// Set from a host-normalized 0..1 value
    pub fn set_normalized(&self, id: ParameterId, proportion: f32) {
        self.set(id, id.range().from_normalized(proportion));
    }

    pub fn get(&self, id: ParameterId) -> f32 {
        self.load(id)
    }

    pub fn get_normalized(&self, id: ParameterId) -> f32 {
        id.range().to_normalized(self.load(id))
    }

    pub fn set_by_name(&self, name: &str, value: f32) -> EngineResult<()> {
        self.set(ParameterId::from_name(name)?, value);
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> EngineResult<f32> {
        Ok(self.get(ParameterId::from_name(name)?))
    }

    /// Write every field at once, raising a single change
    pub fn set_parameters(&self, params: &BandParameters) {
        let params = params.clamped();
        self.store(ParameterId::LowCutFreq, params.low_cut_freq);
        self.store(ParameterId::LowCutSlope, params.low_cut_slope.ordinal() as f32);
        self.store(ParameterId::HighCutFreq, params.high_cut_freq);
        self.store(ParameterId::HighCutSlope, params.high_cut_slope.ordinal() as f32);
        self.store(ParameterId::PeakFreq, params.peak_freq);
        self.store(ParameterId::PeakGain, params.peak_gain_db);
        self.store(ParameterId::PeakQuality, params.peak_q);
        self.changes.notify();
    }

    /// Point-in-time copy of all band settings
    ///
    /// # Real-time Safety
    /// Seven relaxed atomic loads. No locks, no allocation.
    #[inline]
    pub fn snapshot(&self) -> BandParameters {
        BandParameters {
            low_cut_freq: self.load(ParameterId::LowCutFreq),
            high_cut_freq: self.load(ParameterId::HighCutFreq),
            peak_freq: self.load(ParameterId::PeakFreq),
            peak_gain_db: self.load(ParameterId::PeakGain),
            peak_q: self.load(ParameterId::PeakQuality),
            low_cut_slope: Slope::from_ordinal_clamped(self.load(ParameterId::LowCutSlope)),
            high_cut_slope: Slope::from_ordinal_clamped(self.load(ParameterId::HighCutSlope)),
        }
    }

    /// Restore persisted values. Loaded values skip the per-parameter
    /// setters, so the refresh is forced explicitly.
    pub fn apply_state(&self, state: &EqState) {
        self.set_parameters(&state.to_parameters());
        self.force_refresh();
    }

    pub fn capture_state(&self) -> EqState {
        EqState::from_parameters(&self.snapshot())
    }

    /// Raise the change flag without touching any value
    pub fn force_refresh(&self) {
        self.changes.notify();
    }

    /// The dirty flag consumed by the response sampler
    pub fn changes(&self) -> &ChangeNotifier {
        &self.changes
    }
}
