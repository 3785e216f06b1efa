//! Band Parameters
//!
//! The immutable set of values every coefficient refresh is computed from.
//! The engine never reads a live control surface; it is always handed a
//! `BandParameters` copy taken at a single point in time.

use crate::error::DspError;

/// Lowest frequency any band may be tuned to (Hz)
pub const MIN_FREQUENCY_HZ: f32 = 20.0;

/// Highest frequency any band may be tuned to (Hz)
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;

/// Peak band gain bounds (dB)
pub const MIN_GAIN_DB: f32 = -24.0;
pub const MAX_GAIN_DB: f32 = 24.0;

/// Peak band quality bounds
pub const MIN_Q: f32 = 0.1;
pub const MAX_Q: f32 = 10.0;

/// Maximum number of second-order stages in a cut cascade (48 dB/oct)
pub const MAX_CUT_STAGES: usize = 4;

/// Roll-off of a cut band
///
/// Each step adds one second-order stage, i.e. another 12 dB/octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Number of second-order stages this slope needs (1-4)
    pub fn order(self) -> usize {
        match self {
            Slope::Db12 => 1,
            Slope::Db24 => 2,
            Slope::Db36 => 3,
            Slope::Db48 => 4,
        }
    }

    /// Host ordinal (0-3)
    pub fn ordinal(self) -> usize {
        self.order() - 1
    }

    /// Strict conversion from a host ordinal
    pub fn try_from_ordinal(ordinal: usize) -> Result<Self, DspError> {
        Self::ALL
            .get(ordinal)
            .copied()
            .ok_or(DspError::OrderOutOfRange(ordinal + 1))
    }

    /// Lenient conversion: out-of-range ordinals snap to the nearest slope.
    ///
    /// Hosts hand ordinals over as floats, so anything non-finite or negative
    /// lands on the gentlest slope.
    pub fn from_ordinal_clamped(ordinal: f32) -> Self {
        if !ordinal.is_finite() || ordinal <= 0.0 {
            return Slope::Db12;
        }
        let index = (ordinal.round() as usize).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }

    /// Strict conversion from a stage count (1-4)
    pub fn from_order(order: usize) -> Result<Self, DspError> {
        match order {
            1..=MAX_CUT_STAGES => Ok(Self::ALL[order - 1]),
            _ => Err(DspError::OrderOutOfRange(order)),
        }
    }

    /// Steepness in dB per octave
    pub fn db_per_octave(self) -> u32 {
        12 * self.order() as u32
    }

    /// Display label, e.g. "24 dB/Oct"
    pub fn label(self) -> &'static str {
        match self {
            Slope::Db12 => "12 dB/Oct",
            Slope::Db24 => "24 dB/Oct",
            Slope::Db36 => "36 dB/Oct",
            Slope::Db48 => "48 dB/Oct",
        }
    }
}

/// Complete settings of the three bands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParameters {
    pub low_cut_freq: f32,
    pub high_cut_freq: f32,
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_q: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
}

impl Default for BandParameters {
    fn default() -> Self {
        Self {
            low_cut_freq: MIN_FREQUENCY_HZ,
            high_cut_freq: MAX_FREQUENCY_HZ,
            peak_freq: 1000.0,
            peak_gain_db: 0.0,
            peak_q: 0.7,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn check(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), DspError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DspError::ParameterOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

impl BandParameters {
    /// Copy with every field forced into its documented bounds.
    /// Non-finite values fall back to the field's default.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            low_cut_freq: clamp_or(
                self.low_cut_freq,
                MIN_FREQUENCY_HZ,
                MAX_FREQUENCY_HZ,
                defaults.low_cut_freq,
            ),
            high_cut_freq: clamp_or(
                self.high_cut_freq,
                MIN_FREQUENCY_HZ,
                MAX_FREQUENCY_HZ,
                defaults.high_cut_freq,
            ),
            peak_freq: clamp_or(
                self.peak_freq,
                MIN_FREQUENCY_HZ,
                MAX_FREQUENCY_HZ,
                defaults.peak_freq,
            ),
            peak_gain_db: clamp_or(self.peak_gain_db, MIN_GAIN_DB, MAX_GAIN_DB, 0.0),
            peak_q: clamp_or(self.peak_q, MIN_Q, MAX_Q, defaults.peak_q),
            low_cut_slope: self.low_cut_slope,
            high_cut_slope: self.high_cut_slope,
        }
    }

    /// Report the first field outside its bounds.
    ///
    /// Not used on the audio path, which clamps instead.
    pub fn validate(&self) -> Result<(), DspError> {
        check("LowCut Freq", self.low_cut_freq, MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)?;
        check("HighCut Freq", self.high_cut_freq, MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)?;
        check("Peak Freq", self.peak_freq, MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)?;
        check("Peak Gain", self.peak_gain_db, MIN_GAIN_DB, MAX_GAIN_DB)?;
        check("Peak Quality", self.peak_q, MIN_Q, MAX_Q)?;
        Ok(())
    }
}
