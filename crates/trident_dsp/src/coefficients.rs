//! Coefficient Factory
//!
//! Pure functions turning band settings into second-order section
//! coefficients. Both the audio path and the response display call these,
//! so the curve on screen is always what the engine installs for the same
//! parameters.
//!
//! Peak band: RBJ (Robert Bristow-Johnson) Audio EQ Cookbook peaking EQ.
//! Cut bands: Butterworth high-order design, factored into `order`
//! second-order sections of a `2 * order` pole filter.

use std::f64::consts::PI;

use biquad::{Coefficients, Hertz, Type};

use crate::error::DspError;
use crate::params::{
    BandParameters, Slope, MAX_CUT_STAGES, MAX_GAIN_DB, MAX_Q, MIN_FREQUENCY_HZ, MIN_GAIN_DB,
    MIN_Q,
};

/// Highest usable cutoff as a fraction of the sample rate.
/// Keeps every design strictly below Nyquist.
pub const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Which side of the spectrum a cut band removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// Passes below the cutoff (used by the high-cut band)
    LowPass,
    /// Passes above the cutoff (used by the low-cut band)
    HighPass,
}

/// Coefficients of one second-order section, tied to the rate they were
/// designed for
#[derive(Debug, Clone, Copy)]
pub struct CoefficientSet {
    coeffs: Coefficients<f32>,
    sample_rate: f32,
}

impl PartialEq for CoefficientSet {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.coeffs, &other.coeffs);
        self.sample_rate == other.sample_rate
            && a.b0 == b.b0
            && a.b1 == b.b1
            && a.b2 == b.b2
            && a.a1 == b.a1
            && a.a2 == b.a2
    }
}

impl CoefficientSet {
    /// Pass-through section (b0 = 1, everything else 0)
    pub fn identity(sample_rate: f32) -> Self {
        Self {
            coeffs: Coefficients {
                a1: 0.0,
                a2: 0.0,
                b0: 1.0,
                b1: 0.0,
                b2: 0.0,
            },
            sample_rate,
        }
    }

    pub fn coefficients(&self) -> Coefficients<f32> {
        self.coeffs
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_finite(&self) -> bool {
        let c = &self.coeffs;
        [c.b0, c.b1, c.b2, c.a1, c.a2].iter().all(|v| v.is_finite())
    }

    /// Linear magnitude |H(e^jw)| at `freq_hz`
    ///
    /// Evaluated in f64 so that deep cut-band attenuation stays accurate.
    pub fn magnitude_at(&self, freq_hz: f32) -> f64 {
        let c = &self.coeffs;
        let omega = 2.0 * PI * freq_hz as f64 / self.sample_rate as f64;
        let (sin1, cos1) = omega.sin_cos();
        let (sin2, cos2) = (2.0 * omega).sin_cos();

        let (b0, b1, b2) = (c.b0 as f64, c.b1 as f64, c.b2 as f64);
        let (a1, a2) = (c.a1 as f64, c.a2 as f64);

        let num_re = b0 + b1 * cos1 + b2 * cos2;
        let num_im = -(b1 * sin1 + b2 * sin2);
        let den_re = 1.0 + a1 * cos1 + a2 * cos2;
        let den_im = -(a1 * sin1 + a2 * sin2);

        let den = den_re * den_re + den_im * den_im;
        if den > 0.0 {
            ((num_re * num_re + num_im * num_im) / den).sqrt()
        } else {
            0.0
        }
    }
}

/// Coefficients for a whole cut band: exactly `order` sections
///
/// Fixed capacity so a refresh never touches the heap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeCoefficients {
    sets: [CoefficientSet; MAX_CUT_STAGES],
    len: usize,
}

impl CascadeCoefficients {
    pub fn as_slice(&self) -> &[CoefficientSet] {
        &self.sets[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slope these sections realize
    pub fn slope(&self) -> Option<Slope> {
        Slope::from_order(self.len).ok()
    }
}

/// Everything one channel chain needs for a refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainCoefficients {
    pub low_cut: CascadeCoefficients,
    pub peak: CoefficientSet,
    pub high_cut: CascadeCoefficients,
}

impl ChainCoefficients {
    /// Compute all three bands from one parameter snapshot.
    ///
    /// Low-cut uses the high-pass design, high-cut the low-pass design.
    pub fn from_parameters(params: &BandParameters, sample_rate: f32) -> Result<Self, DspError> {
        let params = params.clamped();
        Ok(Self {
            low_cut: make_cut_cascade(
                CutKind::HighPass,
                params.low_cut_freq,
                params.low_cut_slope,
                sample_rate,
            )?,
            peak: make_peak_coefficients(
                params.peak_freq,
                params.peak_gain_db,
                params.peak_q,
                sample_rate,
            )?,
            high_cut: make_cut_cascade(
                CutKind::LowPass,
                params.high_cut_freq,
                params.high_cut_slope,
                sample_rate,
            )?,
        })
    }
}

/// Reject sample rates that no design can be computed for
pub fn check_sample_rate(sample_rate: f32) -> Result<f32, DspError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(DspError::InvalidSampleRate(sample_rate))
    }
}

/// Strict check for callers that want to report a frequency the factory
/// would otherwise clamp
pub fn check_below_nyquist(
    name: &'static str,
    freq: f32,
    sample_rate: f32,
) -> Result<(), DspError> {
    let sample_rate = check_sample_rate(sample_rate)?;
    let nyquist = sample_rate / 2.0;
    if freq.is_finite() && freq > 0.0 && freq < nyquist {
        Ok(())
    } else {
        Err(DspError::ParameterOutOfRange {
            name,
            value: freq,
            min: 0.0,
            max: nyquist,
        })
    }
}

/// Clamp a design frequency into [MIN_FREQUENCY_HZ, MAX_CUTOFF_RATIO * fs].
/// At very low sample rates the upper bound wins.
fn clamp_frequency(freq: f32, sample_rate: f32) -> f32 {
    let upper = sample_rate * MAX_CUTOFF_RATIO;
    let freq = if freq.is_finite() { freq } else { upper };
    freq.max(MIN_FREQUENCY_HZ).min(upper)
}

fn hertz(value: f32, sample_rate: f32) -> Result<Hertz<f32>, DspError> {
    Hertz::<f32>::from_hz(value).map_err(|_| DspError::InvalidCoefficients {
        frequency: value,
        sample_rate,
    })
}

fn design(filter: Type<f32>, freq: f32, q: f32, sample_rate: f32) -> Result<CoefficientSet, DspError> {
    let coeffs = Coefficients::<f32>::from_params(
        filter,
        hertz(sample_rate, sample_rate)?,
        hertz(freq, sample_rate)?,
        q,
    )
    .map_err(|_| DspError::InvalidCoefficients {
        frequency: freq,
        sample_rate,
    })?;

    Ok(CoefficientSet {
        coeffs,
        sample_rate,
    })
}

/// Peaking (bell) section; 0 dB gain yields a unity-magnitude section
pub fn make_peak_coefficients(
    freq: f32,
    gain_db: f32,
    q: f32,
    sample_rate: f32,
) -> Result<CoefficientSet, DspError> {
    let sample_rate = check_sample_rate(sample_rate)?;
    let freq = clamp_frequency(freq, sample_rate);
    let gain_db = if gain_db.is_finite() {
        gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
    } else {
        0.0
    };
    let q = if q.is_finite() { q.clamp(MIN_Q, MAX_Q) } else { MIN_Q };

    design(Type::PeakingEQ(gain_db), freq, q, sample_rate)
}

/// Q of section `index` in a Butterworth design with `order` sections
fn butterworth_q(index: usize, order: usize) -> f32 {
    let poles = 2 * order;
    let angle = PI * (2 * index + 1) as f64 / (2 * poles) as f64;
    (1.0 / (2.0 * angle.cos())) as f32
}

/// Butterworth cut band as `slope.order()` second-order sections
pub fn make_cut_cascade(
    kind: CutKind,
    cutoff: f32,
    slope: Slope,
    sample_rate: f32,
) -> Result<CascadeCoefficients, DspError> {
    let sample_rate = check_sample_rate(sample_rate)?;
    let cutoff = clamp_frequency(cutoff, sample_rate);
    let order = slope.order();

    let filter = match kind {
        CutKind::LowPass => Type::LowPass,
        CutKind::HighPass => Type::HighPass,
    };

    let mut sets = [CoefficientSet::identity(sample_rate); MAX_CUT_STAGES];
    for (index, set) in sets.iter_mut().take(order).enumerate() {
        *set = design(filter, cutoff, butterworth_q(index, order), sample_rate)?;
    }

    Ok(CascadeCoefficients { sets, len: order })
}
