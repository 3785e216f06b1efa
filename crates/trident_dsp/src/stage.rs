//! Filter Stage
//!
//! One second-order IIR section: a coefficient set, its own delay state and
//! a bypass flag.

use biquad::{Biquad, DirectForm2Transposed};

use crate::coefficients::CoefficientSet;

/// A single biquad section with bypass
///
/// DirectForm2Transposed: better numerical stability than DF1 in f32.
/// The delay state belongs to this stage alone and is never shared across
/// channels.
pub struct FilterStage {
    filter: DirectForm2Transposed<f32>,
    coefficients: CoefficientSet,
    bypassed: bool,
}

impl FilterStage {
    /// Create a bypassed identity stage
    pub fn new(sample_rate: f32) -> Self {
        let coefficients = CoefficientSet::identity(sample_rate);
        Self {
            filter: DirectForm2Transposed::<f32>::new(coefficients.coefficients()),
            coefficients,
            bypassed: true,
        }
    }

    /// Swap in a complete coefficient set. Delay state is kept so that
    /// per-block updates do not click.
    #[inline]
    pub fn set_coefficients(&mut self, coefficients: CoefficientSet) {
        self.filter.update_coefficients(coefficients.coefficients());
        self.coefficients = coefficients;
    }

    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    /// Process one sample
    ///
    /// A bypassed stage returns its input and leaves its delay memory alone.
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls, O(1).
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        if self.bypassed {
            return sample;
        }
        self.filter.run(sample)
    }

    /// Linear magnitude at `freq_hz`; 1.0 when bypassed
    pub fn magnitude_at(&self, freq_hz: f32) -> f64 {
        if self.bypassed {
            1.0
        } else {
            self.coefficients.magnitude_at(freq_hz)
        }
    }

    /// Clear delay lines
    pub fn reset(&mut self) {
        self.filter.reset_state();
    }
}
