//! Band Cascade
//!
//! Four filter stages backing one cut band. The configured slope decides how
//! many of them run; the rest sit bypassed in place so the layout never
//! changes.

use crate::coefficients::CascadeCoefficients;
use crate::params::{Slope, MAX_CUT_STAGES};
use crate::stage::FilterStage;

pub struct BandCascade {
    stages: [FilterStage; MAX_CUT_STAGES],
    active: usize,
}

impl BandCascade {
    /// All stages bypassed until the first `install`
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages: core::array::from_fn(|_| FilterStage::new(sample_rate)),
            active: 0,
        }
    }

    /// Install a freshly designed cut band.
    ///
    /// Order matters: bypass everything, install the first `order` sets, then
    /// re-enable exactly those stages. A stage never runs with stale
    /// coefficients and its bypass flag cleared at the same time.
    pub fn install(&mut self, coefficients: &CascadeCoefficients) {
        for stage in self.stages.iter_mut() {
            stage.set_bypassed(true);
        }

        let sets = coefficients.as_slice();
        for (stage, set) in self.stages.iter_mut().zip(sets) {
            stage.set_coefficients(*set);
        }

        let active = sets.len().min(MAX_CUT_STAGES);
        for stage in self.stages.iter_mut().take(active) {
            stage.set_bypassed(false);
        }
        self.active = active;
    }

    /// Number of non-bypassed stages
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn slope(&self) -> Option<Slope> {
        Slope::from_order(self.active).ok()
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Run one sample through every stage in sequence.
    /// Bypassed stages are visited and pass the sample through.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.stages
            .iter_mut()
            .fold(sample, |acc, stage| stage.process(acc))
    }

    /// Product of the active stages' magnitudes
    pub fn magnitude_at(&self, freq_hz: f32) -> f64 {
        self.stages.iter().map(|s| s.magnitude_at(freq_hz)).product()
    }

    pub fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
        }
    }
}
