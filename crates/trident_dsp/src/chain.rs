//! Channel Chain
//!
//! The mono signal path of one channel: Low-Cut → Peak → High-Cut.

use crate::cascade::BandCascade;
use crate::coefficients::ChainCoefficients;
use crate::stage::FilterStage;

pub struct ChannelChain {
    low_cut: BandCascade,
    peak: FilterStage,
    high_cut: BandCascade,
}

impl ChannelChain {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            low_cut: BandCascade::new(sample_rate),
            peak: FilterStage::new(sample_rate),
            high_cut: BandCascade::new(sample_rate),
        }
    }

    /// Install a full refresh. The peak stage is always active, so it
    /// skips the cascade bypass dance.
    pub fn install(&mut self, coefficients: &ChainCoefficients) {
        self.low_cut.install(&coefficients.low_cut);
        self.peak.set_coefficients(coefficients.peak);
        self.peak.set_bypassed(false);
        self.high_cut.install(&coefficients.high_cut);
    }

    /// # Real-time Safety
    /// No allocations. At most nine biquad sections per sample.
    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let low = self.low_cut.process(sample);
        let peaked = self.peak.process(low);
        self.high_cut.process(peaked)
    }

    /// Process a mono buffer in place
    #[inline]
    pub fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Composite magnitude of the whole chain at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f32) -> f64 {
        self.low_cut.magnitude_at(freq_hz)
            * self.peak.magnitude_at(freq_hz)
            * self.high_cut.magnitude_at(freq_hz)
    }

    pub fn low_cut(&self) -> &BandCascade {
        &self.low_cut
    }

    pub fn peak(&self) -> &FilterStage {
        &self.peak
    }

    pub fn high_cut(&self) -> &BandCascade {
        &self.high_cut
    }

    pub fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BandParameters, Slope};

    fn chain_for(params: &BandParameters, sample_rate: f32) -> ChannelChain {
        let mut chain = ChannelChain::new(sample_rate);
        chain.install(&ChainCoefficients::from_parameters(params, sample_rate).unwrap());
        chain
    }

    #[test]
    fn test_install_activates_all_bands() {
        let params = BandParameters {
            low_cut_slope: Slope::Db24,
            high_cut_slope: Slope::Db48,
            ..Default::default()
        };
        let chain = chain_for(&params, 48000.0);
        assert_eq!(chain.low_cut().active_count(), 2);
        assert!(!chain.peak().is_bypassed());
        assert_eq!(chain.high_cut().active_count(), 4);
    }

    #[test]
    fn test_magnitude_is_product_of_bands() {
        let params = BandParameters {
            low_cut_freq: 200.0,
            peak_gain_db: 6.0,
            high_cut_freq: 6000.0,
            ..Default::default()
        };
        let chain = chain_for(&params, 48000.0);
        let f = 700.0;
        let expected = chain.low_cut().magnitude_at(f)
            * chain.peak().magnitude_at(f)
            * chain.high_cut().magnitude_at(f);
        assert_eq!(chain.magnitude_at(f), expected);
    }

    #[test]
    fn test_processing_order_is_low_peak_high() {
        let params = BandParameters {
            low_cut_freq: 300.0,
            peak_freq: 2000.0,
            peak_gain_db: 9.0,
            high_cut_freq: 9000.0,
            low_cut_slope: Slope::Db36,
            ..Default::default()
        };
        let coeffs = ChainCoefficients::from_parameters(&params, 48000.0).unwrap();
        let mut chain = chain_for(&params, 48000.0);

        // Rebuild the same path by hand from the designed sections
        let mut stages: Vec<FilterStage> = coeffs
            .low_cut
            .as_slice()
            .iter()
            .chain(std::iter::once(&coeffs.peak))
            .chain(coeffs.high_cut.as_slice())
            .map(|set| {
                let mut stage = FilterStage::new(48000.0);
                stage.set_coefficients(*set);
                stage.set_bypassed(false);
                stage
            })
            .collect();

        for n in 0..256 {
            let x = ((n as f32) * 0.05).sin() * 0.8;
            let manual = stages.iter_mut().fold(x, |acc, s| s.process(acc));
            assert_eq!(chain.process_sample(x), manual);
        }
    }

    #[test]
    fn test_buffer_and_sample_paths_agree() {
        let params = BandParameters {
            peak_gain_db: -6.0,
            ..Default::default()
        };
        let mut by_sample = chain_for(&params, 44100.0);
        let mut by_buffer = chain_for(&params, 44100.0);

        let mut buffer: Vec<f32> = (0..128).map(|i| (i as f32 * 0.02).sin()).collect();
        let expected: Vec<f32> = buffer.iter().map(|&x| by_sample.process_sample(x)).collect();
        by_buffer.process(&mut buffer);
        assert_eq!(buffer, expected);
    }
}
