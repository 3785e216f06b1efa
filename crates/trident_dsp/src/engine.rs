//! Stereo Engine
//!
//! Two fully independent channel chains (true dual-mono) plus the per-block
//! refresh: every block recomputes the coefficients once from the snapshot
//! it is handed and installs the same values into both chains.

use crate::chain::ChannelChain;
use crate::coefficients::{check_sample_rate, ChainCoefficients};
use crate::error::DspError;
use crate::params::BandParameters;

/// Sample rate the chains are built with before the first `prepare`
const PLACEHOLDER_SAMPLE_RATE: f32 = 48000.0;

/// The stereo processor
///
/// Designed for real-time use: no allocations in `process_block()`.
pub struct StereoEngine {
    // Each channel needs its own filter state
    left: ChannelChain,
    right: ChannelChain,
    sample_rate: Option<f32>,
    max_block_size: usize,
}

impl Default for StereoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoEngine {
    /// Create an unprepared engine. Audio passes through untouched until
    /// `prepare` succeeds.
    pub fn new() -> Self {
        Self {
            left: ChannelChain::new(PLACEHOLDER_SAMPLE_RATE),
            right: ChannelChain::new(PLACEHOLDER_SAMPLE_RATE),
            sample_rate: None,
            max_block_size: 0,
        }
    }

    /// Reset delay state and install coefficients for `params`.
    ///
    /// Idempotent. Must not run concurrently with `process_block`; taking
    /// `&mut self` enforces that.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block_size: usize,
        params: &BandParameters,
    ) -> Result<(), DspError> {
        let sample_rate = match check_sample_rate(sample_rate) {
            Ok(rate) => rate,
            Err(e) => {
                self.sample_rate = None;
                return Err(e);
            }
        };
        let coefficients = ChainCoefficients::from_parameters(params, sample_rate)?;

        self.left.reset();
        self.right.reset();
        self.left.install(&coefficients);
        self.right.install(&coefficients);

        self.sample_rate = Some(sample_rate);
        self.max_block_size = max_block_size;
        Ok(())
    }

    /// Recompute from `params` and install into both chains.
    /// Returns false when unprepared. On a failed design the previous
    /// coefficients stay in place.
    #[inline]
    fn refresh(&mut self, params: &BandParameters) -> bool {
        let Some(sample_rate) = self.sample_rate else {
            return false;
        };
        if let Ok(coefficients) = ChainCoefficients::from_parameters(params, sample_rate) {
            self.left.install(&coefficients);
            self.right.install(&coefficients);
        }
        true
    }

    /// Process one block of planar audio in place
    ///
    /// # Real-time Safety
    /// No allocations, no locks, no syscalls. O(order) work per sample.
    #[inline]
    pub fn process_block(&mut self, params: &BandParameters, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "Channel buffers must be same length");
        debug_assert!(
            left.len() <= self.max_block_size || self.max_block_size == 0,
            "Block larger than prepared maximum"
        );

        if !self.refresh(params) {
            return;
        }

        self.left.process(left);
        self.right.process(right);
    }

    /// Process an interleaved stereo buffer in place
    ///
    /// Buffer format: [L0, R0, L1, R1, L2, R2, ...]
    #[inline]
    pub fn process_interleaved(&mut self, params: &BandParameters, buffer: &mut [f32]) {
        if !self.refresh(params) {
            return;
        }

        for frame in buffer.chunks_exact_mut(2) {
            frame[0] = self.left.process_sample(frame[0]);
            frame[1] = self.right.process_sample(frame[1]);
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.sample_rate.is_some()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.sample_rate
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn left(&self) -> &ChannelChain {
        &self.left
    }

    pub fn right(&self) -> &ChannelChain {
        &self.right
    }

    /// Reset filter state (clear delay lines)
    ///
    /// Call when switching audio sources to prevent filter ringing
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Slope;
    use std::f64::consts::PI;

    fn prepared(params: &BandParameters, sample_rate: f32) -> StereoEngine {
        let mut engine = StereoEngine::new();
        engine.prepare(sample_rate, 512, params).unwrap();
        engine
    }

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate).sin() as f32)
            .collect()
    }

    /// Run `input` through the engine in 512-sample blocks, left channel only
    fn run_blocks(engine: &mut StereoEngine, params: &BandParameters, input: &[f32]) -> Vec<f32> {
        let mut left = input.to_vec();
        let mut right = input.to_vec();
        for (l, r) in left.chunks_mut(512).zip(right.chunks_mut(512)) {
            engine.process_block(params, l, r);
        }
        left
    }

    /// Peak amplitude of a sine from the RMS over its last `window` samples
    fn steady_amplitude(output: &[f32], window: usize) -> f64 {
        let tail = &output[output.len() - window..];
        let mean_square = tail.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / window as f64;
        (2.0 * mean_square).sqrt()
    }

    #[test]
    fn test_unprepared_engine_passes_through() {
        let mut engine = StereoEngine::new();
        assert!(!engine.is_prepared());

        let mut left = vec![0.5, -0.25, 0.125];
        let mut right = vec![-0.5, 0.25, -0.125];
        engine.process_block(&BandParameters::default(), &mut left, &mut right);
        assert_eq!(left, vec![0.5, -0.25, 0.125]);
        assert_eq!(right, vec![-0.5, 0.25, -0.125]);
    }

    #[test]
    fn test_prepare_rejects_invalid_rate() {
        let mut engine = StereoEngine::new();
        assert_eq!(
            engine.prepare(0.0, 512, &BandParameters::default()),
            Err(DspError::InvalidSampleRate(0.0))
        );
        assert!(!engine.is_prepared());

        engine.prepare(44100.0, 256, &BandParameters::default()).unwrap();
        assert_eq!(engine.sample_rate(), Some(44100.0));
        assert_eq!(engine.max_block_size(), 256);

        // A later bad rate unprepares rather than keeping stale designs
        assert!(engine.prepare(-1.0, 256, &BandParameters::default()).is_err());
        assert!(!engine.is_prepared());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let params = BandParameters {
            peak_gain_db: 4.0,
            ..Default::default()
        };
        let input = sine(440.0, 48000.0, 2048);

        let mut once = prepared(&params, 48000.0);
        let mut twice = prepared(&params, 48000.0);
        twice.prepare(48000.0, 512, &params).unwrap();

        assert_eq!(run_blocks(&mut once, &params, &input), run_blocks(&mut twice, &params, &input));
    }

    #[test]
    fn test_output_is_finite_for_extreme_settings() {
        let input = sine(997.0, 48000.0, 4096);
        for slope in Slope::ALL {
            for &(gain, q) in &[(24.0, 10.0), (-24.0, 0.1), (24.0, 0.1)] {
                for &(low, high) in &[(20.0, 20000.0), (20000.0, 20.0), (5000.0, 5000.0)] {
                    let params = BandParameters {
                        low_cut_freq: low,
                        high_cut_freq: high,
                        peak_freq: 20000.0,
                        peak_gain_db: gain,
                        peak_q: q,
                        low_cut_slope: slope,
                        high_cut_slope: slope,
                    };
                    let mut engine = prepared(&params, 44100.0);
                    let output = run_blocks(&mut engine, &params, &input);
                    assert!(
                        output.iter().all(|x| x.is_finite()),
                        "non-finite output for {:?}",
                        params
                    );
                }
            }
        }
    }

    #[test]
    fn test_dual_mono_is_bit_identical() {
        let params = BandParameters {
            low_cut_freq: 80.0,
            low_cut_slope: Slope::Db36,
            peak_freq: 3000.0,
            peak_gain_db: -7.5,
            peak_q: 2.0,
            high_cut_freq: 12000.0,
            high_cut_slope: Slope::Db24,
        };
        let mut engine = prepared(&params, 48000.0);

        let source: Vec<f32> = (0..4096)
            .map(|n| ((n as f32 * 0.013).sin() + (n as f32 * 0.31).cos()) * 0.4)
            .collect();
        let mut left = source.clone();
        let mut right = source;
        for (l, r) in left.chunks_mut(256).zip(right.chunks_mut(256)) {
            engine.process_block(&params, l, r);
        }

        let left_bits: Vec<u32> = left.iter().map(|x| x.to_bits()).collect();
        let right_bits: Vec<u32> = right.iter().map(|x| x.to_bits()).collect();
        assert_eq!(left_bits, right_bits);
    }

    #[test]
    fn test_channels_have_independent_state() {
        let params = BandParameters {
            peak_gain_db: 12.0,
            ..Default::default()
        };
        let mut engine = prepared(&params, 48000.0);

        // Feed only the left channel
        let mut left = vec![1.0; 64];
        let mut right = vec![0.0; 64];
        engine.process_block(&params, &mut left, &mut right);
        assert!(right.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_flat_response_scenario() {
        let params = BandParameters {
            low_cut_freq: 20.0,
            low_cut_slope: Slope::Db12,
            high_cut_freq: 20000.0,
            high_cut_slope: Slope::Db12,
            peak_freq: 1000.0,
            peak_gain_db: 0.0,
            peak_q: 0.7,
        };
        let mut engine = prepared(&params, 48000.0);
        let output = run_blocks(&mut engine, &params, &sine(1000.0, 48000.0, 48000));

        // 4800 samples = exactly 100 cycles of 1 kHz at 48 kHz
        let amplitude = steady_amplitude(&output, 4800);
        assert!((amplitude - 1.0).abs() < 0.01, "amplitude {}", amplitude);
    }

    #[test]
    fn test_peak_boost_scenario() {
        let params = BandParameters {
            peak_freq: 1000.0,
            peak_gain_db: 6.0,
            peak_q: 1.0,
            ..Default::default()
        };
        let mut engine = prepared(&params, 44100.0);
        let output = run_blocks(&mut engine, &params, &sine(1000.0, 44100.0, 44100));

        // 441 samples = exactly 10 cycles of 1 kHz at 44.1 kHz
        let measured_db = 20.0 * steady_amplitude(&output, 441).log10();
        assert!((measured_db - 6.0).abs() < 0.05, "measured {} dB", measured_db);

        // The installed sections agree with the measurement
        let installed_db = 20.0 * engine.left().magnitude_at(1000.0).log10();
        assert!((installed_db - 6.0).abs() < 0.05);
    }

    #[test]
    fn test_per_block_refresh_follows_parameters() {
        let mut params = BandParameters::default();
        let mut engine = prepared(&params, 48000.0);

        params.low_cut_slope = Slope::Db48;
        params.peak_gain_db = 10.0;
        let mut left = vec![0.0; 32];
        let mut right = vec![0.0; 32];
        engine.process_block(&params, &mut left, &mut right);

        for chain in [engine.left(), engine.right()] {
            assert_eq!(chain.low_cut().active_count(), 4);
            assert_eq!(chain.high_cut().active_count(), 1);
            let db = 20.0 * chain.peak().magnitude_at(1000.0).log10();
            assert!((db - 10.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_interleaved_matches_planar() {
        let params = BandParameters {
            low_cut_freq: 150.0,
            peak_gain_db: 3.0,
            ..Default::default()
        };
        let mut planar = prepared(&params, 48000.0);
        let mut interleaved = prepared(&params, 48000.0);

        let mut left: Vec<f32> = (0..256).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut right: Vec<f32> = (0..256).map(|i| (i as f32 * 0.02).cos()).collect();
        let mut buffer: Vec<f32> = left.iter().zip(&right).flat_map(|(l, r)| [*l, *r]).collect();

        planar.process_block(&params, &mut left, &mut right);
        interleaved.process_interleaved(&params, &mut buffer);

        for (i, frame) in buffer.chunks_exact(2).enumerate() {
            assert_eq!(frame[0], left[i]);
            assert_eq!(frame[1], right[i]);
        }
    }

    #[test]
    fn test_reset_restores_initial_response() {
        let params = BandParameters {
            peak_gain_db: 8.0,
            ..Default::default()
        };
        let mut engine = prepared(&params, 48000.0);
        let input = sine(250.0, 48000.0, 1024);

        let first = run_blocks(&mut engine, &params, &input);
        engine.reset();
        let second = run_blocks(&mut engine, &params, &input);
        assert_eq!(first, second);
    }
}
