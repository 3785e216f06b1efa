//! Magnitude Response
//!
//! Frequency grids and dB/pixel mapping for drawing the response curve.
//! Works on `ChainCoefficients` values, never on live filter state.

use crate::coefficients::{CascadeCoefficients, ChainCoefficients};
use crate::params::{MAX_FREQUENCY_HZ, MAX_GAIN_DB, MIN_FREQUENCY_HZ, MIN_GAIN_DB};

/// Floor used when a magnitude is zero or negative
pub const SILENCE_DB: f64 = -120.0;

/// One point of the response curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsePoint {
    pub frequency_hz: f32,
    pub magnitude_db: f32,
}

/// Frequency of pixel column `index` out of `width`, log-spaced over
/// 20 Hz..20 kHz with both ends included.
pub fn log_frequency(index: usize, width: usize) -> f32 {
    if width <= 1 {
        return MIN_FREQUENCY_HZ;
    }
    let t = index as f32 / (width - 1) as f32;
    MIN_FREQUENCY_HZ * (MAX_FREQUENCY_HZ / MIN_FREQUENCY_HZ).powf(t)
}

/// Convert linear magnitude to dB
pub fn magnitude_to_db(magnitude: f64) -> f64 {
    if magnitude > 0.0 {
        (20.0 * magnitude.log10()).max(SILENCE_DB)
    } else {
        SILENCE_DB
    }
}

/// Map dB linearly from [-24, +24] onto [height, 0].
/// No clamping: values outside the range land outside the band.
pub fn db_to_y(db: f32, height: f32) -> f32 {
    height * (MAX_GAIN_DB - db) / (MAX_GAIN_DB - MIN_GAIN_DB)
}

fn cascade_magnitude(cascade: &CascadeCoefficients, freq_hz: f32) -> f64 {
    cascade
        .as_slice()
        .iter()
        .map(|set| set.magnitude_at(freq_hz))
        .product()
}

impl ChainCoefficients {
    /// Composite magnitude: Low-Cut × Peak × High-Cut.
    /// Only the designed (active) sections take part.
    pub fn magnitude_at(&self, freq_hz: f32) -> f64 {
        cascade_magnitude(&self.low_cut, freq_hz)
            * self.peak.magnitude_at(freq_hz)
            * cascade_magnitude(&self.high_cut, freq_hz)
    }

    /// Fill `points` with the curve over `points.len()` log-spaced columns
    pub fn fill_response(&self, points: &mut [ResponsePoint]) {
        let width = points.len();
        for (i, point) in points.iter_mut().enumerate() {
            let frequency_hz = log_frequency(i, width);
            *point = ResponsePoint {
                frequency_hz,
                magnitude_db: magnitude_to_db(self.magnitude_at(frequency_hz)) as f32,
            };
        }
    }
}

/// Pixel-space polyline for a curve; x is the column index
pub fn pixel_path(points: &[ResponsePoint], height: f32) -> Vec<(f32, f32)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f32, db_to_y(p.magnitude_db, height)))
        .collect()
}
