//! Response Sampler
//!
//! Keeps the display copy of the filter coefficients and the magnitude curve
//! in sync with the parameter store. Runs on the visualization schedule and
//! never touches the audio engine's filters.
//!
//! # Architecture
//!
//! ```text
//! ParameterStore ──notify()──▶ ChangeNotifier
//!                                   │ take() (once per tick)
//!                                   ▼
//!                 snapshot ─▶ ChainCoefficients ─▶ display holders ─▶ curve
//! ```

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use trident_dsp::{log_frequency, pixel_path, ChainCoefficients, ResponsePoint};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::params::ParameterStore;

/// Flat curve for `width` columns
fn flat_curve(width: usize) -> Vec<ResponsePoint> {
    (0..width)
        .map(|i| ResponsePoint {
            frequency_hz: log_frequency(i, width),
            magnitude_db: 0.0,
        })
        .collect()
}

/// Coefficients and the curve drawn from them, published together
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDisplay {
    /// `None` before the first successful refresh
    pub coefficients: Option<ChainCoefficients>,
    pub curve: Vec<ResponsePoint>,
}

/// Polled consumer that redraws the response curve on parameter changes
pub struct ResponseSampler {
    store: Arc<ParameterStore>,

    /// Sample rate used for display designs (f32 bits)
    sample_rate: AtomicU32,

    /// Last successfully computed coefficients and their curve
    display: RwLock<ResponseDisplay>,

    refreshes: AtomicU64,
}

impl ResponseSampler {
    pub fn new(store: Arc<ParameterStore>, sample_rate: f32, width: usize) -> Self {
        Self {
            store,
            sample_rate: AtomicU32::new(sample_rate.to_bits()),
            display: RwLock::new(ResponseDisplay {
                coefficients: None,
                curve: flat_curve(width.max(1)),
            }),
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn from_config(store: Arc<ParameterStore>, config: &EngineConfig) -> Self {
        Self::new(store, config.sample_rate as f32, config.curve_width)
    }

    pub fn sample_rate(&self) -> f32 {
        f32::from_bits(self.sample_rate.load(Ordering::Relaxed))
    }

    /// Change the design sample rate and schedule a redraw
    pub fn set_sample_rate(&self, sample_rate: f32) {
        self.sample_rate.store(sample_rate.to_bits(), Ordering::Relaxed);
        self.store.force_refresh();
    }

    /// Redraw if anything changed since the last tick.
    ///
    /// Returns true when a new curve was published. On a failed design the
    /// previous curve stays visible.
    pub fn tick(&self) -> bool {
        if !self.store.changes().take() {
            return false;
        }

        let params = self.store.snapshot();
        let sample_rate = self.sample_rate();

        let coefficients = match ChainCoefficients::from_parameters(&params, sample_rate) {
            Ok(coefficients) => coefficients,
            Err(e) => {
                warn!("Response refresh failed, keeping last curve: {}", e);
                return false;
            }
        };

        {
            let mut display = self.display.write();
            coefficients.fill_response(&mut display.curve);
            display.coefficients = Some(coefficients);
        }

        let count = self.refreshes.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Response refresh #{}: low cut {} Hz ({}), peak {} Hz {:+.1} dB, high cut {} Hz ({})",
            count,
            params.low_cut_freq,
            params.low_cut_slope.label(),
            params.peak_freq,
            params.peak_gain_db,
            params.high_cut_freq,
            params.high_cut_slope.label(),
        );
        true
    }

    /// Coefficients and curve from the same refresh
    pub fn display(&self) -> ResponseDisplay {
        self.display.read().clone()
    }

    /// Copy of the current curve
    pub fn curve(&self) -> Vec<ResponsePoint> {
        self.display.read().curve.clone()
    }

    /// Current curve in pixel coordinates for a display `height` pixels tall
    pub fn pixel_path(&self, height: f32) -> Vec<(f32, f32)> {
        pixel_path(&self.display.read().curve, height)
    }

    /// Coefficients behind the current curve, `None` before the first refresh
    pub fn display_coefficients(&self) -> Option<ChainCoefficients> {
        self.display.read().coefficients
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }
}

/// Background thread calling `ResponseSampler::tick` at a fixed rate
pub struct ResponseTicker {
    thread: Option<JoinHandle<()>>,
    shutdown_flag: Arc<AtomicBool>,
}

impl ResponseTicker {
    pub fn spawn(sampler: Arc<ResponseSampler>, interval: Duration) -> EngineResult<Self> {
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown_flag);

        let thread = thread::Builder::new()
            .name("trident-response".into())
            .spawn(move || {
                info!("Response ticker started ({:?} interval)", interval);
                while !shutdown_clone.load(Ordering::SeqCst) {
                    sampler.tick();
                    thread::park_timeout(interval);
                }
                info!("Response ticker stopped");
            })
            .map_err(|e| EngineError::ThreadSpawn(e.to_string()))?;

        Ok(Self {
            thread: Some(thread),
            shutdown_flag,
        })
    }

    pub fn from_config(sampler: Arc<ResponseSampler>, config: &EngineConfig) -> EngineResult<Self> {
        Self::spawn(sampler, config.refresh_interval())
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the thread and wait for it to exit
    pub fn stop(&mut self) {
        self.shutdown_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for ResponseTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
