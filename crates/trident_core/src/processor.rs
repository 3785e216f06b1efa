//! Host-facing EQ processor
//!
//! Owns the stereo engine and reads the shared parameter store once per
//! block.

use std::sync::Arc;

use tracing::{error, info};
use trident_dsp::{AudioProcessor, ProcessContext, StereoEngine};

use crate::error::{EngineError, EngineResult};
use crate::params::ParameterStore;

pub struct EqProcessor {
    store: Arc<ParameterStore>,
    engine: StereoEngine,
}

impl EqProcessor {
    pub fn new(store: Arc<ParameterStore>) -> Self {
        Self {
            store,
            engine: StereoEngine::new(),
        }
    }

    /// Prepare for playback. Safe to call again on a format change.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> EngineResult<()> {
        let params = self.store.snapshot();
        match self.engine.prepare(sample_rate, max_block_size, &params) {
            Ok(()) => {
                info!(
                    "EQ prepared: {} Hz, max block {} frames",
                    sample_rate, max_block_size
                );
                Ok(())
            }
            Err(e) => {
                error!("EQ prepare failed at {} Hz: {}", sample_rate, e);
                Err(e.into())
            }
        }
    }

    /// Process one planar stereo block with the current parameters
    #[inline]
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let params = self.store.snapshot();
        self.engine.process_block(&params, left, right);
    }

    /// Process an interleaved stereo buffer with the current parameters
    #[inline]
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        let params = self.store.snapshot();
        self.engine.process_interleaved(&params, buffer);
    }

    pub fn engine(&self) -> &StereoEngine {
        &self.engine
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }
}

impl AudioProcessor for EqProcessor {
    type Error = EngineError;

    fn prepare(&mut self, context: &ProcessContext) -> EngineResult<()> {
        EqProcessor::prepare(self, context.sample_rate, context.max_block_size)
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.process_block(left, right);
    }

    fn reset(&mut self) {
        self.engine.reset();
    }

    fn name(&self) -> &'static str {
        "Trident EQ"
    }
}
