//! Audio Processor Trait
//!
//! The seam between a host transport and anything that processes stereo
//! blocks. The host calls `prepare` before playback and whenever the stream
//! format changes, then `process` once per block.

/// Stream format handed to `prepare`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessContext {
    pub sample_rate: f32,
    pub max_block_size: usize,
}

impl ProcessContext {
    pub fn new(sample_rate: f32, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
        }
    }
}

/// Trait for stereo block processors
///
/// # Real-time Safety Contract
///
/// Implementors MUST follow these rules in `process()`:
/// - NO heap allocations (no Vec::push, no Box::new, no String)
/// - NO syscalls (no file I/O, no network, no mutex locks)
/// - NO unbounded loops
/// - Constant or O(n) time complexity where n = block size
///
/// `prepare()` runs outside the audio callback and may allocate or log.
pub trait AudioProcessor: Send {
    type Error;

    /// Configure for a new stream format. Never called while a block is in
    /// flight.
    fn prepare(&mut self, context: &ProcessContext) -> Result<(), Self::Error>;

    /// Process one planar stereo block in place
    fn process(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Reset internal state (delay lines)
    fn reset(&mut self);

    /// Human-readable name for debugging/UI
    fn name(&self) -> &'static str;
}
