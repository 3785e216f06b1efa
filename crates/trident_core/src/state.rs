//! Persisted EQ state
//!
//! JSON document mirroring `BandParameters`, with slopes stored as host
//! ordinals (0 = 12 dB/Oct ... 3 = 48 dB/Oct). Ordinals are plain numbers
//! like every other host parameter; anything outside 0..3 is clamped on load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use trident_dsp::{BandParameters, Slope};

use crate::error::EngineResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqState {
    pub low_cut_freq: f32,
    pub low_cut_slope: f32,
    pub high_cut_freq: f32,
    pub high_cut_slope: f32,
    pub peak_freq: f32,
    pub peak_gain: f32,
    pub peak_quality: f32,
}

impl Default for EqState {
    fn default() -> Self {
        Self::from_parameters(&BandParameters::default())
    }
}

impl EqState {
    pub fn from_parameters(params: &BandParameters) -> Self {
        Self {
            low_cut_freq: params.low_cut_freq,
            low_cut_slope: params.low_cut_slope.ordinal() as f32,
            high_cut_freq: params.high_cut_freq,
            high_cut_slope: params.high_cut_slope.ordinal() as f32,
            peak_freq: params.peak_freq,
            peak_gain: params.peak_gain_db,
            peak_quality: params.peak_q,
        }
    }

    /// Parameters with every field forced into range
    pub fn to_parameters(&self) -> BandParameters {
        BandParameters {
            low_cut_freq: self.low_cut_freq,
            high_cut_freq: self.high_cut_freq,
            peak_freq: self.peak_freq,
            peak_gain_db: self.peak_gain,
            peak_q: self.peak_quality,
            low_cut_slope: Slope::from_ordinal_clamped(self.low_cut_slope),
            high_cut_slope: Slope::from_ordinal_clamped(self.high_cut_slope),
        }
        .clamped()
    }

    /// True when loading this document would change some value
    pub fn needs_clamping(&self) -> bool {
        Self::from_parameters(&self.to_parameters()) != *self
    }

    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        let state: Self = serde_json::from_slice(bytes)?;
        if state.needs_clamping() {
            warn!("EQ state contains out-of-range values; they will be clamped");
        }
        Ok(state)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> EngineResult<()> {
        let bytes = self.to_bytes()?;
        if let Err(e) = fs::write(path, bytes) {
            error!("Failed to write EQ state to {:?}: {}", path, e);
            return Err(e.into());
        }
        info!("Saved EQ state to {:?}", path);
        Ok(())
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> EngineResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            error!("Failed to read EQ state from {:?}: {}", path, e);
            e
        })?;
        let state = Self::from_bytes(&bytes).map_err(|e| {
            error!("Failed to parse EQ state {:?}: {}", path, e);
            e
        })?;
        info!("Loaded EQ state from {:?}", path);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_default_state_matches_default_parameters() {
        let state = EqState::default();
        assert_eq!(state.to_parameters(), BandParameters::default());
        assert!(!state.needs_clamping());
    }

    #[test]
    fn test_bytes_round_trip() {
        let state = EqState {
            low_cut_freq: 80.0,
            low_cut_slope: 2.0,
            high_cut_slope: 1.0,
            peak_gain: -6.0,
            ..EqState::default()
        };
        let bytes = state.to_bytes().unwrap();
        assert_eq!(EqState::from_bytes(&bytes).unwrap(), state);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let state = EqState::from_bytes(br#"{"peak_gain": 3.5}"#).unwrap();
        assert_eq!(state.peak_gain, 3.5);
        assert_eq!(state.peak_freq, 1000.0);
        assert_eq!(state.high_cut_freq, 20000.0);
    }

    #[test]
    fn test_out_of_range_document_is_clamped() {
        let state =
            EqState::from_bytes(br#"{"low_cut_slope": 7, "peak_quality": 50.0}"#).unwrap();
        assert!(state.needs_clamping());

        let params = state.to_parameters();
        assert_eq!(params.low_cut_slope, Slope::Db48);
        assert_eq!(params.peak_q, 10.0);
    }

    #[test]
    fn test_slope_ordinals_of_any_number_type_load() {
        let state = EqState::from_bytes(br#"{"low_cut_slope": -1}"#).unwrap();
        assert!(state.needs_clamping());
        assert_eq!(state.to_parameters().low_cut_slope, Slope::Db12);

        let state = EqState::from_bytes(br#"{"high_cut_slope": 2.0}"#).unwrap();
        assert!(!state.needs_clamping());
        assert_eq!(state.to_parameters().high_cut_slope, Slope::Db36);

        let state = EqState::from_bytes(br#"{"high_cut_slope": 1.4}"#).unwrap();
        assert_eq!(state.to_parameters().high_cut_slope, Slope::Db24);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = EqState::from_bytes(b"not a state");
        assert!(matches!(result, Err(EngineError::StateDecode(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eq.json");

        let state = EqState {
            peak_freq: 2500.0,
            peak_gain: 12.0,
            peak_quality: 3.0,
            ..EqState::default()
        };
        state.save(&path).unwrap();

        assert_eq!(EqState::load(&path).unwrap(), state);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EqState::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
