//! Versioned settings record for the persistence collaborator.
//!
//! The engine owns only the shape of the record, never the storage
//! medium. Hosts stash the JSON wherever they like (local storage, a
//! file, a share URL) and hand it back to rebuild a session.

use serde::{Deserialize, Serialize};

use super::{ChannelMix, Parameters, SeedPattern, SimulationConfig};

/// Current record format version.
pub const RECORD_VERSION: u32 = 1;

/// Everything a host needs to restore a session.
///
/// Deliberately excludes the concentration arrays and the time step:
/// a restored session re-seeds from `seed_pattern` and runs at the
/// default dt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Record format version.
    pub version: u32,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Reaction-diffusion coefficients.
    pub params: Parameters,
    /// Display channel mix.
    pub palette: ChannelMix,
    /// Engine steps per render tick.
    pub steps_per_tick: u32,
    /// Pattern used when re-seeding.
    pub seed_pattern: SeedPattern,
}

impl SessionRecord {
    /// Capture the restorable parts of a configuration.
    pub fn from_config(config: &SimulationConfig, palette: ChannelMix) -> Self {
        Self {
            version: RECORD_VERSION,
            width: config.width,
            height: config.height,
            params: config.params,
            palette,
            steps_per_tick: config.steps_per_tick,
            seed_pattern: config.seed_pattern,
        }
    }

    /// Rebuild a configuration from this record.
    ///
    /// The record carries no dt, so the result uses the default.
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            width: self.width,
            height: self.height,
            params: self.params,
            steps_per_tick: self.steps_per_tick,
            seed_pattern: self.seed_pattern,
            ..SimulationConfig::default()
        }
    }

    /// Serialize to a JSON string.
    pub fn encode(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON string, rejecting records from other format
    /// versions. Hosts fall back to defaults on any error here.
    pub fn decode(json: &str) -> Result<Self, RecordError> {
        let record: SessionRecord = serde_json::from_str(json)?;
        if record.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion(record.version));
        }
        Ok(record)
    }
}

/// Errors for encoding and decoding settings records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Unsupported record version: {0}")]
    UnsupportedVersion(u32),
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}
