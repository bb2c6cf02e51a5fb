//! Configuration types for Gray-Scott simulation parameters.

use serde::{Deserialize, Serialize};

use super::SeedPattern;

/// Smallest accepted steps-per-tick batch size.
pub const STEPS_PER_TICK_MIN: u32 = 1;
/// Largest accepted steps-per-tick batch size.
pub const STEPS_PER_TICK_MAX: u32 = 10;

/// Default time step. The explicit Euler scheme is stable for the
/// classic parameter regimes at dt = 1.0.
fn default_dt() -> f32 {
    1.0
}

/// Default number of engine steps folded into one render tick.
fn default_steps_per_tick() -> u32 {
    4
}

/// Reaction-diffusion coefficients for the two-species system.
///
/// `du`/`dv` are the diffusion rates of the two concentrations,
/// `feed` replenishes u and `kill` removes v. The interesting
/// pattern regimes live in a narrow band of feed/kill space; see
/// [`ParamPreset`](super::ParamPreset) for known-good points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Diffusion rate of u.
    pub du: f32,
    /// Diffusion rate of v.
    pub dv: f32,
    /// Feed rate (f): replenishes u toward 1.
    pub feed: f32,
    /// Kill rate (k): drains v in addition to the feed rate.
    pub kill: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            du: 0.16,
            dv: 0.08,
            feed: 0.035,
            kill: 0.065,
        }
    }
}

impl Parameters {
    /// True when all four coefficients are finite numbers.
    ///
    /// Non-finite coefficients would poison the grid (NaN survives
    /// clamping), so configuration validation rejects them up front.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.du.is_finite() && self.dv.is_finite() && self.feed.is_finite() && self.kill.is_finite()
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells (X dimension).
    pub width: usize,
    /// Grid height in cells (Y dimension).
    pub height: usize,
    /// Time step size.
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Reaction-diffusion coefficients.
    #[serde(default)]
    pub params: Parameters,
    /// Engine steps folded into one render tick (1-10).
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: u32,
    /// Initial concentration pattern.
    #[serde(default)]
    pub seed_pattern: SeedPattern,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            dt: default_dt(),
            params: Parameters::default(),
            steps_per_tick: default_steps_per_tick(),
            seed_pattern: SeedPattern::default(),
        }
    }
}

impl SimulationConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep);
        }
        if !self.params.is_finite() {
            return Err(ConfigError::NonFiniteParameters);
        }
        if self.steps_per_tick < STEPS_PER_TICK_MIN || self.steps_per_tick > STEPS_PER_TICK_MAX {
            return Err(ConfigError::InvalidStepsPerTick(self.steps_per_tick));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Time step must be positive and finite")]
    InvalidTimeStep,
    #[error("Reaction-diffusion coefficients must be finite")]
    NonFiniteParameters,
    #[error("Steps per tick must be in [{STEPS_PER_TICK_MIN}, {STEPS_PER_TICK_MAX}], got {0}")]
    InvalidStepsPerTick(u32),
}
