//! Named parameter presets for well-known Gray-Scott pattern regimes.
//!
//! The interesting behavior of the system lives in a narrow band of
//! feed/kill space; these are known-good points in that band. All
//! presets share the standard diffusion rates (du = 0.16, dv = 0.08)
//! and differ only in feed and kill.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Parameters, UnknownName};

/// Preset parameters for common Gray-Scott patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamPreset {
    /// Mitosis-like dividing cells.
    Mitosis,
    /// Coral-like branching patterns.
    Coral,
    /// Maze-like patterns.
    Maze,
    /// Soliton spots.
    Solitons,
    /// Worm-like patterns.
    Worms,
    /// Stable spots pattern.
    Spots,
    /// Unstable chaotic pattern.
    Chaos,
    /// Moving spots.
    MovingSpots,
}

impl ParamPreset {
    /// All presets, in menu order.
    pub const ALL: [ParamPreset; 8] = [
        ParamPreset::Mitosis,
        ParamPreset::Coral,
        ParamPreset::Maze,
        ParamPreset::Solitons,
        ParamPreset::Worms,
        ParamPreset::Spots,
        ParamPreset::Chaos,
        ParamPreset::MovingSpots,
    ];

    /// Full coefficient set for this preset.
    pub fn parameters(self) -> Parameters {
        let (feed, kill) = match self {
            ParamPreset::Mitosis => (0.028, 0.062),
            ParamPreset::Coral => (0.037, 0.060),
            ParamPreset::Maze => (0.029, 0.057),
            ParamPreset::Solitons => (0.030, 0.062),
            ParamPreset::Worms => (0.078, 0.061),
            ParamPreset::Spots => (0.035, 0.065),
            ParamPreset::Chaos => (0.026, 0.051),
            ParamPreset::MovingSpots => (0.014, 0.054),
        };
        Parameters {
            feed,
            kill,
            ..Parameters::default()
        }
    }

    /// Human-readable name, suitable for menus and logs.
    pub fn name(self) -> &'static str {
        match self {
            ParamPreset::Mitosis => "mitosis",
            ParamPreset::Coral => "coral",
            ParamPreset::Maze => "maze",
            ParamPreset::Solitons => "solitons",
            ParamPreset::Worms => "worms",
            ParamPreset::Spots => "spots",
            ParamPreset::Chaos => "chaos",
            ParamPreset::MovingSpots => "moving-spots",
        }
    }
}

impl fmt::Display for ParamPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamPreset {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}
