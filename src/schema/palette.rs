//! Channel mixing for display and export.
//!
//! The engine never colors anything itself; it reduces a cell's (u, v)
//! pair to one scalar and hands that to whatever [`ColorMap`] the host
//! plugs in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownName;

/// How a cell's two concentrations collapse to one display scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMix {
    /// The u concentration alone.
    U,
    /// The v concentration alone.
    #[default]
    V,
    /// The product u * v.
    UV,
    /// The absolute difference |u - v|.
    Difference,
}

impl ChannelMix {
    /// Collapse one cell's concentrations to a scalar in [0, 1].
    ///
    /// Both inputs are clamped to [0, 1] by the stepper, so every
    /// mode's output already lands in [0, 1] without rescaling.
    #[inline]
    pub fn mix(self, u: f32, v: f32) -> f32 {
        match self {
            ChannelMix::U => u,
            ChannelMix::V => v,
            ChannelMix::UV => u * v,
            ChannelMix::Difference => (u - v).abs(),
        }
    }
}

impl fmt::Display for ChannelMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelMix::U => "u",
            ChannelMix::V => "v",
            ChannelMix::UV => "uv",
            ChannelMix::Difference => "difference",
        };
        f.write_str(name)
    }
}

impl FromStr for ChannelMix {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" => Ok(ChannelMix::U),
            "v" => Ok(ChannelMix::V),
            "uv" => Ok(ChannelMix::UV),
            "difference" => Ok(ChannelMix::Difference),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Maps a mixed concentration scalar to an RGB triple.
///
/// Implemented by the rendering host; the engine only promises that
/// `t` lies in [0, 1].
pub trait ColorMap {
    fn rgb(&self, t: f32) -> [u8; 3];
}

/// Plain grayscale ramp, the fallback palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl ColorMap for Grayscale {
    fn rgb(&self, t: f32) -> [u8; 3] {
        let level = (t.clamp(0.0, 1.0) * 255.0) as u8;
        [level, level, level]
    }
}
