//! Seed patterns for initializing the concentration field.
//!
//! Every pattern starts from the rest state (u = 1, v = 0 everywhere)
//! and stamps circular perturbations of u = 0.5, v = 0.25 into it.
//! Circles clip at the grid edge; seeding does not wrap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rest-state concentration of u.
pub const REST_U: f32 = 1.0;
/// Rest-state concentration of v.
pub const REST_V: f32 = 0.0;
/// Concentration of u inside a seeded circle.
pub const SEED_U: f32 = 0.5;
/// Concentration of v inside a seeded circle.
pub const SEED_V: f32 = 0.25;

/// Initial perturbation layout for a fresh field.
///
/// `Center` and `Multiple` are fully deterministic: applying them to
/// equal grids always produces bitwise-equal concentrations. Only
/// `Random` consumes the layout RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedPattern {
    /// One circle in the middle of the grid, radius 10% of the
    /// smaller dimension.
    #[default]
    Center,
    /// Between 3 and 7 circles with random centers and radii in
    /// [5, 15] cells. Overlaps resolve last-stamp-wins.
    Random,
    /// A 3x3 lattice of circles at quarter-points of the grid,
    /// radius 15% of the smaller lattice spacing.
    Multiple,
}

impl SeedPattern {
    /// Stamp this pattern into rest-state concentration arrays.
    ///
    /// The arrays must already hold the rest state; `apply` only
    /// writes the perturbed cells. `Center` and `Multiple` never
    /// touch `rng`.
    pub(crate) fn apply(
        self,
        u: &mut [f32],
        v: &mut [f32],
        width: usize,
        height: usize,
        rng: &mut SeedRng,
    ) {
        match self {
            SeedPattern::Center => {
                let cx = (width / 2) as f32;
                let cy = (height / 2) as f32;
                let radius = 0.1 * width.min(height) as f32;
                stamp_circle(u, v, width, height, cx, cy, radius);
            }
            SeedPattern::Random => {
                let count = 3 + rng.next_index(5);
                for _ in 0..count {
                    let cx = rng.next_index(width) as f32;
                    let cy = rng.next_index(height) as f32;
                    let radius = rng.uniform(5.0, 15.0);
                    stamp_circle(u, v, width, height, cx, cy, radius);
                }
            }
            SeedPattern::Multiple => {
                let spacing_x = width as f32 / 4.0;
                let spacing_y = height as f32 / 4.0;
                let radius = 0.15 * spacing_x.min(spacing_y);
                for j in 1..=3 {
                    for i in 1..=3 {
                        let cx = i as f32 * spacing_x;
                        let cy = j as f32 * spacing_y;
                        stamp_circle(u, v, width, height, cx, cy, radius);
                    }
                }
            }
        }
    }
}

impl fmt::Display for SeedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedPattern::Center => "center",
            SeedPattern::Random => "random",
            SeedPattern::Multiple => "multiple",
        };
        f.write_str(name)
    }
}

impl FromStr for SeedPattern {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(SeedPattern::Center),
            "random" => Ok(SeedPattern::Random),
            "multiple" => Ok(SeedPattern::Multiple),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Error for an unrecognized pattern, palette or preset name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown name: {0:?}")]
pub struct UnknownName(pub String);

/// Set every cell inside the circle to the seed concentrations.
///
/// Scans the clipped bounding box; cells qualify on strict Euclidean
/// distance so a zero-radius circle stamps nothing.
fn stamp_circle(
    u: &mut [f32],
    v: &mut [f32],
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
) {
    let x0 = (cx - radius).floor().max(0.0) as usize;
    let y0 = (cy - radius).floor().max(0.0) as usize;
    let x1 = ((cx + radius).ceil() as usize + 1).min(width);
    let y1 = ((cy + radius).ceil() as usize + 1).min(height);
    let r_sq = radius * radius;

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy < r_sq {
                let idx = y * width + x;
                u[idx] = SEED_U;
                v[idx] = SEED_V;
            }
        }
    }
}

/// Deterministic stream for random seed layouts (xorshift64*).
///
/// Works identically on native and WASM, so a stored stream state
/// reproduces the same layout everywhere.
pub(crate) struct SeedRng {
    state: u64,
}

impl SeedRng {
    pub(crate) fn new(state: u64) -> Self {
        // Zero is the one fixed point of the xorshift scramble.
        let state = if state == 0 { 0xDEAD_BEEF } else { state };
        Self { state }
    }

    pub(crate) fn state(&self) -> u64 {
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform f32 in [0, 1) from the high 24 bits.
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}
