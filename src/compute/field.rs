//! Concentration field - the simulation state container.
//!
//! Two flat f32 grids (u and v) with row-major indexing
//! `y * width + x` on a torus. The arrays are private so nothing can
//! resize them or break the unit-interval bounds from outside; the
//! stepper swaps whole buffers through a crate-internal hook.

use serde::{Deserialize, Serialize};

use crate::schema::{REST_U, REST_V, SeedPattern, SeedRng};

/// Mixed into the layout stream state at creation.
const SEED_STREAM_INIT: u64 = 0xD6E8_FEB8_6659_FD93;
/// Golden-ratio constant. Diffuses caller entropy across the whole
/// state at creation and perturbs the stream on every reset so
/// consecutive random layouts differ.
const SEED_STREAM_PERTURB: u64 = 0x9E37_79B9_7F4A_7C15;

/// Cells with v above this count as active in [`FieldStats`].
const ACTIVE_EPS: f32 = 1e-6;

/// Two-species concentration field on a toroidal grid.
pub struct Field {
    width: usize,
    height: usize,
    u: Vec<f32>,
    v: Vec<f32>,
    /// Layout stream state for the random seed pattern.
    seed_state: u64,
}

impl Field {
    /// Create a field seeded with the given pattern.
    ///
    /// Deterministic patterns (`Center`, `Multiple`) produce
    /// bitwise-identical fields for equal dimensions; `Random` draws
    /// its layout from a stream derived from the dimensions alone.
    pub fn create(width: usize, height: usize, pattern: SeedPattern) -> Result<Self, FieldError> {
        Self::create_seeded(width, height, pattern, 0)
    }

    /// Create a field, folding extra entropy into the layout stream.
    ///
    /// Only `SeedPattern::Random` consumes the stream, so `rng_seed`
    /// has no effect on the other patterns.
    pub fn create_seeded(
        width: usize,
        height: usize,
        pattern: SeedPattern,
        rng_seed: u64,
    ) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions);
        }

        let size = width * height;
        let mut field = Self {
            width,
            height,
            u: vec![REST_U; size],
            v: vec![REST_V; size],
            seed_state: SEED_STREAM_INIT
                ^ ((width as u64) << 32)
                ^ (height as u64)
                ^ rng_seed.wrapping_mul(SEED_STREAM_PERTURB),
        };
        field.stamp(pattern);
        Ok(field)
    }

    /// Build a field from existing concentration arrays.
    ///
    /// Lengths must match `width * height`. Values are taken as-is;
    /// callers own any bounds guarantees for hand-built grids.
    pub fn from_parts(
        width: usize,
        height: usize,
        u: Vec<f32>,
        v: Vec<f32>,
    ) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        let size = width * height;
        for got in [u.len(), v.len()] {
            if got != size {
                return Err(FieldError::LengthMismatch { width, height, got });
            }
        }
        Ok(Self {
            width,
            height,
            u,
            v,
            seed_state: SEED_STREAM_INIT ^ ((width as u64) << 32) ^ (height as u64),
        })
    }

    /// Restore the rest state and stamp a fresh pattern.
    ///
    /// Keeps dimensions and buffers; perturbs the layout stream so a
    /// repeated `Random` reset gives a new arrangement.
    pub fn reset(&mut self, pattern: SeedPattern) {
        self.u.fill(REST_U);
        self.v.fill(REST_V);
        self.seed_state ^= SEED_STREAM_PERTURB;
        self.stamp(pattern);
    }

    fn stamp(&mut self, pattern: SeedPattern) {
        let mut rng = SeedRng::new(self.seed_state);
        pattern.apply(&mut self.u, &mut self.v, self.width, self.height, &mut rng);
        self.seed_state = rng.state();
    }

    /// Grid width (X dimension).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (Y dimension).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Convert (x, y) coordinates to flat index.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// The u concentration grid.
    #[inline]
    pub fn u(&self) -> &[f32] {
        &self.u
    }

    /// The v concentration grid.
    #[inline]
    pub fn v(&self) -> &[f32] {
        &self.v
    }

    /// Get u at (x, y).
    #[inline]
    pub fn get_u(&self, x: usize, y: usize) -> f32 {
        self.u[self.idx(x, y)]
    }

    /// Get v at (x, y).
    #[inline]
    pub fn get_v(&self, x: usize, y: usize) -> f32 {
        self.v[self.idx(x, y)]
    }

    /// Total u concentration over the grid.
    pub fn total_u(&self) -> f32 {
        self.u.iter().sum()
    }

    /// Total v concentration over the grid.
    pub fn total_v(&self) -> f32 {
        self.v.iter().sum()
    }

    /// Swap both concentration buffers with freshly written ones
    /// (no allocation, just pointer swaps).
    pub(crate) fn swap_buffers(&mut self, u: &mut Vec<f32>, v: &mut Vec<f32>) {
        debug_assert_eq!(u.len(), self.u.len());
        debug_assert_eq!(v.len(), self.v.len());
        std::mem::swap(&mut self.u, u);
        std::mem::swap(&mut self.v, v);
    }
}

/// Field construction errors.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Concentration array length {got} does not match {width}x{height} grid")]
    LengthMismatch {
        width: usize,
        height: usize,
        got: usize,
    },
}

/// Field statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStats {
    pub min_u: f32,
    pub max_u: f32,
    pub mean_u: f32,
    pub min_v: f32,
    pub max_v: f32,
    pub mean_v: f32,
    /// Cells with v above a small threshold.
    pub active_cells: usize,
}

impl FieldStats {
    /// Compute statistics from a field.
    pub fn from_field(field: &Field) -> Self {
        let mut min_u = f32::INFINITY;
        let mut max_u = f32::NEG_INFINITY;
        let mut min_v = f32::INFINITY;
        let mut max_v = f32::NEG_INFINITY;
        let mut sum_u = 0.0f32;
        let mut sum_v = 0.0f32;
        let mut active_cells = 0usize;

        for (&u, &v) in field.u().iter().zip(field.v().iter()) {
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
            sum_u += u;
            sum_v += v;
            if v > ACTIVE_EPS {
                active_cells += 1;
            }
        }

        let count = field.grid_size() as f32;
        Self {
            min_u,
            max_u,
            mean_u: sum_u / count,
            min_v,
            max_v,
            mean_v: sum_v / count,
            active_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SEED_U, SEED_V};
    use proptest::prelude::*;

    #[test]
    fn test_create_rejects_zero_dimensions() {
        assert!(matches!(
            Field::create(0, 32, SeedPattern::Center),
            Err(FieldError::InvalidDimensions)
        ));
        assert!(matches!(
            Field::create(32, 0, SeedPattern::Center),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_create_center_layout() {
        let field = Field::create(32, 32, SeedPattern::Center).expect("create");
        assert_eq!(field.grid_size(), 1024);
        assert_eq!(field.get_u(16, 16), SEED_U);
        assert_eq!(field.get_v(16, 16), SEED_V);
        assert_eq!(field.get_u(0, 0), REST_U);
        assert_eq!(field.get_v(0, 0), REST_V);
    }

    #[test]
    fn test_row_major_indexing() {
        // Distinct per-cell values prove idx is y * width + x.
        let width = 4;
        let height = 3;
        let u: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let v = vec![0.0; 12];
        let field = Field::from_parts(width, height, u, v).expect("from_parts");

        assert_eq!(field.get_u(0, 0), 0.0);
        assert_eq!(field.get_u(3, 0), 3.0);
        assert_eq!(field.get_u(0, 1), 4.0);
        assert_eq!(field.get_u(2, 2), 10.0);
    }

    #[test]
    fn test_from_parts_validates_lengths() {
        let err = Field::from_parts(4, 4, vec![0.0; 15], vec![0.0; 16]);
        assert!(matches!(
            err,
            Err(FieldError::LengthMismatch { width: 4, height: 4, got: 15 })
        ));
        assert!(matches!(
            Field::from_parts(0, 4, vec![], vec![]),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_deterministic_patterns_reproduce_bitwise() {
        for pattern in [SeedPattern::Center, SeedPattern::Multiple] {
            let a = Field::create(48, 36, pattern).expect("create");
            let b = Field::create(48, 36, pattern).expect("create");
            assert_eq!(a.u(), b.u(), "{pattern} u layout must reproduce");
            assert_eq!(a.v(), b.v(), "{pattern} v layout must reproduce");
        }
    }

    #[test]
    fn test_random_layout_depends_only_on_stream() {
        let a = Field::create(64, 64, SeedPattern::Random).expect("create");
        let b = Field::create(64, 64, SeedPattern::Random).expect("create");
        assert_eq!(a.v(), b.v(), "same stream seed gives the same layout");

        let c = Field::create_seeded(64, 64, SeedPattern::Random, 1).expect("create");
        assert_ne!(a.v(), c.v(), "extra entropy should change the layout");
    }

    #[test]
    fn test_reset_matches_fresh_create() {
        let mut field = Field::create(40, 30, SeedPattern::Random).expect("create");
        field.reset(SeedPattern::Center);

        let fresh = Field::create(40, 30, SeedPattern::Center).expect("create");
        assert_eq!(field.u(), fresh.u(), "reset must equal a fresh center field");
        assert_eq!(field.v(), fresh.v(), "reset must equal a fresh center field");
    }

    #[test]
    fn test_repeated_random_reset_changes_layout() {
        let mut field = Field::create(96, 96, SeedPattern::Random).expect("create");
        let first: Vec<f32> = field.v().to_vec();
        field.reset(SeedPattern::Random);
        assert_ne!(field.v(), &first[..], "reseeding should draw a new layout");
    }

    #[test]
    fn test_stats_on_known_field() {
        let u = vec![0.0, 0.5, 1.0, 0.5];
        let v = vec![0.0, 0.25, 0.0, 0.75];
        let field = Field::from_parts(2, 2, u, v).expect("from_parts");
        let stats = FieldStats::from_field(&field);

        assert_eq!(stats.min_u, 0.0);
        assert_eq!(stats.max_u, 1.0);
        assert_eq!(stats.mean_u, 0.5);
        assert_eq!(stats.min_v, 0.0);
        assert_eq!(stats.max_v, 0.75);
        assert_eq!(stats.mean_v, 0.25);
        assert_eq!(stats.active_cells, 2);
        assert_eq!(field.total_v(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_created_fields_stay_in_unit_interval(
            width in 1usize..48,
            height in 1usize..48,
            pattern_idx in 0usize..3,
            rng_seed in any::<u64>(),
        ) {
            let pattern = [SeedPattern::Center, SeedPattern::Random, SeedPattern::Multiple]
                [pattern_idx];
            let field = Field::create_seeded(width, height, pattern, rng_seed).unwrap();
            for (&u, &v) in field.u().iter().zip(field.v().iter()) {
                prop_assert!((0.0..=1.0).contains(&u), "u out of bounds: {}", u);
                prop_assert!((0.0..=1.0).contains(&v), "v out of bounds: {}", v);
            }
        }
    }
}
