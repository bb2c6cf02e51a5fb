//! Explicit Euler stepper for the Gray-Scott system.
//!
//! Each step reads the previous concentrations in full and writes the
//! next generation into pre-allocated scratch buffers, then swaps the
//! buffers into the field. No cell ever sees a half-updated neighbor.
//!
//! Update rule per cell:
//!   u' = u + dt * (du * lap(u) - u*v^2 + feed * (1 - u))
//!   v' = v + dt * (dv * lap(v) + u*v^2 - (feed + kill) * v)
//! with both results clamped to [0, 1]. The clamp keeps every finite
//! parameter combination numerically bounded.

use crate::schema::Parameters;

use super::{Field, laplacian_into};

/// Reusable scratch for stepping fields of one size.
pub struct Stepper {
    /// Laplacian of u, recomputed each step.
    lap_u: Vec<f32>,
    /// Laplacian of v, recomputed each step.
    lap_v: Vec<f32>,
    /// Next-generation buffers, swapped into the field after each step.
    next_u: Vec<f32>,
    next_v: Vec<f32>,
}

impl Stepper {
    /// Create a stepper for `width` x `height` fields.
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            lap_u: vec![0.0f32; size],
            lap_v: vec![0.0f32; size],
            next_u: vec![0.0f32; size],
            next_v: vec![0.0f32; size],
        }
    }

    /// Advance the field by one time step.
    pub fn step(&mut self, field: &mut Field, params: &Parameters, dt: f32) {
        let width = field.width();
        let height = field.height();
        debug_assert_eq!(self.next_u.len(), field.grid_size(), "stepper sized for another grid");

        laplacian_into(field.u(), &mut self.lap_u, width, height);
        laplacian_into(field.v(), &mut self.lap_v, width, height);

        let Parameters { du, dv, feed, kill } = *params;
        {
            let u = field.u();
            let v = field.v();
            for (idx, (&uc, &vc)) in u.iter().zip(v.iter()).enumerate() {
                let reaction = uc * vc * vc;
                self.next_u[idx] = (uc
                    + dt * (du * self.lap_u[idx] - reaction + feed * (1.0 - uc)))
                .clamp(0.0, 1.0);
                self.next_v[idx] = (vc
                    + dt * (dv * self.lap_v[idx] + reaction - (feed + kill) * vc))
                .clamp(0.0, 1.0);
            }
        }

        field.swap_buffers(&mut self.next_u, &mut self.next_v);
    }

    /// Run the field for the specified number of steps.
    pub fn run(&mut self, field: &mut Field, params: &Parameters, dt: f32, steps: u64) {
        for _ in 0..steps {
            self.step(field, params, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{REST_U, REST_V, SeedPattern};
    use proptest::prelude::*;

    fn stepper_for(field: &Field) -> Stepper {
        Stepper::new(field.width(), field.height())
    }

    #[test]
    fn test_rest_state_is_a_fixed_point() {
        // u = 1, v = 0 everywhere: diffusion, reaction and feed all
        // vanish exactly.
        let size = 16 * 16;
        let mut field =
            Field::from_parts(16, 16, vec![REST_U; size], vec![REST_V; size]).expect("from_parts");
        let mut stepper = stepper_for(&field);

        stepper.run(&mut field, &Parameters::default(), 1.0, 3);

        assert!(field.u().iter().all(|&u| u == REST_U), "u must stay at rest");
        assert!(field.v().iter().all(|&v| v == REST_V), "v must stay at rest");
    }

    #[test]
    fn test_identical_runs_are_bitwise_equal() {
        let mut a = Field::create(32, 32, SeedPattern::Center).expect("create");
        let mut b = Field::create(32, 32, SeedPattern::Center).expect("create");
        let mut stepper_a = stepper_for(&a);
        let mut stepper_b = stepper_for(&b);

        let params = Parameters::default();
        stepper_a.run(&mut a, &params, 1.0, 10);
        stepper_b.run(&mut b, &params, 1.0, 10);

        assert_eq!(a.u(), b.u(), "identical runs must agree bitwise");
        assert_eq!(a.v(), b.v(), "identical runs must agree bitwise");
    }

    #[test]
    fn test_pure_diffusion_conserves_u() {
        // With feed = kill = 0 and v = 0 everywhere the reaction term
        // is zero and stepping is plain diffusion, which moves u
        // around but never creates or destroys it.
        let width = 24;
        let height = 24;
        let u: Vec<f32> = (0..width * height)
            .map(|i| ((i * 13) % 7) as f32 / 7.0)
            .collect();
        let v = vec![0.0f32; width * height];
        let mut field = Field::from_parts(width, height, u, v).expect("from_parts");
        let mut stepper = stepper_for(&field);

        let params = Parameters {
            feed: 0.0,
            kill: 0.0,
            ..Parameters::default()
        };

        let initial_mass = field.total_u();
        stepper.run(&mut field, &params, 1.0, 10);
        let final_mass = field.total_u();

        let relative_error = (final_mass - initial_mass).abs() / initial_mass;
        assert!(
            relative_error < 1e-4,
            "u mass not conserved: {} -> {} ({}% error)",
            initial_mass,
            final_mass,
            relative_error * 100.0
        );
        assert!(field.v().iter().all(|&v| v == 0.0), "v must stay empty");
    }

    #[test]
    fn test_torus_has_no_preferred_origin() {
        // The same perturbation shifted by one column must produce
        // the same shifted result, including across the wrap seam.
        let width = 8;
        let height = 6;
        let size = width * height;

        let build = |spike_x: usize| {
            let u = vec![REST_U; size];
            let mut v = vec![REST_V; size];
            v[2 * width + spike_x] = 0.25;
            Field::from_parts(width, height, u, v).expect("from_parts")
        };

        let mut a = build(0);
        let mut b = build(1);
        let mut stepper = Stepper::new(width, height);
        let params = Parameters::default();
        stepper.step(&mut a, &params, 1.0);
        stepper.step(&mut b, &params, 1.0);

        for y in 0..height {
            for x in 0..width {
                let shifted = (x + 1) % width;
                assert_eq!(
                    a.get_v(x, y),
                    b.get_v(shifted, y),
                    "shift equivariance broken at ({x}, {y})"
                );
                assert_eq!(a.get_u(x, y), b.get_u(shifted, y));
            }
        }
    }

    #[test]
    fn test_tiny_center_grid_spreads_from_middle() {
        // On a 4x4 grid the center circle covers exactly cell (2, 2).
        // After one step grow-out reaches its 4-neighbors while the
        // corners, two hops away on this torus, still sit at rest.
        let mut field = Field::create(4, 4, SeedPattern::Center).expect("create");
        let mut stepper = stepper_for(&field);
        stepper.step(&mut field, &Parameters::default(), 1.0);

        let corners = [(0, 0), (3, 0), (0, 3), (3, 3)];
        for &(x, y) in &corners {
            assert_eq!(field.get_v(x, y), 0.0, "corner ({x}, {y}) v");
            assert_eq!(field.get_u(x, y), 1.0, "corner ({x}, {y}) u");
        }

        let block = [(1, 1), (2, 1), (1, 2), (2, 2)];
        let block_max = block
            .iter()
            .map(|&(x, y)| field.get_v(x, y))
            .fold(f32::NEG_INFINITY, f32::max);
        let block_min = block
            .iter()
            .map(|&(x, y)| field.get_v(x, y))
            .fold(f32::INFINITY, f32::min);
        assert!(block_max > 0.0, "activity must appear near the center");
        assert!(
            block_min >= 0.0 && block_max > field.get_v(0, 0),
            "center block must dominate the corners"
        );
        // The seeded cell itself keeps the most v.
        assert!(field.get_v(2, 2) > field.get_v(1, 2));
    }

    #[test]
    fn test_reset_after_stepping_matches_fresh_field() {
        for pattern in [SeedPattern::Center, SeedPattern::Multiple] {
            let mut field = Field::create(32, 32, pattern).expect("create");
            let mut stepper = stepper_for(&field);
            stepper.run(&mut field, &Parameters::default(), 1.0, 5);

            field.reset(pattern);
            let fresh = Field::create(32, 32, pattern).expect("create");
            assert_eq!(field.u(), fresh.u(), "{pattern} reset must wipe stepping history");
            assert_eq!(field.v(), fresh.v(), "{pattern} reset must wipe stepping history");
        }
    }

    #[test]
    fn test_run_equals_repeated_steps() {
        let mut a = Field::create(16, 16, SeedPattern::Multiple).expect("create");
        let mut b = Field::create(16, 16, SeedPattern::Multiple).expect("create");
        let mut stepper = Stepper::new(16, 16);
        let params = Parameters::default();

        stepper.run(&mut a, &params, 1.0, 4);
        for _ in 0..4 {
            stepper.step(&mut b, &params, 1.0);
        }

        assert_eq!(a.u(), b.u());
        assert_eq!(a.v(), b.v());
    }

    proptest! {
        #[test]
        fn prop_step_keeps_unit_bounds(
            du in -2.0f32..2.0,
            dv in -2.0f32..2.0,
            feed in -2.0f32..2.0,
            kill in -2.0f32..2.0,
            dt in -4.0f32..4.0,
            rng_seed in any::<u64>(),
        ) {
            // Any finite parameter combination, however degenerate,
            // must leave every concentration inside [0, 1].
            let mut field = Field::create_seeded(12, 9, SeedPattern::Random, rng_seed).unwrap();
            let mut stepper = Stepper::new(12, 9);
            let params = Parameters { du, dv, feed, kill };

            stepper.run(&mut field, &params, dt, 3);

            for (&u, &v) in field.u().iter().zip(field.v().iter()) {
                prop_assert!((0.0..=1.0).contains(&u), "u escaped bounds: {}", u);
                prop_assert!((0.0..=1.0).contains(&v), "v escaped bounds: {}", v);
            }
        }
    }
}
