//! Simulation session - the play/pause loop around the field engine.
//!
//! A [`Session`] owns one [`Field`] plus its [`Stepper`] and drives
//! them in render-tick batches. The host (a browser frame callback, a
//! CLI loop, a test) asks for ticks; the session decides whether a
//! tick is still wanted.
//!
//! Tick scheduling works through tokens. `play` hands out a
//! [`TickToken`]; each `tick` call must present one. Pausing bumps an
//! internal epoch, which silently voids every token issued before, so
//! a callback that was already queued when the user hit pause arrives,
//! presents its stale token and does nothing. That is the whole
//! cancellation story: no timers, no shared flags.

use log::debug;
use serde::Serialize;

use crate::compute::{Field, FieldError, FieldStats, Stepper};
use crate::schema::{
    ChannelMix, ColorMap, ConfigError, Parameters, STEPS_PER_TICK_MAX, STEPS_PER_TICK_MIN,
    SeedPattern, SimulationConfig,
};

/// Whether the loop is advancing on ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Not advancing; ticks are ignored.
    #[default]
    Stopped,
    /// Advancing one batch per tick.
    Running,
}

/// Proof that a tick was scheduled while the session was running.
///
/// Tokens are cheap and copyable; they become stale the moment the
/// session pauses or is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    epoch: u64,
}

/// Borrowed view of the current field for rendering and export.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameSnapshot<'a> {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Engine steps taken since the last (re-)seed.
    pub step: u64,
    /// The u concentration grid.
    pub u: &'a [f32],
    /// The v concentration grid.
    pub v: &'a [f32],
}

impl<'a> FrameSnapshot<'a> {
    /// Collapse both channels to one scalar per cell.
    pub fn mixed(&self, mix: ChannelMix) -> Vec<f32> {
        self.u
            .iter()
            .zip(self.v.iter())
            .map(|(&u, &v)| mix.mix(u, v))
            .collect()
    }

    /// Color every cell through the host's palette.
    /// Returns a packed RGB buffer of `3 * width * height` bytes.
    pub fn render<M: ColorMap>(&self, mix: ChannelMix, map: &M) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 * self.u.len());
        for (&u, &v) in self.u.iter().zip(self.v.iter()) {
            out.extend_from_slice(&map.rgb(mix.mix(u, v)));
        }
        out
    }

    /// Raw bytes of the u grid in native order (zero-copy).
    pub fn u_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.u)
    }

    /// Raw bytes of the v grid in native order (zero-copy).
    pub fn v_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.v)
    }
}

/// One simulation session: field, stepper and loop state.
pub struct Session {
    field: Field,
    stepper: Stepper,
    params: Parameters,
    dt: f32,
    steps_per_tick: u32,
    seed_pattern: SeedPattern,
    state: RunState,
    /// Bumped on pause and resize; stale tokens carry old values.
    epoch: u64,
    /// Engine steps since the last (re-)seed.
    steps_total: u64,
    /// Extra entropy folded into random layouts, kept so a resize
    /// re-creates the field from the same stream family.
    rng_seed: u64,
}

impl Session {
    /// Create a session from a validated configuration.
    pub fn new(config: &SimulationConfig) -> Result<Self, SessionError> {
        Self::with_rng_seed(config, 0)
    }

    /// Create a session, folding extra entropy into random layouts.
    pub fn with_rng_seed(config: &SimulationConfig, rng_seed: u64) -> Result<Self, SessionError> {
        config.validate()?;
        let field =
            Field::create_seeded(config.width, config.height, config.seed_pattern, rng_seed)?;
        let stepper = Stepper::new(config.width, config.height);
        debug!(
            "session created: {}x{} grid, {} seed, {} steps/tick",
            config.width, config.height, config.seed_pattern, config.steps_per_tick
        );
        Ok(Self {
            field,
            stepper,
            params: config.params,
            dt: config.dt,
            steps_per_tick: config.steps_per_tick,
            seed_pattern: config.seed_pattern,
            state: RunState::Stopped,
            epoch: 0,
            steps_total: 0,
            rng_seed,
        })
    }

    /// Start (or keep) running. Idempotent.
    ///
    /// Returns the token the host must present with each tick.
    pub fn play(&mut self) -> TickToken {
        if self.state != RunState::Running {
            self.state = RunState::Running;
            debug!("session running at step {}", self.steps_total);
        }
        TickToken { epoch: self.epoch }
    }

    /// Stop running. Idempotent.
    ///
    /// Voids every outstanding [`TickToken`], so ticks already queued
    /// by the host arrive as no-ops.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
            self.epoch += 1;
            debug!("session paused at step {}", self.steps_total);
        }
    }

    /// One scheduled tick: advance a batch if the token is current.
    ///
    /// Returns the token for the next tick, or `None` when the token
    /// is stale or the session stopped; on `None` the host must not
    /// reschedule. The field is untouched in the `None` case.
    #[must_use]
    pub fn tick(&mut self, token: TickToken) -> Option<TickToken> {
        if self.state != RunState::Running || token.epoch != self.epoch {
            return None;
        }
        self.run_batch();
        Some(TickToken { epoch: self.epoch })
    }

    /// Advance exactly one batch without touching the run state.
    ///
    /// Backs the single-step button: works while stopped and does not
    /// stop a running session.
    pub fn step_once(&mut self) {
        self.run_batch();
    }

    /// Re-seed the field with the currently selected pattern.
    ///
    /// Zeroes the step counter; the run state is left alone, so a
    /// running session keeps animating from the fresh seed.
    pub fn reset(&mut self) {
        self.field.reset(self.seed_pattern);
        self.steps_total = 0;
        debug!("field re-seeded with {} pattern", self.seed_pattern);
    }

    /// Re-seed the field with a one-shot random arrangement.
    ///
    /// Does not change the selected seed pattern: a later [`reset`]
    /// still uses the configured one.
    ///
    /// [`reset`]: Session::reset
    pub fn reseed_random(&mut self) {
        self.field.reset(SeedPattern::Random);
        self.steps_total = 0;
        debug!("field re-seeded with a random layout");
    }

    /// Auto-pause on visibility loss.
    ///
    /// Losing visibility pauses a running session; regaining it never
    /// resumes on its own. The user must press play again.
    pub fn set_visible(&mut self, visible: bool) {
        if !visible && self.state == RunState::Running {
            debug!("visibility lost, auto-pausing");
            self.pause();
        }
    }

    /// Replace the field with a freshly seeded one of new dimensions.
    ///
    /// Full teardown: the session stops, the step counter zeroes and
    /// all outstanding tick tokens go stale. On error the old field
    /// is kept untouched.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), SessionError> {
        let field = Field::create_seeded(width, height, self.seed_pattern, self.rng_seed)?;
        self.field = field;
        self.stepper = Stepper::new(width, height);
        self.state = RunState::Stopped;
        self.epoch += 1;
        self.steps_total = 0;
        debug!("resized to {width}x{height}, session stopped");
        Ok(())
    }

    /// Replace all four coefficients at once.
    ///
    /// The batch loop reads the parameters once per step, so an
    /// update between ticks takes effect on the next step and a step
    /// never mixes old and new coefficients.
    pub fn set_params(&mut self, params: Parameters) {
        self.params = params;
    }

    /// Current reaction-diffusion coefficients.
    pub fn params(&self) -> Parameters {
        self.params
    }

    /// Set the batch size, clamped into the supported range.
    pub fn set_steps_per_tick(&mut self, steps: u32) {
        self.steps_per_tick = steps.clamp(STEPS_PER_TICK_MIN, STEPS_PER_TICK_MAX);
    }

    /// Engine steps folded into one tick.
    pub fn steps_per_tick(&self) -> u32 {
        self.steps_per_tick
    }

    /// Select the pattern used by the next [`reset`](Session::reset).
    pub fn set_seed_pattern(&mut self, pattern: SeedPattern) {
        self.seed_pattern = pattern;
    }

    /// Currently selected seed pattern.
    pub fn seed_pattern(&self) -> SeedPattern {
        self.seed_pattern
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// True while ticks advance the field.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Engine steps since the last (re-)seed.
    pub fn steps_total(&self) -> u64 {
        self.steps_total
    }

    /// The field being simulated.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Borrow the current frame for rendering or export.
    pub fn frame(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            width: self.field.width(),
            height: self.field.height(),
            step: self.steps_total,
            u: self.field.u(),
            v: self.field.v(),
        }
    }

    /// Statistics over the current field.
    pub fn stats(&self) -> FieldStats {
        FieldStats::from_field(&self.field)
    }

    /// Snapshot of the session's settings as a configuration.
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            width: self.field.width(),
            height: self.field.height(),
            dt: self.dt,
            params: self.params,
            steps_per_tick: self.steps_per_tick,
            seed_pattern: self.seed_pattern,
        }
    }

    fn run_batch(&mut self) {
        self.stepper.run(
            &mut self.field,
            &self.params,
            self.dt,
            u64::from(self.steps_per_tick),
        );
        self.steps_total += u64::from(self.steps_per_tick);
    }
}

/// Session lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A frame, export or control request arrived before any session
    /// was created. Distinct from a tick no-op: hosts surface this
    /// one to the user.
    #[error("No simulation session has been created yet")]
    NotInitialized,
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),
}
