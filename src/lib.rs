//! Gray-Scott reaction-diffusion - interactive two-species pattern
//! formation on a toroidal grid.
//!
//! This crate implements the classic Gray-Scott system: two coupled
//! concentration fields diffusing and reacting on a periodic 2D grid,
//! stepped with an explicit Euler scheme and double-buffered so every
//! update reads a consistent previous generation.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Configuration, seed patterns, presets and the stored
//!   settings record
//! - `compute`: Numerical core (field, Laplacian stencil, stepper)
//! - `session`: The play/pause loop that hosts drive tick by tick
//!
//! # Example
//!
//! ```rust
//! use gray_scott::{schema::SimulationConfig, session::Session};
//!
//! // Create configuration
//! let config = SimulationConfig {
//!     width: 64,
//!     height: 64,
//!     ..SimulationConfig::default()
//! };
//!
//! // Create session and run a few render ticks
//! let mut session = Session::new(&config).unwrap();
//! let mut token = session.play();
//! for _ in 0..10 {
//!     token = session.tick(token).unwrap();
//! }
//!
//! println!(
//!     "Active cells after {} steps: {}",
//!     session.steps_total(),
//!     session.stats().active_cells
//! );
//! ```

pub mod compute;
pub mod schema;
pub mod session;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{Field, FieldStats, Stepper};
pub use schema::{
    ChannelMix, ParamPreset, Parameters, SeedPattern, SessionRecord, SimulationConfig,
};
pub use session::{FrameSnapshot, RunState, Session, TickToken};
