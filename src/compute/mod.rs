//! Compute module - Numerical core of the Gray-Scott engine.

mod field;
mod stencil;
mod stepper;

pub use field::*;
pub use stencil::*;
pub use stepper::*;
