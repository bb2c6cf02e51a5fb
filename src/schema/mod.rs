//! Schema module - Configuration, seeding and persistence types for
//! Gray-Scott simulations.

mod config;
mod palette;
mod preset;
mod record;
mod seed;

pub use config::*;
pub use palette::*;
pub use preset::*;
pub use record::*;
pub use seed::*;
