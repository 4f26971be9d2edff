//! Mathematical utilities: point spacing and interpolation.

pub mod spacing;

pub use spacing::*;
