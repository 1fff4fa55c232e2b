//! Mathematical utilities: a small dense simplex solver.

pub mod simplex;

pub use simplex::*;
