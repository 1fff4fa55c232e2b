//! Land allocation optimizer.

pub mod allocation;

pub use allocation::*;
