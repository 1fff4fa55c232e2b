//! Price forecasting.
//!
//! Responsibilities:
//!
//! - grow single-feature regression trees (`tree`)
//! - bag them into a seeded random forest, fit in parallel (`forest`)
//! - turn a crop's price series into a clamped next-month forecast (`forecaster`)

pub mod forecaster;
pub mod forest;
pub mod tree;

pub use forecaster::*;
pub use forest::*;
pub use tree::*;
