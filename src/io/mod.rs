//! Input/output helpers.
//!
//! - CSV ingest + schema mapping (`ingest`)
//! - crop parameter files (`params`)
//! - allocation exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod params;

pub use export::*;
pub use ingest::*;
pub use params::*;
