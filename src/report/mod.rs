//! Reporting utilities: terminal formatting of allocations, forecasts,
//! price quotes, and region listings.

pub mod format;

pub use format::*;
