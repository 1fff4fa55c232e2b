//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized price observations (`PriceRecord`)
//! - crop parameter configuration (`CropParameters`, `CropParamTable`)
//! - request/result shapes for forecasting, lookup, and allocation

pub mod types;

pub use types::*;
