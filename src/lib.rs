//! `cropplan` library crate.
//!
//! The binary (`cropplan`) is a thin wrapper around this library so that:
//!
//! - forecasting and allocation are testable without spawning processes
//! - the pipeline is reusable from other front-ends (services, notebooks)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod math;
pub mod optimize;
pub mod report;
