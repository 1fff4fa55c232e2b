//! Error types.
//!
//! The planning core reports failures as [`PlanError`]; the binary wraps them
//! (and its own I/O failures) in [`AppError`], which carries the process exit
//! code:
//!
//! - `2`: bad input or configuration (schema, request, parameter file)
//! - `3`: no usable data for the request
//! - `4`: internal failure (solver, numerics)

use thiserror::Error;

/// Failures raised by the forecast-then-optimize core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The source table cannot be mapped onto price records.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Malformed allocation request (non-positive land, no crops, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Crop parameter configuration is unusable.
    #[error("invalid crop parameters: {0}")]
    InvalidParameters(String),

    /// Nothing in the price history matches the request.
    #[error("no data: {0}")]
    NoData(String),

    /// The LP solver failed on a problem that is feasible and bounded by construction.
    #[error("internal solver error: {0}")]
    InternalSolver(String),
}

impl PlanError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PlanError::DataFormat(_) | PlanError::InvalidRequest(_) | PlanError::InvalidParameters(_) => 2,
            PlanError::NoData(_) => 3,
            PlanError::InternalSolver(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
