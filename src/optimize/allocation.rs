//! Land allocation linear program.
//!
//! For crops `c` with yield `y_c`, price `p_c`, demand `d_c`, and surplus
//! penalty `k_c`, over total land `L`:
//!
//! ```text
//! maximize   Σ_c ( y_c p_c · area_c − k_c · surplus_c )
//! subject to Σ_c area_c ≤ L
//!            y_c · area_c − surplus_c ≤ d_c      for every c
//!            area_c, surplus_c ≥ 0
//! ```
//!
//! Surplus only enters the objective with a non-positive coefficient, so the
//! solver drives it down to `max(0, y_c · area_c − d_c)`. The origin is
//! feasible (all right-hand sides are non-negative) and area is capped by `L`,
//! so the program always has a finite optimum.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, error};

use crate::domain::CropParameters;
use crate::error::PlanError;
use crate::math::{LinearProgram, SimplexError};

/// Tolerance used when checking the capacity invariant on solver output.
pub const CAPACITY_TOLERANCE: f64 = 1e-6;

/// One crop's inputs to the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct CropInput {
    pub crop: String,
    /// Forecast price (>= 0).
    pub price: f64,
    pub params: CropParameters,
}

/// Optimal plan, indexed like the input crops.
#[derive(Debug, Clone, PartialEq)]
pub struct LandPlan {
    pub areas: Vec<f64>,
    pub surpluses: Vec<f64>,
    pub objective: f64,
}

/// Solve the allocation program for `crops` on `total_land`.
pub fn optimize_allocation(crops: &[CropInput], total_land: f64) -> Result<LandPlan, PlanError> {
    if !(total_land.is_finite() && total_land > 0.0) {
        return Err(PlanError::InvalidRequest(format!(
            "total land must be finite and > 0 (got {total_land})"
        )));
    }
    if crops.is_empty() {
        return Err(PlanError::InvalidRequest("no crops to allocate".to_string()));
    }
    for input in crops {
        if !(input.price.is_finite() && input.price >= 0.0) {
            return Err(PlanError::InvalidRequest(format!(
                "`{}`: price must be finite and >= 0 (got {})",
                input.crop, input.price
            )));
        }
        input.params.validate(&input.crop)?;
    }

    let program = build_program(crops, total_land).map_err(solver_failure)?;
    let solution = program.maximize().map_err(solver_failure)?;

    let k = crops.len();
    let areas = solution.values[..k].to_vec();
    let surpluses = solution.values[k..].to_vec();

    let used: f64 = areas.iter().sum();
    if used > total_land + CAPACITY_TOLERANCE || areas.iter().any(|a| *a < 0.0) {
        return Err(solver_failure(format!(
            "solution violates capacity: allocated {used} of {total_land}"
        )));
    }

    debug!(
        crops = k,
        pivots = solution.pivots,
        objective = solution.objective,
        allocated = used,
        "allocation solved"
    );

    Ok(LandPlan {
        areas,
        surpluses,
        objective: solution.objective,
    })
}

/// Columns: `area_0..area_k`, then `surplus_0..surplus_k`.
/// Rows: capacity, then one surplus-definition row per crop.
fn build_program(crops: &[CropInput], total_land: f64) -> Result<LinearProgram, SimplexError> {
    let k = crops.len();

    let mut objective = DVector::<f64>::zeros(2 * k);
    let mut a = DMatrix::<f64>::zeros(k + 1, 2 * k);
    let mut b = DVector::<f64>::zeros(k + 1);

    b[0] = total_land;
    for (c, input) in crops.iter().enumerate() {
        let p = &input.params;
        objective[c] = p.yield_per_area * input.price;
        objective[k + c] = -p.surplus_penalty;

        a[(0, c)] = 1.0;
        a[(1 + c, c)] = p.yield_per_area;
        a[(1 + c, k + c)] = -1.0;
        b[1 + c] = p.demand;
    }

    LinearProgram::new(objective, a, b)
}

fn solver_failure(err: impl std::fmt::Display) -> PlanError {
    error!(error = %err, "land allocation solver failed");
    PlanError::InternalSolver(err.to_string())
}
