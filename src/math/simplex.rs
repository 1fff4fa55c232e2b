//! Dense tableau simplex for small linear programs.
//!
//! Solves
//!
//! ```text
//! maximize   cᵀx
//! subject to A x ≤ b,  x ≥ 0
//! ```
//!
//! with `b ≥ 0`, so the all-slack basis (x = 0) is an initial feasible
//! vertex and no phase-one is needed.
//!
//! Implementation choices:
//! - Bland's rule for both entering and leaving variables. It is slower than
//!   steepest-edge pivoting but cannot cycle, and the pivot sequence is fully
//!   determined by the input, so identical problems give identical solutions.
//! - Every structural variable ends with a definite value: basic variables
//!   read their value from the right-hand side, non-basic ones sit at 0.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Pivot tolerance.
const EPS: f64 = 1e-9;

/// Hard cap on pivots; Bland's rule terminates long before this on sane input.
const MAX_PIVOTS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplexError {
    #[error("dimension mismatch: {0}")]
    Dimension(String),
    #[error("non-finite coefficient in the problem")]
    NonFinite,
    #[error("right-hand side of row {row} is negative ({value}); origin is infeasible")]
    NegativeRhs { row: usize, value: f64 },
    #[error("objective is unbounded along column {column}")]
    Unbounded { column: usize },
    #[error("pivot limit of {0} reached")]
    PivotLimit(usize),
}

/// `max cᵀx s.t. A x ≤ b, x ≥ 0` with `b ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    objective: DVector<f64>,
    constraints: DMatrix<f64>,
    rhs: DVector<f64>,
}

/// Optimal vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// One value per structural column of `A`.
    pub values: Vec<f64>,
    pub objective: f64,
    pub pivots: usize,
}

impl LinearProgram {
    pub fn new(
        objective: DVector<f64>,
        constraints: DMatrix<f64>,
        rhs: DVector<f64>,
    ) -> Result<Self, SimplexError> {
        if constraints.ncols() != objective.len() {
            return Err(SimplexError::Dimension(format!(
                "{} objective coefficients for {} columns",
                objective.len(),
                constraints.ncols()
            )));
        }
        if constraints.nrows() != rhs.len() {
            return Err(SimplexError::Dimension(format!(
                "{} right-hand sides for {} rows",
                rhs.len(),
                constraints.nrows()
            )));
        }
        let all_finite = objective.iter().chain(constraints.iter()).chain(rhs.iter()).all(|v| v.is_finite());
        if !all_finite {
            return Err(SimplexError::NonFinite);
        }
        if let Some((row, &value)) = rhs.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(SimplexError::NegativeRhs { row, value });
        }
        Ok(Self {
            objective,
            constraints,
            rhs,
        })
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }

    /// Objective value at `x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Whether `x` satisfies every constraint within `tol`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        if x.len() != self.num_vars() || x.iter().any(|v| *v < -tol) {
            return false;
        }
        let x = DVector::from_row_slice(x);
        let lhs = &self.constraints * x;
        lhs.iter().zip(self.rhs.iter()).all(|(l, b)| *l <= b + tol)
    }

    /// Solve to optimality.
    pub fn maximize(&self) -> Result<LpSolution, SimplexError> {
        let m = self.num_constraints();
        let n = self.num_vars();
        let width = n + m + 1;
        let rhs_col = n + m;

        // Rows 0..m: [A | I | b]; row m: [-c | 0 | z].
        let mut t = DMatrix::<f64>::zeros(m + 1, width);
        t.view_mut((0, 0), (m, n)).copy_from(&self.constraints);
        for i in 0..m {
            t[(i, n + i)] = 1.0;
            t[(i, rhs_col)] = self.rhs[i];
        }
        for j in 0..n {
            t[(m, j)] = -self.objective[j];
        }

        let mut basis: Vec<usize> = (n..n + m).collect();
        let mut pivots = 0;

        loop {
            // Bland: lowest-index column with a negative reduced cost.
            let Some(enter) = (0..n + m).find(|&j| t[(m, j)] < -EPS) else {
                break;
            };

            // Min-ratio test; ties go to the lowest basic variable index.
            let mut leave: Option<(usize, f64)> = None;
            for i in 0..m {
                let a = t[(i, enter)];
                if a <= EPS {
                    continue;
                }
                let ratio = t[(i, rhs_col)] / a;
                leave = match leave {
                    None => Some((i, ratio)),
                    Some((r, best)) if ratio < best - EPS || (ratio <= best + EPS && basis[i] < basis[r]) => {
                        Some((i, ratio))
                    }
                    keep => keep,
                };
            }
            let Some((row, _)) = leave else {
                return Err(SimplexError::Unbounded { column: enter });
            };

            pivot(&mut t, row, enter);
            basis[row] = enter;
            pivots += 1;
            if pivots >= MAX_PIVOTS {
                return Err(SimplexError::PivotLimit(MAX_PIVOTS));
            }
        }

        let mut values = vec![0.0; n];
        for (i, &var) in basis.iter().enumerate() {
            if var < n {
                values[var] = snap_to_zero(t[(i, rhs_col)]);
            }
        }

        Ok(LpSolution {
            objective: self.evaluate(&values),
            values,
            pivots,
        })
    }
}

fn pivot(t: &mut DMatrix<f64>, row: usize, col: usize) {
    let p = t[(row, col)];
    t.row_mut(row).scale_mut(1.0 / p);
    for i in 0..t.nrows() {
        let factor = t[(i, col)];
        if i == row || factor == 0.0 {
            continue;
        }
        for j in 0..t.ncols() {
            let delta = factor * t[(row, j)];
            t[(i, j)] -= delta;
        }
    }
}

/// Round-off below `EPS` in magnitude is reported as exactly 0.
fn snap_to_zero(v: f64) -> f64 {
    if v.abs() < EPS { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lp(c: &[f64], a: &[f64], b: &[f64]) -> LinearProgram {
        let a = DMatrix::from_row_slice(b.len(), c.len(), a);
        LinearProgram::new(DVector::from_row_slice(c), a, DVector::from_row_slice(b)).unwrap()
    }

    #[test]
    fn solves_textbook_problem() {
        // max 3x + 5y s.t. x ≤ 4, 2y ≤ 12, 3x + 2y ≤ 18  →  x=2, y=6, z=36
        let p = lp(&[3.0, 5.0], &[1.0, 0.0, 0.0, 2.0, 3.0, 2.0], &[4.0, 12.0, 18.0]);
        let s = p.maximize().unwrap();
        assert!((s.values[0] - 2.0).abs() < 1e-9);
        assert!((s.values[1] - 6.0).abs() < 1e-9);
        assert!((s.objective - 36.0).abs() < 1e-9);
        assert!(p.is_feasible(&s.values, 1e-9));
    }

    #[test]
    fn non_positive_objective_stays_at_origin() {
        let p = lp(&[-1.0, 0.0], &[1.0, 1.0], &[10.0]);
        let s = p.maximize().unwrap();
        assert_eq!(s.values, vec![0.0, 0.0]);
        assert_eq!(s.objective, 0.0);
        assert_eq!(s.pivots, 0);
    }

    #[test]
    fn detects_unbounded_problem() {
        // x - y ≤ 1 does not cap y.
        let p = lp(&[0.0, 1.0], &[1.0, -1.0], &[1.0]);
        assert!(matches!(p.maximize(), Err(SimplexError::Unbounded { column: 1 })));
    }

    #[test]
    fn degenerate_problem_terminates() {
        // Classic degenerate vertex at the origin.
        let p = lp(
            &[10.0, -57.0, -9.0, -24.0],
            &[
                0.5, -5.5, -2.5, 9.0, //
                0.5, -1.5, -0.5, 1.0, //
                1.0, 0.0, 0.0, 0.0,
            ],
            &[0.0, 0.0, 1.0],
        );
        let s = p.maximize().unwrap();
        assert!((s.objective - 1.0).abs() < 1e-9);
        assert!(p.is_feasible(&s.values, 1e-9));
    }

    #[test]
    fn rejects_bad_input() {
        let err = LinearProgram::new(
            DVector::from_row_slice(&[1.0]),
            DMatrix::from_row_slice(1, 1, &[1.0]),
            DVector::from_row_slice(&[-1.0]),
        )
        .unwrap_err();
        assert!(matches!(err, SimplexError::NegativeRhs { row: 0, .. }));

        let err = LinearProgram::new(
            DVector::from_row_slice(&[1.0, 2.0]),
            DMatrix::from_row_slice(1, 1, &[1.0]),
            DVector::from_row_slice(&[1.0]),
        )
        .unwrap_err();
        assert!(matches!(err, SimplexError::Dimension(_)));

        let err = LinearProgram::new(
            DVector::from_row_slice(&[f64::NAN]),
            DMatrix::from_row_slice(1, 1, &[1.0]),
            DVector::from_row_slice(&[1.0]),
        )
        .unwrap_err();
        assert_eq!(err, SimplexError::NonFinite);
    }
}
