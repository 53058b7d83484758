//! Newton solver with line search and lower-bound constraints.

use nalgebra::DVector;
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};
use crate::jacobian::finite_difference_jacobian;

/// Newton solver configuration.
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Relative step for the finite-difference Jacobian
    pub fd_epsilon: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Per-variable lower bounds `(index, bound)`; candidate points
    /// violating any of them are rejected during the line search.
    /// Keeps physically-positive unknowns (temperatures, flow rates,
    /// areas) out of regions where the residuals are undefined.
    pub lower_bounds: Vec<(usize, f64)>,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            fd_epsilon: 1e-7,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            lower_bounds: Vec::new(),
        }
    }
}

/// Newton iteration result.
#[derive(Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

fn within_bounds(x: &DVector<f64>, bounds: &[(usize, f64)]) -> bool {
    bounds.iter().all(|&(i, b)| x[i] >= b)
}

/// Damped Newton iteration on `residual_fn`, starting from `x0`.
///
/// The residual closure may mutate captured state on every call; the
/// Jacobian is recomputed internally by forward differences each
/// iteration. A backtracking line search requires both a residual-norm
/// reduction and satisfaction of `config.lower_bounds`; candidates
/// outside the bounds are never evaluated.
///
/// Fails with [`SolverError::ConvergenceFailed`] when the iteration
/// budget runs out or the line search stagnates. No partially
/// converged result is ever returned.
pub fn newton_solve<F>(
    x0: DVector<f64>,
    mut residual_fn: F,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: FnMut(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    if !within_bounds(&x0, &config.lower_bounds) {
        return Err(SolverError::ProblemSetup {
            what: "initial guess violates a lower bound".to_string(),
        });
    }

    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        debug!(iteration = iter, residual_norm = r_norm, "newton step");
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = finite_difference_jacobian(&x, &r, &mut residual_fn, config.fd_epsilon)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: "Jacobian solve failed".to_string(),
            })?;

        // Shrink the step until the candidate is inside the bounds.
        // x itself satisfies them, so small enough alpha always does.
        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        while !within_bounds(&x_new, &config.lower_bounds) {
            alpha *= config.line_search_beta;
            if alpha < 1e-10 {
                warn!(iteration = iter, "line search pinned at a lower bound");
                return Err(SolverError::ConvergenceFailed {
                    what: format!("line search pinned at a lower bound at iteration {iter}"),
                });
            }
            x_new = &x + alpha * &dx;
        }

        // Backtrack until the residual norm drops
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();
        for _ in 0..config.max_line_search_iters {
            if r_new_norm < r_norm {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
        }

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if alpha < 1e-10 {
            warn!(iteration = iter, "line search stagnated");
            return Err(SolverError::ConvergenceFailed {
                what: format!("line search stagnated at iteration {iter}"),
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}
