//! The residual seam between component models and the Newton solver.

use nalgebra::DVector;
use tracing::debug;

use ht_solver::{newton_solve, NewtonConfig, NewtonResult, SolverError};

use crate::error::{ComponentError, ComponentResult};

/// A component whose unknowns are found by driving physical residuals
/// to zero.
///
/// `residuals` applies the candidate point `x` to the model (writing
/// stream temperatures, flow rates, geometry) and evaluates the
/// balance equations at that state. Because evaluation mutates the
/// model, at most one residual evaluation per model may be in flight.
pub trait EnergyBalanceModel {
    /// Number of unknowns (and residuals).
    fn dim(&self) -> usize;

    /// Physically informed starting point.
    fn initial_guess(&self) -> DVector<f64>;

    /// Lower bounds handed to the solver's line search.
    fn lower_bounds(&self) -> Vec<(usize, f64)> {
        Vec::new()
    }

    /// Apply `x` to the model and evaluate the residual vector.
    fn residuals(&mut self, x: &DVector<f64>) -> ComponentResult<DVector<f64>>;
}

/// Drive a model's residuals to zero and leave the model at the root.
pub fn solve_energy_balance<M: EnergyBalanceModel>(
    model: &mut M,
    config: &NewtonConfig,
) -> ComponentResult<NewtonResult> {
    let x0 = model.initial_guess();
    debug!(dim = model.dim(), "solving energy balance");
    let solve_config = NewtonConfig {
        max_iterations: config.max_iterations,
        abs_tol: config.abs_tol,
        rel_tol: config.rel_tol,
        fd_epsilon: config.fd_epsilon,
        line_search_beta: config.line_search_beta,
        max_line_search_iters: config.max_line_search_iters,
        lower_bounds: model.lower_bounds(),
    };
    // Stream and fluid failures keep their type through the solver;
    // everything else cancels the evaluation as a numeric error.
    let result = newton_solve(
        x0,
        |x| {
            model.residuals(x).map_err(|e| match e {
                ComponentError::Stream(err) => SolverError::Stream(err),
                ComponentError::Fluid(err) => SolverError::Fluid(err),
                other => SolverError::Numeric {
                    what: other.to_string(),
                },
            })
        },
        &solve_config,
    )?;
    // leave the model state at the converged point
    model.residuals(&result.x)?;
    debug!(
        iterations = result.iterations,
        residual_norm = result.residual_norm,
        "energy balance converged"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ht_fluids::FluidError;
    use ht_streams::StreamError;

    struct LookupFails;

    impl EnergyBalanceModel for LookupFails {
        fn dim(&self) -> usize {
            1
        }

        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_element(1, 1.0)
        }

        fn residuals(&mut self, _x: &DVector<f64>) -> ComponentResult<DVector<f64>> {
            Err(ComponentError::Fluid(FluidError::PropertyLookup {
                context: "inputs outside the equation of state".into(),
            }))
        }
    }

    struct StateUnresolved;

    impl EnergyBalanceModel for StateUnresolved {
        fn dim(&self) -> usize {
            1
        }

        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_element(1, 1.0)
        }

        fn residuals(&mut self, _x: &DVector<f64>) -> ComponentResult<DVector<f64>> {
            Err(ComponentError::Stream(StreamError::Unresolved {
                what: "pressure not set",
            }))
        }
    }

    #[test]
    fn property_lookup_failures_keep_their_type_through_the_solver() {
        let mut model = LookupFails;
        let err = solve_energy_balance(&mut model, &NewtonConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ComponentError::Solver(SolverError::Fluid(FluidError::PropertyLookup { .. }))
        ));
    }

    #[test]
    fn stream_failures_keep_their_type_through_the_solver() {
        let mut model = StateUnresolved;
        let err = solve_energy_balance(&mut model, &NewtonConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ComponentError::Solver(SolverError::Stream(StreamError::Unresolved { .. }))
        ));
    }
}
