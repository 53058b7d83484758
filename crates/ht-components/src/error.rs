//! Error types for component calculations.

use ht_fluids::FluidError;
use ht_solver::SolverError;
use ht_streams::StreamError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    /// A model precondition does not hold for the given configuration
    /// (degenerate geometry, correlation out of range, ...).
    #[error("Precondition violated: {what}")]
    Precondition { what: &'static str },

    /// The operating envelope admits no solution (e.g. no row count
    /// brings the oil speed into its window).
    #[error("No physical solution: {what}")]
    NoPhysicalSolution { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;
