//! Error types for solver operations.

use ht_fluids::FluidError;
use ht_streams::StreamError;
use thiserror::Error;

/// Errors that can occur while driving residuals to zero.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),
}

pub type SolverResult<T> = Result<T, SolverError>;
