//! ht-solver: damped Newton root finding for energy-balance systems.
//!
//! Component models expose their physics as residual vectors; this
//! crate drives them to zero. Residual evaluation is allowed to mutate
//! model state (streams are updated in place as candidate points are
//! probed), so the residual closure is `FnMut` and the Jacobian is
//! computed internally by finite differences rather than supplied by
//! the caller.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use newton::{newton_solve, NewtonConfig, NewtonResult};
