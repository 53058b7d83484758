//! ht-core: stable foundation for heliotherm.
//!
//! Contains:
//! - units (uom SI types + constructors + temperature unit conversion)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HtError, HtResult};
pub use numeric::*;
pub use units::*;
