//! ht-fluids: fluid property access for heliotherm.
//!
//! Provides:
//! - A closed catalog of working fluids used by the plant models
//! - The `PropertyOracle` trait: two independent properties in, one out
//! - A CoolProp backend (via `rfluids`) implementing the oracle
//!
//! # Architecture
//!
//! The `PropertyOracle` trait isolates the rest of heliotherm from the
//! property database. The oracle is a black box: it either answers the
//! query or fails with `FluidError::PropertyLookup`, and callers never
//! recover from a lookup failure by substituting defaults.
//!
//! # Example
//!
//! ```no_run
//! use ht_fluids::{CoolPropOracle, Fluid, PropKey, PropertyOracle};
//!
//! let oracle = CoolPropOracle::new();
//! // Boiling point of water at one atmosphere
//! let t_sat = oracle
//!     .query(
//!         PropKey::Temperature,
//!         (PropKey::Pressure, 101_325.0),
//!         (PropKey::Quality, 0.0),
//!         Fluid::Water,
//!     )
//!     .unwrap();
//! assert!((t_sat - 373.12).abs() < 0.5);
//! ```

pub mod coolprop;
pub mod error;
pub mod fluid;
pub mod oracle;

// Re-exports for ergonomics
pub use coolprop::CoolPropOracle;
pub use error::{FluidError, FluidResult};
pub use fluid::Fluid;
pub use oracle::{PropKey, PropertyOracle};
