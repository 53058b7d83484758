//! Fluid property errors.

use ht_core::HtError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative pressure, NaN inputs, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Query shape the backend cannot answer (unsupported input pair, etc.).
    #[error("Not supported: {what}")]
    Unsupported { what: &'static str },

    /// The two inputs do not bound a physically valid state for the fluid.
    /// Propagated unchanged from the property database.
    #[error("Property lookup failed: {context}")]
    PropertyLookup { context: String },
}

impl From<rfluids::native::CoolPropError> for FluidError {
    fn from(e: rfluids::native::CoolPropError) -> Self {
        FluidError::PropertyLookup {
            context: e.to_string(),
        }
    }
}

impl From<FluidError> for HtError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => HtError::Invariant { what },
            FluidError::InvalidArg { what } => HtError::InvalidArg { what },
            FluidError::Unsupported { what } => HtError::InvalidArg { what },
            FluidError::PropertyLookup { .. } => HtError::InvalidArg {
                what: "property lookup",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = FluidError::PropertyLookup {
            context: "CoolProp failed".into(),
        };
        assert!(err.to_string().contains("CoolProp"));
    }

    #[test]
    fn error_to_ht_error() {
        let fluid_err = FluidError::Unsupported { what: "pair" };
        let ht_err: HtError = fluid_err.into();
        assert!(matches!(ht_err, HtError::InvalidArg { .. }));
    }
}
