//! Stream errors.

use ht_fluids::FluidError;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors raised by stream state transitions and property reads.
///
/// All variants are terminal: the write or read that produced them has
/// not mutated the stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// An assignment violates a physical bound (temperature below 0 K,
    /// negative absolute pressure, quality outside [0, 1], negative
    /// flow rate). Never clamped.
    #[error("Domain violation: {what}")]
    Domain { what: &'static str },

    /// A write conflicts with already-fixed independent variables.
    #[error("Over-determined state: {what}")]
    OverDetermined { what: &'static str },

    /// `mix` called on streams that cannot be mixed.
    #[error("Incompatible streams: {what}")]
    Incompatible { what: &'static str },

    /// A derived property was requested before enough state was set.
    #[error("Unresolved state: {what}")]
    Unresolved { what: &'static str },

    /// Property lookup failure from the fluid backend.
    #[error(transparent)]
    Fluid(#[from] FluidError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluid_error_wraps_transparently() {
        let inner = FluidError::Unsupported { what: "pair" };
        let err: StreamError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
    }
}
