//! ht-streams: the stream state-resolution engine.
//!
//! A [`Stream`] holds one fluid's thermodynamic state: temperature,
//! pressure, vapor quality, and mass flow. Only two of {T, P, x} are
//! independent for a pure fluid, so every setter is a transition of a
//! small tagged state machine: values are `Unset`, `Fixed` (written by
//! the caller), or `Derived` (computed from the others through the
//! property oracle). Conflicting writes against independently fixed
//! values fail with [`StreamError::OverDetermined`] before any
//! mutation; derived values are simply re-derived.
//!
//! Mass flow lives in a [`SharedFlow`] cell so that `flow_to` links
//! downstream streams by aliasing, not by copy: a flow-rate write on
//! either end is visible on both.

pub mod error;
pub mod flow;
pub mod stream;

pub use error::{StreamError, StreamResult};
pub use flow::SharedFlow;
pub use stream::{DependencyMode, Stream};
