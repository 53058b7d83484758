//! CoolProp-backed property oracle.
//!
//! Thin shim over `rfluids::native::AbstractState`: canonicalize the
//! input pair, run one update, read one output. CoolProp rejections
//! surface as `FluidError::PropertyLookup` with the library's message
//! intact.

use rfluids::io::{FluidInputPair, FluidParam, FluidTrivialParam};
use rfluids::native::AbstractState;

use crate::error::{FluidError, FluidResult};
use crate::fluid::Fluid;
use crate::oracle::{PropKey, PropertyOracle};

/// Property oracle backed by the CoolProp low-level interface.
///
/// Stateless; a fresh `AbstractState` is built per query. CoolProp
/// state objects are cheap relative to the solves that sit above them,
/// and per-query construction keeps the oracle `&self` and free of
/// interior mutability.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoolPropOracle;

impl CoolPropOracle {
    pub fn new() -> Self {
        Self
    }
}

/// Input pair accepted in the given order, if CoolProp has a matching
/// update key.
fn directional_pair(a: PropKey, b: PropKey) -> Option<FluidInputPair> {
    use PropKey::*;
    match (a, b) {
        (Pressure, Temperature) => Some(FluidInputPair::PT),
        (Pressure, Quality) => Some(FluidInputPair::PQ),
        (Quality, Temperature) => Some(FluidInputPair::QT),
        (Enthalpy, Pressure) => Some(FluidInputPair::HMassP),
        (Pressure, Entropy) => Some(FluidInputPair::PSMass),
        (Density, Temperature) => Some(FluidInputPair::DMassT),
        _ => None,
    }
}

/// Canonicalize an unordered input pair into CoolProp's expected
/// order, carrying the values along.
fn input_pair(
    in1: (PropKey, f64),
    in2: (PropKey, f64),
) -> FluidResult<(FluidInputPair, f64, f64)> {
    if let Some(pair) = directional_pair(in1.0, in2.0) {
        return Ok((pair, in1.1, in2.1));
    }
    if let Some(pair) = directional_pair(in2.0, in1.0) {
        return Ok((pair, in2.1, in1.1));
    }
    Err(FluidError::Unsupported {
        what: "input property pair",
    })
}

fn output_param(want: PropKey) -> FluidParam {
    match want {
        PropKey::Pressure => FluidParam::P,
        PropKey::Temperature => FluidParam::T,
        PropKey::Quality => FluidParam::Q,
        PropKey::Enthalpy => FluidParam::HMass,
        PropKey::Entropy => FluidParam::SMass,
        PropKey::InternalEnergy => FluidParam::UMass,
        PropKey::Density => FluidParam::DMass,
        PropKey::SpecificHeatCp => FluidParam::CpMass,
        PropKey::SpecificHeatCv => FluidParam::CvMass,
        PropKey::Viscosity => FluidParam::DynamicViscosity,
        PropKey::Conductivity => FluidParam::Conductivity,
        PropKey::ExpansionCoefficient => FluidParam::IsobaricExpansionCoefficient,
    }
}

fn validate_input(key: PropKey, value: f64, fluid: Fluid) -> FluidResult<()> {
    if !value.is_finite() {
        return Err(FluidError::NonPhysical {
            what: "non-finite input property",
        });
    }
    match key {
        PropKey::Pressure if value <= 0.0 => Err(FluidError::NonPhysical {
            what: "pressure must be positive",
        }),
        PropKey::Temperature if value <= 0.0 => Err(FluidError::NonPhysical {
            what: "temperature must be positive",
        }),
        PropKey::Quality if !(0.0..=1.0).contains(&value) => Err(FluidError::NonPhysical {
            what: "quality outside [0, 1]",
        }),
        PropKey::Quality if fluid.is_incompressible() => Err(FluidError::Unsupported {
            what: "quality of incompressible fluid",
        }),
        _ => Ok(()),
    }
}

impl PropertyOracle for CoolPropOracle {
    fn query(
        &self,
        want: PropKey,
        in1: (PropKey, f64),
        in2: (PropKey, f64),
        fluid: Fluid,
    ) -> FluidResult<f64> {
        if in1.0 == in2.0 {
            return Err(FluidError::InvalidArg {
                what: "duplicate input property",
            });
        }
        validate_input(in1.0, in1.1, fluid)?;
        validate_input(in2.0, in2.1, fluid)?;

        let (pair, v1, v2) = input_pair(in1, in2)?;
        let mut state = AbstractState::new(fluid.backend(), fluid.name())?;
        state.update(pair, v1, v2)?;
        Ok(state.keyed_output(output_param(want))?)
    }

    fn critical_pressure(&self, fluid: Fluid) -> FluidResult<f64> {
        if fluid.is_incompressible() {
            return Err(FluidError::Unsupported {
                what: "critical pressure of incompressible fluid",
            });
        }
        let state = AbstractState::new(fluid.backend(), fluid.name())?;
        Ok(state.keyed_output(FluidTrivialParam::PCritical)?)
    }
}
