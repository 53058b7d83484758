//! The property oracle abstraction.

use crate::error::FluidResult;
use crate::fluid::Fluid;

/// Thermodynamic properties the oracle can take or return.
///
/// All values are SI: pressure in Pa, temperature in K, specific
/// quantities per kilogram, quality as a mass fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKey {
    /// Absolute pressure, Pa
    Pressure,
    /// Temperature, K
    Temperature,
    /// Vapor quality (mass fraction), dimensionless
    Quality,
    /// Specific enthalpy, J/kg
    Enthalpy,
    /// Specific entropy, J/(kg K)
    Entropy,
    /// Specific internal energy, J/kg
    InternalEnergy,
    /// Mass density, kg/m³
    Density,
    /// Specific heat at constant pressure, J/(kg K)
    SpecificHeatCp,
    /// Specific heat at constant volume, J/(kg K)
    SpecificHeatCv,
    /// Dynamic viscosity, Pa s
    Viscosity,
    /// Thermal conductivity, W/(m K)
    Conductivity,
    /// Isobaric expansion coefficient, 1/K
    ExpansionCoefficient,
}

impl PropKey {
    /// Short SI-flavored label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            PropKey::Pressure => "P",
            PropKey::Temperature => "T",
            PropKey::Quality => "Q",
            PropKey::Enthalpy => "H",
            PropKey::Entropy => "S",
            PropKey::InternalEnergy => "U",
            PropKey::Density => "D",
            PropKey::SpecificHeatCp => "Cp",
            PropKey::SpecificHeatCv => "Cv",
            PropKey::Viscosity => "mu",
            PropKey::Conductivity => "lambda",
            PropKey::ExpansionCoefficient => "beta",
        }
    }
}

/// Answers single-property queries from two independent state inputs.
///
/// Implementations take the query as given: the pair of inputs either
/// pins down a state or the query fails. No input pair ordering is
/// required of callers; implementations canonicalize internally.
pub trait PropertyOracle {
    /// Return property `want` of `fluid` at the state fixed by the two
    /// input pairs.
    fn query(
        &self,
        want: PropKey,
        in1: (PropKey, f64),
        in2: (PropKey, f64),
        fluid: Fluid,
    ) -> FluidResult<f64>;

    /// Critical pressure of `fluid`, Pa.
    fn critical_pressure(&self, fluid: Fluid) -> FluidResult<f64>;
}
