// ht-core/src/units.rs

use std::str::FromStr;

use crate::error::HtError;

use uom::si::f64::{
    Area as UomArea, HeatFluxDensity as UomHeatFluxDensity, Length as UomLength,
    MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type HeatFluxDensity = UomHeatFluxDensity;
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn wpm2(v: f64) -> HeatFluxDensity {
    use uom::si::heat_flux_density::watt_per_square_meter;
    HeatFluxDensity::new::<watt_per_square_meter>(v)
}

pub mod constants {
    /// Stefan–Boltzmann constant, W/(m² K⁴)
    pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

    /// Standard gravity, m/s²
    pub const G0_MPS2: f64 = 9.807;

    /// Universal gas constant, J/(mol K)
    pub const R_UNIVERSAL: f64 = 8.314;
}

/// Temperature scale token accepted by [`convert_temperature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
    Rankine,
}

impl TempUnit {
    /// Slope of the affine map from this scale to Kelvin.
    fn slope(self) -> f64 {
        match self {
            TempUnit::Kelvin | TempUnit::Celsius => 1.0,
            TempUnit::Fahrenheit | TempUnit::Rankine => 5.0 / 9.0,
        }
    }

    /// Reading of absolute zero on this scale.
    fn bias(self) -> f64 {
        match self {
            TempUnit::Kelvin | TempUnit::Rankine => 0.0,
            TempUnit::Celsius => -273.15,
            TempUnit::Fahrenheit => -273.15 * 9.0 / 5.0 + 32.0,
        }
    }
}

impl FromStr for TempUnit {
    type Err = HtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "K" => Ok(TempUnit::Kelvin),
            "C" => Ok(TempUnit::Celsius),
            "F" => Ok(TempUnit::Fahrenheit),
            "R" => Ok(TempUnit::Rankine),
            other => Err(HtError::UnknownUnit {
                token: other.to_string(),
            }),
        }
    }
}

/// Convert a temperature reading between scales via one affine transform
/// per unit.
pub fn convert_temperature(value: f64, from: TempUnit, to: TempUnit) -> f64 {
    (value - from.bias()) * from.slope() / to.slope() + to.bias()
}

/// Token-based variant of [`convert_temperature`]; rejects unrecognized
/// unit tokens.
pub fn convert_temperature_str(value: f64, from: &str, to: &str) -> Result<f64, HtError> {
    Ok(convert_temperature(value, from.parse()?, to.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constructors_carry_si_values() {
        assert_eq!(pa(101_325.0).value, 101_325.0);
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(kgps(1.2).value, 1.2);
        assert_eq!(m(2.0).value, 2.0);
        assert_eq!(watts(700.0).value, 700.0);
        assert_eq!(m2(23.28).value, 23.28);
        assert_eq!(mps(4.0).value, 4.0);
        assert_eq!(wpm2(700.0).value, 700.0);
    }

    #[test]
    fn celsius_to_kelvin() {
        assert!((convert_temperature(150.0, TempUnit::Celsius, TempUnit::Kelvin) - 423.15).abs() < 1e-9);
    }

    #[test]
    fn fahrenheit_freezing_point() {
        let t = convert_temperature(32.0, TempUnit::Fahrenheit, TempUnit::Celsius);
        assert!(t.abs() < 1e-9);
    }

    #[test]
    fn rankine_is_scaled_kelvin() {
        let t = convert_temperature(300.0, TempUnit::Kelvin, TempUnit::Rankine);
        assert!((t - 540.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_unit_token_rejected() {
        let err = convert_temperature_str(300.0, "K", "X").unwrap_err();
        assert!(matches!(err, HtError::UnknownUnit { .. }));
    }

    proptest! {
        #[test]
        fn conversion_round_trips(v in -200.0_f64..2000.0, a in 0_usize..4, b in 0_usize..4) {
            let units = [TempUnit::Kelvin, TempUnit::Celsius, TempUnit::Fahrenheit, TempUnit::Rankine];
            let there = convert_temperature(v, units[a], units[b]);
            let back = convert_temperature(there, units[b], units[a]);
            prop_assert!((back - v).abs() < 1e-9);
        }
    }
}
