//! Ambient conditions.

use ht_core::units::{HeatFluxDensity, Pressure, Temperature, Velocity};
use ht_fluids::Fluid;

/// Passive snapshot of the environment a collector sits in.
#[derive(Debug, Clone, Copy)]
pub struct Ambient {
    /// Solar direct normal irradiance, W/m²
    pub irradiance: f64,
    /// Ambient temperature, K
    pub temperature: f64,
    /// Ambient pressure, Pa
    pub pressure: f64,
    /// Wind speed, m/s
    pub wind_speed: f64,
    /// Ambient fluid for loss-side property lookups
    pub fluid: Fluid,
}

impl Ambient {
    /// Typed construction; quantities are stored as SI `f64`.
    pub fn new(
        irradiance: HeatFluxDensity,
        temperature: Temperature,
        pressure: Pressure,
        wind_speed: Velocity,
        fluid: Fluid,
    ) -> Self {
        Self {
            irradiance: irradiance.value,
            temperature: temperature.value,
            pressure: pressure.value,
            wind_speed: wind_speed.value,
            fluid,
        }
    }
}

impl Default for Ambient {
    fn default() -> Self {
        Self {
            irradiance: 700.0,
            temperature: 288.15,
            pressure: 101_325.0,
            wind_speed: 4.0,
            fluid: Fluid::Air,
        }
    }
}
