//! Parabolic trough collector with a vacuum absorber tube.
//!
//! Performance is closed-form: a temperature-banded loss coefficient,
//! an incidence-angle modifier, and the absorber length needed per
//! unit mass flow. The one discrete unknown is the number of
//! collectors in a row, sized so the oil speed in the absorber lands
//! inside its allowed window.

use std::f64::consts::PI;
use std::rc::Rc;

use tracing::debug;

use ht_core::units::{Area, Length};
use ht_fluids::{Fluid, PropKey, PropertyOracle};
use ht_streams::{DependencyMode, Stream};

use crate::ambient::Ambient;
use crate::error::{ComponentError, ComponentResult};

/// Trough geometry and optics.
#[derive(Debug, Clone, Copy)]
pub struct TroughConfig {
    /// Aperture area of one collector, m²
    pub aperture_area: f64,
    /// Aperture width, m
    pub width: f64,
    /// Minimum allowed oil speed in the absorber, m/s
    pub v_min: f64,
    /// Maximum allowed oil speed in the absorber, m/s
    pub v_max: f64,
    /// Mirror reflectance
    pub reflectance: f64,
    /// Shading factor
    pub shading: f64,
    /// Glass envelope transmissivity
    pub transmissivity: f64,
    /// Selective-coating absorptance
    pub absorptance: f64,
    /// Soiling factor
    pub soiling: f64,
    /// Intercept factor
    pub intercept_factor: f64,
    /// Absorber inner diameter, m
    pub absorber_inner_diameter: f64,
    /// Absorber outer diameter, m
    pub absorber_outer_diameter: f64,
    /// Incidence angle, rad
    pub incidence_angle: f64,
}

impl TroughConfig {
    /// Typed sizing over the default optics and speed window;
    /// quantities are stored as SI `f64`.
    pub fn sized(
        aperture_area: Area,
        width: Length,
        absorber_inner_diameter: Length,
        absorber_outer_diameter: Length,
    ) -> Self {
        Self {
            aperture_area: aperture_area.value,
            width: width.value,
            absorber_inner_diameter: absorber_inner_diameter.value,
            absorber_outer_diameter: absorber_outer_diameter.value,
            ..Self::default()
        }
    }
}

impl Default for TroughConfig {
    fn default() -> Self {
        Self {
            aperture_area: 545.0,
            width: 5.76,
            v_min: 1.1,
            v_max: 2.9,
            reflectance: 0.94,
            shading: 1.0,
            transmissivity: 0.95,
            absorptance: 0.96,
            soiling: 0.97,
            intercept_factor: 0.93,
            absorber_inner_diameter: 0.066,
            absorber_outer_diameter: 0.07,
            incidence_angle: 70.0_f64.to_radians(),
        }
    }
}

/// Trough collector row carrying heat-transfer oil.
pub struct TroughCollector {
    pub config: TroughConfig,
    pub ambient: Ambient,
    pub inlet: Stream,
    pub outlet: Stream,
    /// Collectors per row, set by [`TroughCollector::size_rows`].
    pub rows: usize,
    /// Actual oil speed after sizing, m/s.
    pub oil_speed: f64,
}

impl TroughCollector {
    /// Default trough with fresh oil streams on `oracle`.
    pub fn new(oracle: Rc<dyn PropertyOracle>) -> Self {
        Self {
            config: TroughConfig::default(),
            ambient: Ambient::default(),
            inlet: Stream::new(
                Rc::clone(&oracle),
                Fluid::Tvp1,
                DependencyMode::PressureDependent,
            ),
            outlet: Stream::new(oracle, Fluid::Tvp1, DependencyMode::PressureDependent),
            rows: 0,
            oil_speed: 0.0,
        }
    }

    fn mean_temperature(&self) -> ComponentResult<f64> {
        Ok((self.inlet.temperature()? + self.outlet.temperature()?) / 2.0)
    }

    fn mean_pressure(&self) -> ComponentResult<f64> {
        Ok((self.inlet.pressure()? + self.outlet.pressure()?) / 2.0)
    }

    /// Overall absorber loss coefficient, W/(m² K), banded on the mean
    /// oil temperature.
    pub fn u_loss(&self) -> ComponentResult<f64> {
        let t = self.mean_temperature()?;
        let dt = t - self.ambient.temperature;
        Ok(if t < 473.15 {
            0.687_257 + 0.001_941 * dt + 0.000_026 * dt * dt
        } else if t > 573.15 {
            2.895_474 - 0.0164 * dt + 0.000_065 * dt * dt
        } else {
            1.433_242 - 0.005_66 * dt + 0.000_046 * dt * dt
        })
    }

    /// Incidence-angle modifier (quartic in the incidence angle).
    pub fn incidence_modifier(&self) -> f64 {
        let phi = self.config.incidence_angle;
        1.0 - 2.230_73e-4 * phi - 1.1e-4 * phi.powi(2) + 3.185_96e-6 * phi.powi(3)
            - 4.855_09e-8 * phi.powi(4)
    }

    fn optical_efficiency(&self) -> f64 {
        let c = &self.config;
        c.reflectance * c.intercept_factor * c.transmissivity * c.absorptance
    }

    /// Absorber length required per unit mass flow to lift the oil
    /// from inlet to outlet temperature, m/(kg/s).
    pub fn length_per_unit_flow(&self) -> ComponentResult<f64> {
        let c = &self.config;
        let perimeter = PI * c.absorber_outer_diameter;
        let q = self.ambient.irradiance * c.width * self.optical_efficiency()
            * self.incidence_modifier()
            * c.soiling
            / perimeter;
        let u = self.u_loss()?;

        let cp = self.inlet.oracle().query(
            PropKey::SpecificHeatCp,
            (PropKey::Temperature, self.mean_temperature()?),
            (PropKey::Pressure, self.mean_pressure()?),
            self.inlet.fluid(),
        )?;

        let stagnation = self.ambient.temperature + q / u;
        let dt_o = self.outlet.temperature()? - stagnation;
        let dt_i = self.inlet.temperature()? - stagnation;
        if dt_o / dt_i <= 0.0 {
            return Err(ComponentError::NoPhysicalSolution {
                what: "outlet temperature unreachable: absorber stagnates first".to_string(),
            });
        }
        Ok(-cp * (dt_o / dt_i).ln() / (u * perimeter))
    }

    /// Solar power incident on one collector, W.
    pub fn q_total_incident(&self) -> f64 {
        self.ambient.irradiance * self.config.aperture_area
    }

    /// Collector efficiency.
    pub fn efficiency(&self) -> ComponentResult<f64> {
        let dh = self.outlet.enthalpy()? - self.inlet.enthalpy()?;
        Ok(dh / (self.ambient.irradiance * self.config.width * self.length_per_unit_flow()?))
    }

    /// Useful power of one collector, W.
    pub fn q_use(&self) -> ComponentResult<f64> {
        Ok(self.q_total_incident() * self.efficiency()?)
    }

    /// Oil speed produced by a single collector's worth of flow, m/s.
    pub fn basic_speed(&self) -> ComponentResult<f64> {
        let rho = self.inlet.oracle().query(
            PropKey::Density,
            (PropKey::Temperature, self.mean_temperature()?),
            (PropKey::Pressure, self.mean_pressure()?),
            self.inlet.fluid(),
        )?;
        let dh = self.outlet.enthalpy()? - self.inlet.enthalpy()?;
        if dh <= 0.0 {
            return Err(ComponentError::Precondition {
                what: "outlet enthalpy must exceed inlet enthalpy",
            });
        }
        let flow_per_collector = self.q_use()? / dh;
        let d_i = self.config.absorber_inner_diameter;
        let v = 4.0 * flow_per_collector / (rho * PI * d_i * d_i);
        if v <= 0.0 {
            return Err(ComponentError::Precondition {
                what: "degenerate basic oil speed",
            });
        }
        Ok(v)
    }

    /// Find the smallest row count whose oil speed reaches `v_min`;
    /// fail when that speed overshoots `v_max`. On success the row
    /// count, speed, and both stream flow rates are set.
    pub fn size_rows(&mut self) -> ComponentResult<usize> {
        // Row counts past this bound mean the basic speed is degenerate
        // relative to the window, not that more collectors would help.
        const MAX_ROWS: usize = 10_000;

        let v_s = self.basic_speed()?;
        let mut n = 0usize;
        let mut v = 0.0;
        while v < self.config.v_min {
            n += 1;
            if n > MAX_ROWS {
                return Err(ComponentError::NoPhysicalSolution {
                    what: format!(
                        "row count exceeds {MAX_ROWS} before the oil speed reaches {} (step {v_s:.3e} m/s)",
                        self.config.v_min
                    ),
                });
            }
            v = n as f64 * v_s;
        }
        if v > self.config.v_max {
            return Err(ComponentError::NoPhysicalSolution {
                what: format!(
                    "no row count gives an oil speed inside [{}, {}] (step {v_s:.3} m/s)",
                    self.config.v_min, self.config.v_max
                ),
            });
        }
        debug!(rows = n, oil_speed = v, "trough row sizing");
        self.rows = n;
        self.oil_speed = v;

        let dh = self.outlet.enthalpy()? - self.inlet.enthalpy()?;
        let flow = n as f64 * self.q_use()? / dh;
        self.inlet.flow_to(&mut self.outlet);
        self.inlet.set_flow_rate(flow)?;
        Ok(n)
    }
}
