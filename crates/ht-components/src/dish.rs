//! Parabolic dish collector with a coiled-pipe cavity receiver.
//!
//! The receiver is a cavity lined with a helically coiled air pipe
//! behind an insulating shell. Three coupled unknowns (pipe wall
//! temperature, insulation surface temperature, and one of flow rate /
//! outlet temperature / aperture area) are found by zeroing three
//! residuals:
//!
//! 1. the duct duty computed from the air enthalpy rise equals the
//!    duty computed from pipe-side convection,
//! 2. the conduction loss through the shell equals what its outer
//!    surface sheds by convection and radiation,
//! 3. the global balance: everything the reflector delivers is either
//!    reflected away, absorbed by the air, or lost.

use std::f64::consts::{FRAC_PI_4, PI};
use std::rc::Rc;

use nalgebra::DVector;

use ht_core::numeric::log_mean;
use ht_core::units::constants::{G0_MPS2, STEFAN_BOLTZMANN};
use ht_core::units::{Area, Length};
use ht_fluids::{Fluid, PropKey, PropertyOracle};
use ht_solver::NewtonConfig;
use ht_streams::{DependencyMode, Stream};

use crate::ambient::Ambient;
use crate::correlations::{nu_external_cylinder, nu_forced_pipe, nu_natural_convection};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{solve_energy_balance, EnergyBalanceModel};

/// Coiled air pipe lining the cavity.
#[derive(Debug, Clone, Copy)]
pub struct AirPipe {
    /// Inner diameter, m
    pub inner_diameter: f64,
    /// Wall thickness, m
    pub wall_thickness: f64,
    /// Absorptance of the pipe surface
    pub absorptance: f64,
    /// Wall temperature, K. Unknown; written by the solver.
    pub temperature: f64,
}

impl Default for AirPipe {
    fn default() -> Self {
        Self {
            inner_diameter: 0.07,
            wall_thickness: 0.002,
            absorptance: 0.87,
            temperature: 288.15,
        }
    }
}

/// Insulating shell around the cavity.
#[derive(Debug, Clone, Copy)]
pub struct InsulationLayer {
    /// Inner diameter, m
    pub inner_diameter: f64,
    /// Shell thickness, m
    pub thickness: f64,
    /// Thermal conductivity, W/(m K)
    pub conductivity: f64,
    /// Surface emissivity
    pub emissivity: f64,
    /// Outer surface temperature, K. Unknown; written by the solver.
    pub temperature: f64,
}

impl Default for InsulationLayer {
    fn default() -> Self {
        Self {
            inner_diameter: 0.38,
            thickness: 0.11,
            conductivity: 0.06,
            emissivity: 0.6,
            temperature: 288.15,
        }
    }
}

/// Dish and receiver geometry plus optics.
#[derive(Debug, Clone, Copy)]
pub struct DishGeometry {
    /// Intercept factor of the concentrator
    pub intercept_factor: f64,
    /// Mirror reflectance
    pub reflectance: f64,
    /// Shading factor
    pub shading: f64,
    /// Receiver aperture diameter, m
    pub aperture_diameter: f64,
    /// Cavity diameter, m
    pub cavity_diameter: f64,
    /// Cavity depth, m
    pub cavity_depth: f64,
    /// Aperture angle, rad (0 horizontal, pi/2 vertically down)
    pub aperture_angle: f64,
    /// Concentrator aperture area, m²
    pub aperture_area: f64,
}

impl DishGeometry {
    /// Typed sizing over the default optics; quantities are stored as
    /// SI `f64`.
    pub fn sized(
        aperture_area: Area,
        aperture_diameter: Length,
        cavity_diameter: Length,
        cavity_depth: Length,
    ) -> Self {
        Self {
            aperture_area: aperture_area.value,
            aperture_diameter: aperture_diameter.value,
            cavity_diameter: cavity_diameter.value,
            cavity_depth: cavity_depth.value,
            ..Self::default()
        }
    }
}

impl Default for DishGeometry {
    fn default() -> Self {
        Self {
            intercept_factor: 1.0,
            reflectance: 0.8,
            shading: 1.0,
            aperture_diameter: 0.25,
            cavity_diameter: 0.45,
            cavity_depth: 0.38,
            aperture_angle: FRAC_PI_4,
            aperture_area: 23.28,
        }
    }
}

/// Which unknown closes the dish energy balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DishTarget {
    FlowRate,
    OutletTemperature,
    ApertureArea,
}

/// Dish collector with a volumetric cavity receiver.
pub struct DishCollector {
    pub geometry: DishGeometry,
    pub air_pipe: AirPipe,
    pub insulation: InsulationLayer,
    pub ambient: Ambient,
    pub inlet: Stream,
    pub outlet: Stream,
}

impl DishCollector {
    /// Default geometry with fresh air streams on `oracle`.
    pub fn new(oracle: Rc<dyn PropertyOracle>) -> Self {
        Self {
            geometry: DishGeometry::default(),
            air_pipe: AirPipe::default(),
            insulation: InsulationLayer::default(),
            ambient: Ambient::default(),
            inlet: Stream::new(Rc::clone(&oracle), Fluid::Air, DependencyMode::PressureDependent),
            outlet: Stream::new(oracle, Fluid::Air, DependencyMode::PressureDependent),
        }
    }

    fn oracle(&self) -> Rc<dyn PropertyOracle> {
        Rc::clone(self.inlet.oracle())
    }

    /// Effective cavity diameter left inside the coiled pipe, m.
    pub fn d_bar_cav(&self) -> f64 {
        self.geometry.cavity_diameter
            - self.air_pipe.inner_diameter
            - 2.0 * self.air_pipe.wall_thickness
    }

    fn insulation_outer_diameter(&self) -> f64 {
        self.insulation.inner_diameter + 2.0 * self.insulation.thickness
    }

    /// Outer surface area of the insulating shell, m².
    pub fn area_insulation(&self) -> f64 {
        PI * self.insulation_outer_diameter()
            * (self.geometry.cavity_depth + self.insulation.thickness)
    }

    /// Interior cavity surface area, m².
    pub fn area_cavity(&self) -> f64 {
        let d = self.d_bar_cav();
        PI * d * d / 4.0
            + PI * d * self.geometry.cavity_depth
            + PI * (d * d - self.geometry.aperture_diameter * self.geometry.aperture_diameter)
                / 4.0
    }

    fn area_aperture(&self) -> f64 {
        PI * self.geometry.aperture_diameter * self.geometry.aperture_diameter / 4.0
    }

    /// Effective absorptance of the cavity as seen through the
    /// aperture (cavity effect boosts the surface absorptance).
    pub fn effective_absorptance(&self) -> f64 {
        let alpha = self.air_pipe.absorptance;
        alpha / (alpha + (1.0 - alpha) * (self.area_aperture() / self.area_cavity()))
    }

    /// Power delivered into the receiver by the concentrator, W.
    pub fn q_in(&self) -> f64 {
        let g = &self.geometry;
        self.ambient.irradiance
            * g.aperture_area
            * g.intercept_factor
            * g.shading
            * g.reflectance
    }

    /// Duct duty from the air enthalpy rise, W.
    pub fn q_duty_enthalpy(&self) -> ComponentResult<f64> {
        Ok(self.inlet.flow_rate() * (self.outlet.enthalpy()? - self.inlet.enthalpy()?))
    }

    /// Duct duty from pipe-side forced convection, W.
    ///
    /// Bulk properties at the mean of inlet and outlet states, wall
    /// viscosity at the pipe temperature, coil-curvature enhancement
    /// `c_r`, and a log-mean temperature difference between wall and
    /// air.
    pub fn q_duty_pipe(&self) -> ComponentResult<f64> {
        let oracle = self.oracle();
        let fluid = self.inlet.fluid();
        let d_i = self.air_pipe.inner_diameter;

        let t_avg = (self.inlet.temperature()? + self.outlet.temperature()?) / 2.0;
        let p_avg = (self.inlet.pressure()? + self.outlet.pressure()?) / 2.0;
        let at_bulk = |key: PropKey| {
            oracle.query(
                key,
                (PropKey::Temperature, t_avg),
                (PropKey::Pressure, p_avg),
                fluid,
            )
        };

        let rho = at_bulk(PropKey::Density)?;
        let mu = at_bulk(PropKey::Viscosity)?;
        let cp = at_bulk(PropKey::SpecificHeatCp)?;
        let k = at_bulk(PropKey::Conductivity)?;

        let v = 4.0 * self.inlet.flow_rate() / (PI * d_i * d_i * rho);
        let re = rho * v * d_i / mu;
        let pr = cp * mu / k;
        let mu_wall = oracle.query(
            PropKey::Viscosity,
            (PropKey::Temperature, self.air_pipe.temperature),
            (PropKey::Pressure, p_avg),
            fluid,
        )?;

        let nu_straight = nu_forced_pipe(re, pr, mu, mu_wall);
        // coil-curvature enhancement
        let c_r = 1.0 + 3.5 * d_i / self.d_bar_cav();
        let h = c_r * nu_straight * k / d_i;

        // coil pitch and pass count; a cavity shallower than one pitch
        // cannot hold the coil
        let pitch = d_i + 2.0 * self.air_pipe.wall_thickness;
        let passes = (self.geometry.cavity_depth / pitch).floor();
        if passes < 1.0 {
            return Err(ComponentError::Precondition {
                what: "cavity too shallow for one coil pass",
            });
        }
        let h_c = self.geometry.cavity_depth / passes;
        let coil_length = passes
            * ((PI * self.geometry.cavity_diameter).powi(2) + h_c * h_c).sqrt();
        let area_pipe = PI * d_i * coil_length;

        let dt1 = self.air_pipe.temperature - self.inlet.temperature()?;
        let dt2 = self.air_pipe.temperature - self.outlet.temperature()?;
        let dt = log_mean(dt1, dt2).map_err(|_| ComponentError::NonPhysical {
            what: "degenerate pipe temperature difference",
        })?;

        Ok(h * area_pipe * dt)
    }

    /// Solar power the cavity reflects back out, W.
    pub fn q_ref(&self) -> f64 {
        self.q_in() * (1.0 - self.effective_absorptance())
    }

    /// Wind convection off the insulating shell, W.
    pub fn q_cond_conv(&self) -> ComponentResult<f64> {
        let oracle = self.oracle();
        let amb = &self.ambient;
        let at_amb = |key: PropKey| {
            oracle.query(
                key,
                (PropKey::Temperature, amb.temperature),
                (PropKey::Pressure, amb.pressure),
                amb.fluid,
            )
        };

        let mu = at_amb(PropKey::Viscosity)?;
        let rho = at_amb(PropKey::Density)?;
        let cp = at_amb(PropKey::SpecificHeatCp)?;
        let k = at_amb(PropKey::Conductivity)?;

        let d_o = self.insulation_outer_diameter();
        let re = amb.wind_speed * d_o / (mu / rho);
        let pr = cp * mu / k;
        let h = nu_external_cylinder(re, pr) * k / d_o;

        Ok(h * self.area_insulation() * (self.insulation.temperature - amb.temperature))
    }

    /// Radiation off the insulating shell, W.
    pub fn q_cond_rad(&self) -> f64 {
        self.insulation.emissivity
            * self.area_insulation()
            * STEFAN_BOLTZMANN
            * (self.insulation.temperature.powi(4) - self.ambient.temperature.powi(4))
    }

    /// Conduction from the pipe through the shell, W.
    pub fn q_cond_tot(&self) -> f64 {
        let d_o = self.insulation_outer_diameter();
        let resistance = (d_o / self.insulation.inner_diameter).ln()
            / (2.0 * PI * self.insulation.conductivity * self.geometry.cavity_depth);
        (self.air_pipe.temperature - self.insulation.temperature) / resistance
    }

    /// Convection loss out of the cavity aperture, W. Natural
    /// convection at film temperature plus a wind-driven term.
    pub fn q_conv_tot(&self) -> ComponentResult<f64> {
        let oracle = self.oracle();
        let amb = &self.ambient;
        let t_film = (self.air_pipe.temperature + amb.temperature) / 2.0;
        let at_film = |key: PropKey| {
            oracle.query(
                key,
                (PropKey::Temperature, t_film),
                (PropKey::Pressure, amb.pressure),
                amb.fluid,
            )
        };

        let k = at_film(PropKey::Conductivity)?;
        let beta = at_film(PropKey::ExpansionCoefficient)?;
        let mu = at_film(PropKey::Viscosity)?;
        let rho = at_film(PropKey::Density)?;
        let nu_kin = mu / rho;

        let d = self.d_bar_cav();
        let gr = G0_MPS2 * beta * (self.air_pipe.temperature - amb.temperature) * d.powi(3)
            / (nu_kin * nu_kin);
        let nu = nu_natural_convection(
            gr,
            self.air_pipe.temperature,
            amb.temperature,
            self.geometry.aperture_angle,
            self.geometry.aperture_diameter,
            d,
        );
        let h_nat = k * nu / d;
        let h_wind = 0.1967 * amb.wind_speed.powf(1.849);

        Ok((h_nat + h_wind) * self.area_cavity() * (self.air_pipe.temperature - amb.temperature))
    }

    /// Thermal radiation emitted out of the aperture, W.
    pub fn q_rad_emit(&self) -> f64 {
        // effective cavity emissivity equals its effective absorptance
        self.effective_absorptance()
            * self.area_aperture()
            * STEFAN_BOLTZMANN
            * (self.air_pipe.temperature.powi(4) - self.ambient.temperature.powi(4))
    }

    /// Useful power picked up by the air, W.
    pub fn q_use(&self) -> ComponentResult<f64> {
        self.q_duty_enthalpy()
    }

    /// Solar power incident on the concentrator, W.
    pub fn q_total_incident(&self) -> f64 {
        self.ambient.irradiance * self.geometry.aperture_area
    }

    /// Collector efficiency.
    pub fn efficiency(&self) -> ComponentResult<f64> {
        Ok(self.q_use()? / self.q_total_incident())
    }

    /// Link the outlet to the inlet (fluid, flow cell, pressure; no
    /// pressure loss through the receiver).
    fn prepare_outlet(&mut self) -> ComponentResult<()> {
        self.inlet.flow_to(&mut self.outlet);
        self.outlet.set_pressure(self.inlet.pressure()?)?;
        Ok(())
    }

    fn solve(&mut self, target: DishTarget) -> ComponentResult<()> {
        self.prepare_outlet()?;
        let config = NewtonConfig {
            max_iterations: 100,
            abs_tol: 1e-3,
            ..NewtonConfig::default()
        };
        let mut balance = DishBalance { dish: self, target };
        solve_energy_balance(&mut balance, &config)?;
        Ok(())
    }

    /// Both end temperatures known; find the mass flow rate.
    pub fn solve_flow_rate(&mut self) -> ComponentResult<f64> {
        self.solve(DishTarget::FlowRate)?;
        Ok(self.inlet.flow_rate())
    }

    /// Inlet state and flow known; find the outlet temperature.
    pub fn solve_outlet_temperature(&mut self) -> ComponentResult<f64> {
        self.solve(DishTarget::OutletTemperature)?;
        Ok(self.outlet.temperature()?)
    }

    /// Both end temperatures and flow known; find the concentrator
    /// aperture area delivering them.
    pub fn solve_aperture_area(&mut self) -> ComponentResult<f64> {
        self.solve(DishTarget::ApertureArea)?;
        Ok(self.geometry.aperture_area)
    }
}

struct DishBalance<'a> {
    dish: &'a mut DishCollector,
    target: DishTarget,
}

impl DishBalance<'_> {
    fn apply(&mut self, x: &DVector<f64>) -> ComponentResult<()> {
        self.dish.air_pipe.temperature = x[0];
        self.dish.insulation.temperature = x[1];
        match self.target {
            DishTarget::FlowRate => self.dish.inlet.set_flow_rate(x[2])?,
            DishTarget::OutletTemperature => self.dish.outlet.set_temperature(x[2])?,
            DishTarget::ApertureArea => self.dish.geometry.aperture_area = x[2],
        }
        Ok(())
    }
}

impl EnergyBalanceModel for DishBalance<'_> {
    fn dim(&self) -> usize {
        3
    }

    fn initial_guess(&self) -> DVector<f64> {
        match self.target {
            DishTarget::FlowRate => DVector::from_vec(vec![500.0, 300.0, 0.1]),
            DishTarget::OutletTemperature => DVector::from_vec(vec![1500.0, 400.0, 1000.0]),
            DishTarget::ApertureArea => DVector::from_vec(vec![500.0, 300.0, 19.0]),
        }
    }

    fn lower_bounds(&self) -> Vec<(usize, f64)> {
        let target_floor = match self.target {
            DishTarget::FlowRate => 1e-4,
            DishTarget::OutletTemperature => 200.0,
            DishTarget::ApertureArea => 1e-2,
        };
        vec![(0, 200.0), (1, 200.0), (2, target_floor)]
    }

    fn residuals(&mut self, x: &DVector<f64>) -> ComponentResult<DVector<f64>> {
        self.apply(x)?;
        let d = &*self.dish;
        let q_duty = d.q_duty_enthalpy()?;
        Ok(DVector::from_vec(vec![
            q_duty - d.q_duty_pipe()?,
            d.q_cond_tot() - d.q_cond_conv()? - d.q_cond_rad(),
            q_duty + d.q_ref() + d.q_cond_tot() + d.q_conv_tot()? + d.q_rad_emit() - d.q_in(),
        ]))
    }
}
