//! Stream state machine.

use std::fmt;
use std::rc::Rc;

use ht_core::numeric::{nearly_equal, Tolerances};
use ht_core::units::{convert_temperature, TempUnit};
use ht_fluids::{Fluid, PropKey, PropertyOracle};

use crate::error::{StreamError, StreamResult};
use crate::flow::SharedFlow;

/// Which of temperature or pressure is the independently controlled
/// variable once quality constrains the state to the saturation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyMode {
    /// Pressure is the master; saturation temperature follows it.
    PressureDependent,
    /// Temperature is the master; saturation pressure follows it.
    TemperatureDependent,
}

/// A state variable and how it got its value.
///
/// `Fixed` values were written by the caller and are defended against
/// conflicting writes. `Derived` values were computed through the
/// oracle and are silently re-derived when their inputs change.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Knob {
    Unset,
    Fixed(f64),
    Derived(f64),
}

impl Knob {
    fn value(self) -> Option<f64> {
        match self {
            Knob::Unset => None,
            Knob::Fixed(v) | Knob::Derived(v) => Some(v),
        }
    }

    fn is_fixed(self) -> bool {
        matches!(self, Knob::Fixed(_))
    }

    /// Fixed survives, Derived is dropped.
    fn demoted(self) -> Knob {
        match self {
            Knob::Derived(_) => Knob::Unset,
            other => other,
        }
    }
}

/// Relative tolerance for saturation-consistency checks when a quality
/// write meets two independently fixed variables. Wider than the
/// numeric tolerances: property backends agree with callers' steam
/// tables to a few parts in 10^4 at best.
const SATURATION_CONSISTENCY_REL: f64 = 1e-3;

/// One fluid stream: identity, flow, and a partially resolved
/// thermodynamic state.
///
/// Derived properties (enthalpy, entropy, internal energy, specific
/// heat) are never stored; every read recomputes through the oracle
/// from the current (T, P) or (P, x) pair.
pub struct Stream {
    oracle: Rc<dyn PropertyOracle>,
    fluid: Fluid,
    flow: SharedFlow,
    temperature: Knob,
    pressure: Knob,
    quality: Option<f64>,
    mode: DependencyMode,
}

impl Stream {
    /// A stream with everything unset and zero flow.
    pub fn new(oracle: Rc<dyn PropertyOracle>, fluid: Fluid, mode: DependencyMode) -> Self {
        Self {
            oracle,
            fluid,
            flow: SharedFlow::new(),
            temperature: Knob::Unset,
            pressure: Knob::Unset,
            quality: None,
            mode,
        }
    }

    pub fn fluid(&self) -> Fluid {
        self.fluid
    }

    pub fn dependency_mode(&self) -> DependencyMode {
        self.mode
    }

    /// Handle to the shared flow cell.
    pub fn flow(&self) -> &SharedFlow {
        &self.flow
    }

    /// Mass flow rate, kg/s.
    pub fn flow_rate(&self) -> f64 {
        self.flow.get()
    }

    /// Set the mass flow rate, kg/s. Visible to every stream linked
    /// via [`Stream::flow_to`].
    pub fn set_flow_rate(&self, rate: f64) -> StreamResult<()> {
        self.flow.set(rate)
    }

    /// Temperature, K.
    pub fn temperature(&self) -> StreamResult<f64> {
        self.temperature.value().ok_or(StreamError::Unresolved {
            what: "temperature not set",
        })
    }

    /// Pressure, Pa.
    pub fn pressure(&self) -> StreamResult<f64> {
        self.pressure.value().ok_or(StreamError::Unresolved {
            what: "pressure not set",
        })
    }

    /// Vapor quality if the stream is marked two-phase.
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    /// Temperature in Celsius.
    pub fn temperature_celsius(&self) -> StreamResult<f64> {
        Ok(convert_temperature(
            self.temperature()?,
            TempUnit::Kelvin,
            TempUnit::Celsius,
        ))
    }

    /// Celsius passthrough for [`Stream::set_temperature`].
    pub fn set_temperature_celsius(&mut self, t_c: f64) -> StreamResult<()> {
        self.set_temperature(convert_temperature(t_c, TempUnit::Celsius, TempUnit::Kelvin))
    }

    /// Set temperature, K.
    ///
    /// With quality set, the saturation pressure is derived through
    /// the oracle unless pressure is independently fixed; in
    /// pressure-dependent mode a fixed pressure makes the write
    /// over-determined instead.
    pub fn set_temperature(&mut self, t: f64) -> StreamResult<()> {
        if !t.is_finite() || t < 0.0 {
            return Err(StreamError::Domain {
                what: "temperature below 0 K or non-finite",
            });
        }
        if let Some(x) = self.quality {
            if self.pressure.is_fixed() {
                match self.mode {
                    DependencyMode::PressureDependent => {
                        return Err(StreamError::OverDetermined {
                            what: "temperature write with quality and fixed pressure",
                        });
                    }
                    // Temperature is master here; the table says store
                    // T only and leave the fixed pressure alone.
                    DependencyMode::TemperatureDependent => {
                        self.temperature = Knob::Fixed(t);
                        return Ok(());
                    }
                }
            }
            let p = self.oracle.query(
                PropKey::Pressure,
                (PropKey::Quality, x),
                (PropKey::Temperature, t),
                self.fluid,
            )?;
            self.temperature = Knob::Fixed(t);
            self.pressure = Knob::Derived(p);
            return Ok(());
        }
        self.temperature = Knob::Fixed(t);
        Ok(())
    }

    /// Set pressure, Pa.
    ///
    /// With quality set, the saturation temperature is derived; in
    /// temperature-dependent mode a fixed temperature makes the write
    /// over-determined.
    pub fn set_pressure(&mut self, p: f64) -> StreamResult<()> {
        if !p.is_finite() || p < 0.0 {
            return Err(StreamError::Domain {
                what: "negative or non-finite pressure",
            });
        }
        if let Some(x) = self.quality {
            if self.mode == DependencyMode::TemperatureDependent && self.temperature.is_fixed() {
                return Err(StreamError::OverDetermined {
                    what: "pressure write with quality and fixed temperature",
                });
            }
            let t = self.oracle.query(
                PropKey::Temperature,
                (PropKey::Quality, x),
                (PropKey::Pressure, p),
                self.fluid,
            )?;
            self.pressure = Knob::Fixed(p);
            self.temperature = Knob::Derived(t);
            return Ok(());
        }
        self.pressure = Knob::Fixed(p);
        Ok(())
    }

    /// Mark the stream two-phase at quality `x`.
    ///
    /// With exactly one of {T, P} known the other is derived. With
    /// both independently fixed the write is accepted only when the
    /// triple is consistent with the saturation curve, in which case
    /// the non-master variable is demoted to derived; otherwise the
    /// state is left unchanged and the write fails over-determined.
    pub fn set_quality(&mut self, x: f64) -> StreamResult<()> {
        if !x.is_finite() || !(0.0..=1.0).contains(&x) {
            return Err(StreamError::Domain {
                what: "quality outside [0, 1]",
            });
        }
        if self.fluid.is_incompressible() {
            return Err(StreamError::Domain {
                what: "quality of incompressible fluid",
            });
        }
        match (self.temperature.value(), self.pressure.value()) {
            (Some(t), Some(p)) if self.temperature.is_fixed() && self.pressure.is_fixed() => {
                self.accept_consistent_quality(x, t, p)
            }
            (_, Some(p)) if matches!(self.mode, DependencyMode::PressureDependent) => {
                let t = self.oracle.query(
                    PropKey::Temperature,
                    (PropKey::Quality, x),
                    (PropKey::Pressure, p),
                    self.fluid,
                )?;
                self.quality = Some(x);
                self.temperature = Knob::Derived(t);
                Ok(())
            }
            (Some(t), _) => {
                let p = self.oracle.query(
                    PropKey::Pressure,
                    (PropKey::Quality, x),
                    (PropKey::Temperature, t),
                    self.fluid,
                )?;
                self.quality = Some(x);
                self.pressure = Knob::Derived(p);
                Ok(())
            }
            (None, Some(p)) => {
                let t = self.oracle.query(
                    PropKey::Temperature,
                    (PropKey::Quality, x),
                    (PropKey::Pressure, p),
                    self.fluid,
                )?;
                self.quality = Some(x);
                self.temperature = Knob::Derived(t);
                Ok(())
            }
            (None, None) => {
                self.quality = Some(x);
                Ok(())
            }
        }
    }

    /// Both T and P are independently fixed; the quality write is only
    /// legal when the triple already sits on the saturation curve.
    fn accept_consistent_quality(&mut self, x: f64, t: f64, p: f64) -> StreamResult<()> {
        let tol = Tolerances {
            abs: 0.0,
            rel: SATURATION_CONSISTENCY_REL,
        };
        match self.mode {
            DependencyMode::PressureDependent => {
                let t_sat = self.oracle.query(
                    PropKey::Temperature,
                    (PropKey::Quality, x),
                    (PropKey::Pressure, p),
                    self.fluid,
                )?;
                if !nearly_equal(t_sat, t, tol) {
                    return Err(StreamError::OverDetermined {
                        what: "quality conflicts with fixed temperature and pressure",
                    });
                }
                self.quality = Some(x);
                self.temperature = Knob::Derived(t_sat);
            }
            DependencyMode::TemperatureDependent => {
                let p_sat = self.oracle.query(
                    PropKey::Pressure,
                    (PropKey::Quality, x),
                    (PropKey::Temperature, t),
                    self.fluid,
                )?;
                if !nearly_equal(p_sat, p, tol) {
                    return Err(StreamError::OverDetermined {
                        what: "quality conflicts with fixed temperature and pressure",
                    });
                }
                self.quality = Some(x);
                self.pressure = Knob::Derived(p_sat);
            }
        }
        Ok(())
    }

    /// Clear the two-phase marking. Independently fixed T and P are
    /// retained; derived values were functions of quality and are
    /// dropped with it.
    pub fn clear_quality(&mut self) {
        self.quality = None;
        self.temperature = self.temperature.demoted();
        self.pressure = self.pressure.demoted();
    }

    /// The oracle input pair for derived-property reads: (P, x) when
    /// two-phase, (T, P) otherwise.
    fn state_inputs(&self) -> StreamResult<((PropKey, f64), (PropKey, f64))> {
        if let Some(x) = self.quality {
            let p = self.pressure.value().ok_or(StreamError::Unresolved {
                what: "two-phase stream without resolved pressure",
            })?;
            return Ok(((PropKey::Pressure, p), (PropKey::Quality, x)));
        }
        let t = self.temperature.value().ok_or(StreamError::Unresolved {
            what: "temperature not set",
        })?;
        let p = self.pressure.value().ok_or(StreamError::Unresolved {
            what: "pressure not set",
        })?;
        Ok(((PropKey::Temperature, t), (PropKey::Pressure, p)))
    }

    fn derived(&self, want: PropKey) -> StreamResult<f64> {
        let (in1, in2) = self.state_inputs()?;
        Ok(self.oracle.query(want, in1, in2, self.fluid)?)
    }

    /// Specific enthalpy, J/kg.
    pub fn enthalpy(&self) -> StreamResult<f64> {
        self.derived(PropKey::Enthalpy)
    }

    /// Specific entropy, J/(kg K).
    pub fn entropy(&self) -> StreamResult<f64> {
        self.derived(PropKey::Entropy)
    }

    /// Specific internal energy, J/kg.
    pub fn internal_energy(&self) -> StreamResult<f64> {
        self.derived(PropKey::InternalEnergy)
    }

    /// Specific heat at constant pressure, J/(kg K). Infinite for a
    /// two-phase stream (isothermal heat absorption during phase
    /// change).
    pub fn specific_heat(&self) -> StreamResult<f64> {
        if self.quality.is_some() {
            return Ok(f64::INFINITY);
        }
        self.derived(PropKey::SpecificHeatCp)
    }

    /// Mass density, kg/m³.
    pub fn density(&self) -> StreamResult<f64> {
        self.derived(PropKey::Density)
    }

    /// Dynamic viscosity, Pa s.
    pub fn viscosity(&self) -> StreamResult<f64> {
        self.derived(PropKey::Viscosity)
    }

    /// Thermal conductivity, W/(m K).
    pub fn conductivity(&self) -> StreamResult<f64> {
        self.derived(PropKey::Conductivity)
    }

    /// Oracle handle, for callers that need out-of-state lookups
    /// (saturation envelopes, wall-temperature film properties).
    pub fn oracle(&self) -> &Rc<dyn PropertyOracle> {
        &self.oracle
    }

    /// Link `downstream` to this stream: same fluid, same flow cell.
    /// After this call a flow-rate write on either stream is visible
    /// on both. Thermodynamic state is not copied.
    pub fn flow_to(&self, downstream: &mut Stream) {
        downstream.fluid = self.fluid;
        downstream.flow = self.flow.clone();
    }

    /// Adiabatic isobaric mixing with `other`.
    ///
    /// Fails [`StreamError::Incompatible`] unless the fluids match and
    /// the pressures agree; the result carries the summed flow in a
    /// fresh cell, the flow-weighted enthalpy, and a temperature
    /// back-solved from (H, P).
    pub fn mix(&self, other: &Stream) -> StreamResult<Stream> {
        if self.fluid != other.fluid {
            return Err(StreamError::Incompatible {
                what: "mixing different fluids",
            });
        }
        let p1 = self.pressure()?;
        let p2 = other.pressure()?;
        if !nearly_equal(p1, p2, Tolerances::default()) {
            return Err(StreamError::Incompatible {
                what: "mixing at unequal pressures",
            });
        }
        let m1 = self.flow_rate();
        let m2 = other.flow_rate();
        let m = m1 + m2;
        if m <= 0.0 {
            return Err(StreamError::Domain {
                what: "mixing with zero combined flow",
            });
        }
        let h = (m1 * self.enthalpy()? + m2 * other.enthalpy()?) / m;
        let t = self.oracle.query(
            PropKey::Temperature,
            (PropKey::Enthalpy, h),
            (PropKey::Pressure, p1),
            self.fluid,
        )?;

        let mut out = Stream::new(Rc::clone(&self.oracle), self.fluid, self.mode);
        out.flow.set(m)?;
        out.pressure = Knob::Fixed(p1);
        out.temperature = Knob::Derived(t);
        Ok(out)
    }
}

impl Clone for Stream {
    /// Clones detach the flow cell; use [`Stream::flow_to`] when the
    /// copy must track the original's flow.
    fn clone(&self) -> Self {
        Self {
            oracle: Rc::clone(&self.oracle),
            fluid: self.fluid,
            flow: self.flow.detached(),
            temperature: self.temperature,
            pressure: self.pressure,
            quality: self.quality,
            mode: self.mode,
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("fluid", &self.fluid)
            .field("flow_kgps", &self.flow.get())
            .field("temperature", &self.temperature)
            .field("pressure", &self.pressure)
            .field("quality", &self.quality)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ht_fluids::{FluidError, FluidResult};

    /// Analytic stand-in for the property database: a linear
    /// saturation curve and enthalpy linear in temperature. Exact and
    /// invertible, so the transition rules can be checked without
    /// CoolProp.
    struct MockOracle;

    const T_REF: f64 = 300.0;
    const P_REF: f64 = 1e5;
    const SAT_SLOPE: f64 = 1e4; // Pa per K along the mock saturation curve
    const CP: f64 = 1000.0; // J/(kg K), single phase
    const H_FG: f64 = 2e6; // J/kg

    fn t_sat(p: f64) -> f64 {
        T_REF + (p - P_REF) / SAT_SLOPE
    }

    fn p_sat(t: f64) -> f64 {
        P_REF + (t - T_REF) * SAT_SLOPE
    }

    impl PropertyOracle for MockOracle {
        fn query(
            &self,
            want: PropKey,
            in1: (PropKey, f64),
            in2: (PropKey, f64),
            fluid: Fluid,
        ) -> FluidResult<f64> {
            use PropKey::*;
            let _ = fluid;
            let find = |key: PropKey| -> Option<f64> {
                if in1.0 == key {
                    Some(in1.1)
                } else if in2.0 == key {
                    Some(in2.1)
                } else {
                    None
                }
            };
            let q = find(Quality);
            match want {
                Pressure => {
                    let t = find(Temperature).ok_or(FluidError::Unsupported {
                        what: "mock pair",
                    })?;
                    Ok(p_sat(t))
                }
                Temperature => {
                    if let Some(p) = find(Pressure) {
                        if q.is_some() {
                            return Ok(t_sat(p));
                        }
                        if let Some(h) = find(Enthalpy) {
                            return Ok(h / CP);
                        }
                    }
                    Err(FluidError::Unsupported { what: "mock pair" })
                }
                Enthalpy => {
                    if let Some(x) = q {
                        let p = find(Pressure).ok_or(FluidError::Unsupported {
                            what: "mock pair",
                        })?;
                        Ok(CP * t_sat(p) + x * H_FG)
                    } else {
                        let t = find(Temperature).ok_or(FluidError::Unsupported {
                            what: "mock pair",
                        })?;
                        Ok(CP * t)
                    }
                }
                Entropy => Ok(10.0 * find(Temperature).unwrap_or(t_sat(find(Pressure).unwrap_or(P_REF)))),
                InternalEnergy => Ok(800.0 * find(Temperature).unwrap_or(t_sat(find(Pressure).unwrap_or(P_REF)))),
                SpecificHeatCp => Ok(CP),
                _ => Err(FluidError::Unsupported { what: "mock prop" }),
            }
        }

        fn critical_pressure(&self, _fluid: Fluid) -> FluidResult<f64> {
            Ok(22e6)
        }
    }

    fn water(mode: DependencyMode) -> Stream {
        Stream::new(Rc::new(MockOracle), Fluid::Water, mode)
    }

    #[test]
    fn single_phase_enthalpy_from_t_and_p() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_temperature(400.0).unwrap();
        s.set_pressure(2e5).unwrap();
        assert_eq!(s.enthalpy().unwrap(), 400.0 * CP);
    }

    #[test]
    fn unresolved_read_fails() {
        let s = water(DependencyMode::PressureDependent);
        assert!(matches!(
            s.enthalpy().unwrap_err(),
            StreamError::Unresolved { .. }
        ));
        let mut s = water(DependencyMode::PressureDependent);
        s.set_temperature(400.0).unwrap();
        assert!(s.enthalpy().is_err());
    }

    #[test]
    fn quality_then_temperature_derives_pressure() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_quality(0.5).unwrap();
        s.set_temperature(350.0).unwrap();
        assert_eq!(s.pressure().unwrap(), p_sat(350.0));
    }

    #[test]
    fn pressure_master_rederives_temperature() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_quality(0.3).unwrap();
        s.set_pressure(3e5).unwrap();
        assert_eq!(s.temperature().unwrap(), t_sat(3e5));
        // pressure is master: a second pressure write re-derives T
        s.set_pressure(5e5).unwrap();
        assert_eq!(s.temperature().unwrap(), t_sat(5e5));
    }

    #[test]
    fn temperature_write_on_fixed_pressure_two_phase_is_over_determined() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_pressure(3e5).unwrap();
        s.set_quality(0.5).unwrap();
        let t_before = s.temperature().unwrap();
        let err = s.set_temperature(500.0).unwrap_err();
        assert!(matches!(err, StreamError::OverDetermined { .. }));
        // state unchanged
        assert_eq!(s.temperature().unwrap(), t_before);
        assert_eq!(s.pressure().unwrap(), 3e5);
    }

    #[test]
    fn temperature_dependent_pressure_write_is_over_determined() {
        let mut s = water(DependencyMode::TemperatureDependent);
        s.set_temperature(350.0).unwrap();
        s.set_quality(0.5).unwrap();
        let err = s.set_pressure(9e5).unwrap_err();
        assert!(matches!(err, StreamError::OverDetermined { .. }));
        assert_eq!(s.pressure().unwrap(), p_sat(350.0));
    }

    #[test]
    fn consistent_quality_on_fixed_t_and_p_is_accepted() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_pressure(3e5).unwrap();
        s.set_temperature(t_sat(3e5)).unwrap();
        s.set_quality(0.5).unwrap();
        assert_eq!(s.quality(), Some(0.5));
        // temperature demoted to derived: a later pressure write
        // re-derives it instead of failing
        s.set_pressure(4e5).unwrap();
        assert_eq!(s.temperature().unwrap(), t_sat(4e5));
    }

    #[test]
    fn inconsistent_quality_on_fixed_t_and_p_is_rejected() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_pressure(3e5).unwrap();
        s.set_temperature(t_sat(3e5) + 50.0).unwrap();
        let err = s.set_quality(0.5).unwrap_err();
        assert!(matches!(err, StreamError::OverDetermined { .. }));
        assert_eq!(s.quality(), None);
        assert_eq!(s.temperature().unwrap(), t_sat(3e5) + 50.0);
    }

    #[test]
    fn clear_quality_drops_derived_keeps_fixed() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_quality(0.5).unwrap();
        s.set_temperature(350.0).unwrap();
        assert!(s.pressure().is_ok());
        s.clear_quality();
        assert_eq!(s.quality(), None);
        // derived pressure gone, fixed temperature kept
        assert!(matches!(
            s.pressure().unwrap_err(),
            StreamError::Unresolved { .. }
        ));
        assert_eq!(s.temperature().unwrap(), 350.0);
    }

    #[test]
    fn quality_domain_checks() {
        let mut s = water(DependencyMode::PressureDependent);
        assert!(matches!(
            s.set_quality(1.5).unwrap_err(),
            StreamError::Domain { .. }
        ));
        assert!(matches!(
            s.set_quality(-0.1).unwrap_err(),
            StreamError::Domain { .. }
        ));
        let mut oil = Stream::new(
            Rc::new(MockOracle),
            Fluid::Tvp1,
            DependencyMode::PressureDependent,
        );
        assert!(oil.set_quality(0.5).is_err());
    }

    #[test]
    fn physical_bound_checks() {
        let mut s = water(DependencyMode::PressureDependent);
        assert!(s.set_temperature(-1.0).is_err());
        assert!(s.set_pressure(-10.0).is_err());
        assert!(s.set_flow_rate(-0.5).is_err());
    }

    #[test]
    fn two_phase_cp_is_infinite() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_pressure(3e5).unwrap();
        s.set_quality(0.2).unwrap();
        assert!(s.specific_heat().unwrap().is_infinite());
    }

    #[test]
    fn flow_to_aliases_the_cell() {
        let mut up = water(DependencyMode::PressureDependent);
        let mut down = water(DependencyMode::PressureDependent);
        up.set_flow_rate(1.0).unwrap();
        up.flow_to(&mut down);
        assert!(up.flow().is_linked_to(down.flow()));
        up.set_flow_rate(2.5).unwrap();
        assert_eq!(down.flow_rate(), 2.5);
        down.set_flow_rate(0.7).unwrap();
        assert_eq!(up.flow_rate(), 0.7);
    }

    #[test]
    fn clone_detaches_flow() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_flow_rate(1.0).unwrap();
        let c = s.clone();
        s.set_flow_rate(9.0).unwrap();
        assert_eq!(c.flow_rate(), 1.0);
    }

    #[test]
    fn mix_conserves_mass_and_energy() {
        let mut a = water(DependencyMode::PressureDependent);
        a.set_temperature(320.0).unwrap();
        a.set_pressure(2e5).unwrap();
        a.set_flow_rate(1.0).unwrap();
        let mut b = water(DependencyMode::PressureDependent);
        b.set_temperature(380.0).unwrap();
        b.set_pressure(2e5).unwrap();
        b.set_flow_rate(3.0).unwrap();

        let out = a.mix(&b).unwrap();
        assert_eq!(out.flow_rate(), 4.0);
        let lhs = out.flow_rate() * out.enthalpy().unwrap();
        let rhs = 1.0 * a.enthalpy().unwrap() + 3.0 * b.enthalpy().unwrap();
        assert!((lhs - rhs).abs() < 1e-6 * rhs.abs());
        // the mock enthalpy is linear in T, so T mixes linearly too
        assert!((out.temperature().unwrap() - 365.0).abs() < 1e-9);
    }

    #[test]
    fn mix_rejects_different_fluids_and_leaves_inputs_alone() {
        let mut a = water(DependencyMode::PressureDependent);
        a.set_temperature(320.0).unwrap();
        a.set_pressure(2e5).unwrap();
        a.set_flow_rate(1.0).unwrap();
        let mut b = Stream::new(
            Rc::new(MockOracle),
            Fluid::Air,
            DependencyMode::PressureDependent,
        );
        b.set_temperature(320.0).unwrap();
        b.set_pressure(2e5).unwrap();
        b.set_flow_rate(1.0).unwrap();

        let err = a.mix(&b).unwrap_err();
        assert!(matches!(err, StreamError::Incompatible { .. }));
        assert_eq!(a.flow_rate(), 1.0);
        assert_eq!(b.flow_rate(), 1.0);
    }

    #[test]
    fn mix_rejects_unequal_pressures_and_zero_flow() {
        let mut a = water(DependencyMode::PressureDependent);
        a.set_temperature(320.0).unwrap();
        a.set_pressure(2e5).unwrap();
        let mut b = water(DependencyMode::PressureDependent);
        b.set_temperature(320.0).unwrap();
        b.set_pressure(3e5).unwrap();
        assert!(matches!(
            a.mix(&b).unwrap_err(),
            StreamError::Incompatible { .. }
        ));

        b.set_pressure(2e5).unwrap();
        // both flows still zero
        assert!(matches!(
            a.mix(&b).unwrap_err(),
            StreamError::Domain { .. }
        ));
    }

    #[test]
    fn celsius_passthrough() {
        let mut s = water(DependencyMode::PressureDependent);
        s.set_temperature_celsius(150.0).unwrap();
        assert!((s.temperature().unwrap() - 423.15).abs() < 1e-9);
        assert!((s.temperature_celsius().unwrap() - 150.0).abs() < 1e-9);
    }
}
