//! Stream engine against the real property backend.

use std::rc::Rc;

use approx::assert_relative_eq;
use ht_fluids::{CoolPropOracle, Fluid, PropertyOracle};
use ht_streams::{DependencyMode, Stream, StreamError};

fn water(mode: DependencyMode) -> Stream {
    Stream::new(Rc::new(CoolPropOracle::new()), Fluid::Water, mode)
}

#[test]
fn quality_round_trips_through_the_saturation_curve() {
    let mut s = water(DependencyMode::PressureDependent);
    s.set_pressure(101_325.0).unwrap();
    s.set_quality(0.5).unwrap();
    // derived temperature sits on the saturation curve
    assert_relative_eq!(s.temperature().unwrap(), 373.12, max_relative = 1e-3);

    // and the saturation pressure at that temperature is the one we set
    let p_back = CoolPropOracle::new()
        .query(
            ht_fluids::PropKey::Pressure,
            (ht_fluids::PropKey::Quality, 0.5),
            (ht_fluids::PropKey::Temperature, s.temperature().unwrap()),
            Fluid::Water,
        )
        .unwrap();
    assert_relative_eq!(p_back, 101_325.0, max_relative = 1e-4);
}

#[test]
fn repeated_enthalpy_reads_agree() {
    let mut s = water(DependencyMode::PressureDependent);
    s.set_temperature(700.0).unwrap();
    s.set_pressure(1e5).unwrap();
    let h1 = s.enthalpy().unwrap();
    let h2 = s.enthalpy().unwrap();
    assert_eq!(h1, h2);
    assert!(h1 > 3.0e6, "superheated steam enthalpy, got {h1}");
}

#[test]
fn consistent_three_writes_succeed_inconsistent_fail() {
    // pressure, then the matching saturation temperature, then quality
    let oracle = CoolPropOracle::new();
    let t_sat = oracle
        .query(
            ht_fluids::PropKey::Temperature,
            (ht_fluids::PropKey::Pressure, 5e5),
            (ht_fluids::PropKey::Quality, 0.5),
            Fluid::Water,
        )
        .unwrap();

    let mut s = water(DependencyMode::PressureDependent);
    s.set_pressure(5e5).unwrap();
    s.set_temperature(t_sat).unwrap();
    s.set_quality(0.5).unwrap();
    assert_eq!(s.quality(), Some(0.5));

    // same writes with a temperature 30 K off the curve
    let mut s = water(DependencyMode::PressureDependent);
    s.set_pressure(5e5).unwrap();
    s.set_temperature(t_sat + 30.0).unwrap();
    let err = s.set_quality(0.5).unwrap_err();
    assert!(matches!(err, StreamError::OverDetermined { .. }));
    assert_eq!(s.quality(), None);
}

#[test]
fn two_phase_enthalpy_interpolates_the_dome() {
    let mut liq = water(DependencyMode::PressureDependent);
    liq.set_pressure(101_325.0).unwrap();
    liq.set_quality(0.0).unwrap();
    let mut vap = water(DependencyMode::PressureDependent);
    vap.set_pressure(101_325.0).unwrap();
    vap.set_quality(1.0).unwrap();
    let mut half = water(DependencyMode::PressureDependent);
    half.set_pressure(101_325.0).unwrap();
    half.set_quality(0.5).unwrap();

    let h_f = liq.enthalpy().unwrap();
    let h_g = vap.enthalpy().unwrap();
    let h_half = half.enthalpy().unwrap();
    assert_relative_eq!(h_half, 0.5 * (h_f + h_g), max_relative = 1e-6);
    assert!(half.specific_heat().unwrap().is_infinite());
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
    let rhs = a.flow_rate() * a.enthalpy().unwrap() + b.flow_rate() * b.enthalpy().unwrap();
    assert_relative_eq!(lhs, rhs, max_relative = 1e-4);
    let t = out.temperature().unwrap();
    assert!(t > 320.0 && t < 380.0);
}

#[test]
fn flow_to_links_across_the_backend_too() {
    let mut inlet = water(DependencyMode::PressureDependent);
    let mut outlet = water(DependencyMode::PressureDependent);
    inlet.set_flow_rate(32.09 / 3.6).unwrap();
    inlet.flow_to(&mut outlet);
    assert_relative_eq!(outlet.flow_rate(), 32.09 / 3.6);
    outlet.set_flow_rate(5.0).unwrap();
    assert_relative_eq!(inlet.flow_rate(), 5.0);
}
