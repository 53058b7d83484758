//! Shared helpers for component models.

use ht_fluids::{PropKey, PropertyOracle};
use ht_streams::Stream;

use crate::error::ComponentResult;

/// Finalize a stream whose pressure is set and whose specific enthalpy
/// has just been computed from an energy balance.
///
/// Compressible fluids are probed against the saturated-liquid/vapor
/// envelope at that pressure: enthalpies inside the dome set quality
/// (temperature then follows from saturation), enthalpies outside set
/// temperature from (P, H). Incompressible fluids have no dome and go
/// straight to temperature.
pub fn assign_state_from_enthalpy(stream: &mut Stream, h: f64) -> ComponentResult<()> {
    let p = stream.pressure()?;
    let oracle = stream.oracle().clone();
    let fluid = stream.fluid();

    if !fluid.is_incompressible() {
        let h_l = oracle.query(
            PropKey::Enthalpy,
            (PropKey::Pressure, p),
            (PropKey::Quality, 0.0),
            fluid,
        )?;
        let h_g = oracle.query(
            PropKey::Enthalpy,
            (PropKey::Pressure, p),
            (PropKey::Quality, 1.0),
            fluid,
        )?;
        if h_l <= h && h <= h_g {
            let x = oracle.query(
                PropKey::Quality,
                (PropKey::Pressure, p),
                (PropKey::Enthalpy, h),
                fluid,
            )?;
            stream.set_quality(x)?;
            return Ok(());
        }
    }

    let t = oracle.query(
        PropKey::Temperature,
        (PropKey::Pressure, p),
        (PropKey::Enthalpy, h),
        fluid,
    )?;
    stream.set_temperature(t)?;
    Ok(())
}
