//! Counter-flow heat exchanger.
//!
//! No free unknowns: each of the four endpoints follows algebraically
//! from the other three by energy conservation, with an effectiveness
//! factor `eta` charging transfer losses to the hot side
//! (`Q_cold = eta * Q_hot`). Pressure is carried through unchanged.

use ht_streams::Stream;

use crate::common::assign_state_from_enthalpy;
use crate::error::{ComponentError, ComponentResult};

/// Heat exchanger between a hot and a cold stream.
pub struct HeatExchanger {
    pub hot_in: Stream,
    pub hot_out: Stream,
    pub cold_in: Stream,
    pub cold_out: Stream,
    /// Transfer effectiveness in (0, 1].
    pub effectiveness: f64,
}

impl HeatExchanger {
    /// Build from caller-prepared streams.
    pub fn new(
        hot_in: Stream,
        hot_out: Stream,
        cold_in: Stream,
        cold_out: Stream,
        effectiveness: f64,
    ) -> ComponentResult<Self> {
        if !(effectiveness > 0.0 && effectiveness <= 1.0) {
            return Err(ComponentError::InvalidArg {
                what: "effectiveness must be in (0, 1]",
            });
        }
        Ok(Self {
            hot_in,
            hot_out,
            cold_in,
            cold_out,
            effectiveness,
        })
    }

    /// Heat picked up by the cold side, W.
    fn q_cold(&self) -> ComponentResult<f64> {
        Ok(self.cold_in.flow_rate() * (self.cold_out.enthalpy()? - self.cold_in.enthalpy()?))
    }

    /// Heat given up by the hot side, W.
    fn q_hot(&self) -> ComponentResult<f64> {
        Ok(self.hot_in.flow_rate() * (self.hot_in.enthalpy()? - self.hot_out.enthalpy()?))
    }

    /// Compute the hot outlet from the other three endpoints.
    pub fn calc_hot_outlet(&mut self) -> ComponentResult<()> {
        let m_h = positive_flow(self.hot_in.flow_rate(), "hot-side flow rate must be positive")?;
        self.hot_in.flow_to(&mut self.hot_out);
        self.hot_out.set_pressure(self.hot_in.pressure()?)?;
        let h = self.hot_in.enthalpy()? - self.q_cold()? / (m_h * self.effectiveness);
        assign_state_from_enthalpy(&mut self.hot_out, h)
    }

    /// Compute the hot inlet from the other three endpoints.
    pub fn calc_hot_inlet(&mut self) -> ComponentResult<()> {
        let m_h = positive_flow(self.hot_out.flow_rate(), "hot-side flow rate must be positive")?;
        self.hot_out.flow_to(&mut self.hot_in);
        self.hot_in.set_pressure(self.hot_out.pressure()?)?;
        let h = self.hot_out.enthalpy()? + self.q_cold()? / (m_h * self.effectiveness);
        assign_state_from_enthalpy(&mut self.hot_in, h)
    }

    /// Compute the cold outlet from the other three endpoints.
    pub fn calc_cold_outlet(&mut self) -> ComponentResult<()> {
        let m_c = positive_flow(self.cold_in.flow_rate(), "cold-side flow rate must be positive")?;
        self.cold_in.flow_to(&mut self.cold_out);
        self.cold_out.set_pressure(self.cold_in.pressure()?)?;
        let h = self.cold_in.enthalpy()? + self.q_hot()? * self.effectiveness / m_c;
        assign_state_from_enthalpy(&mut self.cold_out, h)
    }

    /// Compute the cold inlet from the other three endpoints.
    pub fn calc_cold_inlet(&mut self) -> ComponentResult<()> {
        let m_c = positive_flow(self.cold_out.flow_rate(), "cold-side flow rate must be positive")?;
        self.cold_out.flow_to(&mut self.cold_in);
        self.cold_in.set_pressure(self.cold_out.pressure()?)?;
        let h = self.cold_out.enthalpy()? - self.q_hot()? * self.effectiveness / m_c;
        assign_state_from_enthalpy(&mut self.cold_in, h)
    }
}

/// Endpoint closures divide by the flow on the side being solved; a
/// fresh stream still carries zero flow.
fn positive_flow(rate: f64, what: &'static str) -> ComponentResult<f64> {
    if rate > 0.0 {
        Ok(rate)
    } else {
        Err(ComponentError::Precondition { what })
    }
}
