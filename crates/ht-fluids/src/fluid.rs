//! Working fluid catalog.
//!
//! A closed set of fluids: every component in the plant moves one of
//! these. The catalog carries the backend routing (HEOS for real
//! fluids, INCOMP for the heat-transfer oil) so callers never spell
//! out CoolProp backend strings themselves.

use std::fmt;
use std::str::FromStr;

use crate::error::FluidError;

/// Working fluids the plant models know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fluid {
    /// Water / steam, the power-block working fluid.
    Water,
    /// Dry air, the dish receiver working fluid.
    Air,
    /// Therminol VP-1 heat-transfer oil (incompressible backend).
    Tvp1,
    /// Toluene, an ORC candidate.
    Toluene,
    /// R123 refrigerant, an ORC candidate.
    R123,
}

impl Fluid {
    /// CoolProp backend for this fluid.
    pub fn backend(self) -> &'static str {
        match self {
            Fluid::Tvp1 => "INCOMP",
            _ => "HEOS",
        }
    }

    /// CoolProp fluid name.
    pub fn name(self) -> &'static str {
        match self {
            Fluid::Water => "Water",
            Fluid::Air => "Air",
            Fluid::Tvp1 => "TVP1",
            Fluid::Toluene => "Toluene",
            Fluid::R123 => "R123",
        }
    }

    /// Incompressible fluids have no saturation dome; quality is
    /// meaningless for them.
    pub fn is_incompressible(self) -> bool {
        matches!(self, Fluid::Tvp1)
    }

    /// All catalog entries.
    pub const ALL: [Fluid; 5] = [
        Fluid::Water,
        Fluid::Air,
        Fluid::Tvp1,
        Fluid::Toluene,
        Fluid::R123,
    ];
}

impl fmt::Display for Fluid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fluid {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Water" | "water" => Ok(Fluid::Water),
            "Air" | "air" => Ok(Fluid::Air),
            "TVP1" | "tvp1" | "INCOMP::TVP1" => Ok(Fluid::Tvp1),
            "Toluene" | "toluene" => Ok(Fluid::Toluene),
            "R123" | "r123" => Ok(Fluid::R123),
            _ => Err(FluidError::InvalidArg {
                what: "unknown fluid name",
            }),
        }
    }
}
