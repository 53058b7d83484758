//! ht-components: solar-thermal plant component models.
//!
//! Each component couples one or more [`ht_streams::Stream`]s through
//! energy balances:
//!
//! - [`DishCollector`] — parabolic dish with a coiled-pipe cavity
//!   receiver; three coupled residuals solved by Newton iteration.
//! - [`TroughCollector`] — parabolic trough with a vacuum absorber;
//!   closed-form performance plus an integer row-count search.
//! - [`HeatExchanger`] — counter-flow exchanger; each missing endpoint
//!   follows algebraically from the other three.
//! - [`Turbine`] — steam turbine with part-load isentropic efficiency
//!   and an extraction split.
//!
//! Collector models implement [`EnergyBalanceModel`] and are driven by
//! `ht-solver`; residual evaluation mutates the model's streams, so at
//! most one residual evaluation per model may be in flight.

pub mod ambient;
pub mod common;
pub mod correlations;
pub mod dish;
pub mod error;
pub mod heat_exchanger;
pub mod traits;
pub mod trough;
pub mod turbine;

pub use ambient::Ambient;
pub use dish::{AirPipe, DishCollector, DishGeometry, InsulationLayer};
pub use error::{ComponentError, ComponentResult};
pub use heat_exchanger::HeatExchanger;
pub use traits::{solve_energy_balance, EnergyBalanceModel};
pub use trough::{TroughCollector, TroughConfig};
pub use turbine::{Turbine, TurbineDesign};
