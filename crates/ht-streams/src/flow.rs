//! Shared mass-flow cell.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{StreamError, StreamResult};

/// Mass flow rate shared by reference between linked streams.
///
/// `flow_to` clones the handle, not the value: every stream linked
/// through it reads and writes the same cell, so a downstream flow
/// rate tracks the upstream one exactly. The aliasing is intentional.
#[derive(Debug, Clone)]
pub struct SharedFlow(Rc<Cell<f64>>);

impl SharedFlow {
    /// New cell at zero flow.
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(0.0)))
    }

    /// Current rate, kg/s.
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    /// Set the rate, kg/s. Visible through every linked handle.
    pub fn set(&self, rate: f64) -> StreamResult<()> {
        if !rate.is_finite() {
            return Err(StreamError::Domain {
                what: "non-finite flow rate",
            });
        }
        if rate < 0.0 {
            return Err(StreamError::Domain {
                what: "negative flow rate",
            });
        }
        self.0.set(rate);
        Ok(())
    }

    /// Whether two handles alias the same cell.
    pub fn is_linked_to(&self, other: &SharedFlow) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// An independent cell holding the same current value.
    pub fn detached(&self) -> Self {
        Self(Rc::new(Cell::new(self.0.get())))
    }
}

impl Default for SharedFlow {
    fn default() -> Self {
        Self::new()
    }
}
