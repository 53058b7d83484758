use crate::HtError;

/// Floating point type used throughout the system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HtError::NonFinite { what, value: v })
    }
}

/// Logarithmic mean of two same-sign values, used for counter-flow
/// temperature differences.
///
/// Equal arguments return the common value (the limit of the expression).
/// Opposite signs fold onto `(-a, b)`; a zero argument has no log mean.
pub fn log_mean(a: Real, b: Real) -> Result<Real, HtError> {
    if a == b {
        return Ok(a);
    }
    let prod = a * b;
    if prod > 0.0 {
        Ok((a - b) / (a / b).ln())
    } else if prod < 0.0 {
        log_mean(-a, b)
    } else {
        Err(HtError::InvalidArg {
            what: "log mean of zero",
        })
    }
}
