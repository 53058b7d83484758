//! Heat-transfer correlations.
//!
//! Pure stateless functions; all inputs dimensionless or SI.

use crate::error::{ComponentError, ComponentResult};

/// Nusselt number for natural convection in a downward-facing cavity
/// receiver.
///
/// `theta` is the aperture angle in radians (0 horizontal, pi/2
/// vertically down); `d_ap` and `d_bar_cav` are the aperture and
/// effective cavity diameters.
pub fn nu_natural_convection(
    gr: f64,
    t_cav: f64,
    t_amb: f64,
    theta: f64,
    d_ap: f64,
    d_bar_cav: f64,
) -> f64 {
    let s = -0.982 * (d_ap / d_bar_cav) + 1.12;
    0.088
        * gr.powf(1.0 / 3.0)
        * (t_cav / t_amb).powf(0.18)
        * theta.cos().powf(2.47)
        * (d_ap / d_bar_cav).powf(s)
}

/// Nusselt number for forced convection inside a pipe, with the
/// Sieder-Tate viscosity correction `(mu / mu_wall)^0.14`.
pub fn nu_forced_pipe(re: f64, pr: f64, mu: f64, mu_wall: f64) -> f64 {
    0.027 * re.powf(0.8) * pr.powf(1.0 / 3.0) * (mu / mu_wall).powf(0.14)
}

/// Churchill-Bernstein correlation for flow perpendicular to a
/// circular cylinder.
pub fn nu_external_cylinder(re: f64, pr: f64) -> f64 {
    0.3 + 0.62 * re.sqrt() * pr.powf(1.0 / 3.0) / (1.0 + (0.4 / pr).powf(2.0 / 3.0)).powf(0.25)
        * (1.0 + (re / 282_000.0).powf(5.0 / 8.0)).powf(4.0 / 5.0)
}

/// Banded external-cylinder correlation `C Re^m Pr^n (Pr/Pr_wall)^0.25`
/// with coefficients switched on the Reynolds band. Valid for
/// `0.7 < Pr < 500` and `1 < Re < 10^6`; anything outside is rejected.
pub fn nu_external_cylinder_banded(re: f64, pr: f64, pr_wall: f64) -> ComponentResult<f64> {
    if !(0.7..500.0).contains(&pr) || !(1.0..1e6).contains(&re) {
        return Err(ComponentError::Precondition {
            what: "Reynolds or Prandtl number outside correlation range",
        });
    }
    let n = if pr > 10.0 { 0.36 } else { 0.37 };
    let (c, m) = if re < 40.0 {
        (0.75, 0.4)
    } else if re < 1000.0 {
        (0.51, 0.5)
    } else if re < 20_000.0 {
        (0.26, 0.6)
    } else {
        (0.076, 0.7)
    };
    Ok(c * re.powf(m) * pr.powf(n) * (pr / pr_wall).powf(0.25))
}
