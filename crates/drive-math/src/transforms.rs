// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Reference-Frame Transforms
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Clarke and inverse-Park transforms for three-phase quantities.

use drive_types::state::Phases;
use std::f64::consts::PI;

const FRAC_1_SQRT_3: f64 = 0.577_350_269_189_625_8;

/// Two-axis stationary components (amplitude-invariant).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaBeta {
    pub alpha: f64,
    pub beta: f64,
}

impl AlphaBeta {
    pub fn magnitude(&self) -> f64 {
        self.alpha.hypot(self.beta)
    }

    /// Angle in (−π, π].
    pub fn angle(&self) -> f64 {
        self.beta.atan2(self.alpha)
    }
}

/// Clarke transform: α = ⅔(a − ½(b + c)), β = (b − c)/√3.
///
/// The motor model reads α as the quadrature axis and β as the direct axis
/// (fixed projection, no rotor-angle tracking).
pub fn clarke(abc: &Phases) -> AlphaBeta {
    AlphaBeta {
        alpha: (2.0 / 3.0) * (abc[0] - 0.5 * (abc[1] + abc[2])),
        beta: FRAC_1_SQRT_3 * (abc[1] - abc[2]),
    }
}

/// Inverse Park from rotating d/q commands at angle θ to three phases.
pub fn inverse_park(d: f64, q: f64, theta: f64) -> Phases {
    let shift = 2.0 * PI / 3.0;
    [
        d * theta.cos() - q * theta.sin(),
        d * (theta - shift).cos() - q * (theta - shift).sin(),
        d * (theta + shift).cos() - q * (theta + shift).sin(),
    ]
}

/// Balanced three-phase sinusoid of unit amplitude at angle θ.
pub fn balanced_sine(theta: f64) -> Phases {
    let shift = 2.0 * PI / 3.0;
    [theta.sin(), (theta - shift).sin(), (theta + shift).sin()]
}
