// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Candidates
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Parameter vectors, their objectives and Pareto dominance.

use serde::{Deserialize, Serialize};

pub const N_PARAMETERS: usize = 4;
pub const N_OBJECTIVES: usize = 3;

/// Gene names in vector order.
pub const PARAMETER_NAMES: [&str; N_PARAMETERS] =
    ["pwm_frequency", "modulation_index", "fan_speed", "coolant_flow"];

/// Objective names in vector order; all are minimized.
pub const OBJECTIVE_NAMES: [&str; N_OBJECTIVES] =
    ["power_loss", "peak_temperature", "speed_deviation"];

/// Inclusive (min, max) per gene.
pub const PARAMETER_BOUNDS: [(f64, f64); N_PARAMETERS] = [
    (2_000.0, 20_000.0), // Hz
    (0.1, 1.0),
    (0.0, 1.0),
    (0.0, 10.0), // L/min
];

pub type Parameters = [f64; N_PARAMETERS];
pub type Objectives = [f64; N_OBJECTIVES];

/// Clamp every gene into [`PARAMETER_BOUNDS`].
pub fn clamp_to_bounds(mut parameters: Parameters) -> Parameters {
    for (x, &(lo, hi)) in parameters.iter_mut().zip(PARAMETER_BOUNDS.iter()) {
        *x = if x.is_nan() { lo } else { x.clamp(lo, hi) };
    }
    parameters
}

/// `a` is no worse on every objective and strictly better on one.
pub fn dominates(a: &Objectives, b: &Objectives) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b.iter()) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub parameters: Parameters,
    pub objectives: Objectives,
    /// Pareto front index, 1 = non-dominated. 0 until sorted.
    pub rank: usize,
    pub crowding_distance: f64,
}

impl Individual {
    pub fn new(parameters: Parameters) -> Self {
        Individual {
            parameters: clamp_to_bounds(parameters),
            objectives: [f64::MAX; N_OBJECTIVES],
            rank: 0,
            crowding_distance: 0.0,
        }
    }

    pub fn dominates(&self, other: &Individual) -> bool {
        dominates(&self.objectives, &other.objectives)
    }

    pub fn pwm_frequency(&self) -> f64 {
        self.parameters[0]
    }

    pub fn modulation_index(&self) -> f64 {
        self.parameters[1]
    }

    pub fn fan_speed(&self) -> f64 {
        self.parameters[2]
    }

    pub fn coolant_flow(&self) -> f64 {
        self.parameters[3]
    }
}
