// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Thermal Balance
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! First-order lumped-capacitance heat balance.
//!
//! Q_conv = h·A·(T − T_amb), Q_rad = ε·σ·A·(T_K⁴ − T_amb,K⁴),
//! T ← T + (Q_gen − (Q_conv + Q_rad)/C)·Δt, floored at T_amb.
//!
//! h = h_base + k_fan·fan + k_cool·coolant.

use drive_types::config::ThermalBodyParams;
use drive_types::constants::{AMBIENT_TEMPERATURE, KELVIN_OFFSET, STEFAN_BOLTZMANN};
use drive_types::state::CoolingInputs;
use serde::{Deserialize, Serialize};

/// Convective coefficient [W/m²·K] for the given body and cooling settings.
pub fn convection_coefficient(body: &ThermalBodyParams, cooling: &CoolingInputs) -> f64 {
    body.convection_base
        + body.convection_fan_coeff * cooling.fan_speed
        + body.convection_coolant_coeff * cooling.coolant_flow
}

/// Convective and radiative heat rejection [W] at temperature `t` (°C).
pub fn heat_rejection(
    body: &ThermalBodyParams,
    cooling: &CoolingInputs,
    t: f64,
    t_amb: f64,
) -> (f64, f64) {
    let h = convection_coefficient(body, cooling);
    let q_conv = h * body.surface_area * (t - t_amb);
    let t_k = t + KELVIN_OFFSET;
    let t_amb_k = t_amb + KELVIN_OFFSET;
    let q_rad = body.emissivity * STEFAN_BOLTZMANN * body.surface_area * (t_k.powi(4) - t_amb_k.powi(4));
    (q_conv, q_rad)
}

/// One explicit heat-balance step. Returns the new temperature.
///
/// `q_gen` is the already-scaled generation term; the rejection term is
/// divided by the capacitance. A non-finite intermediate collapses to ambient
/// through the floor.
pub fn heat_balance_step(
    q_gen: f64,
    t: f64,
    t_amb: f64,
    body: &ThermalBodyParams,
    cooling: &CoolingInputs,
    dt_thermal: f64,
) -> f64 {
    let (q_conv, q_rad) = heat_rejection(body, cooling, t, t_amb);
    let cooling_effect = (q_conv + q_rad) / body.capacitance;
    let next = t + (q_gen - cooling_effect) * dt_thermal;
    // f64::max discards NaN
    next.max(t_amb)
}

/// A thermal body with its present temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalMass {
    pub body: ThermalBodyParams,
    pub temperature: f64,
    pub ambient: f64,
}

impl ThermalMass {
    pub fn new(body: ThermalBodyParams) -> Self {
        ThermalMass {
            body,
            temperature: AMBIENT_TEMPERATURE,
            ambient: AMBIENT_TEMPERATURE,
        }
    }

    /// Scale a raw loss [W] into the generation term and advance one step.
    pub fn advance(&mut self, raw_loss: f64, cooling: &CoolingInputs, dt_thermal: f64) -> f64 {
        let q_gen = raw_loss * self.body.thermal_resistance;
        self.temperature = heat_balance_step(
            q_gen,
            self.temperature,
            self.ambient,
            &self.body,
            cooling,
            dt_thermal,
        );
        self.temperature
    }

    pub fn reset(&mut self) {
        self.temperature = self.ambient;
    }
}
