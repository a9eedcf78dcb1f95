// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Scalar V/f Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Open-loop volts-per-hertz with a PI frequency demand.
//!
//! The electrical frequency follows the demand but may move at most
//! `accel_rate·Δt/2π` per tick. Signals are `0.5·(1 + sin(ω·t ± 120°))`.

use drive_math::transforms::balanced_sine;
use drive_types::constants::BASE_FREQUENCY_HZ;
use std::f64::consts::PI;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarLaw {
    frequency: f64,
    voltage_command: f64,
}

impl ScalarLaw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slew the frequency toward `demand` and emit modulation signals.
    pub fn update(
        &mut self,
        demand: f64,
        accel_rate: f64,
        direction: f64,
        rated_voltage: f64,
        time: f64,
        dt: f64,
    ) -> [f64; 3] {
        let max_change = accel_rate * dt / (2.0 * PI);
        self.frequency = demand
            .min(self.frequency + max_change)
            .max(self.frequency - max_change);
        self.voltage_command = self.frequency * rated_voltage / BASE_FREQUENCY_HZ;

        let omega = 2.0 * PI * self.frequency * direction;
        balanced_sine(omega * time).map(|s| 0.5 * (1.0 + s))
    }

    /// Present electrical frequency [Hz].
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Volts-per-hertz voltage magnitude for the present frequency [V].
    pub fn voltage_command(&self) -> f64 {
        self.voltage_command
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
