// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Current Sensors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Synthetic phase-current sensor.
//!
//! I = V / (R + 0.1·L), then I += N(0,1)·σ·I, then I *= scale.
//! A total sensor fault reads zero on every phase.

use drive_types::config::SensorConfig;
use drive_types::constants::{SENSOR_INDUCTANCE_WEIGHT, SENSOR_NOISE_STDDEV};
use drive_types::state::{MotorImpedance, Phases};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorModel {
    current_sensor_fault: bool,
    partial_failure_scale: f64,
    /// Relative noise σ.
    pub noise_stddev: f64,
}

impl Default for SensorModel {
    fn default() -> Self {
        SensorModel {
            current_sensor_fault: false,
            partial_failure_scale: 1.0,
            noise_stddev: SENSOR_NOISE_STDDEV,
        }
    }
}

impl SensorModel {
    pub fn from_config(cfg: &SensorConfig) -> Self {
        let mut sensor = SensorModel {
            current_sensor_fault: cfg.current_sensor_fault,
            noise_stddev: cfg.noise_stddev,
            ..SensorModel::default()
        };
        sensor.set_partial_failure_scale(cfg.partial_failure_scale);
        sensor
    }

    /// Measured phase currents for the given phase voltages.
    pub fn measure_currents<R: Rng + ?Sized>(
        &self,
        phase_voltages: &Phases,
        impedance: MotorImpedance,
        rng: &mut R,
    ) -> Phases {
        if self.current_sensor_fault {
            return [0.0; 3];
        }
        let z = impedance.resistance + SENSOR_INDUCTANCE_WEIGHT * impedance.inductance;
        phase_voltages.map(|v| {
            let ideal = v / z;
            let n: f64 = StandardNormal.sample(rng);
            (ideal + n * self.noise_stddev * ideal) * self.partial_failure_scale
        })
    }

    pub fn set_current_sensor_fault(&mut self, failed: bool) {
        if failed != self.current_sensor_fault {
            info!(failed, "current sensor fault flag changed");
        }
        self.current_sensor_fault = failed;
    }

    /// Set the partial-failure gain, clamped to [0, 1]. NaN reads as healthy.
    pub fn set_partial_failure_scale(&mut self, scale: f64) {
        self.partial_failure_scale = if scale.is_nan() { 1.0 } else { scale.clamp(0.0, 1.0) };
    }

    pub fn current_sensor_fault(&self) -> bool {
        self.current_sensor_fault
    }

    pub fn partial_failure_scale(&self) -> f64 {
        self.partial_failure_scale
    }
}
