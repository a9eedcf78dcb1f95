// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// One value per phase, ordered A, B, C.
pub type Phases = [f64; 3];

/// Published motor state, passed by value between pipeline stages.
/// Controllers and the fault layer read this instead of the motor itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorSnapshot {
    pub speed: f64,       // rad/s, >= 0
    pub torque: f64,      // Nm
    pub rotor_flux: f64,  // Wb
    pub id: f64,          // direct-axis current [A]
    pub iq: f64,          // quadrature-axis current [A]
    pub vd: f64,          // direct-axis voltage [V]
    pub vq: f64,          // quadrature-axis voltage [V]
    pub temperature: f64, // °C, >= ambient
    pub resistance: f64,  // nameplate winding resistance [Ω]
    pub effective_resistance: f64,
    pub inductance: f64, // [H]
    pub rated_voltage: f64,
    pub pole_pairs: f64,
}

/// Winding impedance terms the current sensor needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorImpedance {
    pub resistance: f64,
    pub inductance: f64,
}

impl MotorSnapshot {
    /// Nameplate impedance. The temperature-compensated resistance stays
    /// inside the motor's own dynamics.
    pub fn impedance(&self) -> MotorImpedance {
        MotorImpedance {
            resistance: self.resistance,
            inductance: self.inductance,
        }
    }
}

/// Cooling actuator settings shared by the motor and inverter bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingInputs {
    /// Fan speed, 0..1.
    pub fan_speed: f64,
    /// Coolant flow [L/min], 0..10.
    pub coolant_flow: f64,
}

impl Default for CoolingInputs {
    fn default() -> Self {
        CoolingInputs {
            fan_speed: 0.5,
            coolant_flow: 5.0,
        }
    }
}
