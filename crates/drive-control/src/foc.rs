// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Field-Oriented Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Inner torque/flux PI loops and the inverse rotating-frame transform.
//!
//! vq = PI_τ(τ* − τ), vd = PI_ψ(ψ* − ψ), θ = 2π·ω*·t·dir.
//! Phase commands are divided by their peak magnitude (when non-zero) and
//! mapped to `0.5·(1 + v)`.

use crate::pid::PiController;
use drive_math::transforms::inverse_park;
use drive_types::state::MotorSnapshot;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldOrientedLaw {
    pub torque_loop: PiController,
    pub flux_loop: PiController,
    vd: f64,
    vq: f64,
}

impl Default for FieldOrientedLaw {
    fn default() -> Self {
        FieldOrientedLaw {
            torque_loop: PiController::torque(),
            flux_loop: PiController::flux(),
            vd: 0.0,
            vq: 0.0,
        }
    }
}

impl FieldOrientedLaw {
    pub fn new() -> Self {
        Self::default()
    }

    /// `torque_demand` is the speed-loop output.
    pub fn update(
        &mut self,
        torque_demand: f64,
        flux_ref: f64,
        speed_ref: f64,
        direction: f64,
        motor: &MotorSnapshot,
        time: f64,
        dt: f64,
    ) -> [f64; 3] {
        self.vq = self.torque_loop.step(torque_demand - motor.torque, dt);
        self.vd = self.flux_loop.step(flux_ref - motor.rotor_flux, dt);

        let theta = 2.0 * PI * speed_ref * time * direction;
        let mut v = inverse_park(self.vd, self.vq, theta);
        let peak = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        if peak > 0.0 {
            v.iter_mut().for_each(|x| *x /= peak);
        }
        v.map(|x| 0.5 * (1.0 + x))
    }

    /// Last (vd, vq) commands.
    pub fn dq_commands(&self) -> (f64, f64) {
        (self.vd, self.vq)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
