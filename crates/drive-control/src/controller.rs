// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Controller
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mode-switched drive controller.
//!
//! The law is chosen per call. The speed integrator is shared by V/f and
//! FOC and, like the FOC inner loops, persists across mode switches.

use crate::dtc::DirectTorqueLaw;
use crate::foc::FieldOrientedLaw;
use crate::pid::PiController;
use crate::scalar::ScalarLaw;
use drive_types::config::ControlConfig;
use drive_types::constants::SIMULATION_TIME_STEP;
use drive_types::modes::{ControlMode, Direction, DtcVectorSelection};
use drive_types::state::{MotorSnapshot, Phases};
use serde::{Deserialize, Serialize};

/// Operator references read on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlReferences {
    pub speed_ref: f64,  // rad/s
    pub torque_ref: f64, // Nm
    pub flux_ref: f64,   // Wb
    pub accel_rate: f64, // rad/s²
    pub direction: Direction,
}

impl From<&ControlConfig> for ControlReferences {
    fn from(cfg: &ControlConfig) -> Self {
        ControlReferences {
            speed_ref: cfg.speed_ref,
            torque_ref: cfg.torque_ref,
            flux_ref: cfg.flux_ref,
            accel_rate: cfg.accel_rate,
            direction: cfg.direction,
        }
    }
}

impl Default for ControlReferences {
    fn default() -> Self {
        ControlReferences::from(&ControlConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    speed_loop: PiController,
    scalar: ScalarLaw,
    foc: FieldOrientedLaw,
    dtc: DirectTorqueLaw,
    /// Integration step of every PI loop [s].
    pub time_step: f64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&ControlConfig::default())
    }
}

impl Controller {
    pub fn new(cfg: &ControlConfig) -> Self {
        Controller {
            speed_loop: PiController::new(cfg.kp, cfg.ki),
            scalar: ScalarLaw::new(),
            foc: FieldOrientedLaw::new(),
            dtc: DirectTorqueLaw::new(cfg.dtc_selection),
            time_step: SIMULATION_TIME_STEP,
        }
    }

    /// Replace the speed-loop gains; the integrator is kept.
    pub fn set_gains(&mut self, kp: f64, ki: f64) {
        self.speed_loop.kp = kp;
        self.speed_loop.ki = ki;
    }

    pub fn gains(&self) -> (f64, f64) {
        (self.speed_loop.kp, self.speed_loop.ki)
    }

    pub fn set_dtc_selection(&mut self, selection: DtcVectorSelection) {
        self.dtc.selection = selection;
    }

    /// Normalized modulation signals for this tick.
    pub fn update_control(
        &mut self,
        mode: ControlMode,
        refs: &ControlReferences,
        motor: &MotorSnapshot,
        time: f64,
    ) -> Phases {
        let dt = self.time_step;
        let direction = refs.direction.sign();
        match mode {
            ControlMode::Scalar => {
                let demand = self.speed_loop.step(refs.speed_ref - motor.speed, dt);
                self.scalar
                    .update(demand, refs.accel_rate, direction, motor.rated_voltage, time, dt)
            }
            ControlMode::FieldOriented => {
                let torque_demand = self.speed_loop.step(refs.speed_ref - motor.speed, dt);
                self.foc.update(
                    torque_demand,
                    refs.flux_ref,
                    refs.speed_ref,
                    direction,
                    motor,
                    time,
                    dt,
                )
            }
            ControlMode::DirectTorque => self.dtc.update(refs.torque_ref, refs.flux_ref, motor),
        }
    }

    pub fn scalar(&self) -> &ScalarLaw {
        &self.scalar
    }

    pub fn field_oriented(&self) -> &FieldOrientedLaw {
        &self.foc
    }

    pub fn direct_torque(&self) -> &DirectTorqueLaw {
        &self.dtc
    }

    /// Clear every integrator and the V/f frequency.
    pub fn reset(&mut self) {
        self.speed_loop.reset();
        self.scalar.reset();
        self.foc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn standstill() -> MotorSnapshot {
        MotorSnapshot {
            speed: 0.0,
            torque: 0.0,
            rotor_flux: 1.0,
            id: 0.0,
            iq: 0.0,
            vd: 0.0,
            vq: 0.0,
            temperature: 25.0,
            resistance: 0.5,
            effective_resistance: 0.5,
            inductance: 0.01,
            rated_voltage: 230.0,
            pole_pairs: 2.0,
        }
    }

    #[test]
    fn test_vf_first_tick_is_slew_limited() {
        let mut c = Controller::default();
        let refs = ControlReferences::default();
        c.update_control(ControlMode::Scalar, &refs, &standstill(), 0.0);
        let expected = 10.0 * 1e-4 / (2.0 * PI);
        assert!((c.scalar().frequency() - expected).abs() < 1e-15,
            "freq after one tick: {}", c.scalar().frequency());
    }

    #[test]
    fn test_signals_in_unit_range_for_continuous_modes() {
        let mut c = Controller::default();
        let refs = ControlReferences::default();
        for k in 0..200 {
            let t = k as f64 * 1e-4;
            for mode in [ControlMode::Scalar, ControlMode::FieldOriented] {
                let s = c.update_control(mode, &refs, &standstill(), t);
                assert!(s.iter().all(|x| (0.0..=1.0).contains(x)), "{mode}: {s:?}");
            }
        }
    }

    #[test]
    fn test_speed_integrator_shared_between_vf_and_foc() {
        let mut a = Controller::default();
        let mut b = Controller::default();
        let refs = ControlReferences::default();
        let m = standstill();
        a.update_control(ControlMode::Scalar, &refs, &m, 0.0);
        a.update_control(ControlMode::FieldOriented, &refs, &m, 1e-4);
        b.update_control(ControlMode::FieldOriented, &refs, &m, 0.0);
        b.update_control(ControlMode::FieldOriented, &refs, &m, 1e-4);
        assert!((a.speed_loop.integral() - b.speed_loop.integral()).abs() < 1e-15,
            "a V/f tick advances the same speed integrator FOC reads");
        assert!((a.speed_loop.integral() - 2.0 * 100.0 * 1e-4).abs() < 1e-15);
    }

    #[test]
    fn test_dtc_ignores_speed_loop() {
        let mut c = Controller::default();
        let refs = ControlReferences::default();
        c.update_control(ControlMode::DirectTorque, &refs, &standstill(), 0.0);
        assert_eq!(c.speed_loop.integral(), 0.0);
        assert_eq!(c.direct_torque().states(), (0, 1), "flux on target, torque short");
    }

    #[test]
    fn test_set_gains_keeps_integrator() {
        let mut c = Controller::default();
        let refs = ControlReferences::default();
        c.update_control(ControlMode::Scalar, &refs, &standstill(), 0.0);
        let before = c.speed_loop.integral();
        c.set_gains(1.0, 0.5);
        assert_eq!(c.gains(), (1.0, 0.5));
        assert_eq!(c.speed_loop.integral(), before);
        c.reset();
        assert_eq!(c.speed_loop.integral(), 0.0);
        assert_eq!(c.scalar().frequency(), 0.0);
    }
}
