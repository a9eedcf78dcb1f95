// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — PI Loops
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Proportional-integral loop with a time-weighted integrator.

/// Speed loop gains.
pub const SPEED_KP: f64 = 0.1;
pub const SPEED_KI: f64 = 0.01;

/// Field-oriented inner torque loop gains.
pub const TORQUE_KP: f64 = 0.5;
pub const TORQUE_KI: f64 = 0.05;

/// Field-oriented inner flux loop gains.
pub const FLUX_KP: f64 = 0.3;
pub const FLUX_KI: f64 = 0.03;

#[derive(Debug, Clone, PartialEq)]
pub struct PiController {
    pub kp: f64,
    pub ki: f64,
    integral: f64,
}

impl PiController {
    pub fn new(kp: f64, ki: f64) -> Self {
        PiController { kp, ki, integral: 0.0 }
    }

    pub fn speed() -> Self {
        Self::new(SPEED_KP, SPEED_KI)
    }

    pub fn torque() -> Self {
        Self::new(TORQUE_KP, TORQUE_KI)
    }

    pub fn flux() -> Self {
        Self::new(FLUX_KP, FLUX_KI)
    }

    /// out = kp·e + ki·∫e dt, integrating before the output is formed.
    pub fn step(&mut self, error: f64, dt: f64) -> f64 {
        self.integral += error * dt;
        self.kp * error + self.ki * self.integral
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_zero_error() {
        let mut pi = PiController::new(1.0, 0.1);
        let out = pi.step(0.0, 1e-4);
        assert!(out.abs() < 1e-12, "Zero error → zero output: {out}");
    }

    #[test]
    fn test_pi_proportional() {
        let mut pi = PiController::new(2.0, 0.0);
        let out = pi.step(5.0, 1e-4);
        assert!((out - 10.0).abs() < 1e-12, "P-only: 2·5 = 10, got {out}");
    }

    #[test]
    fn test_pi_integral_weights_by_dt() {
        let mut pi = PiController::new(0.0, 1.0);
        for _ in 0..1000 {
            pi.step(2.0, 1e-3);
        }
        assert!((pi.integral() - 2.0).abs() < 1e-9, "∫2 dt over 1 s: {}", pi.integral());
        // Integration precedes the output.
        let mut fresh = PiController::new(0.0, 1.0);
        assert!((fresh.step(1.0, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pi_reset() {
        let mut pi = PiController::torque();
        pi.step(3.0, 0.1);
        pi.reset();
        assert_eq!(pi.integral(), 0.0);
    }
}
