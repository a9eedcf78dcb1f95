// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Fault Simulator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fault-injection layer between the power stage and the motor.
//!
//! Owns the fault lifecycle (thermal entry, manual inject/clear, timed
//! auto-reset) and rewrites the bridge output to emulate the active fault.
//! Timestamps are simulation time, so runs are reproducible.

use drive_types::constants::{
    FAULT_AUTO_RESET_DWELL, IGBT_FAILURE_DUTY_CYCLE, OVERCURRENT_VOLTAGE_SCALE,
    UNDERVOLTAGE_VOLTAGE_SCALE,
};
use drive_types::modes::{FaultKind, ProtectionMode};
use drive_types::state::Phases;
use rand::Rng;
use tracing::{info, warn};

/// Per-tick inputs observed by the fault layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultContext {
    pub auto_reset: bool,
    pub motor_temperature: f64,
    pub inverter_temperature: f64,
    pub max_temperature: f64,
    pub protection: ProtectionMode,
    /// Simulation time of this tick [s].
    pub time: f64,
}

#[derive(Debug, Clone)]
pub struct FaultSimulator {
    current: FaultKind,
    fault_time: f64,
    /// Time a fault must persist before auto-reset clears it [s].
    pub auto_reset_dwell: f64,
}

impl Default for FaultSimulator {
    fn default() -> Self {
        Self::new(FAULT_AUTO_RESET_DWELL)
    }
}

impl FaultSimulator {
    pub fn new(auto_reset_dwell: f64) -> Self {
        FaultSimulator {
            current: FaultKind::None,
            fault_time: 0.0,
            auto_reset_dwell,
        }
    }

    pub fn current_fault(&self) -> FaultKind {
        self.current
    }

    /// Time the present fault was (re)entered.
    pub fn fault_time(&self) -> f64 {
        self.fault_time
    }

    /// Force a fault tag. `FaultKind::None` is ignored; use [`clear_fault`].
    ///
    /// [`clear_fault`]: FaultSimulator::clear_fault
    pub fn inject_fault(&mut self, kind: FaultKind, time: f64) {
        if kind.is_active() {
            info!(fault = kind.label(), time, "fault injected");
            self.current = kind;
            self.fault_time = time;
        }
    }

    pub fn clear_fault(&mut self) {
        if self.current.is_active() {
            info!(fault = self.current.label(), "fault cleared");
        }
        self.current = FaultKind::None;
    }

    /// Advance the lifecycle for this tick and return the perturbed voltages.
    pub fn apply_faults<R: Rng + ?Sized>(
        &mut self,
        phase_voltages: &Phases,
        ctx: &FaultContext,
        rng: &mut R,
    ) -> Phases {
        let overheated = ctx.motor_temperature > ctx.max_temperature
            || ctx.inverter_temperature > ctx.max_temperature;
        if overheated {
            match ctx.protection {
                ProtectionMode::Shutdown => {
                    self.enter_overheat(ctx);
                    return [0.0; 3];
                }
                ProtectionMode::Warning => self.enter_overheat(ctx),
                ProtectionMode::None => {}
            }
        }

        if ctx.auto_reset
            && self.current.is_active()
            && ctx.time - self.fault_time > self.auto_reset_dwell
        {
            info!(fault = self.current.label(), time = ctx.time, "fault auto-reset");
            self.current = FaultKind::None;
        }

        let mut out = *phase_voltages;
        match self.current {
            FaultKind::None => {}
            FaultKind::Overcurrent => out.iter_mut().for_each(|v| *v *= OVERCURRENT_VOLTAGE_SCALE),
            FaultKind::Undervoltage => {
                out.iter_mut().for_each(|v| *v *= UNDERVOLTAGE_VOLTAGE_SCALE)
            }
            FaultKind::PhaseLoss => out[0] = 0.0,
            FaultKind::Overheat => {
                if ctx.protection == ProtectionMode::Shutdown {
                    out = [0.0; 3];
                }
            }
            FaultKind::IgbtFailure => {
                if rng.gen::<f64>() < IGBT_FAILURE_DUTY_CYCLE {
                    out[0] = 0.0;
                }
            }
        }
        out
    }

    fn enter_overheat(&mut self, ctx: &FaultContext) {
        if self.current != FaultKind::Overheat {
            warn!(
                time = ctx.time,
                motor_temperature = ctx.motor_temperature,
                inverter_temperature = ctx.inverter_temperature,
                max_temperature = ctx.max_temperature,
                protection = ctx.protection.label(),
                "over-temperature, entering overheat fault"
            );
            self.current = FaultKind::Overheat;
            self.fault_time = ctx.time;
        }
    }
}
