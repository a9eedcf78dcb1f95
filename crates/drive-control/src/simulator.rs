// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Closed-Loop Drive Simulator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-step tick pipeline over a private instance set.
//!
//! Each tick: controller → power stage → fault layer → current sensor →
//! motor. Stages exchange plain values; the motor snapshot taken at the top
//! of the tick is what the controller and the sensor see.

use crate::controller::{ControlReferences, Controller};
use crate::telemetry::TickRecord;
use drive_core::faults::{FaultContext, FaultSimulator};
use drive_core::inverter::InverterPowerStage;
use drive_core::motor::InductionMotor;
use drive_diagnostics::sensors::SensorModel;
use drive_types::config::{DriveConfig, ProtectionConfig};
use drive_types::error::DriveResult;
use drive_types::modes::{ControlMode, FaultKind, LoadType, PwmType};
use drive_types::state::CoolingInputs;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Aggregates over one [`DriveSimulator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub steps: usize,
    pub duration_s: f64,
    pub final_speed: f64,
    pub final_torque: f64,
    pub peak_motor_temperature: f64,
    pub peak_inverter_temperature: f64,
    /// Σ loss / steps [W].
    pub mean_power_loss: f64,
    /// Σ |ω − ω*| / steps [rad/s].
    pub mean_abs_speed_error: f64,
    /// Simulated time with a non-`None` fault [s].
    pub faulted_time_s: f64,
    pub final_fault: FaultKind,
}

impl RunReport {
    /// Hottest body over the run, never below the starting ambient.
    pub fn peak_temperature(&self) -> f64 {
        self.peak_motor_temperature.max(self.peak_inverter_temperature)
    }
}

#[derive(Debug, Clone)]
pub struct DriveSimulator {
    pub controller: Controller,
    pub inverter: InverterPowerStage,
    pub faults: FaultSimulator,
    pub sensor: SensorModel,
    pub motor: InductionMotor,
    pub mode: ControlMode,
    pub pwm: PwmType,
    pub load: LoadType,
    pub references: ControlReferences,
    pub protection: ProtectionConfig,
    time_step: f64,
    time: f64,
    steps: usize,
    rng: StdRng,
}

impl DriveSimulator {
    pub fn new(config: DriveConfig) -> DriveResult<Self> {
        config.validate()?;
        let sim = &config.simulation;

        let mut controller = Controller::new(&config.control);
        controller.time_step = sim.time_step;

        let mut inverter = InverterPowerStage::new(config.inverter);
        inverter.thermal_step = sim.thermal_step;
        inverter.set_cooling(config.cooling);

        let mut motor = InductionMotor::new(config.motor);
        motor.thermal_step = sim.thermal_step;
        motor.set_cooling(config.cooling);

        let mut faults = FaultSimulator::new(config.protection.auto_reset_dwell);
        faults.inject_fault(config.initial_fault, 0.0);

        debug!(
            mode = config.control.mode.label(),
            pwm = config.inverter.pwm_type.label(),
            load = config.motor.load_type.label(),
            seed = sim.seed,
            "drive simulator constructed"
        );

        Ok(DriveSimulator {
            controller,
            inverter,
            faults,
            sensor: SensorModel::from_config(&config.sensor),
            motor,
            mode: config.control.mode,
            pwm: config.inverter.pwm_type,
            load: config.motor.load_type,
            references: ControlReferences::from(&config.control),
            protection: config.protection,
            time_step: sim.time_step,
            time: 0.0,
            steps: 0,
            rng: StdRng::seed_from_u64(sim.seed),
        })
    }

    /// Advance one tick and return what it published.
    pub fn step_once(&mut self) -> TickRecord {
        let t = self.time;
        let snapshot = self.motor.snapshot();

        let signals = self
            .controller
            .update_control(self.mode, &self.references, &snapshot, t);
        let bridge = self.inverter.generate_phase_voltages(&signals, self.pwm, t);

        let ctx = FaultContext {
            auto_reset: self.protection.auto_reset,
            motor_temperature: self.motor.temperature(),
            inverter_temperature: self.inverter.temperature(),
            max_temperature: self.protection.max_temperature,
            protection: self.protection.mode,
            time: t,
        };
        let voltages = self.faults.apply_faults(&bridge, &ctx, &mut self.rng);
        let currents = self
            .sensor
            .measure_currents(&voltages, snapshot.impedance(), &mut self.rng);

        self.motor
            .update_state(&voltages, &currents, self.load, self.time_step);

        let conduction: f64 = currents.iter().map(|i| i * i * snapshot.resistance).sum();
        let record = TickRecord {
            time: t,
            voltages,
            currents,
            speed: self.motor.speed(),
            torque: self.motor.torque(),
            control_mode: self.mode,
            fault: self.faults.current_fault(),
            motor_temperature: self.motor.temperature(),
            inverter_temperature: self.inverter.temperature(),
            power_loss: self.inverter.switching_loss() + conduction,
        };

        self.steps += 1;
        self.time = self.steps as f64 * self.time_step;
        record
    }

    /// Run `duration` seconds of simulated time, calling `observe` per tick.
    pub fn run_with<F: FnMut(&TickRecord)>(&mut self, duration: f64, mut observe: F) -> RunReport {
        let steps = (duration / self.time_step).round().max(0.0) as usize;
        let mut loss_sum = 0.0;
        let mut speed_err_sum = 0.0;
        let mut faulted_steps = 0usize;
        let mut peak_motor = self.motor.temperature();
        let mut peak_inverter = self.inverter.temperature();

        for _ in 0..steps {
            let record = self.step_once();
            loss_sum += record.power_loss;
            speed_err_sum += (record.speed - self.references.speed_ref).abs();
            if record.fault.is_active() {
                faulted_steps += 1;
            }
            peak_motor = peak_motor.max(record.motor_temperature);
            peak_inverter = peak_inverter.max(record.inverter_temperature);
            observe(&record);
        }

        let n = steps.max(1) as f64;
        RunReport {
            steps,
            duration_s: steps as f64 * self.time_step,
            final_speed: self.motor.speed(),
            final_torque: self.motor.torque(),
            peak_motor_temperature: peak_motor,
            peak_inverter_temperature: peak_inverter,
            mean_power_loss: loss_sum / n,
            mean_abs_speed_error: speed_err_sum / n,
            faulted_time_s: faulted_steps as f64 * self.time_step,
            final_fault: self.faults.current_fault(),
        }
    }

    pub fn run(&mut self, duration: f64) -> RunReport {
        self.run_with(duration, |_| {})
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn current_fault(&self) -> FaultKind {
        self.faults.current_fault()
    }

    pub fn inject_fault(&mut self, kind: FaultKind) {
        self.faults.inject_fault(kind, self.time);
    }

    pub fn clear_fault(&mut self) {
        self.faults.clear_fault();
    }

    /// Same fan and coolant settings for both thermal bodies.
    pub fn set_cooling(&mut self, cooling: CoolingInputs) {
        self.motor.set_cooling(cooling);
        self.inverter.set_cooling(cooling);
    }

    pub fn set_gains(&mut self, kp: f64, ki: f64) {
        self.controller.set_gains(kp, ki);
    }

    /// Back to t = 0 with the present parameters; the RNG stream continues.
    pub fn reset(&mut self) {
        self.motor.reset();
        self.inverter.reset();
        self.controller.reset();
        self.faults.clear_fault();
        self.time = 0.0;
        self.steps = 0;
    }
}
