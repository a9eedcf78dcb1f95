// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Induction Motor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electromechanical and thermal model of a squirrel-cage induction motor.
//!
//! One call to [`InductionMotor::update_state`] advances the machine by a
//! fixed step:
//! 1. lumped heat balance from I²R losses (thermal step),
//! 2. temperature-compensated winding resistance,
//! 3. fixed Clarke projection of phase voltages/currents to d/q,
//! 4. τ = 1.5·p·ψ·iq,
//! 5. dψ/dt = −ψ/L + id,
//! 6. load torque by load type,
//! 7. explicit integration of shaft speed, floored at zero.

use drive_math::thermal::ThermalMass;
use drive_math::transforms::clarke;
use drive_types::config::MotorParams;
use drive_types::constants::{CONSTANT_LOAD_TORQUE, FAN_PUMP_LOAD_COEFF, SIMULATION_TIME_STEP};
use drive_types::modes::LoadType;
use drive_types::state::{CoolingInputs, MotorSnapshot, Phases};

/// Rotor flux at start-up [Wb].
const INITIAL_ROTOR_FLUX: f64 = 1.0;

/// Opposing load torque [Nm] at shaft speed `speed`.
pub fn load_torque(load: LoadType, speed: f64) -> f64 {
    match load {
        LoadType::Constant => CONSTANT_LOAD_TORQUE,
        LoadType::FanPump => FAN_PUMP_LOAD_COEFF * speed * speed,
        LoadType::Inertia => 0.0,
    }
}

#[derive(Debug, Clone)]
pub struct InductionMotor {
    pub params: MotorParams,
    pub cooling: CoolingInputs,
    /// Thermal integration step, independent of the mechanical step.
    pub thermal_step: f64,
    thermal: ThermalMass,
    speed: f64,
    torque: f64,
    rotor_flux: f64,
    id: f64,
    iq: f64,
    vd: f64,
    vq: f64,
    effective_resistance: f64,
}

impl InductionMotor {
    pub fn new(params: MotorParams) -> Self {
        InductionMotor {
            params,
            cooling: CoolingInputs::default(),
            thermal_step: SIMULATION_TIME_STEP,
            thermal: ThermalMass::new(params.thermal),
            speed: 0.0,
            torque: 0.0,
            rotor_flux: INITIAL_ROTOR_FLUX,
            id: 0.0,
            iq: 0.0,
            vd: 0.0,
            vq: 0.0,
            effective_resistance: params.resistance,
        }
    }

    /// Replace nameplate/drivetrain parameters; dynamic state is kept.
    pub fn set_parameters(&mut self, params: MotorParams) {
        self.params = params;
        self.thermal.body = params.thermal;
    }

    pub fn set_cooling(&mut self, cooling: CoolingInputs) {
        self.cooling = cooling;
    }

    /// Advance one step of `time_step` seconds. Never fails; callers keep
    /// inductance and inertia positive.
    pub fn update_state(
        &mut self,
        phase_voltages: &Phases,
        phase_currents: &Phases,
        load: LoadType,
        time_step: f64,
    ) {
        self.update_temperature(phase_currents);

        let ambient = self.thermal.ambient;
        self.effective_resistance = self.params.resistance
            * (1.0 + self.params.temp_coefficient * (self.thermal.temperature - ambient));

        let v = clarke(phase_voltages);
        let i = clarke(phase_currents);
        self.vq = v.alpha;
        self.vd = v.beta;
        self.iq = i.alpha;
        self.id = i.beta;

        let poles = self.params.pole_pairs as f64;
        self.torque = 1.5 * poles * self.rotor_flux * self.iq;

        self.rotor_flux += time_step * (-self.rotor_flux / self.params.inductance + self.id);

        let tau_load = load_torque(load, self.speed);
        let total_inertia = self.params.load_inertia + self.params.shaft_inertia;
        let coupling = self.params.coupling_stiffness * self.speed * time_step;
        let viscous = (self.params.damping + self.params.friction) * self.speed;
        let acceleration = (self.torque - tau_load - viscous - coupling) / total_inertia;
        // f64::max discards NaN
        self.speed = (self.speed + acceleration * time_step).max(0.0);
    }

    fn update_temperature(&mut self, phase_currents: &Phases) {
        let i_sq: f64 = phase_currents.iter().map(|i| i * i).sum();
        let copper_loss = i_sq * self.params.resistance;
        self.thermal
            .advance(copper_loss, &self.cooling, self.thermal_step);
    }

    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            speed: self.speed,
            torque: self.torque,
            rotor_flux: self.rotor_flux,
            id: self.id,
            iq: self.iq,
            vd: self.vd,
            vq: self.vq,
            temperature: self.thermal.temperature,
            resistance: self.params.resistance,
            effective_resistance: self.effective_resistance,
            inductance: self.params.inductance,
            rated_voltage: self.params.rated_voltage,
            pole_pairs: self.params.pole_pairs as f64,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn torque(&self) -> f64 {
        self.torque
    }

    pub fn rotor_flux(&self) -> f64 {
        self.rotor_flux
    }

    pub fn temperature(&self) -> f64 {
        self.thermal.temperature
    }

    pub fn effective_resistance(&self) -> f64 {
        self.effective_resistance
    }

    /// Return to the start-up state: standstill, ambient, initial flux.
    pub fn reset(&mut self) {
        *self = InductionMotor {
            cooling: self.cooling,
            thermal_step: self.thermal_step,
            ..InductionMotor::new(self.params)
        };
    }
}
