// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::*;
use crate::error::{DriveError, DriveResult};
use crate::modes::{
    ControlMode, Direction, DtcVectorSelection, FaultKind, LoadType, ProtectionMode, PwmType,
};
use crate::state::CoolingInputs;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level drive configuration.
///
/// Every section and field has a default matching the control panel's
/// start-up values, so a partial JSON file (or `{}`) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub simulation: SimulationConfig,
    pub motor: MotorParams,
    pub inverter: InverterParams,
    pub cooling: CoolingInputs,
    pub control: ControlConfig,
    pub protection: ProtectionConfig,
    pub sensor: SensorConfig,
    /// Fault selected by the operator at start-up (injected on construction).
    pub initial_fault: FaultKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Electrical/mechanical integration step [s].
    pub time_step: f64,
    /// Thermal integration step [s], independent of `time_step`.
    pub thermal_step: f64,
    /// Seed for the simulator's random source.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            time_step: SIMULATION_TIME_STEP,
            thermal_step: SIMULATION_TIME_STEP,
            seed: 2026,
        }
    }
}

/// Lumped thermal body parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalBodyParams {
    /// Surface area [m²].
    pub surface_area: f64,
    pub emissivity: f64,
    /// Natural-convection coefficient [W/m²·K].
    pub convection_base: f64,
    /// Added per unit fan speed.
    pub convection_fan_coeff: f64,
    /// Added per L/min of coolant.
    pub convection_coolant_coeff: f64,
    /// Thermal capacitance [J/°C].
    pub capacitance: f64,
    /// Scales the raw loss into the heat-generation term [°C/W].
    pub thermal_resistance: f64,
}

impl ThermalBodyParams {
    pub fn motor() -> Self {
        ThermalBodyParams {
            surface_area: MOTOR_SURFACE_AREA,
            emissivity: MOTOR_EMISSIVITY,
            convection_base: MOTOR_CONVECTION_BASE,
            convection_fan_coeff: MOTOR_CONVECTION_FAN_COEFF,
            convection_coolant_coeff: MOTOR_CONVECTION_COOLANT_COEFF,
            capacitance: MOTOR_THERMAL_CAPACITANCE,
            thermal_resistance: MOTOR_THERMAL_RESISTANCE,
        }
    }

    pub fn inverter() -> Self {
        ThermalBodyParams {
            surface_area: INVERTER_SURFACE_AREA,
            emissivity: INVERTER_EMISSIVITY,
            convection_base: INVERTER_CONVECTION_BASE,
            convection_fan_coeff: INVERTER_CONVECTION_FAN_COEFF,
            convection_coolant_coeff: INVERTER_CONVECTION_COOLANT_COEFF,
            capacitance: INVERTER_THERMAL_CAPACITANCE,
            thermal_resistance: INVERTER_THERMAL_RESISTANCE,
        }
    }

    fn validate(&self, body: &str) -> DriveResult<()> {
        if !(self.surface_area.is_finite() && self.surface_area > 0.0) {
            return Err(DriveError::ConfigError(format!(
                "{body}.surface_area must be finite and > 0"
            )));
        }
        if !(0.0..=1.0).contains(&self.emissivity) {
            return Err(DriveError::ConfigError(format!(
                "{body}.emissivity must lie in [0, 1]"
            )));
        }
        if !(self.capacitance.is_finite() && self.capacitance > 0.0) {
            return Err(DriveError::ConfigError(format!(
                "{body}.capacitance must be finite and > 0"
            )));
        }
        if !self.thermal_resistance.is_finite() || self.thermal_resistance < 0.0 {
            return Err(DriveError::ConfigError(format!(
                "{body}.thermal_resistance must be finite and >= 0"
            )));
        }
        Ok(())
    }
}

/// Partial thermal body as it appears in JSON; missing fields fall back
/// to the defaults of the owning body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThermalBodyOverrides {
    surface_area: Option<f64>,
    emissivity: Option<f64>,
    convection_base: Option<f64>,
    convection_fan_coeff: Option<f64>,
    convection_coolant_coeff: Option<f64>,
    capacitance: Option<f64>,
    thermal_resistance: Option<f64>,
}

impl ThermalBodyOverrides {
    fn over(self, base: ThermalBodyParams) -> ThermalBodyParams {
        ThermalBodyParams {
            surface_area: self.surface_area.unwrap_or(base.surface_area),
            emissivity: self.emissivity.unwrap_or(base.emissivity),
            convection_base: self.convection_base.unwrap_or(base.convection_base),
            convection_fan_coeff: self.convection_fan_coeff.unwrap_or(base.convection_fan_coeff),
            convection_coolant_coeff: self
                .convection_coolant_coeff
                .unwrap_or(base.convection_coolant_coeff),
            capacitance: self.capacitance.unwrap_or(base.capacitance),
            thermal_resistance: self.thermal_resistance.unwrap_or(base.thermal_resistance),
        }
    }
}

fn motor_thermal<'de, D: Deserializer<'de>>(d: D) -> Result<ThermalBodyParams, D::Error> {
    ThermalBodyOverrides::deserialize(d).map(|o| o.over(ThermalBodyParams::motor()))
}

fn inverter_thermal<'de, D: Deserializer<'de>>(d: D) -> Result<ThermalBodyParams, D::Error> {
    ThermalBodyOverrides::deserialize(d).map(|o| o.over(ThermalBodyParams::inverter()))
}

/// Induction motor nameplate and drivetrain parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParams {
    pub rated_voltage: f64, // V
    pub rated_power: f64,   // kW
    pub pole_pairs: u32,
    pub resistance: f64, // Ω
    pub inductance: f64, // H
    pub load_type: LoadType,
    pub load_inertia: f64,  // kg·m²
    pub damping: f64,       // Nm·s/rad
    pub shaft_inertia: f64, // kg·m²
    pub friction: f64,      // Nm·s/rad
    pub temp_coefficient: f64, // 1/°C
    pub coupling_stiffness: f64, // Nm/rad
    #[serde(deserialize_with = "motor_thermal")]
    pub thermal: ThermalBodyParams,
}

impl Default for MotorParams {
    fn default() -> Self {
        MotorParams {
            rated_voltage: 230.0,
            rated_power: 5.0,
            pole_pairs: 2,
            resistance: 0.5,
            inductance: 0.01,
            load_type: LoadType::Constant,
            load_inertia: 0.1,
            damping: 0.01,
            shaft_inertia: 0.05,
            friction: 0.01,
            temp_coefficient: 0.005,
            coupling_stiffness: 5000.0,
            thermal: ThermalBodyParams::motor(),
        }
    }
}

impl MotorParams {
    pub fn validate(&self) -> DriveResult<()> {
        if !(self.inductance.is_finite() && self.inductance > 0.0) {
            return Err(DriveError::ConfigError(
                "motor.inductance must be finite and > 0".to_string(),
            ));
        }
        if !(self.resistance.is_finite() && self.resistance > 0.0) {
            return Err(DriveError::ConfigError(
                "motor.resistance must be finite and > 0".to_string(),
            ));
        }
        if self.pole_pairs == 0 {
            return Err(DriveError::ConfigError(
                "motor.pole_pairs must be >= 1".to_string(),
            ));
        }
        let inertia = self.load_inertia + self.shaft_inertia;
        if !(inertia.is_finite() && inertia > 0.0) {
            return Err(DriveError::ConfigError(
                "motor.load_inertia + motor.shaft_inertia must be > 0".to_string(),
            ));
        }
        if !(self.rated_voltage.is_finite() && self.rated_voltage > 0.0) {
            return Err(DriveError::ConfigError(
                "motor.rated_voltage must be finite and > 0".to_string(),
            ));
        }
        self.thermal.validate("motor.thermal")
    }
}

/// Power stage settings. Applied by the operator or optimizer before each
/// synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverterParams {
    pub dc_link_voltage: f64, // V
    pub pwm_frequency: f64,   // Hz
    pub dead_time: f64,       // s
    pub modulation_index: f64,
    pub harmonic_injection: bool,
    pub overmodulation: bool,
    pub pwm_type: PwmType,
    #[serde(deserialize_with = "inverter_thermal")]
    pub thermal: ThermalBodyParams,
}

impl Default for InverterParams {
    fn default() -> Self {
        InverterParams {
            dc_link_voltage: 400.0,
            pwm_frequency: 10_000.0,
            dead_time: 1e-6,
            modulation_index: 0.8,
            harmonic_injection: false,
            overmodulation: false,
            pwm_type: PwmType::Sine,
            thermal: ThermalBodyParams::inverter(),
        }
    }
}

impl InverterParams {
    pub fn validate(&self) -> DriveResult<()> {
        if !(self.dc_link_voltage.is_finite() && self.dc_link_voltage > 0.0) {
            return Err(DriveError::ConfigError(
                "inverter.dc_link_voltage must be finite and > 0".to_string(),
            ));
        }
        if !(self.pwm_frequency.is_finite() && self.pwm_frequency > 0.0) {
            return Err(DriveError::ConfigError(
                "inverter.pwm_frequency must be finite and > 0".to_string(),
            ));
        }
        if !self.dead_time.is_finite()
            || self.dead_time < 0.0
            || self.dead_time * self.pwm_frequency >= 1.0
        {
            return Err(DriveError::ConfigError(
                "inverter.dead_time must be >= 0 and shorter than one PWM period".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.modulation_index) {
            return Err(DriveError::ConfigError(
                "inverter.modulation_index must lie in [0, 1]".to_string(),
            ));
        }
        self.thermal.validate("inverter.thermal")
    }
}

/// Operator references and loop gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub mode: ControlMode,
    pub kp: f64,
    pub ki: f64,
    pub speed_ref: f64,  // rad/s
    pub torque_ref: f64, // Nm
    pub flux_ref: f64,   // Wb
    pub accel_rate: f64, // rad/s²
    pub direction: Direction,
    pub dtc_selection: DtcVectorSelection,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            mode: ControlMode::Scalar,
            kp: 0.1,
            ki: 0.01,
            speed_ref: 100.0,
            torque_ref: 50.0,
            flux_ref: 1.0,
            accel_rate: 10.0,
            direction: Direction::Forward,
            dtc_selection: DtcVectorSelection::FixedTable,
        }
    }
}

impl ControlConfig {
    /// Boundary check: DTC hysteresis divides by the references, so both
    /// must be strictly positive before the core sees them.
    pub fn validate(&self) -> DriveResult<()> {
        for (name, value) in [
            ("kp", self.kp),
            ("ki", self.ki),
            ("speed_ref", self.speed_ref),
            ("torque_ref", self.torque_ref),
            ("flux_ref", self.flux_ref),
            ("accel_rate", self.accel_rate),
        ] {
            if !value.is_finite() {
                return Err(DriveError::InvalidReference(format!(
                    "control.{name} must be finite"
                )));
            }
        }
        if self.flux_ref <= 0.0 {
            return Err(DriveError::InvalidReference(
                "control.flux_ref must be > 0".to_string(),
            ));
        }
        if self.torque_ref <= 0.0 {
            return Err(DriveError::InvalidReference(
                "control.torque_ref must be > 0".to_string(),
            ));
        }
        if self.speed_ref < 0.0 || self.accel_rate < 0.0 {
            return Err(DriveError::InvalidReference(
                "control.speed_ref and control.accel_rate must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Trip threshold applied to both motor and inverter [°C].
    pub max_temperature: f64,
    pub mode: ProtectionMode,
    pub auto_reset: bool,
    /// Auto-reset dwell [s of simulated time].
    pub auto_reset_dwell: f64,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        ProtectionConfig {
            max_temperature: 150.0,
            mode: ProtectionMode::Warning,
            auto_reset: false,
            auto_reset_dwell: FAULT_AUTO_RESET_DWELL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Total current-sensor loss: every reading is zero.
    pub current_sensor_fault: bool,
    /// Gain of a partially failed sensor, 0..1 (1 = healthy).
    pub partial_failure_scale: f64,
    pub noise_stddev: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            current_sensor_fault: false,
            partial_failure_scale: 1.0,
            noise_stddev: SENSOR_NOISE_STDDEV,
        }
    }
}

impl DriveConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> DriveResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DriveResult<()> {
        let sim = &self.simulation;
        if !(sim.time_step.is_finite() && sim.time_step > 0.0) {
            return Err(DriveError::ConfigError(
                "simulation.time_step must be finite and > 0".to_string(),
            ));
        }
        if !(sim.thermal_step.is_finite() && sim.thermal_step > 0.0) {
            return Err(DriveError::ConfigError(
                "simulation.thermal_step must be finite and > 0".to_string(),
            ));
        }
        self.motor.validate()?;
        self.inverter.validate()?;
        self.control.validate()?;
        if !(0.0..=1.0).contains(&self.cooling.fan_speed) || self.cooling.coolant_flow < 0.0 {
            return Err(DriveError::ConfigError(
                "cooling.fan_speed must lie in [0, 1] and coolant_flow >= 0".to_string(),
            ));
        }
        if !self.protection.max_temperature.is_finite() {
            return Err(DriveError::ConfigError(
                "protection.max_temperature must be finite".to_string(),
            ));
        }
        if !self.protection.auto_reset_dwell.is_finite() || self.protection.auto_reset_dwell < 0.0
        {
            return Err(DriveError::ConfigError(
                "protection.auto_reset_dwell must be finite and >= 0".to_string(),
            ));
        }
        if !self.sensor.noise_stddev.is_finite() || self.sensor.noise_stddev < 0.0 {
            return Err(DriveError::ConfigError(
                "sensor.noise_stddev must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// NSGA-II search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_prob: f64,
    /// Per-gene mutation probability.
    pub mutation_prob: f64,
    /// Mutation σ as a fraction of each gene's range.
    pub mutation_sigma: f64,
    pub tournament_size: usize,
    /// Simulated seconds per candidate evaluation.
    pub evaluation_duration: f64,
    pub seed: u64,
    /// Evaluate candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            population_size: 50,
            generations: 100,
            crossover_prob: 0.9,
            mutation_prob: 0.1,
            mutation_sigma: 0.1,
            tournament_size: 2,
            evaluation_duration: 1.0,
            seed: 42,
            parallel: true,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> DriveResult<()> {
        if self.population_size < 2 {
            return Err(DriveError::ConfigError(
                "population_size must be >= 2".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(DriveError::ConfigError(
                "tournament_size must be >= 1".to_string(),
            ));
        }
        for (name, p) in [
            ("crossover_prob", self.crossover_prob),
            ("mutation_prob", self.mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(DriveError::ConfigError(format!(
                    "{name} must lie in [0, 1]"
                )));
            }
        }
        if !self.mutation_sigma.is_finite() || self.mutation_sigma < 0.0 {
            return Err(DriveError::ConfigError(
                "mutation_sigma must be finite and >= 0".to_string(),
            ));
        }
        if !(self.evaluation_duration.is_finite() && self.evaluation_duration > 0.0) {
            return Err(DriveError::ConfigError(
                "evaluation_duration must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}
