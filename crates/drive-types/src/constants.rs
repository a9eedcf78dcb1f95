// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Nominal logical timestep for electrical, mechanical and thermal updates (s).
pub const SIMULATION_TIME_STEP: f64 = 1e-4;

/// Ambient temperature (°C). Every thermal body is floored here.
pub const AMBIENT_TEMPERATURE: f64 = 25.0;

/// Celsius → Kelvin offset.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Stefan–Boltzmann constant (W/m²·K⁴).
pub const STEFAN_BOLTZMANN: f64 = 5.670367e-8;

/// Motor thermal body: painted frame, natural + forced convection.
pub const MOTOR_THERMAL_RESISTANCE: f64 = 0.1;
pub const MOTOR_THERMAL_CAPACITANCE: f64 = 5000.0;
pub const MOTOR_SURFACE_AREA: f64 = 1.0;
pub const MOTOR_EMISSIVITY: f64 = 0.85;
pub const MOTOR_CONVECTION_BASE: f64 = 15.0;
pub const MOTOR_CONVECTION_FAN_COEFF: f64 = 35.0;
pub const MOTOR_CONVECTION_COOLANT_COEFF: f64 = 25.0;

/// Inverter thermal body: heatsink with fan and cold plate.
pub const INVERTER_THERMAL_RESISTANCE: f64 = 0.05;
pub const INVERTER_THERMAL_CAPACITANCE: f64 = 2000.0;
pub const INVERTER_SURFACE_AREA: f64 = 0.5;
pub const INVERTER_EMISSIVITY: f64 = 0.8;
pub const INVERTER_CONVECTION_BASE: f64 = 10.0;
pub const INVERTER_CONVECTION_FAN_COEFF: f64 = 40.0;
pub const INVERTER_CONVECTION_COOLANT_COEFF: f64 = 20.0;

/// Switching loss coefficient: P_sw = f_pwm · K_SW · V_dc (W).
pub const SWITCHING_LOSS_COEFF: f64 = 1e-4;

/// Overmodulation gain on the modulation index.
pub const OVERMODULATION_GAIN: f64 = 1.15;

/// Amplitude of the injected third-harmonic term (normalized).
pub const HARMONIC_INJECTION_AMPLITUDE: f64 = 0.1;

/// Relative standard deviation of current-sensor noise.
pub const SENSOR_NOISE_STDDEV: f64 = 0.01;

/// Inductance weight in the sensor's winding impedance R + k·L.
pub const SENSOR_INDUCTANCE_WEIGHT: f64 = 0.1;

/// Fault voltage transforms.
pub const OVERCURRENT_VOLTAGE_SCALE: f64 = 1.5;
pub const UNDERVOLTAGE_VOLTAGE_SCALE: f64 = 0.5;

/// Probability per tick that a failed IGBT drops phase A.
pub const IGBT_FAILURE_DUTY_CYCLE: f64 = 0.3;

/// Dwell before an auto-reset clears an active fault (s of simulated time).
pub const FAULT_AUTO_RESET_DWELL: f64 = 2.0;

/// Load torque for the constant-torque load (Nm).
pub const CONSTANT_LOAD_TORQUE: f64 = 10.0;

/// Quadratic coefficient of the fan/pump load: τ = k·ω².
pub const FAN_PUMP_LOAD_COEFF: f64 = 0.1;

/// DTC hysteresis half-band as a fraction of the reference.
pub const DTC_HYSTERESIS_FRACTION: f64 = 0.05;

/// Base electrical frequency used to derive volts-per-hertz (Hz).
pub const BASE_FREQUENCY_HZ: f64 = 50.0;
