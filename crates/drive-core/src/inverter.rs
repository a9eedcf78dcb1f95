// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Inverter Power Stage
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Two-level three-phase voltage-source inverter.
//!
//! Normalized modulation signals in [0, 1] become pole voltages through
//! either carrier-based sine PWM or space-vector modulation. Both paths share
//! the output scaling V_dc · (1 − t_dead·f_pwm) · m_eff, where
//! m_eff = m · 1.15 under overmodulation. The heatsink self-heats from
//! switching losses f_pwm · k_sw · V_dc on every call.

use drive_math::thermal::ThermalMass;
use drive_math::transforms::{clarke, AlphaBeta};
use drive_types::config::InverterParams;
use drive_types::constants::{
    HARMONIC_INJECTION_AMPLITUDE, OVERMODULATION_GAIN, SIMULATION_TIME_STEP, SWITCHING_LOSS_COEFF,
};
use drive_types::modes::PwmType;
use drive_types::state::{CoolingInputs, Phases};
use std::f64::consts::{FRAC_PI_3, PI};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Dwell times of one SVM period [s].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmDwell {
    /// Sector 0..=5, each 60° wide starting at the α axis.
    pub sector: usize,
    pub t1: f64,
    pub t2: f64,
    pub t0: f64,
    pub period: f64,
}

impl SvmDwell {
    /// Two-vector decomposition of `v` (volts) for a bridge on `v_dc`.
    ///
    /// m = |v|·√3/V_dc, T1 = m·T·sin(60° − γ), T2 = m·T·sin γ, T0 = T − T1 − T2,
    /// with γ the angle inside the sector. Beyond the hexagon the active
    /// times are rescaled to fill the period and T0 = 0.
    pub fn compute(v: AlphaBeta, v_dc: f64, pwm_frequency: f64) -> Self {
        let theta = v.angle();
        let sector = (theta / FRAC_PI_3).floor().rem_euclid(6.0) as usize % 6;
        let mut gamma = theta - sector as f64 * FRAC_PI_3;
        if gamma < 0.0 {
            gamma += 2.0 * PI;
        }
        let m = v.magnitude() * SQRT_3 / v_dc;
        let period = 1.0 / pwm_frequency;
        let mut t1 = m * period * (FRAC_PI_3 - gamma).sin();
        let mut t2 = m * period * gamma.sin();
        let active = t1 + t2;
        let t0 = if active > period {
            t1 *= period / active;
            t2 *= period / active;
            0.0
        } else {
            period - active
        };
        SvmDwell {
            sector,
            t1,
            t2,
            t0,
            period,
        }
    }

    /// Phase duty cycles with T0/2 placed symmetrically at both ends.
    pub fn duties(&self) -> Phases {
        let SvmDwell {
            sector,
            t1,
            t2,
            t0,
            period,
        } = *self;
        let half_zero = t0 / 2.0;
        let full = (t1 + t2 + half_zero) / period;
        let lead = (t1 + half_zero) / period;
        let trail = (t2 + half_zero) / period;
        let off = half_zero / period;
        match sector {
            0 => [full, trail, off],
            1 => [lead, full, off],
            2 => [off, full, trail],
            3 => [off, lead, full],
            4 => [trail, off, full],
            _ => [full, off, lead],
        }
    }
}

#[derive(Debug, Clone)]
pub struct InverterPowerStage {
    pub params: InverterParams,
    pub cooling: CoolingInputs,
    /// Thermal integration step, independent of the electrical step.
    pub thermal_step: f64,
    thermal: ThermalMass,
}

impl InverterPowerStage {
    pub fn new(params: InverterParams) -> Self {
        InverterPowerStage {
            params,
            cooling: CoolingInputs::default(),
            thermal_step: SIMULATION_TIME_STEP,
            thermal: ThermalMass::new(params.thermal),
        }
    }

    pub fn set_dc_link_voltage(&mut self, voltage: f64) {
        self.params.dc_link_voltage = voltage;
    }

    pub fn set_pwm_frequency(&mut self, frequency: f64) {
        self.params.pwm_frequency = frequency;
    }

    pub fn set_dead_time(&mut self, dead_time: f64) {
        self.params.dead_time = dead_time;
    }

    pub fn set_modulation_index(&mut self, index: f64) {
        self.params.modulation_index = index;
    }

    pub fn set_harmonic_injection(&mut self, enabled: bool) {
        self.params.harmonic_injection = enabled;
    }

    pub fn set_overmodulation(&mut self, enabled: bool) {
        self.params.overmodulation = enabled;
    }

    pub fn set_cooling(&mut self, cooling: CoolingInputs) {
        self.cooling = cooling;
    }

    /// Output gain applied to every normalized phase signal [V].
    pub fn output_gain(&self) -> f64 {
        let p = &self.params;
        let dead_time_factor = 1.0 - p.dead_time * p.pwm_frequency;
        let modulation_factor =
            p.modulation_index * if p.overmodulation { OVERMODULATION_GAIN } else { 1.0 };
        p.dc_link_voltage * dead_time_factor * modulation_factor
    }

    /// Instantaneous switching loss [W].
    pub fn switching_loss(&self) -> f64 {
        self.params.pwm_frequency * SWITCHING_LOSS_COEFF * self.params.dc_link_voltage
    }

    /// Synthesize phase voltages at simulation time `time` and self-heat.
    pub fn generate_phase_voltages(&mut self, signals: &Phases, pwm: PwmType, time: f64) -> Phases {
        let duties = match pwm {
            PwmType::Sine => *signals,
            PwmType::SpaceVector => self.space_vector_duties(signals),
        };

        let injection = if self.params.harmonic_injection {
            HARMONIC_INJECTION_AMPLITUDE * (3.0 * PI * self.params.pwm_frequency * time).sin()
        } else {
            0.0
        };
        let gain = self.output_gain();
        let voltages = duties.map(|d| (d + injection) * gain);

        let loss = self.switching_loss();
        self.thermal.advance(loss, &self.cooling, self.thermal_step);
        voltages
    }

    /// Remap duty inputs to a reference vector in volts and resolve it into
    /// phase duty cycles.
    pub fn space_vector_duties(&self, signals: &Phases) -> Phases {
        let v_dc = self.params.dc_link_voltage;
        let reference = signals.map(|s| (2.0 * s - 1.0) * v_dc / 2.0);
        SvmDwell::compute(clarke(&reference), v_dc, self.params.pwm_frequency).duties()
    }

    pub fn temperature(&self) -> f64 {
        self.thermal.temperature
    }

    pub fn dc_link_voltage(&self) -> f64 {
        self.params.dc_link_voltage
    }

    pub fn reset(&mut self) {
        self.thermal.reset();
    }
}
