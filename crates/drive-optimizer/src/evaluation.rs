// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Candidate Evaluation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fitness of one parameter vector.
//!
//! Every evaluation builds its own [`DriveSimulator`] from a fixed stress
//! scenario: V/f at 100 rad/s, SVPWM, constant load, a forced overcurrent,
//! warning-level thermal protection with auto-reset. Objectives are the
//! per-step mean power loss, the peak body temperature and the per-step
//! mean |ω − 100|.

use crate::individual::{Objectives, Parameters, N_OBJECTIVES};
use drive_control::simulator::DriveSimulator;
use drive_types::config::DriveConfig;
use drive_types::error::DriveResult;
use drive_types::modes::{ControlMode, Direction, FaultKind, LoadType, ProtectionMode, PwmType};
use drive_types::state::CoolingInputs;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Speed the scenario regulates to [rad/s].
pub const SCENARIO_SPEED_REF: f64 = 100.0;

/// The evaluation scenario with the candidate's genes applied.
pub fn scenario_config(parameters: &Parameters, seed: u64) -> DriveConfig {
    let mut cfg = DriveConfig::default();
    cfg.simulation.seed = seed;

    cfg.control.mode = ControlMode::Scalar;
    cfg.control.speed_ref = SCENARIO_SPEED_REF;
    cfg.control.torque_ref = 50.0;
    cfg.control.flux_ref = 1.0;
    cfg.control.accel_rate = 10.0;
    cfg.control.direction = Direction::Forward;

    cfg.inverter.pwm_type = PwmType::SpaceVector;
    cfg.inverter.pwm_frequency = parameters[0];
    cfg.inverter.modulation_index = parameters[1];
    cfg.cooling = CoolingInputs {
        fan_speed: parameters[2],
        coolant_flow: parameters[3],
    };

    cfg.motor.load_type = LoadType::Constant;
    cfg.protection.mode = ProtectionMode::Warning;
    cfg.protection.max_temperature = 150.0;
    cfg.protection.auto_reset = true;
    cfg.initial_fault = FaultKind::Overcurrent;
    cfg
}

/// Replace non-finite objectives with `f64::MAX` so they rank last.
pub fn sanitize(objectives: Objectives) -> Objectives {
    objectives.map(|o| if o.is_finite() { o } else { f64::MAX })
}

/// Run the scenario for `duration` simulated seconds.
pub fn evaluate_candidate(parameters: &Parameters, duration: f64, seed: u64) -> DriveResult<Objectives> {
    let mut sim = DriveSimulator::new(scenario_config(parameters, seed))?;
    let report = sim.run(duration);
    let objectives = sanitize([
        report.mean_power_loss,
        report.peak_temperature(),
        report.mean_abs_speed_error,
    ]);
    debug!(
        pwm_frequency = parameters[0],
        modulation_index = parameters[1],
        fan_speed = parameters[2],
        coolant_flow = parameters[3],
        power_loss = objectives[0],
        peak_temperature = objectives[1],
        speed_deviation = objectives[2],
        "candidate evaluated"
    );
    Ok(objectives)
}

/// Stream seed for candidate `index` of `generation`.
pub fn candidate_seed(seed: u64, generation: usize, index: usize) -> u64 {
    // SplitMix64 finalizer over the packed coordinates.
    let mut z = seed
        ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Evaluate a batch, on the rayon pool when `parallel` is set. Results are
/// identical either way. A candidate that cannot be built is maximally unfit.
pub fn evaluate_batch(
    candidates: &[Parameters],
    duration: f64,
    seed: u64,
    generation: usize,
    parallel: bool,
) -> Vec<Objectives> {
    let eval = |(index, p): (usize, &Parameters)| {
        evaluate_candidate(p, duration, candidate_seed(seed, generation, index)).unwrap_or_else(|e| {
            warn!(error = %e, generation, index, "candidate rejected");
            [f64::MAX; N_OBJECTIVES]
        })
    };
    if parallel {
        candidates.par_iter().enumerate().map(eval).collect()
    } else {
        candidates.iter().enumerate().map(eval).collect()
    }
}
