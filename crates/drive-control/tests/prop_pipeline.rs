// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Property-Based Tests (proptest) for drive-control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests over the closed-loop tick pipeline.
//!
//! Covers: temperature/speed floors under arbitrary operator settings,
//! fault-tag closure, shutdown zeroing, DTC comparator range.

use drive_control::dtc::{flux_sector, hysteresis_state};
use drive_control::simulator::DriveSimulator;
use drive_types::config::DriveConfig;
use drive_types::constants::AMBIENT_TEMPERATURE;
use drive_types::modes::{ControlMode, FaultKind, LoadType, ProtectionMode, PwmType};
use proptest::prelude::*;

fn pick<T: Copy + std::fmt::Debug + 'static>(all: &'static [T]) -> impl Strategy<Value = T> {
    prop::sample::select(all.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pipeline_invariants(
        mode in pick(ControlMode::ALL),
        pwm in pick(PwmType::ALL),
        load in pick(LoadType::ALL),
        fault in pick(FaultKind::ALL),
        protection in pick(ProtectionMode::ALL),
        max_temperature in 25.0f64..200.0,
        fan_speed in 0.0f64..1.0,
        coolant_flow in 0.0f64..10.0,
        seed in any::<u64>(),
    ) {
        let mut cfg = DriveConfig::default();
        cfg.control.mode = mode;
        cfg.inverter.pwm_type = pwm;
        cfg.motor.load_type = load;
        cfg.initial_fault = fault;
        cfg.protection.mode = protection;
        cfg.protection.max_temperature = max_temperature;
        cfg.cooling.fan_speed = fan_speed;
        cfg.cooling.coolant_flow = coolant_flow;
        cfg.simulation.seed = seed;
        let mut sim = DriveSimulator::new(cfg).unwrap();

        for _ in 0..50 {
            let r = sim.step_once();
            prop_assert!(r.speed >= 0.0);
            prop_assert!(r.motor_temperature >= AMBIENT_TEMPERATURE);
            prop_assert!(r.inverter_temperature >= AMBIENT_TEMPERATURE);
            prop_assert!(FaultKind::ALL.contains(&r.fault));
            if r.fault == FaultKind::Overheat && protection == ProtectionMode::Shutdown {
                prop_assert_eq!(r.voltages, [0.0; 3]);
            }
        }
        sim.clear_fault();
        prop_assert_eq!(sim.current_fault(), FaultKind::None);
    }

    #[test]
    fn comparator_and_sector_ranges(error in -1e3f64..1e3, reference in 1e-3f64..1e3, angle in -10.0f64..10.0) {
        let s = hysteresis_state(error, reference);
        prop_assert!((-1..=1).contains(&s));
        prop_assert!((1..=6).contains(&flux_sector(angle)));
    }
}
