// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Property-Based Tests (proptest) for drive-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for drive-core using proptest.
//!
//! Covers: temperature and speed floors of the plant, fault-tag closure,
//! shutdown zeroing, clear-to-none.

use drive_core::faults::{FaultContext, FaultSimulator};
use drive_core::inverter::InverterPowerStage;
use drive_core::motor::InductionMotor;
use drive_types::config::{InverterParams, MotorParams};
use drive_types::constants::AMBIENT_TEMPERATURE;
use drive_types::modes::{FaultKind, LoadType, ProtectionMode, PwmType};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn any_load() -> impl Strategy<Value = LoadType> {
    prop::sample::select(LoadType::ALL.to_vec())
}

fn any_fault() -> impl Strategy<Value = FaultKind> {
    prop::sample::select(FaultKind::ALL.to_vec())
}

fn any_protection() -> impl Strategy<Value = ProtectionMode> {
    prop::sample::select(ProtectionMode::ALL.to_vec())
}

fn phases(limit: f64) -> impl Strategy<Value = [f64; 3]> {
    [-limit..limit, -limit..limit, -limit..limit]
}

proptest! {
    /// Speed never goes negative and temperature never drops below ambient.
    #[test]
    fn motor_floors_hold(
        load in any_load(),
        v in phases(400.0),
        i in phases(200.0),
        steps in 1usize..200,
    ) {
        let mut motor = InductionMotor::new(MotorParams::default());
        for _ in 0..steps {
            motor.update_state(&v, &i, load, 1e-4);
            prop_assert!(motor.speed() >= 0.0, "speed {}", motor.speed());
            prop_assert!(motor.temperature() >= AMBIENT_TEMPERATURE);
        }
    }

    /// The power stage only ever heats up from ambient.
    #[test]
    fn inverter_temperature_floor(
        s in [0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0],
        svm in any::<bool>(),
        steps in 1usize..100,
    ) {
        let pwm = if svm { PwmType::SpaceVector } else { PwmType::Sine };
        let mut stage = InverterPowerStage::new(InverterParams::default());
        for k in 0..steps {
            let out = stage.generate_phase_voltages(&s, pwm, k as f64 * 1e-4);
            prop_assert!(out.iter().all(|x| x.is_finite()));
            prop_assert!(stage.temperature() >= AMBIENT_TEMPERATURE);
        }
    }

    /// The fault tag stays inside the closed set, and clear returns to None.
    #[test]
    fn fault_lifecycle_is_closed(
        injected in any_fault(),
        protection in any_protection(),
        auto_reset in any::<bool>(),
        motor_t in 25.0f64..300.0,
        inverter_t in 25.0f64..300.0,
        v in phases(400.0),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut faults = FaultSimulator::default();
        faults.inject_fault(injected, 0.0);
        for k in 0..50 {
            let ctx = FaultContext {
                auto_reset,
                motor_temperature: motor_t,
                inverter_temperature: inverter_t,
                max_temperature: 150.0,
                protection,
                time: k as f64 * 0.1,
            };
            let out = faults.apply_faults(&v, &ctx, &mut rng);
            prop_assert!(FaultKind::ALL.contains(&faults.current_fault()));
            if protection == ProtectionMode::Shutdown
                && faults.current_fault() == FaultKind::Overheat
            {
                prop_assert_eq!(out, [0.0; 3]);
            }
        }
        faults.clear_fault();
        prop_assert_eq!(faults.current_fault(), FaultKind::None);
    }
}
