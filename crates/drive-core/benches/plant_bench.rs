// -------------------------------------------------------------------------
// SCPN Inverter Drive -- Plant Benchmark
// Per-tick cost of the power stage (SPWM vs SVPWM) and of the motor update
// under each load type.
// -------------------------------------------------------------------------

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use drive_core::inverter::InverterPowerStage;
use drive_core::motor::InductionMotor;
use drive_types::config::{InverterParams, MotorParams};
use drive_types::modes::{LoadType, PwmType};
use std::f64::consts::PI;
use std::hint::black_box;

fn signals_at(k: usize) -> [f64; 3] {
    let theta = 2.0 * PI * 50.0 * k as f64 * 1e-4;
    let shift = 2.0 * PI / 3.0;
    [
        0.5 * (1.0 + theta.sin()),
        0.5 * (1.0 + (theta - shift).sin()),
        0.5 * (1.0 + (theta + shift).sin()),
    ]
}

fn bench_power_stage(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverter_1000_ticks");
    for pwm in PwmType::ALL.iter().copied() {
        group.bench_with_input(BenchmarkId::new("pwm", pwm.label()), &pwm, |b, &pwm| {
            let mut stage = InverterPowerStage::new(InverterParams::default());
            b.iter(|| {
                for k in 0..1000 {
                    let v = stage.generate_phase_voltages(&signals_at(k), pwm, k as f64 * 1e-4);
                    black_box(v);
                }
            })
        });
    }
    group.finish();
}

fn bench_motor(c: &mut Criterion) {
    let mut group = c.benchmark_group("motor_1000_ticks");
    for load in LoadType::ALL.iter().copied() {
        group.bench_with_input(BenchmarkId::new("load", load.label()), &load, |b, &load| {
            let mut motor = InductionMotor::new(MotorParams::default());
            b.iter(|| {
                for k in 0..1000 {
                    let s = signals_at(k);
                    let v = s.map(|x| (2.0 * x - 1.0) * 300.0);
                    let i = v.map(|x| x / 0.501);
                    motor.update_state(&v, &i, load, 1e-4);
                }
                black_box(motor.speed());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_power_stage, bench_motor);
criterion_main!(benches);
