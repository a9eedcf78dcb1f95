// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Direct Torque Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hysteresis comparators and switching-vector selection.
//!
//! Torque and flux errors are quantized to {−1, 0, +1} with a band of ±5% of
//! the reference. The stator-flux angle `atan2(L·iq, ψr + L·id)` selects a
//! 60° sector. With [`DtcVectorSelection::FixedTable`] the sector is only
//! reported; [`DtcVectorSelection::SectorAware`] uses the classic six-sector
//! table.

use drive_types::constants::DTC_HYSTERESIS_FRACTION;
use drive_types::modes::DtcVectorSelection;
use drive_types::state::{MotorSnapshot, Phases};
use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};

/// Phase voltage an active bridge leg maps onto [V].
pub const DTC_VECTOR_VOLTAGE: f64 = 230.0;

/// The eight bridge states. `V1..V6` step by 60° starting on phase A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwitchingVector {
    #[default]
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
}

impl SwitchingVector {
    /// Upper-switch states for phases A, B, C.
    pub fn pattern(self) -> [u8; 3] {
        match self {
            SwitchingVector::V0 => [0, 0, 0],
            SwitchingVector::V1 => [1, 0, 0],
            SwitchingVector::V2 => [1, 1, 0],
            SwitchingVector::V3 => [0, 1, 0],
            SwitchingVector::V4 => [0, 1, 1],
            SwitchingVector::V5 => [0, 0, 1],
            SwitchingVector::V6 => [1, 0, 1],
            SwitchingVector::V7 => [1, 1, 1],
        }
    }

    /// Active vector `k`, wrapped into 1..=6.
    pub fn active(k: i32) -> Self {
        match (k - 1).rem_euclid(6) {
            0 => SwitchingVector::V1,
            1 => SwitchingVector::V2,
            2 => SwitchingVector::V3,
            3 => SwitchingVector::V4,
            4 => SwitchingVector::V5,
            _ => SwitchingVector::V6,
        }
    }

    pub fn is_zero(self) -> bool {
        matches!(self, SwitchingVector::V0 | SwitchingVector::V7)
    }
}

/// Three-level comparator: 0 inside ±5% of `reference`, else the error sign.
pub fn hysteresis_state(error: f64, reference: f64) -> i8 {
    if error.abs() > DTC_HYSTERESIS_FRACTION * reference {
        if error > 0.0 {
            1
        } else {
            -1
        }
    } else {
        0
    }
}

/// Stator-flux angle estimate in (−π, π].
pub fn stator_flux_angle(motor: &MotorSnapshot) -> f64 {
    let psi_d = motor.rotor_flux + motor.inductance * motor.id;
    let psi_q = motor.inductance * motor.iq;
    psi_q.atan2(psi_d)
}

/// Sector 1..=6, sector `k` centred on active vector `Vk`.
pub fn flux_sector(angle: f64) -> u8 {
    let k = ((angle + FRAC_PI_6) / FRAC_PI_3).floor() as i64;
    k.rem_euclid(6) as u8 + 1
}

/// Single (flux, torque) table; the sector plays no part.
pub fn fixed_table(flux_state: i8, torque_state: i8) -> SwitchingVector {
    use SwitchingVector::*;
    match (flux_state, torque_state) {
        (1, 1) => V2,
        (1, 0) => V7,
        (1, _) => V6,
        (0, 1) => V3,
        (0, 0) => V0,
        (0, _) => V5,
        (_, 1) => V4,
        (_, 0) => V0,
        _ => V4,
    }
}

/// Classic six-sector table. A flux state of 0 is treated as "raise flux".
pub fn sector_table(sector: u8, flux_state: i8, torque_state: i8) -> SwitchingVector {
    let k = sector as i32;
    match (flux_state >= 0, torque_state) {
        (true, 1) => SwitchingVector::active(k + 1),
        (true, 0) => SwitchingVector::V7,
        (true, _) => SwitchingVector::active(k - 1),
        (false, 1) => SwitchingVector::active(k + 2),
        (false, 0) => SwitchingVector::V0,
        (false, _) => SwitchingVector::active(k - 2),
    }
}

/// Modulation signals for a bridge state: `0.5·(1 + s·230/(V_rated/√3))`.
pub fn vector_signals(vector: SwitchingVector, rated_voltage: f64) -> Phases {
    let phase_rated = rated_voltage / 3.0_f64.sqrt();
    vector
        .pattern()
        .map(|s| 0.5 * (1.0 + s as f64 * DTC_VECTOR_VOLTAGE / phase_rated))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectTorqueLaw {
    pub selection: DtcVectorSelection,
    flux_state: i8,
    torque_state: i8,
    sector: u8,
    vector: SwitchingVector,
}

impl DirectTorqueLaw {
    pub fn new(selection: DtcVectorSelection) -> Self {
        DirectTorqueLaw {
            selection,
            ..Self::default()
        }
    }

    pub fn update(&mut self, torque_ref: f64, flux_ref: f64, motor: &MotorSnapshot) -> Phases {
        self.torque_state = hysteresis_state(torque_ref - motor.torque, torque_ref);
        self.flux_state = hysteresis_state(flux_ref - motor.rotor_flux, flux_ref);
        self.sector = flux_sector(stator_flux_angle(motor));
        self.vector = match self.selection {
            DtcVectorSelection::FixedTable => fixed_table(self.flux_state, self.torque_state),
            DtcVectorSelection::SectorAware => {
                sector_table(self.sector, self.flux_state, self.torque_state)
            }
        };
        vector_signals(self.vector, motor.rated_voltage)
    }

    /// Last (flux, torque) comparator states.
    pub fn states(&self) -> (i8, i8) {
        (self.flux_state, self.torque_state)
    }

    pub fn sector(&self) -> u8 {
        self.sector
    }

    pub fn vector(&self) -> SwitchingVector {
        self.vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn snapshot(torque: f64, rotor_flux: f64, id: f64, iq: f64) -> MotorSnapshot {
        MotorSnapshot {
            speed: 0.0,
            torque,
            rotor_flux,
            id,
            iq,
            vd: 0.0,
            vq: 0.0,
            temperature: 25.0,
            resistance: 0.5,
            effective_resistance: 0.5,
            inductance: 0.01,
            rated_voltage: 230.0,
            pole_pairs: 2.0,
        }
    }

    #[test]
    fn test_hysteresis_band() {
        assert_eq!(hysteresis_state(2.4, 50.0), 0, "inside ±2.5");
        assert_eq!(hysteresis_state(2.6, 50.0), 1);
        assert_eq!(hysteresis_state(-2.6, 50.0), -1);
        assert_eq!(hysteresis_state(-0.04, 1.0), 0);
    }

    #[test]
    fn test_fixed_table_entries() {
        use SwitchingVector::*;
        let expected = [
            ((1, 1), V2), ((1, 0), V7), ((1, -1), V6),
            ((0, 1), V3), ((0, 0), V0), ((0, -1), V5),
            ((-1, 1), V4), ((-1, 0), V0), ((-1, -1), V4),
        ];
        for ((f, t), v) in expected {
            assert_eq!(fixed_table(f, t), v, "flux {f}, torque {t}");
        }
    }

    #[test]
    fn test_vector_patterns_step_sixty_degrees() {
        for k in 1..=6 {
            let p = SwitchingVector::active(k).pattern();
            let next = SwitchingVector::active(k + 1).pattern();
            let changed = p.iter().zip(next.iter()).filter(|(a, b)| a != b).count();
            assert_eq!(changed, 1, "adjacent vectors differ in one leg: V{k}");
        }
        assert_eq!(SwitchingVector::active(0), SwitchingVector::V6);
        assert_eq!(SwitchingVector::active(8), SwitchingVector::V2);
    }

    #[test]
    fn test_sector_boundaries() {
        assert_eq!(flux_sector(0.0), 1);
        assert_eq!(flux_sector(PI / 3.0), 2);
        assert_eq!(flux_sector(PI), 4);
        assert_eq!(flux_sector(-PI / 3.0), 6);
        assert_eq!(flux_sector(-PI + 1e-9), 4);
        assert_eq!(flux_sector(FRAC_PI_6 - 1e-9), 1);
        assert_eq!(flux_sector(FRAC_PI_6 + 1e-9), 2);
    }

    #[test]
    fn test_sector_table_advances_with_sector() {
        for s in 1..=6u8 {
            assert_eq!(sector_table(s, 1, 1), SwitchingVector::active(s as i32 + 1));
            assert_eq!(sector_table(s, -1, -1), SwitchingVector::active(s as i32 - 2));
            assert!(sector_table(s, 1, 0).is_zero());
            assert!(sector_table(s, -1, 0).is_zero());
        }
    }

    #[test]
    fn test_vector_signals() {
        let s = vector_signals(SwitchingVector::V1, 230.0);
        assert!((s[0] - 0.5 * (1.0 + 3.0_f64.sqrt())).abs() < 1e-12, "active leg: {}", s[0]);
        assert_eq!(s[1], 0.5);
        assert_eq!(s[2], 0.5);
        assert_eq!(vector_signals(SwitchingVector::V0, 230.0), [0.5; 3]);
    }

    #[test]
    fn test_law_fixed_ignores_sector() {
        let mut law = DirectTorqueLaw::new(DtcVectorSelection::FixedTable);
        // Torque and flux well below reference, flux angle in sector 2.
        let m = snapshot(0.0, 0.5, 0.0, 50.0);
        law.update(50.0, 1.0, &m);
        assert_eq!(law.states(), (1, 1));
        assert_eq!(law.sector(), 2, "angle atan2(0.5, 0.5) = 45°");
        assert_eq!(law.vector(), SwitchingVector::V2);

        let mut aware = DirectTorqueLaw::new(DtcVectorSelection::SectorAware);
        aware.update(50.0, 1.0, &m);
        assert_eq!(aware.vector(), SwitchingVector::V3, "sector 2 → V3");
    }

    #[test]
    fn test_law_on_target_selects_zero_vector() {
        let mut law = DirectTorqueLaw::new(DtcVectorSelection::FixedTable);
        let s = law.update(50.0, 1.0, &snapshot(50.0, 1.0, 0.0, 0.0));
        assert_eq!(law.states(), (0, 0));
        assert_eq!(s, [0.5; 3]);
    }
}
