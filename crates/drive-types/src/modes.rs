// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Operating Modes
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed tag sets for every decision point in the drive loop.
//!
//! Each tag carries the operator-facing label used by the control panel and
//! the CSV logger, and parses back from it (case-insensitive).

use crate::error::DriveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = DriveError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim();
                $(
                    if key.eq_ignore_ascii_case($label) $(|| key.eq_ignore_ascii_case($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(DriveError::ConfigError(format!(
                    "unknown {} '{}'",
                    stringify!($name),
                    s
                )))
            }
        }
    };
}

/// Control law selected per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Scalar volts-per-hertz.
    #[default]
    Scalar,
    FieldOriented,
    DirectTorque,
}

labelled_enum!(ControlMode {
    Scalar => "V/f" | "vf" | "scalar",
    FieldOriented => "FOC" | "field_oriented",
    DirectTorque => "DTC" | "direct_torque",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PwmType {
    #[default]
    Sine,
    SpaceVector,
}

labelled_enum!(PwmType {
    Sine => "SPWM" | "sine",
    SpaceVector => "SVPWM" | "svm" | "space_vector",
});

/// Simulated fault condition. Always exactly one of six tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    #[default]
    None,
    Overcurrent,
    Undervoltage,
    PhaseLoss,
    Overheat,
    IgbtFailure,
}

labelled_enum!(FaultKind {
    None => "None",
    Overcurrent => "Overcurrent",
    Undervoltage => "Undervoltage",
    PhaseLoss => "Phase Loss" | "phase_loss" | "phaseloss",
    Overheat => "Overheat",
    IgbtFailure => "IGBTFailure" | "igbt_failure" | "igbt",
});

impl FaultKind {
    pub fn is_active(self) -> bool {
        self != FaultKind::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    /// Fixed opposing torque.
    #[default]
    Constant,
    /// Torque quadratic in speed.
    FanPump,
    /// Pure inertia, no load torque.
    Inertia,
}

labelled_enum!(LoadType {
    Constant => "Constant",
    FanPump => "Fan/Pump" | "fan_pump" | "fan" | "pump",
    Inertia => "Inertia",
});

/// Reaction to an over-temperature condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionMode {
    None,
    /// Flag `Overheat` once, keep driving.
    #[default]
    Warning,
    /// Latch `Overheat` and force the bridge output to zero.
    Shutdown,
}

labelled_enum!(ProtectionMode {
    None => "None",
    Warning => "Warning",
    Shutdown => "Shutdown",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

labelled_enum!(Direction {
    Forward => "FWD" | "forward",
    Reverse => "REV" | "reverse",
});

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// How DTC turns hysteresis states into an inverter vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtcVectorSelection {
    /// Single 3×3 table keyed by (flux, torque) state; the flux sector is
    /// reported but not consulted.
    #[default]
    FixedTable,
    /// Classic six-sector switching table.
    SectorAware,
}

labelled_enum!(DtcVectorSelection {
    FixedTable => "fixed" | "fixed_table",
    SectorAware => "sector" | "sector_aware",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roundtrip() {
        for &kind in FaultKind::ALL {
            let parsed: FaultKind = kind.label().parse().expect("label parses");
            assert_eq!(parsed, kind);
        }
        for &mode in ControlMode::ALL {
            assert_eq!(mode.label().parse::<ControlMode>().unwrap(), mode);
        }
        for &load in LoadType::ALL {
            assert_eq!(load.label().parse::<LoadType>().unwrap(), load);
        }
    }

    #[test]
    fn test_original_labels() {
        assert_eq!(FaultKind::PhaseLoss.label(), "Phase Loss");
        assert_eq!(FaultKind::IgbtFailure.label(), "IGBTFailure");
        assert_eq!(LoadType::FanPump.label(), "Fan/Pump");
        assert_eq!(ControlMode::Scalar.label(), "V/f");
        assert_eq!(PwmType::SpaceVector.label(), "SVPWM");
    }

    #[test]
    fn test_aliases_and_case() {
        assert_eq!("svm".parse::<PwmType>().unwrap(), PwmType::SpaceVector);
        assert_eq!("dtc".parse::<ControlMode>().unwrap(), ControlMode::DirectTorque);
        assert_eq!("phase_loss".parse::<FaultKind>().unwrap(), FaultKind::PhaseLoss);
        assert!("bogus".parse::<FaultKind>().is_err());
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Forward.sign(), 1.0);
        assert_eq!(Direction::Reverse.sign(), -1.0);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&FaultKind::IgbtFailure).unwrap();
        assert_eq!(json, "\"igbt_failure\"");
        let back: ProtectionMode = serde_json::from_str("\"shutdown\"").unwrap();
        assert_eq!(back, ProtectionMode::Shutdown);
    }
}
