// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Drive Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Control laws and the closed-loop tick pipeline.
//!
//! Controller → power stage → fault layer → current sensor → motor.

pub mod controller;
pub mod dtc;
pub mod foc;
pub mod pid;
pub mod scalar;
pub mod simulator;
pub mod telemetry;
