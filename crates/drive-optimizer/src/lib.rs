// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Drive Optimizer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multi-objective search over {PWM frequency, modulation index, fan speed,
//! coolant flow} minimizing power loss, peak temperature and speed error.

pub mod evaluation;
pub mod individual;
pub mod nsga2;
pub mod operators;
pub mod sorting;
