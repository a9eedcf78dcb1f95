//! Synthetic drive diagnostics.
//!
//! Phase-current sensing with multiplicative Gaussian noise and fault modes.

pub mod sensors;
