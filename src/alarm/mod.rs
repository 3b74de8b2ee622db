//! Threshold-alarm subsystem: action encoding, threshold stores, per-tick
//! evaluation, the armed monitoring loop, and the interactive setup wizard.

pub mod action;
pub mod evaluator;
pub mod monitor;
pub mod setup;
pub mod thresholds;
