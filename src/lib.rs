#![forbid(unsafe_code)]

//! Rover Console — template-driven text-mode controller for a small desk
//! rover, with a threshold-alarm subsystem.
//!
//! Two cores:
//! 1. **Menu engine** — fixed-geometry screens described by plain-text
//!    templates, rendered incrementally into a scrollable output region, with
//!    a cooperative key-polling state machine.
//! 2. **Alarm protocol** — sorted low/high threshold lists whose alerts carry
//!    compound actions (sound + light + message) encoded as `#TAG:payload;`
//!    fragments, evaluated against live sensor samples on a two-phase timer.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use rover_console::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use rover_console::alarm::thresholds::ThresholdStore;
//! use rover_console::menu::template::MenuTemplate;
//! ```

pub mod prelude;

pub mod alarm;
#[cfg(feature = "cli")]
pub mod cli_app;
pub mod core;
pub mod logger;
pub mod menu;
pub mod platform;
pub mod runtime;
