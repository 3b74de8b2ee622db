//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use rover_console::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, RoverError};
pub use crate::core::settings::SettingsFile;

// Platform
pub use crate::platform::console::{Console, Key, ScriptedConsole};
pub use crate::platform::robot::{Robot, SimulatedRobot};

// Menu
pub use crate::menu::engine::MenuEngine;
pub use crate::menu::template::{MenuTemplate, ScreenLayout};

// Alarm
pub use crate::alarm::action::{ActionEffect, Phase};
pub use crate::alarm::evaluator::{AlarmEvaluator, SensorKind};
pub use crate::alarm::monitor::{AlarmMonitor, MonitorOutcome, TimeUnit};
pub use crate::alarm::thresholds::{Threshold, ThresholdStore};
