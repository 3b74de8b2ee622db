//! Platform surface: console keyboard/cursor primitives and the robot
//! hardware capability trait, each with a substitutable adapter.

pub mod console;
pub mod robot;
#[cfg(feature = "cli")]
pub mod term;
