//! Per-tick alarm evaluation.
//!
//! Pure decision logic separated from the armed loop: given a sensor sample
//! and the current phase flag, pick the active alerts and apply their
//! effects through the robot and menu surfaces.

use crate::alarm::action::{ActionEffect, Phase};
use crate::alarm::thresholds::{Threshold, ThresholdStore};
use crate::menu::engine::MenuEngine;
use crate::platform::console::Console;
use crate::platform::robot::Robot;

/// Idle/safe LED color shown while nothing is breached.
const IDLE_LED: (u8, u8, u8) = (0, 255, 0);

// ──────────────────── sensor kinds ────────────────────

/// Which sensor feeds the alarm. Resolved once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Average of the left and right light sensors.
    Light,
    /// Left light sensor only.
    LightLeft,
    /// Right light sensor only.
    LightRight,
    /// Body temperature in degrees Fahrenheit.
    TemperatureF,
    /// Body temperature in degrees Celsius.
    TemperatureC,
}

impl SensorKind {
    /// Poll the robot for this sensor's current value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read(self, robot: &mut dyn Robot) -> i32 {
        match self {
            Self::Light => {
                let average =
                    f64::from(robot.light_left() + robot.light_right()) / 2.0;
                average as i32
            }
            Self::LightLeft => robot.light_left(),
            Self::LightRight => robot.light_right(),
            Self::TemperatureF => (robot.temperature_c() * 1.8 + 32.0) as i32,
            Self::TemperatureC => robot.temperature_c() as i32,
        }
    }

    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::LightLeft => "Left Light",
            Self::LightRight => "Right Light",
            Self::TemperatureF => "Temperature (\u{b0}F)",
            Self::TemperatureC => "Temperature (\u{b0}C)",
        }
    }

    /// Valid trigger entry range for this sensor.
    #[must_use]
    pub const fn trigger_range(self) -> (i32, i32) {
        match self {
            Self::Light | Self::LightLeft | Self::LightRight => (0, 255),
            Self::TemperatureF => (20, 110),
            Self::TemperatureC => (-10, 45),
        }
    }

    /// Short type label used in range prompts.
    #[must_use]
    pub const fn type_label(self) -> &'static str {
        match self {
            Self::Light | Self::LightLeft | Self::LightRight => "\"light\"",
            Self::TemperatureF => "\"temperature \u{b0}F\"",
            Self::TemperatureC => "\"temperature \u{b0}C\"",
        }
    }

    /// Resolve a config-file string form.
    #[must_use]
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "light_left" => Some(Self::LightLeft),
            "light_right" => Some(Self::LightRight),
            "temperature_f" => Some(Self::TemperatureF),
            "temperature_c" => Some(Self::TemperatureC),
            _ => None,
        }
    }
}

// ──────────────────── evaluation ────────────────────

/// Which alerts fired during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Trigger value of the active low alert, if any.
    pub low: Option<i32>,
    /// Trigger value of the active high alert, if any.
    pub high: Option<i32>,
}

impl TickOutcome {
    /// Whether any alert is active.
    #[must_use]
    pub const fn any(self) -> bool {
        self.low.is_some() || self.high.is_some()
    }
}

/// Stateless per-tick evaluator.
#[derive(Debug, Clone, Copy)]
pub struct AlarmEvaluator {
    /// Suppress a triggered message already present in the output log.
    pub suppress_repeats: bool,
}

impl Default for AlarmEvaluator {
    fn default() -> Self {
        Self {
            suppress_repeats: true,
        }
    }
}

impl AlarmEvaluator {
    /// Evaluate one tick.
    ///
    /// Low side: scan ascending, the **first** entry whose trigger exceeds
    /// the sample wins — the lowest-trigger low alert, not the tightest.
    /// High side: scan descending, the **first** entry whose trigger is below
    /// the sample wins — the highest-trigger high alert. When neither side
    /// matches, actuators return to the idle state. When both match (only
    /// possible with a misconfigured store) the low alert is applied first
    /// and the high alert second, so the high actuation lands last.
    pub fn tick(
        self,
        store: &mut ThresholdStore,
        sample: i32,
        phase: Phase,
        robot: &mut dyn Robot,
        menu: &mut MenuEngine,
        console: &mut dyn Console,
    ) -> TickOutcome {
        store.sort_lists();
        let mut outcome = TickOutcome::default();

        let low_hit = store
            .low()
            .iter()
            .find(|alert| alert.trigger > sample)
            .cloned();
        let high_hit = store
            .high()
            .iter()
            .rev()
            .find(|alert| alert.trigger < sample)
            .cloned();

        if low_hit.is_none() && high_hit.is_none() {
            robot.set_led(IDLE_LED.0, IDLE_LED.1, IDLE_LED.2);
            robot.tone_off();
            return outcome;
        }

        if let Some(alert) = low_hit {
            outcome.low = Some(alert.trigger);
            self.apply(&alert, phase, robot, menu, console);
        }
        if let Some(alert) = high_hit {
            outcome.high = Some(alert.trigger);
            self.apply(&alert, phase, robot, menu, console);
        }
        outcome
    }

    /// Apply one alert's effects: sound/light gated on the current phase,
    /// messages every tick.
    fn apply(
        self,
        alert: &Threshold,
        phase: Phase,
        robot: &mut dyn Robot,
        menu: &mut MenuEngine,
        console: &mut dyn Console,
    ) {
        for effect in alert.effects_for_phase(phase) {
            match effect {
                ActionEffect::Sound { freq, .. } => {
                    if *freq == 0 {
                        robot.tone_off();
                    } else {
                        robot.tone_on(*freq);
                    }
                }
                ActionEffect::Light { rgb, .. } => {
                    robot.set_led(rgb.0, rgb.1, rgb.2);
                }
                ActionEffect::Message(text) => {
                    menu.write_line(console, text, self.suppress_repeats);
                }
            }
        }
    }
}

// ──────────────────── tests ────────────────────
