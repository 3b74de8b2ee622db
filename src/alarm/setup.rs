//! Interactive alarm configuration wizard.
//!
//! Collects the sensor choice, monitoring duration, and both threshold lists
//! through the validated prompt helpers, then commits only a configuration
//! that passes store validation — an overlapping low/high set sends the
//! operator back to threshold entry instead of being silently corrected.

use crate::alarm::action::{ActionEffect, Phase};
use crate::alarm::evaluator::SensorKind;
use crate::alarm::monitor::TimeUnit;
use crate::alarm::thresholds::{Threshold, ThresholdStore};
use crate::core::config::AlarmConfig;
use crate::menu::engine::MenuEngine;
use crate::menu::prompt;
use crate::platform::console::Console;

/// Characters that would corrupt the action encoding if they reached a
/// message payload. Rejected at entry time.
const ACTION_DELIMITERS: [char; 3] = [',', '#', ';'];

/// Frequency entry bounds in Hz (0 additionally allowed, meaning "off").
const FREQ_RANGE: (i32, i32) = (1_000, 20_000);

// ──────────────────── alarm plan ────────────────────

/// A complete alarm configuration ready to arm.
#[derive(Debug, Clone)]
pub struct AlarmPlan {
    /// Configured alerts.
    pub store: ThresholdStore,
    /// Sensor feeding the evaluation.
    pub sensor: SensorKind,
    /// Monitoring duration in `unit` units.
    pub duration: u32,
    /// Unit scale for `duration`.
    pub unit: TimeUnit,
}

impl Default for AlarmPlan {
    fn default() -> Self {
        Self {
            store: ThresholdStore::new(),
            sensor: SensorKind::TemperatureF,
            duration: 5,
            unit: TimeUnit::Minutes,
        }
    }
}

impl AlarmPlan {
    /// Seed a plan from the config file's alarm defaults. Unknown names fall
    /// back to the built-in defaults.
    #[must_use]
    pub fn from_config(config: &AlarmConfig) -> Self {
        let defaults = Self::default();
        Self {
            store: ThresholdStore::new(),
            sensor: SensorKind::from_config(&config.sensor).unwrap_or(defaults.sensor),
            duration: config.duration,
            unit: TimeUnit::from_config(&config.duration_unit).unwrap_or(defaults.unit),
        }
    }

    /// Operator-facing summary of the current configuration.
    #[must_use]
    pub fn summary(&self) -> String {
        let list = |alerts: &[Threshold]| {
            alerts
                .iter()
                .map(|alert| alert.trigger.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Current Configuration...\
             \n                         Time to run: {} {}\
             \n                   Sensor to monitor: {}\
             \n              Low alert threshold(s): {}\
             \n             High alert threshold(s): {}",
            self.duration,
            self.unit.label(),
            self.sensor.label(),
            list(self.store.low()),
            list(self.store.high()),
        )
    }
}

// ──────────────────── threshold table ────────────────────

/// Render the threshold overview table shown before each "add another?"
/// question.
#[must_use]
pub fn format_threshold_table(alerts: &[Threshold], range: &str) -> String {
    let mut out = String::new();
    out.push_str(" Threshold | Sound | Light | Message \n");
    out.push_str(
        "===========|=======|=======|==============================================================\n",
    );

    if alerts.is_empty() {
        out.push_str(&format!(
            "           ***  There are currently no {range} threshold alerts set  ***"
        ));
        return out;
    }

    for alert in alerts {
        out.push_str(&format!("       {:03} |", alert.trigger));
        out.push_str(if alert.has_sound() { "  Yes  |" } else { "  No   |" });
        out.push_str(if alert.has_light() { "  Yes  |" } else { "  No   |" });
        match alert.message() {
            Some(message) => {
                let mut message = message.to_string();
                if message.chars().count() > 57 {
                    message = message.chars().take(57).collect();
                    message.push_str("...");
                }
                out.push(' ');
                out.push_str(&message);
                out.push('\n');
            }
            None => out.push_str(" -- output message disabled --\n"),
        }
    }
    out
}

// ──────────────────── wizard ────────────────────

/// Run the configuration wizard. Declining the change question returns the
/// current plan untouched.
pub fn run_wizard(
    menu: &mut MenuEngine,
    console: &mut dyn Console,
    current: &AlarmPlan,
) -> AlarmPlan {
    let change_prompt = format!(
        "{}\n\nWould you like to change the current configuration? ",
        current.summary()
    );
    if !prompt::confirm(menu, console, &change_prompt) {
        menu.clear(console);
        return current.clone();
    }

    let sensor = select_sensor(menu, console);
    let unit = select_unit(menu, console);

    let (min, max) = unit.duration_range();
    let duration_prompt = format!(
        "How long in {} would you like to monitor for?\n    Test time ({min}-{max}): ",
        unit.label().to_lowercase()
    );
    let duration = prompt::read_int_in_range(menu, console, &duration_prompt, min, max);

    // Threshold entry repeats until the configuration has a quiet band.
    let store = loop {
        let low = collect_thresholds(menu, console, "lower", sensor);
        let high = collect_thresholds(menu, console, "higher", sensor);
        let mut store = ThresholdStore::new();
        match store.replace(low, high) {
            Ok(()) => break store,
            Err(err) => {
                menu.clear(console);
                menu.write_line(console, &err.to_string(), false);
                menu.write_line(
                    console,
                    "Please re-enter the thresholds. Press any key to continue...",
                    false,
                );
                prompt::wait_any_key(console);
            }
        }
    };

    AlarmPlan {
        store,
        sensor,
        duration: u32::try_from(duration).unwrap_or(0),
        unit,
    }
}

/// Sensor selection with confirmation.
fn select_sensor(menu: &mut MenuEngine, console: &mut dyn Console) -> SensorKind {
    loop {
        let choice = prompt::read_choice(
            menu,
            console,
            "What sensor would you like to monitor?\n\
             \x20    * Light\n\
             \x20    * Right Light\n\
             \x20    * Left Light\n\
             \x20    * Temperature F\n\
             \x20    * Temperature C\n\
             \nChoice: ",
            &["Light", "Right Light", "Left Light", "Temperature F", "Temperature C"],
            "Invalid Option: Please enter one of the listed sensors. Press any key to continue...",
        );
        let confirm_prompt = format!("You selected {} is this correct? ", choice.to_lowercase());
        if prompt::confirm(menu, console, &confirm_prompt) {
            return match choice.as_str() {
                "Light" => SensorKind::Light,
                "Right Light" => SensorKind::LightRight,
                "Left Light" => SensorKind::LightLeft,
                "Temperature C" => SensorKind::TemperatureC,
                _ => SensorKind::TemperatureF,
            };
        }
    }
}

/// Time-unit selection with confirmation.
fn select_unit(menu: &mut MenuEngine, console: &mut dyn Console) -> TimeUnit {
    loop {
        let choice = prompt::read_choice(
            menu,
            console,
            "What unit of time do you want to use to monitor for?\n\
             \x20    * Seconds\n\
             \x20    * Minutes\n\
             \x20    * Hours\n\
             \nChoice: ",
            &["Seconds", "Minutes", "Hours"],
            "Invalid Option: Please enter one of the listed units. Press any key to continue...",
        );
        let confirm_prompt = format!("You selected {} is this correct? ", choice.to_lowercase());
        if prompt::confirm(menu, console, &confirm_prompt) {
            return match choice.as_str() {
                "Seconds" => TimeUnit::Seconds,
                "Hours" => TimeUnit::Hours,
                _ => TimeUnit::Minutes,
            };
        }
    }
}

/// Collect one side's threshold list, one alert at a time.
fn collect_thresholds(
    menu: &mut MenuEngine,
    console: &mut dyn Console,
    range: &str,
    sensor: SensorKind,
) -> Vec<Threshold> {
    let mut alerts: Vec<Threshold> = Vec::new();
    let (min, max) = sensor.trigger_range();

    loop {
        let header = format!(
            "You are currently configuring the {range} thresholds for the {} sensor\n\
             \x20   - sensors of the type {} may have values between {min} and {max}\n\n\n",
            sensor.label().to_lowercase(),
            sensor.type_label(),
        );
        let add_prompt = format!(
            "{header}{}\n\nWould you like to add a new {range} threshold alarm? ",
            format_threshold_table(&alerts, range)
        );
        if !prompt::confirm(menu, console, &add_prompt) {
            return alerts;
        }

        // Entry retries until the alert carries at least one feature.
        loop {
            let trigger_prompt = format!(
                "Sensors of type {} can be set to trigger between {min} and {max}.\n\
                 \x20    At what threshold would you like to trigger this alert? ",
                sensor.type_label().to_lowercase()
            );
            let trigger = prompt::read_int_in_range(menu, console, &trigger_prompt, min, max);

            let mut effects = Vec::new();

            if prompt::confirm(
                menu,
                console,
                "Would you like to include a sound feature with this alert? ",
            ) {
                for (ordinal, phase) in [("first", Phase::One), ("second", Phase::Two)] {
                    let freq_prompt = format!(
                        "What would you like to use as the {ordinal} frequency? ({}-{} or 0 for off): ",
                        FREQ_RANGE.0, FREQ_RANGE.1
                    );
                    let freq = prompt::read_int_or_zero(
                        menu,
                        console,
                        &freq_prompt,
                        FREQ_RANGE.0,
                        FREQ_RANGE.1,
                    );
                    effects.push(ActionEffect::Sound {
                        phase,
                        freq: u32::try_from(freq).unwrap_or(0),
                    });
                }
            }

            if prompt::confirm(
                menu,
                console,
                "Would you like to include a light feature with this alert? ",
            ) {
                for phase in [Phase::One, Phase::Two] {
                    let rgb = read_rgb(menu, console);
                    effects.push(ActionEffect::Light { phase, rgb });
                }
            }

            if prompt::confirm(
                menu,
                console,
                "Would you like to include a message feature with this alert? ",
            ) {
                let text = prompt::read_text_without(
                    menu,
                    console,
                    "Please enter the message you would like to display when this \
                     threshold is crossed...\n\nMessage: ",
                    &ACTION_DELIMITERS,
                );
                effects.push(ActionEffect::Message(text));
            }

            if effects.is_empty() {
                menu.clear(console);
                menu.write_line(
                    console,
                    "No alert options selected! Press any key to continue...",
                    false,
                );
                prompt::wait_any_key(console);
                continue;
            }

            alerts.push(Threshold::new(trigger, effects));
            break;
        }
    }
}

/// One RGB color entry with confirmation.
fn read_rgb(menu: &mut MenuEngine, console: &mut dyn Console) -> (u8, u8, u8) {
    loop {
        let mut rgb = [0u8; 3];
        for (slot, name) in rgb.iter_mut().zip(["red", "green", "blue"]) {
            let component_prompt =
                format!("Please enter a value for the color {name} between 0-255: ");
            let value = prompt::read_int_in_range(menu, console, &component_prompt, 0, 255);
            *slot = u8::try_from(value).unwrap_or(0);
        }

        let confirm_prompt = format!(
            "Here is the RGB based color you have requested\n\
             \x20   Red: {}\n\
             \x20 Green: {}\n\
             \x20  Blue: {}\n\
             \nIs this correct? ",
            rgb[0], rgb[1], rgb[2]
        );
        if prompt::confirm(menu, console, &confirm_prompt) {
            return (rgb[0], rgb[1], rgb[2]);
        }
    }
}

// ──────────────────── tests ────────────────────
