//! The armed monitoring loop.
//!
//! Caller-owned timed loop around the per-tick evaluator. Each iteration is
//! the fixed sequence: sensor read → evaluation → phase-timer check →
//! cancellation check. The phase flag flips on a 500 ms wall-clock boundary;
//! the loop sleeps a short tick between iterations to bound CPU. Termination
//! is cooperative: Escape from the operator, or the elapsed-time budget
//! (duration × unit scale) running out. Either way the actuators are forced
//! back to the idle state on exit.

use std::thread;
use std::time::{Duration, Instant};

use crate::alarm::action::Phase;
use crate::alarm::evaluator::{AlarmEvaluator, SensorKind, TickOutcome};
use crate::alarm::thresholds::ThresholdStore;
use crate::core::config::TimingConfig;
use crate::logger::jsonl::{EventType, JsonlLogger, LogEntry, Severity};
use crate::menu::engine::MenuEngine;
use crate::platform::console::{Console, Key};
use crate::platform::robot::Robot;

// ──────────────────── time units ────────────────────

/// Monitoring-duration units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// One second per unit.
    Seconds,
    /// One minute per unit.
    Minutes,
    /// One hour per unit.
    Hours,
}

impl TimeUnit {
    /// Milliseconds per unit.
    #[must_use]
    pub const fn millis(self) -> u64 {
        match self {
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
        }
    }

    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seconds => "Seconds",
            Self::Minutes => "Minutes",
            Self::Hours => "Hours",
        }
    }

    /// Valid duration entry range for this unit.
    #[must_use]
    pub const fn duration_range(self) -> (i32, i32) {
        match self {
            Self::Seconds => (60, 1_200),
            Self::Minutes => (1, 120),
            Self::Hours => (1, 3),
        }
    }

    /// Resolve a config-file string form.
    #[must_use]
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "seconds" => Some(Self::Seconds),
            "minutes" => Some(Self::Minutes),
            "hours" => Some(Self::Hours),
            _ => None,
        }
    }
}

// ──────────────────── monitor ────────────────────

/// How an armed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Operator pressed Escape.
    Cancelled,
    /// The elapsed-time budget ran out.
    Expired,
}

/// An armed alarm: thresholds, sensor choice, and loop timing.
#[derive(Debug, Clone)]
pub struct AlarmMonitor {
    /// Configured alerts.
    pub store: ThresholdStore,
    /// Sensor feeding the evaluation.
    pub sensor: SensorKind,
    /// Monitoring duration in `unit` units.
    pub duration: u32,
    /// Unit scale for `duration`.
    pub unit: TimeUnit,
    tick_interval: Duration,
    phase_interval: Duration,
    evaluator: AlarmEvaluator,
}

impl AlarmMonitor {
    /// Build a monitor with default loop timing.
    #[must_use]
    pub fn new(store: ThresholdStore, sensor: SensorKind, duration: u32, unit: TimeUnit) -> Self {
        Self::with_timing(store, sensor, duration, unit, &TimingConfig::default())
    }

    /// Build a monitor with explicit loop timing.
    #[must_use]
    pub fn with_timing(
        store: ThresholdStore,
        sensor: SensorKind,
        duration: u32,
        unit: TimeUnit,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            store,
            sensor,
            duration,
            unit,
            tick_interval: Duration::from_millis(timing.tick_interval_ms),
            phase_interval: Duration::from_millis(timing.phase_interval_ms),
            evaluator: AlarmEvaluator::default(),
        }
    }

    /// Suppress repeated identical messages in the output log.
    pub fn set_suppress_repeats(&mut self, suppress: bool) {
        self.evaluator.suppress_repeats = suppress;
    }

    /// Total wall-clock budget for the armed session.
    #[must_use]
    pub fn budget(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration) * self.unit.millis())
    }

    /// Run the armed loop until Escape or budget exhaustion.
    ///
    /// Activity transitions are appended to `logger` when one is supplied.
    pub fn run(
        &mut self,
        robot: &mut dyn Robot,
        menu: &mut MenuEngine,
        console: &mut dyn Console,
        mut logger: Option<&mut JsonlLogger>,
    ) -> MonitorOutcome {
        let budget = self.budget();
        let started = Instant::now();
        let mut phase = Phase::One;
        let mut last_flip = started;
        let mut was_active = false;

        if let Some(log) = logger.as_deref_mut() {
            log.append(
                &LogEntry::new(EventType::MonitorArmed, Severity::Info)
                    .with_sensor(self.sensor.label())
                    .with_details(format!(
                        "{} {} budget, {} low / {} high alerts",
                        self.duration,
                        self.unit.label().to_lowercase(),
                        self.store.low().len(),
                        self.store.high().len(),
                    )),
            );
        }

        let outcome = loop {
            let sample = self.sensor.read(robot);
            let tick =
                self.evaluator
                    .tick(&mut self.store, sample, phase, robot, menu, console);
            console.flush();

            if let Some(log) = logger.as_deref_mut() {
                log_transitions(log, self.sensor, sample, tick, was_active);
            }
            was_active = tick.any();

            if last_flip.elapsed() >= self.phase_interval {
                phase = phase.toggled();
                last_flip = Instant::now();
            }

            if console.key_available() && console.read_key() == Key::Escape {
                break MonitorOutcome::Cancelled;
            }
            if started.elapsed() >= budget {
                break MonitorOutcome::Expired;
            }
            thread::sleep(self.tick_interval);
        };

        // Armed session is over: force the safe state regardless of the
        // last tick's outcome.
        robot.set_led(0, 255, 0);
        robot.tone_off();

        if let Some(log) = logger.as_deref_mut() {
            log.append(
                &LogEntry::new(EventType::MonitorStopped, Severity::Info).with_details(
                    match outcome {
                        MonitorOutcome::Cancelled => "cancelled by operator".to_string(),
                        MonitorOutcome::Expired => "monitoring budget expired".to_string(),
                    },
                ),
            );
        }
        outcome
    }
}

/// Append triggered/cleared edges to the activity log.
fn log_transitions(
    logger: &mut JsonlLogger,
    sensor: SensorKind,
    sample: i32,
    tick: TickOutcome,
    was_active: bool,
) {
    if tick.any() && !was_active {
        let trigger = tick.low.or(tick.high);
        let mut entry = LogEntry::new(EventType::AlarmTriggered, Severity::Warning)
            .with_sensor(sensor.label())
            .with_sample(sample);
        if let Some(trigger) = trigger {
            entry = entry.with_trigger(trigger);
        }
        logger.append(&entry);
    } else if !tick.any() && was_active {
        logger.append(
            &LogEntry::new(EventType::AlarmCleared, Severity::Info)
                .with_sensor(sensor.label())
                .with_sample(sample),
        );
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::action::ActionEffect;
    use crate::alarm::thresholds::Threshold;
    use crate::menu::template::MenuTemplate;
    use crate::platform::console::ScriptedConsole;
    use crate::platform::robot::SimulatedRobot;

    fn fixture() -> (MenuEngine, ScriptedConsole, SimulatedRobot) {
        let mut text = String::new();
        text.push_str("<info>\nselectorCol={1}\nfirstLine={2}\n");
        text.push_str("output={2,10,77,20}\noptions={one}\n</info>\n<menu>\n");
        for _ in 0..25 {
            text.push_str(&" ".repeat(80));
            text.push('\n');
        }
        text.push_str("</menu>\n");
        let menu = MenuEngine::from_template(MenuTemplate::parse(&text));
        let mut rover = SimulatedRobot::new();
        rover.set_jitter(0);
        (menu, ScriptedConsole::new(80, 25), rover)
    }

    fn fast_timing() -> TimingConfig {
        TimingConfig {
            tick_interval_ms: 0,
            phase_interval_ms: 0,
        }
    }

    #[test]
    fn time_unit_scales() {
        assert_eq!(TimeUnit::Seconds.millis(), 1_000);
        assert_eq!(TimeUnit::Minutes.millis(), 60_000);
        assert_eq!(TimeUnit::Hours.millis(), 3_600_000);
    }

    #[test]
    fn duration_ranges() {
        assert_eq!(TimeUnit::Seconds.duration_range(), (60, 1_200));
        assert_eq!(TimeUnit::Minutes.duration_range(), (1, 120));
        assert_eq!(TimeUnit::Hours.duration_range(), (1, 3));
    }

    #[test]
    fn budget_multiplies_duration_by_unit() {
        let monitor = AlarmMonitor::new(
            ThresholdStore::new(),
            SensorKind::Light,
            5,
            TimeUnit::Minutes,
        );
        assert_eq!(monitor.budget(), Duration::from_secs(300));
    }

    #[test]
    fn zero_budget_expires_after_first_tick() {
        let (mut menu, mut console, mut rover) = fixture();
        let mut monitor = AlarmMonitor::with_timing(
            ThresholdStore::new(),
            SensorKind::Light,
            0,
            TimeUnit::Seconds,
            &fast_timing(),
        );
        let outcome = monitor.run(&mut rover, &mut menu, &mut console, None);
        assert_eq!(outcome, MonitorOutcome::Expired);
        // Safe state on exit.
        assert_eq!(rover.led(), (0, 255, 0));
        assert_eq!(rover.tone(), None);
    }

    #[test]
    fn escape_cancels() {
        let (mut menu, mut console, mut rover) = fixture();
        console.push_keys([Key::Escape]);
        let mut monitor = AlarmMonitor::with_timing(
            ThresholdStore::new(),
            SensorKind::Light,
            10,
            TimeUnit::Hours,
            &fast_timing(),
        );
        let outcome = monitor.run(&mut rover, &mut menu, &mut console, None);
        assert_eq!(outcome, MonitorOutcome::Cancelled);
    }

    #[test]
    fn non_escape_keys_do_not_cancel() {
        let (mut menu, mut console, mut rover) = fixture();
        console.push_keys([Key::Char('x'), Key::Escape]);
        let mut monitor = AlarmMonitor::with_timing(
            ThresholdStore::new(),
            SensorKind::Light,
            10,
            TimeUnit::Hours,
            &fast_timing(),
        );
        let outcome = monitor.run(&mut rover, &mut menu, &mut console, None);
        assert_eq!(outcome, MonitorOutcome::Cancelled);
    }

    #[test]
    fn breached_alert_fires_during_run() {
        let (mut menu, mut console, mut rover) = fixture();
        rover.set_light_levels(10, 10);
        console.push_keys([Key::Escape]);

        let mut store = ThresholdStore::new();
        store
            .add_low_alert(Threshold::new(
                100,
                vec![
                    ActionEffect::Sound {
                        phase: Phase::One,
                        freq: 3000,
                    },
                    ActionEffect::Message("too dark".to_string()),
                ],
            ))
            .unwrap();

        let mut monitor = AlarmMonitor::with_timing(
            store,
            SensorKind::Light,
            10,
            TimeUnit::Hours,
            &fast_timing(),
        );
        monitor.run(&mut rover, &mut menu, &mut console, None);
        // The message landed before cancellation; actuators were reset after.
        assert!(menu.output_text().contains("too dark"));
        assert_eq!(rover.tone(), None);
        assert_eq!(rover.led(), (0, 255, 0));
    }

    #[test]
    fn run_logs_armed_and_stopped_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut logger = JsonlLogger::new(&path);

        let (mut menu, mut console, mut rover) = fixture();
        let mut monitor = AlarmMonitor::with_timing(
            ThresholdStore::new(),
            SensorKind::Light,
            0,
            TimeUnit::Seconds,
            &fast_timing(),
        );
        monitor.run(&mut rover, &mut menu, &mut console, Some(&mut logger));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("monitor_armed"));
        assert!(raw.contains("monitor_stopped"));
    }

    #[test]
    fn run_logs_trigger_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut logger = JsonlLogger::new(&path);

        let (mut menu, mut console, mut rover) = fixture();
        rover.set_light_levels(10, 10);
        let mut store = ThresholdStore::new();
        store.add_low(100).unwrap();

        let mut monitor = AlarmMonitor::with_timing(
            store,
            SensorKind::Light,
            0,
            TimeUnit::Seconds,
            &fast_timing(),
        );
        monitor.run(&mut rover, &mut menu, &mut console, Some(&mut logger));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("alarm_triggered"));
        assert!(raw.contains("\"trigger\":100"));
    }
}
