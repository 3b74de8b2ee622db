//! Integration tests for the threshold-alarm protocol: validation rules,
//! tie-breaks, and phase alternation across a simulated armed run.

use rover_console::alarm::action::{self, ActionEffect, Phase};
use rover_console::alarm::evaluator::{AlarmEvaluator, SensorKind};
use rover_console::alarm::monitor::{AlarmMonitor, MonitorOutcome, TimeUnit};
use rover_console::alarm::thresholds::{Threshold, ThresholdStore};
use rover_console::core::config::TimingConfig;
use rover_console::menu::engine::MenuEngine;
use rover_console::menu::template::MenuTemplate;
use rover_console::platform::console::{Key, ScriptedConsole};
use rover_console::platform::robot::SimulatedRobot;

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

// ──────────────────── validation ────────────────────

#[test]
fn separated_threshold_sets_validate() {
    for (low, high) in [
        (vec![10, 20, 30], vec![40, 50]),
        (vec![-5, 0], vec![1]),
        (vec![100], vec![101]),
    ] {
        let mut store = ThresholdStore::new();
        store.add_low_many(&low).unwrap();
        assert!(store.add_high_many(&high).is_ok(), "{low:?} / {high:?}");
    }
}

#[test]
fn overlapping_threshold_sets_raise() {
    for (low, high) in [
        (vec![10, 60], vec![40, 50]),
        (vec![40], vec![40]),
        (vec![5, 6, 7], vec![7]),
    ] {
        let mut store = ThresholdStore::new();
        let result = store
            .add_low_many(&low)
            .and_then(|()| store.add_high_many(&high));
        let err = result.unwrap_err();
        assert_eq!(err.code(), "RVR-1001", "{low:?} / {high:?}");
    }
}

// ──────────────────── tie-breaks ────────────────────

#[test]
fn low_tie_break_lowest_trigger_wins() {
    let (mut menu, mut console, mut rover) = fixture();
    let mut store = ThresholdStore::new();
    store
        .add_low_alert(Threshold::new(
            50,
            vec![ActionEffect::Message("fifty".into())],
        ))
        .unwrap();
    store
        .add_low_alert(Threshold::new(
            40,
            vec![ActionEffect::Message("forty".into())],
        ))
        .unwrap();

    let outcome = AlarmEvaluator::default().tick(
        &mut store,
        35,
        Phase::One,
        &mut rover,
        &mut menu,
        &mut console,
    );
    assert_eq!(outcome.low, Some(40), "the alert attached to 40 must fire");
    assert!(menu.output_text().contains("forty"));
    assert!(!menu.output_text().contains("fifty"));
}

#[test]
fn high_tie_break_highest_trigger_wins() {
    let (mut menu, mut console, mut rover) = fixture();
    let mut store = ThresholdStore::new();
    store
        .add_high_alert(Threshold::new(
            60,
            vec![ActionEffect::Message("sixty".into())],
        ))
        .unwrap();
    store
        .add_high_alert(Threshold::new(
            80,
            vec![ActionEffect::Message("eighty".into())],
        ))
        .unwrap();

    let outcome = AlarmEvaluator::default().tick(
        &mut store,
        90,
        Phase::One,
        &mut rover,
        &mut menu,
        &mut console,
    );
    assert_eq!(outcome.high, Some(80), "the alert attached to 80 must fire");
    assert!(menu.output_text().contains("eighty"));
    assert!(!menu.output_text().contains("sixty"));
}

// ──────────────────── phase alternation ────────────────────

/// Simulates an armed run where the phase flag toggles every window: an
/// alert with a phase-1 sound and a phase-2 light produces sound during
/// phase-1 windows and light during phase-2 windows, never both in the same
/// window.
#[test]
fn phase_windows_never_mix_sound_and_light() {
    let (mut menu, mut console, _) = fixture();
    let mut store = ThresholdStore::new();
    store
        .add_low_alert(Threshold::new(
            100,
            vec![
                ActionEffect::Sound {
                    phase: Phase::One,
                    freq: 5000,
                },
                ActionEffect::Light {
                    phase: Phase::Two,
                    rgb: (200, 0, 0),
                },
            ],
        ))
        .unwrap();

    let mut phase = Phase::One;
    for window in 0..8 {
        // Fresh actuator state per window isolates what this window applied.
        let mut rover = SimulatedRobot::new();
        rover.set_jitter(0);
        rover.set_light_levels(10, 10);

        AlarmEvaluator::default().tick(
            &mut store,
            10,
            phase,
            &mut rover,
            &mut menu,
            &mut console,
        );

        let sound_applied = rover.tone().is_some();
        let light_applied = rover.led() == (200, 0, 0);
        match phase {
            Phase::One => {
                assert!(sound_applied, "window {window}: phase-1 sound expected");
                assert!(!light_applied, "window {window}: no light in phase 1");
            }
            Phase::Two => {
                assert!(light_applied, "window {window}: phase-2 light expected");
                assert!(!sound_applied, "window {window}: no sound in phase 2");
            }
        }
        phase = phase.toggled();
    }
}

// ──────────────────── armed run ────────────────────

#[test]
fn armed_run_applies_alert_then_resets_on_exit() {
    let (mut menu, mut console, mut rover) = fixture();
    rover.set_temperature_c(40.0); // 104 °F

    let mut store = ThresholdStore::new();
    store
        .add_high_alert(Threshold::new(
            90,
            vec![
                ActionEffect::Light {
                    phase: Phase::One,
                    rgb: (255, 0, 0),
                },
                ActionEffect::Message("Upper threshold reached.".into()),
            ],
        ))
        .unwrap();

    console.push_keys([Key::Escape]);
    let mut monitor = AlarmMonitor::with_timing(
        store,
        SensorKind::TemperatureF,
        10,
        TimeUnit::Hours,
        &TimingConfig {
            tick_interval_ms: 0,
            phase_interval_ms: 0,
        },
    );
    let outcome = monitor.run(&mut rover, &mut menu, &mut console, None);

    assert_eq!(outcome, MonitorOutcome::Cancelled);
    assert!(menu.output_text().contains("Upper threshold reached."));
    // Idle/safe state forced on termination.
    assert_eq!(rover.led(), (0, 255, 0));
    assert_eq!(rover.tone(), None);
}

#[test]
fn quiet_sample_keeps_actuators_idle_for_the_whole_run() {
    let (mut menu, mut console, mut rover) = fixture();
    rover.set_light_levels(120, 120);

    let mut store = ThresholdStore::new();
    store.add_low(50).unwrap();
    store.add_high(200).unwrap();

    let mut monitor = AlarmMonitor::with_timing(
        store,
        SensorKind::Light,
        0,
        TimeUnit::Seconds,
        &TimingConfig {
            tick_interval_ms: 0,
            phase_interval_ms: 0,
        },
    );
    let outcome = monitor.run(&mut rover, &mut menu, &mut console, None);
    assert_eq!(outcome, MonitorOutcome::Expired);
    assert_eq!(rover.led(), (0, 255, 0));
    assert!(menu.output_text().is_empty());
}

// ──────────────────── wire form ────────────────────

#[test]
fn wizard_equivalent_action_string_round_trips() {
    let effects = vec![
        ActionEffect::Sound {
            phase: Phase::One,
            freq: 2000,
        },
        ActionEffect::Sound {
            phase: Phase::Two,
            freq: 0,
        },
        ActionEffect::Light {
            phase: Phase::One,
            rgb: (0, 153, 255),
        },
        ActionEffect::Light {
            phase: Phase::Two,
            rgb: (255, 153, 51),
        },
        ActionEffect::Message("Back to the shade!".into()),
    ];
    let encoded = action::encode(&effects);
    let alert = Threshold::from_action(42, &encoded).unwrap();
    assert_eq!(alert.effects, effects);
    assert_eq!(alert.action_string(), encoded);
}

#[test]
fn fragments_are_order_independent() {
    let a = action::decode("#OUTPUT_MESSAGE:hot;#SET_BUZZ_1:1000;").unwrap();
    let b = action::decode("#SET_BUZZ_1:1000;#OUTPUT_MESSAGE:hot;").unwrap();
    let normalize = |effects: &[ActionEffect]| {
        let mut sounds = 0;
        let mut messages = 0;
        for effect in effects {
            match effect {
                ActionEffect::Sound { .. } => sounds += 1,
                ActionEffect::Message(_) => messages += 1,
                ActionEffect::Light { .. } => {}
            }
        }
        (sounds, messages)
    };
    assert_eq!(normalize(&a), normalize(&b));
}
