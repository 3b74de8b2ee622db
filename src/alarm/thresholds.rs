//! Threshold entries and the low/high store.
//!
//! Entries are compared by trigger value only — duplicate triggers are
//! allowed and never deduplicated. The store keeps both lists sorted
//! ascending and re-validates on every mutation: a configuration where any
//! low trigger reaches any high trigger has no quiet band and is rejected
//! before it can be committed.

use crate::alarm::action::{self, ActionEffect, Phase};
use crate::core::errors::{Result, RoverError};

/// Message attached to a low entry added without an explicit action.
pub const DEFAULT_LOW_MESSAGE: &str = "Low threshold reached.";
/// Message attached to a high entry added without an explicit action.
pub const DEFAULT_HIGH_MESSAGE: &str = "Upper threshold reached.";

// ──────────────────── threshold ────────────────────

/// One alert: a trigger value and its decoded effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threshold {
    /// Sensor value this alert compares against.
    pub trigger: i32,
    /// Effects applied while the alert is active.
    pub effects: Vec<ActionEffect>,
}

impl Threshold {
    /// Build from already-decoded effects.
    #[must_use]
    pub fn new(trigger: i32, effects: Vec<ActionEffect>) -> Self {
        Self { trigger, effects }
    }

    /// Build from an encoded action string. Malformed payloads raise.
    pub fn from_action(trigger: i32, action: &str) -> Result<Self> {
        Ok(Self {
            trigger,
            effects: action::decode(action)?,
        })
    }

    /// The encoded action string form.
    #[must_use]
    pub fn action_string(&self) -> String {
        action::encode(&self.effects)
    }

    /// Whether either phase carries an audible effect.
    #[must_use]
    pub fn has_sound(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, ActionEffect::Sound { .. }))
    }

    /// Whether either phase carries a light effect.
    #[must_use]
    pub fn has_light(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, ActionEffect::Light { .. }))
    }

    /// The message effect's text, if present. With several message effects
    /// the last one wins, matching the encoded form's extraction rule.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.effects.iter().rev().find_map(|e| match e {
            ActionEffect::Message(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Effects restricted to the given phase, plus messages.
    pub fn effects_for_phase(&self, phase: Phase) -> impl Iterator<Item = &ActionEffect> {
        self.effects.iter().filter(move |effect| match effect {
            ActionEffect::Sound { phase: p, .. } | ActionEffect::Light { phase: p, .. } => {
                *p == phase
            }
            ActionEffect::Message(_) => true,
        })
    }
}

// ──────────────────── store ────────────────────

/// Sorted low and high alert lists.
#[derive(Debug, Clone, Default)]
pub struct ThresholdStore {
    low: Vec<Threshold>,
    high: Vec<Threshold>,
}

impl ThresholdStore {
    /// Empty store — valid by definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Low alerts, sorted ascending by trigger.
    #[must_use]
    pub fn low(&self) -> &[Threshold] {
        &self.low
    }

    /// High alerts, sorted ascending by trigger.
    #[must_use]
    pub fn high(&self) -> &[Threshold] {
        &self.high
    }

    /// Whether no alerts are configured on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.high.is_empty()
    }

    /// Drop every alert.
    pub fn reset(&mut self) {
        self.low.clear();
        self.high.clear();
    }

    /// Add a low alert with the default message action.
    pub fn add_low(&mut self, trigger: i32) -> Result<()> {
        self.add_low_alert(Threshold::new(
            trigger,
            vec![ActionEffect::Message(DEFAULT_LOW_MESSAGE.to_string())],
        ))
    }

    /// Add a high alert with the default message action.
    pub fn add_high(&mut self, trigger: i32) -> Result<()> {
        self.add_high_alert(Threshold::new(
            trigger,
            vec![ActionEffect::Message(DEFAULT_HIGH_MESSAGE.to_string())],
        ))
    }

    /// Add several low alerts with the default message action.
    pub fn add_low_many(&mut self, triggers: &[i32]) -> Result<()> {
        for &trigger in triggers {
            self.low.push(Threshold::new(
                trigger,
                vec![ActionEffect::Message(DEFAULT_LOW_MESSAGE.to_string())],
            ));
        }
        self.validate()
    }

    /// Add several high alerts with the default message action.
    pub fn add_high_many(&mut self, triggers: &[i32]) -> Result<()> {
        for &trigger in triggers {
            self.high.push(Threshold::new(
                trigger,
                vec![ActionEffect::Message(DEFAULT_HIGH_MESSAGE.to_string())],
            ));
        }
        self.validate()
    }

    /// Add a pre-built low alert.
    pub fn add_low_alert(&mut self, alert: Threshold) -> Result<()> {
        self.low.push(alert);
        self.validate()
    }

    /// Add a pre-built high alert.
    pub fn add_high_alert(&mut self, alert: Threshold) -> Result<()> {
        self.high.push(alert);
        self.validate()
    }

    /// Replace both lists at once, then validate.
    pub fn replace(&mut self, low: Vec<Threshold>, high: Vec<Threshold>) -> Result<()> {
        self.low = low;
        self.high = high;
        self.validate()
    }

    /// Sort both lists ascending and require `max(low) < min(high)`.
    /// An empty side imposes no restriction.
    pub fn validate(&mut self) -> Result<()> {
        self.sort_lists();
        if let (Some(last_low), Some(first_high)) = (self.low.last(), self.high.first())
            && last_low.trigger >= first_high.trigger
        {
            return Err(RoverError::InvalidThresholds {
                details: format!(
                    "no condition exists to stop the alarm: every low alert must be \
                     below every high alert (low {} >= high {})",
                    last_low.trigger, first_high.trigger
                ),
            });
        }
        Ok(())
    }

    /// Stable ascending sort by trigger value only.
    pub fn sort_lists(&mut self) {
        self.low.sort_by_key(|alert| alert.trigger);
        self.high.sort_by_key(|alert| alert.trigger);
    }
}

// ──────────────────── tests ────────────────────
