//! Compound alert actions and their `#TAG:payload;` wire encoding.
//!
//! An alert's action is zero or more tagged fragments concatenated in any
//! order. Internally actions are [`ActionEffect`] variants — the string form
//! exists only at the entry and persistence boundary, so evaluation never
//! re-parses. The grammar is flat: fragment start at `#`, fragment end at
//! `;`, no nesting, no escaping. A payload containing `;` breaks fragment
//! parsing; entry validation keeps the delimiter characters out of message
//! text, the codec itself does not police payloads.

use crate::core::errors::{Result, RoverError};

/// Phase-1 sound fragment tag.
pub const SOUND_TAG_1: &str = "#SET_BUZZ_1:";
/// Phase-2 sound fragment tag.
pub const SOUND_TAG_2: &str = "#SET_BUZZ_2:";
/// Phase-1 light fragment tag.
pub const LIGHT_TAG_1: &str = "#SET_LED_1:";
/// Phase-2 light fragment tag.
pub const LIGHT_TAG_2: &str = "#SET_LED_2:";
/// Message fragment tag.
pub const MESSAGE_TAG: &str = "#OUTPUT_MESSAGE:";

/// Which half of the alternation window an effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First 500 ms window.
    One,
    /// Second 500 ms window.
    Two,
}

impl Phase {
    /// The other phase.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// One decoded alert effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Buzzer frequency for one phase. Zero means silence.
    Sound {
        /// Phase this effect fires in.
        phase: Phase,
        /// Frequency in Hz, or 0 for off.
        freq: u32,
    },
    /// LED color for one phase.
    Light {
        /// Phase this effect fires in.
        phase: Phase,
        /// Red, green, blue components.
        rgb: (u8, u8, u8),
    },
    /// Output-region message, shown every tick the alert is active.
    Message(String),
}

// ──────────────────── encode ────────────────────

/// Serialize effects to the fragment string form.
#[must_use]
pub fn encode(effects: &[ActionEffect]) -> String {
    let mut out = String::new();
    for effect in effects {
        match effect {
            ActionEffect::Sound { phase, freq } => {
                let tag = match phase {
                    Phase::One => SOUND_TAG_1,
                    Phase::Two => SOUND_TAG_2,
                };
                out.push_str(&format!("{tag}{freq};"));
            }
            ActionEffect::Light { phase, rgb } => {
                let tag = match phase {
                    Phase::One => LIGHT_TAG_1,
                    Phase::Two => LIGHT_TAG_2,
                };
                out.push_str(&format!("{tag}{},{},{};", rgb.0, rgb.1, rgb.2));
            }
            ActionEffect::Message(text) => {
                out.push_str(&format!("{MESSAGE_TAG}{text};"));
            }
        }
    }
    out
}

// ──────────────────── decode primitives ────────────────────

/// Whether the action string carries the given tag.
#[must_use]
pub fn check_tag(action: &str, tag: &str) -> bool {
    action.contains(tag)
}

/// Extract the payload of the given tag's **last** occurrence: the characters
/// between the `:` that closes the tag and the next `;` (or end of string).
/// Returns `None` when the tag is absent.
#[must_use]
pub fn extract_tag(action: &str, tag: &str) -> Option<String> {
    let at = action.rfind(tag)?;
    let mut payload = String::new();
    let mut collecting = false;
    for ch in action[at..].chars() {
        if ch == ':' && !collecting {
            collecting = true;
        } else if ch == ';' {
            break;
        } else if collecting {
            payload.push(ch);
        }
    }
    Some(payload)
}

/// Split an action string into its fragments, each inclusive of its own
/// `#`…`;`. A `;` with no preceding `#` emits from the start of the string —
/// the grammar is flat and unforgiving by design.
#[must_use]
pub fn split_fragments(action: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut start = 0usize;
    for (idx, ch) in action.char_indices() {
        if ch == '#' {
            start = idx;
        } else if ch == ';' {
            fragments.push(action[start..=idx].to_string());
        }
    }
    fragments
}

// ──────────────────── full decode ────────────────────

/// Decode an action string into effects.
///
/// Unknown tags are skipped (tolerant, like the template parser); a known tag
/// with a malformed numeric payload is a configuration error.
pub fn decode(action: &str) -> Result<Vec<ActionEffect>> {
    let mut effects = Vec::new();
    for fragment in split_fragments(action) {
        if let Some(payload) = fragment_payload(&fragment, SOUND_TAG_1) {
            effects.push(ActionEffect::Sound {
                phase: Phase::One,
                freq: parse_freq(payload)?,
            });
        } else if let Some(payload) = fragment_payload(&fragment, SOUND_TAG_2) {
            effects.push(ActionEffect::Sound {
                phase: Phase::Two,
                freq: parse_freq(payload)?,
            });
        } else if let Some(payload) = fragment_payload(&fragment, LIGHT_TAG_1) {
            effects.push(ActionEffect::Light {
                phase: Phase::One,
                rgb: parse_rgb(payload)?,
            });
        } else if let Some(payload) = fragment_payload(&fragment, LIGHT_TAG_2) {
            effects.push(ActionEffect::Light {
                phase: Phase::Two,
                rgb: parse_rgb(payload)?,
            });
        } else if let Some(payload) = fragment_payload(&fragment, MESSAGE_TAG) {
            effects.push(ActionEffect::Message(payload.to_string()));
        }
    }
    Ok(effects)
}

/// Payload of a fragment carrying `tag`, without the trailing `;`.
fn fragment_payload<'a>(fragment: &'a str, tag: &str) -> Option<&'a str> {
    let rest = fragment.strip_prefix(tag)?;
    Some(rest.strip_suffix(';').unwrap_or(rest))
}

fn parse_freq(payload: &str) -> Result<u32> {
    payload
        .parse::<u32>()
        .map_err(|_| RoverError::MalformedAction {
            context: "frequency",
            details: format!("not a number: {payload:?}"),
        })
}

fn parse_rgb(payload: &str) -> Result<(u8, u8, u8)> {
    let parts: Vec<&str> = payload.split(',').collect();
    if parts.len() != 3 {
        return Err(RoverError::MalformedAction {
            context: "rgb",
            details: format!("expected 3 components, got {}", parts.len()),
        });
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.parse::<u8>().map_err(|_| RoverError::MalformedAction {
            context: "rgb",
            details: format!("component out of range or not a number: {part:?}"),
        })?;
    }
    Ok((rgb[0], rgb[1], rgb[2]))
}

// ──────────────────── tests ────────────────────
