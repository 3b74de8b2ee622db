//! Validated operator prompts built on the menu engine's read-line.
//!
//! Each helper loops until the operator supplies acceptable input: the
//! output region is cleared, the prompt written, a line read, and on
//! rejection an error message is shown until any key is pressed. Invalid
//! entries are never silently corrected.

use crate::menu::engine::MenuEngine;
use crate::platform::console::Console;

/// Standard re-prompt suffix shown with every validation error.
const PRESS_ANY_KEY: &str = "Press any key to continue...";

/// Block until the operator presses any key.
pub fn wait_any_key(console: &mut dyn Console) {
    let _ = console.read_key();
}

/// Show `error` in the output region and wait for a key.
fn show_error(menu: &mut MenuEngine, console: &mut dyn Console, error: &str) {
    menu.clear(console);
    menu.write_line(console, error, false);
    wait_any_key(console);
}

/// Prompt until the entry matches one of `choices` (case-insensitive).
/// Returns the canonical form from `choices`.
pub fn read_choice(
    menu: &mut MenuEngine,
    console: &mut dyn Console,
    prompt: &str,
    choices: &[&str],
    error: &str,
) -> String {
    loop {
        menu.clear(console);
        menu.write(console, prompt);
        let entered = menu.read_line(console);
        let entered = entered.trim();
        if let Some(matched) = choices
            .iter()
            .find(|choice| choice.eq_ignore_ascii_case(entered))
        {
            return (*matched).to_string();
        }
        show_error(menu, console, error);
    }
}

/// Prompt for yes/no. Accepts `yes`/`y`/`no`/`n` in any case.
pub fn confirm(menu: &mut MenuEngine, console: &mut dyn Console, prompt: &str) -> bool {
    let answer = read_choice(
        menu,
        console,
        prompt,
        &["yes", "y", "no", "n"],
        &format!("Invalid Option: Please enter yes or no. {PRESS_ANY_KEY}"),
    );
    answer == "yes" || answer == "y"
}

/// Prompt until the entry parses as an integer within `min..=max`.
pub fn read_int_in_range(
    menu: &mut MenuEngine,
    console: &mut dyn Console,
    prompt: &str,
    min: i32,
    max: i32,
) -> i32 {
    let error =
        format!("Invalid Selection: Please enter a number between {min} and {max}. {PRESS_ANY_KEY}");
    loop {
        menu.clear(console);
        menu.write(console, prompt);
        let entered = menu.read_line(console);
        if let Ok(value) = entered.trim().parse::<i32>()
            && (min..=max).contains(&value)
        {
            return value;
        }
        show_error(menu, console, &error);
    }
}

/// Prompt until the entry is either zero or within `min..=max`. Used for
/// "frequency or 0 for off" style questions.
pub fn read_int_or_zero(
    menu: &mut MenuEngine,
    console: &mut dyn Console,
    prompt: &str,
    min: i32,
    max: i32,
) -> i32 {
    let error = format!(
        "Invalid Selection: Please enter 0 or a number between {min} and {max}. {PRESS_ANY_KEY}"
    );
    loop {
        menu.clear(console);
        menu.write(console, prompt);
        let entered = menu.read_line(console);
        if let Ok(value) = entered.trim().parse::<i32>()
            && (value == 0 || (min..=max).contains(&value))
        {
            return value;
        }
        show_error(menu, console, &error);
    }
}

/// Prompt until the entry contains none of `forbidden`. Protects the action
/// encoding's delimiter characters at entry time.
pub fn read_text_without(
    menu: &mut MenuEngine,
    console: &mut dyn Console,
    prompt: &str,
    forbidden: &[char],
) -> String {
    let listed: String = forbidden
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(" ");
    let error =
        format!("Invalid Entry: The characters {listed} are not allowed. {PRESS_ANY_KEY}");
    loop {
        menu.clear(console);
        menu.write(console, prompt);
        let entered = menu.read_line(console);
        if !entered.chars().any(|c| forbidden.contains(&c)) {
            return entered;
        }
        show_error(menu, console, &error);
    }
}

// ──────────────────── tests ────────────────────
