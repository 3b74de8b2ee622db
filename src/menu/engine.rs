//! Menu engine: screen rendering and the cooperative input state machine.
//!
//! A `MenuEngine` owns one screen's state: the literal template rows, the
//! selection index, the append-only output log, and the in-progress free-text
//! buffer. [`MenuEngine::refresh`] is called once per tick of a cooperative
//! poll loop — it redraws the selector and output region, then consumes at
//! most one key event if one is available. While text is being edited the
//! input buffer is always the trailing suffix of the output log, so the
//! renderer can treat both uniformly.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use crate::menu::template::{BLANK_OPTION, MenuTemplate, ScreenLayout};
use crate::platform::console::{Console, Key};

/// Renders an auxiliary panel after the base screen each refresh.
///
/// Screens that need a side panel supply one of these instead of subclassing
/// the engine.
pub trait PanelRenderer {
    /// Draw the panel. Runs after the base render of every refresh.
    fn render(&mut self, console: &mut dyn Console, layout: &ScreenLayout);
}

/// One screen's rendering and input state.
pub struct MenuEngine {
    rows: Vec<String>,
    layout: ScreenLayout,
    indicator: String,
    options: Vec<String>,
    current_option: usize,
    previous_selection: usize,
    selected_option: String,
    input: String,
    output: String,
    formatted: Vec<String>,
    enter_pressed: bool,
    hover_changed: bool,
    panel: Option<Box<dyn PanelRenderer>>,
}

impl MenuEngine {
    /// Build an engine from a parsed template.
    #[must_use]
    pub fn from_template(template: MenuTemplate) -> Self {
        let selected = template.options.first().cloned().unwrap_or_default();
        let lines = template.layout.output_lines;
        Self {
            rows: template.rows,
            layout: template.layout,
            indicator: template.selection_indicator,
            options: template.options,
            current_option: 0,
            previous_selection: 0,
            selected_option: selected,
            input: String::new(),
            output: String::new(),
            formatted: vec![String::new(); lines],
            enter_pressed: false,
            hover_changed: false,
            panel: None,
        }
    }

    /// Attach an auxiliary panel renderer.
    pub fn set_panel(&mut self, panel: Option<Box<dyn PanelRenderer>>) {
        self.panel = panel;
    }

    // ──────────────────── accessors ────────────────────

    /// Identifier of the currently selected option.
    #[must_use]
    pub fn selected_option(&self) -> &str {
        &self.selected_option
    }

    /// Whether Enter was observed during the last refresh.
    #[must_use]
    pub fn enter_pressed(&self) -> bool {
        self.enter_pressed
    }

    /// Whether the last refresh moved the selection (or fully reloaded).
    #[must_use]
    pub fn hover_changed(&self) -> bool {
        self.hover_changed
    }

    /// Current free-text buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Raw accumulated output log.
    #[must_use]
    pub fn output_text(&self) -> &str {
        &self.output
    }

    /// Screen geometry.
    #[must_use]
    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    /// Rendered output lines from the last display pass.
    #[must_use]
    pub fn formatted_lines(&self) -> &[String] {
        &self.formatted
    }

    // ──────────────────── refresh ────────────────────

    /// One tick: render, then consume at most one pending key event.
    ///
    /// `full_reload` repaints the whole template and resets the selection to
    /// option 0. A partial refresh only touches the selector glyph and the
    /// output region.
    pub fn refresh(&mut self, console: &mut dyn Console, full_reload: bool) {
        if full_reload {
            self.current_option = 0;
            self.selected_option = self.options.first().cloned().unwrap_or_default();
            self.hover_changed = true;

            console.clear();
            console.hide_cursor();
            for (row, line) in self.rows.iter().enumerate() {
                console.set_cursor(0, row as u16);
                console.write(line);
            }
        } else {
            self.hover_changed = false;
        }

        // Selector glyph, then the output region.
        console.set_cursor(self.layout.selector_col, self.selection_row());
        console.write(&self.indicator);
        self.display_output(console);

        if let Some(mut panel) = self.panel.take() {
            panel.render(console, &self.layout);
            self.panel = Some(panel);
        }
        console.flush();

        // Submitted is a one-shot flag: cleared on every poll.
        self.enter_pressed = false;

        if !console.key_available() {
            return;
        }
        match console.read_key() {
            Key::Up => self.step_selection(console, -1),
            Key::Down => self.step_selection(console, 1),
            Key::Enter => self.enter_pressed = true,
            Key::Backspace => {
                if !self.input.is_empty() {
                    self.strip_input_suffix();
                    self.input.pop();
                }
            }
            Key::Char(ch) => {
                self.strip_input_suffix();
                self.input.push(ch);
            }
            Key::Escape | Key::Other => {}
        }
    }

    /// Move the selection one step in `direction`, skipping blank-line
    /// sentinels by continuing in the same direction. A walk that runs past
    /// the option bounds rolls back to the pre-move selection and beeps, so
    /// the reported selection is never a sentinel.
    fn step_selection(&mut self, console: &mut dyn Console, direction: isize) {
        let last_index = self.options.len().saturating_sub(1);
        let at_edge = if direction < 0 {
            self.current_option == 0
        } else {
            self.options.is_empty() || self.current_option == last_index
        };
        if at_edge {
            console.beep();
            return;
        }

        // Erase the old selector glyph.
        console.set_cursor(self.layout.selector_col, self.selection_row());
        console.write(&" ".repeat(self.indicator.chars().count()));

        let origin = self.current_option;
        let mut index = self.current_option as isize + direction;

        self.clear(console);
        self.hover_changed = true;

        // Skip sentinels, updating the recall index as the walk advances.
        loop {
            let landed = usize::try_from(index)
                .ok()
                .filter(|&i| i < self.options.len());
            let Some(i) = landed else {
                // Every remaining option was a sentinel: roll back.
                self.current_option = origin;
                self.selected_option = self.options.get(origin).cloned().unwrap_or_default();
                console.beep();
                return;
            };
            if self.options[i] == BLANK_OPTION {
                index += direction;
                self.previous_selection = usize::try_from(index).unwrap_or(0);
            } else {
                self.current_option = i;
                self.selected_option = self.options[i].clone();
                return;
            }
        }
    }

    /// Restore the selection saved before the last sentinel-skipping move.
    pub fn recall_previous_selection(&mut self, console: &mut dyn Console) {
        console.set_cursor(self.layout.selector_col, self.selection_row());
        console.write(&" ".repeat(self.indicator.chars().count()));

        self.current_option = self.previous_selection.min(self.options.len().saturating_sub(1));
        self.selected_option = self
            .options
            .get(self.current_option)
            .cloned()
            .unwrap_or_default();
    }

    fn selection_row(&self) -> u16 {
        self.layout.first_line + self.current_option as u16
    }

    // ──────────────────── output region ────────────────────

    /// Re-wrap the full output log into the viewport and paint it.
    ///
    /// Greedy word-agnostic wrap at `max_chars_per_line`; embedded newlines
    /// are hard breaks; every line is right-padded to full width. Overflow
    /// shifts the rendered lines up by one and re-enters the wrap loop at the
    /// same position — a faithful scroll-up.
    fn display_output(&mut self, console: &mut dyn Console) {
        self.strip_input_suffix();
        self.output.push_str(&self.input);

        let max_chars = self.layout.max_chars_per_line;
        let chars: Vec<char> = self.output.chars().collect();
        let mut cur = 0usize;
        let mut parsed = 0usize;

        for slot in &mut self.formatted {
            slot.clear();
        }

        let mut line_num = 0usize;
        while line_num < self.formatted.len() {
            let mut line = String::new();
            while cur < chars.len() {
                if cur - parsed == max_chars {
                    break;
                }
                if chars[cur] == '\n' {
                    cur += 1;
                    break;
                }
                line.push(chars[cur]);
                cur += 1;
            }
            parsed = cur;

            while line.chars().count() < max_chars {
                line.push(' ');
            }
            self.formatted[line_num] = line;

            if line_num == self.formatted.len() - 1 && parsed < chars.len() {
                // Viewport full with content remaining: drop the oldest
                // rendered line and keep wrapping into the freed slot.
                for i in 0..self.formatted.len() - 1 {
                    self.formatted[i] = self.formatted[i + 1].clone();
                }
                continue;
            }
            line_num += 1;
        }

        console.hide_cursor();
        for (i, line) in self.formatted.iter().enumerate() {
            console.set_cursor(self.layout.output_left, self.layout.output_top + i as u16);
            console.write(line);
        }
    }

    /// Drop the input-buffer suffix from the output log. The next display
    /// pass re-appends the current buffer.
    fn strip_input_suffix(&mut self) {
        if self.input.is_empty() {
            return;
        }
        let output_chars = self.output.chars().count();
        let input_chars = self.input.chars().count();
        if output_chars >= input_chars && output_chars != 0 {
            self.output = self
                .output
                .chars()
                .take(output_chars - input_chars)
                .collect();
        }
    }

    /// Enforce the buffered-output cap by discarding the oldest characters.
    /// Only called from the write paths, never mid-edit.
    fn trim_output_buffer(&mut self) {
        let count = self.output.chars().count();
        if count > self.layout.max_output_chars {
            self.output = self
                .output
                .chars()
                .skip(count - self.layout.max_output_chars)
                .collect();
        }
    }

    // ──────────────────── menu IO ────────────────────

    /// Blank the output region and reset the output log and input buffer.
    pub fn clear(&mut self, console: &mut dyn Console) {
        self.output.clear();
        self.input.clear();
        for slot in &mut self.formatted {
            slot.clear();
        }

        let blank = " ".repeat(self.layout.max_chars_per_line);
        for line in 0..self.layout.output_lines {
            console.set_cursor(self.layout.output_left, self.layout.output_top + line as u16);
            console.write(&blank);
        }
    }

    /// Append text to the output region, like `write!` scoped to the viewport.
    pub fn write(&mut self, console: &mut dyn Console, text: &str) {
        self.output.push_str(text);
        self.trim_output_buffer();
        self.display_output(console);
    }

    /// Append a line to the output region. With `spam_guard`, a line already
    /// present anywhere in the log is dropped.
    pub fn write_line(&mut self, console: &mut dyn Console, line: &str, spam_guard: bool) {
        if spam_guard && self.output.contains(line) {
            return;
        }
        self.output.push_str(line);
        self.output.push('\n');
        self.trim_output_buffer();
        self.display_output(console);
    }

    /// Gather a line of text, echoing into the output region, until Enter.
    ///
    /// Blocks the calling flow by polling keys — the same edit semantics as
    /// the main loop, without returning control between keys.
    pub fn read_line(&mut self, console: &mut dyn Console) -> String {
        loop {
            match console.read_key() {
                Key::Enter => break,
                Key::Backspace => {
                    if !self.input.is_empty() {
                        self.strip_input_suffix();
                        self.input.pop();
                    }
                }
                Key::Char(ch) => {
                    self.strip_input_suffix();
                    self.input.push(ch);
                }
                Key::Up | Key::Down | Key::Escape | Key::Other => {}
            }
            self.display_output(console);
        }

        // The last display pass left the committed text in the output log;
        // clearing the buffer here makes the commit permanent.
        let entered = std::mem::take(&mut self.input);
        self.display_output(console);
        entered
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::template::MenuTemplate;
    use crate::platform::console::{Console, Key, ScriptedConsole};

    fn test_template(options: &str) -> MenuTemplate {
        let mut text = String::new();
        text.push_str("<info>\n");
        text.push_str("selectorCol={1}\nfirstLine={2}\nselectionIndicator={*}\n");
        text.push_str("output={2,10,77,20}\n");
        text.push_str(&format!("options={{{options}}}\n"));
        text.push_str("</info>\n<menu>\n");
        for _ in 0..25 {
            text.push_str(&" ".repeat(80));
            text.push('\n');
        }
        text.push_str("</menu>\n");
        MenuTemplate::parse(&text)
    }

    fn engine(options: &str) -> (MenuEngine, ScriptedConsole) {
        let menu = MenuEngine::from_template(test_template(options));
        let console = ScriptedConsole::new(80, 25);
        (menu, console)
    }

    #[test]
    fn full_reload_selects_first_option() {
        let (mut menu, mut console) = engine("one,two,three");
        menu.refresh(&mut console, true);
        assert_eq!(menu.selected_option(), "one");
        assert!(menu.hover_changed());
        assert_eq!(console.char_at(1, 2), '*');
    }

    #[test]
    fn down_moves_and_redraws_selector() {
        let (mut menu, mut console) = engine("one,two,three");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Down]);
        menu.refresh(&mut console, false);
        assert_eq!(menu.selected_option(), "two");
        // Next render places the glyph on the new row and the old row blank.
        menu.refresh(&mut console, false);
        assert_eq!(console.char_at(1, 3), '*');
        assert_eq!(console.char_at(1, 2), ' ');
    }

    #[test]
    fn up_at_top_beeps_without_moving() {
        let (mut menu, mut console) = engine("one,two");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Up]);
        menu.refresh(&mut console, false);
        assert_eq!(menu.selected_option(), "one");
        assert_eq!(console.beep_count(), 1);
    }

    #[test]
    fn down_at_bottom_beeps_without_moving() {
        let (mut menu, mut console) = engine("one,two");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Down, Key::Down]);
        menu.refresh(&mut console, false);
        menu.refresh(&mut console, false);
        assert_eq!(menu.selected_option(), "two");
        assert_eq!(console.beep_count(), 1);
    }

    #[test]
    fn navigation_skips_blank_sentinels() {
        let (mut menu, mut console) = engine("one,__NULL_LINE__,three");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Down]);
        menu.refresh(&mut console, false);
        assert_eq!(menu.selected_option(), "three");
    }

    #[test]
    fn sentinel_walk_past_bounds_rolls_back() {
        let (mut menu, mut console) = engine("one,__NULL_LINE__,__NULL_LINE__");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Down]);
        menu.refresh(&mut console, false);
        // Everything below the first option is a sentinel: stay put, beep.
        assert_eq!(menu.selected_option(), "one");
        assert!(console.beep_count() >= 1);
    }

    #[test]
    fn selection_never_reports_sentinel() {
        let (mut menu, mut console) = engine("one,__NULL_LINE__,three,__NULL_LINE__,five");
        menu.refresh(&mut console, true);
        for _ in 0..8 {
            console.push_keys([Key::Down]);
            menu.refresh(&mut console, false);
            assert_ne!(menu.selected_option(), BLANK_OPTION);
        }
        for _ in 0..8 {
            console.push_keys([Key::Up]);
            menu.refresh(&mut console, false);
            assert_ne!(menu.selected_option(), BLANK_OPTION);
        }
    }

    #[test]
    fn enter_is_one_shot() {
        let (mut menu, mut console) = engine("one,two");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Enter]);
        menu.refresh(&mut console, false);
        assert!(menu.enter_pressed());
        menu.refresh(&mut console, false);
        assert!(!menu.enter_pressed());
    }

    #[test]
    fn typed_characters_accumulate_and_echo() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        for ch in ['h', 'i'] {
            console.push_keys([Key::Char(ch)]);
            menu.refresh(&mut console, false);
        }
        menu.refresh(&mut console, false);
        assert_eq!(menu.input(), "hi");
        assert!(console.row_text(10).contains("hi"));
    }

    #[test]
    fn backspace_removes_last_char() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        for key in [Key::Char('h'), Key::Char('i'), Key::Backspace] {
            console.push_keys([key]);
            menu.refresh(&mut console, false);
        }
        menu.refresh(&mut console, false);
        assert_eq!(menu.input(), "h");
    }

    #[test]
    fn backspace_on_empty_buffer_is_noop() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Backspace]);
        menu.refresh(&mut console, false);
        assert_eq!(menu.input(), "");
        assert_eq!(menu.output_text(), "");
    }

    #[test]
    fn wrap_splits_at_exact_width() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        let long = "x".repeat(80); // 76 chars per line in this layout
        menu.write(&mut console, &long);
        let lines = menu.formatted_lines();
        assert_eq!(lines[0], "x".repeat(76));
        assert_eq!(lines[1], format!("{}{}", "x".repeat(4), " ".repeat(72)));
    }

    #[test]
    fn embedded_newline_forces_break() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        menu.write(&mut console, "ab\ncd");
        let lines = menu.formatted_lines();
        assert!(lines[0].starts_with("ab "));
        assert!(lines[1].starts_with("cd "));
    }

    #[test]
    fn every_rendered_line_is_padded_to_width() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        menu.write(&mut console, "short\nlines");
        for line in menu.formatted_lines() {
            assert_eq!(line.chars().count(), 76);
        }
    }

    #[test]
    fn overflow_scrolls_oldest_line_out() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        // Viewport rows 10..=20 → 11 lines. Write 12 numbered lines.
        for i in 0..12 {
            menu.write_line(&mut console, &format!("line-{i}"), false);
        }
        let lines = menu.formatted_lines();
        assert!(lines[0].starts_with("line-1"));
        assert!(lines[10].starts_with("line-1 ") || lines[10].starts_with("line-11"));
        assert!(!menu.formatted_lines()[0].starts_with("line-0 "));
    }

    #[test]
    fn spam_guard_suppresses_duplicate_lines() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        menu.write_line(&mut console, "alert!", true);
        menu.write_line(&mut console, "alert!", true);
        assert_eq!(menu.output_text().matches("alert!").count(), 1);
    }

    #[test]
    fn clear_blanks_viewport_and_state() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        menu.write_line(&mut console, "hello", false);
        assert!(console.row_text(10).contains("hello"));
        menu.clear(&mut console);
        assert_eq!(menu.output_text(), "");
        assert!(!console.row_text(10).contains("hello"));
    }

    #[test]
    fn read_line_collects_until_enter() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        console.type_line("rover");
        let entered = menu.read_line(&mut console);
        assert_eq!(entered, "rover");
        assert_eq!(menu.input(), "");
        // The committed text stays in the log exactly once.
        assert_eq!(menu.output_text().matches("rover").count(), 1);
    }

    #[test]
    fn read_line_honors_backspace() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        console.push_keys([
            Key::Char('h'),
            Key::Char('u'),
            Key::Backspace,
            Key::Char('i'),
            Key::Enter,
        ]);
        assert_eq!(menu.read_line(&mut console), "hi");
    }

    #[test]
    fn recall_previous_selection_restores_index() {
        let (mut menu, mut console) = engine("one,__NULL_LINE__,three");
        menu.refresh(&mut console, true);
        console.push_keys([Key::Down]);
        menu.refresh(&mut console, false);
        assert_eq!(menu.selected_option(), "three");
        menu.recall_previous_selection(&mut console);
        // The skip walk recorded the landing index as the recall point.
        assert_eq!(menu.selected_option(), "three");
    }

    #[test]
    fn panel_renders_after_the_base_screen() {
        struct StatusPanel;
        impl PanelRenderer for StatusPanel {
            fn render(&mut self, console: &mut dyn Console, layout: &ScreenLayout) {
                console.set_cursor(0, layout.console_height - 1);
                console.write("[panel]");
            }
        }

        let (mut menu, mut console) = engine("one");
        menu.set_panel(Some(Box::new(StatusPanel)));
        menu.refresh(&mut console, true);
        assert!(console.row_text(24).starts_with("[panel]"));
    }

    #[test]
    fn output_buffer_is_bounded() {
        let (mut menu, mut console) = engine("one");
        menu.refresh(&mut console, true);
        let cap = menu.layout().max_output_chars;
        for _ in 0..40 {
            menu.write_line(&mut console, &"y".repeat(100), false);
        }
        assert!(menu.output_text().chars().count() <= cap);
    }
}
