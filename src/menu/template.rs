//! Screen template parsing.
//!
//! A template is a plain-text file with two tagged sections: `<menu>` holds
//! the literal screen rows, one per console line, and `<info>` holds
//! `key={v1,v2,...}` assignments that may span lines. The parser is tolerant
//! by design: unrecognized or malformed keys leave the corresponding field at
//! its default, and a value that fails to convert falls back silently. The
//! only hard failure is the file not being readable at all.

use std::fs;
use std::path::Path;

use crate::core::errors::{Result, RoverError};

/// Option id for a non-selectable blank row. Navigation skips over it.
pub const BLANK_OPTION: &str = "__NULL_LINE__";

const INFO_OPEN: &str = "<info>";
const INFO_CLOSE: &str = "</info>";
const MENU_OPEN: &str = "<menu>";
const MENU_CLOSE: &str = "</menu>";

/// Minimum output-region width in columns (`left <= right - 50`).
const MIN_OUTPUT_SPAN: u16 = 50;
/// Minimum output-region height in rows (`top <= bottom - 2`).
const MIN_OUTPUT_ROWS: u16 = 2;

// ──────────────────── screen layout ────────────────────

/// Fixed screen geometry derived from a template.
///
/// When the template's `output` key is absent or fails verification, the
/// viewport fields keep their defaults: a single 80-character line at the
/// origin. The engine renders into that degraded region rather than
/// refusing to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Column the selection indicator is drawn in.
    pub selector_col: u16,
    /// Row of the first option.
    pub first_line: u16,
    /// Row of the last option.
    pub last_line: u16,
    /// Console width in columns.
    pub console_width: u16,
    /// Console height in rows.
    pub console_height: u16,
    /// Output viewport left column.
    pub output_left: u16,
    /// Output viewport top row.
    pub output_top: u16,
    /// Output viewport right column.
    pub output_right: u16,
    /// Output viewport bottom row.
    pub output_bottom: u16,
    /// Characters per rendered output line.
    pub max_chars_per_line: usize,
    /// Cap on buffered output characters.
    pub max_output_chars: usize,
    /// Rendered output lines in the viewport.
    pub output_lines: usize,
    /// Whether the `output` key passed verification.
    pub output_configured: bool,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            selector_col: 0,
            first_line: 0,
            last_line: 0,
            console_width: 80,
            console_height: 25,
            output_left: 0,
            output_top: 0,
            output_right: 0,
            output_bottom: 0,
            max_chars_per_line: 80,
            max_output_chars: 2000,
            output_lines: 1,
            output_configured: false,
        }
    }
}

// ──────────────────── template ────────────────────

/// A parsed screen template: literal rows, geometry, and option ids.
#[derive(Debug, Clone, Default)]
pub struct MenuTemplate {
    /// Literal screen rows from the `<menu>` section.
    pub rows: Vec<String>,
    /// Geometry derived from the `<info>` section.
    pub layout: ScreenLayout,
    /// Glyph drawn at the selected option's row.
    pub selection_indicator: String,
    /// Ordered option identifiers, index-aligned with option rows.
    pub options: Vec<String>,
}

impl MenuTemplate {
    /// Read and parse a template file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RoverError::MissingTemplate {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|e| RoverError::io(path, e))?;
        Ok(Self::parse(&raw))
    }

    /// Parse template text. Never fails: missing sections and malformed keys
    /// leave defaults in place.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut template = Self {
            selection_indicator: "*".to_string(),
            ..Self::default()
        };

        // Literal screen rows: console geometry follows the menu block.
        template.rows = section_lines(&lines, MENU_OPEN, MENU_CLOSE)
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        if !template.rows.is_empty() {
            template.layout.console_height = u16::try_from(template.rows.len()).unwrap_or(u16::MAX);
            template.layout.console_width =
                u16::try_from(template.rows[0].chars().count()).unwrap_or(u16::MAX);
        }

        let info = section_lines(&lines, INFO_OPEN, INFO_CLOSE);

        if let Some(data) = search_info_tag(&info, "selectorCol")
            && let Some(value) = data.first().and_then(|v| v.parse::<u16>().ok())
        {
            template.layout.selector_col = value;
        }
        if let Some(data) = search_info_tag(&info, "firstLine")
            && let Some(value) = data.first().and_then(|v| v.parse::<u16>().ok())
        {
            template.layout.first_line = value;
        }
        if let Some(data) = search_info_tag(&info, "selectionIndicator")
            && let Some(value) = data.first()
        {
            template.selection_indicator = value.clone();
        }
        if let Some(data) = search_info_tag(&info, "output")
            && let Some((left, top, right, bottom)) = verify_output_region(
                &data,
                template.layout.console_width,
                template.layout.console_height,
            )
        {
            template.layout.output_left = left;
            template.layout.output_top = top;
            template.layout.output_right = right;
            template.layout.output_bottom = bottom;
            template.layout.output_lines = usize::from(bottom - top + 1);
            template.layout.max_chars_per_line = usize::from(right - left + 1);
            template.layout.max_output_chars =
                template.layout.max_chars_per_line * template.layout.output_lines;
            template.layout.output_configured = true;
        }
        if let Some(data) = search_info_tag(&info, "options") {
            template.options = data;
            template.layout.last_line = template.layout.first_line
                + u16::try_from(template.options.len().saturating_sub(1)).unwrap_or(0);
        }

        template
    }
}

// ──────────────────── section + tag scanning ────────────────────

/// Lines strictly between the first `open` marker and the following `close`
/// marker. Located by substring search, not a tokenizer.
fn section_lines<'a>(lines: &[&'a str], open: &str, close: &str) -> Vec<&'a str> {
    let mut start = 0usize;
    let mut end = 0usize;
    for (i, line) in lines.iter().enumerate() {
        if line.contains(open) {
            start = i + 1;
        } else if line.contains(close) {
            end = i;
            break;
        }
    }
    if end > start {
        lines[start..end].to_vec()
    } else {
        Vec::new()
    }
}

/// Locate `tag=` in the info section and collect the comma-separated fields
/// inside the following `{...}` span, which may cross line boundaries.
/// Spaces and tabs inside the braces are dropped. Returns `None` when the tag
/// is absent.
fn search_info_tag(info: &[&str], tag: &str) -> Option<Vec<String>> {
    let marker = format!("{tag}=");
    let tag_line = info.iter().position(|line| line.contains(&marker))?;

    // Find the brace span: first '{' at or after the tag line, then the
    // matching-by-position '}' (flat grammar, no nesting).
    let mut open: Option<(usize, usize)> = None;
    let mut close: Option<(usize, usize)> = None;
    'scan: for (j, line) in info.iter().enumerate().skip(tag_line) {
        for (k, ch) in line.chars().enumerate() {
            if ch == '{' {
                open = Some((j, k));
            } else if ch == '}' {
                close = Some((j, k));
                break 'scan;
            }
        }
    }
    let (open_line, open_char) = open?;
    let (close_line, close_char) = close?;

    let mut fields = Vec::new();
    let mut field = String::new();
    for (j, line) in info
        .iter()
        .enumerate()
        .take(close_line + 1)
        .skip(open_line)
    {
        for (k, ch) in line.chars().enumerate() {
            if j == open_line && k <= open_char {
                continue;
            }
            if j == close_line && k >= close_char {
                break;
            }
            if ch == ',' {
                fields.push(std::mem::take(&mut field));
            } else if ch != ' ' && ch != '\t' {
                field.push(ch);
            }
        }
    }
    fields.push(field);
    Some(fields)
}

/// Check an `output` key's four fields against the console bounds. Returns
/// the verified viewport, or `None` when any check fails.
fn verify_output_region(data: &[String], width: u16, height: u16) -> Option<(u16, u16, u16, u16)> {
    if data.len() != 4 {
        return None;
    }
    let left = data[0].parse::<u16>().ok()?;
    let top = data[1].parse::<u16>().ok()?;
    let right = data[2].parse::<u16>().ok()?;
    let bottom = data[3].parse::<u16>().ok()?;

    let vertical_ok = bottom < height
        && top < height
        && top > 0
        && bottom > 0
        && bottom >= MIN_OUTPUT_ROWS
        && top <= bottom - MIN_OUTPUT_ROWS;
    let horizontal_ok = left < width
        && right < width
        && left > 0
        && right > 0
        && right >= MIN_OUTPUT_SPAN
        && left <= right - MIN_OUTPUT_SPAN;

    (vertical_ok && horizontal_ok).then_some((left, top, right, bottom))
}

// ──────────────────── tests ────────────────────
