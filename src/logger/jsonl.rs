//! JSONL activity logger: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory
//! and written atomically via `write_all` to prevent interleaved partial
//! lines when the file is being tailed by another process.
//!
//! Fallback chain:
//! 1. Primary file path
//! 2. stderr with a `[RVR-JSONL]` prefix
//! 3. Silent discard (the console must never crash for logging failures)

#![allow(missing_docs)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Log event types matching the console's activity model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MonitorArmed,
    MonitorStopped,
    AlarmTriggered,
    AlarmCleared,
    MenuLoaded,
    ConnectAttempt,
    ConfigSaved,
    Error,
}

/// A single JSONL log entry — all fields optional except `ts`, `event`,
/// `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Severity level.
    pub severity: Severity,
    /// Sensor label involved (when applicable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<String>,
    /// Sensor sample at time of event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<i32>,
    /// Trigger value of the alert involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<i32>,
    /// Screen name involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    /// Whether the action succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
            severity,
            sensor: None,
            sample: None,
            trigger: None,
            screen: None,
            ok: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_sensor(mut self, sensor: &str) -> Self {
        self.sensor = Some(sensor.to_string());
        self
    }

    #[must_use]
    pub fn with_sample(mut self, sample: i32) -> Self {
        self.sample = Some(sample);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: i32) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn with_screen(mut self, screen: &str) -> Self {
        self.screen = Some(screen.to_string());
        self
    }

    #[must_use]
    pub fn with_ok(mut self, ok: bool) -> Self {
        self.ok = Some(ok);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ──────────────────── logger ────────────────────

/// Append-only JSONL writer with a stderr fallback.
#[derive(Debug, Clone)]
pub struct JsonlLogger {
    path: PathBuf,
}

impl JsonlLogger {
    /// Logger targeting the given file. The file is created on first append.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Append one entry. Failures degrade to stderr, then to silence.
    pub fn append(&mut self, entry: &LogEntry) {
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');

        if Self::write_line(&self.path, &line) {
            return;
        }
        // Logging must never take the console down with it.
        let _ = write!(std::io::stderr(), "[RVR-JSONL] {line}");
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(path: &Path, line: &str) -> bool {
        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
            return false;
        };
        file.write_all(line.as_bytes()).is_ok()
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut logger = JsonlLogger::new(&path);

        logger.append(&LogEntry::new(EventType::MonitorArmed, Severity::Info));
        logger.append(
            &LogEntry::new(EventType::AlarmTriggered, Severity::Warning)
                .with_sensor("Light")
                .with_sample(12)
                .with_trigger(40),
        );

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("ts").is_some());
            assert!(value.get("event").is_some());
        }
    }

    #[test]
    fn optional_fields_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut logger = JsonlLogger::new(&path);
        logger.append(&LogEntry::new(EventType::MenuLoaded, Severity::Info));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("sensor"));
        assert!(!raw.contains("trigger"));
    }

    #[test]
    fn event_names_are_snake_case() {
        let entry = LogEntry::new(EventType::AlarmCleared, Severity::Info);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"alarm_cleared\""));
        assert!(json.contains("\"info\""));
    }

    #[test]
    fn append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut logger = JsonlLogger::new(&path);
        for _ in 0..5 {
            logger.append(&LogEntry::new(EventType::MenuLoaded, Severity::Info));
        }
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 5);
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let mut logger = JsonlLogger::new(Path::new("/proc/definitely/not/writable.jsonl"));
        logger.append(&LogEntry::new(EventType::Error, Severity::Critical));
    }

    #[test]
    fn round_trips_through_serde() {
        let entry = LogEntry::new(EventType::ConfigSaved, Severity::Info)
            .with_screen("alarm")
            .with_ok(true)
            .with_details("sensor=Light");
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.screen.as_deref(), Some("alarm"));
        assert_eq!(back.ok, Some(true));
    }
}
