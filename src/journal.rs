//! JSON-line journal of register operations.
//!
//! Segments are held in memory under a byte budget, oldest sealed segment
//! dropped first. Each line is one serialized [`JournalRecord`], so the
//! stream stays machine-parseable and deterministic for tests.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Severity attached to each journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalLevel {
    Debug,
    Info,
    Warn,
}

impl JournalLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            JournalLevel::Debug => "debug",
            JournalLevel::Info => "info",
            JournalLevel::Warn => "warn",
        }
    }
}

/// Byte and segment budget for the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRotation {
    pub max_bytes_per_segment: usize,
    pub max_segments: usize,
}

impl Default for JournalRotation {
    fn default() -> Self {
        Self {
            max_bytes_per_segment: 1024 * 1024,
            max_segments: 4,
        }
    }
}

impl JournalRotation {
    pub fn with_max_bytes_per_segment(mut self, max_bytes_per_segment: usize) -> Self {
        self.max_bytes_per_segment = max_bytes_per_segment;
        self
    }

    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments;
        self
    }
}

/// Failure while producing a journal line.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to serialize journal record: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct JournalRecord<'a> {
    ts_ms: u64,
    level: &'a str,
    op: &'a str,
    detail: &'a str,
}

#[derive(Debug, Default, Clone)]
struct JournalSegment {
    lines: Vec<String>,
    bytes: usize,
}

impl JournalSegment {
    fn push(&mut self, line: String) {
        self.bytes += line.len();
        self.lines.push(line);
    }
}

/// In-memory journal with level filtering and segment rotation.
#[derive(Debug)]
pub struct CaptureJournal {
    rotation: JournalRotation,
    level: JournalLevel,
    sealed: VecDeque<JournalSegment>,
    active: JournalSegment,
}

impl Default for CaptureJournal {
    fn default() -> Self {
        Self::new(JournalRotation::default())
    }
}

impl CaptureJournal {
    pub fn new(rotation: JournalRotation) -> Self {
        Self {
            rotation,
            level: JournalLevel::Debug,
            sealed: VecDeque::new(),
            active: JournalSegment::default(),
        }
    }

    /// Raises or lowers the floor below which records are skipped.
    pub fn set_level(&mut self, level: JournalLevel) {
        self.level = level;
    }

    pub fn level(&self) -> JournalLevel {
        self.level
    }

    /// Appends one record. Records below the current level are dropped
    /// without being serialized.
    pub fn record(
        &mut self,
        ts_ms: u64,
        level: JournalLevel,
        op: &str,
        detail: &str,
    ) -> Result<(), JournalError> {
        if level < self.level {
            return Ok(());
        }
        let line = serde_json::to_string(&JournalRecord {
            ts_ms,
            level: level.as_str(),
            op,
            detail,
        })?;
        self.rotate_if_needed(line.len());
        self.active.push(line);
        Ok(())
    }

    /// Every retained line, oldest first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for segment in &self.sealed {
            lines.extend(segment.lines.iter().cloned());
        }
        lines.extend(self.active.lines.iter().cloned());
        lines
    }

    /// Sealed segments plus the active one.
    pub fn segment_count(&self) -> usize {
        self.sealed.len() + 1
    }

    pub fn line_count(&self) -> usize {
        self.sealed.iter().map(|segment| segment.lines.len()).sum::<usize>()
            + self.active.lines.len()
    }

    fn rotate_if_needed(&mut self, incoming_bytes: usize) {
        if self.active.lines.is_empty() {
            return;
        }
        if self.active.bytes + incoming_bytes <= self.rotation.max_bytes_per_segment {
            return;
        }
        let sealed = std::mem::take(&mut self.active);
        self.sealed.push_back(sealed);
        while self.sealed.len() + 1 > self.rotation.max_segments {
            self.sealed.pop_front();
        }
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is behind it.
pub fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
