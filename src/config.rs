//! Validated configuration for building a flow table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::journal::{CaptureJournal, JournalLevel, JournalRotation};

/// Window size used when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Errors raised while parsing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("journal segment byte budget must be positive")]
    ZeroJournalBytes,
    #[error("journal segment count must be positive")]
    ZeroJournalSegments,
}

/// Journal knobs. Leaving the whole section out disables journaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSettings {
    #[serde(default = "default_journal_bytes")]
    pub max_bytes_per_segment: usize,
    #[serde(default = "default_journal_segments")]
    pub max_segments: usize,
    #[serde(default = "default_journal_level")]
    pub level: JournalLevel,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            max_bytes_per_segment: default_journal_bytes(),
            max_segments: default_journal_segments(),
            level: default_journal_level(),
        }
    }
}

impl JournalSettings {
    pub fn rotation(&self) -> JournalRotation {
        JournalRotation::default()
            .with_max_bytes_per_segment(self.max_bytes_per_segment)
            .with_max_segments(self.max_segments)
    }

    /// Builds a journal honoring these settings.
    pub fn build(&self) -> CaptureJournal {
        let mut journal = CaptureJournal::new(self.rotation());
        journal.set_level(self.level);
        journal
    }
}

/// Top-level configuration for a [`FlowTable`](crate::table::FlowTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub journal: Option<JournalSettings>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            journal: None,
        }
    }
}

impl TableConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if let Some(journal) = &self.journal {
            if journal.max_bytes_per_segment == 0 {
                return Err(ConfigError::ZeroJournalBytes);
            }
            if journal.max_segments == 0 {
                return Err(ConfigError::ZeroJournalSegments);
            }
        }
        Ok(())
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_journal_bytes() -> usize {
    JournalRotation::default().max_bytes_per_segment
}

fn default_journal_segments() -> usize {
    JournalRotation::default().max_segments
}

fn default_journal_level() -> JournalLevel {
    JournalLevel::Info
}
