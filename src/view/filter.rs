use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{FlowRecord, FlowState};

/// What a live view lets through.
///
/// Both predicates must pass: the coarse state check (when set) and a
/// case-insensitive substring search over resolved metadata (when set).
/// A record with no resolved info never matches a search. The empty spec is
/// the passthrough filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    state: Option<FlowState>,
    search: Option<String>,
}

impl FilterSpec {
    /// The passthrough spec: every record matches.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: FlowState) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the search text. The needle is stored lowercased.
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into().to_lowercase());
        self
    }

    /// Replaces only the search component; `None` clears it.
    pub fn set_search(&mut self, needle: Option<&str>) {
        self.search = needle.map(|text| text.to_lowercase());
    }

    pub fn state(&self) -> Option<FlowState> {
        self.state
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// True when any predicate is set. A non-filtering spec lets views skip
    /// predicate evaluation entirely.
    pub fn is_filtering(&self) -> bool {
        self.state.is_some() || self.search.is_some()
    }

    pub fn matches(&self, record: &FlowRecord) -> bool {
        if let Some(state) = self.state {
            if record.state() != state {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            return record
                .info()
                .is_some_and(|info| info.matches_needle(needle));
        }
        true
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_filtering() {
            return write!(f, "all");
        }
        let mut wrote = false;
        if let Some(state) = self.state {
            let name = match state {
                FlowState::Active => "active",
                FlowState::Closed => "closed",
                FlowState::Failed => "failed",
            };
            write!(f, "state={name}")?;
            wrote = true;
        }
        if let Some(needle) = &self.search {
            if wrote {
                write!(f, " ")?;
            }
            write!(f, "search=\"{needle}\"")?;
        }
        Ok(())
    }
}
