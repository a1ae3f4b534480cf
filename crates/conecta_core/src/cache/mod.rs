//! Session-scoped memo of resolved answers.
//!
//! Provides:
//! - Lookup keyed by the exact question string (no case or whitespace folding)
//! - Both outcomes cached: FAQ hits and "no match" resolutions answered by the fallback
//! - Hit/miss counters for status output
//!
//! Failed requests are never stored; callers insert only after a successful resolution.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result of the FAQ lookup stage for one question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Nearest FAQ entry was within the similarity threshold.
    Hit { position: usize, distance: f32 },
    /// Nearest entry was too far away, or the index had no entries.
    NoMatch { distance: Option<f32> },
    /// The FAQ store could not be loaded; lookup was skipped.
    Unavailable,
}

impl LookupOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, LookupOutcome::Hit { .. })
    }
}

/// A final answer plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub answer: String,
    pub lookup: LookupOutcome,
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, Resolution>,
    hits: u64,
    misses: u64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached resolution for `question`, counting the hit or miss.
    pub fn lookup(&mut self, question: &str) -> Option<Resolution> {
        match self.entries.get(question) {
            Some(found) => {
                self.hits += 1;
                Some(found.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, question: impl Into<String>, resolution: Resolution) {
        self.entries.insert(question.into(), resolution);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}
