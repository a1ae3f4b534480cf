use serde::{Deserialize, Serialize};

/// One row of the FAQ source as read from disk.
///
/// `embedding` is present only when the source file carries a precomputed vector column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
    pub embedding: Option<Vec<f32>>,
}

/// A FAQ row whose embedding has been resolved.
///
/// Notes:
/// - Every entry in one store shares the same embedding dimension (the provider's output size).
/// - Entries are immutable after the store is built; changing the FAQ means rebuilding the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    pub embedding: Vec<f32>,
}

impl FaqEntry {
    pub fn dims(&self) -> usize {
        self.embedding.len()
    }
}

/// Non-fatal issue found while reading a source file (skipped row, blank cell, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
