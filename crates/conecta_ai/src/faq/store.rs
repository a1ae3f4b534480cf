use conecta_core::domain::FaqEntry;
use conecta_core::error::AppError;

/// Immutable set of FAQ entries sharing one embedding dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqStore {
    entries: Vec<FaqEntry>,
    dims: usize,
}

impl FaqStore {
    pub fn new(entries: Vec<FaqEntry>) -> Result<Self, AppError> {
        let dims = entries.first().map(FaqEntry::dims).unwrap_or(0);
        if let Some(bad) = entries.iter().find(|e| e.dims() != dims || e.dims() == 0) {
            return Err(
                AppError::data_unavailable("FAQ embeddings have inconsistent dimensions")
                    .with_details(format!(
                        "question={}; expected={dims}; got={}",
                        bad.question,
                        bad.dims()
                    )),
            );
        }
        Ok(Self { entries, dims })
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&FaqEntry> {
        self.entries.get(position)
    }

    /// Zero for an empty store.
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
