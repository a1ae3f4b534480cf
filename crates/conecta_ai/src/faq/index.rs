use std::fs;
use std::path::Path;

use conecta_core::domain::FaqEntry;
use conecta_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use crate::retrieve::similarity;

pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Nearest FAQ entry for a query vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    /// Squared Euclidean distance between unit vectors, in [0, 4].
    pub distance: f32,
}

/// On-disk form of the index. Vectors are stored already normalized, in entry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexBlob {
    pub version: u32,
    pub model: String,
    pub dims: u32,
    pub fingerprint: String,
    pub vectors: Vec<Vec<f32>>,
}

impl IndexBlob {
    /// True when this blob was built from exactly these entries with this model.
    pub fn matches(&self, model: &str, fingerprint: &str, entry_count: usize) -> bool {
        self.version == INDEX_FORMAT_VERSION
            && self.model == model
            && self.fingerprint == fingerprint
            && self.vectors.len() == entry_count
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::new(codes::AI_INDEX_BUILD_FAILED, "Failed to create index directory")
                    .with_details(format!("path={}; err={}", parent.display(), e))
            })?;
        }
        let bytes = bincode::serialize(self).map_err(|e| {
            AppError::new(codes::AI_INDEX_BUILD_FAILED, "Failed to encode index")
                .with_details(e.to_string())
        })?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|e| {
            AppError::new(codes::AI_INDEX_BUILD_FAILED, "Failed to write index")
                .with_details(format!("path={}; err={}", tmp.display(), e))
        })?;
        fs::rename(&tmp, path).map_err(|e| {
            AppError::new(codes::AI_INDEX_BUILD_FAILED, "Failed to finalize index write")
                .with_details(format!("tmp={}; dest={}; err={}", tmp.display(), path.display(), e))
        })?;
        Ok(())
    }

    /// `Ok(None)` when no index has been written yet.
    pub fn load(path: &Path) -> Result<Option<IndexBlob>, AppError> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(|e| {
            AppError::data_unavailable("Failed to read index")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        let blob: IndexBlob = bincode::deserialize(&bytes).map_err(|e| {
            AppError::data_unavailable("Index file is corrupt")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        Ok(Some(blob))
    }
}

/// Exhaustive k=1 nearest-neighbor index over normalized FAQ embeddings.
///
/// Position `i` in the index is position `i` in the FAQ store it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityIndex {
    model: String,
    dims: usize,
    fingerprint: String,
    vectors: Vec<Vec<f32>>,
}

impl SimilarityIndex {
    pub fn build(entries: &[FaqEntry], model: &str, fingerprint: &str) -> Result<Self, AppError> {
        let dims = entries.first().map(FaqEntry::dims).unwrap_or(0);
        let mut vectors = Vec::with_capacity(entries.len());
        for e in entries {
            if e.dims() != dims {
                return Err(AppError::data_unavailable("FAQ embeddings have inconsistent dimensions")
                    .with_details(format!("question={}; expected={dims}; got={}", e.question, e.dims())));
            }
            let unit = similarity::normalize(&e.embedding).ok_or_else(|| {
                AppError::data_unavailable("FAQ embedding has zero or non-finite norm")
                    .with_details(format!("question={}", e.question))
            })?;
            vectors.push(unit);
        }
        Ok(Self {
            model: model.to_string(),
            dims,
            fingerprint: fingerprint.to_string(),
            vectors,
        })
    }

    pub fn from_blob(blob: IndexBlob) -> Result<Self, AppError> {
        let dims = blob.dims as usize;
        if blob.version != INDEX_FORMAT_VERSION {
            return Err(AppError::data_unavailable("Unsupported index format version")
                .with_details(format!("version={}", blob.version)));
        }
        if let Some(bad) = blob.vectors.iter().position(|v| v.len() != dims) {
            return Err(AppError::data_unavailable("Index vector dims mismatch")
                .with_details(format!("position={bad}; expected={dims}")));
        }
        Ok(Self {
            model: blob.model,
            dims,
            fingerprint: blob.fingerprint,
            vectors: blob.vectors,
        })
    }

    pub fn to_blob(&self) -> IndexBlob {
        IndexBlob {
            version: INDEX_FORMAT_VERSION,
            model: self.model.clone(),
            dims: u32::try_from(self.dims).unwrap_or(u32::MAX),
            fingerprint: self.fingerprint.clone(),
            vectors: self.vectors.clone(),
        }
    }

    /// Nearest entry to `query`. `Ok(None)` when the index is empty.
    ///
    /// Ties resolve to the lowest position.
    pub fn nearest(&self, query: &[f32]) -> Result<Option<Neighbor>, AppError> {
        if self.vectors.is_empty() {
            return Ok(None);
        }
        if query.len() != self.dims {
            return Err(AppError::new(
                codes::AI_EMBEDDINGS_FAILED,
                "Query embedding dims do not match index dims",
            )
            .with_details(format!("index_dims={}; query_dims={}", self.dims, query.len())));
        }
        let q = similarity::normalize(query).ok_or_else(|| {
            AppError::new(
                codes::AI_EMBEDDINGS_FAILED,
                "Query embedding has zero or non-finite norm",
            )
        })?;

        let mut best: Option<Neighbor> = None;
        for (position, v) in self.vectors.iter().enumerate() {
            let distance = similarity::squared_l2(&q, v);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Neighbor { position, distance });
            }
        }
        Ok(best)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// SHA-256 over every entry's question, answer and raw embedding bytes, in order.
pub fn entries_fingerprint(entries: &[FaqEntry]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for e in entries {
        hasher.update(e.question.as_bytes());
        hasher.update([0u8]);
        hasher.update(e.answer.as_bytes());
        hasher.update([0u8]);
        for x in &e.embedding {
            hasher.update(x.to_le_bytes());
        }
        hasher.update([0xffu8]);
    }
    hex::encode(hasher.finalize())
}
