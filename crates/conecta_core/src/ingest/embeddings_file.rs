use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Precomputed embeddings persisted as a JSON object: question text -> vector.
///
/// Keeps provider calls out of the startup path once every FAQ question has been embedded.
#[derive(Debug, Clone)]
pub struct EmbeddingsFile {
    path: PathBuf,
}

impl EmbeddingsFile {
    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(&self) -> Result<Option<BTreeMap<String, Vec<f32>>>, AppError> {
        let path = self.path.as_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(|e| {
            AppError::data_unavailable("Failed to read embeddings file")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        let map: BTreeMap<String, Vec<f32>> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::data_unavailable("Embeddings file is not a question -> vector object")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        Ok(Some(map))
    }

    pub fn save(&self, map: &BTreeMap<String, Vec<f32>>) -> Result<(), AppError> {
        let path = self.path.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::data_unavailable("Failed to create embeddings directory")
                    .with_details(format!("path={}; err={}", parent.display(), e))
            })?;
        }
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(map).map_err(|e| {
            AppError::data_unavailable("Failed to encode embeddings").with_details(e.to_string())
        })?;
        fs::write(&tmp, json.as_bytes()).map_err(|e| {
            AppError::data_unavailable("Failed to write embeddings file")
                .with_details(format!("path={}; err={}", tmp.display(), e))
        })?;
        fs::rename(&tmp, path).map_err(|e| {
            AppError::data_unavailable("Failed to finalize embeddings file write").with_details(format!(
                "tmp={}; dest={}; err={}",
                tmp.display(),
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
}
