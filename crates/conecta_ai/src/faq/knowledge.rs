use std::collections::BTreeMap;
use std::path::PathBuf;

use conecta_core::config::AppConfig;
use conecta_core::domain::{FaqEntry, ValidationWarning};
use conecta_core::error::AppError;
use conecta_core::ingest::embeddings_file::EmbeddingsFile;
use conecta_core::ingest::faq_csv::load_faq_csv;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::index::{entries_fingerprint, IndexBlob, SimilarityIndex};
use super::store::FaqStore;
use crate::embeddings::Embedder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgePaths {
    pub faq: PathBuf,
    pub embeddings: PathBuf,
    pub index: PathBuf,
}

impl KnowledgePaths {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            faq: cfg.faq_path.clone(),
            embeddings: cfg.embeddings_path.clone(),
            index: cfg.index_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions<'a> {
    pub model: &'a str,
    /// Ignore stored vectors and the persisted index; embed every question again.
    pub force_rebuild: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeStatus {
    pub ready: bool,
    pub entry_count: u32,
    pub dims: Option<u32>,
    pub model: String,
    /// Questions sent to the provider during this build.
    pub embedded_now: u32,
    pub index_rebuilt: bool,
    pub fingerprint: String,
    pub warnings: Vec<ValidationWarning>,
}

/// FAQ store plus its index, or the reason neither could be loaded.
#[derive(Debug, Clone)]
pub enum KnowledgeBase {
    Ready { store: FaqStore, index: SimilarityIndex },
    Unavailable { error: AppError },
}

impl KnowledgeBase {
    /// Load the knowledge base, degrading to `Unavailable` on any failure.
    ///
    /// The failure is logged here, once; answering then always goes to the fallback.
    pub fn load(paths: &KnowledgePaths, embedder: &dyn Embedder, model: &str) -> Self {
        let opts = BuildOptions {
            model,
            force_rebuild: false,
        };
        match build_knowledge(paths, embedder, opts) {
            Ok((kb, status)) => {
                for w in &status.warnings {
                    warn!(code = %w.code, details = ?w.details, "{}", w.message);
                }
                kb
            }
            Err(error) => {
                error!(
                    code = %error.code,
                    path = %paths.faq.display(),
                    "FAQ knowledge base unavailable, answering with fallback only: {error}"
                );
                KnowledgeBase::Unavailable { error }
            }
        }
    }

    /// Build directly from resolved entries without touching the filesystem.
    pub fn from_entries(entries: Vec<FaqEntry>, model: &str) -> Result<Self, AppError> {
        let store = FaqStore::new(entries)?;
        let fingerprint = entries_fingerprint(store.entries());
        let index = SimilarityIndex::build(store.entries(), model, &fingerprint)?;
        Ok(KnowledgeBase::Ready { store, index })
    }

    pub fn unavailable(error: AppError) -> Self {
        KnowledgeBase::Unavailable { error }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, KnowledgeBase::Ready { .. })
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            KnowledgeBase::Ready { .. } => None,
            KnowledgeBase::Unavailable { error } => Some(error),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            KnowledgeBase::Ready { store, .. } => store.len(),
            KnowledgeBase::Unavailable { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load the FAQ source, resolve every embedding and load or rebuild the index.
///
/// Vectors come from the CSV `embedding` column first, then the embeddings file, then the
/// provider. Newly computed vectors are written back to the embeddings file, dropping entries
/// for questions no longer in the FAQ. Failing to persist the file or the index is logged and
/// does not fail the build.
///
/// When every vector came from storage, one question is re-embedded and stored vectors whose
/// length differs from the provider's output fail the build with `DATA_UNAVAILABLE`.
pub fn build_knowledge(
    paths: &KnowledgePaths,
    embedder: &dyn Embedder,
    opts: BuildOptions<'_>,
) -> Result<(KnowledgeBase, KnowledgeStatus), AppError> {
    let summary = load_faq_csv(&paths.faq)?;
    let mut warnings = summary.warnings;

    let embeddings_file = EmbeddingsFile::open(paths.embeddings.clone());
    let stored = if opts.force_rebuild {
        None
    } else {
        match embeddings_file.load() {
            Ok(found) => found,
            Err(e) => {
                warnings.push(
                    ValidationWarning::new("EMBEDDINGS_FILE_IGNORED", "Ignoring unreadable embeddings file")
                        .with_details(e.to_string()),
                );
                None
            }
        }
    };

    let mut entries: Vec<FaqEntry> = Vec::with_capacity(summary.records.len());
    let mut embedded_now = 0u32;
    for record in summary.records {
        let from_csv = record.embedding.filter(|_| !opts.force_rebuild);
        let embedding = match from_csv.or_else(|| stored.as_ref().and_then(|m| m.get(&record.question).cloned())) {
            Some(v) => v,
            None => {
                embedded_now += 1;
                embedder.embed(opts.model, &record.question)?
            }
        };
        entries.push(FaqEntry {
            question: record.question,
            answer: record.answer,
            embedding,
        });
    }

    let resolved: BTreeMap<String, Vec<f32>> = entries
        .iter()
        .map(|e| (e.question.clone(), e.embedding.clone()))
        .collect();
    let file_is_stale = stored.as_ref().is_some_and(|m| *m != resolved);
    if embedded_now > 0 || file_is_stale {
        match embeddings_file.save(&resolved) {
            Ok(()) => info!(
                path = %embeddings_file.path().display(),
                embedded_now,
                "saved FAQ embeddings"
            ),
            Err(e) => warn!("could not persist FAQ embeddings: {e}"),
        }
    }

    let store = FaqStore::new(entries)?;
    if embedded_now == 0 {
        check_provider_dims(&store, embedder, opts.model)?;
    }
    let fingerprint = entries_fingerprint(store.entries());

    let persisted = if opts.force_rebuild {
        None
    } else {
        match IndexBlob::load(&paths.index) {
            Ok(Some(blob)) if blob.matches(opts.model, &fingerprint, store.len()) => {
                match SimilarityIndex::from_blob(blob) {
                    Ok(index) => Some(index),
                    Err(e) => {
                        warn!("rebuilding FAQ index: {e}");
                        None
                    }
                }
            }
            Ok(Some(_)) => {
                warn!(path = %paths.index.display(), "FAQ index is stale, rebuilding");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("rebuilding FAQ index: {e}");
                None
            }
        }
    };

    let index_rebuilt = persisted.is_none();
    let index = match persisted {
        Some(index) => index,
        None => {
            let index = SimilarityIndex::build(store.entries(), opts.model, &fingerprint)?;
            if let Err(e) = index.to_blob().save(&paths.index) {
                warn!("could not persist FAQ index, keeping it in memory: {e}");
            }
            index
        }
    };

    info!(
        entries = store.len(),
        dims = store.dims(),
        model = opts.model,
        index_rebuilt,
        "FAQ knowledge base ready"
    );

    let status = KnowledgeStatus {
        ready: true,
        entry_count: u32::try_from(store.len()).unwrap_or(u32::MAX),
        dims: (store.dims() > 0).then(|| u32::try_from(store.dims()).unwrap_or(u32::MAX)),
        model: opts.model.to_string(),
        embedded_now,
        index_rebuilt,
        fingerprint,
        warnings,
    };
    Ok((KnowledgeBase::Ready { store, index }, status))
}

fn check_provider_dims(store: &FaqStore, embedder: &dyn Embedder, model: &str) -> Result<(), AppError> {
    let Some(first) = store.entries().first() else {
        return Ok(());
    };
    let provider_dims = embedder.embed(model, &first.question)?.len();
    if provider_dims != store.dims() {
        return Err(AppError::data_unavailable(
            "Stored FAQ embeddings do not match the provider's output dimension",
        )
        .with_details(format!(
            "stored_dims={}; provider_dims={provider_dims}; model={model}; rebuild with `conecta build-index --force`",
            store.dims()
        )));
    }
    Ok(())
}
