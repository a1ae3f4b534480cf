use conecta_core::cache::LookupOutcome;
use conecta_core::error::AppError;
use tracing::debug;

use crate::embeddings::Embedder;
use crate::faq::KnowledgeBase;

pub mod similarity;

/// FAQ lookup stage: embed the question and compare the nearest entry against `threshold`.
///
/// The provider is not called when the knowledge base is unavailable or empty. Embedding
/// failures propagate; an empty or unusable index is a normal `NoMatch`/`Unavailable`.
pub fn lookup_faq(
    knowledge: &KnowledgeBase,
    embedder: &dyn Embedder,
    model: &str,
    question: &str,
    threshold: f32,
) -> Result<LookupOutcome, AppError> {
    let index = match knowledge {
        KnowledgeBase::Unavailable { .. } => return Ok(LookupOutcome::Unavailable),
        KnowledgeBase::Ready { index, .. } if index.is_empty() => {
            return Ok(LookupOutcome::NoMatch { distance: None })
        }
        KnowledgeBase::Ready { index, .. } => index,
    };

    let qv = embedder.embed(model, question)?;
    let Some(nearest) = index.nearest(&qv)? else {
        return Ok(LookupOutcome::NoMatch { distance: None });
    };

    debug!(
        position = nearest.position,
        distance = nearest.distance,
        threshold,
        "nearest FAQ entry"
    );
    if nearest.distance <= threshold {
        Ok(LookupOutcome::Hit {
            position: nearest.position,
            distance: nearest.distance,
        })
    } else {
        Ok(LookupOutcome::NoMatch {
            distance: Some(nearest.distance),
        })
    }
}
