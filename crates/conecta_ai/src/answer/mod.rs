use conecta_core::cache::{LookupOutcome, Resolution, ResponseCache};
use conecta_core::config::AppConfig;
use conecta_core::error::{codes, AppError};
use conecta_core::text::limit_words;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embeddings::Embedder;
use crate::faq::KnowledgeBase;
use crate::llm::{ChatPrompt, Llm};
use crate::retrieve::lookup_faq;

pub mod prompts;

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSettings {
    pub similarity_threshold: f32,
    pub max_words: usize,
    pub embedding_model: String,
    pub chat_model: String,
    pub max_tokens: u32,
}

impl From<&AppConfig> for AnswerSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            similarity_threshold: cfg.similarity_threshold,
            max_words: cfg.max_words,
            embedding_model: cfg.embedding_model.clone(),
            chat_model: cfg.chat_model.clone(),
            max_tokens: cfg.max_tokens(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub lookup: LookupOutcome,
    pub from_cache: bool,
}

/// FAQ lookup first, generative fallback second.
///
/// Every successful resolution, including a fallback after "no match", is cached under the
/// exact question string. Provider failures are returned without touching the cache.
pub struct HybridAnswerer<'a> {
    knowledge: &'a KnowledgeBase,
    embedder: &'a dyn Embedder,
    llm: &'a dyn Llm,
    settings: AnswerSettings,
}

impl<'a> HybridAnswerer<'a> {
    pub fn new(
        knowledge: &'a KnowledgeBase,
        embedder: &'a dyn Embedder,
        llm: &'a dyn Llm,
        settings: AnswerSettings,
    ) -> Self {
        Self {
            knowledge,
            embedder,
            llm,
            settings,
        }
    }

    pub fn answer(&self, cache: &mut ResponseCache, question: &str) -> Result<Answer, AppError> {
        if question.trim().is_empty() {
            return Err(AppError::new(
                codes::ASK_EMPTY_QUESTION,
                "Question must not be empty",
            ));
        }

        if let Some(cached) = cache.lookup(question) {
            debug!(lookup = ?cached.lookup, "answer served from cache");
            return Ok(Answer {
                text: cached.answer,
                lookup: cached.lookup,
                from_cache: true,
            });
        }

        let lookup = lookup_faq(
            self.knowledge,
            self.embedder,
            &self.settings.embedding_model,
            question,
            self.settings.similarity_threshold,
        )?;

        let raw = match (lookup, self.knowledge) {
            (LookupOutcome::Hit { position, distance }, KnowledgeBase::Ready { store, .. }) => {
                let entry = store.get(position).ok_or_else(|| {
                    AppError::data_unavailable("FAQ index points past the FAQ store")
                        .with_details(format!("position={position}; entries={}", store.len()))
                })?;
                info!(position, distance, "answered from FAQ");
                entry.answer.clone()
            }
            _ => {
                info!(lookup = ?lookup, "no FAQ match, using generative fallback");
                self.llm.generate(
                    &self.settings.chat_model,
                    &ChatPrompt {
                        system: prompts::SYSTEM_CONTEXT,
                        user: question,
                        max_tokens: self.settings.max_tokens,
                    },
                )?
            }
        };

        let text = limit_words(&raw, self.settings.max_words);
        cache.insert(
            question,
            Resolution {
                answer: text.clone(),
                lookup,
            },
        );
        Ok(Answer {
            text,
            lookup,
            from_cache: false,
        })
    }
}
