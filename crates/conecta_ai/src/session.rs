use conecta_core::cache::ResponseCache;
use conecta_core::conversation::ConversationLog;
use conecta_core::error::AppError;

use crate::answer::{Answer, HybridAnswerer};

/// Per-user state: response cache and conversation log.
#[derive(Debug, Default)]
pub struct Session {
    cache: ResponseCache,
    log: ConversationLog,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `question`, recording it in the log.
    ///
    /// A placeholder turn is appended first and settled with the answer or the error text.
    /// Blank questions are rejected before anything is logged.
    pub fn ask(&mut self, answerer: &HybridAnswerer<'_>, question: &str) -> Result<Answer, AppError> {
        if question.trim().is_empty() {
            return answerer.answer(&mut self.cache, question);
        }

        let position = self.log.begin(question);
        match answerer.answer(&mut self.cache, question) {
            Ok(answer) => {
                self.log.complete(position, answer.text.clone())?;
                Ok(answer)
            }
            Err(e) => {
                self.log.fail(position, &e)?;
                Err(e)
            }
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
