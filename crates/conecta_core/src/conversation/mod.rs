use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;

/// Shown while a question is being resolved.
pub const PENDING_PLACEHOLDER: &str = "Processando...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Pending,
    Answered,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
    pub status: TurnStatus,
    /// RFC3339 UTC.
    pub asked_at: String,
}

/// Ordered, append-only log of one session's turns.
///
/// The only mutation allowed after append is settling a pending turn, once.
#[derive(Debug, Default, Clone)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending turn and return its position.
    pub fn begin(&mut self, question: impl Into<String>) -> usize {
        self.turns.push(ConversationTurn {
            question: question.into(),
            answer: PENDING_PLACEHOLDER.to_string(),
            status: TurnStatus::Pending,
            asked_at: now_rfc3339_utc(),
        });
        self.turns.len() - 1
    }

    pub fn complete(&mut self, position: usize, answer: impl Into<String>) -> Result<(), AppError> {
        self.settle(position, answer.into(), TurnStatus::Answered)
    }

    pub fn fail(&mut self, position: usize, error: &AppError) -> Result<(), AppError> {
        self.settle(position, error.to_string(), TurnStatus::Failed)
    }

    fn settle(&mut self, position: usize, answer: String, status: TurnStatus) -> Result<(), AppError> {
        let turn = self
            .turns
            .get_mut(position)
            .filter(|t| t.status == TurnStatus::Pending)
            .ok_or_else(|| {
                AppError::new("CONVERSATION_TURN_INVALID", "No pending turn at position")
                    .with_details(format!("position={position}"))
            })?;
        turn.answer = answer;
        turn.status = status;
        Ok(())
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

fn now_rfc3339_utc() -> String {
    // Only fails for years outside 0..=9999.
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    #[test]
    fn placeholder_is_replaced_once() {
        let mut log = ConversationLog::new();
        let pos = log.begin("Quantas escolas?");
        assert_eq!(log.turns()[pos].answer, PENDING_PLACEHOLDER);
        assert_eq!(log.turns()[pos].status, TurnStatus::Pending);

        log.complete(pos, "Veja o painel.").expect("complete");
        assert_eq!(log.turns()[pos].answer, "Veja o painel.");
        assert_eq!(log.turns()[pos].status, TurnStatus::Answered);

        let err = log.complete(pos, "again").expect_err("already settled");
        assert_eq!(err.code, "CONVERSATION_TURN_INVALID");
        assert_eq!(log.turns()[pos].answer, "Veja o painel.");
    }

    #[test]
    fn failure_is_visible_in_the_log() {
        let mut log = ConversationLog::new();
        let pos = log.begin("q");
        let err = AppError::new(codes::AI_GENERATION_FAILED, "Generation request failed");
        log.fail(pos, &err).expect("fail");
        assert_eq!(log.turns()[pos].status, TurnStatus::Failed);
        assert!(log.turns()[pos].answer.contains("AI_GENERATION_FAILED"));
    }

    #[test]
    fn turns_keep_submission_order() {
        let mut log = ConversationLog::new();
        let a = log.begin("first");
        let b = log.begin("second");
        log.complete(b, "2").expect("b");
        log.complete(a, "1").expect("a");
        let questions: Vec<&str> = log.turns().iter().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second"]);
        assert!(!log.turns()[0].asked_at.is_empty());
    }
}
