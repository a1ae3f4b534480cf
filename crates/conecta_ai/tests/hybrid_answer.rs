use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use conecta_ai::answer::{AnswerSettings, HybridAnswerer};
use conecta_ai::embeddings::Embedder;
use conecta_ai::faq::KnowledgeBase;
use conecta_ai::llm::{ChatPrompt, Llm};
use conecta_core::cache::{LookupOutcome, ResponseCache};
use conecta_core::domain::FaqEntry;
use conecta_core::error::AppError;
use conecta_core::text::word_count;
use pretty_assertions::assert_eq;

const AVG_Q: &str = "What is the average speed?";
const AVG_A: &str = "The average is 42 Mbps.";
const SLOW_Q: &str = "Which schools are slowest?";
const SLOW_A: &str = "Schools in the east zone have the slowest links in the city";
const UNRELATED_Q: &str = "Who won the football match yesterday?";

/// Fixed vectors per text; anything unknown lands on the last axis.
struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    fn new() -> Self {
        let mut table = HashMap::new();
        table.insert(AVG_Q.to_string(), vec![1.0, 0.0, 0.0]);
        table.insert(SLOW_Q.to_string(), vec![0.0, 1.0, 0.0]);
        table.insert("what's the average speed".to_string(), vec![0.9, 0.1, 0.0]);
        Self {
            table,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for TableEmbedder {
    fn embed(&self, _model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .table
            .get(input)
            .cloned()
            .unwrap_or_else(|| vec![0.0, 0.0, 1.0]))
    }
}

struct FixedLlm {
    reply: String,
    calls: AtomicUsize,
}

impl FixedLlm {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Llm for FixedLlm {
    fn generate(&self, _model: &str, prompt: &ChatPrompt<'_>) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!prompt.system.is_empty());
        assert!(prompt.max_tokens > 0);
        Ok(self.reply.clone())
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _model: &str, _input: &str) -> Result<Vec<f32>, AppError> {
        Err(AppError::new("AI_EMBEDDINGS_FAILED", "timeout").with_retryable(true))
    }
}

struct FailingLlm;

impl Llm for FailingLlm {
    fn generate(&self, _model: &str, _prompt: &ChatPrompt<'_>) -> Result<String, AppError> {
        Err(AppError::new("AI_GENERATION_FAILED", "quota exceeded"))
    }
}

fn knowledge(embedder: &TableEmbedder) -> KnowledgeBase {
    let entries = [(AVG_Q, AVG_A), (SLOW_Q, SLOW_A)]
        .into_iter()
        .map(|(q, a)| FaqEntry {
            question: q.to_string(),
            answer: a.to_string(),
            embedding: embedder.table[q].clone(),
        })
        .collect();
    KnowledgeBase::from_entries(entries, "mock").expect("knowledge")
}

fn settings(max_words: usize, threshold: f32) -> AnswerSettings {
    AnswerSettings {
        similarity_threshold: threshold,
        max_words,
        embedding_model: "mock-embed".to_string(),
        chat_model: "mock-chat".to_string(),
        max_tokens: u32::try_from(max_words * 2).expect("small"),
    }
}

fn long_reply(words: usize) -> String {
    (0..words).map(|i| format!("palavra{i}")).collect::<Vec<_>>().join(" ")
}

#[test]
fn exact_faq_question_returns_stored_answer_unmodified() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new("should not be used");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(150, 0.5));

    let mut cache = ResponseCache::new();
    let answer = answerer.answer(&mut cache, AVG_Q).expect("answer");
    assert_eq!(answer.text, AVG_A);
    match answer.lookup {
        LookupOutcome::Hit { position, distance } => {
            assert_eq!(position, 0);
            assert!(distance.abs() < 1e-6);
        }
        other => panic!("expected hit, got {other:?}"),
    }
    assert_eq!(llm.calls(), 0);
}

#[test]
fn paraphrase_within_threshold_is_a_hit() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new("unused");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(150, 0.5));

    let answer = answerer
        .answer(&mut ResponseCache::new(), "what's the average speed")
        .expect("answer");
    assert!(answer.lookup.is_hit());
    assert_eq!(answer.text, AVG_A);
}

#[test]
fn unrelated_question_falls_back_within_word_limit() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new(&long_reply(40));
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(10, 0.5));

    let answer = answerer
        .answer(&mut ResponseCache::new(), UNRELATED_Q)
        .expect("answer");
    assert!(!answer.text.is_empty());
    assert!(word_count(&answer.text) <= 10);
    assert!(answer.text.ends_with("..."));
    assert_ne!(answer.text, AVG_A);
    assert_eq!(llm.calls(), 1);
    match answer.lookup {
        LookupOutcome::NoMatch { distance: Some(d) } => assert!(d > 0.5),
        other => panic!("expected no match, got {other:?}"),
    }
}

#[test]
fn matched_answer_is_truncated_to_limit() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new("unused");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(5, 0.5));

    let answer = answerer.answer(&mut ResponseCache::new(), SLOW_Q).expect("answer");
    assert_eq!(word_count(SLOW_A), 12);
    assert_eq!(answer.text, "Schools in the east zone...");
    assert_eq!(word_count(&answer.text), 5);
}

#[test]
fn repeated_question_hits_providers_at_most_once() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new("A conectividade depende da região.");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(150, 0.5));
    let mut cache = ResponseCache::new();

    let first = answerer.answer(&mut cache, UNRELATED_Q).expect("first");
    let second = answerer.answer(&mut cache, UNRELATED_Q).expect("second");
    assert_eq!(first.text, second.text);
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(embedder.calls(), 1);
    assert_eq!(llm.calls(), 1);

    // Keys are exact strings: a trailing space is a different question.
    answerer
        .answer(&mut cache, &format!("{UNRELATED_Q} "))
        .expect("third");
    assert_eq!(embedder.calls(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn embedding_failure_is_surfaced_and_not_cached() {
    let table = TableEmbedder::new();
    let kb = knowledge(&table);
    let llm = FixedLlm::new("unused");
    let answerer = HybridAnswerer::new(&kb, &FailingEmbedder, &llm, settings(150, 0.5));
    let mut cache = ResponseCache::new();

    let err = answerer.answer(&mut cache, AVG_Q).expect_err("embed fails");
    assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
    assert!(cache.is_empty());
    assert_eq!(llm.calls(), 0);
}

#[test]
fn generation_failure_is_surfaced_and_not_cached() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let answerer = HybridAnswerer::new(&kb, &embedder, &FailingLlm, settings(150, 0.5));
    let mut cache = ResponseCache::new();

    let err = answerer.answer(&mut cache, UNRELATED_Q).expect_err("generate fails");
    assert_eq!(err.code, "AI_GENERATION_FAILED");
    assert!(cache.is_empty());
}

#[test]
fn unavailable_knowledge_goes_straight_to_fallback() {
    let embedder = TableEmbedder::new();
    let kb = KnowledgeBase::unavailable(AppError::data_unavailable("FAQ source missing"));
    let llm = FixedLlm::new("Resposta gerada.");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(150, 0.5));

    let answer = answerer.answer(&mut ResponseCache::new(), AVG_Q).expect("answer");
    assert_eq!(answer.text, "Resposta gerada.");
    assert_eq!(answer.lookup, LookupOutcome::Unavailable);
    assert_eq!(embedder.calls(), 0);
}

#[test]
fn empty_knowledge_never_embeds() {
    let embedder = TableEmbedder::new();
    let kb = KnowledgeBase::from_entries(Vec::new(), "mock").expect("empty");
    let llm = FixedLlm::new("Resposta gerada.");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(150, 0.5));

    let answer = answerer.answer(&mut ResponseCache::new(), AVG_Q).expect("answer");
    assert_eq!(answer.lookup, LookupOutcome::NoMatch { distance: None });
    assert_eq!(embedder.calls(), 0);
}

#[test]
fn blank_question_is_rejected_before_any_call() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new("unused");
    let answerer = HybridAnswerer::new(&kb, &embedder, &llm, settings(150, 0.5));

    let err = answerer
        .answer(&mut ResponseCache::new(), "   ")
        .expect_err("blank");
    assert_eq!(err.code, "ASK_EMPTY_QUESTION");
    assert_eq!(embedder.calls() + llm.calls(), 0);
}

#[test]
fn answer_is_faq_only_when_distance_within_threshold() {
    let embedder = TableEmbedder::new();
    let kb = knowledge(&embedder);
    let llm = FixedLlm::new("fallback");

    // Rotate away from the first FAQ vector in the plane it shares with no other entry.
    for degrees in [0.0f32, 10.0, 25.0, 40.0, 50.0, 70.0, 90.0, 120.0, 180.0] {
        let theta = degrees.to_radians();
        let query = vec![theta.cos(), 0.0, theta.sin()];
        let distance = 2.0 - 2.0 * theta.cos();

        for threshold in [0.1f32, 0.5, 1.0] {
            let mut table = TableEmbedder::new();
            table.table.insert("rotated query".to_string(), query.clone());
            let answerer = HybridAnswerer::new(&kb, &table, &llm, settings(150, threshold));
            let answer = answerer
                .answer(&mut ResponseCache::new(), "rotated query")
                .expect("answer");
            if distance > threshold + 1e-4 {
                assert_ne!(answer.text, AVG_A, "degrees={degrees} threshold={threshold}");
                assert!(!answer.lookup.is_hit());
            } else if distance < threshold - 1e-4 {
                assert_eq!(answer.text, AVG_A, "degrees={degrees} threshold={threshold}");
            }
        }
    }
}
