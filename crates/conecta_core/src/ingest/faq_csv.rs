use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{FaqRecord, ValidationWarning};
use crate::error::AppError;

const QUESTION_HEADERS: &[&str] = &["question", "pergunta"];
const ANSWER_HEADERS: &[&str] = &["answer", "resposta"];
const EMBEDDING_HEADERS: &[&str] = &["embedding"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaqIngestSummary {
    pub records: Vec<FaqRecord>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, Copy)]
struct FaqColumns {
    question: usize,
    answer: usize,
    embedding: Option<usize>,
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().trim_start_matches('\u{feff}').to_lowercase();
        names.iter().any(|n| *n == h)
    })
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<FaqColumns, AppError> {
    let question = find_column(headers, QUESTION_HEADERS);
    let answer = find_column(headers, ANSWER_HEADERS);
    match (question, answer) {
        (Some(question), Some(answer)) => Ok(FaqColumns {
            question,
            answer,
            embedding: find_column(headers, EMBEDDING_HEADERS),
        }),
        _ => Err(AppError::data_unavailable(
            "FAQ source must have question and answer columns",
        )
        .with_details(format!(
            "headers={}",
            headers.iter().collect::<Vec<_>>().join(",")
        ))),
    }
}

fn cell<'a>(row: &'a csv::StringRecord, idx: usize) -> Option<&'a str> {
    row.get(idx).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse a serialized vector such as `[0.12, -0.5, 3e-2]`.
///
/// Both JSON arrays and Python list literals of plain floats share this syntax.
pub fn parse_embedding_literal(raw: &str) -> Result<Vec<f32>, String> {
    let values: Vec<f64> = serde_json::from_str(raw.trim()).map_err(|e| e.to_string())?;
    if values.is_empty() {
        return Err("embedding is empty".to_string());
    }
    Ok(values.into_iter().map(|v| v as f32).collect())
}

/// Parse FAQ CSV text into records.
///
/// Schema problems (missing columns, unparsable vectors, inconsistent vector sizes) make the whole
/// source unusable and fail with `DATA_UNAVAILABLE`. Row-level gaps are skipped with warnings.
pub fn parse_faq_csv(csv_text: &str) -> Result<FaqIngestSummary, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| {
            AppError::data_unavailable("Failed to read FAQ CSV headers").with_details(e.to_string())
        })?
        .clone();
    let cols = resolve_columns(&headers)?;

    let mut records: Vec<FaqRecord> = Vec::new();
    let mut warnings = Vec::new();
    let mut seen_questions: HashSet<String> = HashSet::new();
    let mut dims: Option<usize> = None;

    for (idx, row) in rdr.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = row.map_err(|e| {
            AppError::data_unavailable("Failed to read FAQ CSV row")
                .with_details(format!("line={line}; err={e}"))
        })?;

        let (Some(question), Some(answer)) = (cell(&row, cols.question), cell(&row, cols.answer))
        else {
            warnings.push(
                ValidationWarning::new("INGEST_FAQ_ROW_INCOMPLETE", "Skipped FAQ row without question or answer")
                    .with_details(format!("line={line}")),
            );
            continue;
        };

        if !seen_questions.insert(question.to_string()) {
            warnings.push(
                ValidationWarning::new("INGEST_FAQ_DUPLICATE_QUESTION", "Skipped duplicate FAQ question")
                    .with_details(format!("line={line}; question={question}")),
            );
            continue;
        }

        let embedding = match cols.embedding.and_then(|c| cell(&row, c)) {
            Some(raw) => {
                let v = parse_embedding_literal(raw).map_err(|e| {
                    AppError::data_unavailable("Failed to parse FAQ embedding column")
                        .with_details(format!("line={line}; err={e}"))
                })?;
                match dims {
                    Some(d) if d != v.len() => {
                        return Err(AppError::data_unavailable(
                            "FAQ embeddings have inconsistent dimensions",
                        )
                        .with_details(format!("line={line}; expected={d}; got={}", v.len())));
                    }
                    Some(_) => {}
                    None => dims = Some(v.len()),
                }
                Some(v)
            }
            None => {
                if cols.embedding.is_some() {
                    warnings.push(
                        ValidationWarning::new("INGEST_FAQ_EMBEDDING_MISSING", "FAQ row has no stored embedding")
                            .with_details(format!("line={line}")),
                    );
                }
                None
            }
        };

        records.push(FaqRecord {
            question: question.to_string(),
            answer: answer.to_string(),
            embedding,
        });
    }

    Ok(FaqIngestSummary {
        records,
        warnings,
    })
}

pub fn load_faq_csv(path: &Path) -> Result<FaqIngestSummary, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::data_unavailable("FAQ source not found or unreadable")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    parse_faq_csv(&text)
}
