use conecta_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use super::{bounded_input, check_vector, Embedder};
use crate::http;
use crate::openai::OpenAiClient;

#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: OpenAiClient,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        let url = format!("{}/embeddings", self.client.base_url());
        let req = EmbeddingsRequest {
            model,
            input: bounded_input(input),
        };
        let body = serde_json::to_value(req)
            .map_err(|e| http::encode_failed(codes::AI_EMBEDDINGS_FAILED, e))?;

        let resp = ureq::post(&url)
            .set("Authorization", &self.client.authorization())
            .timeout(self.client.embed_timeout())
            .send_json(body)
            .map_err(|e| {
                http::call_failed(
                    codes::AI_EMBEDDINGS_FAILED,
                    "Failed to call embeddings endpoint",
                    e,
                )
            })?;

        let v: EmbeddingsResponse = resp
            .into_json()
            .map_err(|e| http::decode_failed(codes::AI_EMBEDDINGS_FAILED, e))?;
        let first = v.data.into_iter().next().ok_or_else(|| {
            AppError::new(codes::AI_EMBEDDINGS_FAILED, "Embeddings response had no data")
        })?;
        check_vector(first.embedding)
    }
}
