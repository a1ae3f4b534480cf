use conecta_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use super::{bounded_input, check_vector, Embedder};
use crate::http;
use crate::ollama::OllamaClient;

#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        let url = format!("{}/api/embeddings", self.client.base_url());
        let req = EmbeddingsRequest {
            model,
            prompt: bounded_input(input),
        };
        let body = serde_json::to_value(req)
            .map_err(|e| http::encode_failed(codes::AI_EMBEDDINGS_FAILED, e))?;

        let resp = ureq::post(&url)
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
        check_vector(v.embedding)
    }
}
