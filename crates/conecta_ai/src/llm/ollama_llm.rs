use conecta_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use super::{check_completion, ChatPrompt, Llm};
use crate::http;
use crate::ollama::OllamaClient;

#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: OllamaClient,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Llm for OllamaLlm {
    fn generate(&self, model: &str, prompt: &ChatPrompt<'_>) -> Result<String, AppError> {
        let url = format!("{}/api/generate", self.client.base_url());
        let req = GenerateRequest {
            model,
            system: prompt.system,
            prompt: prompt.user,
            stream: false,
            options: GenerateOptions {
                num_predict: prompt.max_tokens,
            },
        };
        let body = serde_json::to_value(req)
            .map_err(|e| http::encode_failed(codes::AI_GENERATION_FAILED, e))?;

        let resp = ureq::post(&url)
            .timeout(self.client.generate_timeout())
            .send_json(body)
            .map_err(|e| {
                http::call_failed(
                    codes::AI_GENERATION_FAILED,
                    "Failed to call generate endpoint",
                    e,
                )
            })?;

        let v: GenerateResponse = resp
            .into_json()
            .map_err(|e| http::decode_failed(codes::AI_GENERATION_FAILED, e))?;
        check_completion(v.response)
    }
}
