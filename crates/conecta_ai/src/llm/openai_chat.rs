use conecta_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use super::{check_completion, ChatPrompt, Llm};
use crate::http;
use crate::openai::OpenAiClient;

#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: OpenAiClient,
}

impl OpenAiChat {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl Llm for OpenAiChat {
    fn generate(&self, model: &str, prompt: &ChatPrompt<'_>) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.client.base_url());
        let req = ChatRequest {
            model,
            messages: [
                Message {
                    role: "system",
                    content: prompt.system,
                },
                Message {
                    role: "user",
                    content: prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
        };
        let body = serde_json::to_value(req)
            .map_err(|e| http::encode_failed(codes::AI_GENERATION_FAILED, e))?;

        let resp = ureq::post(&url)
            .set("Authorization", &self.client.authorization())
            .timeout(self.client.generate_timeout())
            .send_json(body)
            .map_err(|e| {
                http::call_failed(
                    codes::AI_GENERATION_FAILED,
                    "Failed to call chat completions endpoint",
                    e,
                )
            })?;

        let v: ChatResponse = resp
            .into_json()
            .map_err(|e| http::decode_failed(codes::AI_GENERATION_FAILED, e))?;
        let content = v
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        check_completion(content)
    }
}
