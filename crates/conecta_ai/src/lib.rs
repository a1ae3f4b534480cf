pub mod answer;
pub mod embeddings;
pub mod faq;
mod http;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod retrieve;
pub mod session;
