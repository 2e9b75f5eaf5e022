//! Reasoning service reached over an OpenAI-compatible chat-completions API.
//!
//! Works against OpenAI, Gemini's OpenAI surface, and local servers such as
//! llama.cpp or Ollama that accept `response_format: json_schema`.

use super::{DiagnosisRequest, ReasoningService, ServiceError};
use crate::{
    config::ReasoningConfig,
    error::{CoreError, Result},
};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const ERROR_BODY_LIMIT: usize = 200;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'static str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageContent,
}

#[derive(Deserialize)]
struct ChatMessageContent {
    content: Option<String>,
}

/// Blocking HTTP client for the reasoning service
pub struct HttpReasoningService {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpReasoningService {
    pub fn new(config: &ReasoningConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::platform(format!("Failed to build HTTP client: {}", e)))?;

        let api_key = config.api_key();
        if api_key.is_none() {
            log::warn!(
                "{} is not set; requests to {} will be sent without credentials",
                config.api_key_env,
                config.endpoint
            );
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            timeout: config.timeout(),
        })
    }

    fn body<'a>(&'a self, request: &'a DiagnosisRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_content,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "system_analysis",
                    strict: true,
                    schema: &request.response_schema,
                },
            },
        }
    }
}

impl ReasoningService for HttpReasoningService {
    fn request(&self, request: &DiagnosisRequest) -> std::result::Result<String, ServiceError> {
        let mut builder = self.client.post(&self.endpoint).json(&self.body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(self.timeout)
            } else {
                ServiceError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let envelope: ChatResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(self.timeout)
            } else {
                ServiceError::Envelope(e.to_string())
            }
        })?;

        // No choices or a null content both surface as an empty reply.
        Ok(envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
