use crate::{GenerationOptions, GenerationResponse, LLMProvider, ProviderError, ToolCall, Usage};
use async_trait::async_trait;
use cloudclaw_core::types::Message;
use reqwest::Client;
use serde_json::{json, Value};

/// Chat-completions provider for any OpenAI-compatible endpoint. Groq serves
/// the same wire format, so the factory reuses this type with the Groq base
/// URL.
pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String, api_base: Option<String>) -> Self {
        Self {
            api_key,
            api_base: api_base.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = build_request_body(messages, tools, options);

        let res = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !res.status().is_success() {
            let error_text = res
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ApiError(error_text));
        }

        let json: Value = res
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(parse_response(&json))
    }
}

/// Builds the chat-completions request body. Tool definitions arrive in the
/// registry's `{name, description, parameters}` shape and are wrapped into
/// the API's function envelope here.
fn build_request_body(messages: &[Message], tools: &[Value], options: &GenerationOptions) -> Value {
    let messages_json: Vec<Value> = messages
        .iter()
        .map(|m| {
            json!({
                "role": m.role,
                "content": m.content
            })
        })
        .collect();

    let mut body = json!({
        "model": options.model,
        "messages": messages_json,
    });

    if !tools.is_empty() {
        let tools_json: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": t
                })
            })
            .collect();
        body["tools"] = json!(tools_json);
        body["tool_choice"] = json!("auto");
    }

    if let Some(max_tokens) = options.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(temperature) = options.temperature {
        body["temperature"] = json!(temperature);
    }

    body
}

/// Reads the first choice out of a chat-completions response. Absent fields
/// degrade to empty values; `arguments` stays the raw JSON string the API
/// returned.
fn parse_response(json: &Value) -> GenerationResponse {
    let choice = &json["choices"][0]["message"];
    let content = choice["content"].as_str().unwrap_or_default().to_string();

    let mut tool_calls = Vec::new();
    if let Some(tcs) = choice["tool_calls"].as_array() {
        for tc in tcs {
            let function = &tc["function"];
            tool_calls.push(ToolCall {
                id: tc["id"].as_str().unwrap_or_default().to_string(),
                name: function["name"].as_str().unwrap_or_default().to_string(),
                arguments: function["arguments"].as_str().unwrap_or_default().to_string(),
            });
        }
    }

    let usage = json.get("usage").map(|usage_json| Usage {
        input_tokens: usage_json["prompt_tokens"].as_u64().unwrap_or(0) as usize,
        output_tokens: usage_json["completion_tokens"].as_u64().unwrap_or(0) as usize,
    });

    GenerationResponse {
        content,
        tool_calls,
        usage,
    }
}
