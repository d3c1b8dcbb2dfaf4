use cloudclaw_core::types::Message;
use cloudclaw_providers::{GenerationOptions, LLMProvider, ToolCall};
use cloudclaw_tools::Toolset;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Number of transcript messages included when briefing the model.
/// This prevents exceeding LLM token limits as conversations grow.
const MAX_HISTORY_MESSAGES: usize = 20;

/// Reply used when the model produced neither text nor a tool call.
const NO_MATCH_REPLY: &str =
    "I couldn't map that to one of my AWS operations. Could you rephrase your request?";

/// One turn: user text in, exactly one outcome string out.
///
/// The model is consulted once for tool selection and argument extraction;
/// everything after that decision (lookup, argument parsing, the single tool
/// execution, formatting) is deterministic. At most one tool runs per turn,
/// and no failure escapes as anything but the returned string.
pub struct Dispatcher {
    provider: Arc<dyn LLMProvider>,
    toolset: Arc<Toolset>,
    system_prompt: String,
    options: GenerationOptions,
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        toolset: Arc<Toolset>,
        system_prompt: String,
        options: GenerationOptions,
    ) -> Self {
        Self {
            provider,
            toolset,
            system_prompt,
            options,
        }
    }

    pub fn toolset(&self) -> &Toolset {
        &self.toolset
    }

    /// Handles one line of user text against the transcript so far.
    pub async fn handle(&self, user_text: &str, transcript: &[Message]) -> String {
        let messages = self.build_messages(user_text, transcript);
        let tool_defs = self.toolset.definitions();

        let response = match self.provider.chat(&messages, &tool_defs, &self.options).await {
            Ok(response) => response,
            Err(e) => {
                error!("LLM provider error: {}", e);
                return format!(
                    "⚠️ I encountered an error communicating with the AI provider: {}",
                    e
                );
            }
        };

        if let Some(usage) = &response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "LLM token usage"
            );
        }

        let mut tool_calls = response.tool_calls;
        if tool_calls.is_empty() {
            // No tool matched: the model answered (or asked for
            // clarification) directly.
            if response.content.trim().is_empty() {
                return NO_MATCH_REPLY.to_string();
            }
            return response.content;
        }

        if tool_calls.len() > 1 {
            debug!(
                ignored = tool_calls.len() - 1,
                "model proposed multiple tool calls; executing the first"
            );
        }
        self.dispatch(tool_calls.remove(0)).await
    }

    /// System prompt, a bounded window of the transcript, then the user text.
    fn build_messages(&self, user_text: &str, transcript: &[Message]) -> Vec<Message> {
        let window = if transcript.len() > MAX_HISTORY_MESSAGES {
            &transcript[transcript.len() - MAX_HISTORY_MESSAGES..]
        } else {
            transcript
        };

        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend_from_slice(window);
        messages.push(Message::user(user_text));
        messages
    }

    /// Deterministic given the model's (name, arguments) decision: look up
    /// the tool, parse the arguments, execute once, format the result.
    async fn dispatch(&self, call: ToolCall) -> String {
        let Some(tool) = self.toolset.get(&call.name) else {
            warn!(tool = %call.name, "model proposed a tool that is not registered");
            return format!(
                "I don't have an operation named '{}'. Could you rephrase your request?",
                call.name
            );
        };

        let args = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, "could not parse proposed arguments: {}", e);
                return format!(
                    "⚠️ I could not parse the arguments for {}: {}",
                    call.name, e
                );
            }
        };

        info!(tool = %call.name, "executing tool");
        let result = tool.execute(args).await;
        if result.success {
            result.payload
        } else {
            format!(
                "⚠️ {}",
                result
                    .error
                    .unwrap_or_else(|| format!("{} failed without a message", call.name))
            )
        }
    }
}

/// Parses the model's raw argument string. An empty string means a no-arg
/// tool and maps to `{}`; anything else must be a JSON object.
fn parse_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw)
}
