//! Conversion between canonical types and the OpenAI-compatible wire format

use freelunch_config::GenerationParams;

use crate::protocol::openai::{
    OpenAiFunction, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiStreamChunk, OpenAiTool, OpenAiToolCall,
};
use crate::types::{
    ChatRequest, ChatResponse, FinishReason, FunctionCall, Role, StreamDelta, StreamEvent, ToolCall, ToolDefinition,
    Usage,
};

/// Build a wire request for an OpenAI-compatible endpoint
///
/// `request.params` must already be the merged (configured + call-time)
/// parameter set; typed fields map to their wire names and everything in
/// `extra` is flattened into the JSON body verbatim.
pub fn build_request(model: &str, request: &ChatRequest, stream: bool) -> OpenAiRequest {
    let params: &GenerationParams = &request.params;

    OpenAiRequest {
        model: model.to_owned(),
        messages: request.messages.iter().map(Into::into).collect(),
        temperature: params.temperature,
        top_p: params.top_p,
        max_tokens: params.max_tokens,
        stop: params.stop.clone(),
        seed: params.seed,
        reasoning_effort: params.reasoning_effort.clone(),
        stream: stream.then_some(true),
        tools: request
            .tools
            .as_ref()
            .map(|tools| tools.iter().map(Into::into).collect()),
        tool_choice: request
            .tool_choice
            .as_ref()
            .and_then(|tc| serde_json::to_value(tc).ok()),
        extra: params.extra.clone(),
    }
}

impl From<&crate::types::Message> for OpenAiMessage {
    fn from(msg: &crate::types::Message) -> Self {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };

        Self {
            role: role.to_owned(),
            content: Some(msg.content.clone()),
            tool_calls: msg
                .tool_calls
                .as_ref()
                .map(|calls| calls.iter().map(Into::into).collect()),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

impl From<&ToolCall> for OpenAiToolCall {
    fn from(tc: &ToolCall) -> Self {
        Self {
            id: tc.id.clone(),
            tool_type: "function".to_owned(),
            function: crate::protocol::openai::OpenAiFunctionCall {
                name: tc.function.name.clone(),
                arguments: tc.function.arguments.clone(),
            },
        }
    }
}

impl From<&ToolDefinition> for OpenAiTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            tool_type: tool.tool_type.clone(),
            function: OpenAiFunction {
                name: tool.function.name.clone(),
                description: tool.function.description.clone(),
                parameters: tool.function.parameters.clone(),
            },
        }
    }
}

impl From<OpenAiResponse> for ChatResponse {
    fn from(resp: OpenAiResponse) -> Self {
        let Some(choice) = resp.choices.into_iter().next() else {
            return Self {
                model: resp.model,
                content: String::new(),
                tool_calls: Vec::new(),
                finish_reason: None,
                usage: None,
            };
        };

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                function: FunctionCall {
                    name: tc.function.name,
                    arguments: tc.function.arguments,
                },
            })
            .collect();

        Self {
            model: resp.model,
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
            usage: resp.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        }
    }
}

/// Convert a streaming chunk to canonical stream events
pub fn chunk_to_events(chunk: &OpenAiStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for choice in &chunk.choices {
        let content = choice.delta.content.clone().filter(|c| !c.is_empty());
        let finish_reason = choice.finish_reason.as_deref().and_then(parse_finish_reason);
        if content.is_some() || finish_reason.is_some() {
            events.push(StreamEvent::Delta(StreamDelta { content, finish_reason }));
        }
    }

    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::Usage(Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }));
    }

    events
}

fn parse_finish_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" => Some(FinishReason::ToolCalls),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}
