//! Conversion between canonical types and the Google Generative Language wire format

use crate::protocol::google::{
    GoogleContent, GoogleFunctionCall, GoogleFunctionCallingConfig, GoogleFunctionDeclaration, GoogleFunctionResponse,
    GoogleGenerationConfig, GooglePart, GoogleRequest, GoogleResponse, GoogleTool, GoogleToolConfig,
};
use crate::types::{
    ChatRequest, ChatResponse, FinishReason, FunctionCall, Message, Role, StreamDelta, StreamEvent, ToolCall,
    ToolChoice, ToolChoiceMode, Usage,
};

/// Build a `generateContent` wire request
///
/// `request.params` must already be the merged parameter set. Google only
/// understands the typed subset; `reasoning_effort` and `extra` keys have
/// no Gemini equivalent and are not sent.
pub fn build_request(request: &ChatRequest) -> GoogleRequest {
    let mut system_instruction = None;
    let mut contents = Vec::new();

    for msg in &request.messages {
        match msg.role {
            Role::System => {
                system_instruction = Some(GoogleContent {
                    role: None,
                    parts: vec![GooglePart::Text(msg.content.clone())],
                });
            }
            Role::User => contents.push(message_to_content(msg, "user")),
            Role::Assistant => contents.push(message_to_content(msg, "model")),
            Role::Tool => {
                // Tool results become function responses, keyed by the
                // id of the call they answer
                if let Some(tool_call_id) = &msg.tool_call_id {
                    let response_value = serde_json::from_str(&msg.content)
                        .unwrap_or_else(|_| serde_json::json!({"result": msg.content}));
                    contents.push(GoogleContent {
                        role: Some("function".to_owned()),
                        parts: vec![GooglePart::FunctionResponse(GoogleFunctionResponse {
                            name: tool_call_id.clone(),
                            response: response_value,
                        })],
                    });
                }
            }
        }
    }

    let params = &request.params;
    let generation_config = Some(GoogleGenerationConfig {
        temperature: params.temperature,
        top_p: params.top_p,
        max_output_tokens: params.max_tokens,
        stop_sequences: params.stop.clone(),
        seed: params.seed,
    });

    let tools = request.tools.as_ref().map(|tools| {
        vec![GoogleTool {
            function_declarations: tools
                .iter()
                .map(|t| GoogleFunctionDeclaration {
                    name: t.function.name.clone(),
                    description: t.function.description.clone(),
                    parameters: t.function.parameters.clone(),
                })
                .collect(),
        }]
    });

    let tool_config = request.tool_choice.as_ref().map(|tc| {
        let (mode, allowed_names) = match tc {
            ToolChoice::Mode(ToolChoiceMode::None) => ("NONE".to_owned(), None),
            ToolChoice::Mode(ToolChoiceMode::Auto) => ("AUTO".to_owned(), None),
            ToolChoice::Mode(ToolChoiceMode::Required) => ("ANY".to_owned(), None),
            ToolChoice::Function(func) => ("ANY".to_owned(), Some(vec![func.function.name.clone()])),
        };
        GoogleToolConfig {
            function_calling_config: GoogleFunctionCallingConfig {
                mode,
                allowed_function_names: allowed_names,
            },
        }
    });

    GoogleRequest {
        contents,
        system_instruction,
        generation_config,
        tools,
        tool_config,
    }
}

/// Convert a canonical message to a Google content object
fn message_to_content(msg: &Message, role: &str) -> GoogleContent {
    let mut parts = Vec::new();

    if !msg.content.is_empty() {
        parts.push(GooglePart::Text(msg.content.clone()));
    }

    if let Some(tool_calls) = &msg.tool_calls {
        for tc in tool_calls {
            let args = serde_json::from_str(&tc.function.arguments).unwrap_or_else(|_| serde_json::json!({}));
            parts.push(GooglePart::FunctionCall(GoogleFunctionCall {
                name: tc.function.name.clone(),
                args,
            }));
        }
    }

    // Google rejects content objects with no parts
    if parts.is_empty() {
        parts.push(GooglePart::Text(String::new()));
    }

    GoogleContent {
        role: Some(role.to_owned()),
        parts,
    }
}

impl From<GoogleResponse> for ChatResponse {
    fn from(resp: GoogleResponse) -> Self {
        let usage = resp.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let Some(candidate) = resp.candidates.into_iter().next() else {
            return Self {
                model: String::new(),
                content: String::new(),
                tool_calls: Vec::new(),
                finish_reason: None,
                usage,
            };
        };

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            match part {
                GooglePart::Text(text) => content.push_str(&text),
                GooglePart::FunctionCall(fc) => {
                    let arguments = serde_json::to_string(&fc.args).unwrap_or_else(|_| "{}".to_owned());
                    tool_calls.push(ToolCall {
                        id: format!("call_{}", fc.name),
                        function: FunctionCall {
                            name: fc.name,
                            arguments,
                        },
                    });
                }
                GooglePart::FunctionResponse(_) => {}
            }
        }

        Self {
            // Filled in by the provider; Google omits it from responses
            model: String::new(),
            content,
            tool_calls,
            finish_reason: candidate.finish_reason.as_deref().and_then(parse_finish_reason),
            usage,
        }
    }
}

/// Convert a streaming chunk to canonical stream events
pub fn chunk_to_events(chunk: &GoogleResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for candidate in &chunk.candidates {
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let GooglePart::Text(text) = part
                    && !text.is_empty()
                {
                    events.push(StreamEvent::Delta(StreamDelta {
                        content: Some(text.clone()),
                        finish_reason: None,
                    }));
                }
            }
        }

        if let Some(reason) = candidate.finish_reason.as_deref().and_then(parse_finish_reason) {
            events.push(StreamEvent::Delta(StreamDelta {
                content: None,
                finish_reason: Some(reason),
            }));
        }
    }

    if let Some(usage) = chunk.usage_metadata {
        events.push(StreamEvent::Usage(Usage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        }));
    }

    events
}

fn parse_finish_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "STOP" => Some(FinishReason::Stop),
        "MAX_TOKENS" => Some(FinishReason::Length),
        "SAFETY" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::build_request;
    use crate::types::{ChatRequest, Message};

    #[test]
    fn system_message_becomes_system_instruction() {
        let request = ChatRequest::new(vec![
            Message::system("Be terse."),
            Message::user("hello"),
            Message::assistant("hi"),
        ]);
        let wire = build_request(&request);

        assert!(wire.system_instruction.is_some());
        assert_eq!(wire.contents.len(), 2);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
        assert_eq!(wire.contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn wire_request_uses_camel_case() {
        let mut request = ChatRequest::from_prompt("hi");
        request.params.max_tokens = Some(64);
        let wire = build_request(&request);

        let body = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            body["generation_config"]["maxOutputTokens"],
            serde_json::json!(64)
        );
    }
}
