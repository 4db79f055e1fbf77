//! Canonical provider-agnostic chat types
//!
//! The normalized representation every provider adapter converts to and
//! from, so callers see one shape regardless of which backend served the
//! call.

pub mod message;
pub mod request;
pub mod response;
pub mod stream;
pub mod tool;

pub use message::{FunctionCall, Message, Role, ToolCall};
pub use request::ChatRequest;
pub use response::{ChatResponse, FinishReason, Usage};
pub use stream::{StreamDelta, StreamEvent};
pub use tool::{
    FunctionDefinition, ToolChoice, ToolChoiceFunction, ToolChoiceFunctionName, ToolChoiceMode, ToolDefinition,
};
