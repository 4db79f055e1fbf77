use serde::{Deserialize, Serialize};

use super::response::{FinishReason, Usage};

/// Event yielded during a streaming response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamEvent {
    /// Incremental content delta
    Delta(StreamDelta),
    /// Final usage statistics (sent near stream end)
    Usage(Usage),
    /// Stream has completed
    Done,
}

/// Incremental update within a streaming response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDelta {
    /// Incremental text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Reason generation finished (present on the final delta)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}
