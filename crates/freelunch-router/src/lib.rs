//! Failover routing over free-tier LLM providers
//!
//! A [`Menu`] turns a declarative capability configuration into callable
//! [`CapabilityChain`]s. Each chain walks its configured `provider::model`
//! candidates in priority order and returns the first successful response,
//! normalizing every provider behind one chat interface.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod chain;
pub mod convert;
pub mod error;
pub mod menu;
pub mod protocol;
pub mod provider;
pub mod types;

pub use chain::{CallOptions, CapabilityChain};
pub use error::{AttemptFailure, ProviderError, RouterError};
pub use menu::Menu;
pub use provider::{ChatProvider, ChatStream};
pub use types::{ChatRequest, ChatResponse, Message, StreamEvent};
