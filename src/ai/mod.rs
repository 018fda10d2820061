//! Completion service integration
//!
//! Encodes images, builds modality-specific chat completion requests and
//! sends them to an OpenAI-compatible endpoint.

pub mod client;
pub mod encode;
pub mod mime;
pub mod mock;
pub mod payload;
pub mod types;

pub use client::OpenAiCompletionClient;
pub use encode::{encode, EncodedImage};
pub use mock::{MockCompletionClient, MockReply};
pub use payload::{build_request, PreparedInput};
pub use types::{Completion, CompletionRequest};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn send(&self, request: &CompletionRequest) -> Result<Completion>;
}
