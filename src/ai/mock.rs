use super::types::{Completion, CompletionRequest};
use super::CompletionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted reply for [`MockCompletionClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    ServiceError(String),
    TransportError(String),
}

/// Completion service that replays scripted replies and records requests.
#[derive(Clone)]
pub struct MockCompletionClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(reply);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(text.into()))
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionClient {
    async fn send(&self, request: &CompletionRequest) -> Result<Completion> {
        let count = {
            let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
            requests.push(request.clone());
            requests.len()
        };

        let replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        if replies.is_empty() {
            // Default mock response
            return Ok(Completion {
                candidates: vec![format!(
                    "```jsx\nexport default function Component() {{\n  return <div>{}</div>;\n}}\n```",
                    request.model
                )],
            });
        }

        match &replies[(count - 1) % replies.len()] {
            MockReply::Text(text) => Ok(Completion {
                candidates: vec![text.clone()],
            }),
            MockReply::ServiceError(message) => Err(Error::Service(message.clone())),
            MockReply::TransportError(message) => Err(Error::Transport(message.clone())),
        }
    }
}
