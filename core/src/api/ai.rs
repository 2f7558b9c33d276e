//! `/api/ai`: chat completion and service status.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::requester::{Call, Requester};
use crate::types::{ChatMessage, ChatOptions};
use crate::validate;

const AI_ENDPOINT: &str = "/api/ai";

#[derive(Debug, Clone, Copy)]
pub struct AiApi<'a> {
    requester: &'a Requester,
}

impl<'a> AiApi<'a> {
    pub(crate) fn new(requester: &'a Requester) -> Self {
        Self { requester }
    }

    /// Send a conversation. `options` are merged into the body next to
    /// `messages`, overriding it if they carry the same key.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<Value, ApiError> {
        self.requester.send(chat_call(messages, options)?).await
    }

    pub async fn status(&self) -> Result<Value, ApiError> {
        self.requester.send(Call::get(AI_ENDPOINT)).await
    }
}

fn chat_call(messages: &[ChatMessage], options: Option<&ChatOptions>) -> Result<Call, ApiError> {
    validate::messages(messages)?;

    let mut body = json!({ "messages": messages });
    if let (Some(map), Some(options)) = (body.as_object_mut(), options) {
        for (key, value) in options {
            map.insert(key.clone(), value.clone());
        }
    }
    Ok(Call::post_json(AI_ENDPOINT, &body))
}
