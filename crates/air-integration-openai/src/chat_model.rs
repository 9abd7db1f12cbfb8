//! Chat model with lifecycle callbacks
//!
//! Wraps an [`OpenAiClient`] and reports every call to its callback
//! handlers as start, then end or error. The client is the model's
//! internal transport, so redirection goes one level down.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use air::{
    AirError, CallId, ChatMessage, ClientShape, LlmCallbackHandler, LlmResult, ProviderClient,
};

use crate::client::OpenAiClient;

/// Chat model bound to one model name
pub struct ChatModel {
    client: OpenAiClient,
    model: String,
    options: Map<String, Value>,
    callbacks: Vec<Arc<dyn LlmCallbackHandler>>,
}

impl ChatModel {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            options: Map::new(),
            callbacks: Vec::new(),
        }
    }

    /// Extra request field sent with every call (temperature, max_tokens, ...)
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Attach a callback handler
    pub fn with_callback(mut self, handler: Arc<dyn LlmCallbackHandler>) -> Self {
        self.callbacks.push(handler);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &OpenAiClient {
        &self.client
    }

    pub fn callbacks(&self) -> &[Arc<dyn LlmCallbackHandler>] {
        &self.callbacks
    }

    /// Send a single user prompt
    pub async fn invoke(&self, prompt: &str) -> Result<LlmResult, AirError> {
        self.generate(&[ChatMessage::user(prompt)]).await
    }

    /// Send a conversation and return one generation per choice
    pub async fn generate(&self, messages: &[ChatMessage]) -> Result<LlmResult, AirError> {
        let mut request = Map::new();
        request.insert("model".to_string(), Value::String(self.model.clone()));
        request.insert(
            "messages".to_string(),
            serde_json::to_value(messages)
                .map_err(|e| AirError::Serialization(format!("Failed to serialize messages: {e}")))?,
        );
        request.extend(self.options.clone());

        let run_id = CallId::from(Uuid::new_v4());
        let serialized = self.serialized();
        let prompts: Vec<String> = messages.iter().map(|m| m.content.clone()).collect();

        for handler in &self.callbacks {
            handler.on_llm_start(&run_id, &serialized, &prompts);
        }

        match self.client.chat_completion(&Value::Object(request)).await {
            Ok(body) => {
                let result = LlmResult::from_chat_completion(&body);
                for handler in &self.callbacks {
                    handler.on_llm_end(&run_id, &result);
                }
                Ok(result)
            }
            Err(e) => {
                for handler in &self.callbacks {
                    handler.on_llm_error(&run_id, &e);
                }
                Err(e)
            }
        }
    }

    /// Description handed to `on_llm_start`
    fn serialized(&self) -> Value {
        json!({
            "name": "ChatModel",
            "kwargs": { "model_name": self.model },
        })
    }
}

impl ProviderClient for ChatModel {
    fn shape(&mut self) -> ClientShape<'_> {
        ClientShape::Nested(&mut self.client)
    }
}
