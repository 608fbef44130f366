//! Chat-completion calls to the OpenAI API.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_trait::async_trait;

use super::{ChatModel, LlmError};

pub struct OpenAiChatModel {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: async_openai::Client::with_config(
                OpenAIConfig::new().with_api_key(api_key),
            ),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        json_output: bool,
    ) -> Result<String, LlmError> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(self.model.as_str()).messages([
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| LlmError::Api(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| LlmError::Api(e.to_string()))?
                .into(),
        ]);
        if json_output {
            builder.response_format(ResponseFormat::JsonObject);
        }
        let request = builder.build().map_err(|e| LlmError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
