//! 统一 LLM 客户端

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use super::anthropic::complete_anthropic;
use super::format::{detect_api_format, ApiFormat};
use super::openai::complete_openai;
use super::types::{ChatCompletion, ChatMessage, ChatOptions, LlmError};

/// 补全服务：提交一段提示词，取回生成的文本
///
/// 文档流水线只依赖这个 trait，测试中用桩实现替换真实网络调用。
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// 以单条 user 消息、无历史上下文的方式请求一次补全
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}

/// 统一 LLM 客户端
///
/// 支持 OpenAI 和 Anthropic API 格式，根据模型名称自动选择
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    options: ChatOptions,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    ///
    /// `timeout` 为 `None` 时不限制单次请求耗时。
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        let mut builder = Client::builder().pool_max_idle_per_host(1);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            options: ChatOptions::default(),
        })
    }

    /// 设置每次请求使用的默认选项
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// 单次聊天请求（自动检测 API 格式）
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: &ChatOptions,
    ) -> Result<ChatCompletion, LlmError> {
        let api_format = detect_api_format(model);
        info!("LLM request: model={}, api_format={:?}", model, api_format);

        match api_format {
            ApiFormat::OpenAi => {
                complete_openai(
                    &self.client,
                    &self.api_key,
                    &self.base_url,
                    messages,
                    model,
                    options,
                )
                .await
            }
            ApiFormat::Anthropic => {
                complete_anthropic(
                    &self.client,
                    &self.api_key,
                    &self.base_url,
                    messages,
                    model,
                    options,
                )
                .await
            }
        }
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let messages = [ChatMessage::user(prompt)];
        let completion = self.chat(&messages, model, &self.options).await?;
        if matches!(completion.finish_reason.as_deref(), Some("length" | "max_tokens")) {
            warn!("Completion truncated by token limit: model={}", model);
        }
        Ok(completion.content)
    }
}
