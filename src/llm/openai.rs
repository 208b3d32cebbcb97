//! OpenAI Chat Completions API 单次调用实现

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::{build_openai_endpoint, truncate_for_log};
use super::types::{ChatCompletion, ChatMessage, ChatOptions, LlmError};

/// OpenAI 请求载荷
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI 响应
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    content: Option<String>,
}

/// 调用 OpenAI 兼容接口，返回第一个候选的文本
pub async fn complete_openai(
    client: &Client,
    api_key: &str,
    base_url: &str,
    messages: &[ChatMessage],
    model: &str,
    options: &ChatOptions,
) -> Result<ChatCompletion, LlmError> {
    let endpoint = build_openai_endpoint(base_url);

    let payload = OpenAiRequest {
        model,
        messages,
        stream: false,
        temperature: options.temperature,
        max_tokens: options.max_tokens,
    };

    debug!("OpenAI API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(&endpoint)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        error!(
            "OpenAI API error: status={}, body={}",
            status.as_u16(),
            truncate_for_log(&body, 500)
        );
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }

    let parsed: OpenAiResponse = serde_json::from_str(&body)?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("choices 为空".to_string()))?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(ChatCompletion {
            content,
            finish_reason: choice.finish_reason,
        }),
        _ => Err(LlmError::EmptyResponse("第一个候选没有文本内容".to_string())),
    }
}
