//! Anthropic Messages API 单次调用实现

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::{build_anthropic_endpoint, truncate_for_log};
use super::types::{ChatCompletion, ChatMessage, ChatOptions, LlmError};

/// Messages API 要求显式给出 max_tokens
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic 请求载荷
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Anthropic 响应
#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

/// 调用 Anthropic Messages API，拼接所有文本块
pub async fn complete_anthropic(
    client: &Client,
    api_key: &str,
    base_url: &str,
    messages: &[ChatMessage],
    model: &str,
    options: &ChatOptions,
) -> Result<ChatCompletion, LlmError> {
    let endpoint = build_anthropic_endpoint(base_url);

    // 系统消息单独放在 system 字段
    let system = messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.as_str());
    let anthropic_messages = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| AnthropicMessage {
            role: &m.role,
            content: &m.content,
        })
        .collect();

    let payload = AnthropicRequest {
        model,
        messages: anthropic_messages,
        system,
        max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: options.temperature,
    };

    debug!("Anthropic API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(&endpoint)
        .header("Content-Type", "application/json")
        .header("x-api-key", api_key)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("anthropic-version", "2023-06-01")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        error!(
            "Anthropic API error: status={}, body={}",
            status.as_u16(),
            truncate_for_log(&body, 500)
        );
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }

    let parsed: AnthropicResponse = serde_json::from_str(&body)?;
    let content: String = parsed
        .content
        .iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();

    if content.trim().is_empty() {
        return Err(LlmError::EmptyResponse("没有 text 内容块".to_string()));
    }

    Ok(ChatCompletion {
        content,
        finish_reason: parsed.stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_complete_anthropic_joins_text_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-haiku",
                "max_tokens": 4096,
                "messages": [{"role": "user", "content": "document this"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    {"type": "text", "text": "# Part 1\n"},
                    {"type": "tool_use", "id": "x", "name": "noop", "input": {}},
                    {"type": "text", "text": "Part 2"}
                ],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let completion = complete_anthropic(
            &Client::new(),
            "test-key",
            &server.uri(),
            &[ChatMessage::user("document this")],
            "claude-3-haiku",
            &ChatOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(completion.content, "# Part 1\nPart 2");
        assert_eq!(completion.finish_reason.as_deref(), Some("end_turn"));
    }

    #[tokio::test]
    async fn test_complete_anthropic_rejects_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [],
                "stop_reason": "max_tokens"
            })))
            .mount(&server)
            .await;

        let err = complete_anthropic(
            &Client::new(),
            "k",
            &server.uri(),
            &[ChatMessage::user("x")],
            "claude-3-haiku",
            &ChatOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LlmError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_complete_anthropic_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = complete_anthropic(
            &Client::new(),
            "k",
            &server.uri(),
            &[ChatMessage::user("x")],
            "claude-3-haiku",
            &ChatOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LlmError::ApiError { status: 529, .. }));
    }
}
