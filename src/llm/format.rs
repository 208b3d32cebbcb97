//! API 格式检测和 URL 构建工具

/// API 格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    /// OpenAI Chat Completions API（智谱、DeepSeek 等兼容接口同样适用）
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
}

/// 根据模型名称检测 API 格式
///
/// 规则：模型名包含 "claude" 则使用 Anthropic 格式，否则使用 OpenAI 格式
pub fn detect_api_format(model: &str) -> ApiFormat {
    if model.to_lowercase().contains("claude") {
        ApiFormat::Anthropic
    } else {
        ApiFormat::OpenAi
    }
}

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().trim_end_matches('/').to_string();

    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let mut fixed_rest = rest.to_string();
        while fixed_rest.contains("//") {
            fixed_rest = fixed_rest.replace("//", "/");
        }
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// URL 最后一段是否为版本号（/v1、/v4 ...）
fn ends_with_version_segment(url: &str) -> bool {
    let last = url.rsplit('/').next().unwrap_or_default();
    match last.strip_prefix('v') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// 构建 OpenAI Chat Completions 端点
pub fn build_openai_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/chat/completions") {
        url
    } else if ends_with_version_segment(&url) {
        format!("{}/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

/// 构建 Anthropic Messages 端点
pub fn build_anthropic_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/messages") {
        url
    } else if ends_with_version_segment(&url) {
        format!("{}/messages", url)
    } else {
        format!("{}/v1/messages", url)
    }
}

/// 截断响应体，避免日志被整页 HTML 错误刷屏
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_api_format() {
        assert_eq!(detect_api_format("glm-4"), ApiFormat::OpenAi);
        assert_eq!(detect_api_format("deepseek-chat"), ApiFormat::OpenAi);
        assert_eq!(detect_api_format("claude-3-opus"), ApiFormat::Anthropic);
        assert_eq!(detect_api_format("Claude-3-Sonnet"), ApiFormat::Anthropic);
    }

    #[test]
    fn test_fix_base_url() {
        assert_eq!(fix_base_url("https://api.openai.com/"), "https://api.openai.com");
        assert_eq!(fix_base_url("https://api.openai.com//v1"), "https://api.openai.com/v1");
        assert_eq!(fix_base_url(" http://localhost:8080/// "), "http://localhost:8080");
    }

    #[test]
    fn test_build_openai_endpoint() {
        assert_eq!(
            build_openai_endpoint("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_openai_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_openai_endpoint("https://open.bigmodel.cn/api/paas/v4"),
            "https://open.bigmodel.cn/api/paas/v4/chat/completions"
        );
        assert_eq!(
            build_openai_endpoint("https://api.deepseek.com/chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }

    #[test]
    fn test_version_segment_requires_digits() {
        assert_eq!(
            build_openai_endpoint("https://example.com/api/vendor"),
            "https://example.com/api/vendor/v1/chat/completions"
        );
        assert_eq!(
            build_openai_endpoint("https://example.com/v"),
            "https://example.com/v/v1/chat/completions"
        );
    }

    #[test]
    fn test_build_anthropic_endpoint() {
        assert_eq!(
            build_anthropic_endpoint("https://api.anthropic.com"),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            build_anthropic_endpoint("https://api.anthropic.com/v1"),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("错误信息很长很长", 4), "错误信息...");
    }
}
