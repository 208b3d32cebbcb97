//! 应用配置管理
//!
//! 启动时从命令行参数读取一次配置，未给出的参数回退到 `DOC_GEN_*` 环境变量，
//! 再回退到默认值。运行期间配置不可变。

use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::llm::ChatOptions;
use crate::services::doc_generator::types::normalize_extensions;
use crate::services::doc_generator::DocGenConfig;

/// 默认 API 基础 URL（智谱开放平台，OpenAI 兼容接口）
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// 默认模型
pub const DEFAULT_MODEL: &str = "glm-4";

/// 应用配置结构体
#[derive(Parser, Clone)]
#[command(
    name = "code-doc-gen",
    version,
    about = "Generate a Markdown document for every source file in a project using an LLM"
)]
pub struct AppConfig {
    /// 源码根目录
    #[arg(long, env = "DOC_GEN_SOURCE_ROOT", default_value = ".")]
    pub source_root: PathBuf,

    /// 文档输出根目录（不存在时自动创建）
    #[arg(long, env = "DOC_GEN_OUTPUT_ROOT", default_value = "auto_docs")]
    pub output_root: PathBuf,

    /// LLM API 密钥
    #[arg(long, env = "DOC_GEN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// LLM API 基础 URL
    #[arg(long, env = "DOC_GEN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// 模型名称（包含 "claude" 时使用 Anthropic 格式）
    #[arg(long, env = "DOC_GEN_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// 参与生成的文件扩展名，逗号分隔
    #[arg(
        long = "extensions",
        env = "DOC_GEN_EXTENSIONS",
        value_delimiter = ',',
        default_values = [".java", ".xml"]
    )]
    pub extensions: Vec<String>,

    /// 排除的目录名（支持 glob），逗号分隔
    #[arg(
        long = "exclude",
        env = "DOC_GEN_EXCLUDED_DIRS",
        value_delimiter = ',',
        default_values = ["target", "node_modules"]
    )]
    pub excluded_dirs: Vec<String>,

    /// 温度参数 (0.0 - 2.0)，不设置则使用服务端默认值
    #[arg(long, env = "DOC_GEN_TEMPERATURE")]
    pub temperature: Option<f64>,

    /// 最大 token 数
    #[arg(long, env = "DOC_GEN_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// 单次请求超时（秒），不设置则不限制
    #[arg(long, env = "DOC_GEN_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// 只列出将要生成的文档，不调用模型、不写文件
    #[arg(long, env = "DOC_GEN_DRY_RUN")]
    pub dry_run: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppConfig {
    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if !self.dry_run && self.api_key().is_none() {
            return Err(AppError::Config(
                "API Key is required (--api-key or DOC_GEN_API_KEY)".to_string(),
            ));
        }

        if normalize_extensions(&self.extensions).is_empty() {
            return Err(AppError::Config("至少需要一个文件扩展名".to_string()));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("模型名称不能为空".to_string()));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AppError::Config(format!(
                    "temperature 超出范围 (0.0 - 2.0): {}",
                    t
                )));
            }
        }

        Ok(())
    }

    /// 去除空白后的 API 密钥，空字符串视为未设置
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// 文档流水线配置
    pub fn doc_gen_config(&self) -> DocGenConfig {
        DocGenConfig::new(&self.extensions, &self.excluded_dirs, self.model.trim())
    }

    /// 每次补全请求使用的选项
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// HTTP 请求超时
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// API 密钥脱敏：只保留首尾各 4 个字符
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

// 手写 Debug，避免密钥出现在日志里
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("source_root", &self.source_root)
            .field("output_root", &self.output_root)
            .field("api_key", &self.api_key().map(mask_api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("extensions", &self.extensions)
            .field("excluded_dirs", &self.excluded_dirs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
