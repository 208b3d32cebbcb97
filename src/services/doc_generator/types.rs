//! 文档生成器类型定义
//!
//! 定义源文件、请求、结果、运行汇总等核心类型

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};

/// 扫描阶段发现的候选文件（尚未读取内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// 完整路径
    pub path: PathBuf,
    /// 相对于源码根目录的路径
    pub relative_path: PathBuf,
    /// 命中的扩展名（带前导点，如 ".java"）
    pub extension: String,
}

impl DiscoveredFile {
    /// 以 `/` 分隔的相对路径，用于 Prompt 和日志
    pub fn display_path(&self) -> String {
        self.relative_path.to_string_lossy().replace('\\', "/")
    }
}

/// 已读取内容的源文件，只使用一次
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub extension: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(file: &DiscoveredFile, content: String) -> Self {
        Self {
            path: file.path.clone(),
            relative_path: file.relative_path.clone(),
            extension: file.extension.clone(),
            content,
        }
    }
}

/// 一次补全请求：完整 Prompt + 模型名称
#[derive(Debug, Clone)]
pub struct DocumentationRequest {
    pub prompt: String,
    pub model: String,
}

/// 补全结果及其落盘位置
#[derive(Debug, Clone)]
pub struct DocumentationResult {
    pub content: String,
    pub doc_path: PathBuf,
}

/// 单个文件失败所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// 读取源文件
    Read,
    /// 调用补全服务
    Complete,
    /// 写入文档
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Complete => "complete",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// 文档已生成
    Generated { source: PathBuf, output: PathBuf },
    /// 仅规划（dry run），未调用模型
    Planned { source: PathBuf, output: PathBuf },
    /// 处理失败，整体运行继续
    Failed {
        source: PathBuf,
        stage: FailureStage,
        reason: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            Self::Generated { source, .. }
            | Self::Planned { source, .. }
            | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// 一次运行的汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 文档根目录（绝对路径）
    pub docs_root: PathBuf,
    /// 按处理顺序记录的结果
    pub outcomes: Vec<FileOutcome>,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

impl RunSummary {
    pub fn new(docs_root: PathBuf) -> Self {
        Self {
            docs_root,
            outcomes: Vec::new(),
            started_at: Local::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn generated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Generated { .. }))
            .count()
    }

    pub fn planned_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Planned { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// 耗时（毫秒），未结束时按当前时间计算
    pub fn elapsed_ms(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Local::now);
        (end - self.started_at).num_milliseconds()
    }
}

/// 文档生成配置
#[derive(Debug, Clone)]
pub struct DocGenConfig {
    /// 参与生成的文件扩展名（规范化为带前导点）
    pub extensions: Vec<String>,

    /// 排除的目录名，支持 glob 模式
    pub excluded_dirs: Vec<String>,

    /// 模型名称
    pub model: String,

    /// 文档扩展名（默认 "md"）
    pub doc_extension: String,
}

pub fn default_extensions() -> Vec<String> {
    vec![".java".to_string(), ".xml".to_string()]
}

pub fn default_excluded_dirs() -> Vec<String> {
    vec!["target".to_string(), "node_modules".to_string()]
}

pub fn default_model() -> String {
    "glm-4".to_string()
}

fn default_doc_extension() -> String {
    "md".to_string()
}

/// 规范化扩展名：去掉空白，补全前导点，丢弃空项并去重
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.as_ref().trim();
        if ext.is_empty() || ext == "." {
            continue;
        }
        let ext = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{}", ext)
        };
        if !result.contains(&ext) {
            result.push(ext);
        }
    }
    result
}

impl DocGenConfig {
    /// 以给定的扩展名和排除目录构建配置
    pub fn new<E, X>(extensions: E, excluded_dirs: X, model: impl Into<String>) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: AsRef<str>,
    {
        Self {
            extensions: normalize_extensions(extensions),
            excluded_dirs: excluded_dirs
                .into_iter()
                .map(|d| d.as_ref().trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            model: model.into(),
            doc_extension: default_doc_extension(),
        }
    }
}

impl Default for DocGenConfig {
    fn default() -> Self {
        Self::new(default_extensions(), default_excluded_dirs(), default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extensions() {
        let exts = normalize_extensions(["java", ".xml", " .java ", "", "."]);
        assert_eq!(exts, vec![".java".to_string(), ".xml".to_string()]);
    }

    #[test]
    fn test_default_config() {
        let config = DocGenConfig::default();
        assert_eq!(config.extensions, vec![".java", ".xml"]);
        assert_eq!(config.excluded_dirs, vec!["target", "node_modules"]);
        assert_eq!(config.model, "glm-4");
        assert_eq!(config.doc_extension, "md");
    }

    #[test]
    fn test_run_summary_counts() {
        let mut summary = RunSummary::new(PathBuf::from("/docs"));
        summary.record(FileOutcome::Generated {
            source: PathBuf::from("/src/A.java"),
            output: PathBuf::from("/docs/A.md"),
        });
        summary.record(FileOutcome::Failed {
            source: PathBuf::from("/src/B.java"),
            stage: FailureStage::Complete,
            reason: "boom".to_string(),
        });
        summary.finish();

        assert_eq!(summary.generated_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.planned_count(), 0);
        assert!(summary.elapsed_ms() >= 0);
        assert_eq!(summary.outcomes[1].source(), Path::new("/src/B.java"));
    }

    #[test]
    fn test_failure_stage_display() {
        assert_eq!(FailureStage::Read.to_string(), "read");
        assert_eq!(FailureStage::Write.to_string(), "write");
    }
}
