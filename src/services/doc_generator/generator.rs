//! 文档生成器
//!
//! 负责读取源文件、调用 LLM 生成文档并保存到镜像路径

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::prompts;
use super::types::{
    DiscoveredFile, DocGenConfig, DocumentationRequest, DocumentationResult, FailureStage,
    SourceFile,
};
use crate::llm::{CompletionService, LlmError};

/// 文档生成器
pub struct DocumentGenerator {
    /// 文档根目录
    docs_root: PathBuf,
    /// 配置
    config: DocGenConfig,
}

impl DocumentGenerator {
    /// 创建新的文档生成器
    pub fn new(docs_root: PathBuf, config: DocGenConfig) -> Self {
        Self { docs_root, config }
    }

    /// 获取文件的文档路径
    ///
    /// 例如: app/service/UserService.java -> docs_root/app/service/UserService.md
    pub fn get_doc_path(&self, file: &DiscoveredFile) -> PathBuf {
        let file_name = file
            .relative_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(file.extension.as_str())
            .unwrap_or(&file_name);
        let doc_name = format!("{}.{}", stem, self.config.doc_extension);

        match file.relative_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => self.docs_root.join(p).join(doc_name),
            _ => self.docs_root.join(doc_name),
        }
    }

    /// 以 UTF-8 读取源文件全文
    pub async fn read_source(&self, file: &DiscoveredFile) -> Result<SourceFile, GeneratorError> {
        let content = fs::read_to_string(&file.path)
            .await
            .map_err(|e| GeneratorError::ReadError(file.path.clone(), e))?;
        Ok(SourceFile::new(file, content))
    }

    /// 构建补全请求，Prompt 中嵌入源文件的完整路径
    pub fn build_request(&self, source: &SourceFile) -> DocumentationRequest {
        let file_path = source.path.display().to_string();
        DocumentationRequest {
            prompt: prompts::format_code_doc_prompt(&file_path, &source.content),
            model: self.config.model.clone(),
        }
    }

    /// 处理单个文件：读取 → Prompt → 补全 → 写入
    pub async fn generate(
        &self,
        file: &DiscoveredFile,
        completion: &dyn CompletionService,
    ) -> Result<PathBuf, GeneratorError> {
        let source = self.read_source(file).await?;
        let request = self.build_request(&source);
        debug!(
            "Requesting documentation: file={}, extension={}, bytes={}, prompt_chars={}",
            source.relative_path.display(),
            source.extension,
            source.content.len(),
            request.prompt.chars().count()
        );
        drop(source);

        let content = completion
            .complete(&request.model, &request.prompt)
            .await
            .map_err(GeneratorError::LlmError)?;

        let result = DocumentationResult {
            content,
            doc_path: self.get_doc_path(file),
        };
        self.save_document(&result.doc_path, &result.content).await?;

        Ok(result.doc_path)
    }

    /// 保存文档到文件，已存在则整体覆盖
    async fn save_document(&self, path: &Path, content: &str) -> Result<(), GeneratorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GeneratorError::WriteError(parent.to_path_buf(), e))?;
        }

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| GeneratorError::WriteError(path.to_path_buf(), e))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| GeneratorError::WriteError(path.to_path_buf(), e))?;
        file.flush()
            .await
            .map_err(|e| GeneratorError::WriteError(path.to_path_buf(), e))?;

        Ok(())
    }

    /// 获取文档根目录
    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }
}

/// 生成器错误类型
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("读取失败 ({0}): {1}")]
    ReadError(PathBuf, #[source] std::io::Error),

    #[error("LLM调用错误: {0}")]
    LlmError(#[source] LlmError),

    #[error("写入失败 ({0}): {1}")]
    WriteError(PathBuf, #[source] std::io::Error),
}

impl GeneratorError {
    /// 错误发生的阶段
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::ReadError(..) => FailureStage::Read,
            Self::LlmError(_) => FailureStage::Complete,
            Self::WriteError(..) => FailureStage::Write,
        }
    }
}
