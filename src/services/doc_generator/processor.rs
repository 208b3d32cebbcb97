//! 顺序处理器
//!
//! 主调度器：扫描源码目录，逐个文件生成文档，汇总每个文件的结果

use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::generator::DocumentGenerator;
use super::scanner::DirectoryScanner;
use super::types::{DiscoveredFile, DocGenConfig, FileOutcome, RunSummary};
use crate::error::{AppError, AppResult};
use crate::llm::CompletionService;

/// 文档生成服务
pub struct DocGenService {
    config: DocGenConfig,
}

impl DocGenService {
    /// 创建新的文档生成服务
    pub fn new(config: DocGenConfig) -> Self {
        Self { config }
    }

    /// 执行一次完整的文档生成
    ///
    /// 文件严格按顺序处理：上一个文件读取、补全、写入都结束后才开始下一个。
    /// 单个文件的失败只记录在汇总里，不会中断整体运行。
    pub async fn run(
        &self,
        source_path: &Path,
        docs_path: &Path,
        completion: &dyn CompletionService,
    ) -> AppResult<RunSummary> {
        tokio::fs::create_dir_all(docs_path)
            .await
            .map_err(|e| AppError::OutputRoot(docs_path.to_path_buf(), e))?;
        let docs_root = tokio::fs::canonicalize(docs_path)
            .await
            .map_err(|e| AppError::OutputRoot(docs_path.to_path_buf(), e))?;

        let files = self.scan(source_path, &docs_root)?;
        let generator = DocumentGenerator::new(docs_root.clone(), self.config.clone());
        let total = files.len();

        info!(
            "Generating docs for {} files with model {} into {}",
            total,
            self.config.model,
            generator.docs_root().display()
        );

        let mut summary = RunSummary::new(docs_root);
        for (index, file) in files.iter().enumerate() {
            info!("[{}/{}] Processing {}", index + 1, total, file.display_path());

            let outcome = match generator.generate(file, completion).await {
                Ok(doc_path) => {
                    info!("Generated doc: {}", doc_path.display());
                    FileOutcome::Generated {
                        source: file.path.clone(),
                        output: doc_path,
                    }
                }
                Err(e) => {
                    error!("Failed to process {}: {}", file.path.display(), e);
                    FileOutcome::Failed {
                        source: file.path.clone(),
                        stage: e.stage(),
                        reason: e.to_string(),
                    }
                }
            };
            summary.record(outcome);
        }

        summary.finish();
        Ok(summary)
    }

    /// 只列出将要生成的文档，不读取文件、不调用模型、不写磁盘
    pub fn plan(&self, source_path: &Path, docs_path: &Path) -> AppResult<RunSummary> {
        let docs_root = absolute_path(docs_path)
            .map_err(|e| AppError::OutputRoot(docs_path.to_path_buf(), e))?;

        let files = self.scan(source_path, &docs_root)?;
        let generator = DocumentGenerator::new(docs_root.clone(), self.config.clone());

        let mut summary = RunSummary::new(docs_root);
        for file in &files {
            let output = generator.get_doc_path(file);
            info!("[dry-run] {} -> {}", file.display_path(), output.display());
            summary.record(FileOutcome::Planned {
                source: file.path.clone(),
                output,
            });
        }

        summary.finish();
        Ok(summary)
    }

    fn scan(&self, source_path: &Path, docs_root: &Path) -> AppResult<Vec<DiscoveredFile>> {
        let scanner =
            DirectoryScanner::new(self.config.clone()).prune_path(docs_root.to_path_buf());
        Ok(scanner.scan(source_path)?)
    }
}

/// 转换为绝对路径；路径存在时解析符号链接，否则基于当前目录拼接
fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        path.canonicalize()
    } else if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
