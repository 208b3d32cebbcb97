//! 文档生成器模块
//!
//! 为源码目录中的每个目标文件调用 LLM 生成一份 Markdown 文档，
//! 输出目录结构与源码目录保持一致。
//!
//! # 功能
//!
//! - 扫描源码目录，在下探前剪掉构建产物和依赖目录
//! - 按扩展名筛选文件，逐个顺序处理
//! - 单个文件失败只记录，不中断整体运行
//! - dry run：只列出将要生成的文档
//!
//! # 使用示例
//!
//! ```ignore
//! use std::path::Path;
//! use crate::llm::LlmClient;
//! use crate::services::doc_generator::{DocGenConfig, DocGenService};
//!
//! let service = DocGenService::new(DocGenConfig::default());
//! let client = LlmClient::new("api_key", "https://open.bigmodel.cn/api/paas/v4", None)?;
//!
//! let summary = service
//!     .run(Path::new("springboot-main"), Path::new("auto_docs"), &client)
//!     .await?;
//! println!("{} generated, {} failed", summary.generated_count(), summary.failed_count());
//! ```

mod generator;
mod processor;
pub mod prompts;
mod scanner;
pub mod types;

pub use processor::DocGenService;
pub use scanner::ScanError;
pub use types::{DocGenConfig, RunSummary};
