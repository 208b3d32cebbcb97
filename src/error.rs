//! 统一错误处理模块
//!
//! 定义会中止整次运行的应用级错误。单个文件的失败不在这里，
//! 而是作为 `FileOutcome::Failed` 记录在运行汇总中。

use std::path::PathBuf;
use thiserror::Error;

use crate::services::doc_generator::ScanError;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 源码目录扫描失败
    #[error("扫描错误: {0}")]
    Scan(#[from] ScanError),

    /// 无法创建文档输出目录
    #[error("无法创建输出目录 ({0}): {1}")]
    OutputRoot(PathBuf, #[source] std::io::Error),
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
