//! 目录扫描器
//!
//! 递归扫描源码目录，在下探之前剪掉排除的子树，按扩展名筛选文件

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::types::{DiscoveredFile, DocGenConfig};

/// 目录扫描器
pub struct DirectoryScanner {
    config: DocGenConfig,
    /// 编译后的排除模式（glob patterns）
    exclude_patterns: Vec<glob::Pattern>,
    /// 额外剪掉的目录（例如位于源码目录内部的文档输出目录）
    pruned_paths: Vec<PathBuf>,
}

impl DirectoryScanner {
    /// 创建新的目录扫描器
    pub fn new(config: DocGenConfig) -> Self {
        let exclude_patterns = config
            .excluded_dirs
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid exclude pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        Self {
            config,
            exclude_patterns,
            pruned_paths: Vec::new(),
        }
    }

    /// 额外剪掉一个目录（需为绝对路径）
    pub fn prune_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pruned_paths.push(path.into());
        self
    }

    /// 扫描目录，按文件名顺序返回所有符合条件的文件
    pub fn scan(&self, root_path: &Path) -> Result<Vec<DiscoveredFile>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let root = root_path
            .canonicalize()
            .map_err(|e| ScanError::IoError(root_path.to_path_buf(), e))?;

        info!("Starting directory scan: {}", root.display());

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.should_prune(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let io = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop at root"));
                    return Err(ScanError::IoError(root.clone(), io));
                }
                Err(e) => {
                    warn!("Failed to scan entry: {}", e);
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let Some(extension) = self.match_extension(&name) else {
                continue;
            };

            let path = entry.path().to_path_buf();
            let relative_path = path
                .strip_prefix(&root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));

            files.push(DiscoveredFile {
                path,
                relative_path,
                extension: extension.to_string(),
            });
        }

        info!("Scan completed: {} eligible files", files.len());
        Ok(files)
    }

    /// 是否在下探前剪掉该目录
    fn should_prune(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if self.is_excluded_dir(&name) {
            debug!("Ignoring: {}", entry.path().display());
            return true;
        }

        if self.pruned_paths.iter().any(|p| p == entry.path()) {
            debug!("Ignoring output directory: {}", entry.path().display());
            return true;
        }

        false
    }

    /// 检查目录名是否命中排除规则
    fn is_excluded_dir(&self, name: &str) -> bool {
        self.config.excluded_dirs.iter().any(|d| d == name)
            || self.exclude_patterns.iter().any(|p| p.matches(name))
    }

    /// 返回文件名命中的扩展名（多个命中时取最长的）
    pub fn match_extension(&self, file_name: &str) -> Option<&str> {
        self.config
            .extensions
            .iter()
            .filter(|ext| file_name.len() > ext.len() && file_name.ends_with(ext.as_str()))
            .max_by_key(|ext| ext.len())
            .map(String::as_str)
    }
}

/// 普通文件，或指向普通文件的符号链接；目录链接不跟随
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        entry.path().is_file()
    } else {
        entry.file_type().is_file()
    }
}

/// 扫描错误类型
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("路径不存在: {0}")]
    PathNotFound(PathBuf),

    #[error("路径不是目录: {0}")]
    NotADirectory(PathBuf),

    #[error("IO错误 ({0}): {1}")]
    IoError(PathBuf, #[source] std::io::Error),
}
