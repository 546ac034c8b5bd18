// ==========================================
// CNC 切割清单 - 原子写入
// ==========================================
// 流程: 目标目录内临时文件 → 写入 → sync → rename 覆盖目标
// 红线: 失败时目标文件保持原状（不存在或旧内容）
// ==========================================

use crate::exporter::error::{ExportError, ExportResult};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// 原子写入文件（自动创建父目录）
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_error = |message: String| ExportError::WriteError {
        path: path.display().to_string(),
        message,
    };

    fs::create_dir_all(parent).map_err(|e| write_error(format!("创建目录失败: {}", e)))?;

    let mut staging =
        NamedTempFile::new_in(parent).map_err(|e| write_error(format!("创建临时文件失败: {}", e)))?;
    staging
        .write_all(bytes)
        .map_err(|e| write_error(e.to_string()))?;
    staging
        .as_file()
        .sync_all()
        .map_err(|e| write_error(format!("同步到磁盘失败: {}", e)))?;

    // 临时文件在 persist 失败时随 drop 删除
    staging
        .persist(path)
        .map_err(|e| write_error(format!("重命名失败: {}", e.error)))?;

    debug!(path = %path.display(), bytes = bytes.len(), "文件已原子写入");
    Ok(())
}
