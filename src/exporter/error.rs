// ==========================================
// CNC 切割清单 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("写入失败: {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("序列化失败: {0}")]
    Serialize(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialize(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Serialize(err.to_string())
    }
}
