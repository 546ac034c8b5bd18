// ==========================================
// CNC 切割清单 - 转换错误类型
// ==========================================
// 职责: 汇总各层错误，映射 CLI 退出码
// ==========================================

use crate::config::error::ConfigError;
use crate::exporter::error::ExportError;
use crate::importer::error::{ImportError, ImportErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("超过截止时间（{stage} 阶段，已用 {elapsed_ms}ms），未写入任何文件")]
    DeadlineExceeded { stage: &'static str, elapsed_ms: u128 },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// CLI 退出码
    ///
    /// 2 文件访问 / 3 表结构 / 4 字段解析 / 5 领域约束 / 6 写入 / 7 配置 / 8 超时
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Import(e) => match e.kind() {
                ImportErrorKind::FileAccess => 2,
                ImportErrorKind::Schema => 3,
                ImportErrorKind::FieldParse => 4,
                ImportErrorKind::DomainConstraint => 5,
            },
            ConvertError::Export(_) => 6,
            ConvertError::Config(_) => 7,
            ConvertError::DeadlineExceeded { .. } => 8,
        }
    }
}
